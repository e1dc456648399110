pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "drop_tally=info";

/// Initializes the global tracing subscriber with sensible defaults.
/// `RUST_LOG` directives are honoured on top of `drop_tally=info`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = DEFAULT_DIRECTIVE.parse::<Directive>() {
            filter = filter.add_directive(directive);
        }

        // A host may already own the global subscriber.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
