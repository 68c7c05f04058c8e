use tracing_subscriber::{
    filter::{Directive, LevelFilter},
    fmt, EnvFilter,
};

/// Directive used when configuration names none.
pub const DEFAULT_LOG_DIRECTIVE: &str = "claimright=info";

/// Installs the global tracing subscriber from `RUST_LOG` plus one extra
/// directive, falling back to [`DEFAULT_LOG_DIRECTIVE`] when `directive` is
/// absent or unparsable. A subscriber installed elsewhere is left in place.
pub fn init_tracing(directive: Option<&str>) {
    let filter = EnvFilter::from_default_env().add_directive(default_directive(directive));
    let _ = fmt().with_env_filter(filter).try_init();
}

fn default_directive(directive: Option<&str>) -> Directive {
    directive
        .and_then(|raw| raw.parse::<Directive>().ok())
        .or_else(|| DEFAULT_LOG_DIRECTIVE.parse().ok())
        .unwrap_or_else(|| LevelFilter::INFO.into())
}
