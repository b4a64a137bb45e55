use tracing_subscriber::{fmt, EnvFilter};

/// Installs a stderr subscriber for the crate's `tracing` events.
///
/// `RUST_LOG` wins if it is set; otherwise `debug` picks between the `debug`
/// and `warn` levels. Only the first call in a process has any effect.
pub fn init(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        init(false);
        init(true);
        tracing::debug!("logging initialized");
    }
}
