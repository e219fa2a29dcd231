/// Configure tracing once at process startup.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (e.g. `"info"`) applies
/// to everything. Uptime timer and compact output, so one line per event with
/// the time since start.
pub fn setup_tracing(default_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
