use tracing::Level;

/// CloudWatch stamps every line itself, so timestamps are left out.
pub fn init_logger(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();
}
