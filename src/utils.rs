#[cfg(test)]
use log::LevelFilter;

/// Test logger. `RUST_LOG` still applies on top of `level`.
#[cfg(test)]
pub fn init_logging(level: LevelFilter) {
    let _ = env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .is_test(true)
        .try_init();
}
