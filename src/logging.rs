use std::io::Write;

use log::LevelFilter;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Installs the global logger. `RUST_LOG` takes precedence over `level`.
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format(TIME_FORMAT),
                record.level(),
                record.args()
            )
        })
        .filter(None, level)
        .parse_default_env()
        .try_init();
}
