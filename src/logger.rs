use colored::{Color, Colorize};
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use std::io::{self, Write};

static LOGGER: Lazy<ConsoleLogger> = Lazy::new(|| ConsoleLogger {
    timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
});

pub fn init() -> std::result::Result<(), String> {
    init_with_level(LevelFilter::Info)
}

pub fn init_with_level(level: LevelFilter) -> std::result::Result<(), String> {
    if let Err(e) = log::set_logger(&*LOGGER) {
        return Err(format!("Failed to set logger: {:?}", e));
    }
    log::set_max_level(level);
    Ok(())
}

pub fn level_color(level: Level) -> Color {
    match level {
        Level::Trace => Color::Cyan,
        Level::Debug => Color::Blue,
        Level::Info => Color::Green,
        Level::Warn => Color::Yellow,
        Level::Error => Color::Red,
    }
}

struct ConsoleLogger {
    timestamp_format: String,
}

impl ConsoleLogger {
    fn format_record(&self, record: &Record) -> String {
        let timestamp = chrono::Utc::now().format(&self.timestamp_format);
        let level = record
            .level()
            .to_string()
            .color(level_color(record.level()))
            .bold();
        let module = record.module_path().unwrap_or("unknown").bright_blue();
        format!("{} [{}] {}: {}", timestamp.to_string().bright_black(), level, module, record.args())
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", self.format_record(record));
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

/// Log application startup information.
pub fn log_startup_info(app_name: &str, version: &str, host: &str, port: u16) {
    log::info!("🚀 Starting {} v{}", app_name, version);
    log::info!("🌐 Server will run on http://{}:{}", host, port);
    log::info!("📝 Logger initialized successfully");
}
