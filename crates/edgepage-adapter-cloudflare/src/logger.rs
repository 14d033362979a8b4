use log::{Level, Log, Metadata, Record};

/// Forwards `log` records to the Workers console, which the runtime ships to `wrangler tail`.
pub(crate) struct ConsoleLogger;

pub(crate) static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        write_console(record.level(), &format_record(record));
    }

    fn flush(&self) {}
}

#[cfg(all(feature = "cloudflare", target_arch = "wasm32"))]
fn write_console(level: Level, line: &str) {
    match level {
        Level::Error => worker::console_error!("{}", line),
        Level::Warn => worker::console_warn!("{}", line),
        Level::Info => worker::console_log!("{}", line),
        Level::Debug | Level::Trace => worker::console_debug!("{}", line),
    }
}

// Host builds have no Workers console; records are dropped.
#[cfg(not(all(feature = "cloudflare", target_arch = "wasm32")))]
fn write_console(_level: Level, _line: &str) {}

pub(crate) fn format_record(record: &Record<'_>) -> String {
    format!("{:<5} {}: {}", record.level(), record.target(), record.args())
}
