use simplelog::{
    ColorChoice, CombinedLogger, Config as LogConfig, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub use simplelog::LevelFilter;

/// Initialize logging: terminal output on stderr, plus a best-effort
/// audit log at ~/.local/share/risk-rules/audit.log when enabled.
/// Failures to open the audit file are ignored — logging must never
/// block the caller.
pub fn init(level: LevelFilter, audit_log: bool) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if audit_log && let Some(file) = audit_log_file() {
        loggers.push(WriteLogger::new(LevelFilter::Info, LogConfig::default(), file));
    }
    let _ = CombinedLogger::init(loggers);
}

/// Open the audit log for appending, creating the directory if needed.
fn audit_log_file() -> Option<std::fs::File> {
    let home = std::env::var_os("HOME")?;
    let dir = std::path::Path::new(&home).join(".local/share/risk-rules");
    std::fs::create_dir_all(&dir).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("audit.log"))
        .ok()
}
