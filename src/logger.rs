use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref LOGGER: Mutex<Option<File>> = Mutex::new(None);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Lowercase name, as accepted by `gum log --level`.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// Open (or create) the debug log file. Failures leave logging disabled.
pub fn init(path: &Path) {
    open_into(&LOGGER, path);
}

pub fn log(level: Level, message: &str) {
    write_to(&LOGGER, level, message);
}

pub fn debug(message: &str) {
    log(Level::Debug, message);
}

fn open_into(slot: &Mutex<Option<File>>, path: &Path) {
    let Ok(mut logger) = slot.lock() else {
        return;
    };
    if logger.is_none() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
            *logger = Some(file);
        }
    }
}

fn write_to(slot: &Mutex<Option<File>>, level: Level, message: &str) {
    if let Ok(mut logger) = slot.lock()
        && let Some(file) = logger.as_mut()
    {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let _ = writeln!(file, "[{}] {} {}", timestamp, level, message);
    }
}

/// Points the global logger at one file shared by every test in the process.
#[cfg(test)]
pub(crate) fn init_for_tests() -> std::path::PathBuf {
    let path = std::env::temp_dir()
        .join(format!("image-flashcards-test-{}", std::process::id()))
        .join("debug.log");
    init(&path);
    path
}
