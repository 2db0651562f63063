use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

pub const LOG_FILE_ENV: &str = "PUSHY_LOG_FILE";

static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();
static START: OnceLock<Instant> = OnceLock::new();

/// Initialise the optional file logger.
///
/// Reads `PUSHY_LOG_FILE`; when set to a non-empty path the file is opened in
/// append mode and all subsequent `plog!()` calls write to it.
pub fn init() {
    if let Ok(path) = std::env::var(LOG_FILE_ENV) {
        init_with_path(&path);
    }
}

fn init_with_path(path: &str) {
    if path.is_empty() {
        return;
    }
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = LOG_FILE.set(Mutex::new(file));
        START.get_or_init(Instant::now);
    }
}

pub fn write(msg: &str) {
    if let Some(file) = LOG_FILE.get() {
        if let Ok(mut f) = file.lock() {
            let elapsed = START.get().map_or(0.0, |s| s.elapsed().as_secs_f64());
            let _ = writeln!(f, "[{elapsed:>10.3}] {msg}");
            let _ = f.flush();
        }
    }
}

#[macro_export]
macro_rules! plog {
    ($($arg:tt)*) => {
        $crate::log::write(&format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // The logger is process-global, so everything that touches it lives in
    // one test.
    #[test]
    fn appends_timestamped_lines_once_initialised() {
        write("dropped before init");

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pushy.log");
        std::fs::write(&path, "existing\n").unwrap();

        init_with_path(path.to_str().unwrap());
        crate::plog!("sending note title={:?}", "Build done");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("existing\n"));
        let line = contents
            .lines()
            .find(|l| l.ends_with("] sending note title=\"Build done\""))
            .unwrap();
        assert!(line.starts_with('['), "got {line}");
        assert!(!contents.contains("dropped before init"));
    }
}
