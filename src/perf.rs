//! Timing scopes and the render debug log.
//!
//! Scopes print their elapsed time to stderr when `--perf` is on. The debug
//! log is a plain file that collects render events (diagram failures,
//! highlighter fallbacks) with a timestamp relative to when it was opened.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);
static DEBUG_LOG: LazyLock<Mutex<Option<DebugLog>>> = LazyLock::new(|| Mutex::new(None));

/// Reports its lifetime on drop when timing is enabled.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        eprintln!("[perf] {}: {:.2} ms", self.name, elapsed_ms);
    }
}

#[derive(Debug)]
struct DebugLog {
    start: Instant,
    writer: BufWriter<File>,
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Open (or close, with `None`) the render debug log.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or written.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let next = match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "snipdeck render debug log start")?;
            writer.flush()?;
            Some(DebugLog {
                start: Instant::now(),
                writer,
            })
        }
        None => None,
    };
    if let Ok(mut log) = DEBUG_LOG.lock() {
        *log = next;
    }
    Ok(())
}

pub fn is_debug_log_enabled() -> bool {
    DEBUG_LOG.lock().is_ok_and(|log| log.is_some())
}

/// Append an event to the debug log, if one is open.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let Ok(mut guard) = DEBUG_LOG.lock() else {
        return;
    };
    let Some(log) = guard.as_mut() else {
        return;
    };
    let elapsed_ms = log.start.elapsed().as_secs_f64() * 1000.0;
    let _ = writeln!(
        log.writer,
        "[{elapsed_ms:>10.3} ms] {name}: {}",
        detail.as_ref()
    );
    let _ = log.writer.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_set_enabled_toggles_runtime_flag() {
        set_enabled(true);
        assert!(is_enabled());

        set_enabled(false);
        assert!(!is_enabled());
    }

    #[test]
    fn test_debug_log_path_enables_logging_and_writes() {
        let temp_file = NamedTempFile::new().unwrap();
        set_debug_log_path(Some(temp_file.path())).unwrap();
        assert!(is_debug_log_enabled());
        log_event("diagram.render.error", "err=boom");
        set_debug_log_path(None).unwrap();
        assert!(!is_debug_log_enabled());

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("snipdeck render debug log start"));
        assert!(content.contains("diagram.render.error: err=boom"));
    }
}
