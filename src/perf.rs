//! Lightweight timing and event logging for engine calls.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);
static EVENT_LOG: LazyLock<Mutex<EventLog>> = LazyLock::new(|| Mutex::new(EventLog::new()));

/// Times the enclosing block and reports it on drop when enabled.
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
        tracing::info!(target: "snapcard::perf", scope = self.name, elapsed_ms, "timing");
        log_event(self.name, format!("{elapsed_ms:.3} ms"));
    }
}

#[derive(Debug)]
struct EventLog {
    start: Instant,
    writer: Option<BufWriter<File>>,
}

impl EventLog {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            writer: None,
        }
    }
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

/// Start writing events to `path`, or stop when `None`.
pub fn set_event_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut log = EVENT_LOG.lock().expect("event log lock poisoned");
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "snapcard event log start")?;
            writer.flush()?;
            log.start = Instant::now();
            log.writer = Some(writer);
        }
        None => log.writer = None,
    }
    Ok(())
}

pub fn is_event_log_enabled() -> bool {
    EVENT_LOG
        .lock()
        .expect("event log lock poisoned")
        .writer
        .is_some()
}

pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut log = EVENT_LOG.lock().expect("event log lock poisoned");
    let elapsed_ms = log.start.elapsed().as_secs_f64() * 1000.0;
    if let Some(writer) = log.writer.as_mut() {
        let _ = writeln!(
            writer,
            "[{elapsed_ms:>10.3} ms] {name}: {}",
            detail.as_ref()
        );
        let _ = writer.flush();
    }
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
    fn test_event_log_path_enables_logging_and_writes() {
        let temp_file = NamedTempFile::new().unwrap();
        set_event_log_path(Some(temp_file.path())).unwrap();
        assert!(is_event_log_enabled());
        log_event("normalize", "3 -> 9");
        set_event_log_path(None).unwrap();
        assert!(!is_event_log_enabled());

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("snapcard event log start"));
        assert!(content.contains("normalize: 3 -> 9"));
    }
}
