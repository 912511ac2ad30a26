//! Audit sinks
//!
//! - [`InMemoryAuditLog`]: process-lifetime vector of entries
//! - [`JsonlAuditLog`]: append-only JSON Lines file with an in-memory mirror

use govgate_kernel::governance::{AuditEntry, AuditSink, AuditSinkConfig, SecurityError, SecurityResult};
use parking_lot::{Mutex, RwLock};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Build the sink a policy asks for.
pub fn audit_sink_from_config(config: &AuditSinkConfig) -> SecurityResult<Arc<dyn AuditSink>> {
    match config {
        AuditSinkConfig::Memory => Ok(Arc::new(InMemoryAuditLog::new())),
        AuditSinkConfig::Jsonl { path } => Ok(Arc::new(JsonlAuditLog::open(path)?)),
    }
}

// =============================================================================
// InMemoryAuditLog
// =============================================================================

#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditSink for InMemoryAuditLog {
    fn append(&self, entry: &AuditEntry) -> SecurityResult<()> {
        self.entries.write().push(entry.clone());
        Ok(())
    }

    fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().clone()
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

// =============================================================================
// JsonlAuditLog
// =============================================================================

#[derive(Debug)]
struct JsonlState {
    file: File,
    entries: Vec<AuditEntry>,
}

/// One JSON object per line, appended and flushed per entry.
///
/// Entries already present in the file are loaded on open, so `entries()`
/// covers the whole persisted history. A failed write still keeps the entry
/// in memory and reports the error to the caller; the file is cut back to
/// its last complete line so later appends stay parseable.
#[derive(Debug)]
pub struct JsonlAuditLog {
    path: PathBuf,
    state: Mutex<JsonlState>,
}

impl JsonlAuditLog {
    /// Open (or create) the log at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> SecurityResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                SecurityError::Audit(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SecurityError::Audit(format!("cannot open {}: {e}", path.display())))?;

        let (entries, complete_len, terminated) = Self::scan(&path)?;
        let file_len = file.metadata().map_err(|e| SecurityError::Audit(e.to_string()))?.len();
        if complete_len < file_len {
            warn!(
                path = %path.display(),
                dropped_bytes = file_len - complete_len,
                "discarding unterminated trailing audit line"
            );
            file.set_len(complete_len).map_err(|e| {
                SecurityError::Audit(format!("cannot repair {}: {e}", path.display()))
            })?;
        }
        if !terminated {
            (&file).write_all(b"\n").map_err(|e| {
                SecurityError::Audit(format!("cannot repair {}: {e}", path.display()))
            })?;
        }

        debug!(path = %path.display(), existing = entries.len(), "audit log opened");
        Ok(Self {
            path,
            state: Mutex::new(JsonlState { file, entries }),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse every non-blank line of a JSON Lines audit file, in file order.
    ///
    /// A final line without a newline that does not parse is the remains of
    /// an interrupted write and is skipped; any other bad line is an error.
    pub fn read_all(path: impl AsRef<Path>) -> SecurityResult<Vec<AuditEntry>> {
        Self::scan(path.as_ref()).map(|(entries, _, _)| entries)
    }

    /// Entries, the byte length up to the last good entry, and whether that
    /// length ends on a newline.
    fn scan(path: &Path) -> SecurityResult<(Vec<AuditEntry>, u64, bool)> {
        let mut raw = String::new();
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut raw))
            .map_err(|e| SecurityError::Audit(format!("cannot read {}: {e}", path.display())))?;

        let mut entries = Vec::new();
        let mut complete_len = 0u64;
        let mut ends_clean = true;
        for (idx, chunk) in raw.split_inclusive('\n').enumerate() {
            let terminated = chunk.ends_with('\n');
            let line = chunk.trim();
            if line.is_empty() {
                if terminated {
                    complete_len += chunk.len() as u64;
                }
                continue;
            }
            match serde_json::from_str(line) {
                Ok(entry) => {
                    entries.push(entry);
                    complete_len += chunk.len() as u64;
                    ends_clean = terminated;
                }
                Err(_) if !terminated => break,
                Err(e) => {
                    return Err(SecurityError::Audit(format!(
                        "{}:{}: {e}",
                        path.display(),
                        idx + 1
                    )));
                }
            }
        }
        Ok((entries, complete_len, ends_clean))
    }
}

impl AuditSink for JsonlAuditLog {
    fn append(&self, entry: &AuditEntry) -> SecurityResult<()> {
        let mut line =
            serde_json::to_string(entry).map_err(|e| SecurityError::Audit(e.to_string()))?;
        line.push('\n');

        let mut state = self.state.lock();
        let JsonlState { file, entries } = &mut *state;
        entries.push(entry.clone());

        let start = file.metadata().map(|m| m.len());
        let written = file.write_all(line.as_bytes()).and_then(|()| file.flush());
        if let Err(e) = written {
            if let Ok(start) = start {
                if let Err(trunc) = file.set_len(start) {
                    warn!(path = %self.path.display(), error = %trunc, "cannot drop partial audit line");
                }
            }
            return Err(SecurityError::Audit(format!(
                "cannot append to {}: {e}",
                self.path.display()
            )));
        }
        Ok(())
    }

    fn entries(&self) -> Vec<AuditEntry> {
        self.state.lock().entries.clone()
    }

    fn len(&self) -> usize {
        self.state.lock().entries.len()
    }
}
