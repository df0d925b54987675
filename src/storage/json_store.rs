use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::errors::CliError;
use crate::session::{RecordSnapshot, SubmissionSink};
use crate::utils::{ensure_dir, tmp_path, write_atomic};

const SUBMISSION_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// Writes accepted submissions as pretty-printed JSON files named by record,
/// timestamp, and session id. Delivery is fire-and-forget: failures are
/// logged and never surfaced to the wizard core.
#[derive(Debug)]
pub struct JsonSubmissionStore {
    dir: PathBuf,
    last_written: Option<PathBuf>,
}

impl JsonSubmissionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_written: None,
        }
    }

    /// Path of the most recently written submission, if any.
    pub fn last_written(&self) -> Option<&Path> {
        self.last_written.as_deref()
    }

    fn submission_path(&self, snapshot: &RecordSnapshot) -> PathBuf {
        let timestamp = Utc::now().format(SUBMISSION_TIMESTAMP_FORMAT);
        let mut short_id = snapshot.session.simple().to_string();
        short_id.truncate(8);
        self.dir
            .join(format!("{}_{}_{}.json", snapshot.record, timestamp, short_id))
    }

    fn write(&self, snapshot: &RecordSnapshot, path: &Path) -> Result<(), CliError> {
        ensure_dir(&self.dir)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = tmp_path(path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl SubmissionSink for JsonSubmissionStore {
    fn deliver(&mut self, snapshot: &RecordSnapshot) {
        let path = self.submission_path(snapshot);
        match self.write(snapshot, &path) {
            Ok(()) => {
                debug!(path = %path.display(), "submission stored");
                self.last_written = Some(path);
            }
            Err(error) => {
                warn!(%error, "failed to store submission");
            }
        }
    }
}
