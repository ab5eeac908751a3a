use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use behsanj_core::models::{Feedback, SaveRequest, Settings, SystemLog};

use crate::error::StoreError;

const SETTINGS_FILE: &str = "settings.json";
const FEEDBACK_FILE: &str = "feedback.json";
const SYSLOG_FILE: &str = "syslog.json";

/// Tracking ids start here when the mirror has no records yet, matching the
/// backend's numbering so offline-created records fit the same sequence.
const FIRST_TRACKING_ID: i64 = 1000;

/// The system log keeps this many entries, newest first.
const LOG_CAPACITY: usize = 500;

/// Local JSON snapshot of the backend: settings, feedback records, and the
/// system log. Every successful network read refreshes it; when the network
/// is down it serves reads and absorbs writes.
#[derive(Debug)]
pub struct Mirror {
    root: PathBuf,
}

impl Mirror {
    /// The mirror under the platform data directory.
    pub fn open() -> Result<Self, StoreError> {
        let base = dirs::data_dir().ok_or(StoreError::NoDataDir)?;
        Self::at(base.join("behsanj"))
    }

    /// A mirror rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, StoreError> {
        let path = self.root.join(file);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        let contents = serde_json::to_string(value)?;
        fs::write(self.root.join(file), contents)?;
        Ok(())
    }

    /// The mirrored settings, or the shipped defaults when nothing has been
    /// mirrored yet.
    pub fn settings(&self) -> Result<Settings, StoreError> {
        Ok(self
            .read_json(SETTINGS_FILE)?
            .unwrap_or_else(Settings::default_client))
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.write_json(SETTINGS_FILE, settings)
    }

    /// The mirrored record list, newest first.
    pub fn feedback(&self) -> Result<Vec<Feedback>, StoreError> {
        Ok(self.read_json(FEEDBACK_FILE)?.unwrap_or_default())
    }

    /// Replace the snapshot with a fresh backend read.
    pub fn store_feedback(&self, records: &[Feedback]) -> Result<(), StoreError> {
        self.write_json(FEEDBACK_FILE, &records)
    }

    /// Apply a save the way the backend would. Without an id a record is
    /// created with a fresh uuid and the next tracking id; with one the
    /// matching record is updated in place, keeping its id, tracking id, and
    /// creation time.
    pub fn apply(&self, request: &SaveRequest) -> Result<Feedback, StoreError> {
        let mut records = self.feedback()?;
        let now = jiff::Timestamp::now();

        let record = match &request.id {
            Some(id) => {
                let existing = records
                    .iter_mut()
                    .find(|f| &f.id == id)
                    .ok_or_else(|| StoreError::NotFound(id.clone()))?;
                *existing = materialize(request, existing.id.clone(), existing.tracking_id, existing.created_at, now);
                existing.clone()
            }
            None => {
                let next_tracking = records
                    .iter()
                    .map(|f| f.tracking_id + 1)
                    .max()
                    .unwrap_or(FIRST_TRACKING_ID);
                let record =
                    materialize(request, Uuid::new_v4().to_string(), next_tracking, now, now);
                records.insert(0, record.clone());
                record
            }
        };

        self.store_feedback(&records)?;
        Ok(record)
    }

    /// Swap a record for the backend's materialization of it. Replaying an
    /// offline create comes back with a server-assigned id and tracking id,
    /// so the lookup key and the stored record can differ.
    pub fn replace(&self, id: &str, record: &Feedback) -> Result<(), StoreError> {
        let mut records = self.feedback()?;
        match records.iter_mut().find(|f| f.id == id) {
            Some(existing) => *existing = record.clone(),
            None => records.insert(0, record.clone()),
        }
        self.store_feedback(&records)
    }

    /// Remove a record. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.feedback()?;
        let before = records.len();
        records.retain(|f| f.id != id);
        let removed = records.len() != before;
        if removed {
            self.store_feedback(&records)?;
        }
        Ok(removed)
    }

    /// The system log, newest first.
    pub fn logs(&self) -> Result<Vec<SystemLog>, StoreError> {
        Ok(self.read_json(SYSLOG_FILE)?.unwrap_or_default())
    }

    /// Prepend a log entry, dropping the oldest past the cap.
    pub fn push_log(&self, entry: SystemLog) -> Result<(), StoreError> {
        let mut logs = self.logs()?;
        logs.insert(0, entry);
        logs.truncate(LOG_CAPACITY);
        self.write_json(SYSLOG_FILE, &logs)
    }
}

fn materialize(
    request: &SaveRequest,
    id: String,
    tracking_id: i64,
    created_at: jiff::Timestamp,
    now: jiff::Timestamp,
) -> Feedback {
    Feedback {
        id,
        tracking_id,
        source: request.source,
        survey_type: request.survey_type,
        registrar_username: request.registrar_username.clone(),
        registrar_name: request.registrar_name.clone(),
        status: request.status,
        patient_info: request.patient_info.clone(),
        insurance_info: request.insurance_info.clone(),
        clinical_info: request.clinical_info.clone(),
        discharge_info: request.discharge_info.clone(),
        ward: request.ward.clone(),
        answers: request.answers.clone(),
        audio_files: request.audio_files.clone(),
        created_at,
        last_modified: now,
    }
}
