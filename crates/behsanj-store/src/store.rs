use tokio::sync::Mutex;
use tracing::{info, warn};

use behsanj_core::models::{
    Feedback, LogLevel, SaveRequest, Settings, SystemLog, find_latest_by_national_id,
};

use crate::error::StoreError;
use crate::mirror::Mirror;
use crate::outbox::{Outbox, PendingOp};
use crate::rest::RestClient;

/// Network-first persistence facade. Reads refresh the mirror on success and
/// fall back to it on failure; writes that cannot reach the backend land in
/// the mirror and the outbox. Nothing here retries on its own.
pub struct FeedbackStore {
    rest: RestClient,
    mirror: Mirror,
    outbox: Mutex<Outbox>,
}

impl FeedbackStore {
    /// A store backed by the platform data directory.
    pub fn open(base_url: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_mirror(base_url, Mirror::open()?)
    }

    /// A store with an explicit mirror location.
    pub fn with_mirror(base_url: impl Into<String>, mirror: Mirror) -> Result<Self, StoreError> {
        let outbox = Outbox::open(mirror.root())?;
        Ok(Self {
            rest: RestClient::new(base_url),
            mirror,
            outbox: Mutex::new(outbox),
        })
    }

    /// Whether the backend (and its database) is reachable right now. The UI
    /// shows the offline indicator off the back of this.
    pub async fn health(&self) -> bool {
        self.rest.health().await
    }

    /// All records, newest first.
    pub async fn list(&self) -> Result<Vec<Feedback>, StoreError> {
        match self.rest.list_feedback().await {
            Ok(records) => {
                self.mirror.store_feedback(&records)?;
                Ok(records)
            }
            Err(e) => {
                warn!(error = %e, "feedback fetch failed, serving mirror");
                self.mirror.feedback()
            }
        }
    }

    /// The autofill lookup: latest record with this national id, if any.
    pub async fn find_by_national_id(&self, nid: &str) -> Result<Option<Feedback>, StoreError> {
        let records = self.list().await?;
        Ok(find_latest_by_national_id(&records, nid).cloned())
    }

    /// Create or update a record. When the backend is unreachable the mirror
    /// applies the same id/tracking-id rules and the mutation is queued for
    /// replay.
    pub async fn save(&self, request: &SaveRequest) -> Result<Feedback, StoreError> {
        match self.rest.save_feedback(request).await {
            Ok(record) => {
                // Keep the mirror's copy of the saved record current too.
                let mut records = self.mirror.feedback()?;
                match records.iter_mut().find(|f| f.id == record.id) {
                    Some(existing) => *existing = record.clone(),
                    None => records.insert(0, record.clone()),
                }
                self.mirror.store_feedback(&records)?;
                Ok(record)
            }
            Err(e @ StoreError::PermissionDenied) => Err(e),
            Err(e) => {
                warn!(error = %e, "save failed, writing to mirror and outbox");
                let record = self.mirror.apply(request)?;
                let op = match &request.id {
                    Some(_) => PendingOp::Update(Box::new(record.clone())),
                    None => PendingOp::Create(Box::new(record.clone())),
                };
                let mut outbox = self.outbox.lock().await;
                outbox.push(op)?;
                Ok(record)
            }
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        match self.rest.delete_feedback(id).await {
            Ok(()) => {
                self.mirror.delete(id)?;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, id, "delete failed, removing from mirror and queueing");
                self.mirror.delete(id)?;
                let mut outbox = self.outbox.lock().await;
                outbox.push(PendingOp::Delete { id: id.to_string() })?;
                Ok(())
            }
        }
    }

    /// Settings from the backend, falling back to the mirror and finally to
    /// the shipped defaults.
    pub async fn settings(&self) -> Result<Settings, StoreError> {
        match self.rest.settings().await {
            Ok(settings) => {
                self.mirror.save_settings(&settings)?;
                Ok(settings)
            }
            Err(e) => {
                warn!(error = %e, "settings fetch failed, serving mirror");
                self.mirror.settings()
            }
        }
    }

    /// Save settings to the backend and always to the mirror, so the local
    /// copy survives a dead backend.
    pub async fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        if let Err(e) = self.rest.save_settings(settings).await {
            warn!(error = %e, "settings push failed, mirror only");
        }
        self.mirror.save_settings(settings)
    }

    /// Password changes go through the backend only; its permission check is
    /// authoritative and there is no offline equivalent.
    pub async fn change_password(
        &self,
        current_username: &str,
        target_user_id: &str,
        new_password: &str,
    ) -> Result<(), StoreError> {
        self.rest
            .change_password(current_username, target_user_id, new_password)
            .await
    }

    pub async fn full_backup(&self) -> Result<serde_json::Value, StoreError> {
        self.rest.full_backup().await
    }

    /// Destructive on the server side; callers confirm before getting here.
    pub async fn full_restore(&self, backup: &serde_json::Value) -> Result<(), StoreError> {
        self.rest.full_restore(backup).await
    }

    /// Append to the system log ring, emit a tracing event, and best-effort
    /// ship the entry to the backend.
    pub async fn log_action(&self, level: LogLevel, message: impl Into<String>) {
        let entry = SystemLog {
            timestamp: jiff::Timestamp::now(),
            level,
            message: message.into(),
        };
        match level {
            LogLevel::Info => info!(target: "behsanj::syslog", "{}", entry.message),
            LogLevel::Warn => warn!(target: "behsanj::syslog", "{}", entry.message),
            LogLevel::Error => {
                tracing::error!(target: "behsanj::syslog", "{}", entry.message)
            }
        }
        if let Err(e) = self.mirror.push_log(entry.clone()) {
            warn!(error = %e, "system log write failed");
        }
        self.rest.post_log(&entry).await;
    }

    /// The system log, newest first.
    pub fn system_logs(&self) -> Result<Vec<SystemLog>, StoreError> {
        self.mirror.logs()
    }

    /// How many offline mutations are waiting for replay.
    pub async fn pending_ops(&self) -> usize {
        self.outbox.lock().await.len()
    }

    /// Re-apply queued offline mutations in order, last-write-wins. Stops at
    /// the first failure, keeping the unreplayed tail queued; returns how
    /// many ops went through.
    pub async fn replay(&self) -> Result<usize, StoreError> {
        let mut outbox = self.outbox.lock().await;
        let mut replayed = 0;
        let mut failure = None;
        for op in outbox.pending() {
            let result = match op {
                // The backend never saw this record, so the locally minted
                // id and tracking id must not go over the wire: an id-bearing
                // save that matches nothing is silently dropped server-side.
                PendingOp::Create(record) => {
                    match self.rest.save_feedback(&creation_request(record)).await {
                        Ok(created) => self.mirror.replace(&record.id, &created),
                        Err(e) => Err(e),
                    }
                }
                PendingOp::Update(record) => match self.rest.update_feedback(record).await {
                    Ok(updated) => self.mirror.replace(&record.id, &updated),
                    Err(e) => Err(e),
                },
                PendingOp::Delete { id } => self.rest.delete_feedback(id).await,
            };
            match result {
                Ok(()) => replayed += 1,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }
        outbox.ack(replayed)?;
        if let Some(e) = failure {
            warn!(error = %e, replayed, "outbox replay interrupted");
            return Err(e);
        }
        if replayed > 0 {
            info!(replayed, "outbox replayed");
        }
        Ok(replayed)
    }
}

/// An offline-created record goes back as a fresh create; id and tracking id
/// are the backend's to assign.
fn creation_request(record: &Feedback) -> SaveRequest {
    SaveRequest {
        id: None,
        source: record.source,
        survey_type: record.survey_type,
        registrar_username: record.registrar_username.clone(),
        registrar_name: record.registrar_name.clone(),
        status: record.status,
        patient_info: record.patient_info.clone(),
        insurance_info: record.insurance_info.clone(),
        clinical_info: record.clinical_info.clone(),
        discharge_info: record.discharge_info.clone(),
        ward: record.ward.clone(),
        answers: record.answers.clone(),
        audio_files: record.audio_files.clone(),
    }
}
