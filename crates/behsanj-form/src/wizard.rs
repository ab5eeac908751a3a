use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use thiserror::Error;
use tracing::info;
use ts_rs::TS;

use behsanj_core::jalali::{JalaliDate, to_english_digits};
use behsanj_core::models::{
    AnswerValue, ClinicalInfo, DischargeInfo, Feedback, InsuranceInfo, PatientInfo, SaveRequest,
    Source, Status, SurveyType,
};
use behsanj_core::session::Session;

use crate::recording::RecordingSession;

pub const STEP_COUNT: u8 = 5;

const COMMENTS_KEY: &str = "comments";
const BACKGROUND_KEY: &str = "background";
const DEFAULT_WARD: &str = "ECU 1";

/// A form field that can fail validation. Variants are declared in wizard
/// step order so the earliest offending field is simply the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Field {
    Name,
    NationalId,
    Mobile,
    Address,
    AdmissionDate,
    BirthDate,
    InsuranceName,
    Reason,
    Doctor,
    Surgeon,
    SurgeryType,
    DischargeDate,
    DischargeDoctor,
    DischargeType,
}

impl Field {
    /// The wizard step where this field is entered.
    pub fn step(self) -> u8 {
        match self {
            Self::Name
            | Self::NationalId
            | Self::Mobile
            | Self::Address
            | Self::AdmissionDate
            | Self::BirthDate => 1,
            Self::InsuranceName => 2,
            Self::Reason | Self::Doctor | Self::Surgeon | Self::SurgeryType => 3,
            Self::DischargeDate | Self::DischargeDoctor | Self::DischargeType => 4,
        }
    }
}

/// What saving this wizard should do. Replaces the old hidden "is new entry"
/// flag: autofill resets it to `Create`, loading a draft for editing sets
/// `UpdateExisting`, and nothing else touches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveIntent {
    Create,
    UpdateExisting(String),
}

/// The staff smart-draft prompt after step 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftChoice {
    /// Patient will answer the survey later: save as a draft.
    CompleteLater,
    /// Demographics only, no survey: finalize immediately without running
    /// full-form validation.
    DemographicsOnly,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("required fields missing: {fields:?}")]
pub struct ValidationFailed {
    pub fields: Vec<Field>,
    /// The step the wizard jumped back to.
    pub step: u8,
}

/// The survey form's state, one instance per form being filled in.
#[derive(Debug)]
pub struct SurveyWizard {
    step: u8,
    source: Source,
    survey_type: Option<SurveyType>,
    intent: SaveIntent,
    errors: BTreeSet<Field>,
    pub patient_info: PatientInfo,
    pub insurance_info: InsuranceInfo,
    pub clinical_info: ClinicalInfo,
    pub discharge_info: DischargeInfo,
    pub answers: HashMap<String, AnswerValue>,
    pub audio_files: HashMap<String, Vec<String>>,
    pub comments: String,
    pub ward: String,
    pub ambient: RecordingSession,
}

impl SurveyWizard {
    /// A blank form. Admission date defaults to today; a discharge-flow form
    /// starts with the discharge block pre-marked.
    pub fn new(source: Source, survey_type: Option<SurveyType>) -> Self {
        let today = JalaliDate::today().to_string();
        let mut wizard = Self {
            step: 1,
            source,
            survey_type,
            intent: SaveIntent::Create,
            errors: BTreeSet::new(),
            patient_info: PatientInfo {
                admission_date: today.clone(),
                ..PatientInfo::default()
            },
            insurance_info: InsuranceInfo::default(),
            clinical_info: ClinicalInfo::default(),
            discharge_info: DischargeInfo {
                date: Some(today),
                ..DischargeInfo::default()
            },
            answers: HashMap::new(),
            audio_files: HashMap::new(),
            comments: String::new(),
            ward: DEFAULT_WARD.to_string(),
            ambient: RecordingSession::new(),
        };
        if survey_type == Some(SurveyType::Discharge) {
            wizard.discharge_info.is_discharged = true;
        }
        wizard
    }

    /// Load an existing record (resuming a draft or editing a final record).
    /// Saving will update it in place.
    pub fn edit(record: &Feedback) -> Self {
        let mut answers = record.answers.clone();
        let comments = answers
            .remove(COMMENTS_KEY)
            .and_then(|a| a.as_text().map(str::to_string))
            .unwrap_or_default();
        Self {
            step: 1,
            source: record.source,
            survey_type: record.survey_type,
            intent: SaveIntent::UpdateExisting(record.id.clone()),
            errors: BTreeSet::new(),
            patient_info: record.patient_info.clone(),
            insurance_info: record.insurance_info.clone(),
            clinical_info: record.clinical_info.clone(),
            discharge_info: record.discharge_info.clone(),
            answers,
            audio_files: record.audio_files.clone(),
            comments,
            ward: record.ward.clone(),
            ambient: RecordingSession::new(),
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn survey_type(&self) -> Option<SurveyType> {
        self.survey_type
    }

    pub fn intent(&self) -> &SaveIntent {
        &self.intent
    }

    pub fn has_error(&self, field: Field) -> bool {
        self.errors.contains(&field)
    }

    /// Move to the next step. The whole form is validated, not just the
    /// current step; on failure the wizard jumps to the first step containing
    /// an offending field and returns `false`.
    pub fn advance(&mut self) -> bool {
        if !self.validate_full() {
            if let Some(first) = self.errors.iter().next() {
                self.step = first.step();
            }
            return false;
        }
        self.step = (self.step + 1).min(STEP_COUNT);
        true
    }

    /// Going back is always allowed.
    pub fn back(&mut self) {
        self.step = self.step.saturating_sub(1).max(1);
    }

    pub fn set_answer(&mut self, question_id: &str, value: impl Into<AnswerValue>) {
        self.answers.insert(question_id.to_string(), value.into());
    }

    /// The national id with Persian digits normalized, when it is the 10
    /// characters a lookup needs. The UI calls this on blur and feeds the
    /// result to the store's national-id search.
    pub fn lookup_national_id(&self) -> Option<String> {
        let nid = to_english_digits(&self.patient_info.national_id);
        (nid.len() == 10).then_some(nid)
    }

    /// Copy demographics and insurance from a previously found record. The
    /// save intent is forced back to `Create`: the new visit gets its own
    /// id and tracking id under the same national id.
    pub fn autofill_from(&mut self, found: &Feedback) {
        self.patient_info.name = found.patient_info.name.clone();
        self.patient_info.gender = found.patient_info.gender;
        self.patient_info.birth_date = found.patient_info.birth_date.clone();
        self.patient_info.mobile = found.patient_info.mobile.clone();
        self.patient_info.address = found.patient_info.address.clone();
        self.insurance_info = found.insurance_info.clone();
        self.intent = SaveIntent::Create;
    }

    /// Add a recorded take. Takes accumulate; recording again never replaces
    /// an earlier one.
    pub fn append_audio(&mut self, key: &str, data_uri: String) {
        self.audio_files.entry(key.to_string()).or_default().push(data_uri);
    }

    /// Delete one take. The key disappears entirely when its last take goes.
    pub fn remove_audio(&mut self, key: &str, index: usize) {
        if let Some(takes) = self.audio_files.get_mut(key) {
            if index < takes.len() {
                takes.remove(index);
            }
            if takes.is_empty() {
                self.audio_files.remove(key);
            }
        }
    }

    /// Step-1 check: name present, 10-digit national id, 11-digit mobile
    /// starting `09`. Gate for the smart-draft save.
    pub fn validate_basics(&mut self) -> bool {
        let mut errors = BTreeSet::new();
        self.check_basics(&mut errors);
        let valid = errors.is_empty();
        if !valid {
            self.errors = errors;
        }
        valid
    }

    /// Whole-form check. Staff entry requires the full dossier; the public
    /// form only rejects a malformed mobile number, and only when one was
    /// entered at all.
    pub fn validate_full(&mut self) -> bool {
        let mut errors = BTreeSet::new();
        match self.source {
            Source::Staff => {
                self.check_basics(&mut errors);
                let p = &self.patient_info;
                if p.address.is_empty() {
                    errors.insert(Field::Address);
                }
                if p.admission_date.is_empty() {
                    errors.insert(Field::AdmissionDate);
                }
                if p.birth_date.is_empty() {
                    errors.insert(Field::BirthDate);
                }
                if self.insurance_info.name.is_empty() {
                    errors.insert(Field::InsuranceName);
                }
                let c = &self.clinical_info;
                if c.reason.is_empty() {
                    errors.insert(Field::Reason);
                }
                if c.doctor.is_empty() {
                    errors.insert(Field::Doctor);
                }
                if c.has_surgery {
                    if c.surgeon.as_deref().unwrap_or_default().is_empty() {
                        errors.insert(Field::Surgeon);
                    }
                    if c.surgery_type.as_deref().unwrap_or_default().is_empty() {
                        errors.insert(Field::SurgeryType);
                    }
                }
                let d = &self.discharge_info;
                if d.is_discharged {
                    if d.date.as_deref().unwrap_or_default().is_empty() {
                        errors.insert(Field::DischargeDate);
                    }
                    if d.doctor.as_deref().unwrap_or_default().is_empty() {
                        errors.insert(Field::DischargeDoctor);
                    }
                    if d.discharge_type.is_none() {
                        errors.insert(Field::DischargeType);
                    }
                }
            }
            Source::Public => {
                if !self.patient_info.mobile.is_empty() && !self.mobile_is_valid() {
                    errors.insert(Field::Mobile);
                }
            }
        }
        let valid = errors.is_empty();
        self.errors = errors;
        valid
    }

    /// Finalize the survey. Validation failure jumps the wizard to the first
    /// offending step and reports the flagged fields.
    pub fn finalize(&mut self, session: Option<&Session>) -> Result<SaveRequest, ValidationFailed> {
        if !self.validate_full() {
            return Err(self.validation_failure());
        }
        Ok(self.build(Status::Final, session))
    }

    /// The staff smart-draft save after step 1. Both choices require valid
    /// basics; neither runs full-form validation.
    pub fn save_draft(
        &mut self,
        choice: DraftChoice,
        session: Option<&Session>,
    ) -> Result<SaveRequest, ValidationFailed> {
        if !self.validate_basics() {
            return Err(self.validation_failure());
        }
        let status = match choice {
            DraftChoice::CompleteLater => Status::Draft,
            DraftChoice::DemographicsOnly => Status::Final,
        };
        Ok(self.build(status, session))
    }

    fn check_basics(&self, errors: &mut BTreeSet<Field>) {
        if self.patient_info.name.is_empty() {
            errors.insert(Field::Name);
        }
        if to_english_digits(&self.patient_info.national_id).len() != 10 {
            errors.insert(Field::NationalId);
        }
        if !self.mobile_is_valid() {
            errors.insert(Field::Mobile);
        }
    }

    fn mobile_is_valid(&self) -> bool {
        let mobile = to_english_digits(&self.patient_info.mobile);
        mobile.len() == 11 && mobile.starts_with("09")
    }

    fn validation_failure(&mut self) -> ValidationFailed {
        let fields: Vec<Field> = self.errors.iter().copied().collect();
        if let Some(first) = fields.first() {
            self.step = first.step();
        }
        ValidationFailed { fields, step: self.step }
    }

    fn build(&mut self, status: Status, session: Option<&Session>) -> SaveRequest {
        let mut patient_info = self.patient_info.clone();
        patient_info.mobile = to_english_digits(&patient_info.mobile);
        patient_info.national_id = to_english_digits(&patient_info.national_id);

        let mut answers = self.answers.clone();
        answers.insert(COMMENTS_KEY.to_string(), AnswerValue::from(self.comments.clone()));

        let mut audio_files = self.audio_files.clone();
        if let Some(track) = self.ambient.flush() {
            audio_files.insert(BACKGROUND_KEY.to_string(), vec![track]);
        }

        let registrar_name = match session {
            Some(s) => s.display_name.clone(),
            None if self.source == Source::Public => "مراجعه کننده".to_string(),
            None => "نامشخص".to_string(),
        };
        let registrar_username = session.filter(|s| s.is_staff()).map(|s| s.username.clone());

        let id = match &self.intent {
            SaveIntent::Create => None,
            SaveIntent::UpdateExisting(id) => Some(id.clone()),
        };
        info!(?status, update = id.is_some(), "built survey submission");

        SaveRequest {
            id,
            source: self.source,
            survey_type: self.survey_type,
            registrar_username,
            registrar_name: Some(registrar_name),
            status,
            patient_info,
            insurance_info: self.insurance_info.clone(),
            clinical_info: self.clinical_info.clone(),
            discharge_info: self.discharge_info.clone(),
            ward: self.ward.clone(),
            answers,
            audio_files,
        }
    }
}
