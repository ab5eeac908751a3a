use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use super::answer::AnswerValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Status {
    /// Incomplete staff-entered record awaiting full survey completion.
    Draft,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Source {
    Public,
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SurveyType {
    Inpatient,
    Discharge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PatientInfo {
    pub name: String,
    pub national_id: String,
    pub gender: Gender,
    /// Persian `Y/MM/DD` date string.
    pub birth_date: String,
    pub mobile: String,
    pub address: String,
    /// Persian `Y/MM/DD` date string.
    pub admission_date: String,
}

impl Default for PatientInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            national_id: String::new(),
            gender: Gender::Male,
            birth_date: String::new(),
            mobile: String::new(),
            address: String::new(),
            admission_date: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum InsuranceType {
    SocialSecurity,
    Supplementary,
    Both,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InsuranceInfo {
    #[serde(rename = "type")]
    pub insurance_type: InsuranceType,
    pub name: String,
}

impl Default for InsuranceInfo {
    fn default() -> Self {
        Self {
            insurance_type: InsuranceType::None,
            name: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClinicalInfo {
    pub reason: String,
    pub doctor: String,
    pub has_surgery: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surgeon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surgery_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DischargeType {
    DoctorOrder,
    PersonalConsent,
    Death,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DischargeInfo {
    pub is_discharged: bool,
    /// Persian `Y/MM/DD` date string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub discharge_type: Option<DischargeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
}

/// One survey submission. `id` is assigned by the backend on first save;
/// `tracking_id` is shown to the submitter and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Feedback {
    pub id: String,
    pub tracking_id: i64,
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_type: Option<SurveyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar_name: Option<String>,
    pub status: Status,
    pub patient_info: PatientInfo,
    pub insurance_info: InsuranceInfo,
    pub clinical_info: ClinicalInfo,
    pub discharge_info: DischargeInfo,
    pub ward: String,
    #[serde(default)]
    pub answers: HashMap<String, AnswerValue>,
    /// Audio takes per question id (plus `address` and `background`), as data
    /// URIs. Legacy records stored a bare string for single takes; that shape
    /// is still accepted on input.
    #[serde(default, deserialize_with = "audio_file_map")]
    pub audio_files: HashMap<String, Vec<String>>,
    pub created_at: jiff::Timestamp,
    pub last_modified: jiff::Timestamp,
}

fn audio_file_map<'de, D>(deserializer: D) -> Result<HashMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let raw: HashMap<String, OneOrMany> = HashMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, takes)| {
            let takes = match takes {
                OneOrMany::One(uri) => vec![uri],
                OneOrMany::Many(uris) => uris,
            };
            (key, takes)
        })
        .collect())
}

/// What a survey flow hands the store. Without an `id` the store creates a
/// record and assigns `id`/`tracking_id`; with one it updates in place.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaveRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_type: Option<SurveyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar_name: Option<String>,
    pub status: Status,
    pub patient_info: PatientInfo,
    pub insurance_info: InsuranceInfo,
    pub clinical_info: ClinicalInfo,
    pub discharge_info: DischargeInfo,
    pub ward: String,
    pub answers: HashMap<String, AnswerValue>,
    pub audio_files: HashMap<String, Vec<String>>,
}

/// The record the national-id autofill offers: same national id, most
/// recently created wins.
pub fn find_latest_by_national_id<'a>(
    records: &'a [Feedback],
    national_id: &str,
) -> Option<&'a Feedback> {
    records
        .iter()
        .filter(|f| f.patient_info.national_id == national_id)
        .max_by_key(|f| f.created_at)
}
