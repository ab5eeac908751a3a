pub mod answer;
pub mod feedback;
pub mod question;
pub mod settings;
pub mod user;

pub use answer::AnswerValue;
pub use feedback::{
    ClinicalInfo, DischargeInfo, DischargeType, Feedback, Gender, InsuranceInfo, InsuranceType,
    PatientInfo, SaveRequest, Source, Status, SurveyType, find_latest_by_national_id,
};
pub use question::{
    QuestionCategory, QuestionType, QuestionVisibility, SurveyQuestion, visible_questions,
};
pub use settings::{LogLevel, Settings, SystemLog, TranscriptionMode};
pub use user::{AppUser, PasswordPolicy, Role};
