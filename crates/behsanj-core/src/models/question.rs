use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::feedback::{Source, SurveyType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionType {
    YesNo,
    /// 1–5 ordinal satisfaction scale.
    Likert,
    Text,
    /// 0–10 "likelihood to recommend".
    Nps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionVisibility {
    All,
    StaffOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionCategory {
    All,
    Inpatient,
    Discharge,
}

impl Default for QuestionCategory {
    fn default() -> Self {
        Self::All
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SurveyQuestion {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Display sort key.
    pub order: i32,
    pub visibility: QuestionVisibility,
    #[serde(default)]
    pub category: QuestionCategory,
    /// A `false` answer to a critical question flags the record for urgent
    /// follow-up. Replaces the old hardcoded question-id list; absent in
    /// records written before the field existed, hence the default.
    #[serde(default)]
    pub is_critical: bool,
}

impl SurveyQuestion {
    /// Whether this question is shown for a given submission source and
    /// survey flow.
    pub fn visible_for(&self, source: Source, survey_type: Option<SurveyType>) -> bool {
        if self.visibility == QuestionVisibility::StaffOnly && source != Source::Staff {
            return false;
        }
        match (self.category, survey_type) {
            (QuestionCategory::All, _) | (_, None) => true,
            (QuestionCategory::Inpatient, Some(st)) => st == SurveyType::Inpatient,
            (QuestionCategory::Discharge, Some(st)) => st == SurveyType::Discharge,
        }
    }
}

/// The question subset a survey flow presents, in display order.
pub fn visible_questions(
    questions: &[SurveyQuestion],
    source: Source,
    survey_type: Option<SurveyType>,
) -> Vec<&SurveyQuestion> {
    let mut visible: Vec<&SurveyQuestion> = questions
        .iter()
        .filter(|q| q.visible_for(source, survey_type))
        .collect();
    visible.sort_by_key(|q| q.order);
    visible
}
