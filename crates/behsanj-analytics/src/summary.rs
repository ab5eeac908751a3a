use serde::Serialize;
use ts_rs::TS;

use behsanj_core::models::{Feedback, QuestionType, SurveyQuestion};

/// Average Likert score for one question, keyed by question text. Two
/// questions with identical text merge into one entry; that is long-standing
/// dashboard behavior and kept as-is.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryScore {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct YesNoStat {
    pub id: String,
    pub text: String,
    pub yes_count: usize,
    pub no_count: usize,
    /// Rounded percentage over yes+no responses; 0 when nobody answered.
    pub yes_percent: i32,
    pub no_percent: i32,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TextComment {
    /// Id of the record the comment came from.
    pub id: String,
    pub comment: String,
    pub patient_name: String,
    pub date: jiff::Timestamp,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuestionComments {
    pub id: String,
    pub text: String,
    pub comments: Vec<TextComment>,
}

/// Summary statistics over a (pre-filtered) record set.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Analytics {
    pub total_count: usize,
    /// Mean of all numeric Likert answers, one decimal; 0 when none exist.
    pub average_satisfaction: f64,
    /// `round((promoters - detractors) / responses * 100)`; promoter ≥ 9,
    /// detractor ≤ 6, passives count only in the denominator.
    pub nps_score: i32,
    pub urgent_follow_ups: usize,
    pub urgent_list: Vec<Feedback>,
    pub category_data: Vec<CategoryScore>,
    pub yes_no_stats: Vec<YesNoStat>,
    pub text_comments: Vec<QuestionComments>,
}

const LIKERT_URGENT_MAX: f64 = 2.0;
const NPS_DETRACTOR_MAX: f64 = 6.0;
const NPS_PROMOTER_MIN: f64 = 9.0;

/// Aggregate a record set against a question schema.
pub fn summarize(records: &[Feedback], questions: &[SurveyQuestion]) -> Analytics {
    let likert: Vec<&SurveyQuestion> = by_type(questions, QuestionType::Likert);
    let nps: Vec<&SurveyQuestion> = by_type(questions, QuestionType::Nps);

    let mut score_sum = 0.0;
    let mut score_count = 0usize;
    let mut promoters = 0i64;
    let mut detractors = 0i64;
    let mut nps_count = 0i64;

    // First-occurrence order of question texts, merging duplicates.
    let mut categories: Vec<(String, f64, usize)> = Vec::new();

    for record in records {
        for q in &likert {
            let Some(value) = record.answers.get(&q.id).and_then(|a| a.as_number()) else {
                continue;
            };
            score_sum += value;
            score_count += 1;
            match categories.iter_mut().find(|(name, _, _)| *name == q.text) {
                Some((_, sum, count)) => {
                    *sum += value;
                    *count += 1;
                }
                None => categories.push((q.text.clone(), value, 1)),
            }
        }
        for q in &nps {
            let Some(value) = record.answers.get(&q.id).and_then(|a| a.as_number()) else {
                continue;
            };
            nps_count += 1;
            if value >= NPS_PROMOTER_MIN {
                promoters += 1;
            }
            if value <= NPS_DETRACTOR_MAX {
                detractors += 1;
            }
        }
    }

    let average_satisfaction = if score_count > 0 {
        round1(score_sum / score_count as f64)
    } else {
        0.0
    };
    let nps_score = if nps_count > 0 {
        ((promoters - detractors) as f64 / nps_count as f64 * 100.0).round() as i32
    } else {
        0
    };

    let category_data = categories
        .into_iter()
        .map(|(name, sum, count)| CategoryScore { name, value: round1(sum / count as f64) })
        .collect();

    let yes_no_stats = by_type(questions, QuestionType::YesNo)
        .into_iter()
        .map(|q| {
            let mut yes = 0usize;
            let mut no = 0usize;
            for record in records {
                match record.answers.get(&q.id).and_then(|a| a.as_bool()) {
                    Some(true) => yes += 1,
                    Some(false) => no += 1,
                    None => {}
                }
            }
            let total = yes + no;
            let percent = |n: usize| {
                if total > 0 {
                    (n as f64 / total as f64 * 100.0).round() as i32
                } else {
                    0
                }
            };
            YesNoStat {
                id: q.id.clone(),
                text: q.text.clone(),
                yes_count: yes,
                no_count: no,
                yes_percent: percent(yes),
                no_percent: percent(no),
            }
        })
        .collect();

    let text_comments = by_type(questions, QuestionType::Text)
        .into_iter()
        .filter_map(|q| {
            let comments: Vec<TextComment> = records
                .iter()
                .filter_map(|record| {
                    let comment = record.answers.get(&q.id)?.non_empty_text()?;
                    Some(TextComment {
                        id: record.id.clone(),
                        comment: comment.to_string(),
                        patient_name: record.patient_info.name.clone(),
                        date: record.created_at,
                    })
                })
                .collect();
            (!comments.is_empty()).then(|| QuestionComments {
                id: q.id.clone(),
                text: q.text.clone(),
                comments,
            })
        })
        .collect();

    let urgent_list: Vec<Feedback> = records
        .iter()
        .filter(|r| is_urgent(r, questions))
        .cloned()
        .collect();

    Analytics {
        total_count: records.len(),
        average_satisfaction,
        nps_score,
        urgent_follow_ups: urgent_list.len(),
        urgent_list,
        category_data,
        yes_no_stats,
        text_comments,
    }
}

/// A record needs urgent follow-up when any Likert answer is ≤ 2, any NPS
/// answer is ≤ 6, or any question marked critical was answered "no".
pub fn is_urgent(record: &Feedback, questions: &[SurveyQuestion]) -> bool {
    questions.iter().any(|q| {
        let Some(answer) = record.answers.get(&q.id) else {
            return false;
        };
        match q.question_type {
            QuestionType::Likert => {
                answer.as_number().is_some_and(|v| v <= LIKERT_URGENT_MAX)
            }
            QuestionType::Nps => answer.as_number().is_some_and(|v| v <= NPS_DETRACTOR_MAX),
            _ => q.is_critical && answer.as_bool() == Some(false),
        }
    })
}

fn by_type(questions: &[SurveyQuestion], question_type: QuestionType) -> Vec<&SurveyQuestion> {
    questions.iter().filter(|q| q.question_type == question_type).collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
