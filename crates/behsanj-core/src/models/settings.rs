use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::question::{QuestionCategory, QuestionType, QuestionVisibility, SurveyQuestion};
use super::user::{AppUser, PasswordPolicy, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TranscriptionMode {
    /// Server-side IOType provider.
    Iotype,
    /// In-browser speech recognition; no server call involved.
    Browser,
    /// Server-side Gemini provider with a rotating key list.
    Gemini,
}

impl Default for TranscriptionMode {
    fn default() -> Self {
        Self::Iotype
    }
}

/// Process-wide configuration: brand, credentials, transcription provider,
/// the user roster, and the ordered question list. Loaded once per session,
/// mutated only through explicit saves.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Settings {
    pub brand_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iotype_api_key: Option<String>,
    #[serde(default)]
    pub gemini_api_keys: Vec<String>,
    #[serde(default)]
    pub transcription_mode: TranscriptionMode,
    pub users: Vec<AppUser>,
    pub questions: Vec<SurveyQuestion>,
    #[serde(default)]
    pub enabled_icons: Vec<String>,
}

impl Settings {
    /// The shipped defaults, used when neither the backend nor the local
    /// mirror has a settings document yet. The first seven discharge
    /// questions are the critical set for urgent follow-up detection.
    pub fn default_client() -> Self {
        Self {
            brand_name: "سامانه جهان امید سلامت".to_string(),
            developer_password: Some("111".to_string()),
            iotype_api_key: None,
            gemini_api_keys: Vec::new(),
            transcription_mode: TranscriptionMode::Iotype,
            users: default_users(),
            questions: default_questions(),
            enabled_icons: Vec::new(),
        }
    }

    pub fn find_user(&self, username: &str) -> Option<&AppUser> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn find_user_by_id(&self, id: &str) -> Option<&AppUser> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Client-side precheck for the password-change form. The change request
    /// carries the target's user id and the current session's username; an
    /// unknown side of either pair is a denial. The backend applies the same
    /// policy and stays authoritative.
    pub fn may_change_password(
        &self,
        policy: &PasswordPolicy,
        current_username: &str,
        target_user_id: &str,
    ) -> bool {
        match (self.find_user(current_username), self.find_user_by_id(target_user_id)) {
            (Some(current), Some(target)) => policy.can_change(current, target),
            _ => false,
        }
    }
}

fn default_users() -> Vec<AppUser> {
    let user = |id: &str, username: &str, name: &str, role: Role, title: &str, order, color: &str| {
        AppUser {
            id: id.to_string(),
            username: username.to_string(),
            name: name.to_string(),
            role,
            title: Some(title.to_string()),
            order: Some(order),
            password: Some(String::new()),
            is_password_enabled: false,
            avatar_color: Some(color.to_string()),
        }
    };
    vec![
        user("admin1", "matlabi", "آقای مطلبی", Role::Admin, "مدیر اصلی", 1, "bg-blue-600"),
        user("admin2", "kand", "آقای کاند", Role::Admin, "مدیر اصلی", 2, "bg-indigo-600"),
        user("admin3", "mahlouji", "آقای مهلوجی", Role::Admin, "مسئول مالی", 3, "bg-teal-600"),
        user("staff1", "mostafavi", "آقای مصطفوی", Role::Admin, "سوپروایزر", 4, "bg-cyan-600"),
        user("staff2", "farid", "خانم فرید", Role::Staff, "پرسنل", 5, "bg-pink-500"),
        user("staff3", "sec", "منشی‌ها", Role::Staff, "منشی بخش", 6, "bg-purple-500"),
    ]
}

fn default_questions() -> Vec<SurveyQuestion> {
    use QuestionCategory::{All, Discharge, Inpatient};
    use QuestionType::{Likert, Nps, Text, YesNo};

    let q = |id: &str, order, question_type, text: &str, category, is_critical| SurveyQuestion {
        id: id.to_string(),
        text: text.to_string(),
        question_type,
        order,
        visibility: QuestionVisibility::All,
        category,
        is_critical,
    };
    vec![
        q("q1", 1, YesNo, "آیا آموزش‌های حین ترخیص به بیمار داده شده است؟", Discharge, true),
        q("q2", 2, YesNo, "آیا بیمار از نوع رژیم غذایی خود اطلاع دارد؟", Discharge, true),
        q("q3", 3, YesNo, "آیا بیمار از نحوه مصرف داروهای خود در منزل اطلاع دارد؟", Discharge, true),
        q("q4", 4, YesNo, "آیا بیمار وضعیت حرکتی خود در منزل را می‌داند؟", Discharge, true),
        q("q5", 5, YesNo, "آیا زمان و مکان مراجعه مجدد به پزشک را می‌دانید؟", Discharge, true),
        q("q6", 6, YesNo, "آیا مراقبت‌های لازم در منزل (زخم، عضو آسیب دیده و...) را می‌دانید؟", Discharge, true),
        q("q7", 7, YesNo, "(در صورت جراحی) آیا محل عمل فاقد قرمزی و ترشح است؟", Discharge, true),
        q("q8", 8, YesNo, "آیا آموزش و راهنمایی‌های ارائه شده واضح بود؟", All, false),
        q("q9", 9, YesNo, "آیا اطلاعات ارائه شده توسط پزشکان کامل و قابل قبول بود؟", All, false),
        q("q10", 10, YesNo, "آیا از آموزش‌های پزشک در بخش رضایت دارید؟", All, false),
        q("q11", 11, YesNo, "آیا از آموزش‌های پرستار در بخش رضایت دارید؟", All, false),
        q("q12", 12, YesNo, "آیا از اقدامات واحد پذیرش و توضیحات آن رضایت دارید؟", Inpatient, false),
        q("q13", 13, YesNo, "آیا از عملکرد اورژانس (از ورود تا بستری در بخش/ICU) رضایت دارید؟", Inpatient, false),
        q("q14", 14, YesNo, "آیا از واحد ترخیص و مالی و توضیحات آن رضایت دارید؟", Discharge, false),
        q("q15", 15, YesNo, "آیا به طور کلی از خدمات بیمارستان راضی بودید؟", Discharge, false),
        q("q16", 16, YesNo, "آیا نیاز به آموزش مجدد دارید؟", Discharge, false),
        q("q17", 17, YesNo, "آیا به ادامه پیگیری تلفنی تمایل دارید؟", All, false),
        q("q_cleaning", 18, Likert, "نظافت اتاق و سرویس", All, false),
        q("q_response", 19, Likert, "سرعت پاسخگویی به احضار", All, false),
        q("q_food", 20, Likert, "کیفیت غذای بیمار", All, false),
        q("q_nps", 21, Nps, "چقدر احتمال دارد این بیمارستان را به دیگران معرفی کنید؟", All, false),
        q("q_comment", 22, Text, "نظرات و پیشنهادات تکمیلی", All, false),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LogLevel {
    #[serde(rename = "INFO")]
    Info,
    #[serde(rename = "WARN")]
    Warn,
    #[serde(rename = "ERROR")]
    Error,
}

/// One entry in the client-side system log ring buffer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SystemLog {
    pub timestamp: jiff::Timestamp,
    #[serde(rename = "type")]
    pub level: LogLevel,
    pub message: String,
}
