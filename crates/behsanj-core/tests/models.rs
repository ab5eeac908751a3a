use behsanj_core::models::{
    AnswerValue, Feedback, PasswordPolicy, Role, Settings, Source, SurveyType,
    find_latest_by_national_id, visible_questions,
};
use behsanj_core::session::{AuthError, Session};

fn record(id: &str, national_id: &str, created_at: &str) -> Feedback {
    let json = serde_json::json!({
        "id": id,
        "trackingId": 1000,
        "source": "staff",
        "status": "final",
        "patientInfo": {
            "name": "بیمار تست",
            "nationalId": national_id,
            "gender": "Male",
            "birthDate": "1360/01/01",
            "mobile": "09123456789",
            "address": "",
            "admissionDate": "1403/01/01"
        },
        "insuranceInfo": { "type": "None", "name": "" },
        "clinicalInfo": { "reason": "", "doctor": "", "hasSurgery": false },
        "dischargeInfo": { "isDischarged": false },
        "ward": "ECU 1",
        "answers": {},
        "createdAt": created_at,
        "lastModified": created_at
    });
    serde_json::from_value(json).unwrap()
}

#[test]
fn answers_deserialize_untagged() {
    let mut rec = record("a", "1111111111", "2024-04-01T10:00:00Z");
    let answers: std::collections::HashMap<String, AnswerValue> = serde_json::from_value(
        serde_json::json!({ "q1": true, "q_nps": 7, "q_comment": "خیلی خوب بود" }),
    )
    .unwrap();
    rec.answers = answers;

    assert_eq!(rec.answers["q1"].as_bool(), Some(true));
    assert_eq!(rec.answers["q_nps"].as_number(), Some(7.0));
    assert_eq!(rec.answers["q_comment"].as_text(), Some("خیلی خوب بود"));
    assert!(rec.answers["q_comment"].non_empty_text().is_some());
    assert_eq!(AnswerValue::from("  ").non_empty_text(), None);
}

#[test]
fn legacy_single_audio_value_normalizes_to_list() {
    let mut json = serde_json::to_value(record("a", "1111111111", "2024-04-01T10:00:00Z")).unwrap();
    json["audioFiles"] = serde_json::json!({
        "address": "data:audio/webm;base64,AAAA",
        "q_comment": ["data:audio/webm;base64,BBBB", "data:audio/webm;base64,CCCC"]
    });

    let rec: Feedback = serde_json::from_value(json).unwrap();
    assert_eq!(rec.audio_files["address"], vec!["data:audio/webm;base64,AAAA"]);
    assert_eq!(rec.audio_files["q_comment"].len(), 2);
}

#[test]
fn latest_record_wins_national_id_lookup() {
    let records = vec![
        record("old", "1111111111", "2024-01-01T08:00:00Z"),
        record("other", "2222222222", "2024-03-01T08:00:00Z"),
        record("newest", "1111111111", "2024-05-01T08:00:00Z"),
    ];
    let found = find_latest_by_national_id(&records, "1111111111").unwrap();
    assert_eq!(found.id, "newest");
    assert!(find_latest_by_national_id(&records, "9999999999").is_none());
}

#[test]
fn question_visibility_per_source_and_flow() {
    let settings = Settings::default_client();

    // Public discharge flow: inpatient-only questions hidden.
    let discharge =
        visible_questions(&settings.questions, Source::Public, Some(SurveyType::Discharge));
    assert!(discharge.iter().all(|q| q.id != "q12" && q.id != "q13"));
    assert!(discharge.iter().any(|q| q.id == "q1"));
    assert!(discharge.iter().any(|q| q.id == "q_nps"));

    // Inpatient flow: discharge-only questions hidden.
    let inpatient =
        visible_questions(&settings.questions, Source::Staff, Some(SurveyType::Inpatient));
    assert!(inpatient.iter().all(|q| q.id != "q1"));
    assert!(inpatient.iter().any(|q| q.id == "q12"));

    // No declared flow (staff phone entry): everything, in display order.
    let all = visible_questions(&settings.questions, Source::Staff, None);
    assert_eq!(all.len(), settings.questions.len());
    assert!(all.windows(2).all(|w| w[0].order <= w[1].order));
}

#[test]
fn default_critical_set_matches_legacy_ids() {
    let settings = Settings::default_client();
    let critical: Vec<&str> = settings
        .questions
        .iter()
        .filter(|q| q.is_critical)
        .map(|q| q.id.as_str())
        .collect();
    assert_eq!(critical, ["q1", "q2", "q3", "q4", "q5", "q6", "q7"]);
}

#[test]
fn password_policy_matrix() {
    let settings = Settings::default_client();
    let policy = PasswordPolicy::default();
    let by_name = |u: &str| settings.find_user(u).unwrap();

    // Anyone may change their own password.
    assert!(policy.can_change(by_name("mahlouji"), by_name("mahlouji")));
    assert!(policy.can_change(by_name("farid"), by_name("farid")));

    // The self-only account may not touch anyone else.
    assert!(!policy.can_change(by_name("mahlouji"), by_name("farid")));

    // Managers and the supervisor may change unprotected accounts only.
    assert!(policy.can_change(by_name("matlabi"), by_name("farid")));
    assert!(policy.can_change(by_name("mostafavi"), by_name("sec")));
    assert!(!policy.can_change(by_name("matlabi"), by_name("kand")));
    assert!(!policy.can_change(by_name("mostafavi"), by_name("mahlouji")));

    // Plain staff may not change other accounts.
    assert!(!policy.can_change(by_name("farid"), by_name("sec")));
}

#[test]
fn password_change_precheck_resolves_the_target_by_id() {
    let settings = Settings::default_client();
    let policy = PasswordPolicy::default();

    // The change form sends the target's user id, not the username.
    assert!(settings.may_change_password(&policy, "mahlouji", "admin3"));
    assert!(settings.may_change_password(&policy, "matlabi", "staff2"));
    assert!(!settings.may_change_password(&policy, "matlabi", "admin2"));

    // Unknown users on either side are a denial, not a panic.
    assert!(!settings.may_change_password(&policy, "matlabi", "ghost"));
    assert!(!settings.may_change_password(&policy, "nobody", "staff2"));
}

#[test]
fn login_checks_password_only_when_enabled() {
    let mut settings = Settings::default_client();

    let session = Session::login(&settings, "farid", None).unwrap();
    assert_eq!(session.role, Role::Staff);
    assert!(session.is_staff());

    let farid = settings.users.iter_mut().find(|u| u.username == "farid").unwrap();
    farid.is_password_enabled = true;
    farid.password = Some("secret".to_string());

    assert_eq!(
        Session::login(&settings, "farid", None).unwrap_err(),
        AuthError::WrongPassword("farid".to_string())
    );
    assert!(Session::login(&settings, "farid", Some("secret")).is_ok());
    assert_eq!(
        Session::login(&settings, "nobody", None).unwrap_err(),
        AuthError::UnknownUser("nobody".to_string())
    );
}

#[test]
fn developer_login_falls_back_to_default_password() {
    let mut settings = Settings::default_client();
    assert!(Session::developer(&settings, "111").is_ok());
    assert_eq!(
        Session::developer(&settings, "222").unwrap_err(),
        AuthError::WrongDeveloperPassword
    );

    settings.developer_password = Some("hunter2".to_string());
    assert!(Session::developer(&settings, "hunter2").is_ok());
    assert!(Session::developer(&settings, "111").is_err());
}
