use std::collections::HashMap;

use behsanj_core::models::{
    AnswerValue, ClinicalInfo, DischargeInfo, Feedback, InsuranceInfo, InsuranceType, PatientInfo,
    Settings, Source, Status, SurveyType,
};
use behsanj_core::session::Session;
use behsanj_form::{DraftChoice, Field, RecordingSession, SaveIntent, SurveyWizard};

fn filled_staff_wizard() -> SurveyWizard {
    let mut w = SurveyWizard::new(Source::Staff, None);
    w.patient_info = PatientInfo {
        name: "علی رضایی".to_string(),
        national_id: "0012345678".to_string(),
        gender: behsanj_core::models::Gender::Male,
        birth_date: "1360/05/10".to_string(),
        mobile: "09123456789".to_string(),
        address: "تهران".to_string(),
        admission_date: "1403/05/01".to_string(),
    };
    w.insurance_info = InsuranceInfo {
        insurance_type: InsuranceType::SocialSecurity,
        name: "تامین اجتماعی".to_string(),
    };
    w.clinical_info = ClinicalInfo {
        reason: "جراحی".to_string(),
        doctor: "دکتر احمدی".to_string(),
        has_surgery: false,
        surgeon: None,
        surgery_type: None,
    };
    w
}

fn saved_record() -> Feedback {
    Feedback {
        id: "existing-id".to_string(),
        tracking_id: 1007,
        source: Source::Staff,
        survey_type: None,
        registrar_username: Some("farid".to_string()),
        registrar_name: Some("فرید".to_string()),
        status: Status::Draft,
        patient_info: PatientInfo {
            name: "مریم حسینی".to_string(),
            national_id: "1234567890".to_string(),
            gender: behsanj_core::models::Gender::Female,
            birth_date: "1370/01/01".to_string(),
            mobile: "09351234567".to_string(),
            address: "اصفهان".to_string(),
            admission_date: "1403/04/20".to_string(),
        },
        insurance_info: InsuranceInfo::default(),
        clinical_info: ClinicalInfo::default(),
        discharge_info: DischargeInfo::default(),
        ward: "ICU".to_string(),
        answers: HashMap::from([
            ("q1".to_string(), AnswerValue::from(true)),
            ("comments".to_string(), AnswerValue::from("نظر قبلی")),
        ]),
        audio_files: HashMap::new(),
        created_at: "2024-07-15T09:00:00Z".parse().unwrap(),
        last_modified: "2024-07-15T09:00:00Z".parse().unwrap(),
    }
}

#[test]
fn new_form_defaults() {
    let w = SurveyWizard::new(Source::Staff, None);
    assert_eq!(w.step(), 1);
    assert_eq!(w.ward, "ECU 1");
    assert!(!w.patient_info.admission_date.is_empty());
    assert!(!w.discharge_info.is_discharged);
    assert_eq!(*w.intent(), SaveIntent::Create);

    let discharge = SurveyWizard::new(Source::Public, Some(SurveyType::Discharge));
    assert!(discharge.discharge_info.is_discharged);
}

#[test]
fn advance_blocks_on_empty_staff_form() {
    let mut w = SurveyWizard::new(Source::Staff, None);
    assert!(!w.advance());
    assert_eq!(w.step(), 1);
    assert!(w.has_error(Field::Name));
    assert!(w.has_error(Field::NationalId));
    assert!(w.has_error(Field::Mobile));
}

#[test]
fn missing_surgeon_jumps_to_step_three() {
    let mut w = filled_staff_wizard();
    w.clinical_info.has_surgery = true;

    // The next button validates the whole form, so even advancing from step 1
    // jumps straight to the incomplete surgery block.
    assert!(!w.advance());
    assert_eq!(w.step(), 3);
    assert!(w.has_error(Field::Surgeon));

    let err = w.finalize(None).unwrap_err();
    assert_eq!(err.step, 3);
    assert!(err.fields.contains(&Field::Surgeon));
    assert!(err.fields.contains(&Field::SurgeryType));
    assert_eq!(w.step(), 3);

    w.clinical_info.surgeon = Some("دکتر کریمی".to_string());
    w.clinical_info.surgery_type = Some("آپاندیس".to_string());
    assert!(w.finalize(None).is_ok());
}

#[test]
fn discharge_block_validated_when_marked() {
    let mut w = filled_staff_wizard();
    w.discharge_info.is_discharged = true;
    w.discharge_info.date = None;

    let err = w.finalize(None).unwrap_err();
    assert_eq!(err.step, 4);
    assert!(err.fields.contains(&Field::DischargeDate));
    assert!(err.fields.contains(&Field::DischargeDoctor));
    assert!(err.fields.contains(&Field::DischargeType));
}

#[test]
fn public_form_only_checks_mobile_format() {
    let mut w = SurveyWizard::new(Source::Public, Some(SurveyType::Discharge));
    assert!(w.finalize(None).is_ok());

    let mut w = SurveyWizard::new(Source::Public, Some(SurveyType::Discharge));
    w.patient_info.mobile = "12345".to_string();
    let err = w.finalize(None).unwrap_err();
    assert_eq!(err.fields, vec![Field::Mobile]);

    w.patient_info.mobile = "09123456789".to_string();
    assert!(w.finalize(None).is_ok());
}

#[test]
fn back_never_goes_below_step_one() {
    let mut w = filled_staff_wizard();
    assert!(w.advance());
    assert_eq!(w.step(), 2);
    w.back();
    w.back();
    w.back();
    assert_eq!(w.step(), 1);
}

#[test]
fn autofill_forces_a_new_record() {
    let record = saved_record();
    let mut w = SurveyWizard::edit(&record);
    assert_eq!(*w.intent(), SaveIntent::UpdateExisting("existing-id".to_string()));

    w.autofill_from(&record);
    assert_eq!(*w.intent(), SaveIntent::Create);
    assert_eq!(w.patient_info.name, "مریم حسینی");
    assert_eq!(w.insurance_info.name, record.insurance_info.name);

    // Demographics copy over but the rest of the dossier starts fresh in a
    // new form; here only the intent matters for the save.
    w.clinical_info.reason = "معاینه".to_string();
    w.clinical_info.doctor = "دکتر احمدی".to_string();
    w.insurance_info.name = "آزاد".to_string();
    let request = w.finalize(None).unwrap();
    assert_eq!(request.id, None);
}

#[test]
fn editing_extracts_comments_and_keeps_id() {
    let record = saved_record();
    let mut w = SurveyWizard::edit(&record);
    assert_eq!(w.comments, "نظر قبلی");
    assert!(!w.answers.contains_key("comments"));

    w.comments = "نظر جدید".to_string();
    let request = w.save_draft(DraftChoice::CompleteLater, None).unwrap();
    assert_eq!(request.id.as_deref(), Some("existing-id"));
    assert_eq!(request.answers["comments"], AnswerValue::from("نظر جدید"));
    assert_eq!(request.answers["q1"], AnswerValue::from(true));
}

#[test]
fn smart_draft_choices() {
    let mut w = filled_staff_wizard();
    let draft = w.save_draft(DraftChoice::CompleteLater, None).unwrap();
    assert_eq!(draft.status, Status::Draft);

    // Demographics-only finalizes even though the survey answers are empty.
    let mut w = SurveyWizard::new(Source::Staff, None);
    w.patient_info.name = "علی رضایی".to_string();
    w.patient_info.national_id = "0012345678".to_string();
    w.patient_info.mobile = "09123456789".to_string();
    let done = w.save_draft(DraftChoice::DemographicsOnly, None).unwrap();
    assert_eq!(done.status, Status::Final);

    let mut w = SurveyWizard::new(Source::Staff, None);
    let err = w.save_draft(DraftChoice::CompleteLater, None).unwrap_err();
    assert_eq!(err.step, 1);
}

#[test]
fn submission_normalizes_persian_digits() {
    let mut w = filled_staff_wizard();
    w.patient_info.national_id = "۰۰۱۲۳۴۵۶۷۸".to_string();
    w.patient_info.mobile = "۰۹۱۲۳۴۵۶۷۸۹".to_string();
    w.set_answer("q1", true);
    w.set_answer("q_nps", 9i64);
    w.comments = "راضی بودم".to_string();

    assert_eq!(w.lookup_national_id().as_deref(), Some("0012345678"));
    let request = w.finalize(None).unwrap();
    assert_eq!(request.patient_info.national_id, "0012345678");
    assert_eq!(request.patient_info.mobile, "09123456789");
    assert_eq!(request.answers["q1"], AnswerValue::from(true));
    assert_eq!(request.answers["q_nps"], AnswerValue::from(9.0));
    assert_eq!(request.answers["comments"], AnswerValue::from("راضی بودم"));
}

#[test]
fn lookup_requires_ten_digits() {
    let mut w = SurveyWizard::new(Source::Staff, None);
    w.patient_info.national_id = "۱۲۳".to_string();
    assert_eq!(w.lookup_national_id(), None);
}

#[test]
fn audio_takes_accumulate_and_remove_individually() {
    let mut w = SurveyWizard::new(Source::Staff, None);
    w.append_audio("q_comment", "data:audio/webm;base64,AAAA".to_string());
    w.append_audio("q_comment", "data:audio/webm;base64,BBBB".to_string());
    assert_eq!(w.audio_files["q_comment"].len(), 2);

    w.remove_audio("q_comment", 0);
    assert_eq!(w.audio_files["q_comment"], vec!["data:audio/webm;base64,BBBB"]);
    w.remove_audio("q_comment", 0);
    assert!(!w.audio_files.contains_key("q_comment"));
}

#[test]
fn ambient_track_attaches_to_one_submission() {
    let mut w = filled_staff_wizard();
    assert!(w.ambient.start());
    assert!(!w.ambient.start());
    w.ambient.stop("data:audio/webm;base64,CCCC".to_string());

    let first = w.finalize(None).unwrap();
    assert_eq!(first.audio_files["background"], vec!["data:audio/webm;base64,CCCC"]);

    let second = w.finalize(None).unwrap();
    assert!(!second.audio_files.contains_key("background"));
}

#[test]
fn stop_without_start_is_ignored() {
    let mut session = RecordingSession::new();
    session.stop("data:audio/webm;base64,DDDD".to_string());
    assert_eq!(session.flush(), None);
}

#[test]
fn registrar_fields_follow_the_session() {
    let settings = Settings::default_client();
    let staff = Session::login(&settings, "farid", None).unwrap();
    let admin = Session::login(&settings, "matlabi", None).unwrap();

    let mut w = filled_staff_wizard();
    let request = w.finalize(Some(&staff)).unwrap();
    assert_eq!(request.registrar_username.as_deref(), Some("farid"));
    assert_eq!(request.registrar_name, Some(staff.display_name.clone()));

    // Admin entries carry a display name but no registrar username.
    let mut w = filled_staff_wizard();
    let request = w.finalize(Some(&admin)).unwrap();
    assert_eq!(request.registrar_username, None);

    let mut w = SurveyWizard::new(Source::Public, None);
    let request = w.finalize(None).unwrap();
    assert_eq!(request.registrar_name.as_deref(), Some("مراجعه کننده"));
}
