use behsanj_core::jalali::{
    Age, JalaliDate, date_to_absolute_days, exact_age, is_leap, stay_duration_days,
    to_english_digits, to_persian_digits,
};

#[test]
fn leap_rule_spot_checks() {
    // Values fixed by the 2820-cycle formula, not the astronomical calendar.
    assert!(is_leap(1399));
    assert!(!is_leap(1398));
    assert!(!is_leap(1400));
}

#[test]
fn absolute_days_month_lengths() {
    // Months 1..=6 have 31 days, 7..=12 have 30.
    let base = date_to_absolute_days("1403/01/01");
    assert_eq!(date_to_absolute_days("1403/01/31") - base, 30);
    assert_eq!(date_to_absolute_days("1403/07/01") - base, 6 * 31);
    assert_eq!(
        date_to_absolute_days("1403/12/01") - date_to_absolute_days("1403/07/01"),
        5 * 30
    );
}

#[test]
fn absolute_days_unparseable_is_zero() {
    assert_eq!(date_to_absolute_days(""), 0);
    assert_eq!(date_to_absolute_days("not a date"), 0);
    assert_eq!(date_to_absolute_days("1403-01-01"), 0);
}

#[test]
fn stay_duration_can_be_negative() {
    assert_eq!(stay_duration_days("1403/02/10", "1403/02/13"), 3);
    assert_eq!(stay_duration_days("1403/02/13", "1403/02/10"), -3);
    assert_eq!(stay_duration_days("1403/02/10", "1403/02/10"), 0);
}

#[test]
fn gregorian_conversion_known_dates() {
    let pairs = [
        (JalaliDate::new(1403, 1, 1), jiff::civil::date(2024, 3, 20)),
        (JalaliDate::new(1403, 12, 30), jiff::civil::date(2025, 3, 20)),
        (JalaliDate::new(1404, 1, 1), jiff::civil::date(2025, 3, 21)),
        (JalaliDate::new(1404, 5, 15), jiff::civil::date(2025, 8, 6)),
    ];
    for (jalali, gregorian) in pairs {
        assert_eq!(JalaliDate::from_gregorian(gregorian), jalali);
        assert_eq!(jalali.to_gregorian(), gregorian);
    }
}

#[test]
fn conversion_round_trips_across_a_year() {
    let mut date = jiff::civil::date(2024, 3, 1);
    for _ in 0..400 {
        let jalali = JalaliDate::from_gregorian(date);
        assert_eq!(jalali.to_gregorian(), date, "round trip failed at {date}");
        date = date.tomorrow().unwrap();
    }
}

#[test]
fn date_key_orders_like_dates() {
    assert_eq!(JalaliDate::new(1403, 1, 15).date_key(), 14030115);
    assert!(JalaliDate::new(1403, 2, 1).date_key() > JalaliDate::new(1403, 1, 31).date_key());
}

#[test]
fn parse_display_round_trip() {
    let date: JalaliDate = "1403/01/05".parse().unwrap();
    assert_eq!(date, JalaliDate::new(1403, 1, 5));
    assert_eq!(date.to_string(), "1403/01/05");

    // Persian digits in input are normalized before parsing.
    let date: JalaliDate = "۱۴۰۳/۰۱/۱۵".parse().unwrap();
    assert_eq!(date, JalaliDate::new(1403, 1, 15));

    assert!("1403/13/01".parse::<JalaliDate>().is_err());
    assert!("1403/01".parse::<JalaliDate>().is_err());
}

#[test]
fn digit_localization() {
    assert_eq!(to_persian_digits("0912"), "۰۹۱۲");
    assert_eq!(to_persian_digits(1403), "۱۴۰۳");
    assert_eq!(to_persian_digits("ECU 1"), "ECU ۱");
    assert_eq!(to_english_digits("۰۹۱۲۳۴۵۶۷۸۹"), "09123456789");
    assert_eq!(to_english_digits("کد ملی"), "کد ملی");
}

#[test]
fn exact_age_borrows_like_the_form() {
    let birth = JalaliDate::new(1360, 5, 10);
    let today = JalaliDate::new(1403, 5, 9);
    assert_eq!(exact_age(birth, today), Age { years: 42, months: 11, days: 29 });

    let same_day = exact_age(JalaliDate::new(1403, 5, 9), today);
    assert_eq!(same_day, Age { years: 0, months: 0, days: 0 });
}
