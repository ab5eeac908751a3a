//! Persian (Jalaali) calendar arithmetic and digit localization.
//!
//! All user-facing dates in the system are Persian `Y/MM/DD` strings. Two
//! different rules coexist here on purpose:
//!
//! - [`is_leap`] and [`date_to_absolute_days`] reproduce the legacy
//!   approximations (the 2820-year cycle test and the 31/30-day month model
//!   with a `floor((8*(y-1)+21)/33)` leap correction). Downstream duration
//!   displays depend on their exact, if imprecise, output — do not "fix"
//!   them.
//! - [`JalaliDate::from_gregorian`] / [`JalaliDate::to_gregorian`] implement
//!   the breaks-table conversion (the jalaali-js algorithm) and are
//!   calendrically exact; the dashboard's date filtering and "today" use
//!   these.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

/// Years (in the Jalali calendar) at which the 33-year sub-cycle pattern
/// shifts. From the jalaali-js conversion tables.
const BREAKS: [i64; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// A date in the Persian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl JalaliDate {
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Today in the system time zone.
    pub fn today() -> Self {
        Self::from_gregorian(jiff::Zoned::now().date())
    }

    /// The Jalali date of a stored instant, in the system time zone.
    pub fn from_timestamp(ts: jiff::Timestamp) -> Self {
        Self::from_gregorian(ts.to_zoned(jiff::tz::TimeZone::system()).date())
    }

    /// Convert a Gregorian civil date.
    pub fn from_gregorian(date: jiff::civil::Date) -> Self {
        let jdn = g2d(date.year() as i64, date.month() as i64, date.day() as i64);
        d2j(jdn)
    }

    /// Convert back to a Gregorian civil date.
    pub fn to_gregorian(self) -> jiff::civil::Date {
        let (gy, gm, gd) = d2g(j2d(self));
        jiff::civil::date(gy as i16, gm as i8, gd as i8)
    }

    /// Sortable numeric key `y*10000 + m*100 + d`, as used by the dashboard's
    /// custom range filter.
    pub fn date_key(self) -> i64 {
        self.year as i64 * 10_000 + self.month as i64 * 100 + self.day as i64
    }
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for JalaliDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = to_english_digits(s);
        let mut parts = normalized.split('/');
        let (y, m, d) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(y), Some(m), Some(d), None) => (y, m, d),
            _ => return Err(CoreError::InvalidDate(s.to_string())),
        };
        let invalid = || CoreError::InvalidDate(s.to_string());
        let year: i32 = y.trim().parse().map_err(|_| invalid())?;
        let month: u8 = m.trim().parse().map_err(|_| invalid())?;
        let day: u8 = d.trim().parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(CoreError::InvalidDate(s.to_string()));
        }
        Ok(Self { year, month, day })
    }
}

/// Leap-year test per the 2820-year cycle approximation. This is the rule the
/// date inputs use to cap Esfand at 29/30 days; it disagrees with the
/// breaks-table rule for a handful of years and that is accepted.
pub fn is_leap(year: i32) -> bool {
    let y = year as i64;
    ((((y - 474).rem_euclid(2820) + 474) + 38) * 682).rem_euclid(2816) < 682
}

/// Day count for a `Y/M/D` Persian date string since a fixed epoch, using the
/// 31/30-day month approximation. Only meaningful for relative durations
/// (admission to discharge). Returns 0 when the input does not parse;
/// existing duration displays rely on that.
pub fn date_to_absolute_days(date: &str) -> i64 {
    let Ok(d) = date.parse::<JalaliDate>() else {
        return 0;
    };
    let y = d.year as i64;
    let mut days = (y - 1) * 365;
    days += (8 * (y - 1) + 21) / 33;
    for month in 1..d.month as i64 {
        days += if month <= 6 { 31 } else { 30 };
    }
    days + d.day as i64
}

/// Hospital-stay length in days between two Persian date strings. Negative
/// when the discharge date precedes admission; the UI turns that into an
/// inline warning.
pub fn stay_duration_days(admission: &str, discharge: &str) -> i64 {
    date_to_absolute_days(discharge) - date_to_absolute_days(admission)
}

/// An age broken down the way the form displays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Age {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

/// Age at `today` for a given birth date, with the 30-day month borrow the
/// original form used.
pub fn exact_age(birth: JalaliDate, today: JalaliDate) -> Age {
    let mut days = today.day as i32 - birth.day as i32;
    let mut months = today.month as i32 - birth.month as i32;
    let mut years = today.year - birth.year;
    if days < 0 {
        months -= 1;
        days += 30;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }
    Age { years, months, days }
}

/// Map ASCII digits to Persian glyphs; everything else passes through.
/// Display only, never fed back into computation.
pub fn to_persian_digits(input: impl fmt::Display) -> String {
    input
        .to_string()
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => PERSIAN_DIGITS[d as usize],
            _ => c,
        })
        .collect()
}

/// Map Persian digit glyphs back to ASCII; used to normalize keyed-in
/// national ids, mobile numbers, and dates.
pub fn to_english_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match PERSIAN_DIGITS.iter().position(|&p| p == c) {
            Some(d) => char::from_digit(d as u32, 10).unwrap_or(c),
            None => c,
        })
        .collect()
}

// The conversion core below is the jalaali-js algorithm with its truncating
// div/mod, which Rust's `/` and `%` on i64 match exactly.

struct JalCal {
    leap: i64,
    gy: i64,
    march: i64,
}

fn jal_cal(jy: i64) -> JalCal {
    let gy = jy + 621;
    let mut leap_j = -14i64;
    let mut jp = BREAKS[0];
    let mut jump = 0i64;

    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if jy < jm {
            break;
        }
        leap_j += jump / 33 * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = jy - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gy / 4 - (gy / 100 + 1) * 3 / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    JalCal { leap, gy, march }
}

fn j2d(d: JalaliDate) -> i64 {
    let (jy, jm, jd) = (d.year as i64, d.month as i64, d.day as i64);
    let r = jal_cal(jy);
    g2d(r.gy, 3, r.march) + (jm - 1) * 31 - jm / 7 * (jm - 7) + jd - 1
}

fn d2j(jdn: i64) -> JalaliDate {
    let (gy, _, _) = d2g(jdn);
    let mut jy = gy - 621;
    let r = jal_cal(jy);
    let jdn1f = g2d(gy, 3, r.march);
    let mut k = jdn - jdn1f;

    if k >= 0 {
        if k <= 185 {
            return JalaliDate::new(jy as i32, (1 + k / 31) as u8, (k % 31 + 1) as u8);
        }
        k -= 186;
    } else {
        jy -= 1;
        k += 179;
        if r.leap == 1 {
            k += 1;
        }
    }

    JalaliDate::new(jy as i32, (7 + k / 30) as u8, (k % 30 + 1) as u8)
}

fn g2d(gy: i64, gm: i64, gd: i64) -> i64 {
    let mut d = (gy + (gm - 8) / 6 + 100100) * 1461 / 4 + (153 * ((gm + 9) % 12) + 2) / 5 + gd
        - 34840408;
    d = d - (gy + 100100 + (gm - 8) / 6) / 100 * 3 / 4 + 752;
    d
}

fn d2g(jdn: i64) -> (i64, i64, i64) {
    let mut j = 4 * jdn + 139361631;
    j += (4 * jdn + 183187720) / 146097 * 3 / 4 * 4 - 3908;
    let i = (j % 1461) / 4 * 5 + 308;
    let gd = (i % 153) / 5 + 1;
    let gm = (i / 153) % 12 + 1;
    let gy = j / 1461 - 100100 + (8 - gm) / 6;
    (gy, gm, gd)
}
