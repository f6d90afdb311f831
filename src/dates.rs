//! Due date parsing and the clock the store reads "now" and "today" from.
//!
//! Accepted expressions (case-insensitive, surrounding whitespace ignored):
//! - "today", "tomorrow"
//! - "+Nd", "+Nw", "+Nm" (a month is a flat 30 days)
//! - "YYYY-MM-DD", which must name a real calendar date

use chrono::{DateTime, Days, Local, NaiveDate, Utc};

/// Source of the current instant and calendar date.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// The calendar date used for relative due dates and due-date filters.
    fn today(&self) -> NaiveDate;
}

/// Wall clock; "today" is the local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one instant and one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
}

impl FixedClock {
    /// Pin to midday UTC of `today`.
    pub fn on(today: NaiveDate) -> Self {
        let now = today.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc();
        FixedClock { now, today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

/// Parse a due date expression relative to `today`.
///
/// Returns `None` for anything outside the grammar, including syntactically
/// well-formed but impossible dates such as "2025-02-30".
pub fn parse_due_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = input.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.checked_add_days(Days::new(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix('+') {
        let unit = rest.chars().last()?;
        let count = &rest[..rest.len() - unit.len_utf8()];
        if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let n: u64 = count.parse().ok()?;
        let days = match unit {
            'd' => n,
            'w' => n.checked_mul(7)?,
            // Approximate: 30 days per month
            'm' => n.checked_mul(30)?,
            _ => return None,
        };
        return today.checked_add_days(Days::new(days));
    }

    parse_calendar_date(&s)
}

/// Parse a strict `YYYY-MM-DD` literal into a real calendar date.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return None;
    }
    let digits = |r: std::ops::Range<usize>| -> Option<u32> {
        let part = &s[r];
        if part.bytes().all(|c| c.is_ascii_digit()) {
            part.parse().ok()
        } else {
            None
        }
    };
    let year = digits(0..4)?;
    let month = digits(5..7)?;
    let day = digits(8..10)?;
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

/// True when `s` is a canonical `YYYY-MM-DD` string naming a real date
/// (month 1-12, day valid for the month, leap years honoured).
pub fn is_valid_calendar_date(s: &str) -> bool {
    parse_calendar_date(s).is_some()
}

/// Canonical `YYYY-MM-DD` text for a date.
pub fn canonical(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
