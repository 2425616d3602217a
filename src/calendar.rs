//! Trading-day arithmetic for seeding the dashboard's date filters.
//!
//! Weekend-only calendar: exchange holidays are out of scope here, the host
//! clamps against the dates actually present in the data.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Nearest workday strictly before `date`.
pub fn previous_workday(date: NaiveDate) -> NaiveDate {
    let mut day = date - Duration::days(1);
    while is_weekend(day) {
        day -= Duration::days(1);
    }
    day
}

/// Nearest workday strictly after `date`.
pub fn next_workday(date: NaiveDate) -> NaiveDate {
    let mut day = date + Duration::days(1);
    while is_weekend(day) {
        day += Duration::days(1);
    }
    day
}

/// Most recent day with a completed trading session as of `today`.
///
/// Weekends resolve to that week's Friday; a weekday resolves to the
/// previous weekday, so Monday reaches back to Friday.
pub fn last_trading_day(today: NaiveDate) -> NaiveDate {
    match today.weekday() {
        Weekday::Mon => today - Duration::days(3),
        Weekday::Sun => today - Duration::days(2),
        Weekday::Sat => today - Duration::days(1),
        _ => today - Duration::days(1),
    }
}

/// Default lower bound of the date filter: two calendar days before
/// `reference`, pulled back off any weekend. A Monday result reaches further
/// back to the prior Friday, so the window always includes a session from
/// the previous week.
pub fn default_from_date(reference: NaiveDate) -> NaiveDate {
    let mut day = reference - Duration::days(2);
    while is_weekend(day) {
        day -= Duration::days(1);
    }
    if day.weekday() == Weekday::Mon {
        day -= Duration::days(3);
    }
    day
}
