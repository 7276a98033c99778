use chrono::{Datelike, NaiveDate};

/// Days remaining in the month of `today`, not counting `today` itself.
pub fn days_left_in_month(today: NaiveDate) -> u32 {
    last_day_of_month(today) - today.day()
}

fn last_day_of_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    // the day before the first of the next month; both steps are infallible
    // for in-range dates
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}
