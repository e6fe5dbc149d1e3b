//! Calendar buckets relative to "now", evaluated in now's time zone.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};

fn local_date<Tz: TimeZone>(stamp: &DateTime<Utc>, now: &DateTime<Tz>) -> NaiveDate {
    stamp.with_timezone(&now.timezone()).date_naive()
}

/// Same calendar day as `now`.
pub fn is_today<Tz: TimeZone>(stamp: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    local_date(stamp, now) == now.date_naive()
}

/// Within the week containing `now`, Sunday 00:00:00 through Saturday 23:59:59.999.
pub fn is_this_week<Tz: TimeZone>(stamp: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    let today = now.date_naive();
    let back = u64::from(today.weekday().num_days_from_sunday());
    let Some(sunday) = today.checked_sub_days(Days::new(back)) else {
        return false;
    };
    let Some(saturday) = sunday.checked_add_days(Days::new(6)) else {
        return false;
    };
    let date = local_date(stamp, now);
    sunday <= date && date <= saturday
}

/// Same calendar month and year as `now`.
pub fn is_this_month<Tz: TimeZone>(stamp: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    let date = local_date(stamp, now);
    let today = now.date_naive();
    date.year() == today.year() && date.month() == today.month()
}
