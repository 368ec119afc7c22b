//! 表示用の日時整形

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::fmt::Display;

const DATE_FORMAT: &str = "%-m/%-d/%Y";
const TIME_FORMAT: &str = "%-I:%M:%S %p";

/// 日付と時刻に分けた表示文字列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTimestamp {
    pub date: String,
    pub time: String,
}

/// 指定タイムゾーンで整形（画面表示では `Local` を渡す）
pub fn format_timestamp_in<Tz>(created_at: &DateTime<Utc>, tz: &Tz) -> FormattedTimestamp
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let local = created_at.with_timezone(tz);
    FormattedTimestamp {
        date: local.format(DATE_FORMAT).to_string(),
        time: local.format(TIME_FORMAT).to_string(),
    }
}

/// 日付のみ整形（天気APIの `today` などで使用）
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
