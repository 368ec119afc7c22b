//! 履歴の表示
//!
//! 読み込み中は他の内容（古いデータを含む）より優先して表示する。

use super::controller::HistoryView;
use chrono::{Local, TimeZone};
use std::fmt::{self, Display};
use tea_doctor_common::{format_timestamp_in, DetectionRecord, MetricValue, Session};

pub const NO_HISTORY_MESSAGE: &str = "No detection history available";
pub const LOADING_MESSAGE: &str = "Loading...";

/// 表示行
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Loading,
    Error(String),
    Empty,
    Record(RecordRow),
}

/// レコード1件分のカード
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRow {
    pub image_uri: String,
    pub label: String,
    pub score: String,
    pub ratio: String,
    pub date: String,
    pub time: String,
}

fn metric(value: &Option<MetricValue>) -> String {
    value.as_ref().map_or_else(|| "-".to_string(), ToString::to_string)
}

impl RecordRow {
    pub fn from_record<Tz>(record: &DetectionRecord, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let ts = format_timestamp_in(&record.created_at, tz);
        Self {
            image_uri: record.image_uri.clone(),
            label: record.label.clone().unwrap_or_else(|| "-".to_string()),
            score: metric(&record.score),
            ratio: metric(&record.ratio),
            date: ts.date,
            time: ts.time,
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Row::Loading => f.write_str(LOADING_MESSAGE),
            Row::Error(msg) => write!(f, "! Could not load detection history: {}", msg),
            Row::Empty => f.write_str(NO_HISTORY_MESSAGE),
            Row::Record(r) => {
                writeln!(f, "[image] {}", r.image_uri)?;
                writeln!(f, "  Disease: {}", r.label)?;
                writeln!(f, "  Score: {}", r.score)?;
                writeln!(f, "  Ratio: {}", r.ratio)?;
                writeln!(f, "  Date: {}", r.date)?;
                write!(f, "  Time: {}", r.time)
            }
        }
    }
}

/// ローカルタイムゾーンで表示行を生成
pub fn render(view: &HistoryView<'_>) -> Vec<Row> {
    render_in(view, &Local)
}

pub fn render_in<Tz>(view: &HistoryView<'_>, tz: &Tz) -> Vec<Row>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if view.is_loading() {
        return vec![Row::Loading];
    }

    let mut rows = Vec::with_capacity(view.records.len() + 1);
    if let Some(err) = view.error() {
        rows.push(Row::Error(err.to_string()));
    }
    if view.records.is_empty() {
        rows.push(Row::Empty);
    } else {
        rows.extend(
            view.records
                .iter()
                .map(|r| Row::Record(RecordRow::from_record(r, tz))),
        );
    }
    rows
}

/// 画面全体（見出し・フィルタチップ・カード）をテキスト化
pub fn render_screen(view: &HistoryView<'_>, session: Option<&Session>) -> String {
    render_screen_in(view, session, &Local)
}

pub fn render_screen_in<Tz>(view: &HistoryView<'_>, session: Option<&Session>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if view.is_loading() {
        return Row::Loading.to_string();
    }

    let mut lines = Vec::new();
    lines.push(session.map_or_else(|| LOADING_MESSAGE.to_string(), Session::greeting));
    lines.push(format!("Detection History of {}", view.category));
    lines.push(format!("Total Records: {}", view.records.len()));

    let chips: Vec<String> = view
        .features
        .iter()
        .map(|name| {
            if view.filter.label() == Some(*name) {
                format!("[{}]", name)
            } else {
                format!(" {} ", name)
            }
        })
        .collect();
    lines.push(chips.join(" "));
    lines.push(String::new());

    let rows: Vec<String> = render_in(view, tz).iter().map(ToString::to_string).collect();
    lines.push(rows.join("\n\n"));
    lines.join("\n")
}
