//! 検出結果の型定義
//!
//! 検出サービスが返すレコードと、履歴エンドポイントのレスポンス形状。

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 検出結果1件（サーバーが生成、クライアントは変更しない）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// 元画像のURL
    #[serde(rename = "imgURL", alias = "imageUri", default)]
    pub image_uri: String,

    /// 分類ラベル（例: "healthy", "blister_blight"）
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub score: Option<MetricValue>,

    #[serde(default)]
    pub ratio: Option<MetricValue>,

    #[serde(rename = "createdAt", deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl DetectionRecord {
    /// ラベル（未設定なら空文字）
    pub fn label_str(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}

/// 表示専用の数値
///
/// サーバーは数値または文字列で返すことがあるため、どちらも受け付ける。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// タイムスタンプ文字列を解釈
///
/// 受け付ける形式:
/// - RFC 3339（`2023-09-01T10:20:30.000Z`, `+05:30` 付きなど）
/// - オフセットなしの日時（ローカル時刻として扱う）
/// - 日付のみ（UTC 0時）
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            // 夏時間で存在しない時刻はUTCとみなす
            return Some(
                Local
                    .from_local_datetime(&naive)
                    .earliest()
                    .map_or_else(|| naive.and_utc(), |dt| dt.with_timezone(&Utc)),
            );
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// エポックミリ秒
fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Float(f64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawTimestamp::deserialize(deserializer)?;
    let parsed = match &raw {
        RawTimestamp::Millis(ms) => from_epoch_millis(*ms),
        RawTimestamp::Float(ms) => from_epoch_millis(ms.round() as i64),
        RawTimestamp::Text(s) => parse_timestamp(s),
    };
    parsed.ok_or_else(|| match raw {
        RawTimestamp::Text(s) => {
            serde::de::Error::custom(format!("unrecognized timestamp {:?}", s))
        }
        _ => serde::de::Error::custom("epoch milliseconds out of range"),
    })
}

/// `{ "data": ... }` 形式のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// 履歴レスポンスのパース結果
#[derive(Debug, Clone, Default)]
pub struct ParsedHistory {
    pub records: Vec<DetectionRecord>,
    /// 読めなかったレコード（レスポンス内の位置, 理由）
    pub rejected: Vec<(usize, String)>,
}

/// 履歴レスポンスをパース
///
/// 形の合わないレコードは個別に除外し、残りは返す。
/// `data` 配列自体が無い場合のみエラー。
pub fn parse_history_response(body: &str) -> crate::Result<ParsedHistory> {
    let envelope: DataEnvelope<Vec<serde_json::Value>> = serde_json::from_str(body)?;

    let mut parsed = ParsedHistory::default();
    for (index, value) in envelope.data.into_iter().enumerate() {
        match serde_json::from_value::<DetectionRecord>(value) {
            Ok(record) => parsed.records.push(record),
            Err(e) => parsed.rejected.push((index, e.to_string())),
        }
    }
    Ok(parsed)
}
