//! REST クライアント
//!
//! - `DetectionClient`: 検出サービス（履歴取得・天気クラス判定）
//! - `WeatherProviderClient`: 外部天気プロバイダ（RapidAPI）

mod detection;
mod retry;
mod weather_provider;

pub use detection::DetectionClient;
pub use retry::RetryPolicy;
pub use weather_provider::WeatherProviderClient;

use crate::error::{Result, TeaDoctorError};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::future::Future;
use tea_doctor_common::{parse_history_response, DetectionRecord};

/// 履歴の取得元
///
/// コントローラは通信手段を知らない。テストではメモリ上の実装を使う。
pub trait HistorySource {
    fn fetch_history(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Vec<DetectionRecord>>> + Send;
}

impl HistorySource for DetectionClient {
    fn fetch_history(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Vec<DetectionRecord>>> + Send {
        self.get_history(url)
    }
}

fn check_status(status: StatusCode, body: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    Err(TeaDoctorError::Http {
        status: status.as_u16(),
        body: truncate(body, 200),
    })
}

/// ステータスとボディからレスポンスをデコード
///
/// 2xx 以外は `Http`、形が合わないボディは `ResponseShape`。
pub(crate) fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    check_status(status, body)?;
    serde_json::from_str(body).map_err(|e| TeaDoctorError::ResponseShape(e.to_string()))
}

/// 履歴レスポンスをデコード
///
/// 読めないレコードは警告を出して捨てる。`data` 配列が無ければ `ResponseShape`。
pub(crate) fn decode_history(status: StatusCode, body: &str) -> Result<Vec<DetectionRecord>> {
    check_status(status, body)?;
    let parsed =
        parse_history_response(body).map_err(|e| TeaDoctorError::ResponseShape(e.to_string()))?;
    for (index, reason) in &parsed.rejected {
        log::warn!("skipping history record #{}: {}", index, reason);
    }
    Ok(parsed.records)
}

pub(crate) async fn read_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    decode_body(status, &body)
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
