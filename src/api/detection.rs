use super::{decode_history, read_body, RetryPolicy};
use crate::config::Config;
use crate::error::{Result, TeaDoctorError};
use tea_doctor_common::{
    DataEnvelope, DetectionRecord, WeatherClassification, WeatherDetectionRequest,
};

/// POST はサーバーに届いていない失敗（接続エラー）だけ再試行する
pub(crate) fn post_is_retryable(err: &TeaDoctorError) -> bool {
    err.is_connect_failure()
}

/// 検出サービスのクライアント
#[derive(Debug, Clone)]
pub struct DetectionClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl DetectionClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(http, &config.api_base_url, config.retry_policy()))
    }

    pub fn with_client(http: reqwest::Client, base_url: &str, retry: RetryPolicy) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/detection/{url}`
    pub fn history_endpoint(&self, url: &str) -> String {
        format!("{}/detection/{}", self.base_url, url.trim_start_matches('/'))
    }

    pub fn weather_endpoint(&self) -> String {
        format!("{}/detection/detect-weather", self.base_url)
    }

    /// 検出履歴を取得（並べ替えはしない）
    pub async fn get_history(&self, url: &str) -> Result<Vec<DetectionRecord>> {
        let endpoint = self.history_endpoint(url);
        log::debug!("GET {}", endpoint);

        let target = endpoint.as_str();
        let records = self
            .retry
            .run("history fetch", || async move {
                let response = self.http.get(target).send().await?;
                let status = response.status();
                let body = response.text().await?;
                decode_history(status, &body)
            })
            .await?;

        log::debug!("received {} records from {}", records.len(), endpoint);
        Ok(records)
    }

    /// 気象値から天気クラスを判定
    pub async fn detect_weather(
        &self,
        request: &WeatherDetectionRequest,
    ) -> Result<WeatherClassification> {
        let endpoint = self.weather_endpoint();
        log::debug!("POST {} (today={})", endpoint, request.today);

        let target = endpoint.as_str();
        let envelope: DataEnvelope<WeatherClassification> = self
            .retry
            .run_when("weather detection", post_is_retryable, || async move {
                let response = self.http.post(target).json(request).send().await?;
                read_body(response).await
            })
            .await?;
        Ok(envelope.data)
    }
}
