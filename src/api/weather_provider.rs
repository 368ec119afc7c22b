use super::{read_body, RetryPolicy};
use crate::config::Config;
use crate::error::Result;
use std::fmt;
use tea_doctor_common::{CurrentConditions, GeoLocation, ProviderResponse};

/// 外部天気プロバイダ（RapidAPI経由）
#[derive(Clone)]
pub struct WeatherProviderClient {
    http: reqwest::Client,
    host: String,
    api_key: String,
    retry: RetryPolicy,
}

impl fmt::Debug for WeatherProviderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherProviderClient")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl WeatherProviderClient {
    /// APIキー未設定なら `MissingApiKey`
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.weather_api_key()?.to_string();
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            host: config.weather_api_host.clone(),
            api_key,
            retry: config.retry_policy(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("https://{}/current.json", self.host)
    }

    pub async fn current_conditions(&self, location: &GeoLocation) -> Result<CurrentConditions> {
        let endpoint = self.endpoint();
        let query = location.query();
        log::debug!("GET {}?q={}", endpoint, query);

        let (target, q) = (endpoint.as_str(), query.as_str());
        let response: ProviderResponse = self
            .retry
            .run("weather provider", || async move {
                let response = self
                    .http
                    .get(target)
                    .query(&[("q", q)])
                    .header("X-RapidAPI-Host", &self.host)
                    .header("X-RapidAPI-Key", &self.api_key)
                    .send()
                    .await?;
                read_body(response).await
            })
            .await?;
        Ok(response.current)
    }
}
