//! 天気画面
//!
//! 位置とユーザーから当日の天気クラス（病害リスクの目安）を取得して表示する。
//! 日付は前後に移動でき、移動ごとに再取得する。

use crate::api::{DetectionClient, WeatherProviderClient};
use crate::error::{Result, TeaDoctorError};
use crate::history::LoadState;
use chrono::{Days, NaiveDate};
use std::future::Future;
use tea_doctor_common::{
    format_date, GeoLocation, MetricValue, Session, WeatherClassification,
    WeatherDetectionRequest,
};

pub const WEATHER_SUGGESTION: &str = "Check the tea leaves and scan if you see any odd spots";

/// 天気クラスの取得元
pub trait WeatherSource {
    fn classify(
        &self,
        location: &GeoLocation,
        session: &Session,
        day: NaiveDate,
    ) -> impl Future<Output = Result<WeatherClassification>> + Send;
}

/// プロバイダ取得 → 検出サービス判定 の2段階
#[derive(Debug, Clone)]
pub struct WeatherService {
    detection: DetectionClient,
    provider: WeatherProviderClient,
}

impl WeatherService {
    pub fn new(detection: DetectionClient, provider: WeatherProviderClient) -> Self {
        Self { detection, provider }
    }

    pub async fn classify_day(
        &self,
        location: &GeoLocation,
        session: &Session,
        day: NaiveDate,
    ) -> Result<WeatherClassification> {
        let conditions = self.provider.current_conditions(location).await?;
        let request = WeatherDetectionRequest::build(location, session, &conditions, day);
        self.detection.detect_weather(&request).await
    }
}

impl WeatherSource for WeatherService {
    fn classify(
        &self,
        location: &GeoLocation,
        session: &Session,
        day: NaiveDate,
    ) -> impl Future<Output = Result<WeatherClassification>> + Send {
        self.classify_day(location, session, day)
    }
}

#[derive(Debug)]
pub struct WeatherScreen {
    location: Option<GeoLocation>,
    session: Option<Session>,
    day: NaiveDate,
    state: LoadState,
    data: Option<WeatherClassification>,
}

impl WeatherScreen {
    pub fn new(location: Option<GeoLocation>, session: Option<Session>, today: NaiveDate) -> Self {
        Self {
            location,
            session,
            day: today,
            state: LoadState::Idle,
            data: None,
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn next_day(&mut self) -> NaiveDate {
        self.day = self.day.checked_add_days(Days::new(1)).unwrap_or(self.day);
        self.day
    }

    pub fn previous_day(&mut self) -> NaiveDate {
        self.day = self.day.checked_sub_days(Days::new(1)).unwrap_or(self.day);
        self.day
    }

    /// 基準日から `offset` 日ずらす（負数で過去）
    pub fn shift_days(&mut self, offset: i64) -> NaiveDate {
        let days = Days::new(offset.unsigned_abs());
        let shifted = if offset >= 0 {
            self.day.checked_add_days(days)
        } else {
            self.day.checked_sub_days(days)
        };
        self.day = shifted.unwrap_or(self.day);
        self.day
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn data(&self) -> Option<&WeatherClassification> {
        self.data.as_ref()
    }

    /// 選択日の天気クラスを取得
    ///
    /// 位置またはユーザーが無ければ通信せず `InvalidInput`。
    pub async fn load<S: WeatherSource>(&mut self, source: &S) -> Result<&LoadState> {
        let (location, session) = match (&self.location, &self.session) {
            (Some(l), Some(s)) => (*l, s.clone()),
            (None, _) => {
                return Err(TeaDoctorError::InvalidInput("location is not available".into()))
            }
            (_, None) => {
                return Err(TeaDoctorError::InvalidInput("user is not signed in".into()))
            }
        };

        self.state = LoadState::Loading;
        match source.classify(&location, &session, self.day).await {
            Ok(data) => {
                log::info!("weather for {}: {}", format_date(&self.day), data.today_weather_class);
                self.data = Some(data);
                self.state = LoadState::Ready;
            }
            Err(e) => {
                log::error!("error fetching weather: {}", e);
                self.state = LoadState::Failed(e.to_string());
            }
        }
        Ok(&self.state)
    }
}

fn with_unit(value: &Option<MetricValue>, unit: &str) -> String {
    match value {
        Some(v) => format!("{} {}", v, unit),
        None => "-".to_string(),
    }
}

/// 天気画面をテキスト化
pub fn render_weather(screen: &WeatherScreen, place: &str) -> String {
    let mut lines = vec![
        "Suggestions".to_string(),
        WEATHER_SUGGESTION.to_string(),
        String::new(),
    ];

    match screen.state() {
        LoadState::Loading => {
            lines.push(crate::history::LOADING_MESSAGE.to_string());
            return lines.join("\n");
        }
        LoadState::Failed(msg) => lines.push(format!("! Could not load weather: {}", msg)),
        LoadState::Idle | LoadState::Ready => {}
    }

    if let Some(data) = screen.data() {
        let date = data.detection_day().unwrap_or(screen.day());
        let s = data.summary();
        lines.push(format!("Weather on {}", place));
        lines.push(format!("Date: {}", format_date(&date)));
        lines.push(format!("Today's Weather: {}", s.weather_class));
        lines.push(format!("Temperature: {}", with_unit(&s.temperature, "°C")));
        lines.push(format!("Humidity: {}", with_unit(&s.humidity, "%")));
        lines.push(format!("Rainfalls: {}", with_unit(&s.rainfall, "mm")));
        lines.push(format!("Wind Speed: {}", with_unit(&s.wind, "km/h")));
    }
    lines.join("\n")
}
