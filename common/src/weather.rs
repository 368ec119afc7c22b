//! 天気・病害リスク判定の型定義
//!
//! 1. 天気プロバイダから現在の気象値を取得
//! 2. 気象値を検出サービスへ送り、天気クラスを判定してもらう

use crate::format::format_date;
use crate::session::Session;
use crate::types::{parse_timestamp, MetricValue};
use chrono::{Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// 緯度経度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(crate::Error::InvalidInput(format!(
                "location out of range: {},{}",
                latitude, longitude
            )));
        }
        Ok(Self { latitude, longitude })
    }

    /// プロバイダの `q` パラメータ形式
    pub fn query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// 天気プロバイダのレスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderResponse {
    pub current: CurrentConditions,
}

/// 現在の気象値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub precip_mm: f64,
    pub temp_c: f64,
    pub wind_kph: f64,
}

/// 天気クラス判定リクエスト（`POST /detection/detect-weather`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDetectionRequest {
    /// 緯度（フィールド名はサーバー側の契約）
    pub lang: f64,
    pub long: f64,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub precipitation: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub wind: f64,
    pub today: String,
}

impl WeatherDetectionRequest {
    /// 現在値は1点しかないため temp_max / temp_min はどちらも temp_c
    pub fn build(
        location: &GeoLocation,
        session: &Session,
        conditions: &CurrentConditions,
        day: NaiveDate,
    ) -> Self {
        Self {
            lang: location.latitude,
            long: location.longitude,
            user_id: session.user_id.clone(),
            precipitation: conditions.precip_mm,
            temp_max: conditions.temp_c,
            temp_min: conditions.temp_c,
            wind: conditions.wind_kph,
            today: format_date(&day),
        }
    }
}

/// 天気クラス判定結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherClassification {
    #[serde(rename = "todayWeatherClass")]
    pub today_weather_class: String,
    #[serde(default)]
    pub temps: Vec<MetricValue>,
    #[serde(default)]
    pub humidities: Vec<MetricValue>,
    #[serde(default)]
    pub rainfalls: Vec<MetricValue>,
    #[serde(default)]
    pub wind: Option<MetricValue>,
    #[serde(default)]
    pub detection_date: Option<String>,
}

impl WeatherClassification {
    /// 画面表示用の要約（各系列の先頭値）
    pub fn summary(&self) -> WeatherSummary {
        WeatherSummary {
            weather_class: self.today_weather_class.clone(),
            temperature: self.temps.first().cloned(),
            humidity: self.humidities.first().cloned(),
            rainfall: self.rainfalls.first().cloned(),
            wind: self.wind.clone(),
        }
    }

    /// 判定日（ローカルタイムゾーンの日付）
    pub fn detection_day(&self) -> Option<NaiveDate> {
        self.detection_day_in(&Local)
    }

    /// 判定日を指定タイムゾーンで求める
    ///
    /// `YYYY-MM-DD` はそのまま、日時はタイムゾーン変換してから日付を取る。
    pub fn detection_day_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        let raw = self.detection_date.as_deref()?.trim();
        if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(day);
        }
        parse_timestamp(raw).map(|dt| dt.with_timezone(tz).date_naive())
    }
}

/// 表示用の要約
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSummary {
    pub weather_class: String,
    pub temperature: Option<MetricValue>,
    pub humidity: Option<MetricValue>,
    pub rainfall: Option<MetricValue>,
    pub wind: Option<MetricValue>,
}
