//! Tea Doctor Common Library
//!
//! CLIと他のフロントエンドで共有される型とユーティリティ（I/Oなし）

pub mod category;
pub mod error;
pub mod filter;
pub mod format;
pub mod history;
pub mod session;
pub mod types;
pub mod weather;

pub use category::{feature_list, known_categories, Category, CategoryConfig, CATEGORY_TABLE};
pub use error::{Error, Result};
pub use filter::{apply_filter, FeatureFilter};
pub use format::{format_date, format_timestamp_in, FormattedTimestamp};
pub use history::{is_sorted_by_recency, sort_by_recency};
pub use session::Session;
pub use types::{
    parse_history_response, parse_timestamp, DataEnvelope, DetectionRecord, MetricValue,
    ParsedHistory,
};
pub use weather::{
    CurrentConditions, GeoLocation, ProviderResponse, WeatherClassification,
    WeatherDetectionRequest, WeatherSummary,
};
