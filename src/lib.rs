//! Tea Doctor
//!
//! 茶樹の病害検出サービスと天気リスク判定のクライアント。

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod interactive;
pub mod logging;
pub mod progress;
pub mod weather;

pub use error::{Result, TeaDoctorError};
