use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeaDoctorError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Weather API key is not set. Run `tea-doctor config --set-weather-key YOUR_KEY` or set TEA_DOCTOR_WEATHER_KEY")]
    MissingApiKey,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] tea_doctor_common::Error),
}

impl TeaDoctorError {
    /// 再試行で回復しうるエラーか（通信失敗と5xxのみ）
    pub fn is_transient(&self) -> bool {
        match self {
            TeaDoctorError::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            TeaDoctorError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// 接続確立前の失敗か（リクエストはサーバーに届いていない）
    pub fn is_connect_failure(&self) -> bool {
        matches!(self, TeaDoctorError::Network(e) if e.is_connect())
    }
}

pub type Result<T> = std::result::Result<T, TeaDoctorError>;
