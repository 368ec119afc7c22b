use crate::error::{Result, TeaDoctorError};
use std::future::Future;
use std::time::Duration;

const MAX_DELAY: Duration = Duration::from_secs(10);

/// 一時的な失敗に対する再試行（指数バックオフ）
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// `attempt` 回目の失敗後に待つ時間
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(MAX_DELAY)
    }

    /// 一時的な失敗（`is_transient`）を再試行
    pub async fn run<T, F, Fut>(&self, what: &str, op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run_when(what, TeaDoctorError::is_transient, op).await
    }

    /// `retryable` が真を返す失敗だけ再試行
    pub async fn run_when<T, F, Fut>(
        &self,
        what: &str,
        retryable: fn(&TeaDoctorError) -> bool,
        mut op: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if retryable(&e) && attempt < self.max_retries => {
                    let delay = self.delay_for(attempt);
                    log::warn!(
                        "{} failed ({}), retry {}/{} in {:?}",
                        what,
                        e,
                        attempt + 1,
                        self.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
