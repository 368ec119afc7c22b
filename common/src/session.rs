//! ログイン中ユーザー
//!
//! グローバルに参照せず、必要な処理へ明示的に渡す。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email,
        }
    }

    /// 画面上部の挨拶文
    pub fn greeting(&self) -> String {
        match &self.email {
            Some(email) => format!("Hi {}!", email),
            None => format!("Hi {}!", self.user_id),
        }
    }
}
