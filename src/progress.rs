//! 端末用の読み込み表示

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// 取得中に回るスピナー（stderr に描画）
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
