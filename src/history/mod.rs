//! 検出履歴画面
//!
//! - `controller`: 取得・並べ替え・絞り込みの状態管理
//! - `render`: 状態を表示行に変換

pub mod controller;
pub mod render;

pub use controller::{FetchTicket, HistoryController, HistoryView, LoadState};
pub use render::{
    render, render_in, render_screen, render_screen_in, RecordRow, Row, LOADING_MESSAGE,
    NO_HISTORY_MESSAGE,
};
