//! ラベルフィルタ
//!
//! 一致判定は部分一致（`label.contains(filter)`）。完全一致ではない点に注意。
//! 例えば "cancer" は "bark_cancer" と "leaf_cancer" の両方に一致する。

use crate::types::DetectionRecord;
use std::fmt;

/// 現在のラベルフィルタ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeatureFilter {
    /// フィルタなし（全件表示）
    #[default]
    All,
    /// 指定ラベルを含むレコードのみ
    Label(String),
}

impl FeatureFilter {
    /// 選択値からフィルタを作成（`None` / 空文字 / 空白のみは `All`）
    pub fn from_selection(selection: Option<&str>) -> Self {
        match selection.map(str::trim) {
            Some(s) if !s.is_empty() => FeatureFilter::Label(s.to_string()),
            _ => FeatureFilter::All,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, FeatureFilter::Label(_))
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            FeatureFilter::All => None,
            FeatureFilter::Label(l) => Some(l),
        }
    }

    /// レコードがフィルタに一致するか
    ///
    /// ラベル未設定のレコードは有効なフィルタには一致しない。
    pub fn matches(&self, record: &DetectionRecord) -> bool {
        match self {
            FeatureFilter::All => true,
            FeatureFilter::Label(f) => record
                .label
                .as_deref()
                .is_some_and(|label| label.contains(f.as_str())),
        }
    }
}

impl fmt::Display for FeatureFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureFilter::All => f.write_str("all"),
            FeatureFilter::Label(l) => f.write_str(l),
        }
    }
}

/// 並び順を保ったままフィルタを適用
pub fn apply_filter<'a>(
    records: &'a [DetectionRecord],
    filter: &FeatureFilter,
) -> Vec<&'a DetectionRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}
