//! 履歴コントローラ
//!
//! 状態遷移: `Idle → Loading → {Ready, Failed}`。`Ready` / `Failed` から
//! 次の取得で再び `Loading` に戻る。
//!
//! 取得ごとに世代番号を振り、古い世代の結果は破棄する（遅い前回の応答が
//! 新しい結果を上書きしない）。絞り込みは取得済みデータ上でのみ行い、
//! 通信は発生しない。

use crate::api::HistorySource;
use crate::error::{Result, TeaDoctorError};
use regex::Regex;
use tea_doctor_common::{sort_by_recency, Category, DetectionRecord, FeatureFilter};

/// 読み込み状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl LoadState {
    /// 最終状態に対応する終了コード（失敗なら 2）
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadState::Failed(_) => 2,
            _ => 0,
        }
    }
}

/// 発行済みの取得要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub struct HistoryController {
    category: Category,
    url: String,
    /// 最後に取得した全件（新しい順）
    records: Vec<DetectionRecord>,
    filter: FeatureFilter,
    /// `records` のうち表示対象のインデックス
    visible: Vec<usize>,
    state: LoadState,
    generation: u64,
}

/// レンダラに渡す読み取り専用のスナップショット
#[derive(Debug, Clone)]
pub struct HistoryView<'a> {
    pub category: &'a str,
    pub features: &'static [&'static str],
    pub filter: &'a FeatureFilter,
    pub state: &'a LoadState,
    pub records: Vec<&'a DetectionRecord>,
}

impl HistoryView<'_> {
    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self.state {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// パスセグメントとして安全か
fn validate_url(url: &str) -> Result<()> {
    lazy_static::lazy_static! {
        static ref URL_PATH: Regex =
            Regex::new(r"^[A-Za-z0-9._~\-]+(/[A-Za-z0-9._~\-]+)*$").unwrap();
    }

    if url.trim().is_empty() {
        return Err(TeaDoctorError::InvalidInput("history url is empty".into()));
    }
    if !URL_PATH.is_match(url) || url.split('/').any(|seg| seg == "." || seg == "..") {
        return Err(TeaDoctorError::InvalidInput(format!(
            "history url is not a valid path: {:?}",
            url
        )));
    }
    Ok(())
}

impl HistoryController {
    /// 入力を検証してコントローラを作成（通信はしない）
    pub fn new(category: &str, url: &str) -> Result<Self> {
        let category = category.trim();
        if category.is_empty() {
            return Err(TeaDoctorError::InvalidInput("category is empty".into()));
        }
        validate_url(url)?;

        let category = Category::parse(category);
        if !category.is_known() {
            log::warn!(
                "unknown category {:?}, only default features are selectable",
                category.name()
            );
        }

        Ok(Self {
            category,
            url: url.to_string(),
            records: Vec::new(),
            filter: FeatureFilter::All,
            visible: Vec::new(),
            state: LoadState::Idle,
            generation: 0,
        })
    }

    /// 作成して即座に取得
    ///
    /// 入力不正のみ `Err`。取得失敗は `LoadState::Failed` として保持する。
    pub async fn initialize<S: HistorySource>(
        category: &str,
        url: &str,
        source: &S,
    ) -> Result<Self> {
        let mut controller = Self::new(category, url)?;
        controller.fetch(source).await;
        Ok(controller)
    }

    pub async fn fetch<S: HistorySource>(&mut self, source: &S) -> &LoadState {
        let ticket = self.begin_fetch();
        let result = source.fetch_history(&self.url).await;
        self.complete_fetch(ticket, result);
        &self.state
    }

    /// 取得開始（以前の要求は無効になる）
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        log::debug!(
            "history fetch #{} for {} ({})",
            self.generation,
            self.category,
            self.url
        );
        FetchTicket {
            generation: self.generation,
        }
    }

    /// 取得結果を反映
    ///
    /// 最新の要求でなければ何もせず `false`。
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<DetectionRecord>>,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "dropping stale history response #{} (current #{})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(mut records) => {
                sort_by_recency(&mut records);
                log::info!("loaded {} {} records", records.len(), self.category);
                self.records = records;
                self.rederive();
                self.state = LoadState::Ready;
            }
            Err(e) => {
                log::error!("error fetching {} history: {}", self.category, e);
                self.state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    /// ラベルで絞り込む（`None` / 空文字で解除）。再取得はしない。
    pub fn set_filter(&mut self, feature: Option<&str>) {
        let filter = FeatureFilter::from_selection(feature);
        if filter != self.filter {
            log::debug!("filter {} -> {}", self.filter, filter);
            self.filter = filter;
            self.rederive();
        }
    }

    fn rederive(&mut self) {
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.filter.matches(r))
            .map(|(i, _)| i)
            .collect();
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn features(&self) -> &'static [&'static str] {
        self.category.features()
    }

    pub fn active_filter(&self) -> &FeatureFilter {
        &self.filter
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// 表示対象（新しい順、絞り込み済み）
    pub fn displayed(&self) -> Vec<&DetectionRecord> {
        self.visible.iter().map(|&i| &self.records[i]).collect()
    }

    /// 取得済みの全件数（絞り込み前）
    pub fn total_records(&self) -> usize {
        self.records.len()
    }

    pub fn view(&self) -> HistoryView<'_> {
        HistoryView {
            category: self.category.name(),
            features: self.features(),
            filter: &self.filter,
            state: &self.state,
            records: self.displayed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn record(id: &str, label: &str, secs: i64) -> DetectionRecord {
        DetectionRecord {
            id: id.to_string(),
            image_uri: format!("https://img/{}.jpg", id),
            label: Some(label.to_string()),
            score: None,
            ratio: None,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    fn ids(c: &HistoryController) -> Vec<String> {
        c.displayed().iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_new_rejects_missing_input() {
        assert!(matches!(
            HistoryController::new("", "tree-1"),
            Err(TeaDoctorError::InvalidInput(_))
        ));
        assert!(matches!(
            HistoryController::new("Blister Blight", "  "),
            Err(TeaDoctorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_new_rejects_unsafe_url() {
        for bad in ["a?b=1", "a#frag", "a b", "../admin", "a//b", "/lead"] {
            assert!(
                HistoryController::new("Blister Blight", bad).is_err(),
                "accepted {:?}",
                bad
            );
        }
        assert!(HistoryController::new("Blister Blight", "blister/64f1a2").is_ok());
    }

    #[test]
    fn test_new_is_idle_with_category_features() {
        let c = HistoryController::new("Stem and Branch", "stem").unwrap();
        assert_eq!(c.state(), &LoadState::Idle);
        assert_eq!(c.features(), &["healthy", "bark_cancer", "leaf_cancer"]);

        let unknown = HistoryController::new("Insect", "insect").unwrap();
        assert_eq!(unknown.features(), &["healthy"]);
    }

    #[test]
    fn test_complete_sorts_and_clears_loading() {
        let mut c = HistoryController::new("Blister Blight", "blister").unwrap();
        let t = c.begin_fetch();
        assert!(c.is_loading());

        let applied = c.complete_fetch(
            t,
            Ok(vec![
                record("a", "healthy", 1),
                record("b", "blister_blight", 3),
                record("c", "healthy", 2),
            ]),
        );
        assert!(applied);
        assert_eq!(c.state(), &LoadState::Ready);
        assert_eq!(ids(&c), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut c = HistoryController::new("Blister Blight", "blister").unwrap();
        let slow = c.begin_fetch();
        let fast = c.begin_fetch();

        assert!(c.complete_fetch(fast, Ok(vec![record("new", "healthy", 10)])));
        assert!(!c.complete_fetch(slow, Ok(vec![record("old", "healthy", 1)])));

        assert_eq!(ids(&c), vec!["new"]);
        assert_eq!(c.state(), &LoadState::Ready);
    }

    #[test]
    fn test_failure_keeps_previous_records() {
        let mut c = HistoryController::new("Blister Blight", "blister").unwrap();
        let t = c.begin_fetch();
        c.complete_fetch(t, Ok(vec![record("a", "healthy", 1)]));

        let t = c.begin_fetch();
        c.complete_fetch(t, Err(TeaDoctorError::ResponseShape("missing data".into())));

        assert!(!c.is_loading());
        assert!(c.error().unwrap().contains("missing data"));
        assert_eq!(ids(&c), vec!["a"]);
    }

    #[test]
    fn test_filter_is_local_and_clearable() {
        let mut c = HistoryController::new("Blister Blight", "blister").unwrap();
        let t = c.begin_fetch();
        c.complete_fetch(
            t,
            Ok(vec![
                record("a", "healthy", 1),
                record("b", "blister_blight", 2),
                record("c", "healthy", 3),
            ]),
        );

        c.set_filter(Some("blister_blight"));
        assert_eq!(ids(&c), vec!["b"]);
        // 再取得は発生しない
        assert_eq!(c.state(), &LoadState::Ready);

        c.set_filter(Some("blister_blight"));
        assert_eq!(ids(&c), vec!["b"]);

        c.set_filter(Some(""));
        assert_eq!(ids(&c), vec!["c", "b", "a"]);
        c.set_filter(Some("healthy"));
        c.set_filter(None);
        assert_eq!(c.active_filter(), &FeatureFilter::All);
        assert_eq!(c.total_records(), 3);
    }

    #[test]
    fn test_filter_survives_refetch() {
        let mut c = HistoryController::new("Stem and Branch", "stem").unwrap();
        c.set_filter(Some("cancer"));
        let t = c.begin_fetch();
        c.complete_fetch(
            t,
            Ok(vec![
                record("a", "bark_cancer", 1),
                record("b", "healthy", 2),
                record("c", "leaf_cancer", 3),
            ]),
        );
        assert_eq!(ids(&c), vec!["c", "a"]);
    }

    #[test]
    fn test_exit_code_per_state() {
        assert_eq!(LoadState::Idle.exit_code(), 0);
        assert_eq!(LoadState::Ready.exit_code(), 0);
        assert_eq!(LoadState::Loading.exit_code(), 0);
        assert_eq!(LoadState::Failed("down".into()).exit_code(), 2);
    }

    fn arb_label() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("healthy".to_string()),
            Just("bark_cancer".to_string()),
            Just("leaf_cancer".to_string()),
            Just(String::new()),
            "[a-z_]{1,8}",
        ]
    }

    proptest! {
        #[test]
        fn prop_set_filter_twice_shows_same_records(
            entries in prop::collection::vec((arb_label(), 0i64..50), 0..25),
            selection in prop::option::of(arb_label()),
        ) {
            let mut c = HistoryController::new("Stem and Branch", "stem").unwrap();
            let t = c.begin_fetch();
            let records = entries
                .iter()
                .enumerate()
                .map(|(i, (label, secs))| record(&i.to_string(), label, *secs))
                .collect();
            c.complete_fetch(t, Ok(records));

            c.set_filter(selection.as_deref());
            let once: Vec<DetectionRecord> = c.displayed().into_iter().cloned().collect();
            c.set_filter(selection.as_deref());
            let twice: Vec<DetectionRecord> = c.displayed().into_iter().cloned().collect();

            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(c.state(), &LoadState::Ready);
        }
    }
}
