//! 履歴の並べ替え

use crate::types::DetectionRecord;

/// 作成日時の降順（新しい順）に並べ替え
///
/// 安定ソートなので同時刻のレコードはレスポンス順を保つ。
pub fn sort_by_recency(records: &mut [DetectionRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// 新しい順に並んでいるか
pub fn is_sorted_by_recency(records: &[DetectionRecord]) -> bool {
    records.windows(2).all(|w| w[0].created_at >= w[1].created_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn record(id: &str, secs: i64) -> DetectionRecord {
        DetectionRecord {
            id: id.to_string(),
            image_uri: String::new(),
            label: Some("healthy".into()),
            score: None,
            ratio: None,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    fn ids(records: &[DetectionRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_sort_descending() {
        let mut records = vec![record("a", 10), record("b", 30), record("c", 20)];
        sort_by_recency(&mut records);
        assert_eq!(ids(&records), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ties_keep_response_order() {
        let mut records = vec![
            record("first", 5),
            record("newest", 9),
            record("second", 5),
            record("third", 5),
        ];
        sort_by_recency(&mut records);
        assert_eq!(ids(&records), vec!["newest", "first", "second", "third"]);
    }

    #[test]
    fn test_empty_and_single() {
        let mut empty: Vec<DetectionRecord> = Vec::new();
        sort_by_recency(&mut empty);
        assert!(is_sorted_by_recency(&empty));

        let mut one = vec![record("x", 1)];
        sort_by_recency(&mut one);
        assert_eq!(ids(&one), vec!["x"]);
    }

    proptest! {
        #[test]
        fn prop_sorted_non_increasing(secs in prop::collection::vec(0i64..1_000, 0..60)) {
            let mut records: Vec<DetectionRecord> = secs
                .iter()
                .enumerate()
                .map(|(i, s)| record(&i.to_string(), *s))
                .collect();
            sort_by_recency(&mut records);
            prop_assert!(is_sorted_by_recency(&records));
            prop_assert_eq!(records.len(), secs.len());
        }
    }
}
