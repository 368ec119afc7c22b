//! 病害カテゴリと選択可能なラベルの対応表

use std::fmt;

/// 未知のカテゴリに対するラベル一覧
pub const DEFAULT_FEATURES: &[&str] = &["healthy"];

/// カテゴリ設定（表示名 → ラベル一覧）
#[derive(Debug, Clone, Copy)]
pub struct CategoryConfig {
    pub name: &'static str,
    pub features: &'static [&'static str],
}

/// カテゴリ対応表
pub const CATEGORY_TABLE: &[CategoryConfig] = &[
    CategoryConfig {
        name: "Blister Blight",
        features: &["healthy", "blister_blight"],
    },
    CategoryConfig {
        name: "Stem and Branch",
        features: &["healthy", "bark_cancer", "leaf_cancer"],
    },
];

/// 病害カテゴリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    BlisterBlight,
    StemAndBranch,
    Other(String),
}

impl Category {
    /// カテゴリ名を解釈（全入力に対して成功する）
    pub fn parse(name: &str) -> Self {
        match name {
            "Blister Blight" => Category::BlisterBlight,
            "Stem and Branch" => Category::StemAndBranch,
            other => Category::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Category::BlisterBlight => "Blister Blight",
            Category::StemAndBranch => "Stem and Branch",
            Category::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }

    pub fn features(&self) -> &'static [&'static str] {
        feature_list(self.name())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// カテゴリ名から選択可能なラベル一覧を返す
///
/// 未知のカテゴリは `["healthy"]`。戻り値は常に空でない。
pub fn feature_list(category: &str) -> &'static [&'static str] {
    CATEGORY_TABLE
        .iter()
        .find(|c| c.name == category)
        .map(|c| c.features)
        .unwrap_or(DEFAULT_FEATURES)
}

/// 既知のカテゴリ名一覧
pub fn known_categories() -> impl Iterator<Item = &'static str> {
    CATEGORY_TABLE.iter().map(|c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_list_known() {
        assert_eq!(feature_list("Blister Blight"), &["healthy", "blister_blight"]);
        assert_eq!(
            feature_list("Stem and Branch"),
            &["healthy", "bark_cancer", "leaf_cancer"]
        );
    }

    #[test]
    fn test_feature_list_unknown_defaults_to_healthy() {
        assert_eq!(feature_list("Root Rot"), &["healthy"]);
        assert_eq!(feature_list(""), &["healthy"]);
        // 大文字小文字は区別する
        assert_eq!(feature_list("blister blight"), &["healthy"]);
    }

    #[test]
    fn test_category_parse_roundtrip() {
        for name in known_categories() {
            let c = Category::parse(name);
            assert!(c.is_known());
            assert_eq!(c.name(), name);
        }
        let other = Category::parse("Insect");
        assert_eq!(other, Category::Other("Insect".into()));
        assert_eq!(other.features(), DEFAULT_FEATURES);
    }

    #[test]
    fn test_table_rows_non_empty() {
        assert!(CATEGORY_TABLE.iter().all(|c| !c.features.is_empty()));
    }
}
