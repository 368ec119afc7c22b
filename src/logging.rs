//! ログ初期化
//!
//! `RUST_LOG` が設定されていればそれを優先し、なければ `--verbose` で debug、
//! 既定は warn。出力先は stderr（画面描画の stdout と混ざらない）。

use log::LevelFilter;

pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

pub fn init(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level(verbose));
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.format_timestamp_millis();
    // 二重初期化（テスト等）は無視
    let _ = builder.try_init();
}
