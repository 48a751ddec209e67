//! ユーティリティモジュール

/// シリアル出力
pub mod console;

/// ロギング
pub mod log;
