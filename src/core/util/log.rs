//! ロギングユーティリティ

use core::sync::atomic::{AtomicU8, Ordering};

/// ログレベル
///
/// 判別子の大小がそのまま重要度の大小になる
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }

    /// 行頭に付ける固定幅のタグ
    const fn tag(self) -> &'static str {
        match self {
            LogLevel::Trace => "[TRACE]",
            LogLevel::Debug => "[DEBUG]",
            LogLevel::Info => "[INFO] ",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Error => "[ERROR]",
        }
    }
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

/// しきい値を変える。デバッガのコマンドから呼ばれる想定
pub fn set_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// 現在のしきい値
pub fn level() -> LogLevel {
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

pub fn enabled(level: LogLevel) -> bool {
    level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

/// COM1へ1行書く。シリアル未初期化なら捨てる
pub fn log(level: LogLevel, args: core::fmt::Arguments) {
    if !enabled(level) || !crate::util::console::is_ready() {
        return;
    }

    crate::sprintln!("{} [kbd] {}", level.tag(), args);
}

/// トレースログ
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::util::log::log($crate::util::log::LogLevel::Trace, format_args!($($arg)*))
    };
}

/// デバッグログ
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::util::log::log($crate::util::log::LogLevel::Debug, format_args!($($arg)*))
    };
}

/// 情報ログ
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::util::log::log($crate::util::log::LogLevel::Info, format_args!($($arg)*))
    };
}

/// 警告ログ
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::util::log::log($crate::util::log::LogLevel::Warn, format_args!($($arg)*))
    };
}

/// エラーログ
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::util::log::log($crate::util::log::LogLevel::Error, format_args!($($arg)*))
    };
}
