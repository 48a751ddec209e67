//! ハイパーバイザ常駐デバッガ用のi8042キーボード入力
//!
//! OSのキーボードスタックより先にi8042を直接ポーリングし、
//! スキャンコードを文字へ変換する。割込みは使わない。
//!
//! ```no_run
//! use mochidbg_kbd::{HardwarePorts, Keyboard, PostDelay};
//!
//! let mut kbd = unsafe { Keyboard::new(HardwarePorts::new(), PostDelay::new()) };
//! let _ = kbd.init();
//! if let Ok(Some(ch)) = kbd.read_keycode(true) {
//!     let _ = ch;
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

/// ユーティリティモジュール
pub mod util;

/// エラー型定義
pub mod result;

/// i8042ドライバ
pub mod driver;

pub use driver::{
    Config, ControllerIo, HardwarePorts, Keyboard, Keystroke, ModifierState, PostDelay,
    ScancodeMap, Stall, UsKeymap,
};
pub use result::{Error, Result};
