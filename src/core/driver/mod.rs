//! i8042 (PS/2) コントローラのドライバ

/// スキャンコード変換表
pub mod keymap;

/// ポートI/Oとポーリング設定
pub mod port;

/// ポーリング専用キーボード
pub mod ps2_keyboard;

/// スキャンコード変換と修飾キー
pub mod scancode;

#[cfg(test)]
pub(crate) mod mock;

pub use keymap::{ScancodeMap, UsKeymap};
pub use port::{
    Config, Controller, ControllerIo, HardwarePorts, PostDelay, Register, Stall, Status,
};
pub use ps2_keyboard::{Keyboard, Keystroke};
pub use scancode::ModifierState;
