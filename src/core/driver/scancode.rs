//! スキャンコード→キーコード変換
//!
//! 修飾キーのラッチを保持し、押下イベントだけを文字に変換する

use super::keymap::ScancodeMap;

/// 離上フラグ
const RELEASE_FLAG: u8 = 0x80;

const LEFT_CTRL: u8 = 0x1D;
const LEFT_SHIFT: u8 = 0x2A;
const RIGHT_SHIFT: u8 = 0x36;
const LEFT_ALT: u8 = 0x38;

/// 修飾キーのラッチ状態
///
/// 右Ctrl/右AltはE0エスケープ付きの2バイトコードなので扱わない
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModifierState {
    left_ctrl: bool,
    left_shift: bool,
    right_shift: bool,
    left_alt: bool,
}

impl ModifierState {
    pub const fn new() -> Self {
        Self {
            left_ctrl: false,
            left_shift: false,
            right_shift: false,
            left_alt: false,
        }
    }

    pub fn left_ctrl(&self) -> bool {
        self.left_ctrl
    }

    pub fn left_shift(&self) -> bool {
        self.left_shift
    }

    pub fn right_shift(&self) -> bool {
        self.right_shift
    }

    pub fn left_alt(&self) -> bool {
        self.left_alt
    }

    /// どちらかのShiftが押されているか
    pub fn shift(&self) -> bool {
        self.left_shift || self.right_shift
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }

    /// 修飾キーならラッチを更新してtrueを返す
    fn latch(&mut self, scancode: u8) -> bool {
        let pressed = scancode & RELEASE_FLAG == 0;
        let slot = match scancode & !RELEASE_FLAG {
            LEFT_CTRL => &mut self.left_ctrl,
            LEFT_SHIFT => &mut self.left_shift,
            RIGHT_SHIFT => &mut self.right_shift,
            LEFT_ALT => &mut self.left_alt,
            _ => return false,
        };
        *slot = pressed;
        true
    }
}

/// コントローラのステータス・ACK・エラー応答
fn is_controller_response(scancode: u8) -> bool {
    matches!(
        scancode,
        0x00 // キーボードエラー
            | 0xAA // BAT成功
            | 0xEE // ECHO応答
            | 0xFA // ACK
            | 0xFC // BAT失敗
            | 0xFD // 内部エラー
            | 0xFE // NACK
            | 0xFF // キーボードエラー
    )
}

/// Shift+数字行の記号（US配列）
fn shifted_digit(ch: u8) -> Option<u8> {
    let sym = match ch {
        b'1' => b'!',
        b'2' => b'@',
        b'3' => b'#',
        b'4' => b'$',
        b'5' => b'%',
        b'6' => b'^',
        b'7' => b'&',
        b'8' => b'*',
        b'9' => b'(',
        b'0' => b')',
        _ => return None,
    };
    Some(sym)
}

/// スキャンコードを印字可能な文字へ変換する。対応がなければ0
///
/// 修飾キーのコードだけが `modifiers` を書き換える。
/// CtrlとAltのラッチは記録するだけで変換には使わない
pub fn translate<M: ScancodeMap + ?Sized>(
    keymap: &M,
    modifiers: &mut ModifierState,
    scancode: u8,
) -> u8 {
    if modifiers.latch(scancode) {
        return 0;
    }

    // 押下のみ文字になる
    if scancode & RELEASE_FLAG != 0 {
        return 0;
    }

    // 応答コードはホストOS側に任せる
    if is_controller_response(scancode) {
        return 0;
    }

    let ch = keymap.lookup(scancode);

    if modifiers.shift() && ch > 0x2F && ch < 0x3A {
        if let Some(sym) = shifted_digit(ch) {
            return sym;
        }
    }

    if modifiers.shift() && ch > 0x60 && ch < 0x7B {
        return ch.to_ascii_uppercase();
    }

    ch
}
