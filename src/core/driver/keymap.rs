//! スキャンコード→文字の変換表
//!
//! US配列・スキャンコードセット1のみ

/// スキャンコードから基本文字（未割り当ては0）を引く表
pub trait ScancodeMap {
    /// 表の読み込み・初期化
    fn init(&mut self) {}

    /// `code` に対応する文字。割り当てがなければ0
    fn lookup(&self, code: u8) -> u8;
}

const ESC: u8 = 0x1B;
const BS: u8 = 0x08;

#[rustfmt::skip]
static US_SET1: [u8; 0x80] = [
    // 0x00
    0,    ESC,  b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'0', b'-', b'=', BS,   b'\t',
    // 0x10
    b'q', b'w', b'e', b'r', b't', b'y', b'u', b'i', b'o', b'p', b'[', b']', b'\n', 0,   b'a', b's',
    // 0x20
    b'd', b'f', b'g', b'h', b'j', b'k', b'l', b';', b'\'', b'`', 0,   b'\\', b'z', b'x', b'c', b'v',
    // 0x30
    b'b', b'n', b'm', b',', b'.', b'/', 0,    b'*', 0,    b' ', 0,    0,    0,    0,    0,    0,
    // 0x40
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 0x50
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 0x60
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 0x70
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// US配列
#[derive(Debug, Default, Clone, Copy)]
pub struct UsKeymap;

impl ScancodeMap for UsKeymap {
    fn lookup(&self, code: u8) -> u8 {
        US_SET1.get(usize::from(code)).copied().unwrap_or(0)
    }
}
