//! シリアルポート出力
//!
//! デバッガのログはCOM1へ直接書き出す

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use spin::Mutex;
use x86_64::instructions::port::Port;

/// 送信可能になるまで待つ最大回数
const TX_SPIN_LIMIT: u32 = 100_000;

/// シリアルポート (COM1)
pub static SERIAL: Mutex<SerialPort> = Mutex::new(SerialPort::new(0x3F8));

/// init()済みかどうか
static READY: AtomicBool = AtomicBool::new(false);

/// 割込み無効化を伴うロック取得
fn lock_serial<F, R>(f: F) -> R
where
    F: FnOnce(&mut SerialPort) -> R,
{
    x86_64::instructions::interrupts::without_interrupts(|| {
        let mut serial = SERIAL.lock();
        f(&mut serial)
    })
}

/// UARTシリアルポート
pub struct SerialPort {
    /// データ
    data: Port<u8>,
    /// 割り込み有効化
    int_en: Port<u8>,
    /// FIFO制御
    fifo_ctrl: Port<u8>,
    /// ライン制御
    line_ctrl: Port<u8>,
    /// モデム制御
    modem_ctrl: Port<u8>,
    /// ラインステータス
    line_status: Port<u8>,
}

impl SerialPort {
    /// 新しいシリアルポートを作成
    const fn new(base: u16) -> Self {
        Self {
            data: Port::new(base),
            int_en: Port::new(base + 1),
            fifo_ctrl: Port::new(base + 2),
            line_ctrl: Port::new(base + 3),
            modem_ctrl: Port::new(base + 4),
            line_status: Port::new(base + 5),
        }
    }

    /// シリアルポートを初期化
    fn init(&mut self) {
        unsafe {
            // 割り込み無効（ポーリングのみ）
            self.int_en.write(0x00);
            // ボーレート設定を有効化
            self.line_ctrl.write(0x80);
            // ボーレート = 115200 (divisor = 1)
            self.data.write(0x01);
            self.int_en.write(0x00);
            // 8ビット, パリティなし, 1ストップビット
            self.line_ctrl.write(0x03);
            // FIFOを有効化, クリア, 14バイトしきい値
            self.fifo_ctrl.write(0xC7);
            // データ端末レディ, リクエスト送信
            self.modem_ctrl.write(0x03);
        }
    }

    /// 1バイト送信
    ///
    /// 送信バッファが空かなければそのバイトは捨てる
    fn send_byte(&mut self, byte: u8) {
        unsafe {
            for _ in 0..TX_SPIN_LIMIT {
                if self.line_status.read() & 0x20 != 0 {
                    self.data.write(byte);
                    return;
                }
            }
        }
    }

    /// 文字列を送信
    fn send_str(&mut self, s: &str) {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.send_byte(b'\r');
            }
            self.send_byte(byte);
        }
    }
}

impl fmt::Write for SerialPort {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.send_str(s);
        Ok(())
    }
}

/// シリアルポートを初期化し、ログ出力を有効にする
///
/// # Safety
/// COM1 (0x3F8-0x3FF) を呼び出し側が専有していること
pub unsafe fn init() {
    lock_serial(|serial| serial.init());
    READY.store(true, Ordering::Release);
}

/// シリアル出力が有効かどうか
pub fn is_ready() -> bool {
    READY.load(Ordering::Acquire)
}

/// シリアルポートに文字列を出力
pub fn print(args: fmt::Arguments) {
    use core::fmt::Write;

    if !is_ready() {
        return;
    }
    lock_serial(|serial| {
        let _ = serial.write_fmt(args);
    });
}

/// シリアル出力マクロ
#[macro_export]
macro_rules! sprint {
    ($($arg:tt)*) => {
        $crate::util::console::print(format_args!($($arg)*))
    };
}

/// 改行付きのシリアル出力マクロ
#[macro_export]
macro_rules! sprintln {
    () => ($crate::sprint!("\n"));
    ($($arg:tt)*) => {
        $crate::sprint!("{}\n", format_args!($($arg)*))
    };
}
