//! i8042コントローラのポートI/O
//!
//! ステータス/コマンド (0x64) とデータ (0x60) の3レジスタへのアクセスと、
//! 入力バッファが空くまで有限回だけ待つ書き込みを提供する。

use crate::debug;
use crate::result::{Device, Error, Result};
use x86_64::instructions::port::{Port, PortReadOnly, PortWriteOnly};

/// データポート（読み書き）
pub const DATA_PORT: u16 = 0x60;
/// ステータスポート（読み取り）
pub const STATUS_PORT: u16 = 0x64;
/// コマンドポート（書き込み、ステータスと同じアドレス）
pub const COMMAND_PORT: u16 = 0x64;

/// POST診断ポート。1回の書き込みでおよそ1µsかかる
const POST_PORT: u16 = 0x80;

/// ステータス/データを待つ反復回数の既定値
pub const POLL_STATUS_ITERATIONS: u32 = 12000;

/// i8042コマンド
pub mod command {
    /// 次にデータポートへ書いたバイトを出力バッファへ載せる
    pub const WRITE_OUTPUT: u8 = 0xD2;
    pub const DISABLE_KEYBOARD: u8 = 0xAD;
    pub const ENABLE_KEYBOARD: u8 = 0xAE;
    pub const DISABLE_MOUSE: u8 = 0xA7;
    pub const ENABLE_MOUSE: u8 = 0xA8;
}

/// 書き込み先レジスタ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// コマンド (0x64)
    Command,
    /// データ (0x60)
    Data,
}

impl Register {
    /// I/Oポート番号
    pub const fn port(self) -> u16 {
        match self {
            Register::Command => COMMAND_PORT,
            Register::Data => DATA_PORT,
        }
    }
}

/*
   8042 ステータスレジスタ (0x64 読み取り)

    |7|6|5|4|3|2|1|0|
     | | | | | | | `---- 出力バッファにデータあり
     | | | | | | `----- 入力バッファにデータあり（コントローラ処理待ち）
     | | | | | `------ システムフラグ
     | | | | `------- 入力バッファの内容がコマンド(1)かデータ(0)か
     | | | `-------- キーボード有効
     | | `--------- 送信タイムアウト（このコントローラではマウス由来を示す）
     | `---------- 受信タイムアウト
     `----------- パリティエラー
*/

/// ステータスレジスタのスナップショット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(u8);

impl Status {
    pub const OUTPUT_BUFFER_FULL: u8 = 1 << 0;
    pub const INPUT_BUFFER_FULL: u8 = 1 << 1;
    /// マウスからのバイトでセットされる
    pub const TRANSMIT_TIMEOUT: u8 = 1 << 5;
    pub const PARITY_ERROR: u8 = 1 << 7;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// データポートから読めるバイトがあるか
    pub const fn output_buffer_full(self) -> bool {
        self.0 & Self::OUTPUT_BUFFER_FULL != 0
    }

    /// コントローラがまだ前の書き込みを処理中か
    pub const fn input_buffer_full(self) -> bool {
        self.0 & Self::INPUT_BUFFER_FULL != 0
    }

    /// 送信タイムアウトビット（= バイトはマウス由来）
    pub const fn transmit_timeout(self) -> bool {
        self.0 & Self::TRANSMIT_TIMEOUT != 0
    }

    pub const fn parity_error(self) -> bool {
        self.0 & Self::PARITY_ERROR != 0
    }
}

/// コントローラのレジスタアクセス
pub trait ControllerIo {
    /// ステータスレジスタを読む
    fn read_status(&mut self) -> u8;
    /// データレジスタを読む
    fn read_data(&mut self) -> u8;
    /// レジスタへ無条件に書く
    fn write(&mut self, register: Register, value: u8);
}

/// ビジーウェイト
pub trait Stall {
    /// `micros` マイクロ秒だけ停止する
    fn stall(&mut self, micros: u32);
}

impl<F: FnMut(u32)> Stall for F {
    fn stall(&mut self, micros: u32) {
        self(micros)
    }
}

/// 実機のi8042ポート
pub struct HardwarePorts {
    data: Port<u8>,
    status: PortReadOnly<u8>,
    command: PortWriteOnly<u8>,
}

impl HardwarePorts {
    /// # Safety
    /// 呼び出し側が0x60/0x64を専有していること。
    /// ホストOSのドライバと同時にアクセスしてはならない
    pub const unsafe fn new() -> Self {
        Self {
            data: Port::new(DATA_PORT),
            status: PortReadOnly::new(STATUS_PORT),
            command: PortWriteOnly::new(COMMAND_PORT),
        }
    }
}

impl ControllerIo for HardwarePorts {
    fn read_status(&mut self) -> u8 {
        unsafe { self.status.read() }
    }

    fn read_data(&mut self) -> u8 {
        unsafe { self.data.read() }
    }

    fn write(&mut self, register: Register, value: u8) {
        unsafe {
            match register {
                Register::Command => self.command.write(value),
                Register::Data => self.data.write(value),
            }
        }
    }
}

/// ポート0x80への書き込みで時間を潰す
pub struct PostDelay {
    port: PortWriteOnly<u8>,
}

impl PostDelay {
    /// # Safety
    /// ポート0x80への書き込みが副作用を持たない環境であること
    pub const unsafe fn new() -> Self {
        Self {
            port: PortWriteOnly::new(POST_PORT),
        }
    }
}

impl Stall for PostDelay {
    fn stall(&mut self, micros: u32) {
        for _ in 0..micros {
            unsafe { self.port.write(0) };
        }
    }
}

/// ポーリング設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// 読み書きそれぞれで待つ最大反復回数
    pub poll_iterations: u32,
    /// 1反復あたりの停止時間 (µs)
    pub stall_micros: u32,
}

impl Config {
    pub const DEFAULT: Config = Config {
        poll_iterations: POLL_STATUS_ITERATIONS,
        stall_micros: 1,
    };

    /// 反復回数0では一度もポートを見ないため拒否する
    pub fn validate(&self) -> Result<()> {
        if self.poll_iterations == 0 {
            return Err(Error::InvalidParam);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// 反復回数で上限を切ったコントローラアクセス
pub struct Controller<I, S> {
    io: I,
    stall: S,
    config: Config,
}

impl<I: ControllerIo, S: Stall> Controller<I, S> {
    pub fn new(io: I, stall: S, config: Config) -> Self {
        Self { io, stall, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn io(&self) -> &I {
        &self.io
    }

    pub fn stall_source(&self) -> &S {
        &self.stall
    }

    pub fn read_status(&mut self) -> Status {
        Status::from_bits(self.io.read_status())
    }

    pub fn read_data(&mut self) -> u8 {
        self.io.read_data()
    }

    /// 1反復分停止する
    pub fn stall(&mut self) {
        self.stall.stall(self.config.stall_micros);
    }

    /// 入力バッファが空くのを待ってから書き込む
    ///
    /// 反復回数を使い切った場合は書き込まずに `Device::WriteTimeout` を返す。
    /// このとき停止はちょうど `poll_iterations` 回行われている
    pub fn write_register(&mut self, register: Register, value: u8) -> Result<()> {
        for _ in 0..self.config.poll_iterations {
            if !self.read_status().input_buffer_full() {
                self.io.write(register, value);
                return Ok(());
            }
            self.stall();
        }

        debug!(
            "write {:#04x} to port {:#x} timed out",
            value,
            register.port()
        );
        Err(Error::Device(Device::WriteTimeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{MockController, MockStall};

    #[test]
    fn test_status_bits() {
        let s = Status::from_bits(0xA1);
        assert!(s.output_buffer_full());
        assert!(!s.input_buffer_full());
        assert!(s.transmit_timeout());
        assert!(s.parity_error());
        assert_eq!(s.bits(), 0xA1);

        let s = Status::from_bits(Status::INPUT_BUFFER_FULL);
        assert!(s.input_buffer_full());
        assert!(!s.output_buffer_full());
    }

    #[test]
    fn test_register_ports() {
        assert_eq!(Register::Command.port(), 0x64);
        assert_eq!(Register::Data.port(), 0x60);
    }

    #[test]
    fn test_config_validate() {
        assert_eq!(Config::default(), Config::DEFAULT);
        assert_eq!(Config::DEFAULT.poll_iterations, 12000);
        assert!(Config::DEFAULT.validate().is_ok());

        let zero = Config {
            poll_iterations: 0,
            stall_micros: 1,
        };
        assert_eq!(zero.validate(), Err(Error::InvalidParam));
    }

    #[test]
    fn test_write_when_input_buffer_clear() {
        let mut ctl = Controller::new(
            MockController::new(0),
            MockStall::default(),
            Config::DEFAULT,
        );

        assert_eq!(
            ctl.write_register(Register::Command, command::ENABLE_MOUSE),
            Ok(())
        );
        assert_eq!(ctl.io().writes(), &[(Register::Command, 0xA8)]);
        assert_eq!(ctl.io().status_reads(), 1);
        assert_eq!(ctl.stall_source().calls(), 0);
    }

    #[test]
    fn test_write_waits_for_input_buffer() {
        let mut io = MockController::new(0);
        io.push_status(Status::INPUT_BUFFER_FULL);
        io.push_status(Status::INPUT_BUFFER_FULL);
        let mut ctl = Controller::new(io, MockStall::default(), Config::DEFAULT);

        assert_eq!(ctl.write_register(Register::Data, 0x1E), Ok(()));
        assert_eq!(ctl.io().writes(), &[(Register::Data, 0x1E)]);
        assert_eq!(ctl.io().status_reads(), 3);
        assert_eq!(ctl.stall_source().calls(), 2);
    }

    #[test]
    fn test_write_times_out_after_exact_budget() {
        let io = MockController::new(Status::INPUT_BUFFER_FULL);
        let mut ctl = Controller::new(io, MockStall::default(), Config::DEFAULT);

        assert_eq!(
            ctl.write_register(Register::Command, command::DISABLE_KEYBOARD),
            Err(Error::Device(Device::WriteTimeout))
        );
        assert!(ctl.io().writes().is_empty());
        assert_eq!(ctl.io().status_reads(), POLL_STATUS_ITERATIONS as usize);
        assert_eq!(ctl.stall_source().calls(), POLL_STATUS_ITERATIONS);
        assert_eq!(
            ctl.stall_source().total_micros(),
            POLL_STATUS_ITERATIONS as u64
        );
    }

    #[test]
    fn test_closure_as_stall() {
        let mut waited = 0u32;
        {
            let config = Config {
                poll_iterations: 3,
                stall_micros: 5,
            };
            let io = MockController::new(Status::INPUT_BUFFER_FULL);
            let mut ctl = Controller::new(io, |us: u32| waited += us, config);
            assert!(ctl.write_register(Register::Data, 0).is_err());
        }
        assert_eq!(waited, 15);
    }
}
