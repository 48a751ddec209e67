//! PS/2キーボードドライバ（ポーリング専用）
//!
//! ホストOSの下で動くデバッガから、割込みを使わずにi8042を直接読む。
//! 読んだスキャンコードはコントローラへ書き戻してホストOSにも届けられる。

use super::keymap::{ScancodeMap, UsKeymap};
use super::port::{command, Config, Controller, ControllerIo, Register, Stall};
use super::scancode::{translate, ModifierState};
use crate::result::{handle_error, Device, Error, Result};
use crate::{debug, info, trace};

/// 1回のポーリングで得たバイト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    /// 生のスキャンコード
    pub scancode: u8,
    /// マウス由来のバイトか
    pub is_mouse: bool,
}

/// デバッガセッションが所有するキーボード
///
/// 修飾キーの状態はこの値の中にだけある。複数の文脈から使う場合は呼び出し側で排他すること
pub struct Keyboard<I, S, M = UsKeymap> {
    controller: Controller<I, S>,
    keymap: M,
    modifiers: ModifierState,
}

impl<I: ControllerIo, S: Stall> Keyboard<I, S, UsKeymap> {
    /// US配列・既定のポーリング設定で作成
    pub fn new(io: I, stall: S) -> Self {
        Self {
            controller: Controller::new(io, stall, Config::DEFAULT),
            keymap: UsKeymap,
            modifiers: ModifierState::new(),
        }
    }
}

impl<I: ControllerIo, S: Stall, M: ScancodeMap> Keyboard<I, S, M> {
    /// 設定が不正ならログに残して `Error::InvalidParam` を返す
    pub fn with_config(io: I, stall: S, keymap: M, config: Config) -> Result<Self> {
        if let Err(e) = config.validate() {
            handle_error(e);
            return Err(e);
        }
        Ok(Self {
            controller: Controller::new(io, stall, config),
            keymap,
            modifiers: ModifierState::new(),
        })
    }

    /// 変換表を初期化し、修飾キーをすべて離した状態に戻す
    pub fn init(&mut self) -> Result<()> {
        self.keymap.init();
        self.modifiers.reset();
        info!("i8042 keyboard initialized");
        Ok(())
    }

    pub fn modifiers(&self) -> &ModifierState {
        &self.modifiers
    }

    pub fn controller(&self) -> &Controller<I, S> {
        &self.controller
    }

    /// ステータスを1回だけ見て、読めるバイトがあれば取り出す
    ///
    /// 出力バッファが空の場合とパリティエラーの場合は区別せずNoneを返す。
    /// パリティエラーでもデータポートは読むので、そのバイトは失われる
    fn read_byte(&mut self) -> Option<Keystroke> {
        let status = self.controller.read_status();
        if !status.output_buffer_full() {
            return None;
        }

        let scancode = self.controller.read_data();
        if status.parity_error() {
            return None;
        }

        Some(Keystroke {
            scancode,
            is_mouse: status.transmit_timeout(),
        })
    }

    /// 1バイト読めるまでポーリングする
    ///
    /// `unget` が真なら、読んだバイトをコントローラへ書き戻してホストOSにも見せる。
    /// 書き戻しは成否を確認しない
    pub fn read_keystroke(&mut self, unget: bool) -> Result<Keystroke> {
        let mut remaining = self.controller.config().poll_iterations;

        let keystroke = loop {
            if remaining == 0 {
                trace!("no keystroke within polling budget");
                return Err(Error::Device(Device::Timeout));
            }
            if let Some(keystroke) = self.read_byte() {
                break keystroke;
            }
            self.controller.stall();
            remaining -= 1;
        };

        if unget {
            self.unget(keystroke.scancode);
        }

        Ok(keystroke)
    }

    /// スキャンコードを出力バッファへ戻す
    fn unget(&mut self, scancode: u8) {
        trace!("unget scancode {:#04x}", scancode);

        let _ = self
            .controller
            .write_register(Register::Command, command::DISABLE_KEYBOARD);
        let _ = self
            .controller
            .write_register(Register::Command, command::WRITE_OUTPUT);
        let _ = self.controller.write_register(Register::Data, scancode);
        let _ = self
            .controller
            .write_register(Register::Command, command::ENABLE_KEYBOARD);
    }

    /// スキャンコードを文字へ変換する。修飾キー・離上・応答コードは0
    pub fn scancode_to_keycode(&mut self, scancode: u8) -> u8 {
        translate(&self.keymap, &mut self.modifiers, scancode)
    }

    /// マウスポートの有効/無効を切り替える
    ///
    /// 書き込みの成否にかかわらず成功を返す
    pub fn set_mouse(&mut self, enabled: bool) -> Result<()> {
        let cmd = if enabled {
            command::ENABLE_MOUSE
        } else {
            command::DISABLE_MOUSE
        };

        debug!("mouse {}", if enabled { "enabled" } else { "disabled" });
        let _ = self.controller.write_register(Register::Command, cmd);

        Ok(())
    }

    /// 1回ポーリングして文字に変換する
    ///
    /// マウスのバイトと文字にならないバイトはNone
    pub fn read_keycode(&mut self, unget: bool) -> Result<Option<u8>> {
        let keystroke = self.read_keystroke(unget)?;
        if keystroke.is_mouse {
            return Ok(None);
        }

        match self.scancode_to_keycode(keystroke.scancode) {
            0 => Ok(None),
            ch => Ok(Some(ch)),
        }
    }
}
