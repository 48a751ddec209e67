//! mochiDbgのResultとエラー型を定義
//!
//! すべてのエラーをResult型で表現し、panicを禁止

use core::fmt;

/// トップレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// デバイスエラー
    Device(Device),
    /// 無効なパラメータ
    InvalidParam,
}

/// デバイス関連
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// ポーリング予算内に読み取り可能なバイトがなかった
    Timeout,
    /// 入力バッファが空かなかった
    WriteTimeout,
}

impl Error {
    /// このエラーがリトライ可能かどうか
    ///
    /// コントローラのバッファ状態は時間とともに変わるため、後で呼び直せば成功する可能性がある
    /// - `Device::Timeout`
    /// - `Device::WriteTimeout`
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Device(Device::Timeout) => true,
            Error::Device(Device::WriteTimeout) => true,
            Error::InvalidParam => false,
        }
    }
}

impl fmt::Display for Error {
    /// エラーをフォーマット表示
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Device(e) => write!(f, "Device error: {}", e),
            Error::InvalidParam => write!(f, "Invalid parameter"),
        }
    }
}

impl fmt::Display for Device {
    /// エラーをフォーマット表示
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Timeout => write!(f, "no data from i8042 within polling budget"),
            Device::WriteTimeout => write!(f, "i8042 input buffer never cleared"),
        }
    }
}

impl From<Device> for Error {
    fn from(e: Device) -> Self {
        Error::Device(e)
    }
}

/// エラーを分類してログに残す
///
/// リトライで回復しうるものはWarn、それ以外は呼び出し側の誤りとしてError
pub fn handle_error(error: Error) {
    if error.is_retryable() {
        crate::warn!("{} (retryable)", error);
    } else {
        crate::error!("{}", error);
    }
}

/// 結果型のエイリアス
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_errors_are_retryable() {
        assert!(Error::Device(Device::Timeout).is_retryable());
        assert!(Error::Device(Device::WriteTimeout).is_retryable());
        assert!(!Error::InvalidParam.is_retryable());
    }

    #[test]
    fn test_from_device() {
        let e: Error = Device::WriteTimeout.into();
        assert_eq!(e, Error::Device(Device::WriteTimeout));
    }

    #[test]
    fn test_handle_error_without_serial() {
        handle_error(Error::Device(Device::WriteTimeout));
        handle_error(Error::InvalidParam);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::Device(Device::Timeout).to_string(),
            "Device error: no data from i8042 within polling budget"
        );
        assert_eq!(Error::InvalidParam.to_string(), "Invalid parameter");
    }
}
