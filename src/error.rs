//! エラーハンドリングシステム
//!
//! ピーステーブルと周辺アダプタで共有するエラー型とユーティリティを定義
//! 範囲外の編集やメモリ確保失敗はすべて明示的な失敗として呼び出し元へ返す

use thiserror::Error;

/// クレート全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum PtableError {
    /// ファイル操作エラー
    #[error("File operation failed: {0}")]
    File(#[from] FileError),

    /// バッファ操作エラー
    #[error("Buffer operation failed: {0}")]
    Buffer(#[from] BufferError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// ピーステーブル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Position {position} is out of bounds (document length {length})")]
    IndexOutOfBounds { position: usize, length: usize },

    #[error("Position {position} is not on a character boundary")]
    NotCharBoundary { position: usize },

    #[error("Failed to allocate {requested} bytes of backing storage")]
    AllocationFailure { requested: usize },
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone)]
pub enum FileError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Invalid configuration file: {path}")]
    InvalidFile { path: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// エラーコンテキスト付与のためのトレイト
///
/// 失敗をログへ記録してから `PtableError` に変換する
pub trait ErrorContext<T> {
    fn with_context_info(self, operation: &str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<PtableError>,
{
    fn with_context_info(self, operation: &str) -> Result<T> {
        self.map_err(|e| {
            let error = e.into();
            log::error!("{} failed: {}", operation, error);
            error
        })
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, PtableError>;

/// 各モジュール固有のResult型
pub mod file {
    pub type Result<T> = std::result::Result<T, super::FileError>;
}

pub mod buffer {
    pub type Result<T> = std::result::Result<T, super::BufferError>;
}

// std::io::Error から PtableError への変換
impl From<std::io::Error> for PtableError {
    fn from(error: std::io::Error) -> Self {
        PtableError::File(FileError::from(error))
    }
}

impl From<std::io::Error> for FileError {
    fn from(error: std::io::Error) -> Self {
        FileError::Io {
            message: error.to_string(),
        }
    }
}

// UTF-8エラーの変換
impl From<std::str::Utf8Error> for PtableError {
    fn from(error: std::str::Utf8Error) -> Self {
        PtableError::File(FileError::Encoding {
            message: format!("invalid UTF-8 at byte {}", error.valid_up_to()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_error_message() {
        let error = BufferError::IndexOutOfBounds {
            position: 12,
            length: 11,
        };
        assert_eq!(
            error.to_string(),
            "Position 12 is out of bounds (document length 11)"
        );
    }

    #[test]
    fn test_buffer_error_conversion() {
        let error: PtableError = BufferError::NotCharBoundary { position: 3 }.into();
        match error {
            PtableError::Buffer(BufferError::NotCharBoundary { position }) => {
                assert_eq!(position, 3);
            }
            _ => panic!("Expected NotCharBoundary error"),
        }
    }

    #[test]
    fn test_utf8_error_conversion() {
        let utf8_error = std::str::from_utf8(&[b'a', 0xff, 0xfe]).unwrap_err();
        let error: PtableError = utf8_error.into();

        match error {
            PtableError::File(FileError::Encoding { message }) => {
                assert!(message.contains("byte 1"));
            }
            _ => panic!("Expected Encoding error"),
        }
    }

    #[test]
    fn test_with_context_info_passes_ok_through() {
        let value: std::result::Result<u8, BufferError> = Ok(7);
        assert_eq!(value.with_context_info("read").unwrap(), 7);
    }
}
