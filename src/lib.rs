//! ptable - piece table text storage
//!
//! 編集可能な文書を、不変の元バッファと追記専用の追加バッファへの参照列として保持する

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod buffer;
pub mod file;

// 公開API
pub use buffer::{Piece, PieceTable, Source};
pub use config::PieceTableConfig;
pub use error::{BufferError, PtableError, Result};
