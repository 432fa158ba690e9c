//! バッファ管理モジュール
//!
//! ピーステーブルによる文書表現と、その構成要素（ピース・追加バッファ）を提供

pub mod add_buffer;
pub mod dump;
pub mod piece;
pub mod piece_table;
pub mod segments;

// 公開API
pub use add_buffer::AddBuffer;
pub use piece::{Piece, Source};
pub use piece_table::PieceTable;
pub use segments::Segments;
pub use crate::error::BufferError;
