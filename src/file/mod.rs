//! ファイル入出力アダプタ
//!
//! 読み込みは `PieceTable::create`、保存は断片列の書き出しだけを境界として使う

pub mod io;

pub use io::{expand_path, load, load_with_config, save};
