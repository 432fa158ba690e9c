//! ピース列の診断出力
//!
//! テストやデバッグ時にピース構成と再構成テキストを確認するためのもの

use super::piece_table::PieceTable;
use std::fmt::Write;

const RULE: &str = "---------";
const FOOTER: &str = "--------------------";

impl PieceTable {
    /// ピース列の一覧（種別・開始位置・長さ）と再構成テキストを返す
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // String への書き込みは失敗しない
        let _ = writeln!(out, "Original:");
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "{}", self.original());
        let _ = writeln!(out, "{}", RULE);
        for piece in self.pieces() {
            let _ = writeln!(
                out,
                "Type: {} Offset: {} Length: {}",
                piece.source, piece.start, piece.length
            );
        }
        let _ = writeln!(out, "{}", self);
        let _ = writeln!(out, "{}", FOOTER);
        out
    }
}
