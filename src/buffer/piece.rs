//! ピース記述子
//!
//! どのバッファのどの範囲を参照するかだけを保持する軽量な値型

use std::fmt;
use std::ops::Range;

/// ピースが参照するバッファ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// 作成時に渡された不変の元テキスト
    Original,
    /// 挿入テキストを追記し続けるバッファ
    Addition,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Original => write!(f, "ORIGINAL"),
            Source::Addition => write!(f, "ADDITION"),
        }
    }
}

/// バッファ内の連続範囲 `[start, start + length)` を指すピース
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub source: Source,
    pub start: usize,
    pub length: usize,
}

impl Piece {
    pub fn new(source: Source, start: usize, length: usize) -> Self {
        Self {
            source,
            start,
            length,
        }
    }

    /// 参照範囲の終端（排他的）
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// ピース内オフセットで左右に分割する
    ///
    /// どちらかが空になる場合は `None` を返す
    pub fn split_at(&self, offset: usize) -> (Option<Piece>, Option<Piece>) {
        let offset = offset.min(self.length);
        let left = Piece::new(self.source, self.start, offset);
        let right = Piece::new(self.source, self.start + offset, self.length - offset);
        (non_empty(left), non_empty(right))
    }

    /// 先頭から `count` バイトを落とした残り
    pub(crate) fn skip(&self, count: usize) -> Option<Piece> {
        self.split_at(count).1
    }

    /// 先頭 `count` バイトだけ残したもの
    pub(crate) fn truncate(&self, count: usize) -> Option<Piece> {
        self.split_at(count).0
    }
}

fn non_empty(piece: Piece) -> Option<Piece> {
    (!piece.is_empty()).then_some(piece)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_inside() {
        let piece = Piece::new(Source::Original, 4, 6);
        let (left, right) = piece.split_at(2);
        assert_eq!(left, Some(Piece::new(Source::Original, 4, 2)));
        assert_eq!(right, Some(Piece::new(Source::Original, 6, 4)));
    }

    #[test]
    fn test_split_at_edges_omits_empty_side() {
        let piece = Piece::new(Source::Addition, 0, 3);
        assert_eq!(piece.split_at(0), (None, Some(piece)));
        assert_eq!(piece.split_at(3), (Some(piece), None));
    }

    #[test]
    fn test_skip_and_truncate() {
        let piece = Piece::new(Source::Addition, 10, 5);
        assert_eq!(piece.skip(2), Some(Piece::new(Source::Addition, 12, 3)));
        assert_eq!(piece.truncate(2), Some(Piece::new(Source::Addition, 10, 2)));
        assert_eq!(piece.skip(5), None);
    }
}
