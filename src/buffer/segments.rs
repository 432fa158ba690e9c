//! 文書断片イテレータ
//!
//! ピースごとのバッファスライスを順に返す。コピーは行わない

use super::piece::Piece;
use super::piece_table::PieceTable;
use std::iter::FusedIterator;
use std::slice;

/// `PieceTable::segments` が返す断片イテレータ
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    table: &'a PieceTable,
    pieces: slice::Iter<'a, Piece>,
}

impl<'a> Segments<'a> {
    pub(crate) fn new(table: &'a PieceTable, pieces: slice::Iter<'a, Piece>) -> Self {
        Self { table, pieces }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.pieces.next().map(|piece| self.table.piece_text(piece))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pieces.size_hint()
    }
}

impl ExactSizeIterator for Segments<'_> {}

impl FusedIterator for Segments<'_> {}
