//! ピーステーブル実装
//!
//! 不変の元バッファと追記専用の追加バッファを、ピース列で繋ぎ合わせて文書を表現する。
//! 編集はピース列を編集位置の周辺だけ書き換え、バッファ本体はコピーしない。
//!
//! 位置と長さはすべて文書先頭からのバイトオフセット。編集境界は UTF-8 の文字境界に
//! 揃っている必要があり、そのため各ピースは常に完全な文字だけを含む。

use super::add_buffer::AddBuffer;
use super::piece::{Piece, Source};
use super::segments::Segments;
use crate::config::PieceTableConfig;
use crate::error::{buffer::Result, BufferError};
use std::fmt;
use std::io;
use std::ops::Range;

/// 削除範囲に対するピースの位置関係
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlap {
    /// 範囲の前か後ろにあり、接しているだけのものも含む
    Disjoint,
    /// ピース全体が範囲に含まれる
    Covered,
    /// 範囲がピースの内側に収まる
    Spans,
    /// 範囲の開始がピース内にあり、終端はピース末尾以降
    LeadingEdge,
    /// 範囲の終端がピース内にあり、開始はピース先頭以前
    TrailingEdge,
}

impl Overlap {
    fn classify(piece: Range<usize>, range: Range<usize>) -> Self {
        if range.end <= piece.start || range.start >= piece.end {
            Overlap::Disjoint
        } else if range.start <= piece.start && range.end >= piece.end {
            Overlap::Covered
        } else if range.start >= piece.start && range.end <= piece.end {
            Overlap::Spans
        } else if range.start > piece.start {
            Overlap::LeadingEdge
        } else {
            Overlap::TrailingEdge
        }
    }
}

/// ピーステーブル
///
/// 文書1つにつき1つ存在し、編集セッションが排他的に所有する
#[derive(Debug, Clone)]
pub struct PieceTable {
    /// 作成時の内容（以後変更しない）
    original: Box<str>,
    /// 挿入テキストの追記先
    additions: AddBuffer,
    /// 文書順のピース列
    pieces: Vec<Piece>,
}

impl PieceTable {
    /// 初期テキストからピーステーブルを作成
    pub fn create(initial_text: &str) -> Self {
        Self::with_config(initial_text, &PieceTableConfig::default())
    }

    /// 確保サイズを指定して作成
    pub fn with_config(initial_text: &str, config: &PieceTableConfig) -> Self {
        let mut pieces = Vec::with_capacity(config.initial_piece_capacity);
        if !initial_text.is_empty() {
            pieces.push(Piece::new(Source::Original, 0, initial_text.len()));
        }

        log::debug!(
            "piece table created: {} bytes, add capacity {}",
            initial_text.len(),
            config.initial_add_capacity
        );

        Self {
            original: initial_text.into(),
            additions: AddBuffer::with_capacity(config.initial_add_capacity),
            pieces,
        }
    }

    /// 文書長（バイト）。ピース長の合計を毎回計算する
    pub fn len(&self) -> usize {
        self.pieces.iter().map(|piece| piece.length).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// 文字数
    pub fn len_chars(&self) -> usize {
        self.segments().map(|segment| segment.chars().count()).sum()
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// 文書順のピース列
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// 元バッファの内容
    pub fn original(&self) -> &str {
        &self.original
    }

    /// 追加バッファ
    pub fn additions(&self) -> &AddBuffer {
        &self.additions
    }

    /// ピースが参照するテキスト
    pub fn piece_text(&self, piece: &Piece) -> &str {
        &self.buffer(piece.source)[piece.range()]
    }

    fn buffer(&self, source: Source) -> &str {
        match source {
            Source::Original => &self.original,
            Source::Addition => self.additions.as_str(),
        }
    }

    /// `pos` を含むピースの添字とピース内オフセット
    ///
    /// 文書末尾（`pos == len()`）や範囲外は `None`
    fn locate(&self, pos: usize) -> Option<(usize, usize)> {
        let mut piece_start = 0;
        for (index, piece) in self.pieces.iter().enumerate() {
            let piece_end = piece_start + piece.length;
            if pos < piece_end {
                return Some((index, pos - piece_start));
            }
            piece_start = piece_end;
        }
        None
    }

    fn is_char_boundary(&self, pos: usize) -> bool {
        match self.locate(pos) {
            Some((index, offset)) => {
                let piece = &self.pieces[index];
                self.buffer(piece.source)
                    .is_char_boundary(piece.start + offset)
            }
            None => pos == self.len(),
        }
    }

    fn ensure_char_boundary(&self, pos: usize) -> Result<()> {
        if self.is_char_boundary(pos) {
            Ok(())
        } else {
            log::warn!("rejected edit: {} is not a character boundary", pos);
            Err(BufferError::NotCharBoundary { position: pos })
        }
    }

    fn reserve_pieces(pieces: &mut Vec<Piece>, additional: usize) -> Result<()> {
        pieces
            .try_reserve(additional)
            .map_err(|_| BufferError::AllocationFailure {
                requested: additional.saturating_mul(std::mem::size_of::<Piece>()),
            })
    }

    /// 指定位置の文字を取得
    pub fn char_at(&self, pos: usize) -> Result<char> {
        let (index, offset) = self.locate(pos).ok_or(BufferError::IndexOutOfBounds {
            position: pos,
            length: self.len(),
        })?;
        self.piece_text(&self.pieces[index])
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .ok_or(BufferError::NotCharBoundary { position: pos })
    }

    /// 指定位置にテキストを挿入
    ///
    /// 失敗時はピース列もバッファも変更しない
    pub fn insert(&mut self, pos: usize, text: &str) -> Result<()> {
        let length = self.len();
        if pos > length {
            log::warn!("rejected insert at {} (length {})", pos, length);
            return Err(BufferError::IndexOutOfBounds {
                position: pos,
                length,
            });
        }
        if text.is_empty() {
            return Ok(());
        }
        self.ensure_char_boundary(pos)?;

        // 分割時は最大2ピース増える。追記より先に確保しておく
        Self::reserve_pieces(&mut self.pieces, 2)?;
        let add_start = self.additions.append(text)?;
        let inserted = Piece::new(Source::Addition, add_start, text.len());

        match self.locate(pos) {
            None => self.pieces.push(inserted),
            Some((index, 0)) => self.pieces.insert(index, inserted),
            Some((index, offset)) => {
                let (left, right) = self.pieces[index].split_at(offset);
                let replacement = left.into_iter().chain(Some(inserted)).chain(right);
                self.pieces.splice(index..index + 1, replacement);
            }
        }

        log::trace!(
            "inserted {} bytes at {} ({} pieces)",
            text.len(),
            pos,
            self.pieces.len()
        );
        Ok(())
    }

    /// `pos` から `len` バイトを削除
    ///
    /// バッファの領域は回収せず、ピース列だけを組み直す
    pub fn delete(&mut self, pos: usize, len: usize) -> Result<()> {
        let length = self.len();
        let end = match pos.checked_add(len) {
            Some(end) if end <= length => end,
            _ => {
                log::warn!("rejected delete of {} bytes at {} (length {})", len, pos, length);
                return Err(BufferError::IndexOutOfBounds {
                    position: pos.saturating_add(len),
                    length,
                });
            }
        };
        if len == 0 {
            return Ok(());
        }
        self.ensure_char_boundary(pos)?;
        self.ensure_char_boundary(end)?;

        let mut rebuilt = Vec::new();
        Self::reserve_pieces(&mut rebuilt, self.pieces.len() + 1)?;

        let mut piece_start = 0;
        for piece in &self.pieces {
            let piece_end = piece_start + piece.length;
            match Overlap::classify(piece_start..piece_end, pos..end) {
                Overlap::Disjoint => rebuilt.push(*piece),
                Overlap::Covered => {}
                Overlap::Spans => {
                    rebuilt.extend(piece.truncate(pos - piece_start));
                    rebuilt.extend(piece.skip(end - piece_start));
                }
                Overlap::LeadingEdge => rebuilt.extend(piece.truncate(pos - piece_start)),
                Overlap::TrailingEdge => rebuilt.extend(piece.skip(end - piece_start)),
            }
            piece_start = piece_end;
        }

        self.pieces = rebuilt;
        log::trace!(
            "deleted {} bytes at {} ({} pieces)",
            len,
            pos,
            self.pieces.len()
        );
        Ok(())
    }

    /// 文書をピース順の断片列として返す
    ///
    /// 何度でも呼び出せ、返されたイテレータも `clone` で巻き戻せる
    pub fn segments(&self) -> Segments<'_> {
        Segments::new(self, self.pieces.iter())
    }

    /// 各ピースとその参照テキストを順に訪問する
    pub fn for_each_piece<F>(&self, mut visitor: F)
    where
        F: FnMut(&Piece, &str),
    {
        for piece in &self.pieces {
            visitor(piece, self.piece_text(piece));
        }
    }

    /// 中間文字列を作らずに出力先へ書き出す
    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        for segment in self.segments() {
            writer.write_all(segment.as_bytes())?;
        }
        Ok(())
    }

    /// 文書全体を文字列として取得
    pub fn serialize(&self) -> String {
        let mut result = String::with_capacity(self.len());
        result.extend(self.segments());
        result
    }

    /// 指定範囲のテキストを取得
    pub fn slice(&self, range: Range<usize>) -> Result<String> {
        let length = self.len();
        if range.start > range.end || range.end > length {
            return Err(BufferError::IndexOutOfBounds {
                position: range.end.max(range.start),
                length,
            });
        }
        self.ensure_char_boundary(range.start)?;
        self.ensure_char_boundary(range.end)?;

        let mut result = String::with_capacity(range.len());
        let mut piece_start = 0;
        for piece in &self.pieces {
            let piece_end = piece_start + piece.length;
            if piece_start >= range.end {
                break;
            }
            if piece_end > range.start {
                let text = self.piece_text(piece);
                let from = range.start.saturating_sub(piece_start);
                let to = range.end.min(piece_end) - piece_start;
                result.push_str(&text[from..to]);
            }
            piece_start = piece_end;
        }
        Ok(result)
    }

    /// テーブルを解放する
    ///
    /// 所有権ごと消費するため、解放後の利用はコンパイル時に拒否される
    pub fn release(self) {
        log::debug!(
            "piece table released: {} pieces, {} original bytes, {} added bytes",
            self.pieces.len(),
            self.original.len(),
            self.additions.len()
        );
    }

    /// 構造上の不変条件を検査する（テスト・診断用）
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        for (index, piece) in self.pieces.iter().enumerate() {
            if piece.is_empty() {
                return Err(format!("piece {} has zero length", index));
            }
            let buffer = self.buffer(piece.source);
            if piece.end() > buffer.len() {
                return Err(format!(
                    "piece {} ends at {} past {} buffer length {}",
                    index,
                    piece.end(),
                    piece.source,
                    buffer.len()
                ));
            }
            if !buffer.is_char_boundary(piece.start) || !buffer.is_char_boundary(piece.end()) {
                return Err(format!("piece {} splits a character", index));
            }
        }
        Ok(())
    }
}

impl Default for PieceTable {
    fn default() -> Self {
        Self::create("")
    }
}

impl fmt::Display for PieceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.segments() {
            f.write_str(segment)?;
        }
        Ok(())
    }
}
