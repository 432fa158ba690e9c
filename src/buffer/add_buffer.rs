//! 追加バッファ
//!
//! 挿入されたテキストをすべて末尾に追記する。既存の内容は書き換えも解放もしない

use crate::error::{buffer::Result, BufferError};

const GROWTH_FACTOR: usize = 2;

/// 追記専用のテキストバッファ
#[derive(Debug, Clone)]
pub struct AddBuffer {
    text: String,
    /// 論理容量（倍々で増やす）
    capacity: usize,
}

impl AddBuffer {
    /// 指定容量で確保する
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            capacity,
        }
    }

    /// 使用済みバイト数
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// テキストを末尾に追記し、追記開始オフセットを返す
    ///
    /// 確保に失敗した場合は内容も容量も変更しない
    pub fn append(&mut self, text: &str) -> Result<usize> {
        self.reserve(text.len())?;
        let start = self.text.len();
        self.text.push_str(text);
        Ok(start)
    }

    /// 追記に備えて容量を確保する
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let required = self
            .text
            .len()
            .checked_add(additional)
            .ok_or(BufferError::AllocationFailure {
                requested: usize::MAX,
            })?;
        if required <= self.capacity {
            return Ok(());
        }

        let new_capacity = self
            .capacity
            .saturating_mul(GROWTH_FACTOR)
            .max(required);
        self.text
            .try_reserve_exact(new_capacity - self.text.len())
            .map_err(|_| BufferError::AllocationFailure {
                requested: new_capacity,
            })?;
        log::trace!(
            "addition buffer grown {} -> {} bytes",
            self.capacity,
            new_capacity
        );
        self.capacity = new_capacity;
        Ok(())
    }
}

impl Default for AddBuffer {
    fn default() -> Self {
        Self::with_capacity(crate::config::DEFAULT_ADD_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_returns_start_offsets() {
        let mut buffer = AddBuffer::with_capacity(8);
        assert_eq!(buffer.append("abc").unwrap(), 0);
        assert_eq!(buffer.append("de").unwrap(), 3);
        assert_eq!(buffer.as_str(), "abcde");
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn test_capacity_at_least_doubles() {
        let mut buffer = AddBuffer::with_capacity(4);
        buffer.append("abcd").unwrap();
        assert_eq!(buffer.capacity(), 4);

        buffer.append("e").unwrap();
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    fn test_large_append_grows_past_double() {
        let mut buffer = AddBuffer::with_capacity(4);
        buffer.append(&"x".repeat(20)).unwrap();
        assert_eq!(buffer.capacity(), 20);
        assert_eq!(buffer.len(), 20);
    }

    #[test]
    fn test_overflowing_request_fails_without_change() {
        let mut buffer = AddBuffer::with_capacity(4);
        buffer.append("ab").unwrap();

        let result = buffer.reserve(usize::MAX);
        assert!(matches!(result, Err(BufferError::AllocationFailure { .. })));
        assert_eq!(buffer.as_str(), "ab");
        assert_eq!(buffer.capacity(), 4);
    }
}
