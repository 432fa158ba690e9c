//! ピーステーブル設定
//!
//! 既定値 → 設定ファイル（JSON）→ 環境変数 の順で上書きする

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 追加バッファの初期容量（バイト）
pub const DEFAULT_ADD_CAPACITY: usize = 1024;
/// ピース列の初期容量
pub const DEFAULT_PIECE_CAPACITY: usize = 128;

pub const ADD_CAPACITY_ENV: &str = "PTABLE_ADD_CAPACITY";
pub const PIECE_CAPACITY_ENV: &str = "PTABLE_PIECE_CAPACITY";

/// ピーステーブルの確保サイズ設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PieceTableConfig {
    /// 追加バッファの初期容量
    pub initial_add_capacity: usize,
    /// ピース列の初期容量
    pub initial_piece_capacity: usize,
}

impl Default for PieceTableConfig {
    fn default() -> Self {
        Self {
            initial_add_capacity: DEFAULT_ADD_CAPACITY,
            initial_piece_capacity: DEFAULT_PIECE_CAPACITY,
        }
    }
}

impl PieceTableConfig {
    /// 既定の設定ファイルパス（`<config_dir>/ptable/config.json`）
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ptable").join("config.json"))
    }

    /// 既定パスの設定ファイルと環境変数を反映した設定を読み込む
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// JSON 設定ファイルを読み込む（省略されたキーは既定値）
    pub fn from_file(path: &Path) -> Result<Self> {
        let invalid = || ConfigError::InvalidFile {
            path: path.display().to_string(),
        };
        let content = std::fs::read_to_string(path).map_err(|_| invalid())?;
        let config: Self = serde_json::from_str(&content).map_err(|_| invalid())?;
        config.validate()?;
        Ok(config)
    }

    /// キー検索関数から上書き値を適用する
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ADD_CAPACITY_ENV) {
            self.initial_add_capacity = parse_capacity(ADD_CAPACITY_ENV, &value)?;
        }
        if let Some(value) = lookup(PIECE_CAPACITY_ENV) {
            self.initial_piece_capacity = parse_capacity(PIECE_CAPACITY_ENV, &value)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.initial_add_capacity == 0 {
            return Err(invalid_value("initial_add_capacity", "0").into());
        }
        if self.initial_piece_capacity == 0 {
            return Err(invalid_value("initial_piece_capacity", "0").into());
        }
        Ok(())
    }
}

fn parse_capacity(key: &str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(invalid_value(key, value).into()),
    }
}

fn invalid_value(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
