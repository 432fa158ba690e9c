//! ファイルI/O操作
//!
//! UTF-8テキストファイルからピーステーブルを作成し、内容を書き戻す

use crate::buffer::PieceTable;
use crate::config::PieceTableConfig;
use crate::error::{file, ErrorContext, FileError, PtableError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// `~` や環境変数を含むパスを展開
///
/// 未定義の環境変数を参照している場合は `InvalidPath`
pub fn expand_path<P: AsRef<Path>>(path: P) -> file::Result<PathBuf> {
    let path = path.as_ref();
    let Some(raw) = path.to_str() else {
        return Ok(path.to_path_buf());
    };
    shellexpand::full(raw)
        .map(|expanded| PathBuf::from(expanded.into_owned()))
        .map_err(|e| FileError::InvalidPath {
            path: format!("{} ({})", raw, e),
        })
}

fn classify_io_error(error: std::io::Error, path: &Path) -> FileError {
    let path = path.display().to_string();
    match error.kind() {
        ErrorKind::NotFound => FileError::NotFound { path },
        ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
        _ => FileError::from(error),
    }
}

/// ファイルを読み込んでピーステーブルを作成
pub fn load<P: AsRef<Path>>(path: P) -> Result<PieceTable> {
    load_with_config(path, &PieceTableConfig::default())
}

/// 設定付きでファイルを読み込む
pub fn load_with_config<P: AsRef<Path>>(path: P, config: &PieceTableConfig) -> Result<PieceTable> {
    let path = expand_path(path).with_context_info("load")?;

    // ディレクトリではないことを確認
    if path.is_dir() {
        return Err(PtableError::File(FileError::InvalidPath {
            path: path.display().to_string(),
        }));
    }

    let bytes = fs::read(&path)
        .map_err(|e| classify_io_error(e, &path))
        .with_context_info("load")?;
    let content = std::str::from_utf8(&bytes).with_context_info("load")?;

    log::info!("loaded {} ({} bytes)", path.display(), content.len());
    Ok(PieceTable::with_config(content, config))
}

/// ピーステーブルの内容をファイルへ保存
///
/// 一時ファイルに書き込んでからアトミックに置き換える。失敗時は一時ファイルを残さない
pub fn save<P: AsRef<Path>>(path: P, table: &PieceTable) -> Result<()> {
    let path = expand_path(path).with_context_info("save")?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .map_err(|e| classify_io_error(e, parent))
                .with_context_info("save")?;
        }
    }

    let temp_path = path.with_extension("tmp");
    let written = write_segments(&temp_path, table).and_then(|()| fs::rename(&temp_path, &path));
    if let Err(error) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(classify_io_error(error, &path)).with_context_info("save");
    }

    log::info!("saved {} ({} bytes)", path.display(), table.len());
    Ok(())
}

fn write_segments(path: &Path, table: &PieceTable) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    table.write_to(&mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.txt");

        match load(&path) {
            Err(PtableError::File(FileError::NotFound { path: reported })) => {
                assert!(reported.ends_with("missing.txt"));
            }
            other => panic!("Expected NotFound, got {:?}", other.map(|t| t.serialize())),
        }
    }

    #[test]
    fn test_load_directory_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            load(temp_dir.path()),
            Err(PtableError::File(FileError::InvalidPath { .. }))
        ));
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("binary.bin");
        fs::write(&path, [0x66, 0x6f, 0xff]).unwrap();

        assert!(matches!(
            load(&path),
            Err(PtableError::File(FileError::Encoding { .. }))
        ));
    }

    #[test]
    fn test_save_creates_parent_dirs_and_removes_temp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("out.txt");
        let mut table = PieceTable::create("abc");
        table.insert(3, "def").unwrap();

        save(&path, &table).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "abcdef");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_save_failure_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        // 保存先が空でないディレクトリなので rename が失敗する
        let path = temp_dir.path().join("out");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), "x").unwrap();

        let result = save(&path, &PieceTable::create("abc"));

        assert!(matches!(result, Err(PtableError::File(_))));
        assert!(!path.with_extension("tmp").exists());
        assert!(path.join("keep.txt").exists());
    }

    #[test]
    fn test_expand_path_keeps_plain_paths() {
        assert_eq!(
            expand_path("notes/a.txt").unwrap(),
            PathBuf::from("notes/a.txt")
        );
    }

    #[test]
    fn test_expand_path_expands_environment_variables() {
        std::env::set_var("PTABLE_IO_TEST_DIR", "/srv/docs");
        assert_eq!(
            expand_path("$PTABLE_IO_TEST_DIR/a.txt").unwrap(),
            PathBuf::from("/srv/docs/a.txt")
        );
    }

    #[test]
    fn test_expand_path_rejects_undefined_variable() {
        assert!(matches!(
            expand_path("$PTABLE_IO_TEST_UNDEFINED/a.txt"),
            Err(FileError::InvalidPath { .. })
        ));
    }
}
