//! ファイル読み込みモジュール
//!
//! 拡張子で形式を判定し、ヘッダー行をキーにした行データへ変換する。
//! - csv: ヘッダー付きCSV
//! - xlsx/xlsm/xls/ods: 先頭シート、1行目をヘッダーとして扱う

pub mod csv_file;
pub mod spreadsheet;

use crate::error::{AlchemistError, Result};
use data_alchemist_common::{RawRow, Records, TableKind};
use std::path::Path;

/// 対応ファイル形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Csv,
    Spreadsheet,
}

impl FileType {
    /// 拡張子から判定（大文字小文字は区別しない）
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(FileType::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(FileType::Spreadsheet),
            _ => Err(AlchemistError::UnsupportedFileType(
                path.display().to_string(),
            )),
        }
    }
}

/// ファイルを行データとして読み込む
pub fn parse_file(path: &Path) -> Result<Vec<RawRow>> {
    let file_type = FileType::from_path(path)?;

    if !path.exists() {
        return Err(AlchemistError::FileNotFound(path.display().to_string()));
    }

    let rows = match file_type {
        FileType::Csv => csv_file::parse_csv_file(path)?,
        FileType::Spreadsheet => spreadsheet::parse_spreadsheet_file(path)?,
    };

    tracing::info!(path = %path.display(), rows = rows.len(), "file parsed");
    Ok(rows)
}

/// ファイルを読み込んで型付きレコードに変換
pub fn load_records(path: &Path, kind: TableKind) -> Result<Records> {
    let rows = parse_file(path)?;
    Ok(Records::from_rows(kind, rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_from_extension() {
        assert_eq!(FileType::from_path(Path::new("a.csv")).unwrap(), FileType::Csv);
        assert_eq!(FileType::from_path(Path::new("a.CSV")).unwrap(), FileType::Csv);
        assert_eq!(
            FileType::from_path(Path::new("dir/b.xlsx")).unwrap(),
            FileType::Spreadsheet
        );
        assert_eq!(FileType::from_path(Path::new("b.ods")).unwrap(), FileType::Spreadsheet);
    }

    #[test]
    fn test_unsupported_extension() {
        for name in ["notes.txt", "data.json", "no_extension"] {
            let err = FileType::from_path(Path::new(name)).unwrap_err();
            assert!(matches!(err, AlchemistError::UnsupportedFileType(_)));
            assert!(err.to_string().contains("unsupported file type"));
        }
    }
}
