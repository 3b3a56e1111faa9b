//! スプレッドシート読み込み（calamine）
//!
//! 先頭シートの1行目をヘッダーとして扱う。

use crate::error::{AlchemistError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use data_alchemist_common::RawRow;
use std::path::Path;

pub fn parse_spreadsheet_file(path: &Path) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| AlchemistError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AlchemistError::Spreadsheet(format!("シートがありません: {}", path.display())))?
        .map_err(|e| AlchemistError::Spreadsheet(e.to_string()))?;

    Ok(rows_from_range(&range))
}

/// セル範囲を行データへ変換（全セルが空の行はスキップ）
pub fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_to_string(cell).trim().to_string())
            .collect(),
        None => return Vec::new(),
    };

    rows.filter(|cells| cells.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|cells| -> RawRow {
            headers
                .iter()
                .zip(cells.iter())
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, cell)| (header.clone(), cell_to_string(cell)))
                .collect()
        })
        .collect()
}

/// セル値を文字列化（整数値の浮動小数点は小数部なしで表記）
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}
