//! Excel出力（rust_xlsxwriter）

use super::ExportTable;
use crate::error::{AlchemistError, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// シート名に使えない文字
const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

pub fn write_excel(table: &ExportTable, output_path: &Path, sheet_name: &str) -> Result<()> {
    let buffer = generate_excel_buffer(table, sheet_name)?;
    std::fs::write(output_path, buffer)
        .map_err(|e| AlchemistError::Export(format!("{}: {}", output_path.display(), e)))?;
    Ok(())
}

/// 1シートのExcelをバッファに生成（1行目ヘッダー）
pub fn generate_excel_buffer(table: &ExportTable, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sanitize_sheet_name(sheet_name))
        .map_err(|e| AlchemistError::Export(format!("シート名設定エラー: {}", e)))?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| AlchemistError::Export(format!("ヘッダー書き込みエラー: {}", e)))?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32 + 1, col as u16, cell)
                .map_err(|e| AlchemistError::Export(format!("セル書き込みエラー: {}", e)))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| AlchemistError::Export(format!("Excel保存エラー: {}", e)))
}

fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !INVALID_SHEET_CHARS.contains(c))
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}
