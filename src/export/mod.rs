//! エクスポートモジュール
//!
//! レコード集合を表形式（ヘッダー＋文字列セル）に変換し、CSV/Excelへ書き出す。
//! 空の集合は何も書き出さない。

pub mod csv_writer;
pub mod excel;

use crate::cli::ExportFormat;
use crate::error::Result;
use data_alchemist_common::{Scored, TableRecord};
use std::path::{Path, PathBuf};

pub const SCORE_COLUMN: &str = "_score";

/// 書き出し用の表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    /// スキーマ順の列で表を作る（未設定の値は空文字）
    pub fn from_records<'a, R, I>(records: I) -> Self
    where
        R: TableRecord,
        I: IntoIterator<Item = &'a R>,
    {
        let fields = R::fields();
        let rows = records
            .into_iter()
            .map(|record| {
                fields
                    .iter()
                    .map(|field| record.field(field).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();

        Self {
            headers: fields.iter().map(|f| f.to_string()).collect(),
            rows,
        }
    }

    /// スコア列を末尾に付けた表
    pub fn from_scored<R: TableRecord>(scored: &[Scored<R>]) -> Self {
        let mut table = Self::from_records(scored.iter().map(|s| &s.record));
        table.headers.push(SCORE_COLUMN.to_string());
        for (row, s) in table.rows.iter_mut().zip(scored) {
            row.push(s.score.to_string());
        }
        table
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 端末表示用のテキスト表
    pub fn render_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let format_line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&format_line(&self.headers));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format_line(row));
            out.push('\n');
        }
        out
    }
}

/// 出力パスの拡張子から形式を決定（不明なら既定値）
pub fn format_for_path(output: &Path, default: ExportFormat) -> ExportFormat {
    output
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse().ok())
        .unwrap_or(default)
}

/// 出力先のファイルパスを決める
///
/// - 既存ディレクトリ: `<dir>/<stem>.<ext>`
/// - 拡張子なし: ファイル名として扱い拡張子を付ける
pub fn output_path_for_format(output: &Path, stem: &str, format: ExportFormat) -> PathBuf {
    if output.is_dir() {
        output.join(format!("{}.{}", stem, format.extension()))
    } else if output.extension().is_none() {
        output.with_extension(format.extension())
    } else {
        output.to_path_buf()
    }
}

/// 表を書き出す。空の場合は何もせず None
pub fn export_table(
    table: &ExportTable,
    format: ExportFormat,
    output_path: &Path,
    sheet_name: &str,
) -> Result<Option<PathBuf>> {
    if table.is_empty() {
        tracing::info!(path = %output_path.display(), "nothing to export");
        return Ok(None);
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        ExportFormat::Csv => csv_writer::write_csv(table, output_path)?,
        ExportFormat::Excel => excel::write_excel(table, output_path, sheet_name)?,
    }

    tracing::info!(
        path = %output_path.display(),
        rows = table.rows.len(),
        format = format.extension(),
        "exported"
    );
    Ok(Some(output_path.to_path_buf()))
}
