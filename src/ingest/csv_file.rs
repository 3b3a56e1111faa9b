//! CSV読み込み

use crate::error::{AlchemistError, Result};
use csv::ReaderBuilder;
use data_alchemist_common::RawRow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn parse_csv_file(path: &Path) -> Result<Vec<RawRow>> {
    let file = File::open(path)
        .map_err(|_| AlchemistError::FileNotFound(path.display().to_string()))?;
    parse_csv_reader(file)
}

/// ヘッダー行をキーにして各行を読み込む
///
/// - 列数が足りない行は存在する列だけを持つ
/// - ヘッダーより多い列は無視
/// - 全セルが空の行はスキップ
pub fn parse_csv_reader<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_keyed_rows() {
        let data = "ClientID,ClientName,PriorityLevel\nC1,Acme,3\nC2,Beta,5\n";
        let rows = parse_csv_reader(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["ClientID"], "C1");
        assert_eq!(rows[1]["PriorityLevel"], "5");
        assert_eq!(
            rows[0].keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["ClientID", "ClientName", "PriorityLevel"]
        );
    }

    #[test]
    fn test_quoted_commas_preserved() {
        let data = "WorkerID,Skills\nW1,\"Plumbing,Painting\"\n";
        let rows = parse_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(rows[0]["Skills"], "Plumbing,Painting");
    }

    #[test]
    fn test_blank_rows_skipped() {
        let data = "TaskID,TaskName\nT1,Paint\n\n,\nT2,Weld\n";
        let rows = parse_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["TaskID"], "T2");
    }

    #[test]
    fn test_short_rows_tolerated() {
        let data = "ClientID,ClientName,PriorityLevel\nC1,Acme\n";
        let rows = parse_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(rows[0].len(), 2);
        assert!(rows[0].get("PriorityLevel").is_none());
    }

    #[test]
    fn test_headers_trimmed() {
        let data = " ClientID , ClientName\nC1,Acme\n";
        let rows = parse_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(rows[0]["ClientID"], "C1");
        assert_eq!(rows[0]["ClientName"], "Acme");
    }

    #[test]
    fn test_header_only() {
        let rows = parse_csv_reader("WorkerID,WorkerName\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }
}
