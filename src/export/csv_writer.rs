//! CSV出力

use super::ExportTable;
use crate::error::{AlchemistError, Result};
use std::io::Write;
use std::path::Path;

pub fn write_csv(table: &ExportTable, output_path: &Path) -> Result<()> {
    let file = std::fs::File::create(output_path)
        .map_err(|e| AlchemistError::Export(format!("{}: {}", output_path.display(), e)))?;
    write_csv_to(table, file)
}

pub fn write_csv_to<W: Write>(table: &ExportTable, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv_quotes_commas() {
        let table = ExportTable {
            headers: vec!["WorkerID".into(), "Skills".into()],
            rows: vec![vec!["W1".into(), "Plumbing,Painting".into()]],
        };

        let mut buffer = Vec::new();
        write_csv_to(&table, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "WorkerID,Skills\nW1,\"Plumbing,Painting\"\n");
    }

    #[test]
    fn test_write_csv_escapes_quotes() {
        let table = ExportTable {
            headers: vec!["AttributesJSON".into()],
            rows: vec![vec![r#"{"region":"north"}"#.into()]],
        };

        let mut buffer = Vec::new();
        write_csv_to(&table, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "AttributesJSON\n\"{\"\"region\"\":\"\"north\"\"}\"\n");
    }
}
