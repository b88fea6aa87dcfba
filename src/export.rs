use crate::errors::ExportError;
use crate::results::FoaRecord;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const JSON_FILE: &str = "foa.json";
pub const CSV_FILE: &str = "foa.csv";

/// Column order of the CSV export
pub const CSV_COLUMNS: &[&str] = &[
    "foa_id",
    "title",
    "agency",
    "open_date",
    "close_date",
    "description",
    "source_url",
    "tags",
    "award_ceiling",
    "award_floor",
];

/// Separator between tags in the single CSV tags cell
const TAG_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Json, ExportFormat::Csv];

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => JSON_FILE,
            ExportFormat::Csv => CSV_FILE,
        }
    }
}

/// Writes `dir/foa.json`: the record as indented JSON with a trailing newline
pub fn export_json(record: &FoaRecord, dir: &Path) -> Result<PathBuf, ExportError> {
    let mut body = serde_json::to_string_pretty(record)?;
    body.push('\n');
    let path = write_atomic(dir, JSON_FILE, body.as_bytes())?;
    ::log::info!("JSON exported to {}", path.display());
    Ok(path)
}

/// Writes `dir/foa.csv`: a header line followed by one row for the record
pub fn export_csv(record: &FoaRecord, dir: &Path) -> Result<PathBuf, ExportError> {
    let header: Vec<String> = CSV_COLUMNS.iter().map(|c| c.to_string()).collect();
    let mut buf: Vec<u8> = Vec::new();
    write_row(&mut buf, &header, ',')?;
    write_row(&mut buf, &csv_row(record), ',')?;

    let path = write_atomic(dir, CSV_FILE, &buf)?;
    ::log::info!("CSV exported to {}", path.display());
    Ok(path)
}

/// Writes every requested format and returns the paths written, in request order
pub fn export_all(
    record: &FoaRecord,
    dir: &Path,
    formats: &[ExportFormat],
) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let path = match format {
            ExportFormat::Json => export_json(record, dir)?,
            ExportFormat::Csv => export_csv(record, dir)?,
        };
        if !written.contains(&path) {
            written.push(path);
        }
    }
    Ok(written)
}

fn csv_row(record: &FoaRecord) -> Vec<String> {
    let date = |d: &Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
    let amount = |a: &Option<f64>| a.map(|a| a.to_string()).unwrap_or_default();

    vec![
        record.foa_id.clone(),
        record.title.clone(),
        record.agency.clone(),
        date(&record.open_date),
        date(&record.close_date),
        record.description.clone(),
        record.source_url.clone(),
        record.tags.join(TAG_SEPARATOR),
        amount(&record.award_ceiling),
        amount(&record.award_floor),
    ]
}

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer
fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, "{}", sep)?;
        } else {
            first = false;
        }
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Creates `dir` if needed, writes to a temporary sibling and renames it into place
fn write_atomic(dir: &Path, file_name: &str, contents: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let target = dir.join(file_name);
    let tmp = dir.join(format!(".{}.tmp", file_name));

    let result = fs::write(&tmp, contents).and_then(|_| fs::rename(&tmp, &target));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result.map(|_| target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> FoaRecord {
        FoaRecord {
            foa_id: "GRANTS-353584".to_string(),
            title: "AI in Health Research".to_string(),
            agency: "National Institutes of Health".to_string(),
            open_date: NaiveDate::from_ymd_opt(2025, 1, 15),
            close_date: None,
            description: "Supports \"trustworthy\" models, tools, and data.".to_string(),
            tags: vec!["Artificial Intelligence".to_string(), "Health".to_string()],
            source_url: "https://www.grants.gov/search-results-detail/353584".to_string(),
            award_ceiling: None,
            award_floor: Some(100000.0),
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("foa-export-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_write_row_quotes_only_when_needed() {
        let mut buf = Vec::new();
        let row = vec!["plain".to_string(), "a, b".to_string(), "say \"hi\"".to_string()];
        write_row(&mut buf, &row, ',').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "plain,\"a, b\",\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn test_csv_row_layout() {
        let row = csv_row(&record());
        assert_eq!(row.len(), CSV_COLUMNS.len());
        assert_eq!(row[3], "2025-01-15");
        assert_eq!(row[4], "");
        assert_eq!(row[7], "Artificial Intelligence; Health");
        assert_eq!(row[8], "");
        assert_eq!(row[9], "100000");
    }

    #[test]
    fn test_export_json_creates_directory() {
        let dir = scratch_dir("json").join("nested");
        let path = export_json(&record(), &dir).unwrap();
        assert_eq!(path, dir.join("foa.json"));

        let body = fs::read_to_string(&path).unwrap();
        assert!(body.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["foa_id"], "GRANTS-353584");
        assert!(value["award_ceiling"].is_null());
        assert_eq!(value["open_date"], "2025-01-15");
        assert!(!dir.join(".foa.json.tmp").exists());
    }

    #[test]
    fn test_export_all_writes_both() {
        let dir = scratch_dir("all");
        let paths = export_all(&record(), &dir, &ExportFormat::ALL).unwrap();
        assert_eq!(paths, vec![dir.join("foa.json"), dir.join("foa.csv")]);

        let csv = fs::read_to_string(dir.join("foa.csv")).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_COLUMNS.join(",").as_str()));
        let row = lines.next().unwrap();
        assert!(row.starts_with("GRANTS-353584,AI in Health Research,"));
        assert!(row.contains("\"Supports \"\"trustworthy\"\" models, tools, and data.\""));
        assert_eq!(lines.next(), None);

        let _ = fs::remove_dir_all(&dir);
    }
}
