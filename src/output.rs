use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// One output record. Field renames double as the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Contact Number")]
    pub contact_number: String,
    #[serde(rename = "Date Created")]
    pub date_created: String,
    #[serde(rename = "Last Modified")]
    pub last_modified: String,
    #[serde(rename = "Notes")]
    pub notes: String,
}

/// Write all rows to `path` in one pass, header first.
/// An empty run still produces a file with the header row.
pub fn write_csv(path: &Path, rows: &[ExtractedRow]) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create: {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    if rows.is_empty() {
        // serialize() emits the header lazily, so write it ourselves here
        writer.write_record([
            "Name",
            "Contact Number",
            "Date Created",
            "Last Modified",
            "Notes",
        ])?;
    }
    for row in rows {
        writer.serialize(row).wrap_err("Failed to write CSV row")?;
    }
    writer.flush().wrap_err("Failed to flush CSV file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<ExtractedRow> {
        vec![
            ExtractedRow {
                name: "Asha".to_string(),
                contact_number: "919900112233".to_string(),
                date_created: "May 02, 2025".to_string(),
                last_modified: "May 04, 2025".to_string(),
                notes: "first call\n\nsecond call".to_string(),
            },
            ExtractedRow {
                name: "Ravi, Jr.".to_string(),
                contact_number: "917700445566".to_string(),
                date_created: "May 01, 2025".to_string(),
                last_modified: String::new(),
                notes: String::new(),
            },
        ]
    }

    #[test]
    fn round_trips_rows_including_embedded_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = sample_rows();
        write_csv(&path, &rows).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let read_back: Vec<ExtractedRow> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(read_back, rows);
    }

    #[test]
    fn header_matches_the_expected_column_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &sample_rows()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers,
            csv::StringRecord::from(vec![
                "Name",
                "Contact Number",
                "Date Created",
                "Last Modified",
                "Notes"
            ])
        );
    }

    #[test]
    fn empty_run_still_writes_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Name,Contact Number,Date Created,Last Modified,Notes\n");
    }
}
