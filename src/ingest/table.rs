/// Raw tabular input as handed over by the loader.
///
/// The analysis never reads files itself. A loader produces a `RawTable`
/// of trimmed text cells plus the header row, and the normalizer takes it
/// from there. CSV exports of the movement report are loaded here with the
/// `csv` crate; other formats only need to produce the same shape.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::logging::{self, Component};
use crate::model::AnalysisError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Reads a CSV document. Rows may be shorter or longer than the header;
    /// missing cells read as empty.
    pub fn from_csv_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, AnalysisError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| AnalysisError::Parse(format!("CSV header: {}", e)))?
            .iter()
            .map(String::from)
            .collect();

        let mut rows = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record =
                result.map_err(|e| AnalysisError::Parse(format!("CSV row {}: {}", i + 1, e)))?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn from_csv_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| AnalysisError::Io(format!("{}: {}", path.display(), e)))?;
        let table = Self::from_csv_reader(file, delimiter)?;
        logging::info(
            Component::Ingest,
            Some(&path.display().to_string()),
            &format!("loaded {} rows, {} columns", table.len(), table.headers.len()),
        );
        Ok(table)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a header, compared after trimming and ignoring case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_headers_and_rows() {
        let csv = "A,B,C\n1, 2 ,3\n4,5,6\n";
        let table = RawTable::from_csv_reader(csv.as_bytes(), b',').expect("valid csv");
        assert_eq!(table.headers(), &["A", "B", "C"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_semicolon_delimiter_and_short_rows() {
        let csv = "A;B;C\n1;2\n";
        let table = RawTable::from_csv_reader(csv.as_bytes(), b';').expect("valid csv");
        assert_eq!(table.rows()[0], vec!["1", "2"]);
    }

    #[test]
    fn test_column_lookup_ignores_case_and_padding() {
        let table = RawTable::new(vec![" Calco_Data ".to_string(), "BOX".to_string()], vec![]);
        assert_eq!(table.column_index("CALCO_DATA"), Some(0));
        assert_eq!(table.column_index("box"), Some(1));
        assert_eq!(table.column_index("PAX_LOCAL"), None);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = RawTable::from_csv_path("./no/such/file.csv", b',');
        assert!(matches!(result, Err(AnalysisError::Io(_))));
    }
}
