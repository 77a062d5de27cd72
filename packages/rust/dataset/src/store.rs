//! Master dataset loading and record lookup.

use std::path::Path;

use tracing::{debug, info, instrument};

use landeval_shared::{LandEvalError, MasterRecord, Result};

/// In-memory view of the master dataset, keyed by the identifier column.
#[derive(Debug)]
pub struct RecordStore {
    records: Vec<MasterRecord>,
    columns: Vec<String>,
    identifier_field: String,
}

impl RecordStore {
    /// Load the master dataset from a CSV file.
    ///
    /// Fails with [`LandEvalError::DatasetNotFound`] when the path is
    /// absent and [`LandEvalError::Schema`] when the identifier column
    /// is missing — both before any staging I/O happens, so a broken
    /// dataset never produces partial extracts.
    #[instrument(skip_all, fields(path = %path.display(), identifier_field = identifier_field))]
    pub fn load(path: &Path, identifier_field: &str) -> Result<Self> {
        if !path.exists() {
            return Err(LandEvalError::DatasetNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut reader = csv::Reader::from_path(path)?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let id_index = headers
            .iter()
            .position(|h| h == identifier_field)
            .ok_or_else(|| {
                LandEvalError::schema(format!(
                    "{identifier_field} column not found in {}",
                    path.display()
                ))
            })?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let fields: Vec<(String, String)> = headers
                .iter()
                .cloned()
                .zip(row.iter().map(|v| v.to_string()))
                .collect();

            let identifier = row
                .get(id_index)
                .map(|v| v.trim().to_string())
                .unwrap_or_default();

            records.push(MasterRecord::new(identifier, fields));
        }

        info!(
            records = records.len(),
            columns = headers.len(),
            "master dataset loaded"
        );

        Ok(Self {
            records,
            columns: headers,
            identifier_field: identifier_field.to_string(),
        })
    }

    /// Find the record for the given identifier. At most one record
    /// matches; on duplicate identifiers the first row wins.
    pub fn find_by_identifier(&self, id: &str) -> Option<&MasterRecord> {
        let found = self.records.iter().find(|r| r.identifier() == id);
        if found.is_none() {
            debug!(id, "identifier not present in dataset");
        }
        found
    }

    /// All identifiers in dataset order, for interactive selection.
    pub fn list_identifiers(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.identifier().to_string())
            .collect()
    }

    /// Dataset column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The identifier column this store was loaded with.
    pub fn identifier_field(&self) -> &str {
        &self.identifier_field
    }

    /// Number of records in the dataset.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("le-store-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_master(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("master.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_and_find_record() {
        let tmp = temp_dir();
        let path = write_master(
            &tmp,
            "StockNumber,City,State\nA1,Springfield,IL\nB2,Shelbyville,IL\n",
        );

        let store = RecordStore::load(&path, "StockNumber").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.list_identifiers(), vec!["A1", "B2"]);

        let record = store.find_by_identifier("A1").unwrap();
        assert_eq!(record.get("City"), Some("Springfield"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn unknown_identifier_returns_none() {
        let tmp = temp_dir();
        let path = write_master(&tmp, "StockNumber,City\nA1,Springfield\n");

        let store = RecordStore::load(&path, "StockNumber").unwrap();
        assert!(store.find_by_identifier("ZZ").is_none());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_dataset_is_fatal() {
        let tmp = temp_dir();
        let err = RecordStore::load(&tmp.join("nope.csv"), "StockNumber").unwrap_err();
        assert!(matches!(err, LandEvalError::DatasetNotFound { .. }));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_identifier_column_is_schema_error() {
        let tmp = temp_dir();
        let path = write_master(&tmp, "City,State\nSpringfield,IL\n");

        let err = RecordStore::load(&path, "StockNumber").unwrap_err();
        assert!(matches!(err, LandEvalError::Schema { .. }));
        assert!(err.to_string().contains("StockNumber"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn duplicate_identifiers_first_row_wins() {
        let tmp = temp_dir();
        let path = write_master(&tmp, "StockNumber,City\nA1,First\nA1,Second\n");

        let store = RecordStore::load(&path, "StockNumber").unwrap();
        let record = store.find_by_identifier("A1").unwrap();
        assert_eq!(record.get("City"), Some("First"));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
