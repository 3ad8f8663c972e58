use crate::StrError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds reference results for comparisons and tests
///
/// Row `k` holds the (time, value) pair of the k-th committed state; row 0 is the initial state.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ReferenceTable {
    pub rows: Vec<(f64, f64)>,
}

impl ReferenceTable {
    /// Allocates a new instance
    pub fn new(rows: Vec<(f64, f64)>) -> Self {
        ReferenceTable { rows }
    }

    /// Allocates a new instance from times and values
    pub fn from_columns(times: &[f64], values: &[f64]) -> Result<Self, StrError> {
        if times.len() != values.len() {
            return Err("times and values must have the same length");
        }
        Ok(ReferenceTable {
            rows: times.iter().copied().zip(values.iter().copied()).collect(),
        })
    }

    /// Reads a JSON file containing the results
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(&path).map_err(|_| "file not found")?;
        let reader = BufReader::new(file);
        let data = serde_json::from_reader(reader).map_err(|_| "deserialize failed")?;
        Ok(data)
    }

    /// Writes a JSON file with the results
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer_pretty(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ReferenceTable;
    use crate::base::DEFAULT_TEST_DIR;

    #[test]
    fn from_columns_works() {
        let table = ReferenceTable::from_columns(&[0.0, 1.0], &[10.0, 20.0]).unwrap();
        assert_eq!(table.rows, &[(0.0, 10.0), (1.0, 20.0)]);
        assert_eq!(
            ReferenceTable::from_columns(&[0.0], &[]).err(),
            Some("times and values must have the same length")
        );
    }

    #[test]
    fn read_and_write_work() {
        let table = ReferenceTable::new(vec![(0.0, 0.0), (0.5, 1000.0), (1.0, 2000.0)]);
        let path = format!("{}/reference_table.json", DEFAULT_TEST_DIR);
        table.write_json(&path).unwrap();
        let read = ReferenceTable::read_json(&path).unwrap();
        assert_eq!(read, table);
        assert_eq!(
            ReferenceTable::read_json("/tmp/pmtest/__not_found__.json").err(),
            Some("file not found")
        );
    }
}
