use crate::error::{ChurnError, Result};
use polars::prelude::*;
use std::path::PathBuf;

/// Where a dataset snapshot came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOrigin {
    Default(PathBuf),
    Upload(PathBuf),
    InMemory,
}

/// The customer table for one session.
///
/// Loaded once, classified once, then only read. Every capability check
/// ("does this dataset expose column C") goes through [`Dataset::has_column`].
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    origin: DataOrigin,
}

impl Dataset {
    pub fn new(frame: DataFrame) -> Self {
        Self {
            frame,
            origin: DataOrigin::InMemory,
        }
    }

    pub fn with_origin(frame: DataFrame, origin: DataOrigin) -> Self {
        Self { frame, origin }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub(crate) fn frame_mut(&mut self) -> &mut DataFrame {
        &mut self.frame
    }

    pub fn origin(&self) -> &DataOrigin {
        &self.origin
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_names().iter().any(|c| *c == name)
    }

    /// Look up a column, failing with [`ChurnError::MissingColumn`] when absent.
    pub fn require_column(&self, name: &str) -> Result<&Series> {
        self.frame
            .column(name)
            .map_err(|_| ChurnError::MissingColumn(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_checks() {
        let frame = df![
            "Predicted Churn Risk" => [0.1, 0.9],
            "gender" => ["Female", "Male"]
        ]
        .unwrap();
        let dataset = Dataset::new(frame);

        assert!(dataset.has_column("gender"));
        assert!(!dataset.has_column("Gender"));
        assert!(!dataset.has_column("SeniorCitizen"));
        assert_eq!(dataset.height(), 2);
        assert_eq!(dataset.origin(), &DataOrigin::InMemory);

        match dataset.require_column("tenure") {
            Err(ChurnError::MissingColumn(name)) => assert_eq!(name, "tenure"),
            other => panic!("expected missing column, got {:?}", other.map(|s| s.name().to_string())),
        }
    }
}
