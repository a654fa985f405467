//! Data loading: the bundled default file or a user upload.
//!
//! Status lines (success, info, warning) go to the presenter as they happen.
//! Halting conditions come back as errors and are the caller's to render.

use crate::config::UploadValidation;
use crate::dataset::{DataOrigin, Dataset};
use crate::error::{ChurnError, Result};
use crate::presenter::Presenter;
use crate::schema::{REQUIRED_COLUMNS, RISK_LEVEL};
use crate::view::Notice;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Rows scanned to infer column types.
const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// The bundled dataset.
    Default(PathBuf),
    /// A user-supplied file; `None` until one is provided.
    Upload(Option<PathBuf>),
}

pub struct DataLoader {
    validation: UploadValidation,
}

impl DataLoader {
    pub fn new(validation: UploadValidation) -> Self {
        Self { validation }
    }

    pub fn load(&self, source: &DataSource, presenter: &mut dyn Presenter) -> Result<Dataset> {
        match source {
            DataSource::Default(path) => self.load_default(path, presenter),
            DataSource::Upload(path) => self.load_upload(path.as_deref(), presenter),
        }
    }

    fn load_default(&self, path: &Path, presenter: &mut dyn Presenter) -> Result<Dataset> {
        if !path.exists() {
            warn!("Default file not found: {}", path.display());
            return Err(ChurnError::DefaultFileNotFound(path.to_path_buf()));
        }

        let frame = read_csv(path)?;
        info!(
            "Loaded default file {} ({} rows, {} columns)",
            path.display(),
            frame.height(),
            frame.width()
        );
        presenter.render_notice(&Notice::success(format!(
            "Loaded default file: {}",
            file_label(path)
        )))?;

        Ok(Dataset::with_origin(frame, DataOrigin::Default(path.to_path_buf())))
    }

    fn load_upload(&self, path: Option<&Path>, presenter: &mut dyn Presenter) -> Result<Dataset> {
        presenter.render_notice(&Notice::info(format!(
            "Your file must contain the following columns exactly: {}",
            REQUIRED_COLUMNS.join(", ")
        )))?;

        let path = match path {
            Some(path) => path,
            None => return Err(ChurnError::AwaitingUpload),
        };

        if !path.exists() {
            return Err(ChurnError::Csv(format!(
                "Uploaded file {} does not exist",
                path.display()
            )));
        }

        let frame = read_csv(path)?;
        info!(
            "Read upload {} ({} rows, {} columns)",
            path.display(),
            frame.height(),
            frame.width()
        );
        presenter.render_notice(&Notice::success("File uploaded successfully!"))?;

        validate_required_columns(&frame, self.validation)?;

        Ok(Dataset::with_origin(frame, DataOrigin::Upload(path.to_path_buf())))
    }
}

/// Read a CSV with a header row and trim whitespace from its column names.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let mut frame = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .finish()
        .map_err(|e| ChurnError::Csv(format!("Failed to read {}: {}", path.display(), e)))?
        .collect()
        .map_err(|e| ChurnError::Csv(format!("Failed to parse {}: {}", path.display(), e)))?;

    normalize_column_names(&mut frame)?;
    Ok(frame)
}

pub fn normalize_column_names(frame: &mut DataFrame) -> Result<()> {
    let trimmed: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    frame.set_column_names(&trimmed)?;
    Ok(())
}

/// Check an upload's header against the required columns.
///
/// Under [`UploadValidation::Strict`] `Risk Level` must exist as a column even
/// though it could be derived from the probability column.
pub fn validate_required_columns(frame: &DataFrame, validation: UploadValidation) -> Result<()> {
    let present = frame.get_column_names();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !(validation == UploadValidation::Derive && **column == RISK_LEVEL))
        .filter(|column| !present.contains(*column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        warn!("Upload rejected, missing columns: {:?}", missing);
        Err(ChurnError::MissingRequiredColumns { missing })
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
