use std::{fs, path::Path};

use polars::{
    frame::DataFrame,
    prelude::{CsvWriter, SchemaRef, SerWriter},
};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::{IoError, MicrogridResult};

// ================================================================================================
// Traits
// ================================================================================================

/// Common interface of tabular reports.
pub trait Report {
    /// Materializes the report as a `DataFrame`.
    fn as_df(&self) -> MicrogridResult<DataFrame>;
}

pub trait ReportName {
    fn base_name(&self) -> String;

    fn filename(&self, ext: FileExtension) -> String {
        format!("{}.{}", self.base_name(), ext)
    }
}

pub trait ToSchema {
    /// Returns the canonical schema for this report type.
    fn to_schema() -> SchemaRef;
}

pub trait ToCsv {
    /// Writes the report to `<dir>/<base_name>.csv`.
    ///
    /// Creates `dir` if it does not exist and overwrites an existing file.
    fn to_csv(&self, dir: impl AsRef<Path>) -> MicrogridResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum FileExtension {
    Csv,
}

// ================================================================================================
// Blanket Implementations
// ================================================================================================

impl<T> ToCsv for T
where
    T: Report + ReportName,
{
    #[tracing::instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    fn to_csv(&self, dir: impl AsRef<Path>) -> MicrogridResult<()> {
        let dir = dir.as_ref();
        let file_path = dir.join(self.filename(FileExtension::Csv));

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                IoError::WriteFailed(format!(
                    "Failed to create directory {}: {e}",
                    dir.display()
                ))
            })?;
        }

        let mut df = self.as_df()?;
        let mut file = fs::File::create(&file_path).map_err(IoError::Io)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| {
                IoError::WriteFailed(format!(
                    "Failed to write CSV to '{}': {e}",
                    file_path.display()
                ))
            })?;

        tracing::info!(path = %file_path.display(), rows = df.height(), "Report written");
        Ok(())
    }
}
