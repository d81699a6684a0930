//! YAML data file writer.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::WriteError;

/// Writes `{base}/_data/{name}-{locale}.yml` files.
#[derive(Debug)]
pub struct DataWriter {
    data_dir: PathBuf,
}

impl DataWriter {
    #[must_use]
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            data_dir: base.as_ref().join("_data"),
        }
    }

    /// Destination path of a data file.
    #[must_use]
    pub fn data_path(&self, name: &str, locale: &str) -> PathBuf {
        self.data_dir.join(format!("{name}-{locale}.yml"))
    }

    /// Serialize `data` to YAML, overwriting any existing file.
    ///
    /// Keys keep their serialization order. An empty record is written as
    /// `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] if serialization or the filesystem write fails.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        name: &str,
        locale: &str,
        data: &T,
    ) -> Result<PathBuf, WriteError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| WriteError::io(&self.data_dir, e))?;

        let path = self.data_path(name, locale);
        let yaml = serde_yaml::to_string(data)?;
        let content =
            format!("# {name} data for locale {locale}, generated from CMS content\n{yaml}");
        fs::write(&path, content).map_err(|e| WriteError::io(&path, e))?;

        info!(path = %path.display(), locale, "Data file written");
        Ok(path)
    }
}
