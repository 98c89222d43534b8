use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::template::Template;

const RECORD_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("template '{0}' not found")]
    NotFound(String),

    #[error("template '{0}' already exists")]
    AlreadyExists(String),

    #[error("could not parse template record {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not write template record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A directory holding one JSON record per template.
///
/// Records are named after the template, so saving a renamed template leaves
/// the record under the old name in place.
pub struct TemplateRepository {
    dir: PathBuf,
}

impl TemplateRepository {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        log::debug!("opened template repository at {}", dir.display());
        Ok(TemplateRepository { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", sanitize_name(name), RECORD_EXTENSION))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.record_path(name).is_file()
    }

    /// Names of every readable record, sorted. Unparseable records are
    /// skipped.
    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self.scan()?.into_iter().map(|(name, _)| name).collect())
    }

    /// Every readable template, sorted by record name.
    pub fn load_all(&self) -> Result<Vec<Template>> {
        Ok(self.scan()?.into_iter().map(|(_, t)| t).collect())
    }

    pub fn load(&self, name: &str) -> Result<Template> {
        let path = self.record_path(name);
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        read_record(&path)
    }

    /// Writes the record for `template`, replacing any previous one with the
    /// same name. Returns the path written.
    pub fn save(&self, template: &Template) -> Result<PathBuf> {
        let path = self.record_path(&template.name);
        write_record(&path, template)?;
        log::info!("saved template '{}' to {}", template.name, path.display());
        Ok(path)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.record_path(name);
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        fs::remove_file(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        log::info!("deleted template '{}'", name);
        Ok(())
    }

    /// Copies an external record into the repository.
    ///
    /// A record without a name takes the file stem. An existing template with
    /// the same name is only replaced when `overwrite` is set.
    pub fn import_from(&self, source: &Path, overwrite: bool) -> Result<Template> {
        let mut template = read_record(source)?;
        if template.name.trim().is_empty() {
            template.name = source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        if self.exists(&template.name) && !overwrite {
            return Err(StoreError::AlreadyExists(template.name));
        }

        self.save(&template)?;
        Ok(template)
    }

    pub fn export_to(&self, name: &str, destination: &Path) -> Result<()> {
        let template = self.load(name)?;
        write_record(destination, &template)?;
        log::info!("exported template '{}' to {}", name, destination.display());
        Ok(())
    }

    fn scan(&self) -> Result<Vec<(String, Template)>> {
        let entries = fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut records = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    log::warn!("skipping unreadable entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            match read_record(&path) {
                Ok(template) => records.push((stem, template)),
                Err(e) => log::warn!("skipping template record: {}", e),
            }
        }

        records.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(records)
    }
}

/// Turns a template name into a safe file stem.
pub fn sanitize_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim().trim_matches('.').trim();
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

fn read_record(path: &Path) -> Result<Template> {
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Format {
        path: path.to_path_buf(),
        source,
    })
}

fn write_record(path: &Path, template: &Template) -> Result<()> {
    let json = serde_json::to_string_pretty(template)?;
    fs::write(path, json).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
