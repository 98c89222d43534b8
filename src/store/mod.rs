pub mod repository;

use std::path::PathBuf;

pub use repository::{sanitize_name, StoreError, TemplateRepository};

use crate::version::APP_NAME;

/// `~/.template-vault/templates`, or `./templates` when there is no home
/// directory.
pub fn default_dir() -> PathBuf {
    dirs::home_dir()
        .map(|mut path| {
            path.push(format!(".{}", APP_NAME));
            path.push("templates");
            path
        })
        .unwrap_or_else(|| PathBuf::from("templates"))
}
