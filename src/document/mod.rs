//! Plain-text stand-ins for the document collaborators: reading the body of a
//! source document and writing a generated one.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

/// Body text of a source document: every non-blank line followed by an empty
/// line.
pub fn body_from_text(text: &str) -> String {
    let mut body = String::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        body.push_str(line);
        body.push_str("\n\n");
    }
    body
}

pub fn read_source(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read source document {}", path.display()))?;
    Ok(body_from_text(&text))
}

/// Rendered text laid out as paragraphs: each non-blank line on its own,
/// separated by a blank line.
pub fn paragraphs(rendered: &str) -> Vec<&str> {
    rendered.lines().filter(|l| !l.trim().is_empty()).collect()
}

pub fn write_generated(rendered: &str, path: &Path) -> Result<()> {
    let mut out = paragraphs(rendered).join("\n\n");
    out.push('\n');
    fs::write(path, out)
        .with_context(|| format!("Could not save generated document {}", path.display()))?;
    log::info!("generated document written to {}", path.display());
    Ok(())
}

/// `minuta_YYYYMMDD_HHMM.txt` in the current directory.
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!("minuta_{}.txt", Local::now().format("%Y%m%d_%H%M")))
}
