//! Interfaces to the external comparison collaborators.
//!
//! The pipeline itself never judges authenticity; it hands a normalized
//! seal and a reference template to an opaque vision-language collaborator
//! and passes its free-text verdict through untouched. Only the seams are
//! defined here: a hosting layer supplies the actual model client.

use crate::core::SealResult;
use std::path::{Path, PathBuf};

/// Image extensions accepted as reference templates.
const TEMPLATE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// A read-only directory of reference template images addressed by
/// filename.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    /// Opens the store rooted at `dir`. The directory is never written.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Lists template image paths, sorted by filename.
    ///
    /// # Errors
    ///
    /// Returns `SealError::Io` when the directory cannot be read.
    pub fn list(&self) -> SealResult<Vec<PathBuf>> {
        let mut templates = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_template = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| {
                    let ext = ext.to_ascii_lowercase();
                    TEMPLATE_EXTENSIONS.iter().any(|known| *known == ext)
                })
                .unwrap_or(false);
            if path.is_file() && is_template {
                templates.push(path);
            }
        }
        templates.sort();
        Ok(templates)
    }

    /// Resolves a template by filename.
    ///
    /// Returns `None` when no such file exists in the store.
    pub fn get(&self, name: &str) -> Option<PathBuf> {
        let path = self.dir.join(name);
        path.is_file().then_some(path)
    }
}

/// An opaque vision-language comparison collaborator.
///
/// Implementations receive two images and a natural-language instruction
/// and return free-text analysis. Callers must not parse or depend on the
/// response format beyond passing it through.
pub trait SealComparator {
    /// Compares a normalized seal against a reference template.
    fn compare(&self, seal: &Path, template: &Path, instruction: &str) -> SealResult<String>;
}
