//! Object registry: maps a directory tree of shared or page objects onto
//! a nested, keyed structure the fixtures can look objects up in.
//!
//! Keys are camelCased directory names and file stems. Data files are
//! loaded eagerly; anything else is registered by its absolute path so the
//! engine-side loader can import it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{LauncherError, Result};

/// One registered object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectEntry {
    /// Parsed JSON or YAML document.
    Data(serde_json::Value),
    /// Source module to be loaded by the engine.
    Module { module: PathBuf },
    /// Nested directory.
    Directory(BTreeMap<String, ObjectEntry>),
}

/// Keyed objects loaded from one directory tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ObjectRegistry {
    entries: BTreeMap<String, ObjectEntry>,
}

impl ObjectRegistry {
    /// Load every object under `dir`.
    ///
    /// A missing directory yields an empty registry and a warning.
    pub fn load(dir: &Path) -> Result<Self> {
        Self::load_excluding(dir, &[])
    }

    /// Load every object under `dir` except the files listed in `excluded`.
    pub fn load_excluding(dir: &Path, excluded: &[&Path]) -> Result<Self> {
        if !dir.is_dir() {
            tracing::warn!(path = %dir.display(), "Object directory not found, continuing without it");
            return Ok(Self::default());
        }
        let entries = load_dir(dir, excluded)?;
        tracing::debug!(path = %dir.display(), objects = entries.len(), "Loaded object registry");
        Ok(Self { entries })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ObjectEntry> {
        self.entries.get(key)
    }

    /// Look up a nested entry by its key path, e.g. `["checkout", "cartPage"]`.
    #[must_use]
    pub fn lookup(&self, keys: &[&str]) -> Option<&ObjectEntry> {
        let (first, rest) = keys.split_first()?;
        let mut current = self.entries.get(*first)?;
        for key in rest {
            match current {
                ObjectEntry::Directory(children) => current = children.get(*key)?,
                _ => return None,
            }
        }
        Some(current)
    }

    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn load_dir(dir: &Path, excluded: &[&Path]) -> Result<BTreeMap<String, ObjectEntry>> {
    let mut entries = BTreeMap::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let message = e.to_string();
            LauncherError::Io(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other(message)),
            )
        })?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || excluded.contains(&path) {
            continue;
        }

        let (key, object) = if entry.file_type().is_dir() {
            (camel_case(&name), ObjectEntry::Directory(load_dir(path, excluded)?))
        } else {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            (camel_case(&stem), load_file(path)?)
        };

        if key.is_empty() {
            continue;
        }
        if entries.insert(key.clone(), object).is_some() {
            tracing::debug!(key = %key, path = %path.display(), "Object key registered twice, last one wins");
        }
    }

    Ok(entries)
}

fn load_file(path: &Path) -> Result<ObjectEntry> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => {
            let content = fs::read_to_string(path)?;
            Ok(ObjectEntry::Data(serde_json::from_str(&content)?))
        }
        Some("yaml" | "yml") => {
            let content = fs::read_to_string(path)?;
            Ok(ObjectEntry::Data(serde_yaml_ng::from_str(&content)?))
        }
        _ => Ok(ObjectEntry::Module {
            module: path.to_path_buf(),
        }),
    }
}

/// Convert a file or directory name to a camelCase key.
///
/// # Examples
/// ```
/// use bdd_launcher::registry::camel_case;
///
/// assert_eq!(camel_case("cart-page"), "cartPage");
/// assert_eq!(camel_case("Search_Results"), "searchResults");
/// assert_eq!(camel_case("login"), "login");
/// ```
#[must_use]
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (index, word) in name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if index == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}
