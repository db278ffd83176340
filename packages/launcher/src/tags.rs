//! Tag discovery in feature files and validation of requested tags.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::error::{LauncherError, Result};

/// Extension of the documents scanned for tags.
pub const FEATURE_EXTENSION: &str = "feature";

/// Tag pattern: `@` followed by lowercase letters or digits.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[a-z0-9]+").expect("valid regex"));

/// Tags found across a feature file corpus.
pub type TagSet = BTreeSet<String>;

/// Collect every tag token occurring in `text`.
///
/// # Examples
/// ```
/// use bdd_launcher::tags::tags_in_text;
///
/// let found = tags_in_text("@smoke @Login\nFeature: cart @cart2");
/// assert!(found.contains("@smoke"));
/// assert!(found.contains("@cart2"));
/// assert!(!found.contains("@Login"));
/// ```
#[must_use]
pub fn tags_in_text(text: &str) -> TagSet {
    TAG_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Scan all feature files under `feature_files` and union their tags.
///
/// `feature_files` may be a directory (scanned recursively) or a single
/// file. Files that are not valid UTF-8 are skipped.
pub fn extract_tags(feature_files: &Path) -> Result<TagSet> {
    if !feature_files.exists() {
        return Err(LauncherError::FeatureFilesNotFound(
            feature_files.to_path_buf(),
        ));
    }

    let mut found = TagSet::new();
    let mut scanned = 0usize;

    for entry in WalkDir::new(feature_files).follow_links(true) {
        let entry = entry.map_err(|e| {
            let message = e.to_string();
            LauncherError::Io(
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other(message)),
            )
        })?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(FEATURE_EXTENSION)
        {
            continue;
        }

        match fs::read_to_string(path) {
            Ok(content) => {
                found.extend(tags_in_text(&content));
                scanned += 1;
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                tracing::debug!(path = %path.display(), "Skipping non UTF-8 feature file");
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::debug!(files = scanned, tags = found.len(), "Scanned feature files for tags");
    Ok(found)
}

/// Validate requested tags against the tags found in the feature files.
///
/// Tags are checked in order and the first failure is returned: a tag
/// without the `@` prefix fails before membership is looked at.
pub fn validate_tags(requested: &[String], found: &TagSet) -> Result<()> {
    for tag in requested {
        if !tag.starts_with('@') {
            return Err(LauncherError::InvalidTagFormat(tag.clone()));
        }
        if !found.contains(tag) {
            return Err(LauncherError::UnknownTag(tag.clone()));
        }
    }
    Ok(())
}

/// Engine arguments selecting the given tags: one `--tags <tag>` pair each.
#[must_use]
pub fn tag_arguments(tags: &[String]) -> Vec<String> {
    tags.iter()
        .flat_map(|tag| ["--tags".to_string(), tag.clone()])
        .collect()
}

/// Validate `requested` against the corpus under `feature_files`.
///
/// The corpus is only scanned when at least one tag is requested.
pub fn check_requested_tags(requested: &[String], feature_files: &Path) -> Result<()> {
    if requested.is_empty() {
        return Ok(());
    }
    let found = extract_tags(feature_files)?;
    validate_tags(requested, &found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(tags: &[&str]) -> TagSet {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn owned(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_tags_in_text_is_lowercase_only() {
        let found = tags_in_text("@smoke @SMOKE @cart-checkout user@example.com");
        assert_eq!(found, set(&["@cart", "@example", "@smoke"]));
    }

    #[test]
    fn test_extract_tags_unions_and_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("checkout");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join("login.feature"),
            "@smoke\nFeature: Login\n  @regression\n  Scenario: ok\n",
        )
        .unwrap();
        fs::write(nested.join("cart.feature"), "@smoke @cart\nFeature: Cart\n").unwrap();
        fs::write(dir.path().join("notes.md"), "@ignored").unwrap();

        let found = extract_tags(dir.path()).unwrap();
        assert_eq!(found, set(&["@cart", "@regression", "@smoke"]));
    }

    #[test]
    fn test_extract_tags_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.feature");
        fs::write(&file, "@only\nFeature: One\n").unwrap();

        assert_eq!(extract_tags(&file).unwrap(), set(&["@only"]));
    }

    #[test]
    fn test_extract_tags_skips_binary_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.feature"), [0xff, 0xfe, 0x40, 0x61]).unwrap();
        fs::write(dir.path().join("good.feature"), "@good").unwrap();

        assert_eq!(extract_tags(dir.path()).unwrap(), set(&["@good"]));
    }

    #[test]
    fn test_extract_tags_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_tags(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, LauncherError::FeatureFilesNotFound(_)));
    }

    #[test]
    fn test_validate_tags_success() {
        let found = set(&["@smoke", "@regression"]);
        assert!(validate_tags(&owned(&["@regression", "@smoke"]), &found).is_ok());
        assert!(validate_tags(&[], &found).is_ok());
    }

    #[test]
    fn test_validate_tags_format_checked_before_membership() {
        let err = validate_tags(&owned(&["smoke"]), &set(&["@smoke"])).unwrap_err();
        assert!(matches!(err, LauncherError::InvalidTagFormat(tag) if tag == "smoke"));
    }

    #[test]
    fn test_validate_tags_unknown() {
        let err = validate_tags(&owned(&["@missing"]), &set(&["@smoke"])).unwrap_err();
        assert!(matches!(err, LauncherError::UnknownTag(tag) if tag == "@missing"));
    }

    #[test]
    fn test_validate_tags_stops_at_first_failure() {
        let err = validate_tags(&owned(&["@missing", "bad"]), &set(&["@smoke"])).unwrap_err();
        assert!(matches!(err, LauncherError::UnknownTag(_)));
    }

    #[test]
    fn test_tag_arguments_preserve_order() {
        assert_eq!(
            tag_arguments(&owned(&["@b", "@a"])),
            vec!["--tags", "@b", "--tags", "@a"]
        );
        assert!(tag_arguments(&[]).is_empty());
    }

    #[test]
    fn test_check_requested_tags_skips_scan_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_requested_tags(&[], &dir.path().join("absent")).is_ok());
    }
}
