//! Resolution of configured project paths into absolute locations.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::cli::CliOptions;

/// Logical path names a run needs resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalPath {
    PageObjects,
    Reports,
    FeatureFiles,
    SharedObjects,
    Steps,
    Bootstrap,
}

impl LogicalPath {
    /// Every logical path, in resolution order.
    pub const ALL: [LogicalPath; 6] = [
        LogicalPath::PageObjects,
        LogicalPath::Reports,
        LogicalPath::FeatureFiles,
        LogicalPath::SharedObjects,
        LogicalPath::Steps,
        LogicalPath::Bootstrap,
    ];

    /// Name used in configuration and the run context.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalPath::PageObjects => "pageObjects",
            LogicalPath::Reports => "reports",
            LogicalPath::FeatureFiles => "featureFiles",
            LogicalPath::SharedObjects => "sharedObjects",
            LogicalPath::Steps => "steps",
            LogicalPath::Bootstrap => "bootstrap",
        }
    }

    /// The configured (possibly relative) value for this path.
    #[must_use]
    pub fn configured(self, options: &CliOptions) -> &Path {
        match self {
            LogicalPath::PageObjects => &options.page_objects,
            LogicalPath::Reports => &options.reports,
            LogicalPath::FeatureFiles => &options.feature_files,
            LogicalPath::SharedObjects => &options.shared_objects,
            LogicalPath::Steps => &options.steps,
            LogicalPath::Bootstrap => &options.bootstrap,
        }
    }
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent.
///
/// No filesystem access; symlinks are not resolved.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Make `path` absolute relative to `base`.
#[must_use]
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    normalize(&base.join(path))
}

/// Resolves configured relative paths against a project root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Create a resolver for an absolute project root.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            root: normalize(&project_root.into()),
        }
    }

    /// The project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a configured value. Absolute values are only normalized.
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use bdd_launcher::paths::PathResolver;
    ///
    /// let resolver = PathResolver::new("/work/shop");
    /// assert_eq!(resolver.resolve(Path::new("./features")), Path::new("/work/shop/features"));
    /// assert_eq!(resolver.resolve(Path::new("../common")), Path::new("/work/common"));
    /// ```
    #[must_use]
    pub fn resolve(&self, configured: &Path) -> PathBuf {
        absolutize(&self.root, configured)
    }
}

/// Absolute locations for every logical path of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPaths {
    pub page_objects: PathBuf,
    pub reports: PathBuf,
    pub feature_files: PathBuf,
    pub shared_objects: PathBuf,
    pub steps: PathBuf,
    pub bootstrap: PathBuf,
}

impl ProjectPaths {
    /// Resolve all logical paths configured in `options`.
    #[must_use]
    pub fn resolve(resolver: &PathResolver, options: &CliOptions) -> Self {
        let resolve = |name: LogicalPath| resolver.resolve(name.configured(options));
        Self {
            page_objects: resolve(LogicalPath::PageObjects),
            reports: resolve(LogicalPath::Reports),
            feature_files: resolve(LogicalPath::FeatureFiles),
            shared_objects: resolve(LogicalPath::SharedObjects),
            steps: resolve(LogicalPath::Steps),
            bootstrap: resolve(LogicalPath::Bootstrap),
        }
    }

    /// Absolute location of a logical path.
    #[must_use]
    pub fn get(&self, name: LogicalPath) -> &Path {
        match name {
            LogicalPath::PageObjects => &self.page_objects,
            LogicalPath::Reports => &self.reports,
            LogicalPath::FeatureFiles => &self.feature_files,
            LogicalPath::SharedObjects => &self.shared_objects,
            LogicalPath::Steps => &self.steps,
            LogicalPath::Bootstrap => &self.bootstrap,
        }
    }
}
