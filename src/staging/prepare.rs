//! Workspace preparation: wipe staging, copy overrides, create directories.

use super::StagingLayout;
use crate::error::BuildError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What `prepare` put into staging.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PrepareReport {
    pub copied_files: usize,
    pub created_dirs: Vec<String>,
}

/// Recreate the staging root from `source_dir` and add `staging_dirs`.
///
/// Directories already supplied by the override tree are left as they are.
/// Nothing is removed when the staging root overlaps `source_dir` or any of
/// the `protected` directories.
pub fn prepare(
    source_dir: &Path,
    layout: &StagingLayout,
    staging_dirs: &[String],
    protected: &[PathBuf],
) -> Result<PrepareReport, BuildError> {
    if !source_dir.is_dir() {
        return Err(BuildError::ConfigError(format!(
            "Override directory not found: {}",
            source_dir.display()
        )));
    }

    let root = layout.root();
    ensure_disjoint(root, source_dir)?;
    for dir in protected {
        ensure_disjoint(root, dir)?;
    }

    if root.exists() {
        fs::remove_dir_all(root).map_err(|e| BuildError::io(root, e))?;
    }
    fs::create_dir_all(root).map_err(|e| BuildError::io(root, e))?;

    let copied_files = copy_tree(source_dir, root)?;
    tracing::info!(
        source = %source_dir.display(),
        files = copied_files,
        "Copied DevTools specific files"
    );

    let mut created_dirs = Vec::with_capacity(staging_dirs.len());
    for dir in staging_dirs {
        let path = layout.path(dir);
        fs::create_dir_all(&path).map_err(|e| BuildError::io(&path, e))?;
        created_dirs.push(dir.clone());
    }
    tracing::info!(dirs = ?created_dirs, "Created directories");

    Ok(PrepareReport {
        copied_files,
        created_dirs,
    })
}

/// Absolute, symlink-free form of `path`, which need not exist yet.
///
/// The longest existing ancestor is canonicalized and the missing tail
/// appended to it.
fn absolute_path(path: &Path) -> Result<PathBuf, BuildError> {
    let mut existing = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| BuildError::io(path, e))?
            .join(path)
    };
    let mut tail = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return Ok(tail.iter().rev().fold(canonical, |acc, name| acc.join(name)));
        }
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                tail.push(name.to_os_string());
                existing = parent.to_path_buf();
            }
            _ => {
                return Err(BuildError::ConfigError(format!(
                    "Cannot resolve path: {}",
                    path.display()
                )))
            }
        }
    }
}

/// Fail unless the staging root and `other` are disjoint trees.
pub fn ensure_disjoint(staging_root: &Path, other: &Path) -> Result<(), BuildError> {
    let staging = absolute_path(staging_root)?;
    let other_resolved = absolute_path(other)?;
    if staging.starts_with(&other_resolved) || other_resolved.starts_with(&staging) {
        return Err(BuildError::ConfigError(format!(
            "Staging directory {} overlaps {}; refusing to wipe it",
            staging_root.display(),
            other.display()
        )));
    }
    Ok(())
}

/// Recursively copy `from` into the existing directory `to`; returns the file count.
fn copy_tree(from: &Path, to: &Path) -> Result<usize, BuildError> {
    let mut copied = 0;
    for entry in WalkDir::new(from).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| from.to_path_buf());
            BuildError::io(path, e.into())
        })?;
        let relative = entry.path().strip_prefix(from).map_err(|e| {
            BuildError::ConfigError(format!("Override walk escaped its root: {}", e))
        })?;
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| BuildError::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| BuildError::io(&target, e))?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Recursively copy a directory, creating `to`.
pub(crate) fn copy_dir(from: &Path, to: &Path) -> Result<usize, BuildError> {
    fs::create_dir_all(to).map_err(|e| BuildError::io(to, e))?;
    copy_tree(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirs() -> Vec<String> {
        ["_locales", "addon", "l10n", "libraries"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn prepare_wipes_and_copies_overrides() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("src");
        fs::create_dir_all(source.join("inject")).unwrap();
        fs::write(source.join("manifest.json"), r#"{"version":"0.0.0"}"#).unwrap();
        fs::write(source.join("inject/inject.js"), "void 0;").unwrap();

        let layout = StagingLayout::new(temp.path().join("tmp"));
        fs::create_dir_all(layout.root()).unwrap();
        fs::write(layout.path("stale.txt"), "old run").unwrap();

        let report = prepare(&source, &layout, &dirs(), &[]).unwrap();

        assert_eq!(report.copied_files, 2);
        assert!(!layout.path("stale.txt").exists());
        assert_eq!(
            fs::read_to_string(layout.path("inject/inject.js")).unwrap(),
            "void 0;"
        );
        for dir in dirs() {
            assert!(layout.path(&dir).is_dir(), "{} should exist", dir);
        }
    }

    #[test]
    fn prepare_tolerates_override_supplied_directories() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("src");
        fs::create_dir_all(source.join("libraries")).unwrap();
        fs::write(source.join("libraries/local.js"), "1").unwrap();

        let layout = StagingLayout::new(temp.path().join("tmp"));
        prepare(&source, &layout, &dirs(), &[]).unwrap();
        assert!(layout.path("libraries/local.js").is_file());
    }

    #[test]
    fn prepare_requires_override_directory() {
        let temp = tempfile::tempdir().unwrap();
        let layout = StagingLayout::new(temp.path().join("tmp"));
        let err = prepare(&temp.path().join("missing"), &layout, &dirs(), &[]).unwrap_err();
        assert!(matches!(err, BuildError::ConfigError(_)));
    }

    fn override_tree(root: &Path) -> PathBuf {
        let source = root.join("src");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("manifest.json"), "{}").unwrap();
        source
    }

    #[test]
    fn staging_equal_to_override_keeps_override() {
        let temp = tempfile::tempdir().unwrap();
        let source = override_tree(temp.path());
        let layout = StagingLayout::new(&source);

        let err = prepare(&source, &layout, &dirs(), &[]).unwrap_err();

        assert!(err.to_string().contains("overlaps"));
        assert!(source.join("manifest.json").is_file());
    }

    #[test]
    fn staging_containing_override_keeps_override() {
        let temp = tempfile::tempdir().unwrap();
        let source = override_tree(temp.path());
        let layout = StagingLayout::new(temp.path().join("."));

        assert!(prepare(&source, &layout, &dirs(), &[]).is_err());
        assert!(source.join("manifest.json").is_file());
    }

    #[test]
    fn staging_inside_override_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let source = override_tree(temp.path());
        let layout = StagingLayout::new(source.join("build/out"));

        assert!(prepare(&source, &layout, &dirs(), &[]).is_err());
        assert!(!source.join("build").exists());
    }

    #[test]
    fn staging_overlapping_protected_mirror_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let source = override_tree(temp.path());
        let mirror = temp.path().join("upstream");
        fs::create_dir_all(mirror.join("libraries")).unwrap();
        fs::write(mirror.join("libraries/l10n.js"), "// l10n").unwrap();

        let layout = StagingLayout::new(mirror.join("libraries"));
        let err = prepare(&source, &layout, &dirs(), &[mirror.clone()]).unwrap_err();

        assert!(matches!(err, BuildError::ConfigError(_)));
        assert!(mirror.join("libraries/l10n.js").is_file());
    }

    #[test]
    fn sibling_directories_are_disjoint() {
        let temp = tempfile::tempdir().unwrap();
        let source = override_tree(temp.path());
        assert!(ensure_disjoint(&temp.path().join("tmp"), &source).is_ok());
        assert!(ensure_disjoint(&temp.path().join("src-build"), &source).is_ok());
    }
}
