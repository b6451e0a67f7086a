//! Candidate-directory discovery for README validation.

use crate::cancel::CancellationToken;
use crate::config::ReadmeSettings;
use crate::error::{CheckError, CiError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories found under a root, plus any subtrees that could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    /// Unique directories in discovery order.
    pub directories: Vec<PathBuf>,
    /// Paths that could not be traversed, with the reason.
    pub problems: Vec<(PathBuf, String)>,
}

impl Discovered {
    /// Append `dir` unless it is already present.
    pub fn push(&mut self, dir: PathBuf, seen: &mut HashSet<PathBuf>) {
        if seen.insert(dir.clone()) {
            self.directories.push(dir);
        }
    }
}

/// Finds the directories a README check should look at.
pub trait DirectoryDiscovery: Send + Sync {
    fn discover(
        &self,
        root: &Path,
        cancel: &CancellationToken,
    ) -> std::result::Result<Discovered, CheckError>;
}

/// Default discovery: directories holding a project marker file, every
/// immediate subdirectory of a package root, then the root itself.
#[derive(Debug)]
pub struct MarkerDiscovery {
    markers: GlobSet,
    package_roots: Vec<String>,
    exclude_dirs: Vec<String>,
}

impl MarkerDiscovery {
    pub fn from_settings(settings: &ReadmeSettings) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for marker in &settings.project_markers {
            let glob = Glob::new(marker).map_err(|e| {
                CiError::UserError(format!(
                    "invalid glob in readme.project_markers: '{}' - {}",
                    marker, e
                ))
            })?;
            builder.add(glob);
        }
        let markers = builder.build().map_err(|e| {
            CiError::UserError(format!("failed to build project marker set: {}", e))
        })?;

        Ok(Self {
            markers,
            package_roots: settings.package_roots.clone(),
            exclude_dirs: settings.exclude_dirs.clone(),
        })
    }

    fn is_excluded(&self, name: &std::ffi::OsStr) -> bool {
        let name = name.to_string_lossy();
        self.exclude_dirs.iter().any(|d| *d == name)
    }

    fn marker_directories(
        &self,
        root: &Path,
        cancel: &CancellationToken,
        found: &mut Discovered,
        seen: &mut HashSet<PathBuf>,
    ) -> std::result::Result<(), CheckError> {
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !(e.file_type().is_dir() && self.is_excluded(e.file_name()))
            });

        for entry in walker {
            if cancel.is_cancelled() {
                return Err(CheckError::Cancelled);
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    found.problems.push((path, e.to_string()));
                    continue;
                }
            };

            if entry.file_type().is_file()
                && self.markers.is_match(entry.file_name())
                && let Some(parent) = entry.path().parent()
            {
                found.push(parent.to_path_buf(), seen);
            }
        }

        Ok(())
    }

    fn package_directories(
        &self,
        root: &Path,
        found: &mut Discovered,
        seen: &mut HashSet<PathBuf>,
    ) {
        for package_root in &self.package_roots {
            let base = root.join(package_root);
            if !base.is_dir() {
                continue;
            }

            let entries = match std::fs::read_dir(&base) {
                Ok(entries) => entries,
                Err(e) => {
                    found.problems.push((base, e.to_string()));
                    continue;
                }
            };

            let mut subdirs: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
                .filter(|entry| !self.is_excluded(&entry.file_name()))
                .map(|entry| entry.path())
                .collect();
            subdirs.sort();

            for dir in subdirs {
                found.push(dir, seen);
            }
        }
    }
}

impl DirectoryDiscovery for MarkerDiscovery {
    fn discover(
        &self,
        root: &Path,
        cancel: &CancellationToken,
    ) -> std::result::Result<Discovered, CheckError> {
        // An unlistable root leaves nothing to check.
        std::fs::read_dir(root).map_err(|e| CheckError::io(root, e))?;

        let mut found = Discovered::default();
        let mut seen = HashSet::new();

        self.marker_directories(root, cancel, &mut found, &mut seen)?;
        self.package_directories(root, &mut found, &mut seen);
        found.push(root.to_path_buf(), &mut seen);

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_file;
    use tempfile::TempDir;

    fn discover(root: &Path) -> Discovered {
        MarkerDiscovery::from_settings(&ReadmeSettings::default())
            .unwrap()
            .discover(root, &CancellationToken::new())
            .unwrap()
    }

    fn relative(root: &Path, found: &Discovered) -> Vec<String> {
        found
            .directories
            .iter()
            .map(|d| {
                d.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn empty_root_yields_only_root() {
        let temp = TempDir::new().unwrap();
        let found = discover(temp.path());
        assert_eq!(relative(temp.path(), &found), vec![""]);
        assert!(found.problems.is_empty());
    }

    #[test]
    fn finds_marker_directories_and_package_roots() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "tools/gen/package.json", "{}");
        write_file(temp.path(), "apps/web/Web.csproj", "<Project/>");
        std::fs::create_dir_all(temp.path().join("sdk/storage")).unwrap();
        std::fs::create_dir_all(temp.path().join("sdk/identity")).unwrap();
        write_file(temp.path(), "sdk/notes.txt", "not a directory");

        let found = discover(temp.path());

        assert_eq!(
            relative(temp.path(), &found),
            vec!["apps/web", "tools/gen", "sdk/identity", "sdk/storage", ""]
        );
    }

    #[test]
    fn marker_in_package_subdir_is_not_duplicated() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "sdk/core/Cargo.toml", "[package]");
        write_file(temp.path(), "Cargo.toml", "[workspace]");

        let found = discover(temp.path());

        assert_eq!(relative(temp.path(), &found), vec!["", "sdk/core"]);
    }

    #[test]
    fn excluded_directories_are_not_descended() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "node_modules/left-pad/package.json", "{}");
        write_file(temp.path(), "target/debug/build/x/Cargo.toml", "");
        write_file(temp.path(), "packages/node_modules/package.json", "{}");
        std::fs::create_dir_all(temp.path().join("packages/node_modules")).unwrap();

        let found = discover(temp.path());

        assert_eq!(relative(temp.path(), &found), vec![""]);
    }

    #[test]
    fn cancelled_token_stops_walk() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), "a/package.json", "{}");

        let token = CancellationToken::new();
        token.cancel();
        let result = MarkerDiscovery::from_settings(&ReadmeSettings::default())
            .unwrap()
            .discover(temp.path(), &token);

        assert!(matches!(result, Err(CheckError::Cancelled)));
    }

    #[test]
    fn missing_root_is_io_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone");

        let result = MarkerDiscovery::from_settings(&ReadmeSettings::default())
            .unwrap()
            .discover(&missing, &CancellationToken::new());

        match result {
            Err(CheckError::Io { path, source }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }

    #[test]
    fn invalid_marker_glob_is_user_error() {
        let settings = ReadmeSettings {
            project_markers: vec!["a[b".to_string()],
            ..Default::default()
        };
        let err = MarkerDiscovery::from_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("invalid glob"));
    }
}
