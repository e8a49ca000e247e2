// src/resolve/candidates.rs

//! Ordered search space for interpreter discovery.

use std::path::{Component, Path, PathBuf};

use crate::env::path_list;
use crate::layout::Layout;
use crate::types::Platform;

/// Inputs that shape the search space.
#[derive(Debug, Clone, Default)]
pub struct SearchInputs<'a> {
    pub custom_directories: &'a [String],
    pub use_builtin_toolchain: bool,
    pub isolated_runtime_dir: Option<&'a str>,
    /// PATH value whose segments are searched last.
    pub search_path: &'a str,
}

/// Locations × names, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSearch {
    locations: Vec<String>,
    names: Vec<String>,
}

impl CandidateSearch {
    pub fn build(platform: Platform, layout: &dyn Layout, inputs: &SearchInputs<'_>) -> Self {
        let mut locations: Vec<String> = inputs.custom_directories.to_vec();

        if inputs.use_builtin_toolchain {
            locations.push(layout.env_bin_dir().to_string_lossy().into_owned());
            locations.push(layout.env_root_dir().to_string_lossy().into_owned());
        }

        if let Some(dir) = inputs.isolated_runtime_dir {
            locations.push(dir.to_string());
        }

        for segment in path_list::segments(inputs.search_path, platform.path_delimiter()) {
            if !locations.iter().any(|l| l == segment) {
                locations.push(segment.to_string());
            }
        }

        Self {
            locations,
            names: platform
                .interpreter_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Candidate paths, lazily, every name of a location before the next
    /// location.
    pub fn candidates(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.locations.iter().flat_map(move |location| {
            self.names
                .iter()
                .map(move |name| normalize_candidate(location, name))
        })
    }
}

/// `location/name` with quotes stripped, made absolute and lexically
/// normalized (`.` and `..` resolved without touching the filesystem).
pub fn normalize_candidate(location: &str, name: &str) -> PathBuf {
    let location = strip_quotes(location);
    let name = strip_quotes(name);
    let joined = Path::new(&location).join(name);
    let absolute = std::path::absolute(&joined).unwrap_or(joined);
    lexical_normalize(&absolute)
}

fn strip_quotes(s: &str) -> String {
    s.replace(['"', '\''], "")
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DirLayout;

    fn layout() -> DirLayout {
        DirLayout::under("/ik", Platform::Linux)
    }

    #[test]
    fn locations_follow_priority_order() {
        let custom = vec!["/custom".to_string()];
        let inputs = SearchInputs {
            custom_directories: &custom,
            use_builtin_toolchain: true,
            isolated_runtime_dir: Some("/iso/bin"),
            search_path: "/usr/bin:/custom:/bin:/usr/bin",
        };
        let search = CandidateSearch::build(Platform::Linux, &layout(), &inputs);

        assert_eq!(
            search.locations(),
            &["/custom", "/ik/env/bin", "/ik/env", "/iso/bin", "/usr/bin", "/bin"]
        );
    }

    #[test]
    fn builtin_dirs_skipped_when_disabled() {
        let inputs = SearchInputs {
            search_path: "/usr/bin",
            ..Default::default()
        };
        let search = CandidateSearch::build(Platform::Linux, &layout(), &inputs);
        assert_eq!(search.locations(), &["/usr/bin"]);
    }

    #[test]
    fn candidates_are_location_major() {
        let inputs = SearchInputs {
            search_path: "/a:/b",
            ..Default::default()
        };
        let search = CandidateSearch::build(Platform::Linux, &layout(), &inputs);
        let all: Vec<PathBuf> = search.candidates().collect();

        assert_eq!(
            all,
            vec![
                PathBuf::from("/a/python3"),
                PathBuf::from("/a/python"),
                PathBuf::from("/a/python3.12"),
                PathBuf::from("/b/python3"),
                PathBuf::from("/b/python"),
                PathBuf::from("/b/python3.12"),
            ]
        );
    }

    #[test]
    fn windows_path_uses_semicolons_and_one_name() {
        let inputs = SearchInputs {
            search_path: "/x;/y",
            ..Default::default()
        };
        let search = CandidateSearch::build(Platform::Windows, &layout(), &inputs);
        assert_eq!(search.locations(), &["/x", "/y"]);
        assert_eq!(search.candidates().count(), 2);
    }

    #[test]
    fn normalizes_quotes_and_dots() {
        assert_eq!(
            normalize_candidate("\"/opt/py/./bin/../bin\"", "python3"),
            PathBuf::from("/opt/py/bin/python3")
        );
        assert_eq!(normalize_candidate("'/opt/py'", "python"), PathBuf::from("/opt/py/python"));
    }

    #[test]
    fn relative_locations_become_absolute() {
        let path = normalize_candidate("venv/bin", "python3");
        assert!(path.is_absolute());
        assert!(path.ends_with("venv/bin/python3"));
    }
}
