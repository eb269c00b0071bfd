//! Turning a raw collection snapshot into the merge input list.

use std::path::{Path, PathBuf};

use itertools::Itertools;

/// Resolve a snapshot against the live filesystem.
///
/// Keeps entries that currently exist, drops repeats after their first
/// occurrence, then orders by file name, case-insensitively. Ties keep their
/// first-seen order.
pub fn resolve_inputs<S: AsRef<str>>(snapshot: &[S]) -> Vec<PathBuf> {
    resolve_with(snapshot, Path::exists)
}

/// [`resolve_inputs`] with an explicit existence check.
pub fn resolve_with<S, F>(snapshot: &[S], exists: F) -> Vec<PathBuf>
where
    S: AsRef<str>,
    F: Fn(&Path) -> bool,
{
    let mut inputs: Vec<PathBuf> = snapshot
        .iter()
        .map(|entry| PathBuf::from(entry.as_ref()))
        .filter(|path| exists(path.as_path()))
        .unique()
        .collect();
    inputs.sort_by_cached_key(|path| sort_key(path));
    inputs
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    fn all_exist(_: &Path) -> bool {
        true
    }

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_sorts_by_file_name_regardless_of_arrival() {
        let resolved = resolve_with(&["/sel/b.pdf", "/sel/a.pdf", "/sel/c.pdf"], all_exist);
        assert_eq!(resolved, paths(&["/sel/a.pdf", "/sel/b.pdf", "/sel/c.pdf"]));
    }

    #[test]
    fn test_sort_ignores_case_and_directory() {
        let resolved = resolve_with(
            &["/a/Zeta.pdf", "/z/alpha.PDF", "/m/Beta.pdf"],
            all_exist,
        );
        assert_eq!(
            resolved,
            paths(&["/z/alpha.PDF", "/m/Beta.pdf", "/a/Zeta.pdf"])
        );
    }

    #[test]
    fn test_duplicates_collapse_to_one() {
        let resolved = resolve_with(
            &["/sel/report.pdf", "/sel/cover.pdf", "/sel/report.pdf"],
            all_exist,
        );
        assert_eq!(resolved, paths(&["/sel/cover.pdf", "/sel/report.pdf"]));
    }

    #[test]
    fn test_same_name_in_different_dirs_keeps_first_seen_order() {
        let resolved = resolve_with(&["/b/x.pdf", "/a/x.pdf", "/b/x.pdf"], all_exist);
        assert_eq!(resolved, paths(&["/b/x.pdf", "/a/x.pdf"]));
    }

    #[test]
    fn test_vanished_paths_are_dropped() {
        let resolved = resolve_with(&["/sel/kept.pdf", "/sel/gone.pdf"], |p| {
            p != Path::new("/sel/gone.pdf")
        });
        assert_eq!(resolved, paths(&["/sel/kept.pdf"]));
    }

    #[test]
    fn test_all_vanished_is_empty() {
        let resolved = resolve_with(&["/sel/a.pdf", "/sel/b.pdf"], |_| false);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_resolve_inputs_checks_real_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.pdf");
        std::fs::write(&present, b"%PDF").unwrap();
        let missing = dir.path().join("missing.pdf");

        let snapshot = [
            missing.display().to_string(),
            present.display().to_string(),
        ];
        assert_eq!(resolve_inputs(&snapshot), vec![present]);
    }

    proptest! {
        #[test]
        fn prop_output_is_sorted_unique_subset(
            names in proptest::collection::vec("[a-dA-D]{1,3}\\.pdf", 0..20),
            dirs in proptest::collection::vec(0u8..3, 0..20),
        ) {
            let snapshot: Vec<String> = names
                .iter()
                .zip(dirs.iter().chain(std::iter::repeat(&0)))
                .map(|(name, dir)| format!("/d{dir}/{name}"))
                .collect();
            let resolved = resolve_with(&snapshot, all_exist);

            let unique: HashSet<_> = resolved.iter().collect();
            prop_assert_eq!(unique.len(), resolved.len());

            let input: HashSet<PathBuf> = snapshot.iter().map(PathBuf::from).collect();
            prop_assert_eq!(unique.len(), input.len());

            let keys: Vec<String> = resolved.iter().map(|p| sort_key(p)).collect();
            prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
