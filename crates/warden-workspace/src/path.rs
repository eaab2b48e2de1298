//! Lexical path helpers.
//!
//! Nothing here touches the filesystem. Lexical normalization is a cheap
//! first pass only; containment is decided on the canonical path.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf, Prefix};

use crate::syntax::check_segment;

/// Apply candidate segments to `base`, resolving `.` and `..` lexically.
///
/// `..` never climbs above the volume root of `base`; excess parents are
/// clamped there, the same way the OS treats `/..`.
///
/// # Errors
///
/// Returns a description of the first segment that fails
/// [`check_segment`](crate::syntax::check_segment).
pub fn normalize<'a>(
    base: &Path,
    segments: impl IntoIterator<Item = &'a str>,
    windows_rules: bool,
) -> Result<PathBuf, String> {
    let floor = volume_root(base);
    let mut resolved = base.to_path_buf();

    for segment in segments {
        match segment {
            "." => {},
            ".." => {
                if resolved != floor {
                    resolved.pop();
                }
            },
            name => {
                check_segment(name, windows_rules)?;
                resolved.push(name);
            },
        }
    }

    Ok(resolved)
}

/// The prefix and root directory of `path` (`/` on Unix, `C:\` or `\\?\C:\`
/// on Windows).
#[must_use]
pub fn volume_root(path: &Path) -> PathBuf {
    path.components()
        .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect()
}

/// Upper-cased drive letter of `path`, if it has one.
#[must_use]
pub fn drive_letter(path: &Path) -> Option<char> {
    match path.components().next() {
        Some(Component::Prefix(prefix)) => match prefix.kind() {
            Prefix::Disk(d) | Prefix::VerbatimDisk(d) => {
                Some(char::from(d.to_ascii_uppercase()))
            },
            _ => None,
        },
        _ => None,
    }
}

/// Check that a name can be appended without changing direction: not empty,
/// not `.` or `..`, and free of separators.
#[must_use]
pub fn is_plain_name(name: &OsStr) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(n)), None) if n == name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(base: &str, rest: &str) -> PathBuf {
        normalize(Path::new(base), crate::syntax::segments(rest), false).unwrap()
    }

    #[test]
    fn test_valid_path() {
        assert_eq!(
            norm("/var/sandbox", "src/main.rs"),
            Path::new("/var/sandbox/src/main.rs")
        );
    }

    #[test]
    fn test_dot_segments() {
        assert_eq!(
            norm("/var/sandbox", "./src/./lib/../main.rs"),
            Path::new("/var/sandbox/src/main.rs")
        );
        assert_eq!(norm("/var/sandbox", "."), Path::new("/var/sandbox"));
    }

    #[test]
    fn test_traversal_leaves_base() {
        assert_eq!(
            norm("/var/sandbox", "src/../../etc/passwd"),
            Path::new("/var/etc/passwd")
        );
    }

    #[test]
    fn test_traversal_clamps_at_volume_root() {
        assert_eq!(
            norm("/var/sandbox", "../../../../../../etc/passwd"),
            Path::new("/etc/passwd")
        );
    }

    #[test]
    fn test_windows_rules_applied_to_names() {
        let res = normalize(
            Path::new("/var/sandbox"),
            crate::syntax::segments("dir/file.txt:stream"),
            true,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_volume_root_unix_style() {
        assert_eq!(volume_root(Path::new("/a/b/c")), Path::new("/"));
        assert_eq!(volume_root(Path::new("a/b")), PathBuf::new());
    }

    #[cfg(unix)]
    #[test]
    fn test_no_drive_on_unix() {
        assert_eq!(drive_letter(Path::new("/home/user")), None);
    }

    #[cfg(windows)]
    #[test]
    fn test_drive_letter_windows() {
        assert_eq!(drive_letter(Path::new(r"c:\Users")), Some('C'));
        assert_eq!(drive_letter(Path::new(r"\\?\D:\work")), Some('D'));
        assert_eq!(drive_letter(Path::new(r"\\server\share\x")), None);
    }

    #[test]
    fn test_plain_name() {
        assert!(is_plain_name(OsStr::new("file.txt")));
        assert!(!is_plain_name(OsStr::new("..")));
        assert!(!is_plain_name(OsStr::new(".")));
        assert!(!is_plain_name(OsStr::new("")));
        assert!(!is_plain_name(OsStr::new("a/b")));
    }
}
