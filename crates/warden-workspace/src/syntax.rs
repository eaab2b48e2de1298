//! Candidate path syntax classification.
//!
//! Agent-supplied paths arrive as strings in either Unix or Windows spelling,
//! whatever the host is. Classification therefore works on the raw string and
//! treats both `/` and `\` as separators everywhere; it never consults the
//! filesystem.

/// The shape of a candidate path string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSyntax<'a> {
    /// Extended-length or device namespace prefix: `\\?\`, `\\.\`, `\??\`.
    Verbatim,
    /// Network share: `\\server\share\...` (or with forward slashes).
    Unc,
    /// `X:\...` - absolute on a specific drive. `rest` starts at the separator.
    DriveAbsolute {
        /// Upper-cased drive letter.
        drive: char,
        /// Everything after `X:`.
        rest: &'a str,
    },
    /// `X:foo` - relative to the current directory of another drive.
    DriveRelative {
        /// Upper-cased drive letter.
        drive: char,
    },
    /// `/foo` or `\foo` - absolute on the root's own volume.
    Rooted {
        /// The whole candidate.
        rest: &'a str,
    },
    /// Anything else, interpreted relative to the workspace root.
    Relative {
        /// The whole candidate.
        rest: &'a str,
    },
}

impl CandidateSyntax<'_> {
    /// Check if the candidate names an absolute location.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        !matches!(self, Self::Relative { .. })
    }
}

/// Either separator, on any host.
#[must_use]
pub fn is_separator(b: u8) -> bool {
    b == b'/' || b == b'\\'
}

/// Classify a candidate string.
#[must_use]
pub fn classify(candidate: &str) -> CandidateSyntax<'_> {
    let bytes = candidate.as_bytes();
    let sep_at = |i: usize| bytes.get(i).copied().is_some_and(is_separator);

    if sep_at(0) && sep_at(1) {
        // `\\?\` and `\\.\` are namespace prefixes, not share names.
        return match bytes.get(2) {
            Some(b'?' | b'.') if sep_at(3) || bytes.len() == 3 => CandidateSyntax::Verbatim,
            _ => CandidateSyntax::Unc,
        };
    }

    // NT object namespace: `\??\C:\...`
    if sep_at(0) && bytes.get(1) == Some(&b'?') && bytes.get(2) == Some(&b'?') && sep_at(3) {
        return CandidateSyntax::Verbatim;
    }

    match bytes {
        [letter, b':', ..] if letter.is_ascii_alphabetic() => {
            let drive = char::from(letter.to_ascii_uppercase());
            if sep_at(2) {
                CandidateSyntax::DriveAbsolute {
                    drive,
                    rest: &candidate[2..],
                }
            } else {
                CandidateSyntax::DriveRelative { drive }
            }
        },
        _ if sep_at(0) => CandidateSyntax::Rooted { rest: candidate },
        _ => CandidateSyntax::Relative { rest: candidate },
    }
}

/// Split a path body into segments on either separator.
///
/// Empty segments from doubled or trailing separators are dropped.
pub fn segments(rest: &str) -> impl Iterator<Item = &str> {
    rest.split(['/', '\\']).filter(|s| !s.is_empty())
}

const RESERVED_DEVICE_NAMES: &[&str] = &["CON", "PRN", "AUX", "NUL"];

/// Check a single name segment (never `.` or `..`).
///
/// With `windows_rules`, names that Win32 would silently rewrite or route to
/// a device are refused: alternate data streams, trailing dots and spaces,
/// wildcard and reserved characters, and device names like `NUL` or `COM1`.
///
/// # Errors
///
/// Returns a description of the problem if the segment is unusable.
pub fn check_segment(segment: &str, windows_rules: bool) -> Result<(), String> {
    if segment.contains('\0') {
        return Err("segment contains a NUL byte".to_owned());
    }
    if !windows_rules {
        return Ok(());
    }

    if segment.contains(':') {
        return Err(format!("'{segment}' names an alternate data stream or drive"));
    }
    if segment.ends_with('.') || segment.ends_with(' ') {
        return Err(format!("'{segment}' ends with a dot or space"));
    }
    if segment
        .chars()
        .any(|c| matches!(c, '<' | '>' | '"' | '|' | '?' | '*') || c.is_control())
    {
        return Err(format!("'{segment}' contains a reserved character"));
    }

    let stem = segment.split('.').next().unwrap_or(segment).trim_end();
    let upper = stem.to_ascii_uppercase();
    let numbered_device = (upper.starts_with("COM") || upper.starts_with("LPT"))
        && upper.len() == 4
        && upper.as_bytes().get(3).is_some_and(|b| (b'1'..=b'9').contains(b));
    if numbered_device || RESERVED_DEVICE_NAMES.contains(&upper.as_str()) {
        return Err(format!("'{segment}' is a reserved device name"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_namespace_prefixes() {
        assert_eq!(classify(r"\\?\C:\temp\file.txt"), CandidateSyntax::Verbatim);
        assert_eq!(classify(r"\\?\UNC\server\share"), CandidateSyntax::Verbatim);
        assert_eq!(classify(r"\\.\PhysicalDrive0"), CandidateSyntax::Verbatim);
        assert_eq!(classify("//?/C:/temp"), CandidateSyntax::Verbatim);
        assert_eq!(classify(r"\??\C:\temp"), CandidateSyntax::Verbatim);
    }

    #[test]
    fn test_classify_unc() {
        assert_eq!(classify(r"\\server\share\file.txt"), CandidateSyntax::Unc);
        assert_eq!(classify("//server/share/file.txt"), CandidateSyntax::Unc);
        assert_eq!(classify(r"\/server\share"), CandidateSyntax::Unc);
    }

    #[test]
    fn test_classify_drives() {
        assert_eq!(
            classify(r"Z:\tmp\file.txt"),
            CandidateSyntax::DriveAbsolute {
                drive: 'Z',
                rest: r"\tmp\file.txt"
            }
        );
        assert_eq!(
            classify("c:/Users"),
            CandidateSyntax::DriveAbsolute {
                drive: 'C',
                rest: "/Users"
            }
        );
        assert_eq!(
            classify("D:notes.txt"),
            CandidateSyntax::DriveRelative { drive: 'D' }
        );
        assert_eq!(classify("D:"), CandidateSyntax::DriveRelative { drive: 'D' });
    }

    #[test]
    fn test_classify_rooted_and_relative() {
        assert_eq!(
            classify("/etc/passwd"),
            CandidateSyntax::Rooted { rest: "/etc/passwd" }
        );
        assert_eq!(
            classify(r"\Windows"),
            CandidateSyntax::Rooted { rest: r"\Windows" }
        );
        assert_eq!(
            classify("dir/file.txt"),
            CandidateSyntax::Relative {
                rest: "dir/file.txt"
            }
        );
        // A colon later in the string is not a drive.
        assert!(!classify("notes:2024").is_absolute());
        assert!(!classify("1:/x").is_absolute());
    }

    #[test]
    fn test_segments_drop_empty() {
        let parts: Vec<_> = segments(r"dir//sub\\file.txt/").collect();
        assert_eq!(parts, vec!["dir", "sub", "file.txt"]);

        let parts: Vec<_> = segments(r"..\outside.txt").collect();
        assert_eq!(parts, vec!["..", "outside.txt"]);
    }

    #[test]
    fn test_check_segment_portable() {
        assert!(check_segment("notes:2024.txt", false).is_ok());
        assert!(check_segment("trailing.", false).is_ok());
        assert!(check_segment("bad\0name", false).is_err());
    }

    #[test]
    fn test_check_segment_windows_rules() {
        assert!(check_segment("file.txt", true).is_ok());
        assert!(check_segment("COM10", true).is_ok());
        assert!(check_segment("console.log", true).is_ok());

        assert!(check_segment("file.txt:secret", true).is_err());
        assert!(check_segment("file.txt.", true).is_err());
        assert!(check_segment("file.txt ", true).is_err());
        assert!(check_segment("...", true).is_err());
        assert!(check_segment("a*b", true).is_err());
        assert!(check_segment("NUL", true).is_err());
        assert!(check_segment("con.txt", true).is_err());
        assert!(check_segment("LPT1", true).is_err());
        assert!(check_segment("com3.log", true).is_err());
    }
}
