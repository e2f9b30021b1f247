//! Output path validation
//!
//! Checks the configured output path before any rows arrive. The checks are
//! advisory: each finding is reported to the host as an error message, but
//! the tool keeps accepting records and will still try to write the file.
//!
//! All four checks run independently, so a single path can produce several
//! findings (a blank path only ever produces [`PathIssue::MissingFilename`]).

use std::fmt;
use std::path::Path;

/// Longest accepted path, in characters.
pub const MAX_PATH_LEN: usize = 259;

/// Characters not accepted anywhere in the path.
pub const DISALLOWED_CHARS: &str = "/;?*\"<>|";

/// A problem found with the output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathIssue {
    /// A file or directory already exists at the path.
    AlreadyExists(String),

    /// The path is longer than [`MAX_PATH_LEN`] characters.
    TooLong {
        /// Length of the offending path in characters.
        length: usize,
    },

    /// The path contains at least one of [`DISALLOWED_CHARS`].
    DisallowedCharacters,

    /// The path is empty or was never configured.
    MissingFilename,
}

impl fmt::Display for PathIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathIssue::AlreadyExists(path) => write!(
                f,
                "Error: {} already exists. Please enter a different path.",
                path
            ),
            PathIssue::TooLong { .. } => write!(f, "Maximum path length is {}", MAX_PATH_LEN),
            PathIssue::DisallowedCharacters => write!(
                f,
                "These characters are not allowed in the filename: {}",
                DISALLOWED_CHARS
            ),
            PathIssue::MissingFilename => write!(f, "Enter a filename"),
        }
    }
}

/// Returns true if `path` contains any disallowed character.
pub fn has_disallowed_chars(path: &str) -> bool {
    path.chars().any(|c| DISALLOWED_CHARS.contains(c))
}

/// Runs every path check and returns the findings in check order.
///
/// Order: already exists, too long, disallowed characters, missing filename.
pub fn validate_output_path(path: Option<&str>) -> Vec<PathIssue> {
    let mut issues = Vec::new();

    let path = match path {
        Some(path) if !path.is_empty() => path,
        _ => {
            issues.push(PathIssue::MissingFilename);
            return issues;
        }
    };

    if Path::new(path).exists() {
        issues.push(PathIssue::AlreadyExists(path.to_string()));
    }

    let length = path.chars().count();
    if length > MAX_PATH_LEN {
        issues.push(PathIssue::TooLong { length });
    }

    if has_disallowed_chars(path) {
        issues.push(PathIssue::DisallowedCharacters);
    }

    issues
}
