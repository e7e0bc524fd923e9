//! File name sanitization.
//!
//! Every caller-supplied name passes through [`sanitize_name`] before it
//! touches the filesystem. Path separators are stripped down to the final
//! component; anything that could reach outside the storage root is
//! rejected outright rather than rewritten.

use thiserror::Error;

/// Maximum length for a stored file name (in bytes).
pub const MAX_NAME_LENGTH: usize = 255;

/// Reasons a file name is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Name is empty once separators are stripped.
    #[error("name is empty")]
    Empty,

    /// Name exceeds [`MAX_NAME_LENGTH`].
    #[error("name is too long")]
    TooLong,

    /// Name contains a `..` component.
    #[error("name contains a parent directory reference")]
    ParentReference,

    /// Name starts with `/`, `\` or a drive prefix such as `C:`.
    #[error("name is an absolute path")]
    AbsolutePath,

    /// Name contains a NUL byte.
    #[error("name contains a null byte")]
    NullByte,

    /// Name resolves to a location outside the storage root.
    #[error("name resolves outside the storage root")]
    OutsideRoot,
}

/// Sanitize a caller-supplied file name.
///
/// Both `/` and `\` count as separators so names produced by Windows
/// browsers are handled the same way. The returned name is a single path
/// component that is neither `.` nor `..`.
///
/// # Examples
///
/// ```
/// use locker::storage::{sanitize_name, NameError};
///
/// assert_eq!(sanitize_name("report.txt").unwrap(), "report.txt");
/// assert_eq!(sanitize_name("docs/report.txt").unwrap(), "report.txt");
/// assert_eq!(sanitize_name("../../etc/passwd"), Err(NameError::ParentReference));
/// ```
pub fn sanitize_name(raw: &str) -> Result<String, NameError> {
    if raw.contains('\0') {
        return Err(NameError::NullByte);
    }
    if is_absolute(raw) {
        return Err(NameError::AbsolutePath);
    }

    let components: Vec<&str> = raw.split(['/', '\\']).collect();
    if components.iter().any(|c| *c == "..") {
        return Err(NameError::ParentReference);
    }

    let name = components
        .into_iter()
        .rev()
        .find(|c| !c.is_empty() && *c != ".")
        .ok_or(NameError::Empty)?;

    if name.len() > MAX_NAME_LENGTH {
        return Err(NameError::TooLong);
    }

    Ok(name.to_string())
}

/// Check for absolute-path prefixes: a leading separator or a drive letter.
fn is_absolute(raw: &str) -> bool {
    if raw.starts_with('/') || raw.starts_with('\\') {
        return true;
    }
    let bytes = raw.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_pass_through() {
        assert_eq!(sanitize_name("report.txt").unwrap(), "report.txt");
        assert_eq!(sanitize_name("Report.TXT").unwrap(), "Report.TXT");
        assert_eq!(sanitize_name(".hidden").unwrap(), ".hidden");
        assert_eq!(sanitize_name("with spaces.pdf").unwrap(), "with spaces.pdf");
        assert_eq!(sanitize_name("日本語.txt").unwrap(), "日本語.txt");
        assert_eq!(sanitize_name("a..b").unwrap(), "a..b");
    }

    #[test]
    fn test_separators_are_stripped() {
        assert_eq!(sanitize_name("docs/report.txt").unwrap(), "report.txt");
        assert_eq!(sanitize_name("docs\\report.txt").unwrap(), "report.txt");
        assert_eq!(sanitize_name("a/b/c/d.bin").unwrap(), "d.bin");
        assert_eq!(sanitize_name("./report.txt").unwrap(), "report.txt");
        assert_eq!(sanitize_name("report.txt/").unwrap(), "report.txt");
    }

    #[test]
    fn test_parent_references_rejected() {
        assert_eq!(sanitize_name(".."), Err(NameError::ParentReference));
        assert_eq!(
            sanitize_name("../../etc/passwd"),
            Err(NameError::ParentReference)
        );
        assert_eq!(
            sanitize_name("docs/../secret"),
            Err(NameError::ParentReference)
        );
        assert_eq!(
            sanitize_name("..\\..\\boot.ini"),
            Err(NameError::ParentReference)
        );
    }

    #[test]
    fn test_absolute_paths_rejected() {
        assert_eq!(sanitize_name("/etc/passwd"), Err(NameError::AbsolutePath));
        assert_eq!(sanitize_name("\\windows\\x"), Err(NameError::AbsolutePath));
        assert_eq!(
            sanitize_name("C:\\Users\\me\\file.txt"),
            Err(NameError::AbsolutePath)
        );
        assert_eq!(sanitize_name("d:file.txt"), Err(NameError::AbsolutePath));
    }

    #[test]
    fn test_null_byte_rejected() {
        assert_eq!(sanitize_name("file\0.txt"), Err(NameError::NullByte));
        assert_eq!(sanitize_name("\0"), Err(NameError::NullByte));
    }

    #[test]
    fn test_empty_names_rejected() {
        assert_eq!(sanitize_name(""), Err(NameError::Empty));
        assert_eq!(sanitize_name("."), Err(NameError::Empty));
        assert_eq!(sanitize_name("docs/"), Ok("docs".to_string()));
        assert_eq!(sanitize_name("./."), Err(NameError::Empty));
    }

    #[test]
    fn test_too_long_rejected() {
        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert_eq!(sanitize_name(&long), Err(NameError::TooLong));
        let max = "a".repeat(MAX_NAME_LENGTH);
        assert_eq!(sanitize_name(&max).unwrap(), max);
    }
}
