/// Result of validating a document filename.
#[derive(Debug)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Filename contains path traversal patterns (`..`).
    PathTraversal,
    /// Filename contains null bytes.
    NullByte,
    /// Filename starts with a dot (hidden file).
    Hidden,
    /// Filename contains control characters (CR, LF, etc.).
    ControlCharacter,
    /// Filename carries leading or trailing whitespace.
    Padded,
    /// Filename exceeds the maximum length.
    TooLong,
}

/// Longest accepted filename, matching the metadata column width.
pub const MAX_FILENAME_LENGTH: usize = 120;

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::ContainsPathSeparator => "Invalid filename: path separators are not allowed",
            Self::PathTraversal => "Invalid filename: '..' is not allowed",
            Self::NullByte => "Invalid filename: null bytes are not allowed",
            Self::Hidden => "Invalid filename: hidden files (starting with '.') are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
            Self::Padded => "Invalid filename: leading or trailing whitespace is not allowed",
            Self::TooLong => "Invalid filename: at most 120 characters are allowed",
        }
    }
}

/// Validates a flat document filename (no directory components allowed).
///
/// The name must already be in its canonical form; a name that would change
/// under trimming is rejected rather than silently normalized.
pub fn validate_filename(filename: &str) -> Result<(), FilenameError> {
    if filename.trim().is_empty() {
        return Err(FilenameError::Empty);
    }

    if filename != filename.trim() {
        return Err(FilenameError::Padded);
    }

    if filename.contains('\0') {
        return Err(FilenameError::NullByte);
    }

    // Reject ASCII control characters to prevent
    // HTTP header injection (e.g. CRLF in Content-Disposition).
    if filename.chars().any(|c| c.is_ascii_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    if filename.contains('/') || filename.contains('\\') {
        return Err(FilenameError::ContainsPathSeparator);
    }

    if filename == ".." {
        return Err(FilenameError::PathTraversal);
    }

    if filename.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    if filename.chars().count() > MAX_FILENAME_LENGTH {
        return Err(FilenameError::TooLong);
    }

    Ok(())
}
