//! Validation utilities and regex patterns

use bikeshare_common::ColumnMapping;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #6499E9)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    // Colon is allowed for Windows drive letters (C:\)
    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}

/// Validate a log level name
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("invalid_log_level")),
    }
}

/// Validate a field delimiter: a single ASCII, non-alphanumeric, non-quote character
pub fn validate_delimiter(delimiter: char) -> Result<(), ValidationError> {
    if !delimiter.is_ascii() || delimiter.is_ascii_alphanumeric() || delimiter == '"' {
        return Err(ValidationError::new("invalid_delimiter"));
    }
    if delimiter == '\n' || delimiter == '\r' {
        return Err(ValidationError::new("invalid_delimiter"));
    }
    Ok(())
}

/// Validate that every role maps to a distinct, non-empty header
pub fn validate_column_mapping(mapping: &ColumnMapping) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for (_, column) in mapping.roles() {
        if column.trim().is_empty() {
            return Err(ValidationError::new("empty_column_name"));
        }
        if !seen.insert(column) {
            return Err(ValidationError::new("duplicate_column_name"));
        }
    }
    Ok(())
}
