use std::path::Path;

use crate::error::{Result, ToolError};

/// Number of whitespace-separated words in `text`
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Read a UTF-8 text file and count its words
pub fn count_words_in_file<P: AsRef<Path>>(path: P) -> Result<usize> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ToolError::InputMissing {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ToolError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(count_words(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_count_words_collapses_whitespace() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \n\t "), 0);
        assert_eq!(count_words("one"), 1);
        assert_eq!(count_words("  hello,\tworld \n\n again  "), 3);
    }

    #[test]
    fn test_count_words_in_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "The quick brown fox\njumps over the lazy dog.\n").unwrap();

        assert_eq!(count_words_in_file(&path).unwrap(), 9);
        assert!(count_words_in_file(dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_non_utf8_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();

        let err = count_words_in_file(&path).unwrap_err();
        assert!(matches!(err, crate::error::ComposerError::Tool(ToolError::Unreadable { .. })));
    }
}
