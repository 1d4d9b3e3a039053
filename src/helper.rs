use std::{fs, io, path::Path};

use log::{debug, error, trace};

use crate::{Idea, IdeaError, Result};

/// Helper method to load a single idea from file
pub fn load_idea_from_file(path: &Path) -> Result<Idea> {
    trace!("Loading idea from file: {}", path.display());
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => {
            IdeaError::format(format!("{}: file is not valid UTF-8", path.display()))
        }
        io::ErrorKind::NotFound => {
            debug!("Idea file not found: {}", path.display());
            IdeaError::storage(path, e)
        }
        _ => {
            error!("Failed to open idea file {}: {}", path.display(), e);
            IdeaError::storage(path, e)
        }
    })?;

    let idea = Idea::parse(&text).map_err(|e| with_path_context(e, path))?;
    trace!("Successfully loaded idea: {}", idea.id);
    Ok(idea)
}

/// Rejects an idea whose metadata `id` differs from the id in its file name.
pub fn ensure_declared_id(idea: Idea, file_id: u64, path: &Path) -> Result<Idea> {
    if idea.id != file_id {
        return Err(IdeaError::format(format!(
            "{}: file name declares id {}, metadata declares {}",
            path.display(),
            file_id,
            idea.id
        )));
    }
    Ok(idea)
}

/// Prefixes a format error with the file it came from.
pub fn with_path_context(err: IdeaError, path: &Path) -> IdeaError {
    match err {
        IdeaError::Format { message } => IdeaError::Format {
            message: format!("{}: {}", path.display(), message),
        },
        other => other,
    }
}

// Helper method for parsing tags
pub fn parse_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// First non-empty line of `content`, cut to `max_chars` characters.
pub fn content_preview(content: &str, max_chars: usize) -> String {
    let first_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("")
        .trim();

    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags(Some(" rust, ideas ,,rust ".to_string())),
            vec!["rust", "ideas", "rust"]
        );
        assert!(parse_tags(Some(" , ".to_string())).is_empty());
        assert!(parse_tags(None).is_empty());
    }

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("\n\n  first line\nsecond", 100), "first line");
        assert_eq!(content_preview("", 10), "");
        assert_eq!(content_preview("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_load_idea_from_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("idea1.md");
        fs::write(&path, "---\ntitle: t\n---\n").unwrap();

        let err = load_idea_from_file(&path).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("idea1.md"));

        let missing = load_idea_from_file(&temp.path().join("idea2.md")).unwrap_err();
        assert!(missing.is_storage());
    }

    #[test]
    fn test_invalid_utf8_is_format_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("idea1.md");
        fs::write(&path, b"---\nid: 1\ntitle: \xff\nmodified: 1\n---\n").unwrap();

        let err = load_idea_from_file(&path).unwrap_err();
        assert!(err.is_format());
        assert!(!err.is_storage());
        assert!(err.to_string().contains("idea1.md"));
    }

    #[test]
    fn test_ensure_declared_id() {
        let path = Path::new("idea2.md");
        let idea = Idea::new(1, "t", Vec::new(), "");

        let err = ensure_declared_id(idea.clone(), 2, path).unwrap_err();
        assert!(err.is_format());
        assert!(err
            .to_string()
            .contains("file name declares id 2, metadata declares 1"));
        assert_eq!(ensure_declared_id(idea.clone(), 1, path).unwrap(), idea);
    }
}
