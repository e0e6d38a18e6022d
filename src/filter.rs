use std::path::Path;

/// What the scheduler should do with a local file before uploading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Never uploaded; reported as excluded.
    Exclude,
    /// Uploaded, but flagged to the operator first.
    Warn,
    /// Uploaded without comment.
    Include,
}

/// Classify a file by name: `.DS_Store` droppings are excluded outright,
/// other dotfiles are uploaded with a warning.
pub fn classify(path: &Path) -> Disposition {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(".DS_Store") => Disposition::Exclude,
        Some(name) if name.starts_with('.') => Disposition::Warn,
        _ => Disposition::Include,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn ds_store_is_excluded() {
        assert_eq!(
            classify(&PathBuf::from("some/dir/.DS_Store")),
            Disposition::Exclude
        );
    }

    #[test]
    fn dotfiles_warn() {
        assert_eq!(classify(&PathBuf::from(".env")), Disposition::Warn);
        assert_eq!(classify(&PathBuf::from("dir/.gitignore")), Disposition::Warn);
    }

    #[test]
    fn regular_files_are_included() {
        assert_eq!(classify(&PathBuf::from("index.html")), Disposition::Include);
        assert_eq!(
            classify(&PathBuf::from("assets/app.min.js")),
            Disposition::Include
        );
    }
}
