use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;

/// How a directory upload maps local paths to remote keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    /// Keep the source directory's own name as the first key segment
    /// (like `cp src dst`).
    WholeTree,
    /// Upload only the directory's contents (like `cp -r src/* dst`).
    ContentsOnly,
}

impl fmt::Display for UploadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadMode::WholeTree => write!(f, "whole tree"),
            UploadMode::ContentsOnly => write!(f, "contents only"),
        }
    }
}

/// Build the remote key for a single-file upload.
///
/// An empty destination or one ending in `/` is treated as a directory
/// prefix, so the file keeps its own name under it. Anything else is used
/// verbatim as the full key, i.e. the upload doubles as a rename.
pub fn single_file_key(file: &Path, dest: &str) -> Result<String> {
    let name = file
        .file_name()
        .with_context(|| format!("no file name in {}", file.display()))?
        .to_string_lossy();

    let key = if dest.is_empty() || dest.ends_with('/') {
        let prefix = dest.trim_end_matches('/');
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        }
    } else {
        dest.to_string()
    };

    Ok(normalize_key(&key))
}

/// Build the remote key for one file inside a directory upload.
///
/// The file's path relative to `root` (or to `root`'s parent in
/// [`UploadMode::WholeTree`], which keeps the root directory name as a key
/// segment) is appended to the destination prefix.
pub fn directory_key(file: &Path, root: &Path, dest: &str, mode: UploadMode) -> Result<String> {
    let rel = file
        .strip_prefix(root)
        .with_context(|| format!("{} is not under {}", file.display(), root.display()))?;

    let rel = match mode {
        UploadMode::ContentsOnly => rel.to_path_buf(),
        UploadMode::WholeTree => match root.file_name() {
            Some(name) => Path::new(name).join(rel),
            None => rel.to_path_buf(),
        },
    };

    let key = format!("{}/{}", dest.trim_end_matches('/'), rel.to_string_lossy());
    Ok(normalize_key(&key))
}

/// Remote keys always use forward slashes and are never absolute.
fn normalize_key(key: &str) -> String {
    key.replace('\\', "/").trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn single_file_into_directory_prefix() {
        let file = PathBuf::from("report.pdf");
        assert_eq!(single_file_key(&file, "/docs/").unwrap(), "docs/report.pdf");
        assert_eq!(single_file_key(&file, "docs/").unwrap(), "docs/report.pdf");
    }

    #[test]
    fn single_file_into_root() {
        let file = PathBuf::from("report.pdf");
        assert_eq!(single_file_key(&file, "/").unwrap(), "report.pdf");
        assert_eq!(single_file_key(&file, "").unwrap(), "report.pdf");
    }

    #[test]
    fn single_file_rename() {
        // A destination without a trailing slash is the full key.
        let file = PathBuf::from("report.pdf");
        assert_eq!(
            single_file_key(&file, "/docs/final.pdf").unwrap(),
            "docs/final.pdf"
        );
    }

    #[test]
    fn directory_contents_only() {
        let root = PathBuf::from("dist");
        let file = root.join("assets").join("app.js");
        assert_eq!(
            directory_key(&file, &root, "/site", UploadMode::ContentsOnly).unwrap(),
            "site/assets/app.js"
        );
    }

    #[test]
    fn directory_whole_tree_keeps_root_name() {
        let root = PathBuf::from("dist");
        let file = root.join("index.html");
        assert_eq!(
            directory_key(&file, &root, "/v1.0.0", UploadMode::WholeTree).unwrap(),
            "v1.0.0/dist/index.html"
        );
    }

    #[test]
    fn directory_into_bucket_root() {
        let root = PathBuf::from("dist");
        let file = root.join("index.html");
        assert_eq!(
            directory_key(&file, &root, "/", UploadMode::ContentsOnly).unwrap(),
            "index.html"
        );
        assert_eq!(
            directory_key(&file, &root, "/", UploadMode::WholeTree).unwrap(),
            "dist/index.html"
        );
    }

    #[test]
    fn backslashes_are_normalized() {
        let file = PathBuf::from(r"a\b.txt");
        assert_eq!(single_file_key(&file, "/").unwrap(), "a/b.txt");
    }

    #[test]
    fn keys_are_deterministic() {
        let root = PathBuf::from("dist");
        let file = root.join("a").join("b.css");
        let first = directory_key(&file, &root, "/site", UploadMode::WholeTree).unwrap();
        let second = directory_key(&file, &root, "/site", UploadMode::WholeTree).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn file_outside_root_is_rejected() {
        let root = PathBuf::from("dist");
        let file = PathBuf::from("elsewhere/x.txt");
        assert!(directory_key(&file, &root, "/", UploadMode::ContentsOnly).is_err());
    }
}
