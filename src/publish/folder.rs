use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::DocumentPublisher;
use crate::error::PublishError;

const MAX_SLUG_CHARS: usize = 60;

/// Publishes reports as markdown files under `<root>/<folder name>/`.
///
/// File names carry a random suffix, so reports with the same title never
/// replace each other.
#[derive(Debug, Clone)]
pub struct FolderPublisher {
    root: PathBuf,
    folder_name: String,
}

impl FolderPublisher {
    pub fn new(root: impl Into<PathBuf>, folder_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            folder_name: folder_name.into(),
        }
    }

    /// Directory reports are written to
    pub fn reports_dir(&self) -> PathBuf {
        self.root.join(&self.folder_name)
    }
}

#[async_trait]
impl DocumentPublisher for FolderPublisher {
    async fn publish(&self, title: &str, markdown: &str) -> Result<Option<String>, PublishError> {
        if markdown.trim().is_empty() {
            return Err(PublishError::Rejected("report is empty".to_string()));
        }

        let dir = self.reports_dir();
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!(
            "{}-{}-{}.md",
            slugify(title),
            Utc::now().format("%Y%m%d-%H%M%S"),
            &Uuid::new_v4().simple().to_string()[..8]
        );
        let path = dir.join(file_name);
        tokio::fs::write(&path, markdown).await?;

        let link = file_link(&tokio::fs::canonicalize(&path).await?);
        info!("Published report to {}", link);
        Ok(Some(link))
    }
}

fn file_link(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Lowercase ASCII slug of `title`, words joined by `-`
fn slugify(title: &str) -> String {
    let mut slug = String::new();

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
        if slug.len() >= MAX_SLUG_CHARS {
            break;
        }
    }

    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "report".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("What is Quantum Tunnelling?"), "what-is-quantum-tunnelling");
        assert_eq!(slugify("  --  "), "report");
        assert_eq!(slugify("Émigré physics"), "migr-physics");
        assert!(slugify(&"a".repeat(200)).len() <= MAX_SLUG_CHARS);
    }

    #[tokio::test]
    async fn test_publish_writes_file_in_reports_folder() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = FolderPublisher::new(dir.path(), "Research-Agent Reports");

        let link = publisher
            .publish("Quantum Tunnelling", "# Quantum Tunnelling\n\nBody")
            .await
            .unwrap()
            .unwrap();

        assert!(link.starts_with("file://"));
        assert!(link.contains("Research-Agent Reports"));

        let entries: Vec<_> = std::fs::read_dir(publisher.reports_dir())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(entries.len(), 1);
        let written = std::fs::read_to_string(entries[0].path()).unwrap();
        assert_eq!(written, "# Quantum Tunnelling\n\nBody");
    }

    #[tokio::test]
    async fn test_same_title_twice_keeps_both_reports() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = FolderPublisher::new(dir.path(), "Reports");

        let first = publisher.publish("Same", "# Same\n\nfirst").await.unwrap().unwrap();
        let second = publisher.publish("Same", "# Same\n\nsecond").await.unwrap().unwrap();

        assert_ne!(first, second);

        let mut contents: Vec<String> = std::fs::read_dir(publisher.reports_dir())
            .unwrap()
            .map(|entry| std::fs::read_to_string(entry.unwrap().path()).unwrap())
            .collect();
        contents.sort();
        assert_eq!(contents, vec!["# Same\n\nfirst", "# Same\n\nsecond"]);
    }

    #[tokio::test]
    async fn test_publish_rejects_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = FolderPublisher::new(dir.path(), "Reports");
        let err = publisher.publish("t", "   ").await.unwrap_err();
        assert!(matches!(err, PublishError::Rejected(_)));
    }
}
