//! Filesystem data catalog.
//!
//! Loads the read-only data documents that drive the scripted side of the
//! assistant:
//!
//! - `{data_dir}/corpus.json` -- opaque grounding corpus (fatal at startup)
//! - `{data_dir}/menu.json`   -- the menu catalog (fatal at startup)
//! - `{data_dir}/faq/{category}.json` -- per-category FAQ documents, loaded
//!   lazily; a single category failing is recovered by the engine as an
//!   in-chat message.

use std::path::{Path, PathBuf};

use parley_core::faq::FaqSource;
use parley_types::error::DataError;
use parley_types::faq::FaqEntry;
use parley_types::menu::MenuCatalog;

/// Filesystem-backed catalog rooted at the data directory.
pub struct FsCatalog {
    data_dir: PathBuf,
}

impl FsCatalog {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load the grounding corpus. Arbitrary JSON shape, treated as opaque.
    pub async fn load_corpus(&self) -> Result<serde_json::Value, DataError> {
        read_json(&self.data_dir.join("corpus.json"), "corpus.json").await
    }

    /// Load the menu catalog.
    pub async fn load_menu(&self) -> Result<MenuCatalog, DataError> {
        let value = read_json(&self.data_dir.join("menu.json"), "menu.json").await?;
        serde_json::from_value(value).map_err(|e| DataError::Malformed {
            name: "menu.json".to_string(),
            message: e.to_string(),
        })
    }
}

impl FaqSource for FsCatalog {
    async fn entries(&self, category: &str) -> Result<Vec<FaqEntry>, DataError> {
        // Category ids come from menu keys, but the path is still built from
        // client-influenced input; refuse anything that isn't a plain name.
        if category.is_empty()
            || !category
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DataError::Missing(format!("faq/{category}.json")));
        }

        let name = format!("faq/{category}.json");
        let value = read_json(&self.data_dir.join("faq").join(format!("{category}.json")), &name)
            .await?;
        serde_json::from_value(value).map_err(|e| DataError::Malformed {
            name,
            message: e.to_string(),
        })
    }
}

async fn read_json(path: &Path, name: &str) -> Result<serde_json::Value, DataError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(DataError::Missing(name.to_string()));
        }
        Err(err) => {
            return Err(DataError::Malformed {
                name: name.to_string(),
                message: err.to_string(),
            });
        }
    };

    serde_json::from_str(&content).map_err(|e| DataError::Malformed {
        name: name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn seed(tmp: &TempDir) {
        tokio::fs::write(
            tmp.path().join("corpus.json"),
            r#"{ "services": [{ "name": "web" }] }"#,
        )
        .await
        .unwrap();
        tokio::fs::write(
            tmp.path().join("menu.json"),
            r#"{ "menu": { "greeting": { "message": "Hi!", "options": {
                "general_faqs": { "message": "Questions:" }
            } } } }"#,
        )
        .await
        .unwrap();
        tokio::fs::create_dir_all(tmp.path().join("faq")).await.unwrap();
        tokio::fs::write(
            tmp.path().join("faq/general_faqs.json"),
            r#"[ { "question": "Q1", "answer": "A1" } ]"#,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn loads_corpus_and_menu() {
        let tmp = TempDir::new().unwrap();
        seed(&tmp).await;
        let catalog = FsCatalog::new(tmp.path());

        let corpus = catalog.load_corpus().await.unwrap();
        assert!(corpus["services"].is_array());

        let menu = catalog.load_menu().await.unwrap();
        assert_eq!(menu.menu.greeting.message, "Hi!");
    }

    #[tokio::test]
    async fn missing_corpus_is_a_missing_error() {
        let tmp = TempDir::new().unwrap();
        let catalog = FsCatalog::new(tmp.path());
        let err = catalog.load_corpus().await.unwrap_err();
        assert!(matches!(err, DataError::Missing(_)));
    }

    #[tokio::test]
    async fn malformed_menu_is_a_malformed_error() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("menu.json"), "{ not json")
            .await
            .unwrap();
        let catalog = FsCatalog::new(tmp.path());
        let err = catalog.load_menu().await.unwrap_err();
        assert!(matches!(err, DataError::Malformed { .. }));
    }

    #[tokio::test]
    async fn faq_entries_load_per_category() {
        let tmp = TempDir::new().unwrap();
        seed(&tmp).await;
        let catalog = FsCatalog::new(tmp.path());

        let entries = catalog.entries("general_faqs").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question, "Q1");

        assert!(matches!(
            catalog.entries("no_such_category").await.unwrap_err(),
            DataError::Missing(_)
        ));
    }

    #[tokio::test]
    async fn malformed_faq_category_is_recoverable_error() {
        let tmp = TempDir::new().unwrap();
        seed(&tmp).await;
        tokio::fs::write(tmp.path().join("faq/broken.json"), r#"{ "not": "an array" }"#)
            .await
            .unwrap();
        let catalog = FsCatalog::new(tmp.path());
        assert!(matches!(
            catalog.entries("broken").await.unwrap_err(),
            DataError::Malformed { .. }
        ));
    }

    #[tokio::test]
    async fn path_traversal_category_is_rejected() {
        let tmp = TempDir::new().unwrap();
        seed(&tmp).await;
        let catalog = FsCatalog::new(tmp.path());
        assert!(matches!(
            catalog.entries("../corpus").await.unwrap_err(),
            DataError::Missing(_)
        ));
    }
}
