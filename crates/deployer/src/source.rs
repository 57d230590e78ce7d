use {
    crate::Error,
    std::path::{Path, PathBuf},
};

/// Contract source code as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSource {
    pub path: PathBuf,
    pub text: String,
}

impl ContractSource {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| Error::Source {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(?path, bytes = text.len(), "loaded contract source");
        Ok(Self { path, text })
    }

    /// File name without extension, `Hotel` for `contracts/Hotel.sol`.
    pub fn stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|stem| stem.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_source_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Hotel.sol");
        std::fs::write(&path, "contract Hotel {}").unwrap();

        let source = ContractSource::load(&path).await.unwrap();
        assert_eq!(source.text, "contract Hotel {}");
        assert_eq!(source.stem(), Some("Hotel"));
    }

    #[tokio::test]
    async fn missing_file_is_a_source_error() {
        let err = ContractSource::load("does/not/exist.sol").await.unwrap_err();
        assert!(matches!(err, Error::Source { .. }));
    }
}
