//! File-backed library source for working without network access.
//!
//! Serves a saved SPARQL JSON response as if it were a live query result.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::convert::convert_response;
use super::error::SourceError;
use super::types::SparqlResponse;
use super::{LibrarySource, SourceLibrary};

/// Library source that reads a saved SPARQL response from disk.
///
/// The file is re-read on every fetch, so editing it and forcing a refresh
/// picks up the change.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    path: PathBuf,
}

impl FixtureSource {
    /// Create a source backed by the given JSON file.
    ///
    /// Fails early if the file does not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SourceError::Fixture {
                message: format!("fixture file not found: {}", path.display()),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LibrarySource for FixtureSource {
    async fn fetch_libraries(&self) -> Result<Vec<SourceLibrary>, SourceError> {
        let json =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| SourceError::Fixture {
                    message: format!("failed to read {}: {}", self.path.display(), e),
                })?;

        let response: SparqlResponse =
            serde_json::from_str(&json).map_err(|e| SourceError::Json {
                message: e.to_string(),
            })?;

        let libraries = convert_response(response)?;
        tracing::info!(
            count = libraries.len(),
            path = %self.path.display(),
            "loaded library candidates from fixture"
        );
        Ok(libraries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{"results": {"bindings": [
        {"itemLabel": {"value": "Leeds Central Library"}, "coord": {"value": "Point(-1.5485 53.8003)"}},
        {"itemLabel": {"value": "Old Library"}, "coord": {"value": "Point(-1.0 52.0)"},
         "endTime": {"value": "1999-01-01T00:00:00Z"}},
        {"itemLabel": {"value": "Unplaced Library"}}
    ]}}"#;

    #[test]
    fn missing_file_fails_early() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            FixtureSource::new(dir.path().join("nope.json")),
            Err(SourceError::Fixture { .. })
        ));
    }

    #[tokio::test]
    async fn loads_candidates_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("libraries.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let source = FixtureSource::new(&path).unwrap();
        assert_eq!(source.path(), path.as_path());

        let libraries = source.fetch_libraries().await.unwrap();
        assert_eq!(libraries.len(), 3);
        assert_eq!(libraries[0].name, "Leeds Central Library");
        assert_eq!(libraries[0].location.latitude(), 53.8003);
        assert!(libraries[1].time_bounded);
        assert!(libraries[2].location.is_unknown());
    }

    #[tokio::test]
    async fn invalid_json_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let source = FixtureSource::new(&path).unwrap();
        assert!(matches!(
            source.fetch_libraries().await,
            Err(SourceError::Json { .. })
        ));
    }
}
