//! Suite file loading.
//!
//! A suite file is a YAML document:
//!
//! ```yaml
//! suite: 106 HTTP Methods
//! fixture:
//!   host: http://localhost:3000
//! tests:
//!   - label: Post with .verb
//!     path: /items
//!     verb: post
//!     send: {}
//!     status: 201
//!   - label: nested
//!     tests:
//!       - label: Put with .put property
//!         path: /items/1
//!         put: {}
//!         status: 204
//! ```

use std::path::{Path, PathBuf};

use assay_domain::{Descriptor, DomainError, Fixture};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading a suite file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid suite document.
    #[error("failed to parse {path}: {source}")]
    Yaml {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_yaml::Error,
    },

    /// An entry has no valid descriptor shape.
    #[error("invalid descriptor in {path}: {source}")]
    Descriptor {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: DomainError,
    },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSuiteFile {
    suite: String,
    #[serde(default)]
    fixture: Fixture,
    tests: Vec<serde_json::Value>,
}

/// A parsed suite file.
#[derive(Debug, Clone)]
pub struct SuiteFile {
    /// Top-level suite label.
    pub suite: String,
    /// Fixture shared by every case of the suite.
    pub fixture: Fixture,
    /// Descriptors, in file order.
    pub tests: Vec<Descriptor>,
}

impl SuiteFile {
    /// Parses a suite document. `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or an entry has no valid
    /// descriptor shape.
    pub fn parse(text: &str, path: &Path) -> Result<Self, LoadError> {
        let raw: RawSuiteFile = serde_yaml::from_str(text).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        let tests = raw
            .tests
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                Descriptor::from_value(entry).map_err(|source| match source {
                    DomainError::InvalidDescriptor(message) => DomainError::InvalidDescriptor(
                        format!("{} > #{index}: {message}", raw.suite),
                    ),
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| LoadError::Descriptor {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            suite: raw.suite,
            fixture: raw.fixture,
            tests,
        })
    }

    /// Reads and parses a suite file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, LoadError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&text, path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use assay_domain::HttpMethod;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const METHODS: &str = r"
suite: 106 HTTP Methods
fixture:
  host: http://localhost:3000
tests:
  - label: Post with .verb
    path: /items
    verb: post
    send: {}
    status: 201
  - label: nested
    tests:
      - label: Put with .put property
        path: /items/1
        put: {}
        status: 204
        expect:
          - Content-Type: { regex: json }
";

    #[test]
    fn test_parse_builds_descriptor_tree() {
        let file = SuiteFile::parse(METHODS, Path::new("methods.yaml")).unwrap();

        assert_eq!(file.suite, "106 HTTP Methods");
        assert_eq!(file.fixture.get_str("host"), Some("http://localhost:3000"));
        assert_eq!(file.tests.len(), 2);

        let Descriptor::Suite(nested) = &file.tests[1] else {
            panic!("expected a nested suite");
        };
        let Descriptor::Http(put) = &nested.tests[0] else {
            panic!("expected an HTTP case");
        };
        assert_eq!(put.resolve_verb().unwrap().0, HttpMethod::Put);
        assert_eq!(put.expect[0].field, "Content-Type");
        assert!(put.expect[0].matcher.matches("application/json"));
    }

    #[test]
    fn test_shapeless_entry_names_file_and_position() {
        let text = "suite: broken\ntests:\n  - label: lonely\n    status: 200\n";

        let error = SuiteFile::parse(text, Path::new("broken.yaml")).unwrap_err();

        let message = error.to_string();
        assert!(matches!(error, LoadError::Descriptor { .. }));
        assert!(message.contains("broken.yaml"), "{message}");
        assert!(message.contains("broken > #0"), "{message}");
    }

    #[test]
    fn test_unknown_http_field_is_rejected() {
        let text = "suite: typo\ntests:\n  - path: /\n    staus: 200\n";

        let error = SuiteFile::parse(text, Path::new("typo.yaml")).unwrap_err();

        assert!(error.to_string().contains("staus"), "{error}");
    }

    #[tokio::test]
    async fn test_load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(METHODS.as_bytes()).unwrap();

        let suite = SuiteFile::load(file.path()).await.unwrap();

        assert_eq!(suite.tests.len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let error = SuiteFile::load(&dir.path().join("absent.yaml"))
            .await
            .unwrap_err();

        assert!(matches!(error, LoadError::Io { .. }));
    }
}
