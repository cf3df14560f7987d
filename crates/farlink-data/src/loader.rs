//! Format detection and deserialization for configuration files.
//!
//! Files may be written in RON, TOML, or JSON; the format is chosen from the
//! file extension.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::schema::SchemaError;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The file parsed but holds a value the snapshot cannot represent.
    #[error("invalid value in {file}: {error}")]
    Invalid {
        file: PathBuf,
        #[source]
        error: SchemaError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, ConfigLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(ConfigLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Look for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`
/// in `dir`. Returns `Ok(None)` if none exists; more than one is an error.
pub fn find_config_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, ConfigLoadError> {
    let mut found: Option<PathBuf> = None;
    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if !candidate.exists() {
            continue;
        }
        if let Some(existing) = found {
            return Err(ConfigLoadError::ConflictingFormats {
                a: existing,
                b: candidate,
            });
        }
        found = Some(candidate);
    }
    Ok(found)
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given format. `path` is used for errors only.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    path: &Path,
) -> Result<T, ConfigLoadError> {
    let parse_error = |detail: String| ConfigLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        #[serde(default)]
        count: u32,
    }

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "farlink_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("a.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("a.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("a.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        let result = detect_format(Path::new("farlink.yaml"));
        assert!(matches!(
            result,
            Err(ConfigLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn detect_format_no_extension() {
        let result = detect_format(Path::new("farlink"));
        assert!(matches!(
            result,
            Err(ConfigLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn find_config_file_missing() {
        let dir = make_test_dir("find_missing");
        assert!(find_config_file(&dir, "farlink").unwrap().is_none());
        cleanup(&dir);
    }

    #[test]
    fn find_config_file_found() {
        let dir = make_test_dir("find_found");
        fs::write(dir.join("farlink.ron"), "()").unwrap();
        let found = find_config_file(&dir, "farlink").unwrap();
        assert_eq!(found, Some(dir.join("farlink.ron")));
        cleanup(&dir);
    }

    #[test]
    fn find_config_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("farlink.ron"), "()").unwrap();
        fs::write(dir.join("farlink.json"), "{}").unwrap();
        let result = find_config_file(&dir, "farlink");
        assert!(matches!(
            result,
            Err(ConfigLoadError::ConflictingFormats { .. })
        ));
        cleanup(&dir);
    }

    #[test]
    fn deserialize_each_format() {
        let path = Path::new("inline");
        let ron: Sample = deserialize_str(r#"(name: "a", count: 2)"#, Format::Ron, path).unwrap();
        let toml: Sample = deserialize_str("name = \"a\"\ncount = 2\n", Format::Toml, path).unwrap();
        let json: Sample = deserialize_str(r#"{"name":"a","count":2}"#, Format::Json, path).unwrap();
        assert_eq!(ron, toml);
        assert_eq!(toml, json);
    }

    #[test]
    fn parse_error_names_file() {
        let result: Result<Sample, _> =
            deserialize_str("{ not json", Format::Json, Path::new("broken.json"));
        match result {
            Err(ConfigLoadError::Parse { file, .. }) => {
                assert_eq!(file, PathBuf::from("broken.json"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn deserialize_file_reads_disk() {
        let dir = make_test_dir("read_disk");
        let path = dir.join("sample.toml");
        fs::write(&path, "name = \"disk\"\n").unwrap();

        let sample: Sample = deserialize_file(&path).unwrap();
        assert_eq!(
            sample,
            Sample {
                name: "disk".to_string(),
                count: 0
            }
        );

        cleanup(&dir);
    }

    #[test]
    fn deserialize_file_missing_is_io_error() {
        let dir = make_test_dir("missing");
        let result: Result<Sample, _> = deserialize_file(&dir.join("absent.json"));
        assert!(matches!(result, Err(ConfigLoadError::Io(_))));
        cleanup(&dir);
    }
}
