//! Model artifact loading
//!
//! The loader reads the artifact once, fingerprints it, decodes it into a
//! classifier and memoizes the resulting handle for the life of the process.
//! Failed loads are not cached and are never retried on their own.

use super::{ClassifierHandle, Classifier, LinearClassifier, OnnxClassifier};
use crate::error::ModelLoadError;
use once_cell::sync::OnceCell;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// On-disk encoding of a model artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    Json,
    Onnx,
}

impl ModelFormat {
    /// Pick a format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, ModelLoadError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(ModelFormat::Json),
            Some("onnx") => Ok(ModelFormat::Onnx),
            _ => Err(ModelLoadError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFormat::Json => "json",
            ModelFormat::Onnx => "onnx",
        }
    }
}

/// Metadata about the loaded artifact
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    /// Short form of the checksum, used as the model version
    pub version: String,
    pub checksum: String,
    pub format: ModelFormat,
    pub source: String,
    pub size_bytes: usize,
    pub supports_probability: bool,
    pub loaded_at: i64,
    #[serde(skip)]
    pub load_duration: Duration,
}

/// Where artifact bytes come from
pub trait ArtifactSource: Send + Sync {
    /// Human-readable location for logs
    fn describe(&self) -> String;

    fn format(&self) -> Result<ModelFormat, ModelLoadError>;

    fn read(&self) -> Result<Vec<u8>, ModelLoadError>;
}

/// Artifact stored in a local file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArtifactSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn format(&self) -> Result<ModelFormat, ModelLoadError> {
        ModelFormat::from_path(&self.path)
    }

    fn read(&self) -> Result<Vec<u8>, ModelLoadError> {
        if !self.path.exists() {
            return Err(ModelLoadError::NotFound(self.describe()));
        }
        std::fs::read(&self.path).map_err(|source| ModelLoadError::Unreadable {
            path: self.describe(),
            source,
        })
    }
}

/// Lazily loads and caches the classifier handle
pub struct ModelLoader {
    source: Box<dyn ArtifactSource>,
    expected_checksum: Option<String>,
    handle: OnceCell<ClassifierHandle>,
}

impl ModelLoader {
    pub fn new(source: impl ArtifactSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            expected_checksum: None,
            handle: OnceCell::new(),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSource::new(path))
    }

    /// Require the artifact's SHA256 to match before it is decoded
    pub fn with_expected_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.expected_checksum = Some(checksum.into());
        self
    }

    /// Load the classifier, reading the artifact only on the first success
    pub fn load(&self) -> Result<ClassifierHandle, ModelLoadError> {
        self.handle.get_or_try_init(|| self.load_uncached()).cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.get().is_some()
    }

    fn load_uncached(&self) -> Result<ClassifierHandle, ModelLoadError> {
        let start = Instant::now();
        let format = self.source.format()?;
        let bytes = self.source.read()?;
        let checksum = compute_checksum(&bytes);

        if let Some(expected) = &self.expected_checksum {
            if !expected.eq_ignore_ascii_case(&checksum) {
                return Err(ModelLoadError::ChecksumMismatch {
                    expected: expected.clone(),
                    actual: checksum,
                });
            }
            debug!(checksum = %checksum, "Model checksum validated");
        }

        let classifier = decode(format, &bytes)?;
        let load_duration = start.elapsed();

        let info = ModelInfo {
            version: checksum[..12].to_string(),
            checksum,
            format,
            source: self.source.describe(),
            size_bytes: bytes.len(),
            supports_probability: classifier.supports_probability(),
            loaded_at: chrono::Utc::now().timestamp(),
            load_duration,
        };

        info!(
            source = %info.source,
            format = info.format.as_str(),
            version = %info.version,
            size = info.size_bytes,
            supports_probability = info.supports_probability,
            elapsed_ms = load_duration.as_millis() as u64,
            "Model artifact loaded"
        );

        Ok(ClassifierHandle::new(classifier, info))
    }
}

/// Decode artifact bytes of a known format into a classifier
pub fn decode(format: ModelFormat, bytes: &[u8]) -> Result<Arc<dyn Classifier>, ModelLoadError> {
    match format {
        ModelFormat::Json => Ok(Arc::new(LinearClassifier::from_json(bytes)?)),
        ModelFormat::Onnx => Ok(Arc::new(OnnxClassifier::from_bytes(bytes)?)),
    }
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const MODEL_JSON: &str = r#"{
        "kind": "logistic_regression",
        "feature_names": ["age", "subscription_months", "complaint_count"],
        "coefficients": [-0.01, -0.05, 0.8],
        "intercept": -0.5
    }"#;

    /// In-memory source that counts how often it is read
    struct CountingSource {
        bytes: Vec<u8>,
        reads: Arc<AtomicUsize>,
    }

    impl ArtifactSource for CountingSource {
        fn describe(&self) -> String {
            "memory".to_string()
        }

        fn format(&self) -> Result<ModelFormat, ModelLoadError> {
            Ok(ModelFormat::Json)
        }

        fn read(&self) -> Result<Vec<u8>, ModelLoadError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.bytes.clone())
        }
    }

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum(b"model bytes");
        assert_eq!(checksum.len(), 64);
        assert_eq!(checksum, compute_checksum(b"model bytes"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ModelFormat::from_path(Path::new("m/churn.json")).unwrap(),
            ModelFormat::Json
        );
        assert_eq!(
            ModelFormat::from_path(Path::new("churn.ONNX")).unwrap(),
            ModelFormat::Onnx
        );
        assert!(matches!(
            ModelFormat::from_path(Path::new("model.pkl")),
            Err(ModelLoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_is_memoized() {
        let reads = Arc::new(AtomicUsize::new(0));
        let loader = ModelLoader::new(CountingSource {
            bytes: MODEL_JSON.as_bytes().to_vec(),
            reads: reads.clone(),
        });

        assert!(!loader.is_loaded());
        let first = loader.load().unwrap();
        let second = loader.load().unwrap();

        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert!(loader.is_loaded());
        assert_eq!(first.info().checksum, second.info().checksum);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let reads = Arc::new(AtomicUsize::new(0));
        let loader = ModelLoader::new(CountingSource {
            bytes: b"{ not json".to_vec(),
            reads: reads.clone(),
        });

        assert!(loader.load().is_err());
        assert!(loader.load().is_err());
        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert!(!loader.is_loaded());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ModelLoader::from_path(temp_dir.path().join("absent.json"));

        let err = loader.load().unwrap_err();
        assert!(matches!(err, ModelLoadError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("churn.json");
        std::fs::write(&path, MODEL_JSON).unwrap();

        let handle = ModelLoader::from_path(&path).load().unwrap();
        let info = handle.info();
        assert_eq!(info.format, ModelFormat::Json);
        assert_eq!(info.version.len(), 12);
        assert!(info.checksum.starts_with(&info.version));
        assert!(info.supports_probability);
        assert_eq!(handle.n_features(), 3);
    }

    #[test]
    fn test_checksum_enforced() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("churn.json");
        std::fs::write(&path, MODEL_JSON).unwrap();

        let err = ModelLoader::from_path(&path)
            .with_expected_checksum("00".repeat(32))
            .load()
            .unwrap_err();
        assert!(matches!(err, ModelLoadError::ChecksumMismatch { .. }));

        let good = compute_checksum(MODEL_JSON.as_bytes()).to_uppercase();
        assert!(ModelLoader::from_path(&path)
            .with_expected_checksum(good)
            .load()
            .is_ok());
    }

    #[test]
    fn test_load_onnx_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/churn_logistic.onnx");

        let handle = ModelLoader::from_path(&path).load().unwrap();
        assert_eq!(handle.info().format, ModelFormat::Onnx);
        assert!(handle.info().supports_probability);

        let label_only = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/churn_label_only.onnx");
        let handle = ModelLoader::from_path(&label_only).load().unwrap();
        assert!(!handle.info().supports_probability);
    }

    #[test]
    fn test_corrupt_onnx_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("churn.onnx");
        std::fs::write(&path, b"\x00\x01garbage").unwrap();

        assert!(ModelLoader::from_path(&path).load().is_err());
    }
}
