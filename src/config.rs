//! Configuration types for the intake pipeline.
//!
//! All intake behaviour is controlled through [`IntakeConfig`], built via its
//! [`IntakeConfigBuilder`]. One struct holds every knob so a session, the CLI
//! and tests all see the same defaults.

use crate::error::IntakeError;
use crate::pipeline::extract::Extractor;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Default upload limit: 10 MiB.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Configuration for an upload session.
///
/// Built via [`IntakeConfig::builder()`] or using [`IntakeConfig::default()`].
///
/// # Example
/// ```rust
/// use resume_intake::IntakeConfig;
///
/// let config = IntakeConfig::builder()
///     .max_size_bytes(5 * 1024 * 1024)
///     .verify_signature(true)
///     .endpoint("https://extract.example.com/resume")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct IntakeConfig {
    /// Largest accepted file, in bytes. Equal passes, one byte over fails.
    /// Default: 10 MiB.
    pub max_size_bytes: u64,

    /// Check the `%PDF` signature of the content after it is read. Default: false.
    ///
    /// Off by default: the declared MIME type is the contract. Enable it when
    /// callers cannot be trusted to label files correctly.
    pub verify_signature: bool,

    /// Pre-constructed extraction collaborator. Takes precedence over
    /// `endpoint` and `provider_name`.
    pub extractor: Option<Arc<dyn Extractor>>,

    /// HTTP endpoint of an extraction service.
    pub endpoint: Option<String>,

    /// LLM provider name (e.g. "openai", "gemini") for LLM extraction.
    pub provider_name: Option<String>,

    /// LLM model identifier. If None, uses `gpt-4.1-nano`.
    pub model: Option<String>,

    /// Timeout applied by the built-in collaborators, in seconds. Default: 60.
    pub extract_timeout_secs: u64,

    /// Receives session events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            verify_signature: false,
            extractor: None,
            endpoint: None,
            provider_name: None,
            model: None,
            extract_timeout_secs: 60,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for IntakeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntakeConfig")
            .field("max_size_bytes", &self.max_size_bytes)
            .field("verify_signature", &self.verify_signature)
            .field("extractor", &self.extractor.as_ref().map(|_| "<dyn Extractor>"))
            .field("endpoint", &self.endpoint)
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("extract_timeout_secs", &self.extract_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn IntakeProgressCallback>"),
            )
            .finish()
    }
}

impl IntakeConfig {
    /// Create a new builder for `IntakeConfig`.
    pub fn builder() -> IntakeConfigBuilder {
        IntakeConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`IntakeConfig`].
#[derive(Debug)]
pub struct IntakeConfigBuilder {
    config: IntakeConfig,
}

impl IntakeConfigBuilder {
    pub fn max_size_bytes(mut self, bytes: u64) -> Self {
        self.config.max_size_bytes = bytes;
        self
    }

    pub fn verify_signature(mut self, v: bool) -> Self {
        self.config.verify_signature = v;
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.config.extractor = Some(extractor);
        self
    }

    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = Some(url.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn extract_timeout_secs(mut self, secs: u64) -> Self {
        self.config.extract_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<IntakeConfig, IntakeError> {
        let c = &self.config;
        if c.max_size_bytes == 0 {
            return Err(IntakeError::InvalidConfig(
                "Size limit must be ≥ 1 byte".into(),
            ));
        }
        if c.extract_timeout_secs == 0 {
            return Err(IntakeError::InvalidConfig(
                "Extraction timeout must be ≥ 1s".into(),
            ));
        }
        if let Some(ref url) = c.endpoint {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(IntakeError::InvalidConfig(format!(
                    "Endpoint must be an HTTP/HTTPS URL, got '{}'",
                    url
                )));
            }
        }
        Ok(self.config)
    }
}
