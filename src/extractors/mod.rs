//! Built-in extraction collaborators and their resolution from config.
//!
//! * [`http::HttpExtractor`] — POST the PDF to an extraction service.
//! * [`llm::LlmExtractor`]   — ask a vision-capable LLM for the resume's skills,
//!   from pages rendered by [`pages::PdfiumRasterizer`].

pub mod http;
pub mod llm;
pub mod pages;

use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::pipeline::extract::Extractor;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::debug;

/// Model used when a provider is named without one.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Resolve the extraction collaborator, from most-specific to least-specific.
///
/// 1. **Pre-built extractor** (`config.extractor`) — used as-is.
/// 2. **HTTP endpoint** (`config.endpoint`) — [`http::HttpExtractor`].
/// 3. **Named provider + model** (`config.provider_name`) — [`llm::LlmExtractor`]
///    over [`ProviderFactory::create_llm_provider`].
/// 4. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`).
/// 5. **`OPENAI_API_KEY`** — OpenAI with the configured or default model.
/// 6. **Full auto-detection** (`ProviderFactory::from_env`).
pub fn resolve_extractor(config: &IntakeConfig) -> Result<Arc<dyn Extractor>, IntakeError> {
    if let Some(ref extractor) = config.extractor {
        return Ok(Arc::clone(extractor));
    }

    if let Some(ref endpoint) = config.endpoint {
        debug!("Using HTTP extractor at {}", endpoint);
        let extractor = http::HttpExtractor::new(endpoint, config.extract_timeout_secs)?;
        return Ok(Arc::new(extractor));
    }

    let provider = resolve_provider(config)?;
    Ok(Arc::new(llm::LlmExtractor::new(
        provider,
        config.extract_timeout_secs,
    )))
}

fn resolve_provider(config: &IntakeConfig) -> Result<Arc<dyn LLMProvider>, IntakeError> {
    let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);

    if let Some(ref name) = config.provider_name {
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            return create_provider("openai", model);
        }
    }

    let (llm_provider, _) =
        ProviderFactory::from_env().map_err(|e| IntakeError::ExtractorNotConfigured {
            extractor: "auto".to_string(),
            hint: format!(
                "No extraction endpoint given and no LLM provider auto-detected: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, IntakeError> {
    debug!("Using LLM extractor: {} / {}", provider_name, model);
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        IntakeError::ExtractorNotConfigured {
            extractor: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}
