//! LLM-backed skill extraction.
//!
//! The first pages of the PDF are rendered to PNGs (see [`super::pages`]) and
//! attached to a single user turn. The model replies with
//! `{"skills": [...]}`; the result message reports how many were found.
//!
//! Models sometimes wrap the JSON in a code fence despite the prompt; the
//! fence is stripped before parsing.

use super::pages::{encode_page, PageRasterizer, PdfiumRasterizer};
use crate::error::ExtractorError;
use crate::pipeline::extract::Extractor;
use crate::prompts::{RESUME_USER_PROMPT, SKILL_EXTRACTION_PROMPT};
use crate::types::{BinaryPayload, ExtractionResult};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::debug;

/// Max tokens the model may spend on the skills list.
const MAX_TOKENS: usize = 1024;

#[derive(Debug, Deserialize)]
struct SkillsReply {
    #[serde(default)]
    skills: Vec<String>,
}

/// Extracts resume skills with a vision-capable LLM provider.
pub struct LlmExtractor {
    provider: Arc<dyn LLMProvider>,
    rasterizer: Arc<dyn PageRasterizer>,
    timeout_secs: u64,
}

impl LlmExtractor {
    /// Pages are rendered with [`PdfiumRasterizer::from_env`].
    pub fn new(provider: Arc<dyn LLMProvider>, timeout_secs: u64) -> Self {
        Self {
            provider,
            rasterizer: Arc::new(PdfiumRasterizer::from_env()),
            timeout_secs,
        }
    }

    /// Replace the page renderer.
    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    async fn render_pages(&self, payload: &BinaryPayload) -> Result<Vec<ImageData>, ExtractorError> {
        let rasterizer = Arc::clone(&self.rasterizer);
        let pdf = payload.clone();
        let pages = tokio::task::spawn_blocking(move || rasterizer.rasterize(&pdf))
            .await
            .map_err(|e| ExtractorError::Render(format!("render task failed: {e}")))??;

        if pages.is_empty() {
            return Err(ExtractorError::Render("the document has no pages".to_string()));
        }
        pages.iter().map(encode_page).collect()
    }
}

#[async_trait]
impl Extractor for LlmExtractor {
    async fn extract(&self, payload: &BinaryPayload) -> Result<ExtractionResult, ExtractorError> {
        let start = Instant::now();
        let pages = self.render_pages(payload).await?;
        debug!("Rendered {} pages in {:?}", pages.len(), start.elapsed());

        let messages = vec![
            ChatMessage::system(SKILL_EXTRACTION_PROMPT),
            ChatMessage::user_with_images(RESUME_USER_PROMPT, pages),
        ];
        let options = CompletionOptions {
            temperature: Some(0.0),
            max_tokens: Some(MAX_TOKENS),
            ..Default::default()
        };

        let response = timeout(
            Duration::from_secs(self.timeout_secs),
            self.provider.chat(&messages, Some(&options)),
        )
        .await
        .map_err(|_| ExtractorError::Timeout {
            secs: self.timeout_secs,
        })?
        .map_err(|e| ExtractorError::Provider(format!("{}", e)))?;

        debug!(
            "Skill extraction: {} input tokens, {} output tokens, {:?}",
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        let skills = parse_skills(&response.content)?;
        debug!("Skills: {:?}", skills);

        if skills.is_empty() {
            return Ok(ExtractionResult::failure(
                "No skills could be found in the document",
            ));
        }
        Ok(ExtractionResult::success(skills_message(skills.len())))
    }
}

static RE_JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json)?\s*\n(.*?)\n?```$").unwrap());

/// Parse the model reply into a deduplicated, trimmed skill list.
pub fn parse_skills(reply: &str) -> Result<Vec<String>, ExtractorError> {
    let trimmed = reply.trim();
    let json = match RE_JSON_FENCE.captures(trimmed) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => trimmed,
    };

    let parsed: SkillsReply = serde_json::from_str(json)
        .map_err(|e| ExtractorError::InvalidResponse(format!("expected {{\"skills\": [...]}}: {e}")))?;

    let mut skills: Vec<String> = Vec::with_capacity(parsed.skills.len());
    for skill in parsed.skills {
        let skill = skill.trim();
        if skill.is_empty() || skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            continue;
        }
        skills.push(skill.to_string());
    }
    Ok(skills)
}

/// "Extracted 1 skill", "Extracted 5 skills".
pub fn skills_message(count: usize) -> String {
    if count == 1 {
        "Extracted 1 skill".to_string()
    } else {
        format!("Extracted {count} skills")
    }
}
