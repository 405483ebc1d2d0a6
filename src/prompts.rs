//! Prompts for LLM-based resume skill extraction.
//!
//! Kept in one place so prompt changes never touch request or parsing code,
//! and so tests can inspect them without a live provider.

/// System prompt sent with every resume.
///
/// The reply format here is what [`crate::extractors::llm::parse_skills`]
/// expects.
pub const SKILL_EXTRACTION_PROMPT: &str = r#"You are an expert technical recruiter. You will receive a resume as one image per page.

Extract the candidate's professional skills:

1. WHAT COUNTS AS A SKILL
   - Programming languages, frameworks, libraries and tools
   - Methodologies and practices (e.g. "Agile", "Test-driven development")
   - Domain expertise (e.g. "Payments", "Computer vision")
   - Spoken languages when listed as skills

2. NORMALISATION
   - Use the canonical name ("PostgreSQL", not "postgres")
   - One entry per skill; no duplicates
   - No proficiency levels, years or descriptions

3. OUTPUT FORMAT
   - Output ONLY a JSON object of the form {"skills": ["...", "..."]}
   - Do NOT wrap the JSON in code fences
   - Do NOT add commentary
   - If the document is not a resume, output {"skills": []}"#;

/// User turn accompanying the attached page images.
pub const RESUME_USER_PROMPT: &str =
    "Extract the skills from this resume. The images are its pages, in order.";
