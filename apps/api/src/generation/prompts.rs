// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for cover letters. Plain text out, no JSON.
pub const COVER_LETTER_SYSTEM: &str = "You are an experienced career coach who writes \
    specific, honest cover letters. \
    Respond with the letter text only: no subject line, no markdown, no commentary.";

/// Cover letter prompt template. Replace every `{placeholder}` before sending.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a cover letter for the {role} position at {company}.

TONE: {tone_guidance}

{grounding}

Open with a greeting, close with a sign-off and the candidate's name: {name}.
Weave in these keywords the profile already covers, where they fit naturally: {matched_keywords}

CANDIDATE PROFILE:
{profile}

JOB POSTING:
{job_text}"#;

/// Role half of the bullet rewrite system prompt; paired with `JSON_ONLY_SYSTEM`.
pub const BULLET_REWRITE_ROLE: &str = "You are a résumé editor who turns vague \
    experience bullets into concrete, outcome-focused ones.";

/// Bullet rewrite prompt template. Replace `{bullets}` and `{keywords}` before sending.
pub const BULLET_REWRITE_PROMPT_TEMPLATE: &str = r#"Rewrite each bullet below so it leads with a strong verb and states a measurable outcome.

Rules:
- Keep the facts of the original. Do NOT invent numbers: where a figure is needed, write a placeholder such as [N%] or [N users].
- One sentence per bullet, under 30 words.
- Use these job keywords only where the original supports them: {keywords}
- Keep the bullet's language (English stays English, Portuguese stays Portuguese).

Return a JSON array with this EXACT schema, one object per input bullet, in input order:
[
  {"original": "<the bullet exactly as given>", "rewrite": "<the improved bullet>"}
]

BULLETS:
{bullets}"#;
