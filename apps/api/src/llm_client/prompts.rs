// Cross-cutting prompt fragments. Each feature keeps its own prompts next to it.

/// Keeps generated text tied to what the profile actually says.
pub const GROUNDING_INSTRUCTION: &str = "\
    Use only facts present in the candidate profile below. \
    Do NOT invent employers, titles, dates, degrees or metrics. \
    If the profile lacks something the job asks for, leave it out rather than claim it.";

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences.";
