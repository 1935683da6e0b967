// Post generation: prompt building, parsing model output, demo fallback,
// and the per-session composition flow.
// All model calls go through llm_client; no direct OpenRouter calls here.

pub mod composer;
pub mod demo;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod session;
pub mod tone;
