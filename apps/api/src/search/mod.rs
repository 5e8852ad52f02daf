// Search API: form validation, the search workflow, and its HTTP handlers.
// All LLM calls go through llm_client; no direct Anthropic calls here.

pub mod form;
pub mod handlers;
pub mod service;

#[cfg(test)]
pub mod testing;
