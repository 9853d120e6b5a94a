//! Analysis API: orchestration, persistence, history listing and HTTP handlers.
//! External calls (NLP skill matcher, GitHub) are reached only through the pipeline.

pub mod handlers;
pub mod history;
pub mod pipeline;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
