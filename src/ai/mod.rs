//! AI recommendation client.
//!
//! The model boundary is the [`GenerativeModel`] trait: a request carries the
//! model id, a system instruction, the prompt and a response schema, and the
//! reply is the raw JSON text. [`Coach`] builds the prompts, applies the
//! rate-limit retry policy and validates what comes back.

mod coach;
mod gemini;
mod model;
mod retry;
#[cfg(test)]
pub(crate) mod testing;

pub use coach::{Coach, CoachError, DEFAULT_MODEL, MIN_MOVE_KCAL};
pub use gemini::{DEFAULT_BASE_URL, GeminiModel};
pub use model::{AiError, GenerativeModel, ModelRequest};
pub use retry::{RetryPolicy, with_rate_limit_retry};
