//! Holiday plan state and generation.
//!
//! - [`store`]: pure snapshot transitions and the session [`store::Store`].
//! - [`plan`]: prompt construction and parsing of generated plans.
//! - [`generator`]: the [`generator::Generator`] adapter interface and its Gemini implementation.
//! - [`onboarding`]: joint plan and image generation feeding the store.
//! - [`presentation`]: display metadata per task type.

pub mod generator;
pub mod onboarding;
pub mod plan;
pub mod presentation;
pub mod store;
