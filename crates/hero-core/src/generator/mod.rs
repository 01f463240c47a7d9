//! Generation adapter interface for the AI service.
//!
//! This module defines the [`Generator`] trait that plan/image providers
//! implement, the Gemini-backed [`GeminiAdapter`], and the fixed
//! inspirational image prompts.
//!
//! # Architecture
//!
//! ```text
//! Onboarder
//!     |
//!     v
//! &dyn Generator
//!     |-- generate_plan(profile) ----> Plan (validated, 15 x 4 tasks)
//!     |-- generate_image(prompt) ----> Option<ImageRef>   (x2, concurrent)
//! ```

pub mod gemini;
pub mod images;
pub mod trait_def;
pub mod types;

pub use gemini::{GeminiAdapter, GeminiConfig};
pub use images::{INSPIRATION_PROMPTS, generate_inspirational_images};
pub use trait_def::Generator;
