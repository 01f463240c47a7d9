//! The `Generator` trait -- the adapter interface for generative AI providers.
//!
//! The trait is object-safe so it can be shared as `Arc<dyn Generator>`.

use anyhow::Result;
use async_trait::async_trait;

use hero_db::models::{ImageRef, Profile};
use hero_db::plan::Plan;

/// Adapter interface for producing plans and illustrative images.
///
/// Implementors wrap a specific provider and translate its responses into
/// validated domain values.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Human-readable name for this provider (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate a complete 15-day plan for `profile`.
    ///
    /// Any failure (transport, malformed response, wrong shape) is an error;
    /// a partial plan is never returned.
    async fn generate_plan(&self, profile: &Profile) -> Result<Plan>;

    /// Generate one image for `prompt`.
    ///
    /// `Ok(None)` means the provider answered without an image.
    async fn generate_image(&self, prompt: &str) -> Result<Option<ImageRef>>;
}

// Compile-time assertion: Generator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Generator) {}
};
