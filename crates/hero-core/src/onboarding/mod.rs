//! Onboarding: turn a submitted profile into a stored plan.
//!
//! The plan request and the inspiration image requests run concurrently and
//! are awaited jointly. A plan failure aborts the whole operation and leaves
//! the store untouched; image failures only mean fewer images. While a
//! generation is running a second submission is refused.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{error, info};

use hero_db::models::{AppData, ImageRef, Profile};
use hero_db::plan::Plan;

use crate::generator::{Generator, generate_inspirational_images};
use crate::store::Store;

/// Message shown to the user whenever plan generation fails.
pub const GENERATION_FAILED_MESSAGE: &str =
    "حدث خطأ أثناء إنشاء الخطة، تأكد من الاتصال بالإنترنت.";

#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("a plan is already being generated")]
    AlreadyGenerating,

    /// Carries the provider error for logs; the display text is the
    /// user-facing message.
    #[error("{}", GENERATION_FAILED_MESSAGE)]
    Generation(#[source] anyhow::Error),
}

/// Output of a successful generation, ready for [`Store::initialize`].
#[derive(Debug, Clone)]
pub struct Generated {
    pub plan: Plan,
    pub images: Vec<ImageRef>,
}

/// Runs plan generation with a double-submission guard.
pub struct Onboarder {
    generator: Arc<dyn Generator>,
    in_flight: AtomicBool,
}

impl std::fmt::Debug for Onboarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Onboarder")
            .field("generator", &self.generator.name())
            .field("in_flight", &self.is_generating())
            .finish()
    }
}

/// Clears the in-flight flag when generation ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Onboarder {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            in_flight: AtomicBool::new(false),
        }
    }

    /// `true` while a generation is running.
    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<InFlight<'_>, OnboardingError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(&self.in_flight))
            .map_err(|_| OnboardingError::AlreadyGenerating)
    }

    /// Generate a plan and inspiration images for `profile`.
    pub async fn generate(&self, profile: &Profile) -> Result<Generated, OnboardingError> {
        let _guard = self.acquire()?;
        let generator = self.generator.as_ref();
        info!(generator = generator.name(), name = %profile.name, "generating plan");

        let (plan, images) = tokio::join!(
            generator.generate_plan(profile),
            generate_inspirational_images(generator),
        );

        match plan {
            Ok(plan) => {
                info!(
                    days = plan.days().len(),
                    images = images.len(),
                    "plan generated"
                );
                Ok(Generated { plan, images })
            }
            Err(e) => {
                error!(generator = generator.name(), error = %format!("{e:#}"), "plan generation failed");
                Err(OnboardingError::Generation(e))
            }
        }
    }

    /// Generate for `profile` and, on success, initialize `store` with the
    /// result. On failure the store is left exactly as it was.
    pub async fn onboard<'s>(
        &self,
        store: &'s mut Store,
        profile: Profile,
    ) -> Result<&'s AppData, OnboardingError> {
        let Generated { plan, images } = self.generate(&profile).await?;
        Ok(store.initialize(profile, plan, images))
    }
}
