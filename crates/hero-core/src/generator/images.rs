//! Inspirational image generation.

use futures::future::join_all;
use tracing::{debug, warn};

use hero_db::models::{ImageRef, MAX_IMAGES};

use super::trait_def::Generator;

/// Fixed scene prompts. They do not depend on the profile.
pub const INSPIRATION_PROMPTS: [&str; MAX_IMAGES] = [
    "A bright and cheerful illustration of a clean study desk for a child with colorful books, \
     pencils, a small plant, and sunlight streaming through a window with Islamic geometric \
     patterns. No humans, no faces. 3D cartoon style, high quality, vibrant colors.",
    "A cozy evening scene with a glowing lantern, an open book, and a cup of tea on a wooden \
     table. Background of a dark blue starry sky through a window. Islamic art style. No humans, \
     no faces. Magical atmosphere.",
];

/// Request every inspiration image concurrently.
///
/// Failed or empty responses are logged and dropped, so the result holds
/// between zero and [`MAX_IMAGES`] images in prompt order.
pub async fn generate_inspirational_images(generator: &dyn Generator) -> Vec<ImageRef> {
    let results = join_all(INSPIRATION_PROMPTS.iter().map(|p| generator.generate_image(p))).await;

    results
        .into_iter()
        .enumerate()
        .filter_map(|(i, result)| match result {
            Ok(Some(image)) => Some(image),
            Ok(None) => {
                debug!(generator = generator.name(), prompt = i, "no image in response");
                None
            }
            Err(e) => {
                warn!(generator = generator.name(), prompt = i, error = %e, "image generation failed");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use hero_db::models::Profile;
    use hero_db::plan::Plan;

    use super::*;

    /// Answers image prompts from a queue, in call order.
    struct QueuedImages {
        answers: Mutex<Vec<Result<Option<ImageRef>>>>,
    }

    impl QueuedImages {
        fn new(mut answers: Vec<Result<Option<ImageRef>>>) -> Self {
            answers.reverse();
            Self {
                answers: Mutex::new(answers),
            }
        }
    }

    #[async_trait]
    impl Generator for QueuedImages {
        fn name(&self) -> &str {
            "queued"
        }

        async fn generate_plan(&self, _profile: &Profile) -> Result<Plan> {
            bail!("not used")
        }

        async fn generate_image(&self, _prompt: &str) -> Result<Option<ImageRef>> {
            self.answers
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| bail!("no more answers"))
        }
    }

    fn image(tag: &str) -> ImageRef {
        ImageRef::from_inline("image/png", tag)
    }

    #[test]
    fn prompts_avoid_people() {
        for prompt in INSPIRATION_PROMPTS {
            assert!(prompt.contains("No humans, no faces."));
        }
    }

    #[tokio::test]
    async fn keeps_every_successful_image() {
        let generator = QueuedImages::new(vec![Ok(Some(image("QQ=="))), Ok(Some(image("Qg==")))]);
        let images = generate_inspirational_images(&generator).await;
        assert_eq!(images.len(), 2);
    }

    #[tokio::test]
    async fn drops_failed_and_empty_answers() {
        let generator = QueuedImages::new(vec![Err(anyhow::anyhow!("quota")), Ok(Some(image("Qg==")))]);
        let images = generate_inspirational_images(&generator).await;
        assert_eq!(images, vec![image("Qg==")]);

        let generator = QueuedImages::new(vec![Ok(None), Err(anyhow::anyhow!("offline"))]);
        assert!(generate_inspirational_images(&generator).await.is_empty());
    }
}
