//! `holiday-hero images` command: write the saved inspiration images to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use hero_core::store::Store;

/// File extension for an image MIME type.
fn extension(mime_type: &str) -> &str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/svg+xml" => "svg",
        other => other
            .strip_prefix("image/")
            .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin"),
    }
}

/// Decode every stored image into `out_dir` as `inspiration-N.<ext>` and
/// return the written paths.
pub fn export_images(store: &Store, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let Some(snapshot) = store.snapshot() else {
        bail!("no plan yet; run `holiday-hero onboard` first");
    };

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(snapshot.generated_images.len());
    for (i, image) in snapshot.generated_images.iter().enumerate() {
        let bytes = image
            .decode()
            .with_context(|| format!("image {} has a corrupt payload", i + 1))?;
        let path = out_dir.join(format!("inspiration-{}.{}", i + 1, extension(image.mime_type())));
        std::fs::write(&path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "image exported");
        written.push(path);
    }
    Ok(written)
}

/// Run the export and describe the result.
pub fn run_images(store: &Store, out_dir: &Path) -> Result<String> {
    let written = export_images(store, out_dir)?;
    if written.is_empty() {
        return Ok("No inspiration images were saved with this plan.".to_string());
    }
    let mut out = format!("Wrote {} image(s):", written.len());
    for path in &written {
        out.push_str(&format!("\n  {}", path.display()));
    }
    Ok(out)
}
