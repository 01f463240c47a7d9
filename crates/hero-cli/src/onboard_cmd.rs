//! `holiday-hero onboard` command: create the profile and generate the plan.

use std::sync::Arc;

use anyhow::{Result, bail};

use hero_core::generator::Generator;
use hero_core::onboarding::Onboarder;
use hero_core::store::Store;
use hero_db::models::{EducationLevel, Profile, parse_languages};

/// Onboarding form fields as given on the command line.
#[derive(Debug)]
pub struct OnboardArgs {
    pub name: String,
    pub age: u32,
    pub level: EducationLevel,
    pub languages: String,
}

/// Refuse to onboard over an existing plan.
pub fn check_not_onboarded(store: &Store) -> Result<()> {
    if let Some(name) = store
        .snapshot()
        .map(|s| s.profile.as_ref().map_or("", |p| p.name.as_str()))
    {
        bail!(
            "a plan already exists{}; run `holiday-hero reset --yes` first to start over",
            if name.is_empty() { String::new() } else { format!(" for {name}") }
        );
    }
    Ok(())
}

/// Run onboarding and return a printable summary.
pub async fn run_onboard(
    store: &mut Store,
    generator: Arc<dyn Generator>,
    args: OnboardArgs,
) -> Result<String> {
    check_not_onboarded(store)?;
    let profile = Profile::new(args.name, args.age, args.level, parse_languages(&args.languages))?;

    println!("Generating a plan for {}... this can take a minute.", profile.name);
    let onboarder = Onboarder::new(generator);
    let snapshot = onboarder.onboard(store, profile).await?;

    let name = snapshot.profile.as_ref().map_or("", |p| p.name.as_str());
    Ok(format!(
        "Plan ready for {name}: {} days, {} tasks, {} image(s).\nRun `holiday-hero day 1` to see today's tasks.",
        snapshot.plan.days().len(),
        snapshot.plan.total_tasks(),
        snapshot.generated_images.len(),
    ))
}
