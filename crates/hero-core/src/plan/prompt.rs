//! Prompt construction for plan generation. Pure string assembly.

use hero_db::models::Profile;
use hero_db::plan::PLAN_DAYS;

/// System instruction framing the model as a children's educator.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert Islamic educator and child development \
specialist. You design engaging, balanced daily plans for Muslim children.";

/// Assemble the user prompt describing the child and the required plan.
pub fn build_plan_prompt(profile: &Profile) -> String {
    let languages = if profile.languages.is_empty() {
        "none (suggest Arabic vocabulary games instead)".to_string()
    } else {
        profile.languages.join(", ")
    };

    let name = &profile.name;
    let age = profile.age;
    let level = profile.level.arabic_label();
    format!(
        "Create a {PLAN_DAYS}-day holiday plan for a student with this profile:\n\
         - Name: {name}\n\
         - Age: {age}\n\
         - Education level: {level}\n\
         - Target languages: {languages}\n\
         \n\
         All titles and descriptions MUST be written in Arabic.\n\
         \n\
         Number the days 1 to {PLAN_DAYS}. Each day has exactly four activities:\n\
         1. morningTask: Quran memorization, sized to the child's age and level \
         (short surahs for young children, whole pages for older ones).\n\
         2. afternoonTask: a playful language-learning activity (games, vocabulary, \
         conversation) in the target languages.\n\
         3. eveningTask: Quran reading (daily wird) followed by an Islamic or moral story.\n\
         4. funTask: a creative, physical, or family activity such as drawing, a puzzle, \
         a challenge, or a discussion.\n\
         \n\
         Keep the tone warm and encouraging for a {age} year old.\n"
    )
}
