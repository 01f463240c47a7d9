use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

use crate::plan::Plan;

/// Maximum number of illustrative images kept in a snapshot.
pub const MAX_IMAGES: usize = 2;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// School stage of the child, used to pitch the plan's difficulty.
///
/// Serialized as `PRIMARY`, `MIDDLE` or `HIGH`. Snapshots written by the
/// first release stored the Arabic labels, which are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "PRIMARY", alias = "ابتدائي")]
    Primary,
    #[serde(rename = "MIDDLE", alias = "متوسط")]
    Middle,
    #[serde(rename = "HIGH", alias = "ثانوي")]
    High,
}

impl EducationLevel {
    /// Arabic label shown to families and sent in the plan prompt.
    pub const fn arabic_label(self) -> &'static str {
        match self {
            Self::Primary => "ابتدائي",
            Self::Middle => "متوسط",
            Self::High => "ثانوي",
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Primary => "PRIMARY",
            Self::Middle => "MIDDLE",
            Self::High => "HIGH",
        };
        f.write_str(s)
    }
}

impl FromStr for EducationLevel {
    type Err = EducationLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "primary" => return Ok(Self::Primary),
            "middle" => return Ok(Self::Middle),
            "high" => return Ok(Self::High),
            _ => {}
        }
        match trimmed {
            "ابتدائي" => Ok(Self::Primary),
            "متوسط" => Ok(Self::Middle),
            "ثانوي" => Ok(Self::High),
            other => Err(EducationLevelParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`EducationLevel`] string.
#[derive(Debug, Clone)]
pub struct EducationLevelParseError(pub String);

impl fmt::Display for EducationLevelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid education level: {:?} (expected primary, middle, or high)",
            self.0
        )
    }
}

impl std::error::Error for EducationLevelParseError {}

// ---------------------------------------------------------------------------

/// The four activity slots of every day, in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    QuranMorning,
    Language,
    QuranEvening,
    Fun,
}

impl TaskType {
    /// All task types in daily order.
    pub const ALL: [TaskType; 4] = [
        TaskType::QuranMorning,
        TaskType::Language,
        TaskType::QuranEvening,
        TaskType::Fun,
    ];

    /// Tag used when synthesizing task ids. Matches the field name of the
    /// slot in the generated day object.
    pub const fn id_tag(self) -> &'static str {
        match self {
            Self::QuranMorning => "morningTask",
            Self::Language => "afternoonTask",
            Self::QuranEvening => "eveningTask",
            Self::Fun => "funTask",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::QuranMorning => "quran_morning",
            Self::Language => "language",
            Self::QuranEvening => "quran_evening",
            Self::Fun => "fun",
        };
        f.write_str(s)
    }
}

impl FromStr for TaskType {
    type Err = TaskTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quran_morning" => Ok(Self::QuranMorning),
            "language" => Ok(Self::Language),
            "quran_evening" => Ok(Self::QuranEvening),
            "fun" => Ok(Self::Fun),
            other => Err(TaskTypeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`TaskType`] string.
#[derive(Debug, Clone)]
pub struct TaskTypeParseError(pub String);

impl fmt::Display for TaskTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid task type: {:?}", self.0)
    }
}

impl std::error::Error for TaskTypeParseError {}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Intake data about the child. Write-once: a plan is generated from it and
/// it is never edited afterwards.
///
/// Deserialization goes through [`Profile::new`]; a stored profile must
/// already be in normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProfileRecord")]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub level: EducationLevel,
    /// Target languages, trimmed and non-empty. May be empty.
    #[serde(default)]
    pub languages: Vec<String>,
}

/// Why a profile was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("age must be a positive number")]
    ZeroAge,

    #[error("stored profile is not normalized (untrimmed name or blank language)")]
    NotNormalized,
}

/// Unvalidated wire form of [`Profile`].
#[derive(Deserialize)]
struct ProfileRecord {
    name: String,
    age: u32,
    level: EducationLevel,
    #[serde(default)]
    languages: Vec<String>,
}

impl TryFrom<ProfileRecord> for Profile {
    type Error = ProfileError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        let profile = Profile::new(&record.name, record.age, record.level, &record.languages)?;
        if profile.name != record.name || profile.languages != record.languages {
            return Err(ProfileError::NotNormalized);
        }
        Ok(profile)
    }
}

impl Profile {
    /// Build a profile, normalizing the name and language list.
    pub fn new<I, S>(
        name: impl Into<String>,
        age: u32,
        level: EducationLevel,
        languages: I,
    ) -> Result<Self, ProfileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if age == 0 {
            return Err(ProfileError::ZeroAge);
        }
        let languages = languages
            .into_iter()
            .map(|l| l.as_ref().trim().to_owned())
            .filter(|l| !l.is_empty())
            .collect();
        Ok(Self {
            name,
            age,
            level,
            languages,
        })
    }
}

/// Split a comma-separated language list as typed into the onboarding form.
///
/// `"English, French,"` yields `["English", "French"]`.
pub fn parse_languages(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}

// ---------------------------------------------------------------------------
// Tasks and days
// ---------------------------------------------------------------------------

/// Deterministic, plan-wide unique id for the task of `task_type` on `day_number`.
pub fn task_id(day_number: u32, task_type: TaskType) -> String {
    format!("day-{day_number}-{}", task_type.id_tag())
}

/// One activity of a day. Only `is_completed` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(rename = "type")]
    pub task_type: TaskType,
}

impl Task {
    /// A fresh, not yet completed task with a synthesized id.
    pub fn new(
        day_number: u32,
        task_type: TaskType,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: task_id(day_number, task_type),
            title: title.into(),
            description: description.into(),
            is_completed: false,
            task_type,
        }
    }
}

/// The four tasks of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day_number: u32,
    pub tasks: Vec<Task>,
}

impl DayPlan {
    /// Look up a task of this day by id.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_completed).count()
    }

    /// `true` when every task of the day is completed.
    pub fn is_complete(&self) -> bool {
        self.tasks.iter().all(|t| t.is_completed)
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// An illustrative image carried inline as a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageRef(String);

/// Error returned when a string is not a base64 `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a base64 data URL: {0:.40}")]
pub struct ImageRefError(pub String);

impl ImageRef {
    /// Wrap an inline payload (already base64-encoded) and its MIME type.
    pub fn from_inline(mime_type: &str, base64_data: &str) -> Self {
        Self(format!("data:{mime_type};base64,{base64_data}"))
    }

    /// Encode raw image bytes.
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self::from_inline(mime_type, &STANDARD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type between `data:` and `;base64,`.
    pub fn mime_type(&self) -> &str {
        self.split().0
    }

    /// The base64 payload after `;base64,`.
    pub fn payload(&self) -> &str {
        self.split().1
    }

    /// Decode the payload into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.payload())
    }

    fn split(&self) -> (&str, &str) {
        // Construction guarantees both markers are present.
        let rest = self.0.strip_prefix("data:").unwrap_or(&self.0);
        rest.split_once(";base64,").unwrap_or((rest, ""))
    }
}

impl TryFrom<String> for ImageRef {
    type Error = ImageRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.strip_prefix("data:").and_then(|r| r.split_once(";base64,")) {
            Some((mime, _)) if !mime.is_empty() => Ok(Self(value)),
            _ => Err(ImageRefError(value)),
        }
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        value.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The complete persisted state of one installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub profile: Option<Profile>,
    pub plan: Plan,
    pub start_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_images")]
    pub generated_images: Vec<ImageRef>,
}

/// Reject image lists longer than [`MAX_IMAGES`].
fn deserialize_images<'de, D>(deserializer: D) -> Result<Vec<ImageRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let images = Vec::<ImageRef>::deserialize(deserializer)?;
    if images.len() > MAX_IMAGES {
        return Err(de::Error::invalid_length(
            images.len(),
            &"at most 2 generated images",
        ));
    }
    Ok(images)
}
