//! Generated-plan parser with validation.
//!
//! Parses the model's JSON text into a [`Plan`]:
//! - The text must be a JSON array of [`RawDay`] objects.
//! - Each day becomes four tasks in fixed order with synthesized ids
//!   (`day-{n}-{slot}`) and `is_completed = false`.
//! - The result must satisfy the plan shape rules (see [`hero_db::plan`]).
//!
//! Nothing partial is ever returned: any violation rejects the whole plan.

use thiserror::Error;

use hero_db::models::{DayPlan, Task, TaskType};
use hero_db::plan::{Plan, PlanShapeError};

use super::schema::RawDay;

/// Errors that can occur while turning a model response into a plan.
#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("response is not a valid day list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("generated plan has the wrong shape: {0}")]
    Shape(#[from] PlanShapeError),
}

/// Parse and validate a generated plan.
pub fn parse_plan_response(text: &str) -> Result<Plan, PlanParseError> {
    let text = strip_code_fence(text.trim());
    if text.is_empty() {
        return Err(PlanParseError::EmptyResponse);
    }
    let raw: Vec<RawDay> = serde_json::from_str(text)?;
    days_to_plan(raw)
}

/// Convert raw days into a validated plan.
pub fn days_to_plan(raw: Vec<RawDay>) -> Result<Plan, PlanParseError> {
    let days = raw.iter().map(to_day_plan).collect::<Vec<_>>();
    Ok(Plan::try_from(days)?)
}

fn to_day_plan(raw: &RawDay) -> DayPlan {
    let tasks = TaskType::ALL
        .iter()
        .map(|t| {
            let slot = raw.slot(*t);
            Task::new(raw.day_number, *t, slot.title.trim(), slot.description.trim())
        })
        .collect();
    DayPlan {
        day_number: raw.day_number,
        tasks,
    }
}

/// Models occasionally wrap JSON in a Markdown fence even when asked not to.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
