//! Wire types for a generated plan.
//!
//! The model is asked for a JSON array of day objects, each with four named
//! activity slots. These types map that format directly and are turned into
//! [`hero_db::models::DayPlan`] values by [`super::parser`].

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use hero_db::models::TaskType;

/// One activity as produced by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTask {
    /// Short title of the task.
    pub title: String,
    /// Detailed instruction suited to the child's age.
    pub description: String,
}

/// One day as produced by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDay {
    pub day_number: u32,
    pub morning_task: RawTask,
    pub afternoon_task: RawTask,
    pub evening_task: RawTask,
    pub fun_task: RawTask,
}

impl RawDay {
    /// The slot feeding tasks of `task_type`.
    pub fn slot(&self, task_type: TaskType) -> &RawTask {
        match task_type {
            TaskType::QuranMorning => &self.morning_task,
            TaskType::Language => &self.afternoon_task,
            TaskType::QuranEvening => &self.evening_task,
            TaskType::Fun => &self.fun_task,
        }
    }
}

/// Response schema sent with the plan request so the model returns exactly
/// the [`RawDay`] array format.
pub fn plan_response_schema() -> Value {
    let task = json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING", "description": "Short title of the task" },
            "description": {
                "type": "STRING",
                "description": "Detailed instruction suitable for the age"
            }
        },
        "required": ["title", "description"]
    });

    let mut properties = serde_json::Map::new();
    properties.insert("dayNumber".to_string(), json!({ "type": "INTEGER" }));
    for t in TaskType::ALL {
        properties.insert(t.id_tag().to_string(), task.clone());
    }

    let mut required = vec![Value::from("dayNumber")];
    required.extend(TaskType::ALL.iter().map(|t| Value::from(t.id_tag())));

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": properties,
            "required": required
        }
    })
}
