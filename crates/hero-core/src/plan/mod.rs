//! Plan generation support: prompt construction, response schema, parsing.

pub mod parser;
pub mod prompt;
pub mod schema;

pub use parser::{PlanParseError, days_to_plan, parse_plan_response};
pub use prompt::{SYSTEM_INSTRUCTION, build_plan_prompt};
pub use schema::{RawDay, RawTask, plan_response_schema};
