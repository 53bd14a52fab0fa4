//! Text and JSON rendering of action listings and run outcomes.

use serde_json::{json, Value};

use wipe_core::{ActionInfo, BatchReport};
use wipe_engine::ActionOutcome;

/// Render the action table: name, dependent flag, title.
pub fn render_action_list(actions: &[ActionInfo]) -> String {
    let width = actions
        .iter()
        .map(|a| a.name.len())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!("{:<width$}  {:<3}  {}", "NAME", "DEP", "TITLE")];
    for action in actions {
        let dep = if action.is_dependent { "yes" } else { "no" };
        lines.push(format!("{:<width$}  {:<3}  {}", action.name, dep, action.title));
    }
    lines.join("\n")
}

/// Render one action's report: a summary line and one line per failure.
pub fn render_report(name: &str, report: &BatchReport) -> String {
    let mut lines = vec![format!(
        "{}: {} removed, {} skipped, {} failed",
        name,
        report.removed(),
        report.skipped(),
        report.failed().len()
    )];
    for failure in report.failed() {
        match &failure.category {
            Some(category) => lines.push(format!(
                "  ! {} [{}] {}",
                failure.id, category, failure.message
            )),
            None => lines.push(format!("  ! {} {}", failure.id, failure.message)),
        }
    }
    lines.join("\n")
}

pub fn render_outcome(outcome: &ActionOutcome) -> String {
    match &outcome.result {
        Ok(report) => render_report(&outcome.name, report),
        Err(e) => format!("{}: error: {}", outcome.name, e),
    }
}

pub fn outcomes_to_json(outcomes: &[ActionOutcome]) -> Value {
    Value::Array(
        outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(report) => json!({ "name": outcome.name, "report": report }),
                Err(e) => json!({ "name": outcome.name, "error": e.to_string() }),
            })
            .collect(),
    )
}
