use tabled::settings::Style;
use tabled::{Table, Tabled};
use time::OffsetDateTime;
use time::macros::format_description;
use todolist_core::config::Palette;
use todolist_core::edit_session::EditSession;
use todolist_core::error::AppError;
use todolist_core::model::Task;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Expires on")]
    expires_at: String,
    #[tabled(rename = "Created at")]
    created_at: String,
}

pub fn format_created_at(created_at: &OffsetDateTime) -> Result<String, AppError> {
    created_at
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

impl TaskRow {
    fn new(task: &Task, palette: &Palette) -> Result<Self, AppError> {
        let id = task.id.to_string();
        let cell = |value: &str| {
            if task.completed {
                palette.mutedize(value)
            } else {
                value.to_string()
            }
        };

        Ok(Self {
            id: if task.completed {
                palette.mutedize(&id)
            } else {
                palette.accentize(&id)
            },
            status: cell(task.status().label()),
            text: cell(&task.text),
            title: cell(task.title.as_deref().unwrap_or("-")),
            expires_at: cell(task.expires_at.as_deref().unwrap_or("-")),
            created_at: cell(&format_created_at(&task.created_at)?),
        })
    }
}

/// Table of every task in order. Ids are accented, completed rows muted.
pub fn task_table(tasks: &[Task], palette: &Palette) -> Result<String, AppError> {
    if tasks.is_empty() {
        return Ok("No tasks.".to_string());
    }

    let rows = tasks
        .iter()
        .map(|task| TaskRow::new(task, palette))
        .collect::<Result<Vec<_>, _>>()?;

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    Ok(table.to_string())
}

/// Multi-line view of one task. Completed tasks are muted.
pub fn task_detail(task: &Task, palette: &Palette) -> Result<String, AppError> {
    let heading = palette.accentize(&format!("#{}", task.id));
    let mut lines = vec![format!("{heading} {}", task.text)];
    if let Some(title) = task.title.as_deref() {
        lines.push(format!("Title: {title}"));
    }
    if let Some(expires_at) = task.expires_at.as_deref() {
        lines.push(format!("Expires on: {expires_at}"));
    }
    lines.push(format!("Created at: {}", format_created_at(&task.created_at)?));
    lines.push(format!("Status: {}", task.status().label()));

    let rendered = lines.join("\n");
    if task.completed {
        Ok(palette.mutedize(&rendered))
    } else {
        Ok(rendered)
    }
}

pub fn draft_detail(edit: &EditSession) -> String {
    let draft = edit.draft();
    format!(
        "Editing task {}\n  text: {}\n  title: {}\n  expires-at: {}",
        edit.target(),
        draft.text,
        draft.title,
        draft.expires_at
    )
}

/// The serialized task plus its derived `status`.
pub fn task_json(task: &Task) -> Result<serde_json::Value, AppError> {
    let mut value = serde_json::to_value(task).map_err(json_error)?;
    let status = serde_json::to_value(task.status()).map_err(json_error)?;
    if let Some(object) = value.as_object_mut() {
        object.insert("status".to_string(), status);
    }
    Ok(value)
}

fn json_error(err: serde_json::Error) -> AppError {
    AppError::invalid_data(err.to_string())
}

pub fn tasks_json(tasks: &[Task]) -> Result<serde_json::Value, AppError> {
    let mut payload = Vec::with_capacity(tasks.len());
    for task in tasks {
        payload.push(task_json(task)?);
    }
    Ok(serde_json::Value::Array(payload))
}

pub fn draft_json(edit: &EditSession) -> serde_json::Value {
    serde_json::json!({
        "id": edit.target(),
        "draft": edit.draft(),
    })
}

#[cfg(test)]
mod tests {
    use super::{draft_detail, draft_json, task_detail, task_json, task_table, tasks_json};
    use time::macros::datetime;
    use todolist_core::config::palette_for_theme;
    use todolist_core::model::{Task, TaskId};
    use todolist_core::session::Session;

    fn sample(completed: bool) -> Task {
        Task {
            id: TaskId::new(2),
            text: "Buy milk".to_string(),
            title: Some("Groceries".to_string()),
            expires_at: None,
            completed,
            created_at: datetime!(2025-12-20 9:30:05 UTC),
        }
    }

    #[test]
    fn task_table_reports_empty_list() {
        assert_eq!(task_table(&[], &palette_for_theme(None)).unwrap(), "No tasks.");
    }

    #[test]
    fn task_table_lists_every_column() {
        let rendered = task_table(&[sample(false)], &palette_for_theme(None)).unwrap();

        assert!(rendered.contains("Buy milk"));
        assert!(rendered.contains("Groceries"));
        assert!(rendered.contains("pending"));
        assert!(rendered.contains("2025-12-20 09:30:05"));
        assert!(rendered.contains("Expires on"));
    }

    #[test]
    fn task_table_mutes_completed_rows_only() {
        let palette = palette_for_theme(Some("noir"));
        let mut pending = sample(false);
        pending.id = TaskId::new(3);
        pending.text = "Call bank".to_string();

        let rendered = task_table(&[sample(true), pending], &palette).unwrap();

        let completed_row = rendered.lines().find(|line| line.contains("Buy milk")).unwrap();
        let pending_row = rendered.lines().find(|line| line.contains("Call bank")).unwrap();
        assert!(completed_row.contains(palette.muted));
        assert!(!pending_row.contains(palette.muted));
        assert!(pending_row.contains(&palette.accentize("3")));
    }

    #[test]
    fn task_table_is_plain_without_theme() {
        let rendered = task_table(&[sample(true)], &palette_for_theme(None)).unwrap();
        assert!(!rendered.contains('\x1b'));
    }

    #[test]
    fn task_detail_hides_absent_fields() {
        let palette = palette_for_theme(None);
        let rendered = task_detail(&sample(false), &palette).unwrap();

        assert!(rendered.starts_with("#2 Buy milk"));
        assert!(rendered.contains("Title: Groceries"));
        assert!(!rendered.contains("Expires on"));
        assert!(rendered.contains("Created at: 2025-12-20 09:30:05"));
    }

    #[test]
    fn task_detail_mutes_completed_tasks() {
        let palette = palette_for_theme(Some("noir"));
        let rendered = task_detail(&sample(true), &palette).unwrap();

        assert!(rendered.starts_with(palette.muted));
        assert!(rendered.contains("Status: completed"));
    }

    #[test]
    fn task_json_uses_rfc3339_and_status() {
        let value = task_json(&sample(true)).unwrap();

        assert_eq!(value["id"], 2);
        assert_eq!(value["status"], "completed");
        assert_eq!(value["created_at"], "2025-12-20T09:30:05Z");
        assert_eq!(value["completed"], true);
        assert_eq!(value["title"], "Groceries");
        assert!(value["expires_at"].is_null());

        let list = tasks_json(&[sample(false), sample(true)]).unwrap();
        assert_eq!(list.as_array().unwrap().len(), 2);
    }

    #[test]
    fn draft_views_show_target_and_fields() {
        let mut session = Session::new();
        let task = session.add_task("Buy milk", Some("Groceries"), None).unwrap();
        let edit = session.open_edit(task.id).unwrap();

        let rendered = draft_detail(edit);
        assert!(rendered.starts_with("Editing task 1"));
        assert!(rendered.contains("title: Groceries"));

        let value = draft_json(edit);
        assert_eq!(value["id"], 1);
        assert_eq!(value["draft"]["text"], "Buy milk");
    }
}
