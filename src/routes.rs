use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::dates::{normalize_due_date, parse_due_date};
use crate::error::AppError;
use crate::filter::TodoFilter;
use crate::models::{AgendaParams, Category, ListParams, NewTodo, Priority, Status, Todo, TodoPatch};
use crate::AppState;

pub async fn list_todos(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let filter = TodoFilter::from_params(ListParams::from_pairs(&pairs))?;
    let todos = state.db.list_todos(&filter)?;
    Ok(Json(todos))
}

pub async fn agenda(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let due_date = AgendaParams::from_pairs(&pairs)
        .date
        .as_deref()
        .and_then(normalize_due_date)
        .ok_or(AppError::InvalidDueDate)?;
    let todos = state.db.todos_due_on(&due_date)?;
    Ok(Json(todos))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<i64>,
) -> Result<Json<Todo>, AppError> {
    let todo = state.db.get_todo(todo_id)?.ok_or(AppError::NotFound)?;
    Ok(Json(todo))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Json(input): Json<NewTodo>,
) -> Result<&'static str, AppError> {
    let todo = validate_new_todo(input)?;
    state.db.add_todo(&todo)?;
    tracing::info!(id = todo.id, "todo added");
    Ok("Todo Successfully Added")
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<i64>,
    Json(patch): Json<TodoPatch>,
) -> Result<String, AppError> {
    let changes = TodoChanges::from_patch(patch)?;
    let current = state.db.get_todo(todo_id)?.ok_or(AppError::NotFound)?;
    let label = changes.label;
    let written = state.db.update_todo(&changes.apply(current))?;
    tracing::info!(id = todo_id, field = label, written, "todo updated");
    Ok(format!("{label} Updated"))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<i64>,
) -> Result<&'static str, AppError> {
    let deleted = state.db.delete_todo(todo_id)?;
    tracing::info!(id = todo_id, rows = deleted, "todo deleted");
    Ok("Todo Deleted")
}

fn parse_status(value: &str) -> Result<Status, AppError> {
    value.parse().map_err(|_| AppError::InvalidStatus)
}

fn parse_priority(value: &str) -> Result<Priority, AppError> {
    value.parse().map_err(|_| AppError::InvalidPriority)
}

fn parse_category(value: &str) -> Result<Category, AppError> {
    value.parse().map_err(|_| AppError::InvalidCategory)
}

fn check_due_date(value: &str) -> Result<(), AppError> {
    parse_due_date(value)
        .map(|_| ())
        .ok_or(AppError::InvalidDueDate)
}

/// Checks status, priority, category, then due date. The due date is kept
/// in the spelling the caller sent.
fn validate_new_todo(input: NewTodo) -> Result<Todo, AppError> {
    let status = parse_status(input.status.as_deref().unwrap_or_default())?;
    let priority = parse_priority(input.priority.as_deref().unwrap_or_default())?;
    let category = parse_category(input.category.as_deref().unwrap_or_default())?;
    let due_date = input.due_date.ok_or(AppError::InvalidDueDate)?;
    check_due_date(&due_date)?;

    Ok(Todo {
        id: input.id,
        todo: input.todo,
        category,
        priority,
        status,
        due_date,
    })
}

/// A validated partial update.
#[derive(Debug, PartialEq)]
struct TodoChanges {
    /// The field named in the response: the first one present of
    /// status, priority, todo, category, due date. `Nothing` when the
    /// body carries none of them and the row is rewritten as it was.
    label: &'static str,
    todo: Option<String>,
    status: Option<Status>,
    priority: Option<Priority>,
    category: Option<Category>,
    due_date: Option<String>,
}

impl TodoChanges {
    fn from_patch(patch: TodoPatch) -> Result<Self, AppError> {
        let label = if patch.status.is_some() {
            "Status"
        } else if patch.priority.is_some() {
            "Priority"
        } else if patch.todo.is_some() {
            "Todo"
        } else if patch.category.is_some() {
            "Category"
        } else if patch.due_date.is_some() {
            "Due Date"
        } else {
            "Nothing"
        };

        // Same order as the label, so the labelled field is checked first.
        let status = patch.status.as_deref().map(parse_status).transpose()?;
        let priority = patch.priority.as_deref().map(parse_priority).transpose()?;
        let category = patch.category.as_deref().map(parse_category).transpose()?;
        if let Some(due_date) = patch.due_date.as_deref() {
            check_due_date(due_date)?;
        }

        Ok(Self {
            label,
            todo: patch.todo,
            status,
            priority,
            category,
            due_date: patch.due_date,
        })
    }

    fn apply(self, current: Todo) -> Todo {
        Todo {
            id: current.id,
            todo: self.todo.unwrap_or(current.todo),
            category: self.category.unwrap_or(current.category),
            priority: self.priority.unwrap_or(current.priority),
            status: self.status.unwrap_or(current.status),
            due_date: self.due_date.unwrap_or(current.due_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_todo(status: Option<&str>, priority: Option<&str>, category: Option<&str>, due: Option<&str>) -> NewTodo {
        NewTodo {
            id: 6,
            todo: "Finalize event theme".to_string(),
            status: status.map(str::to_string),
            priority: priority.map(str::to_string),
            category: category.map(str::to_string),
            due_date: due.map(str::to_string),
        }
    }

    fn stored() -> Todo {
        Todo {
            id: 3,
            todo: "Clean the garden".to_string(),
            category: Category::Home,
            priority: Priority::Low,
            status: Status::ToDo,
            due_date: "2021-02-22".to_string(),
        }
    }

    #[test]
    fn create_checks_fields_in_order() {
        let err = validate_new_todo(new_todo(Some("x"), Some("x"), Some("x"), Some("x"))).unwrap_err();
        assert!(matches!(err, AppError::InvalidStatus));

        let err = validate_new_todo(new_todo(Some("DONE"), Some("x"), Some("x"), Some("x"))).unwrap_err();
        assert!(matches!(err, AppError::InvalidPriority));

        let err = validate_new_todo(new_todo(Some("DONE"), Some("LOW"), Some("x"), Some("x"))).unwrap_err();
        assert!(matches!(err, AppError::InvalidCategory));

        let err = validate_new_todo(new_todo(Some("DONE"), Some("LOW"), Some("HOME"), Some("2021-22-12")))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidDueDate));
    }

    #[test]
    fn create_treats_missing_fields_as_invalid() {
        let err = validate_new_todo(new_todo(None, Some("LOW"), Some("HOME"), Some("2021-01-01"))).unwrap_err();
        assert!(matches!(err, AppError::InvalidStatus));

        let err = validate_new_todo(new_todo(Some("DONE"), Some("LOW"), Some("HOME"), None)).unwrap_err();
        assert!(matches!(err, AppError::InvalidDueDate));
    }

    #[test]
    fn create_keeps_raw_due_date() {
        let todo = validate_new_todo(new_todo(Some("TO DO"), Some("HIGH"), Some("WORK"), Some("2021-2-2"))).unwrap();
        assert_eq!(todo.due_date, "2021-2-2");
        assert_eq!(todo.status, Status::ToDo);
    }

    #[test]
    fn update_label_follows_precedence() {
        let patch = TodoPatch {
            todo: Some("New text".to_string()),
            category: Some("WORK".to_string()),
            priority: Some("HIGH".to_string()),
            ..TodoPatch::default()
        };
        assert_eq!(TodoChanges::from_patch(patch).unwrap().label, "Priority");

        let patch = TodoPatch {
            due_date: Some("2021-01-12".to_string()),
            category: Some("WORK".to_string()),
            ..TodoPatch::default()
        };
        assert_eq!(TodoChanges::from_patch(patch).unwrap().label, "Category");

        let patch = TodoPatch {
            due_date: Some("2021-01-12".to_string()),
            ..TodoPatch::default()
        };
        assert_eq!(TodoChanges::from_patch(patch).unwrap().label, "Due Date");
    }

    #[test]
    fn update_rejects_invalid_labelled_field() {
        let patch = TodoPatch {
            status: Some("SOMEDAY".to_string()),
            ..TodoPatch::default()
        };
        assert!(matches!(TodoChanges::from_patch(patch), Err(AppError::InvalidStatus)));

        let patch = TodoPatch {
            due_date: Some("2021-02-30".to_string()),
            ..TodoPatch::default()
        };
        assert!(matches!(TodoChanges::from_patch(patch), Err(AppError::InvalidDueDate)));
    }

    #[test]
    fn update_rejects_invalid_secondary_field() {
        let patch = TodoPatch {
            status: Some("DONE".to_string()),
            category: Some("GARDEN".to_string()),
            ..TodoPatch::default()
        };
        assert!(matches!(TodoChanges::from_patch(patch), Err(AppError::InvalidCategory)));
    }

    #[test]
    fn empty_update_keeps_the_current_row() {
        let changes = TodoChanges::from_patch(TodoPatch::default()).unwrap();
        assert_eq!(changes.label, "Nothing");
        assert_eq!(changes.apply(stored()), stored());
    }

    #[test]
    fn apply_fills_missing_fields_from_current_row() {
        let patch = TodoPatch {
            status: Some("DONE".to_string()),
            due_date: Some("2021-3-1".to_string()),
            ..TodoPatch::default()
        };
        let updated = TodoChanges::from_patch(patch).unwrap().apply(stored());
        assert_eq!(
            updated,
            Todo {
                status: Status::Done,
                due_date: "2021-3-1".to_string(),
                ..stored()
            }
        );
    }
}
