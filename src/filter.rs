use crate::error::AppError;
use crate::models::{Category, ListParams, Priority, Status};

/// The enumerated part of a listing query. At most two fields ever take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    PriorityAndStatus(Priority, Status),
    CategoryAndStatus(Category, Status),
    PriorityAndCategory(Priority, Category),
    Priority(Priority),
    Status(Status),
    Category(Category),
    Everything,
}

impl Selection {
    /// First match wins, in this order. A request carrying all three
    /// fields is filtered by priority and status only.
    pub fn pick(
        priority: Option<Priority>,
        status: Option<Status>,
        category: Option<Category>,
    ) -> Self {
        match (priority, status, category) {
            (Some(priority), Some(status), _) => Selection::PriorityAndStatus(priority, status),
            (_, Some(status), Some(category)) => Selection::CategoryAndStatus(category, status),
            (Some(priority), None, Some(category)) => {
                Selection::PriorityAndCategory(priority, category)
            }
            (Some(priority), None, None) => Selection::Priority(priority),
            (None, Some(status), None) => Selection::Status(status),
            (None, None, Some(category)) => Selection::Category(category),
            (None, None, None) => Selection::Everything,
        }
    }

    /// Column equality conditions ANDed onto the text search.
    pub fn conditions(&self) -> Vec<(&'static str, &'static str)> {
        match *self {
            Selection::PriorityAndStatus(priority, status) => {
                vec![("status", status.as_str()), ("priority", priority.as_str())]
            }
            Selection::CategoryAndStatus(category, status) => {
                vec![("status", status.as_str()), ("category", category.as_str())]
            }
            Selection::PriorityAndCategory(priority, category) => {
                vec![("category", category.as_str()), ("priority", priority.as_str())]
            }
            Selection::Priority(priority) => vec![("priority", priority.as_str())],
            Selection::Status(status) => vec![("status", status.as_str())],
            Selection::Category(category) => vec![("category", category.as_str())],
            Selection::Everything => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFilter {
    pub search: String,
    pub selection: Selection,
}

impl TodoFilter {
    /// Validates every supplied field (status, then priority, then category)
    /// before any combination is chosen.
    pub fn from_params(params: ListParams) -> Result<Self, AppError> {
        let status = params
            .status
            .as_deref()
            .map(|value| value.parse::<Status>().map_err(|_| AppError::InvalidStatus))
            .transpose()?;
        let priority = params
            .priority
            .as_deref()
            .map(|value| value.parse::<Priority>().map_err(|_| AppError::InvalidPriority))
            .transpose()?;
        let category = params
            .category
            .as_deref()
            .map(|value| value.parse::<Category>().map_err(|_| AppError::InvalidCategory))
            .transpose()?;

        Ok(Self {
            search: params.search_q,
            selection: Selection::pick(priority, status, category),
        })
    }
}
