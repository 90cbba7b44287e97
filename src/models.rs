use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Declares a closed set of wire strings that is also stored as TEXT.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    _ => Err(()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let text = value.as_str()?;
                text.parse().map_err(|_| {
                    FromSqlError::Other(
                        format!("unexpected {} value {text:?}", stringify!($name)).into(),
                    )
                })
            }
        }
    };
}

text_enum!(Status {
    ToDo => "TO DO",
    InProgress => "IN PROGRESS",
    Done => "DONE",
});

text_enum!(Priority {
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
});

text_enum!(Category {
    Work => "WORK",
    Home => "HOME",
    Learning => "LEARNING",
});

/// A row of the `todo` table as it goes out on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub todo: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    /// Stored text, returned as-is.
    #[serde(rename = "dueDate")]
    pub due_date: String,
}

/// Body of `POST /todos/`.
///
/// The enumerated fields and the due date stay optional here so that a
/// missing value is rejected with the same message as a malformed one.
#[derive(Debug, Deserialize)]
pub struct NewTodo {
    pub id: i64,
    pub todo: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
}

/// Body of `PUT /todos/:todo_id`.
#[derive(Debug, Default, Deserialize)]
pub struct TodoPatch {
    pub todo: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
}

/// Query string of `GET /todos/`. A key given more than once keeps all of
/// its values joined with `,`, so `?status=DONE&status=TO%20DO` is one
/// (invalid) status rather than a rejected request.
#[derive(Debug, Default, PartialEq)]
pub struct ListParams {
    pub search_q: String,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
}

impl ListParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            search_q: joined_values(pairs, "search_q").unwrap_or_default(),
            status: joined_values(pairs, "status"),
            priority: joined_values(pairs, "priority"),
            category: joined_values(pairs, "category"),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct AgendaParams {
    pub date: Option<String>,
}

impl AgendaParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            date: joined_values(pairs, "date"),
        }
    }
}

fn joined_values(pairs: &[(String, String)], key: &str) -> Option<String> {
    let values: Vec<&str> = pairs
        .iter()
        .filter(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}
