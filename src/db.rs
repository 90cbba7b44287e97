use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::Context;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::filter::TodoFilter;
use crate::models::Todo;

const SELECT_TODO: &str = "SELECT id, todo, priority, status, category, due_date FROM todo";

/// The single storage handle shared by every request.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn connect<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("opening database at {}", path.as_ref().display()))?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("opening in-memory database")?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database connection lock poisoned"))
    }

    /// Creates the `todo` table when it is missing. The service normally
    /// expects it to exist already.
    pub fn create_schema(&self) -> anyhow::Result<()> {
        self.conn()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS todo (
                id INTEGER,
                todo TEXT,
                priority TEXT,
                status TEXT,
                category TEXT,
                due_date TEXT
            );
            "#,
        )?;
        Ok(())
    }

    pub fn list_todos(&self, filter: &TodoFilter) -> anyhow::Result<Vec<Todo>> {
        let conditions = filter.selection.conditions();
        let mut sql = format!("{SELECT_TODO} WHERE todo LIKE '%' || ?1 || '%'");
        for (index, (column, _)) in conditions.iter().enumerate() {
            sql.push_str(&format!(" AND {column} = ?{}", index + 2));
        }

        let mut values = vec![filter.search.as_str()];
        values.extend(conditions.iter().map(|(_, value)| *value));

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), todo_from_row)?;

        let mut todos = Vec::new();
        for todo in rows {
            todos.push(todo?);
        }
        Ok(todos)
    }

    /// Todos whose stored due date is exactly `due_date`.
    pub fn todos_due_on(&self, due_date: &str) -> anyhow::Result<Vec<Todo>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_TODO} WHERE due_date = ?1"))?;
        let rows = stmt.query_map(params![due_date], todo_from_row)?;

        let mut todos = Vec::new();
        for todo in rows {
            todos.push(todo?);
        }
        Ok(todos)
    }

    pub fn get_todo(&self, id: i64) -> anyhow::Result<Option<Todo>> {
        let todo = self
            .conn()?
            .query_row(
                &format!("{SELECT_TODO} WHERE id = ?1"),
                params![id],
                todo_from_row,
            )
            .optional()?;
        Ok(todo)
    }

    pub fn add_todo(&self, todo: &Todo) -> anyhow::Result<()> {
        self.conn()?.execute(
            "INSERT INTO todo (id, todo, priority, status, category, due_date) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                todo.id,
                todo.todo,
                todo.priority,
                todo.status,
                todo.category,
                todo.due_date
            ],
        )?;
        Ok(())
    }

    /// Overwrites every column of the rows carrying `todo.id`. Returns
    /// whether anything was written.
    pub fn update_todo(&self, todo: &Todo) -> anyhow::Result<bool> {
        let updated = self.conn()?.execute(
            "UPDATE todo SET todo = ?1, priority = ?2, status = ?3, category = ?4, due_date = ?5 WHERE id = ?6",
            params![
                todo.todo,
                todo.priority,
                todo.status,
                todo.category,
                todo.due_date,
                todo.id
            ],
        )?;
        Ok(updated > 0)
    }

    /// Returns the number of rows removed; zero is not an error.
    pub fn delete_todo(&self, id: i64) -> anyhow::Result<usize> {
        let deleted = self
            .conn()?
            .execute("DELETE FROM todo WHERE id = ?1", params![id])?;
        Ok(deleted)
    }

    pub fn count_todos(&self) -> anyhow::Result<i64> {
        let count = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM todo", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        todo: row.get(1)?,
        priority: row.get(2)?,
        status: row.get(3)?,
        category: row.get(4)?,
        due_date: row.get(5)?,
    })
}
