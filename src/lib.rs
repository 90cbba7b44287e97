use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;

pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod filter;
pub mod models;
mod routes;

use db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

pub fn app(db: Arc<Database>) -> Router {
    let state = AppState { db };

    Router::new()
        .route("/todos", get(routes::list_todos).post(routes::create_todo))
        .route("/todos/", get(routes::list_todos).post(routes::create_todo))
        .route("/agenda", get(routes::agenda))
        .route("/agenda/", get(routes::agenda))
        .route(
            "/todos/:todo_id",
            get(routes::get_todo)
                .put(routes::update_todo)
                .delete(routes::delete_todo),
        )
        .route(
            "/todos/:todo_id/",
            get(routes::get_todo)
                .put(routes::update_todo)
                .delete(routes::delete_todo),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener, db: Arc<Database>) -> std::io::Result<()> {
    axum::serve(listener, app(db)).await
}
