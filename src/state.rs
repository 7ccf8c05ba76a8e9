//! Shared application state for all routes.

use sqlx::PgPool;

/// The pool is the only shared resource; each request borrows one connection from it.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}
