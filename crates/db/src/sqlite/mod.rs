//! SQLite-Implementierung der Repository-Traits

mod chat;
mod pool;
mod users;

pub use pool::SqliteDb;
