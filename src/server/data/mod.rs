//! Database repository layer for all domain entities.
//!
//! This module contains repository structs that handle database operations (CRUD) for each
//! domain in the application. Repositories use SeaORM entity models internally and return
//! domain models keyed by external ids, so integer keys never leave this layer. All
//! database queries, inserts, updates, and deletes are performed through these repositories.

pub mod comment;
pub mod lookup;
pub mod notification;
pub mod project;
pub mod stats;
pub mod task;
pub mod user;

#[cfg(test)]
mod test;
