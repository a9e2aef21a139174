//! SeaORM entities for the taskboard database.
//!
//! Every table carries an auto-increment `id` used for joins and foreign keys and a
//! unique `uuid` column that is the only identifier ever exposed over the API.

pub mod prelude;

pub mod comment;
pub mod notification;
pub mod project;
pub mod project_member;
pub mod task;
pub mod user;
