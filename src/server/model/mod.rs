//! Server-side domain models and parameter types.
//!
//! Domain models are built from entity models at the repository boundary and converted
//! to DTOs at the controller boundary. They carry external ids only: internal integer
//! keys stay inside the data layer.

pub mod comment;
pub mod notification;
pub mod page;
pub mod project;
pub mod stats;
pub mod task;
pub mod user;
