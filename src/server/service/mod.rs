//! Service layer for business logic and orchestration.
//!
//! Services sit between the controllers and the repositories. They enforce who may do
//! what, validate input that needs database lookups, decide which notifications fire
//! and keep derived state such as project and task status consistent. They work with
//! domain models only; conversion to DTOs happens in the controllers.

pub mod auth;
pub mod mail;
pub mod notification;
pub mod notifier;
pub mod project;
pub mod stats;
pub mod task;
pub mod user;
