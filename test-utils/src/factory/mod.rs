//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with both a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation. Factories take
//! internal ids for foreign keys, so create the referenced records first.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let user = factory::create_user(&db).await?;
//! let project = factory::create_project(&db, user.id).await?;
//! let task = factory::task::TaskFactory::new(&db, user.id)
//!     .project(project.id)
//!     .assigned_to(user.id)
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `user` - Create user entities
//! - `project` - Create project entities and memberships
//! - `task` - Create task entities
//! - `comment` - Create comment entities
//! - `notification` - Create notification entities
//! - `helpers` - Id generation and multi-entity helpers

pub mod comment;
pub mod helpers;
pub mod notification;
pub mod project;
pub mod task;
pub mod user;

pub use comment::create_comment;
pub use notification::create_notification;
pub use project::{add_member, create_project};
pub use task::create_task;
pub use user::create_user;
