//! Wire-level DTOs shared by the HTTP and WebSocket surfaces.
//!
//! Every identifier exposed here is an external UUID string. Internal database keys never
//! appear in these types.

pub mod api;
pub mod notification;
pub mod project;
pub mod socket;
pub mod stats;
pub mod task;
pub mod user;
