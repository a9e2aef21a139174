//! Request guards shared by the controllers.

pub mod auth;
