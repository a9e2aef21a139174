//! API backend and business logic.
//!
//! The backend uses Axum for HTTP and WebSocket handling, SeaORM for the Sqlite store,
//! `jsonwebtoken` and `bcrypt` for authentication and `lettre` for outgoing email.
//!
//! # Architecture
//!
//! - **Controller Layer** (`controller/`) - HTTP and socket handlers, access control, and DTO conversion
//! - **Service Layer** (`service/`) - Business logic, notifications, tokens and mail
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models and operation-specific parameter types
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Token extraction and role checks
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state (DB, token keys, socket hub, mailer)
//! - **Startup** (`startup`) - Database connection, migrations and the admin bootstrap
//! - **Router** (`router`) - Route table, CORS, tracing and API documentation
//!
//! # Request Flow
//!
//! 1. **Router** receives the request and routes it to a controller
//! 2. **Middleware** resolves the caller from the `Authorization` header
//! 3. **Controller** checks access, converts DTOs to params, calls a service
//! 4. **Service** applies the business rules and raises notifications
//! 5. **Data** queries the database and converts entities to domain models
//! 6. **Controller** converts the result to a DTO and responds

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
