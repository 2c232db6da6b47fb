//! Infrastructure Layer
//!
//! Adapters for the ports defined in the domain and application layers:
//!
//! - **Driven Adapters (Outbound)**
//!   - `persistence/`: SQLite (sqlx) and in-memory stores
//!
//! - **Driver Adapters (Inbound)**
//!   - `http/`: REST API controllers
//!
//! - **Wiring**
//!   - `config/`: Dependency injection container

pub mod config;
pub mod http;
pub mod persistence;
