//! Pet Records Core Library
//!
//! Veterinary records for pets, their owners and their visits, served through
//! a chain of stores that degrades from a remote server down to storage on
//! the device.
//!
//! # Architecture
//!
//! ```text
//!  Page controllers (login, dashboard, registration, visit, records)
//!                              │
//!                        Session ── isLoggedIn / username / userId
//!                              │
//!                     ┌────────▼────────┐
//!                     │   DataAccess    │  first usable answer wins
//!                     └────────┬────────┘
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//!     RemoteStore        EmbeddedStore         LocalStore
//!     REST / JSON        SQLite (rusqlite)     JSON collections in
//!                                              key-value storage
//! ```
//!
//! # Core Principle
//!
//! **Reads never fail.** A store that errors or has nothing to say is logged
//! and skipped; the local store always answers, seeded with starter data on a
//! fresh install.
//!
//! # Modules
//!
//! - [`access`]: The fallback facade
//! - [`store`]: The [`RecordStore`] trait, its remote and embedded tiers, and the local store
//! - [`db`]: SQLite database layer used by the embedded store and the server
//! - [`kv`]: Durable key-value storage for local collections and the session
//! - [`models`]: Domain types (Pet, MedicalRecord, DashboardStats, etc.)
//! - [`session`]: Login state
//! - [`pages`]: Page controllers
//! - [`config`]: Store chain configuration

pub mod access;
pub mod app;
pub mod config;
pub mod db;
pub mod kv;
pub mod models;
pub mod pages;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use access::{AccessError, DataAccess, Reply, INVALID_CREDENTIALS};
pub use app::App;
pub use config::{AccessConfig, ConfigError};
pub use db::{Database, DbError, DbResult};
pub use kv::{FileStore, KeyValueStore, KvError, MemoryStore};
pub use models::{
    Created, DashboardStats, Deleted, FormFields, LoginOutcome, MedicalRecord, NewMedicalRecord,
    NewPet, Pet, User,
};
pub use session::{Session, SessionError};
pub use store::{EmbeddedStore, LocalStore, RecordStore, RemoteStore, StoreError};
