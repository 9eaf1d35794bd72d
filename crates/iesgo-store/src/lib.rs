//! # iesgo-store
//!
//! Local key-value persistence for IESGO Connect.
//!
//! The session mirrors itself into a [`KvStore`], one independent entry per
//! entity. Two backends are provided: [`Database`] (SQLite on disk) and
//! [`MemoryStore`].

pub mod database;
pub mod kv;
pub mod memory;
pub mod migrations;
pub mod persisted;

mod entries;
mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use kv::KvStore;
pub use memory::MemoryStore;
pub use persisted::{encode, PersistedState, Threads};
