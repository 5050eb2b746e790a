//! MailMaster Storage - Database abstraction
//!
//! This crate provides the persistence layer for MailMaster: the data
//! models, repository traits with PostgreSQL and in-memory
//! implementations, and the [`Store`] bundle the services hold.

pub mod db;
pub mod models;
pub mod repository;
pub mod store;

pub use db::DatabasePool;
pub use models::*;
pub use repository::*;
pub use store::Store;
