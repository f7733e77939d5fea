//! # SchoolHub Client
//!
//! Typed HTTP client for the SchoolHub API with an explicit response cache.
//!
//! This crate provides:
//! - [`ApiClient`]: request building, bearer token and envelope decoding
//! - [`ClientCache`]: a TTL cache shared by the stores, handed in by the caller
//! - [`Session`]: login, logout and role checks
//! - [`StudentStore`] and [`RegistrationStore`]: cached lists that refetch after every write
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_client::{ApiClient, CacheConfig, ClientCache, Session, StudentStore};
//!
//! let config = CacheConfig::from_env();
//! let cache = ClientCache::new(config.ttl);
//! let client = ApiClient::new(config, cache);
//!
//! Session::new(client.clone()).login("admin", "secret").await?;
//! let students = StudentStore::new(client).search("ສົມ").await?;
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod keys;
pub mod registrations;
pub mod session;
pub mod students;

pub use cache::ClientCache;
pub use client::ApiClient;
pub use config::CacheConfig;
pub use error::ClientError;
pub use keys::hash_filters;
pub use registrations::{RegistrationQuery, RegistrationStore};
pub use session::Session;
pub use students::{StudentQuery, StudentStore};
