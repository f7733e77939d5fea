//! # SchoolHub Auth
//!
//! - [`role`]: the closed [`Role`] enum shared by tokens, the database and
//!   route guards
//! - [`claims`]: access token payload
//! - [`jwt`]: token creation and verification

pub mod claims;
pub mod jwt;
pub mod role;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use role::{Role, UnknownRole};
