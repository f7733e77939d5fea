//! # SchoolHub Core
//!
//! Core types shared by every SchoolHub crate:
//!
//! - [`errors`]: [`AppError`] and the failure envelope
//! - [`response`]: the success envelope [`ApiResponse`]
//! - [`pagination`]: limit/offset parameters for list endpoints
//! - [`password`]: bcrypt hashing and verification
//! - [`serde`]: query-string deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_core::{ApiResponse, AppError};
//!
//! async fn handler() -> Result<ApiResponse<Vec<String>>, AppError> {
//!     Ok(ApiResponse::ok(vec![]))
//! }
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod response;
pub mod serde;

pub use errors::AppError;
pub use pagination::PaginationParams;
pub use password::{hash_password, verify_password};
pub use response::{ApiResponse, ErrorResponse, MessageResponse};
