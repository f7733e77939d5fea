//! Read-only lookups backing the front end's dropdowns.

pub mod controller;
pub mod router;
pub mod service;

pub use router::init_common_router;
