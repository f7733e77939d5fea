//! Student models, shared with the registration flow and the client crate.

pub use schoolhub_models::students::*;
