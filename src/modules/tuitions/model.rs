pub use schoolhub_models::tuitions::*;
