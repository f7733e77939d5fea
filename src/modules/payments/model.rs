pub use schoolhub_models::payments::*;
