pub use schoolhub_models::registrations::*;
