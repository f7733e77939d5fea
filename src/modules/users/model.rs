pub use schoolhub_models::users::*;
