pub use schoolhub_models::auth::*;
