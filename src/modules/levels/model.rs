pub use schoolhub_models::levels::*;
