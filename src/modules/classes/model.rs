pub use schoolhub_models::classes::*;
