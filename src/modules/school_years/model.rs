pub use schoolhub_models::school_years::*;
