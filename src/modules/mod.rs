pub mod auth;
pub mod classes;
pub mod common;
pub mod levels;
pub mod payments;
pub mod registrations;
pub mod reports;
pub mod school_years;
pub mod students;
pub mod tuitions;
pub mod users;

pub use self::auth::model::LoginRequest;
pub use self::users::model::User;
