pub mod controller;
pub mod model;
pub mod months;
pub mod router;
pub mod service;

pub use router::init_reports_router;
