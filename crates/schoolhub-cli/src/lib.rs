//! # SchoolHub CLI
//!
//! Database seeding utilities for SchoolHub development and demos.
//!
//! This library crate provides the seeding functionality used by the CLI binary.
//!
//! ## Usage
//!
//! ```ignore
//! use schoolhub_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(2024).with_students_per_class(30);
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
