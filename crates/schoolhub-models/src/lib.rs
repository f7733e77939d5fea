//! # SchoolHub Models
//!
//! Database rows, request DTOs and response shapes for the SchoolHub API.
//!
//! # Modules
//!
//! - [`auth`]: login and account registration
//! - [`users`]: user accounts
//! - [`students`]: student records
//! - [`registrations`]: enrollments and class rosters
//! - [`payments`]: payments against registrations
//! - [`levels`], [`classes`], [`school_years`], [`tuitions`]: reference data
//! - [`common`]: shared lookup shapes
//! - [`reports`]: report sections and filters
//! - [`validation`]: custom field rules

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
pub mod validation;

pub use auth::{AuthUserInfo, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use classes::{Class, ClassFilterParams, CreateClassDto, UpdateClassDto};
pub use common::{ClassLookupParams, NextIdResponse};
pub use levels::{CreateLevelDto, Level, UpdateLevelDto};
pub use payments::{
    CreatePaymentDto, Payment, PaymentDetails, PaymentListResponse, PaymentMethod,
    PaymentSearchParams, PaymentSearchResponse,
};
pub use registrations::{
    ClassRoster, ClassRosterParams, CreateRegistrationDto, Registration, RegistrationFilterParams,
    RegistrationListResponse, RegistrationView, RosterEntry, UpdateRegistrationDto,
};
pub use school_years::{CreateSchoolYearDto, SchoolYear, UpdateSchoolYearDto};
pub use students::{
    CreateStudentDto, Gender, Student, StudentFilterParams, StudentListResponse, UpdateStudentDto,
};
pub use tuitions::{CreateTuitionFeeDto, TuitionFee, UpdateTuitionFeeDto};
pub use users::{CreateUserDto, UpdateUserDto, User, UserCredentials};
