//! Domain primitives, services, and ports.
//!
//! Types here are transport agnostic. The HTTP adapter maps them onto
//! requests and responses; the persistence and email adapters implement the
//! traits in [`ports`].

pub mod auth;
pub mod error;
pub mod form_schema;
pub mod ports;
pub mod signup;
pub mod volunteer;

pub use self::auth::{LoginCredentials, LoginValidationError, StaffId};
pub use self::error::{Error, ErrorCode};
pub use self::form_schema::{SignupFormSchema, signup_form_schema};
pub use self::signup::{SignupError, SignupService};
pub use self::volunteer::{
    City, RawSignup, Volunteer, VolunteerArea, VolunteerDraft, VolunteerId,
};

/// Convenient result alias for fallible domain operations.
pub type ApiResult<T> = Result<T, Error>;
