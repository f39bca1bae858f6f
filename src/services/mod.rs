//! Business logic for the parking reservation service.
//!
//! Handlers call into this module and nothing else; every function takes the
//! repository handle explicitly and returns a [`ServiceResult`]. The
//! admission engine lives in [`admission`]; everything around it is thin
//! CRUD with input validation.

pub mod accounts;
pub mod admission;
pub mod catalog;
pub mod error;
pub mod notifier;

pub use accounts::{AuthSession, SigninRequest, SignupRequest};
pub use admission::ReservationRequest;
pub use catalog::{
    CreateLocationRequest, CreateSlotRequest, UpdateLocationRequest, UpdateSlotRequest,
};
pub use error::{ServiceError, ServiceResult};
pub use notifier::{LogNotifier, NotifyError, ReservationNotifier, SmtpNotifier};
