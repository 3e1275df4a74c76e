//! Registration data model: what is sent to WIPP and what comes back.

mod registration_request;
mod registration_response;

pub use registration_request::{RegistrationBody, RegistrationRequest};
pub use registration_response::{ErrorBody, RegistrationInfo, RegistrationOutcome, ResponseEnvelope};
