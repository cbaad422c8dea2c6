//! Platform-independent core of the collection-point registration form.
//!
//! The browser runtime owns a [`FormState`], feeds it [`Event`]s and runs the
//! [`Command`]s it hands back.

pub mod api;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod i18n;
pub mod models;
pub mod payload;
pub mod state;

pub use api::Endpoints;
pub use config::Config;
pub use error::{FormError, Resource};
pub use geolocation::{FixedPosition, GeolocationFailure, PositionOutcome, PositionSource};
pub use i18n::{Lang, Msg};
pub use models::{Category, ContactField, ContactInfo, Coordinate, SENTINEL};
pub use payload::{MissingField, SubmissionPayload, ValidationPolicy};
pub use state::{
    Command, Event, FormState, GeolocationState, LoadState, SubRegionRequest, SubmitState,
};
