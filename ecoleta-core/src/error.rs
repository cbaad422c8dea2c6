use std::fmt;

use thiserror::Error;

use crate::geolocation::GeolocationFailure;
use crate::payload::MissingField;

/// Remote resources the form reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Categories,
    Regions,
    SubRegions,
    Submission,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resource::Categories => "categories",
            Resource::Regions => "regions",
            Resource::SubRegions => "sub-regions",
            Resource::Submission => "submission",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("network failure loading {resource}: {message}")]
    Network { resource: Resource, message: String },

    #[error("malformed {resource} response: {source}")]
    Decode {
        resource: Resource,
        #[source]
        source: serde_json::Error,
    },

    #[error("geolocation unavailable: {0}")]
    Geolocation(GeolocationFailure),

    #[error("missing required fields: {}", join_fields(.0))]
    Validation(Vec<MissingField>),

    #[error("unknown contact field `{0}`")]
    UnknownField(String),

    #[error("payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl FormError {
    pub fn network(resource: Resource, message: impl Into<String>) -> Self {
        FormError::Network {
            resource,
            message: message.into(),
        }
    }
}

fn join_fields(fields: &[MissingField]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
