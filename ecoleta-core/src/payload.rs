use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::models::{ContactInfo, Coordinate};

/// Body of `POST /points`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    pub uf: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub items: Vec<u32>,
    pub whatsapp: String,
}

impl SubmissionPayload {
    pub fn to_json(&self) -> Result<String, FormError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// How much checking happens before a payload leaves the form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// Forward whatever was entered and let the backend decide.
    #[default]
    Permissive,
    /// Refuse to submit while required fields are blank or unset.
    Strict,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MissingField {
    Name,
    Email,
    Whatsapp,
    Region,
    SubRegion,
    Items,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MissingField::Name => "name",
            MissingField::Email => "email",
            MissingField::Whatsapp => "whatsapp",
            MissingField::Region => "uf",
            MissingField::SubRegion => "city",
            MissingField::Items => "items",
        };
        f.write_str(s)
    }
}

/// Snapshot of everything the payload is assembled from.
#[derive(Clone, Copy, Debug)]
pub struct PayloadSource<'a> {
    pub contact: &'a ContactInfo,
    pub region: Option<&'a str>,
    pub sub_region: Option<&'a str>,
    pub position: Coordinate,
    pub items: &'a BTreeSet<u32>,
}

/// Assemble the submission body. Unset selections are sent as the sentinel
/// so the backend sees exactly what the controls held.
pub fn build_payload(
    src: PayloadSource<'_>,
    policy: ValidationPolicy,
) -> Result<SubmissionPayload, FormError> {
    if policy == ValidationPolicy::Strict {
        let missing = missing_fields(&src);
        if !missing.is_empty() {
            return Err(FormError::Validation(missing));
        }
    }
    Ok(SubmissionPayload {
        name: src.contact.name.clone(),
        email: src.contact.email.clone(),
        uf: src.region.unwrap_or(crate::models::SENTINEL).to_string(),
        city: src.sub_region.unwrap_or(crate::models::SENTINEL).to_string(),
        latitude: src.position.latitude,
        longitude: src.position.longitude,
        items: src.items.iter().copied().collect(),
        whatsapp: src.contact.whatsapp.clone(),
    })
}

fn missing_fields(src: &PayloadSource<'_>) -> Vec<MissingField> {
    let mut out = Vec::new();
    if src.contact.name.trim().is_empty() {
        out.push(MissingField::Name);
    }
    if src.contact.email.trim().is_empty() {
        out.push(MissingField::Email);
    }
    if src.contact.whatsapp.trim().is_empty() {
        out.push(MissingField::Whatsapp);
    }
    if src.region.is_none() {
        out.push(MissingField::Region);
    }
    if src.sub_region.is_none() {
        out.push(MissingField::SubRegion);
    }
    if src.items.is_empty() {
        out.push(MissingField::Items);
    }
    out
}
