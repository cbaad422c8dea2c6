use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// Select value reserved for "nothing chosen yet".
pub const SENTINEL: &str = "0";

/// Recyclable material category offered by the backend catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub title: String,
    #[serde(rename = "image_url")]
    pub icon_url: String,
}

/// Geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from(v: (f64, f64)) -> Self {
        Coordinate::new(v.0, v.1)
    }
}

/// Free-text contact fields. No format checks are applied to them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Whatsapp,
}

impl ContactField {
    pub const ALL: [ContactField; 3] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Whatsapp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Whatsapp => "whatsapp",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(ContactField::Name),
            "email" => Ok(ContactField::Email),
            "whatsapp" => Ok(ContactField::Whatsapp),
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }
}

impl ContactInfo {
    /// Replace one field, leaving the others untouched.
    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        let slot = match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Whatsapp => &mut self.whatsapp,
        };
        *slot = value.into();
    }
}

/// Parse a raw `<select>` value into an optional choice. The sentinel and an
/// empty value both mean "nothing chosen".
pub fn parse_selection(raw: &str) -> Option<String> {
    let v = raw.trim();
    if v.is_empty() || v == SENTINEL {
        None
    } else {
        Some(v.to_string())
    }
}

/// Geography service row for a first-level region.
#[derive(Clone, Debug, Deserialize)]
pub struct RegionRow {
    pub sigla: String,
}

/// Geography service row for a second-level region.
#[derive(Clone, Debug, Deserialize)]
pub struct SubRegionRow {
    pub nome: String,
}
