//! Sensor identity: locations, serial numbers and descriptions.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::VehicleError;

static LOCATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z._-]+[0-9]*$").expect("location pattern is valid"));

/// Where a sensor is mounted.
///
/// A location name consists of lower-case ASCII letters, `.`, `_` and `-`,
/// optionally followed by trailing digits. It may not be empty or start
/// with a digit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location(String);

impl Location {
    /// Validate and wrap `name`.
    ///
    /// # Errors
    ///
    /// [`VehicleError::InvalidIdentifierFormat`] if `name` is empty or does
    /// not match the location format.
    pub fn new(name: impl Into<String>) -> Result<Self, VehicleError> {
        let name = name.into();
        if name.is_empty() {
            return Err(VehicleError::InvalidIdentifierFormat {
                value: name,
                reason: "empty location is not allowed".to_owned(),
            });
        }
        if !LOCATION_PATTERN.is_match(&name) {
            return Err(VehicleError::InvalidIdentifierFormat {
                value: name,
                reason: "location may only contain lower-case letters, '.', '_', '-' \
                         and trailing digits"
                    .to_owned(),
            });
        }
        Ok(Self(name))
    }

    /// The location name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Location {
    type Err = VehicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity shared by every sensor.
pub trait Sensor {
    /// Mounting location.
    fn location(&self) -> &Location;
    /// Manufacturer serial number.
    fn serial_no(&self) -> &str;
    /// Free-form description.
    fn description(&self) -> &str;
}

/// Plain [`Sensor`] identity record, embedded by assemblies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensorDescription {
    /// Mounting location.
    pub location: Location,
    /// Manufacturer serial number.
    pub serial_no: String,
    /// Free-form description.
    pub description: String,
}

impl SensorDescription {
    /// Bundle the three identity fields.
    pub fn new(location: Location, serial_no: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            location,
            serial_no: serial_no.into(),
            description: description.into(),
        }
    }
}

impl Sensor for SensorDescription {
    fn location(&self) -> &Location {
        &self.location
    }

    fn serial_no(&self) -> &str {
        &self.serial_no
    }

    fn description(&self) -> &str {
        &self.description
    }
}
