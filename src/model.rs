//! Core domain types for the signup form.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::Rate;

/// Errors raised when parsing user-supplied option values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown domain extension '{0}'")]
    UnknownExtension(String),
    #[error("unknown server location '{0}'")]
    UnknownLocation(String),
}

/// Domain suffix offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Extension {
    #[default]
    Com,
    Org,
}

impl Extension {
    pub const ALL: [Extension; 2] = [Extension::Com, Extension::Org];

    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::Com => ".com",
            Extension::Org => ".org",
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `.com`, `com`, `.COM`, ...
impl FromStr for Extension {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
        Extension::ALL
            .into_iter()
            .find(|ext| ext.as_str()[1..].eq_ignore_ascii_case(bare))
            .ok_or_else(|| ModelError::UnknownExtension(s.to_string()))
    }
}

/// Region hosting the trial server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ServerLocation {
    #[default]
    #[serde(rename = "USA")]
    Usa,
    Germany,
    Bangladesh,
    Singapore,
    Canada,
    Japan,
}

impl ServerLocation {
    pub const ALL: [ServerLocation; 6] = [
        ServerLocation::Usa,
        ServerLocation::Germany,
        ServerLocation::Bangladesh,
        ServerLocation::Singapore,
        ServerLocation::Canada,
        ServerLocation::Japan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerLocation::Usa => "USA",
            ServerLocation::Germany => "Germany",
            ServerLocation::Bangladesh => "Bangladesh",
            ServerLocation::Singapore => "Singapore",
            ServerLocation::Canada => "Canada",
            ServerLocation::Japan => "Japan",
        }
    }
}

impl fmt::Display for ServerLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerLocation {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ServerLocation::ALL
            .into_iter()
            .find(|loc| loc.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownLocation(s.to_string()))
    }
}

/// Everything the visitor has entered so far.
///
/// Values are never edited in place: each `with_*` call returns a new
/// configuration, so pricing stays a pure function of it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrialConfiguration {
    domain_label: String,
    extension: Extension,
    location: ServerLocation,
    coupon_code: String,
    /// Discount granted by the applied coupon; belongs to `coupon_code`.
    discount_rate: Rate,
}

impl TrialConfiguration {
    pub fn new(domain_label: impl Into<String>, extension: Extension, location: ServerLocation) -> Self {
        Self {
            domain_label: domain_label.into(),
            extension,
            location,
            coupon_code: String::new(),
            discount_rate: Rate::ZERO,
        }
    }

    pub fn domain_label(&self) -> &str {
        &self.domain_label
    }

    pub fn extension(&self) -> Extension {
        self.extension
    }

    pub fn location(&self) -> ServerLocation {
        self.location
    }

    pub fn coupon_code(&self) -> &str {
        &self.coupon_code
    }

    pub fn discount_rate(&self) -> Rate {
        self.discount_rate
    }

    /// Label and extension joined, e.g. `example.com`.
    pub fn domain_name(&self) -> String {
        format!("{}{}", self.domain_label, self.extension)
    }

    pub fn with_domain_label(&self, domain_label: impl Into<String>) -> Self {
        Self {
            domain_label: domain_label.into(),
            ..self.clone()
        }
    }

    pub fn with_extension(&self, extension: Extension) -> Self {
        Self {
            extension,
            ..self.clone()
        }
    }

    pub fn with_location(&self, location: ServerLocation) -> Self {
        Self {
            location,
            ..self.clone()
        }
    }

    /// Editing the code drops any discount applied for the previous code.
    pub fn with_coupon_code(&self, coupon_code: impl Into<String>) -> Self {
        let coupon_code = coupon_code.into();
        let discount_rate = if coupon_code == self.coupon_code {
            self.discount_rate
        } else {
            Rate::ZERO
        };
        Self {
            coupon_code,
            discount_rate,
            ..self.clone()
        }
    }

    /// Record the discount granted for the current coupon, capped at 100%.
    pub fn with_discount_rate(&self, discount_rate: Rate) -> Self {
        Self {
            discount_rate: discount_rate.min(Rate::FULL),
            ..self.clone()
        }
    }
}
