//! Field normalization
//!
//! Derives four scalar output fields from three nested input fields:
//! `name.first`/`name.last` become `firstName`/`lastName`, `location`
//! collapses to one formatted string, `phone` is stripped to its digits.
//!
//! The four operations are pure, consume exactly one field's value each,
//! and have no ordering dependency between them, so the batch layer is free
//! to apply them per row in any order, repeatedly.

mod batch;

pub use batch::normalize_batch;

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").expect("valid regex"));

/// View over a `name` mapping; a missing key is `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFields {
    pub first: Option<String>,
    pub last: Option<String>,
}

/// View over a `location` mapping; a missing key is `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationFields {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

/// Returns `name.first`, or the empty string when absent. Never fails.
pub fn first_name(name: &NameFields) -> String {
    name.first.clone().unwrap_or_default()
}

/// Returns `name.last`, or the empty string when absent. Never fails.
pub fn last_name(name: &NameFields) -> String {
    name.last.clone().unwrap_or_default()
}

/// Joins street, city, state, postcode and country with `", "`, in that
/// fixed order.
///
/// Only `street` tolerates absence (it defaults to the empty string, keeping
/// the leading separator). A missing `city`, `state`, `postcode` or `country`
/// is a `MissingField` error.
pub fn format_location(loc: &LocationFields) -> Result<String> {
    let street = loc.street.as_deref().unwrap_or("");
    let city = require(&loc.city, "city")?;
    let state = require(&loc.state, "state")?;
    let postcode = require(&loc.postcode, "postcode")?;
    let country = require(&loc.country, "country")?;

    Ok(format!("{street}, {city}, {state}, {postcode}, {country}"))
}

/// Strips every non-digit character, preserving digit order.
///
/// Empty input yields empty output; digit count is not validated.
pub fn digits_only(raw: &str) -> String {
    NON_DIGIT.replace_all(raw, "").into_owned()
}

fn require<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    value.as_deref().ok_or_else(|| Error::missing_field(field))
}

#[cfg(test)]
mod tests;
