//! Date-scoped ticket numbers
//!
//! Tickets carry a human-readable number of the form `INQ-YYYYMMDD-NNNN`:
//! a fixed prefix, the allocation day, and a 4-digit zero-padded sequence
//! that restarts at 0001 each day. The format is bit-exact and immutable
//! once assigned; allocation itself lives in
//! [`crate::lifecycle::TicketNumberAllocator`].

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{InquiryDeskError, Result};

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^INQ-(\d{8})-(\d{4})$").expect("ticket number pattern"));

/// Highest suffix a day can carry before allocation must fail hard
pub const MAX_DAILY_SUFFIX: u32 = 9999;

/// A validated `INQ-YYYYMMDD-NNNN` ticket number
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketNumber(String);

impl TicketNumber {
    /// The day prefix numbers for `day` share, e.g. `INQ-20250115-`
    #[must_use]
    pub fn prefix_for(day: NaiveDate) -> String {
        format!("INQ-{}-", day.format("%Y%m%d"))
    }

    /// Compose a number from a day and sequence suffix
    ///
    /// Suffixes are 1-based and zero-padded to 4 digits. A suffix outside
    /// `1..=9999` is a [`InquiryDeskError::NumberOverflow`]: the daily
    /// capacity is exhausted and the caller must surface that instead of
    /// widening or wrapping the field.
    pub fn compose(day: NaiveDate, suffix: u32) -> Result<Self> {
        if suffix == 0 || suffix > MAX_DAILY_SUFFIX {
            return Err(InquiryDeskError::NumberOverflow {
                prefix: Self::prefix_for(day),
            });
        }
        Ok(Self(format!("{}{suffix:04}", Self::prefix_for(day))))
    }

    /// Parse a string already known to be a ticket number
    pub fn parse(value: &str) -> Result<Self> {
        if NUMBER_RE.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(InquiryDeskError::custom(format!(
                "invalid ticket number '{value}' (expected INQ-YYYYMMDD-NNNN)"
            )))
        }
    }

    /// The day prefix portion, including the trailing dash
    #[must_use]
    pub fn day_prefix(&self) -> &str {
        // Safe slice: the pattern fixes the layout at parse/compose time
        &self.0[..self.0.len() - 4]
    }

    /// The numeric sequence suffix
    #[must_use]
    pub fn suffix(&self) -> u32 {
        self.0[self.0.len() - 4..]
            .parse()
            .expect("suffix digits validated on construction")
    }

    /// The number as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TicketNumber {
    type Err = InquiryDeskError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
