//! Donation rules: statuses, amount validation and karma accrual.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Cents;

/// Maximum length of the optional message attached to a donation.
pub const MAX_DONATION_MESSAGE_LEN: usize = 500;

/// Minor units per whole currency unit.
pub const CENTS_PER_UNIT: Cents = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Pending,
    Completed,
    Failed,
}

impl DonationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether a donation in this status counts toward progress and karma.
    pub fn counts(self) -> bool {
        self == Self::Completed
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DonationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(CoreError::Validation(format!(
                "Unknown donation status '{other}'"
            ))),
        }
    }
}

/// Validate a single donation amount. Amounts are strictly positive cents.
pub fn validate_donation_amount(amount: Cents) -> Result<(), CoreError> {
    if amount <= 0 {
        return Err(CoreError::Validation(format!(
            "Donation amount must be positive, got {amount}"
        )));
    }
    Ok(())
}

/// Validate the optional donor message.
pub fn validate_donation_message(message: Option<&str>) -> Result<(), CoreError> {
    match message {
        Some(m) if m.chars().count() > MAX_DONATION_MESSAGE_LEN => Err(CoreError::Validation(
            format!("Donation message must be at most {MAX_DONATION_MESSAGE_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

/// Parse a decimal currency string (e.g. `"12.50"`) into cents.
///
/// Rounds to the nearest cent, half away from zero. Non-numeric and
/// non-positive inputs are rejected.
pub fn parse_currency_amount(input: &str) -> Result<Cents, CoreError> {
    let trimmed = input.trim().trim_start_matches('$');
    let value: f64 = trimmed
        .parse()
        .map_err(|_| CoreError::Validation(format!("'{input}' is not a valid amount")))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Amount must be a positive number, got '{input}'"
        )));
    }
    let cents = (value * CENTS_PER_UNIT as f64).round();
    if cents > i64::MAX as f64 {
        return Err(CoreError::Validation(format!("Amount '{input}' is too large")));
    }
    let cents = cents as Cents;
    validate_donation_amount(cents)?;
    Ok(cents)
}

/// Karma earned for a completed donation: one point per whole currency
/// unit, never less than one.
pub fn karma_for_donation(amount: Cents) -> i64 {
    (amount / CENTS_PER_UNIT).max(1)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn only_completed_counts() {
        assert!(DonationStatus::Completed.counts());
        assert!(!DonationStatus::Pending.counts());
        assert!(!DonationStatus::Failed.counts());
    }

    #[test]
    fn status_parses() {
        assert_eq!("completed".parse::<DonationStatus>().unwrap(), DonationStatus::Completed);
        assert_matches!("refunded".parse::<DonationStatus>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(validate_donation_amount(1).is_ok());
        assert_matches!(validate_donation_amount(0), Err(CoreError::Validation(_)));
        assert_matches!(validate_donation_amount(-1), Err(CoreError::Validation(_)));
    }

    #[test]
    fn long_message_is_rejected() {
        let message = "x".repeat(MAX_DONATION_MESSAGE_LEN + 1);
        assert!(validate_donation_message(None).is_ok());
        assert!(validate_donation_message(Some("thanks!")).is_ok());
        assert_matches!(
            validate_donation_message(Some(&message)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn parses_decimal_amounts_to_cents() {
        assert_eq!(parse_currency_amount("25").unwrap(), 2_500);
        assert_eq!(parse_currency_amount("12.50").unwrap(), 1_250);
        assert_eq!(parse_currency_amount(" $8.10 ").unwrap(), 810);
        assert_eq!(parse_currency_amount("0.01").unwrap(), 1);
    }

    #[test]
    fn rejects_bad_amount_strings() {
        for input in ["", "abc", "-5", "0", "0.001", "NaN", "inf"] {
            assert_matches!(
                parse_currency_amount(input),
                Err(CoreError::Validation(_)),
                "input {input:?} should be rejected"
            );
        }
    }

    #[test]
    fn karma_is_one_point_per_unit_with_floor_of_one() {
        assert_eq!(karma_for_donation(2_500), 25);
        assert_eq!(karma_for_donation(2_599), 25);
        assert_eq!(karma_for_donation(50), 1);
    }
}
