//! Validation that depends on the current time.

use chrono::{DateTime, Duration, Utc};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::Product;

/// Source of "now" for time-dependent rules
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// An expiration date, when present, must fall strictly after
/// `now + min_days`. A date exactly on the boundary is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationDateRule {
    pub min_days: i64,
}

impl ExpirationDateRule {
    pub const DEFAULT: Self = Self { min_days: 30 };

    pub fn new(min_days: i64) -> Self {
        Self { min_days }
    }

    pub fn is_valid(&self, expiration_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match expiration_date {
            None => true,
            Some(date) => date > now + Duration::days(self.min_days),
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Expiration date must expire not less than {} days since now.",
            self.min_days
        )
    }

    pub fn check(
        &self,
        expiration_date: Option<DateTime<Utc>>,
        clock: &dyn Clock,
    ) -> Result<(), ValidationError> {
        if self.is_valid(expiration_date, clock.now()) {
            Ok(())
        } else {
            Err(ValidationError::new("expiration_date").with_message(Cow::Owned(self.message())))
        }
    }
}

impl Default for ExpirationDateRule {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runs the declarative field rules of [`Product`] plus the expiration
/// rule, collecting every violation.
pub fn validate_product(
    product: &Product,
    clock: &dyn Clock,
    rule: ExpirationDateRule,
) -> Result<(), ValidationErrors> {
    let mut errors = match product.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    if let Err(error) = rule.check(product.expiration_date, clock) {
        errors.add("expirationDate", error);
    }

    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
