//! Operator input bounds
//!
//! Each field has an inclusive range and a default shown before any
//! interaction. Operator surfaces render these bounds on their controls and
//! call [`InputBounds::validate`] before a record reaches the predictor.

use crate::error::InputError;
use crate::models::InputRecord;
use serde::{Deserialize, Serialize};

/// Inclusive range and default for one numeric field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl FieldBounds {
    pub const fn new(min: u32, max: u32, default: u32) -> Self {
        Self { min, max, default }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.min as i64 && value <= self.max as i64
    }

    pub fn clamp(&self, value: i64) -> u32 {
        value.clamp(self.min as i64, self.max as i64) as u32
    }

    fn check(&self, field: &'static str, value: i64) -> Result<u32, InputError> {
        if self.contains(value) {
            Ok(value as u32)
        } else {
            Err(InputError {
                field,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Customer age in years
pub const AGE_BOUNDS: FieldBounds = FieldBounds::new(18, 100, 30);

/// Subscription length in months
pub const SUBSCRIPTION_MONTHS_BOUNDS: FieldBounds = FieldBounds::new(0, 120, 12);

/// Number of complaints filed
pub const COMPLAINT_COUNT_BOUNDS: FieldBounds = FieldBounds::new(0, 20, 2);

/// Bounds for all three fields of an InputRecord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBounds {
    pub age: FieldBounds,
    pub subscription_months: FieldBounds,
    pub complaint_count: FieldBounds,
}

impl InputBounds {
    pub const fn canonical() -> Self {
        Self {
            age: AGE_BOUNDS,
            subscription_months: SUBSCRIPTION_MONTHS_BOUNDS,
            complaint_count: COMPLAINT_COUNT_BOUNDS,
        }
    }

    /// Record pre-filled with every field's default
    pub fn defaults(&self) -> InputRecord {
        InputRecord {
            age: self.age.default,
            subscription_months: self.subscription_months.default,
            complaint_count: self.complaint_count.default,
        }
    }

    /// Build a record from raw values, rejecting the first field out of range
    pub fn validate_raw(
        &self,
        age: i64,
        subscription_months: i64,
        complaint_count: i64,
    ) -> Result<InputRecord, InputError> {
        Ok(InputRecord {
            age: self.age.check("age", age)?,
            subscription_months: self
                .subscription_months
                .check("subscription_months", subscription_months)?,
            complaint_count: self.complaint_count.check("complaint_count", complaint_count)?,
        })
    }

    pub fn validate(&self, record: InputRecord) -> Result<InputRecord, InputError> {
        self.validate_raw(
            record.age as i64,
            record.subscription_months as i64,
            record.complaint_count as i64,
        )
    }

    /// Clamp raw values into range instead of rejecting them
    pub fn clamp_raw(&self, age: i64, subscription_months: i64, complaint_count: i64) -> InputRecord {
        InputRecord {
            age: self.age.clamp(age),
            subscription_months: self.subscription_months.clamp(subscription_months),
            complaint_count: self.complaint_count.clamp(complaint_count),
        }
    }
}

impl Default for InputBounds {
    fn default() -> Self {
        Self::canonical()
    }
}

impl Default for InputRecord {
    fn default() -> Self {
        InputBounds::canonical().defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let record = InputRecord::default();
        assert_eq!(record.age, 30);
        assert_eq!(record.subscription_months, 12);
        assert_eq!(record.complaint_count, 2);
    }

    #[test]
    fn test_defaults_are_within_bounds() {
        let bounds = InputBounds::canonical();
        assert!(bounds.validate(bounds.defaults()).is_ok());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = InputBounds::canonical();
        assert!(bounds.validate_raw(18, 0, 0).is_ok());
        assert!(bounds.validate_raw(100, 120, 20).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let bounds = InputBounds::canonical();

        let err = bounds.validate_raw(17, 12, 2).unwrap_err();
        assert_eq!(err.field, "age");

        let err = bounds.validate_raw(30, 121, 2).unwrap_err();
        assert_eq!(err.field, "subscription_months");

        let err = bounds.validate_raw(30, 12, -1).unwrap_err();
        assert_eq!(err.field, "complaint_count");
        assert_eq!(err.value, -1);
    }

    #[test]
    fn test_clamp() {
        let bounds = InputBounds::canonical();
        let record = bounds.clamp_raw(5, 500, -3);
        assert_eq!(record.age, 18);
        assert_eq!(record.subscription_months, 120);
        assert_eq!(record.complaint_count, 0);
    }
}
