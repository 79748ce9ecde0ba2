//! Feature vector construction for classifier inference
//!
//! The classifier consumes a positional triple. Field identity is carried by
//! position only, so the order here must match the order the model was
//! trained on. Artifacts that declare feature names are checked against
//! [`FEATURE_NAMES`] when they are loaded.

use crate::models::InputRecord;

/// Number of input features expected by the model
pub const NUM_FEATURES: usize = 3;

/// Training order of the features
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = ["age", "subscription_months", "complaint_count"];

/// Ordered feature values for one InputRecord
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; NUM_FEATURES]);

impl FeatureVector {
    pub fn from_record(record: &InputRecord) -> Self {
        Self([
            record.age as f32,
            record.subscription_months as f32,
            record.complaint_count as f32,
        ])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Feature values paired with their names, in training order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<&InputRecord> for FeatureVector {
    fn from(record: &InputRecord) -> Self {
        Self::from_record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_order() {
        let record = InputRecord {
            age: 45,
            subscription_months: 7,
            complaint_count: 3,
        };
        let features = FeatureVector::from_record(&record);
        assert_eq!(features.as_slice(), &[45.0, 7.0, 3.0]);
    }

    #[test]
    fn test_named_pairs_follow_training_order() {
        let record = InputRecord {
            age: 45,
            subscription_months: 7,
            complaint_count: 3,
        };
        let named: Vec<_> = FeatureVector::from(&record).named().collect();
        assert_eq!(
            named,
            vec![
                ("age", 45.0),
                ("subscription_months", 7.0),
                ("complaint_count", 3.0)
            ]
        );
    }
}
