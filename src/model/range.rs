//! Range specification for isochrone requests.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Unit shared by every range value of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeUnit {
    /// Travel time in seconds.
    Seconds,
    /// Travel distance in meters.
    Meters,
}

impl RangeUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Meters => "meters",
        }
    }
}

/// Strictly ascending sequence of range values.
///
/// Zero is admitted as a degenerate range producing an empty band;
/// negative, non-finite or non-ascending values are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    values: Vec<f64>,
    unit: RangeUnit,
}

impl RangeSpec {
    pub fn new(values: Vec<f64>, unit: RangeUnit) -> Result<Self, Error> {
        if values.is_empty() {
            return Err(Error::InvalidRanges("no range values given".to_string()));
        }
        for value in &values {
            if !value.is_finite() || *value < 0.0 {
                return Err(Error::InvalidRanges(format!(
                    "range values must be finite and non-negative, got {value}"
                )));
            }
        }
        if values.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::InvalidRanges(
                "range values must be strictly ascending".to_string(),
            ));
        }
        Ok(Self { values, unit })
    }

    /// Subdivides `(0, max]` into evenly spaced bands of width `interval`.
    /// `max` itself is always the last band.
    pub fn subdivided(max: f64, interval: f64, unit: RangeUnit) -> Result<Self, Error> {
        if !max.is_finite() || max <= 0.0 || !interval.is_finite() || interval <= 0.0 {
            return Err(Error::InvalidRanges(format!(
                "subdivision requires positive max and interval, got max {max}, interval {interval}"
            )));
        }
        let mut values = Vec::new();
        let mut value = interval;
        while value < max {
            values.push(value);
            value += interval;
        }
        values.push(max);
        Self::new(values, unit)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn unit(&self) -> RangeUnit {
        self.unit
    }

    /// Largest requested range; traversal is bounded by this.
    pub fn max(&self) -> f64 {
        *self.values.last().expect("RangeSpec is never empty")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_descending_values() {
        assert!(RangeSpec::new(vec![300.0, 200.0], RangeUnit::Seconds).is_err());
    }

    #[test]
    fn rejects_negative_values() {
        assert!(RangeSpec::new(vec![-5.0, 100.0], RangeUnit::Seconds).is_err());
    }

    #[test]
    fn rejects_empty_spec() {
        assert!(RangeSpec::new(vec![], RangeUnit::Meters).is_err());
    }

    #[test]
    fn admits_zero_as_degenerate_band() {
        let spec = RangeSpec::new(vec![0.0, 60.0], RangeUnit::Seconds).unwrap();
        assert_eq!(spec.values(), &[0.0, 60.0]);
    }

    #[test]
    fn subdivision_covers_the_full_interval() {
        let spec = RangeSpec::subdivided(900.0, 300.0, RangeUnit::Seconds).unwrap();
        assert_eq!(spec.values(), &[300.0, 600.0, 900.0]);
        assert_eq!(spec.max(), 900.0);
    }

    #[test]
    fn subdivision_keeps_a_partial_last_band() {
        let spec = RangeSpec::subdivided(700.0, 300.0, RangeUnit::Seconds).unwrap();
        assert_eq!(spec.values(), &[300.0, 600.0, 700.0]);
    }
}
