//! Cohort key - subject plus threshold pair

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Sessions sharing a subject and an (easy, hard) threshold-rate pair.
///
/// Equality is exact: rates compare by bit pattern, so two sessions whose
/// rates differ in the last ulp belong to different cohorts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortKey {
    subject: String,
    easy_rate: f64,
    hard_rate: f64,
}

impl CohortKey {
    /// Create a cohort key.
    #[must_use]
    pub fn new(subject: impl Into<String>, easy_rate: f64, hard_rate: f64) -> Self {
        Self {
            subject: subject.into(),
            easy_rate,
            hard_rate,
        }
    }

    /// Subject identifier.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Easy-patch rate after the threshold change.
    #[must_use]
    pub const fn easy_rate(&self) -> f64 {
        self.easy_rate
    }

    /// Hard-patch rate after the threshold change.
    #[must_use]
    pub const fn hard_rate(&self) -> f64 {
        self.hard_rate
    }

    /// Display label, e.g. `BAA-1103045 0.01 0.0025`.
    ///
    /// This is the dropdown value and the callback lookup key.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Threshold-group part of the label, e.g. `0.01 0.0025`.
    #[must_use]
    pub fn group_label(&self) -> String {
        format!("{} {}", Rate(self.easy_rate), Rate(self.hard_rate))
    }
}

/// Rate rendered the way the analysis pipeline stringifies floats: shortest
/// round-trip digits, a trailing `.0` on whole numbers, and scientific
/// notation below 1e-4 or from 1e16 with a signed two-digit exponent
/// (`1e-05`, `2.5e+16`).
struct Rate(f64);

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_nan() {
            return f.write_str("nan");
        }
        if self.0.is_infinite() {
            return f.write_str(if self.0 > 0.0 { "inf" } else { "-inf" });
        }
        let repr = format!("{:?}", self.0);
        match repr.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = exponent
                    .strip_prefix('-')
                    .map_or(("+", exponent), |digits| ("-", digits));
                write!(f, "{mantissa}e{sign}{digits:0>2}")
            }
            None => f.write_str(&repr),
        }
    }
}

impl PartialEq for CohortKey {
    fn eq(&self, other: &Self) -> bool {
        self.subject == other.subject
            && self.easy_rate.to_bits() == other.easy_rate.to_bits()
            && self.hard_rate.to_bits() == other.hard_rate.to_bits()
    }
}

impl Eq for CohortKey {}

impl Hash for CohortKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.subject.hash(state);
        self.easy_rate.to_bits().hash(state);
        self.hard_rate.to_bits().hash(state);
    }
}

impl fmt::Display for CohortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.subject,
            Rate(self.easy_rate),
            Rate(self.hard_rate)
        )
    }
}
