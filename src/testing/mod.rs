use single_utilities::traits::FloatOps;
use std::collections::HashMap;

pub mod effect;
pub mod inference;

pub mod utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alternative {
    TwoSided,
    Less,
    Greater,
}

/// How the p-value of a rank test was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PValueMethod {
    /// Exact null distribution of U (no ties, a small sample).
    Exact,
    /// Normal approximation with tie and continuity correction.
    Asymptotic,
    /// Nothing to compute: NaN input or every value tied.
    Degenerate,
}

#[derive(Debug, Clone)]
pub struct TestResult<T> {
    /// The test statistic value (U of the first sample)
    pub statistic: T,
    /// The p-value of the test, NaN when the test is degenerate
    pub p_value: T,
    pub method: PValueMethod,
    /// Effect size measurement
    pub effect_size: Option<T>,
    /// Standard error of the test statistic
    pub standard_error: Option<T>,
    /// Additional test-specific information
    pub metadata: HashMap<String, T>,
}

impl<T> TestResult<T>
where
    T: FloatOps,
{
    /// Create a new test result with minimal information
    pub fn new(statistic: T, p_value: T, method: PValueMethod) -> Self {
        TestResult {
            statistic,
            p_value,
            method,
            effect_size: None,
            standard_error: None,
            metadata: HashMap::new(),
        }
    }

    /// A result for a test that could not be computed.
    pub fn degenerate(statistic: T) -> Self {
        TestResult::new(
            statistic,
            <T as num_traits::Float>::nan(),
            PValueMethod::Degenerate,
        )
    }

    pub fn with_effect_size(mut self, effect_size: T) -> Self {
        self.effect_size = Some(effect_size);
        self
    }

    pub fn with_standard_error(mut self, se: T) -> Self {
        self.standard_error = Some(se);
        self
    }

    /// Add additional metadata
    pub fn with_metadata(mut self, key: &str, value: T) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn is_degenerate(&self) -> bool {
        self.method == PValueMethod::Degenerate || num_traits::Float::is_nan(self.p_value)
    }

    /// Check if the result is statistically significant at the given threshold
    pub fn is_significant(&self, alpha: T) -> bool {
        self.p_value < alpha
    }
}
