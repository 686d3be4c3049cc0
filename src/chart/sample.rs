use serde::{Deserialize, Serialize};

/// One timestamped reading. `time` is milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: i64,
    pub value: f64,
    pub category: String,
}

impl Sample {
    pub fn new(time: i64, value: f64, category: impl Into<String>) -> Self {
        Self {
            time,
            value,
            category: category.into(),
        }
    }

    /// Average series are drawn thinner, translucent and in the secondary colour.
    pub fn is_average_key(category: &str) -> bool {
        category.starts_with("AVG")
    }
}
