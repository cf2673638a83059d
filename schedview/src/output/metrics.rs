use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Optimizer performance metrics. Kept as the raw JSON object so that
/// fields this crate does not know about survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformanceMetrics {
    raw: Value,
}

pub const TOTAL_COMPLETION_TIME: &str = "total_completion_time_minutes";
pub const AVERAGE_DELAY: &str = "average_delay_minutes";
pub const SUCCESS_RATE: &str = "success_rate_percent";
pub const TOTAL_DELAY: &str = "total_delay_minutes";

impl PerformanceMetrics {
    pub fn new(raw: Value) -> PerformanceMetrics {
        PerformanceMetrics { raw }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        match self.raw {
            Value::Null => true,
            Value::Object(ref m) => m.is_empty(),
            _ => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.raw.get(key).and_then(Value::as_f64)
    }

    pub fn total_completion_time(&self) -> Option<f64> { self.get(TOTAL_COMPLETION_TIME) }
    pub fn average_delay(&self) -> Option<f64> { self.get(AVERAGE_DELAY) }
    pub fn success_rate(&self) -> Option<f64> { self.get(SUCCESS_RATE) }
    pub fn total_delay(&self) -> Option<f64> { self.get(TOTAL_DELAY) }

    /// The headline values, labelled, with `N/A` for missing ones.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let show = |v: Option<f64>, unit: &str| match v {
            Some(x) => format!("{}{}", x, unit),
            None => format!("N/A{}", unit),
        };
        vec![
            ("Total Completion Time", show(self.total_completion_time(), " min")),
            ("Average Delay", show(self.average_delay(), " min")),
            ("Success Rate", show(self.success_rate(), "%")),
            ("Total Delay", show(self.total_delay(), " min")),
        ]
    }
}

impl fmt::Display for PerformanceMetrics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (label, value) in self.summary() {
            writeln!(f, "{}: {}", label, value)?;
        }
        Ok(())
    }
}
