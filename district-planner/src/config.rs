use crate::geometry::Vector;
use serde::{Deserialize, Serialize};

// Input limits for plan documents
pub const MAX_NODES: usize = 10_000;
pub const MAX_COORDINATE_VALUE: f64 = 1_000_000.0;

/// Settings for building a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Reference axis for left/right classification
    #[serde(default = "default_up")]
    pub up: [f64; 3],
    /// Fail when some node cannot be reached from the start node. When
    /// false, every connected component is searched on its own.
    #[serde(default = "default_require_connected")]
    pub require_connected: bool,
    /// Upper bound on distinct cycles before the search gives up
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,
}

fn default_up() -> [f64; 3] {
    [0.0, 1.0, 0.0] // Y-up, roads lie on the XZ plane
}

fn default_require_connected() -> bool {
    true
}

fn default_max_cycles() -> usize {
    10_000
}

impl Default for PlanConfig {
    fn default() -> Self {
        PlanConfig {
            up: default_up(),
            require_connected: default_require_connected(),
            max_cycles: default_max_cycles(),
        }
    }
}

impl PlanConfig {
    pub fn up_axis(&self) -> Vector {
        Vector::from(self.up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: PlanConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config, PlanConfig::default());
        assert_eq!(config.up_axis(), Vector::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_partial_override() {
        let config: PlanConfig =
            serde_json::from_str(r#"{"up": [0.0, 0.0, 1.0], "max_cycles": 50}"#).unwrap();

        assert_eq!(config.up, [0.0, 0.0, 1.0]);
        assert_eq!(config.max_cycles, 50);
        assert!(config.require_connected);
    }
}
