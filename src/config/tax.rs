use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GstConfig {
    pub cgst_rate: f64,
    pub sgst_rate: f64,
}

impl GstConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [("cgst_rate", self.cgst_rate), ("sgst_rate", self.sgst_rate)] {
            if !(0.0..1.0).contains(&rate) {
                return Err(Error::ConfigError(format!("gst.{} must be in [0, 1), got {}", name, rate)));
            }
        }
        Ok(())
    }
}

impl Default for GstConfig {
    fn default() -> Self {
        GstConfig {
            cgst_rate: 0.015,  // 1.5%
            sgst_rate: 0.015,  // 1.5%
        }
    }
}
