use serde::{Deserialize, Serialize};
use std::fmt;

/// Purity marker every accepted rate label must carry.
const FINE_PURITY: &str = "999";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metal {
    Gold,
    Silver,
}

impl Metal {
    pub const ALL: [Metal; 2] = [Metal::Gold, Metal::Silver];

    pub fn name(&self) -> &'static str {
        match self {
            Metal::Gold => "gold",
            Metal::Silver => "silver",
        }
    }

    /// Case-insensitive match of a provider label ("Gold 999 Rate", "silver999") to a metal.
    pub fn from_rate_label(label: &str) -> Option<Metal> {
        let label = label.to_lowercase();
        if !label.contains(FINE_PURITY) {
            return None;
        }

        Metal::ALL.into_iter().find(|metal| label.contains(metal.name()))
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
