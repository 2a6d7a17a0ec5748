//! Stage agents' document types and ordering
//!
//! The slide representation evolves through five ordered transformers:
//! Summarizer → Outliner → Stylist → ChartSpecifier → Composer. Each
//! stage's output schema is a strict transform of the previous one, and
//! every slide id seen at one stage must survive to the next unless it is
//! explicitly dropped with a reason.

pub mod continuity;
pub mod documents;

use serde::{Deserialize, Serialize};

/// The five ordered transformers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Summarizer,
    Outliner,
    Stylist,
    ChartSpecifier,
    Composer,
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Summarizer => "summarizer",
            Stage::Outliner => "outliner",
            Stage::Stylist => "stylist",
            Stage::ChartSpecifier => "chart_specifier",
            Stage::Composer => "composer",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Stage::Summarizer => "Summarizer",
            Stage::Outliner => "Outliner",
            Stage::Stylist => "Stylist",
            Stage::ChartSpecifier => "Chart Specifier",
            Stage::Composer => "Composer",
        }
    }

    /// Fixed execution order
    pub fn ordered() -> [Stage; 5] {
        [
            Stage::Summarizer,
            Stage::Outliner,
            Stage::Stylist,
            Stage::ChartSpecifier,
            Stage::Composer,
        ]
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_fixed() {
        let order = Stage::ordered();
        assert_eq!(order[0], Stage::Summarizer);
        assert_eq!(order[4], Stage::Composer);
    }
}
