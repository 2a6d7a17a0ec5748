//! Business context supplied by the caller at pipeline start
//!
//! Immutable for the run; read by every stage agent and by the feedback
//! gate's urgency heuristic. Every field defaults safely when absent.

use serde::{Deserialize, Serialize};

/// Decision-maker strings containing any of these markers indicate an
/// executive-tier audience
const EXECUTIVE_MARKERS: [&str; 7] = [
    "ceo", "cfo", "coo", "cto", "board", "chief", "president",
];

/// How urgent the business question is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }
}

impl std::str::FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            "critical" => Ok(Urgency::Critical),
            other => Err(format!("unknown urgency: {}", other)),
        }
    }
}

/// Free-form description of the business situation behind the dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessContext {
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub kpis: Vec<String>,
    #[serde(default)]
    pub audience: String,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub decision_makers: Vec<String>,
    #[serde(default)]
    pub time_horizon: String,
}

impl BusinessContext {
    pub fn new(industry: impl Into<String>) -> Self {
        Self {
            industry: industry.into(),
            ..Default::default()
        }
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_decision_makers(mut self, decision_makers: Vec<String>) -> Self {
        self.decision_makers = decision_makers;
        self
    }

    /// True when any decision-maker string names an executive tier
    pub fn has_executive_audience(&self) -> bool {
        self.decision_makers.iter().any(|dm| {
            let dm = dm.to_lowercase();
            EXECUTIVE_MARKERS.iter().any(|marker| dm.contains(marker))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_defaults_to_medium() {
        let context: BusinessContext = serde_json::from_str("{}").unwrap();
        assert_eq!(context.urgency, Urgency::Medium);
    }

    #[test]
    fn test_executive_audience_detection() {
        let context = BusinessContext::new("SaaS")
            .with_decision_makers(vec!["CEO Jane Doe".to_string()]);
        assert!(context.has_executive_audience());

        let context = BusinessContext::new("SaaS")
            .with_decision_makers(vec!["Board of Directors".to_string()]);
        assert!(context.has_executive_audience());

        let context = BusinessContext::new("SaaS")
            .with_decision_makers(vec!["Regional sales lead".to_string()]);
        assert!(!context.has_executive_audience());
    }

    #[test]
    fn test_urgency_parse() {
        assert_eq!("critical".parse::<Urgency>().unwrap(), Urgency::Critical);
        assert_eq!("LOW".parse::<Urgency>().unwrap(), Urgency::Low);
        assert!("urgent-ish".parse::<Urgency>().is_err());
    }
}
