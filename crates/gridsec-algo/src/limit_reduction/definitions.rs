//! Limit reduction definition files.
//!
//! A definition file lists reductions in evaluation order:
//!
//! ```yaml
//! version: "1.0"
//! reductions:
//!   - limit_type: CURRENT
//!     value: 0.9
//!     contingency_contexts:
//!       - type: SPECIFIC
//!         contingency_id: contingency1
//!     network_element_criteria:
//!       - type: ID_LIST
//!         ids: [NHV1_NHV2_1]
//!     duration_criteria:
//!       - type: PERMANENT
//! ```
//!
//! Every entry goes through [`LimitReduction::builder`], so a file holding an
//! out-of-range factor or a non-reducible limit type fails to load.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use gridsec_core::LimitType;
use serde::{Deserialize, Serialize};

use super::context::ContingencyContext;
use super::criteria::NetworkElementCriterion;
use super::duration::DurationCriterion;
use super::reduction::LimitReduction;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitReductionDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub reductions: Vec<LimitReductionSpec>,
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitReductionSpec {
    pub limit_type: LimitType,
    pub value: f64,
    #[serde(default)]
    pub monitoring_only: bool,
    #[serde(default)]
    pub contingency_contexts: Vec<ContingencyContext>,
    #[serde(default)]
    pub network_element_criteria: Vec<NetworkElementCriterion>,
    #[serde(default)]
    pub duration_criteria: Vec<DurationCriterion>,
}

impl LimitReductionSpec {
    pub fn build(&self) -> Result<LimitReduction> {
        LimitReduction::builder(self.limit_type, self.value)
            .with_monitoring_only(self.monitoring_only)
            .with_contingency_contexts(self.contingency_contexts.iter().cloned())
            .with_network_element_criteria(self.network_element_criteria.iter().cloned())
            .with_duration_criteria(self.duration_criteria.iter().cloned())
            .build()
            .map_err(|err| anyhow!(err))
    }
}

impl From<&LimitReduction> for LimitReductionSpec {
    fn from(reduction: &LimitReduction) -> Self {
        Self {
            limit_type: reduction.limit_type(),
            value: reduction.value(),
            monitoring_only: reduction.is_monitoring_only(),
            contingency_contexts: reduction.contingency_contexts().to_vec(),
            network_element_criteria: reduction.network_element_criteria().to_vec(),
            duration_criteria: reduction.duration_criteria().to_vec(),
        }
    }
}

impl LimitReductionDocument {
    pub fn from_reductions(reductions: &[LimitReduction]) -> Self {
        Self {
            version: default_version(),
            reductions: reductions.iter().map(LimitReductionSpec::from).collect(),
        }
    }

    /// Validate every entry, in file order.
    pub fn resolve(&self) -> Result<Vec<LimitReduction>> {
        self.reductions
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                spec.build()
                    .with_context(|| format!("limit reduction #{index} ({})", spec.limit_type))
            })
            .collect()
    }
}

pub fn load_document_from_path(path: &Path) -> Result<LimitReductionDocument> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading limit reductions '{}'", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).context("parsing limit reductions yaml")
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).context("parsing limit reductions json")
        }
        _ => serde_yaml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .context("parsing limit reductions"),
    }
}

/// Load and validate the reductions of a YAML or JSON definition file.
pub fn load_limit_reductions(path: &Path) -> Result<Vec<LimitReduction>> {
    load_document_from_path(path)?
        .resolve()
        .with_context(|| format!("invalid limit reductions in '{}'", path.display()))
}

pub fn parse_limit_reductions_yaml(data: &str) -> Result<Vec<LimitReduction>> {
    let document: LimitReductionDocument =
        serde_yaml::from_str(data).context("parsing limit reductions yaml")?;
    document.resolve()
}

pub fn parse_limit_reductions_json(data: &str) -> Result<Vec<LimitReduction>> {
    let document: LimitReductionDocument =
        serde_json::from_str(data).context("parsing limit reductions json")?;
    document.resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
version: "1.0"
reductions:
  - limit_type: CURRENT
    value: 0.9
    contingency_contexts:
      - type: SPECIFIC
        contingency_id: contingency1
    network_element_criteria:
      - type: ID_LIST
        ids: [NHV1_NHV2_1]
    duration_criteria:
      - type: PERMANENT
  - limit_type: CURRENT
    value: 0.2
    monitoring_only: true
"#;

    #[test]
    fn test_parse_yaml() {
        let reductions = parse_limit_reductions_yaml(YAML).unwrap();
        assert_eq!(reductions.len(), 2);
        assert_eq!(reductions[0].value(), 0.9);
        assert!(reductions[0].is_applicable_to_contingency(Some("contingency1")));
        assert!(!reductions[0].is_applicable_to_contingency(None));
        assert!(reductions[1].is_monitoring_only());
        assert!(reductions[1].network_element_criteria().is_empty());
    }

    #[test]
    fn test_invalid_entry_names_its_position() {
        let yaml = "reductions:\n  - limit_type: CURRENT\n    value: 0.5\n  - limit_type: VOLTAGE\n    value: 0.5\n";
        let err = parse_limit_reductions_yaml(yaml).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("limit reduction #1 (VOLTAGE)"), "{message}");
    }

    #[test]
    fn test_json_matches_yaml() {
        let reductions = parse_limit_reductions_yaml(YAML).unwrap();
        let json = serde_json::to_string(&LimitReductionDocument::from_reductions(&reductions)).unwrap();
        assert_eq!(parse_limit_reductions_json(&json).unwrap(), reductions);
    }
}
