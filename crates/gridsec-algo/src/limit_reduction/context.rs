//! Contingency contexts: when a reduction applies.
//!
//! A reduction carries a list of contexts. The list authorizes the reduction
//! for a contingency (or for the pre-contingency state) as soon as one entry
//! does; an empty list authorizes it everywhere.
//!
//! | Context | pre-contingency | contingency `c` |
//! |---------|-----------------|-----------------|
//! | `ALL` | yes | yes |
//! | `NONE` | yes | no |
//! | `ONLY_CONTINGENCIES` | no | yes |
//! | `SPECIFIC(x)` | no | iff `c == x` |

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContingencyContext {
    All,
    /// Pre-contingency state only
    #[serde(rename = "NONE")]
    NoContingency,
    OnlyContingencies,
    Specific { contingency_id: String },
}

impl ContingencyContext {
    pub fn specific(contingency_id: impl Into<String>) -> Self {
        ContingencyContext::Specific {
            contingency_id: contingency_id.into(),
        }
    }

    /// Whether this context covers `contingency` (`None` = pre-contingency).
    pub fn is_applicable(&self, contingency: Option<&str>) -> bool {
        match self {
            ContingencyContext::All => true,
            ContingencyContext::NoContingency => contingency.is_none(),
            ContingencyContext::OnlyContingencies => contingency.is_some(),
            ContingencyContext::Specific { contingency_id } => contingency == Some(contingency_id.as_str()),
        }
    }
}

/// Contexts are OR-combined; an empty list applies everywhere.
pub fn is_context_list_applicable(contexts: &[ContingencyContext], contingency: Option<&str>) -> bool {
    contexts.is_empty() || contexts.iter().any(|c| c.is_applicable(contingency))
}
