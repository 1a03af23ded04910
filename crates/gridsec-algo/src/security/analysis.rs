//! Parallel contingency analysis.
//!
//! For every contingency, on its own worker:
//!
//! 1. trip the contingency elements and apply the result to a working copy
//! 2. ask the [`OperatingPointProvider`] for the post-contingency values
//! 3. move the worker's [`ReducedLimitsComputer`] to that contingency
//! 4. compare each value with its reduced limits
//!
//! A contingency that fails (unknown element, provider error) is reported as
//! failed and the run goes on.

use anyhow::{Context, Result};
use gridsec_core::{GridsecResult, LimitType, Network};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::provider::{OperatingPoint, OperatingPointProvider};
use super::violation::{detect_violation, LimitViolation};
use crate::contingency::{apply_tripping, Contingency};
use crate::limit_reduction::ReducedLimitsComputer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityAnalysisConfig {
    /// Worker threads, 0 = one per CPU
    #[serde(default)]
    pub threads: usize,
    /// Check against monitoring-only reductions instead of the regular ones
    #[serde(default)]
    pub monitoring_only: bool,
    #[serde(default = "default_limit_types")]
    pub limit_types: Vec<LimitType>,
    #[serde(default = "default_true")]
    pub evaluate_pre_contingency: bool,
}

fn default_limit_types() -> Vec<LimitType> {
    vec![LimitType::Current]
}

fn default_true() -> bool {
    true
}

impl Default for SecurityAnalysisConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            monitoring_only: false,
            limit_types: default_limit_types(),
            evaluate_pre_contingency: default_true(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComputationStatus {
    Converged,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostContingencyResult {
    pub contingency_id: String,
    pub status: ComputationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Switches opened plus terminals disconnected on the working copy
    pub tripped_elements: usize,
    pub violations: Vec<LimitViolation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityAnalysisReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_contingency: Option<Vec<LimitViolation>>,
    pub post_contingency: Vec<PostContingencyResult>,
}

impl SecurityAnalysisReport {
    pub fn failed(&self) -> impl Iterator<Item = &PostContingencyResult> {
        self.post_contingency
            .iter()
            .filter(|r| r.status == ComputationStatus::Failed)
    }

    pub fn result(&self, contingency_id: &str) -> Option<&PostContingencyResult> {
        self.post_contingency
            .iter()
            .find(|r| r.contingency_id == contingency_id)
    }

    pub fn total_violations(&self) -> usize {
        self.pre_contingency.as_ref().map_or(0, Vec::len)
            + self
                .post_contingency
                .iter()
                .map(|r| r.violations.len())
                .sum::<usize>()
    }
}

/// Security analysis over one base network.
pub struct SecurityAnalysis<'a, P: OperatingPointProvider> {
    network: &'a Network,
    provider: &'a P,
    computer: ReducedLimitsComputer,
    config: SecurityAnalysisConfig,
}

impl<'a, P: OperatingPointProvider> SecurityAnalysis<'a, P> {
    pub fn new(network: &'a Network, provider: &'a P, computer: ReducedLimitsComputer) -> Self {
        Self {
            network,
            provider,
            computer,
            config: SecurityAnalysisConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SecurityAnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SecurityAnalysisConfig {
        &self.config
    }

    pub fn run(&self, contingencies: &[Contingency]) -> Result<SecurityAnalysisReport> {
        let pre_contingency = if self.config.evaluate_pre_contingency {
            let point = self
                .provider
                .operating_point(self.network, None)
                .context("computing pre-contingency operating point")?;
            let mut computer = self.computer.clone();
            computer.set_active_contingency(None);
            Some(self.check(self.network, &mut computer, &point))
        } else {
            None
        };

        let thread_count = if self.config.threads == 0 {
            num_cpus::get()
        } else {
            self.config.threads
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .build()
            .context("building Rayon thread pool for security analysis")?;

        let post_contingency: Vec<PostContingencyResult> = pool.install(|| {
            contingencies
                .par_iter()
                .map_init(
                    || self.computer.clone(),
                    |computer, contingency| self.run_contingency(computer, contingency),
                )
                .collect()
        });

        let report = SecurityAnalysisReport {
            pre_contingency,
            post_contingency,
        };
        info!(
            contingencies = contingencies.len(),
            failed = report.failed().count(),
            violations = report.total_violations(),
            threads = thread_count,
            "security analysis done"
        );
        Ok(report)
    }

    fn run_contingency(
        &self,
        computer: &mut ReducedLimitsComputer,
        contingency: &Contingency,
    ) -> PostContingencyResult {
        let mut tripped_elements = 0;
        let outcome = (|| -> GridsecResult<Vec<LimitViolation>> {
            let tripping = contingency.trip(self.network)?;
            let mut working = self.network.clone();
            tripped_elements = apply_tripping(&mut working, &tripping).total();
            let point = self.provider.operating_point(&working, Some(contingency))?;
            computer.set_active_contingency(Some(&contingency.id));
            Ok(self.check(&working, computer, &point))
        })();

        match outcome {
            Ok(violations) => {
                debug!(
                    contingency = %contingency.id,
                    tripped_elements,
                    violations = violations.len(),
                    "contingency evaluated"
                );
                PostContingencyResult {
                    contingency_id: contingency.id.clone(),
                    status: ComputationStatus::Converged,
                    error: None,
                    tripped_elements,
                    violations,
                }
            }
            Err(err) => {
                warn!(contingency = %contingency.id, error = %err, "contingency failed");
                PostContingencyResult {
                    contingency_id: contingency.id.clone(),
                    status: ComputationStatus::Failed,
                    error: Some(err.to_string()),
                    tripped_elements,
                    violations: Vec::new(),
                }
            }
        }
    }

    /// Violations of one network state. Values on disconnected sides are ignored.
    fn check(
        &self,
        network: &Network,
        computer: &mut ReducedLimitsComputer,
        point: &OperatingPoint,
    ) -> Vec<LimitViolation> {
        point
            .iter()
            .filter(|(quantity, _)| self.config.limit_types.contains(&quantity.limit_type))
            .filter(|(quantity, _)| {
                network
                    .get_equipment(&quantity.element_id)
                    .and_then(|e| e.terminal(quantity.side))
                    .map_or(true, |t| network.terminal(t).connected)
            })
            .filter_map(|(quantity, value)| {
                let limits = computer.compute_limits(
                    network,
                    &quantity.element_id,
                    quantity.limit_type,
                    quantity.side,
                    self.config.monitoring_only,
                )?;
                detect_violation(
                    &quantity.element_id,
                    quantity.limit_type,
                    quantity.side,
                    &limits,
                    value,
                )
            })
            .collect()
    }
}
