//! Audit trace models.
//!
//! An audit trace records each stage of a calculation with its inputs,
//! outputs and a human-readable explanation, so a result can be checked line
//! by line.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number, starting at 1.
    pub step_number: u32,
    /// The unique identifier of the stage (e.g., "income_tax").
    pub rule_id: String,
    /// The human-readable name of the stage.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the result.
    pub reasoning: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use uk_tax_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     duration_us: 12,
/// };
/// assert!(trace.step("income_tax").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Finds a step by its rule identifier.
    pub fn step(&self, rule_id: &str) -> Option<&AuditStep> {
        self.steps.iter().find(|s| s.rule_id == rule_id)
    }
}

/// Collects audit steps while a calculation runs.
///
/// A disabled recorder never invokes the step builders, so the plain
/// calculation path pays nothing for auditing.
#[derive(Debug, Default)]
pub(crate) struct AuditRecorder {
    enabled: bool,
    steps: Vec<AuditStep>,
}

impl AuditRecorder {
    pub(crate) fn enabled() -> Self {
        Self {
            enabled: true,
            steps: Vec::new(),
        }
    }

    pub(crate) fn disabled() -> Self {
        Self::default()
    }

    /// Records a step; `build` returns `(input, output, reasoning)`.
    pub(crate) fn record<F>(&mut self, rule_id: &str, rule_name: &str, build: F)
    where
        F: FnOnce() -> (serde_json::Value, serde_json::Value, String),
    {
        if !self.enabled {
            return;
        }
        let (input, output, reasoning) = build();
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning,
        });
    }

    pub(crate) fn into_steps(self) -> Vec<AuditStep> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_disabled_recorder_skips_builder() {
        let mut recorder = AuditRecorder::disabled();
        recorder.record("gross_earnings", "Gross Earnings", || {
            panic!("builder must not run when auditing is disabled")
        });
        assert!(recorder.into_steps().is_empty());
    }

    #[test]
    fn test_enabled_recorder_numbers_steps() {
        let mut recorder = AuditRecorder::enabled();
        recorder.record("gross_earnings", "Gross Earnings", || {
            (json!({}), json!({"total": "50000"}), "salary".to_string())
        });
        recorder.record("income_tax", "Income Tax", || {
            (json!({}), json!({}), String::new())
        });

        let steps = recorder.into_steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].step_number, 1);
        assert_eq!(steps[1].step_number, 2);
        assert_eq!(steps[1].rule_id, "income_tax");
    }

    #[test]
    fn test_trace_step_lookup() {
        let trace = AuditTrace {
            steps: vec![AuditStep {
                step_number: 1,
                rule_id: "income_tax".to_string(),
                rule_name: "Income Tax".to_string(),
                input: json!({}),
                output: json!({}),
                reasoning: String::new(),
            }],
            duration_us: 5,
        };
        assert_eq!(trace.step("income_tax").unwrap().step_number, 1);
        assert!(trace.step("employer_ni").is_none());
    }
}
