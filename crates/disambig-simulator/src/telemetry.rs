//! Per-step records, per-replicate metrics and aggregate reporting

use crate::config::SimulationInput;
use disambig_core::StepOutput;
use disambig_plan::{ActionLabel, Plan};
use disambig_policy::EdgeSelection;
use std::collections::HashSet;
use std::fmt::Write as _;

/// What one step of a replicate observed and decided
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StepRecord {
    /// Action picked by the policy
    pub chosen_edge: Option<ActionLabel>,
    /// `None` on the final record of a finished replicate
    pub is_edge_selected: Option<bool>,
    /// `None` unless an edge was selected
    pub is_from_landmark: Option<bool>,
    /// Live plans before the pick
    pub num_remaining_plans: usize,
    /// At most one plan left
    pub is_disambiguation_done: bool,
    /// Choices offered
    pub num_choice_infos: usize,
    /// Nodes of the rendered graph
    pub num_nodes: usize,
    /// Edges taken by at least one live plan
    pub num_edges: usize,
    /// Distinct edge labels
    pub num_actions: usize,
    /// Costs of the live plans
    pub plan_costs: Vec<u64>,
}

impl StepRecord {
    fn observe(output: &StepOutput) -> Self {
        let index = &output.plan_index;
        let actions: HashSet<&ActionLabel> = index.edge_plans().keys().map(|e| &e.label).collect();
        Self {
            chosen_edge: None,
            is_edge_selected: None,
            is_from_landmark: None,
            num_remaining_plans: output.retained_plans.len(),
            is_disambiguation_done: false,
            num_choice_infos: output.choice_infos.len(),
            num_nodes: index.node_plans().len(),
            num_edges: index.edge_plans().len(),
            num_actions: actions.len(),
            plan_costs: output.retained_plans.iter().map(Plan::cost).collect(),
        }
    }

    /// Record of a finished replicate
    #[must_use]
    pub fn done(output: &StepOutput) -> Self {
        Self {
            is_disambiguation_done: true,
            ..Self::observe(output)
        }
    }

    /// Record of a step whose policy picked `selection`
    #[must_use]
    pub fn selected(output: &StepOutput, selection: &EdgeSelection) -> Self {
        Self {
            chosen_edge: Some(selection.action.clone()),
            is_edge_selected: Some(true),
            is_from_landmark: Some(selection.is_from_landmark()),
            ..Self::observe(output)
        }
    }

    /// Record of a step whose policy found nothing eligible
    #[must_use]
    pub fn exhausted(output: &StepOutput) -> Self {
        Self {
            is_edge_selected: Some(false),
            ..Self::observe(output)
        }
    }
}

/// Outcome of one replicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReplicateMetrics {
    /// Edges picked before completion (or before giving up)
    pub num_edges_chosen: usize,
    /// Picks that came from a landmark
    pub num_landmarks_chosen: usize,
    /// Whether the replicate narrowed to a single plan
    pub is_disambiguation_done: bool,
}

impl ReplicateMetrics {
    /// Metrics of a replicate's records
    #[must_use]
    pub fn from_records(records: &[StepRecord]) -> Self {
        Self {
            num_edges_chosen: records.iter().filter(|r| r.is_edge_selected == Some(true)).count(),
            num_landmarks_chosen: records.iter().filter(|r| r.is_from_landmark == Some(true)).count(),
            is_disambiguation_done: records.last().is_some_and(|r| r.is_disambiguation_done),
        }
    }
}

/// Raw output of a simulation
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimulationOutput {
    /// Setting that produced it
    pub simulation_input: SimulationInput,
    /// Records per replicate, in replicate order
    pub simulation_results: Vec<Vec<StepRecord>>,
}

impl SimulationOutput {
    /// Metrics per replicate
    #[must_use]
    pub fn metrics(&self) -> Vec<ReplicateMetrics> {
        self.simulation_results
            .iter()
            .map(|records| ReplicateMetrics::from_records(records))
            .collect()
    }

    /// Aggregate over all replicates
    #[must_use]
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary::from_metrics(&self.metrics())
    }

    /// Human-readable report
    #[must_use]
    pub fn report_text(&self) -> String {
        let summary = self.summary();
        let mut report = String::new();

        let _ = writeln!(report, "=== Disambiguation Simulation Report ===\n");
        let _ = writeln!(report, "Setting: {}", self.simulation_input.name());
        let _ = writeln!(report, "Seed: {}", self.simulation_input.seed);
        let _ = writeln!(report, "Replicates: {}", summary.replicates);
        let _ = writeln!(report, "Completed: {}", summary.completed);
        let _ = writeln!(report, "Completion Rate: {:.2}", summary.completion_rate);
        let _ = writeln!(report, "Mean Edges Chosen: {:.2}", summary.mean_edges_chosen);
        let _ = writeln!(report, "Mean Landmark Picks: {:.2}", summary.mean_landmarks_chosen);

        let incomplete: Vec<usize> = self
            .metrics()
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_disambiguation_done)
            .map(|(i, _)| i)
            .collect();
        if !incomplete.is_empty() {
            let _ = writeln!(report, "\n=== Incomplete Replicates ===");
            for i in incomplete {
                let steps = self.simulation_results[i].len();
                let _ = writeln!(report, "{}. replicate {i} stopped after {steps} steps", i + 1);
            }
        }

        let _ = writeln!(
            report,
            "\n=== Result: {} ===",
            if summary.completed == summary.replicates { "DONE" } else { "PARTIAL" }
        );
        report
    }
}

/// Aggregate metrics
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimulationSummary {
    /// Replicates run
    pub replicates: usize,
    /// Replicates that narrowed to one plan
    pub completed: usize,
    /// `completed / replicates`, zero without replicates
    pub completion_rate: f64,
    /// Mean edges chosen per replicate
    pub mean_edges_chosen: f64,
    /// Mean landmark picks per replicate
    pub mean_landmarks_chosen: f64,
}

impl SimulationSummary {
    /// Aggregate `metrics`
    #[must_use]
    pub fn from_metrics(metrics: &[ReplicateMetrics]) -> Self {
        let replicates = metrics.len();
        let completed = metrics.iter().filter(|m| m.is_disambiguation_done).count();
        #[allow(clippy::cast_precision_loss)]
        let mean = |total: usize| {
            if replicates == 0 {
                0.0
            } else {
                total as f64 / replicates as f64
            }
        };
        Self {
            replicates,
            completed,
            completion_rate: mean(completed),
            mean_edges_chosen: mean(metrics.iter().map(|m| m.num_edges_chosen).sum()),
            mean_landmarks_chosen: mean(metrics.iter().map(|m| m.num_landmarks_chosen).sum()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(selected: Option<bool>, landmark: Option<bool>, done: bool) -> StepRecord {
        StepRecord {
            chosen_edge: selected.filter(|s| *s).map(|_| ActionLabel::normalize("a").unwrap()),
            is_edge_selected: selected,
            is_from_landmark: landmark,
            num_remaining_plans: 2,
            is_disambiguation_done: done,
            num_choice_infos: 1,
            num_nodes: 3,
            num_edges: 2,
            num_actions: 2,
            plan_costs: vec![1, 1],
        }
    }

    #[test]
    fn finished_replicate_excludes_final_record() {
        let records = vec![
            record(Some(true), Some(true), false),
            record(Some(true), Some(false), false),
            record(None, None, true),
        ];
        let metrics = ReplicateMetrics::from_records(&records);
        assert_eq!(metrics.num_edges_chosen, 2);
        assert_eq!(metrics.num_landmarks_chosen, 1);
        assert!(metrics.is_disambiguation_done);
    }

    #[test]
    fn exhausted_replicate_is_incomplete() {
        let records = vec![record(Some(true), Some(false), false), record(Some(false), None, false)];
        let metrics = ReplicateMetrics::from_records(&records);
        assert_eq!(metrics.num_edges_chosen, 1);
        assert!(!metrics.is_disambiguation_done);
        assert!(!ReplicateMetrics::from_records(&[]).is_disambiguation_done);
    }

    #[test]
    fn summary_and_report() {
        let output = SimulationOutput {
            simulation_input: SimulationInput::default(),
            simulation_results: vec![
                vec![record(Some(true), Some(false), false), record(None, None, true)],
                vec![record(Some(false), None, false)],
            ],
        };
        let summary = output.summary();
        assert_eq!(summary.replicates, 2);
        assert_eq!(summary.completed, 1);
        assert!((summary.completion_rate - 0.5).abs() < f64::EPSILON);
        assert!((summary.mean_edges_chosen - 0.5).abs() < f64::EPSILON);

        let text = output.report_text();
        assert!(text.contains("Setting: test_select_rhw_random"));
        assert!(text.contains("replicate 1 stopped after 1 steps"));
        assert!(text.contains("PARTIAL"));
    }

    #[test]
    fn empty_summary_is_zero() {
        let summary = SimulationSummary::from_metrics(&[]);
        assert_eq!(summary.replicates, 0);
        assert!(summary.completion_rate.abs() < f64::EPSILON);
    }
}
