//! Terminal run summary.

use std::collections::BTreeMap;
use std::time::Duration;

use super::history::StateHistory;

/// Structured result of one run, as consumed by reporting tools.
///
/// Serialisation is left to the caller (enable the `serde` feature).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// Instance name, usually the file stem.
    pub instance: String,
    /// Algorithm name.
    pub heuristic: String,
    /// Every tunable parameter of the run, formatted.
    pub parameters: BTreeMap<String, String>,
    /// Wall-clock run time.
    pub elapsed: Duration,
    /// Distinct nodes in the instance.
    pub node_count: usize,
    /// Final iteration counter.
    pub iteration: usize,
    /// Final tour length.
    pub tour_length: f64,
    /// Final tour as node indices.
    pub tour: Vec<usize>,
    /// Final temperature, for annealing runs.
    pub final_temperature: Option<f64>,
}

impl RunSummary {
    /// Summarises the last snapshot of `history`. `None` for an empty history.
    pub fn from_history(
        instance: &str,
        heuristic: &str,
        parameters: BTreeMap<String, String>,
        history: &StateHistory,
        elapsed: Duration,
    ) -> Option<Self> {
        let last = history.last()?;
        Some(Self {
            instance: instance.to_string(),
            heuristic: heuristic.to_string(),
            parameters,
            elapsed,
            node_count: history.nodes().len(),
            iteration: last.iteration(),
            tour_length: last.distance(),
            tour: last.path().to_vec(),
            final_temperature: (last.temperature() > 0.0).then(|| last.temperature()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use crate::state::GraphState;

    #[test]
    fn test_summary_reads_last_state() {
        let nodes = vec![Node::new(0, 0.0, 0.0), Node::new(1, 1.0, 0.0)];
        let mut history = StateHistory::new(nodes);
        history.push(GraphState::initial(vec![0, 1, 0], 2.0));
        let mut last = GraphState::initial(vec![1, 0, 1], 2.0);
        last.iteration = 5;
        last.temperature = 0.5;
        history.push(last);

        let summary = RunSummary::from_history(
            "pair",
            "sa",
            BTreeMap::new(),
            &history,
            Duration::from_millis(3),
        )
        .unwrap();
        assert_eq!(summary.node_count, 2);
        assert_eq!(summary.iteration, 5);
        assert_eq!(summary.tour, vec![1, 0, 1]);
        assert_eq!(summary.final_temperature, Some(0.5));
    }

    #[test]
    fn test_summary_without_temperature() {
        let mut history = StateHistory::new(Vec::new());
        history.push(GraphState::initial(vec![0], 0.0));
        let summary =
            RunSummary::from_history("x", "nn", BTreeMap::new(), &history, Duration::ZERO).unwrap();
        assert_eq!(summary.final_temperature, None);
    }

    #[test]
    fn test_summary_of_empty_history() {
        let history = StateHistory::default();
        assert!(
            RunSummary::from_history("x", "nn", BTreeMap::new(), &history, Duration::ZERO)
                .is_none()
        );
    }
}
