// 🔁 Pipeline - ledger → year filter → graph → layout → scene
//
// Every call starts from freshly loaded tables and shares nothing with any
// other call, so concurrent callers need no coordination.

use crate::config::{NetworkConfig, SceneStyle};
use crate::graph::NetworkGraph;
use crate::layout::{centric_layout, Rings};
use crate::ledger::{AccountDirectory, CsvDataSource, DataSource, TransactionRecord};
use crate::scene::{SceneBuilder, ScenePayload};
use crate::temporal::{filter_by_years, YearRange};
use anyhow::Result;

/// Build the scene for `queried` from tables already in hand.
pub fn build_scene(
    transactions: &[TransactionRecord],
    accounts: &AccountDirectory,
    years: YearRange,
    queried: &str,
    style: &SceneStyle,
) -> Result<ScenePayload> {
    let filtered = filter_by_years(transactions, years)?;
    let universe = filtered.account_universe(queried);
    let rings = Rings::new(&universe, queried);
    let builder = SceneBuilder::new(style);

    if rings.is_isolated() {
        log::debug!("{} has no counterparties in {}", queried, years);
        return Ok(builder.isolated(queried));
    }

    let graph = NetworkGraph::build(&universe, &filtered.transactions, accounts);
    let layout = centric_layout(&graph, &rings);
    builder.build(&graph, &layout, filtered.max_amount().unwrap_or(0.0))
}

/// A data source plus the style to render with
pub struct NetworkPipeline {
    source: Box<dyn DataSource>,
    style: SceneStyle,
}

impl NetworkPipeline {
    pub fn new(source: Box<dyn DataSource>, style: SceneStyle) -> Self {
        NetworkPipeline { source, style }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        NetworkPipeline::new(
            Box::new(CsvDataSource::new(&config.edges_path, &config.nodes_path)),
            config.style.clone(),
        )
    }

    /// Reload both tables and render the network around `queried`.
    pub fn compute_scene(&self, years: YearRange, queried: &str) -> Result<ScenePayload> {
        let transactions = self.source.load_transactions()?;
        let accounts = self.source.load_accounts()?;

        let scene = build_scene(&transactions, &accounts, years, queried, &self.style)?;
        let summary = scene.summary();
        log::info!(
            "scene for {} in {}: {} edges, {} nodes, layout {}",
            queried,
            years,
            summary.line_traces,
            summary.node_points,
            summary.layout
        );
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{AccountRecord, InMemoryDataSource};
    use crate::scene::TraceKind;

    fn pipeline() -> NetworkPipeline {
        let source = InMemoryDataSource::new(
            vec![
                TransactionRecord::new("A", "B", 100.0, "01/01/2015"),
                TransactionRecord::new("B", "C", 50.0, "01/01/2015"),
                TransactionRecord::new("A", "C", 200.0, "01/01/2012"),
                TransactionRecord::new("D", "E", 5.0, "03/03/2018"),
            ],
            vec![
                AccountRecord::new("A", "Alice", "Checking"),
                AccountRecord::new("B", "Bob", "Savings"),
                AccountRecord::new("C", "Carol", "Checking"),
            ],
        );
        NetworkPipeline::new(Box::new(source), SceneStyle::default())
    }

    #[test]
    fn test_shell_scene_for_busy_account() {
        let scene = pipeline()
            .compute_scene(YearRange::new(2014, 2016).unwrap(), "A")
            .unwrap();

        let summary = scene.summary();
        assert_eq!(summary.layout, "shell");
        assert_eq!(summary.line_traces, 2);
        assert_eq!(summary.node_points, 3);
        assert_eq!(summary.annotations, 2);
    }

    #[test]
    fn test_single_counterparty_uses_spring() {
        let scene = pipeline()
            .compute_scene(YearRange::new(2018, 2018).unwrap(), "D")
            .unwrap();

        assert_eq!(scene.summary().layout, "spring");
        assert_eq!(scene.summary().node_points, 2);
    }

    #[test]
    fn test_queried_account_outside_window_still_appears() {
        // D only trades in 2018; within 2014-2016 it joins A, B and C as a node
        let scene = pipeline()
            .compute_scene(YearRange::new(2014, 2016).unwrap(), "D")
            .unwrap();

        let nodes = scene.traces_of(TraceKind::MarkerText).next().unwrap();
        assert_eq!(nodes.text, vec!["A", "B", "C", "D"]);
        assert_eq!(scene.summary().layout, "shell");
    }

    #[test]
    fn test_widths_relative_to_window_maximum() {
        let scene = pipeline()
            .compute_scene(YearRange::new(2012, 2015).unwrap(), "A")
            .unwrap();

        // A->B 100, A->C 200, B->C 50 once grouped by source
        let widths = scene
            .traces_of(TraceKind::Line)
            .map(|t| t.line.as_ref().unwrap().width)
            .collect::<Vec<_>>();
        assert_eq!(widths, vec![5.0, 10.0, 2.5]);
    }

    #[test]
    fn test_unknown_account_in_empty_window_is_isolated() {
        let scene = pipeline()
            .compute_scene(YearRange::new(2000, 2001).unwrap(), "Z")
            .unwrap();

        let summary = scene.summary();
        assert_eq!(summary.layout, "none");
        assert_eq!(summary.marker_traces, 2);
        assert_eq!(summary.line_traces, 0);
        assert_eq!(summary.annotations, 0);
    }
}
