// 🕸️ Network Graph - Directed multigraph over the account universe

use crate::ledger::{AccountDirectory, TransactionRecord};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct AccountNode {
    pub id: String,

    /// `None` when the account has no metadata row
    pub customer_name: Option<String>,

    pub account_type: Option<String>,
}

/// One transaction drawn as `source -> target`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEdge {
    /// Index into `NetworkGraph::nodes`
    pub source: usize,
    pub target: usize,
    pub transaction: TransactionRecord,
}

/// Parallel edges between the same ordered pair are kept as separate edges.
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    pub nodes: Vec<AccountNode>,
    pub edges: Vec<TransactionEdge>,
    index: HashMap<String, usize>,
}

impl NetworkGraph {
    /// One node per universe account, one edge per transaction.
    ///
    /// Edges are grouped by source node (node order), then by target in the
    /// order that pair first appears in the ledger, then parallel edges in
    /// ledger order. Transactions touching an account outside `universe` add
    /// that account as a node rather than being dropped.
    pub fn build(
        universe: &[String],
        transactions: &[TransactionRecord],
        directory: &AccountDirectory,
    ) -> Self {
        let mut graph = NetworkGraph::default();

        for id in universe {
            graph.add_node(id, directory);
        }

        let mut pair_rank: HashMap<(usize, usize), usize> = HashMap::new();
        let mut ranked = Vec::with_capacity(transactions.len());
        for tx in transactions {
            let source = graph.add_node(&tx.source, directory);
            let target = graph.add_node(&tx.target, directory);
            let next = pair_rank.len();
            let rank = *pair_rank.entry((source, target)).or_insert(next);
            ranked.push((
                rank,
                TransactionEdge {
                    source,
                    target,
                    transaction: tx.clone(),
                },
            ));
        }

        // stable: parallel edges keep ledger order
        ranked.sort_by_key(|(rank, edge)| (edge.source, *rank));
        graph.edges = ranked.into_iter().map(|(_, edge)| edge).collect();

        log::debug!(
            "built graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        graph
    }

    fn add_node(&mut self, id: &str, directory: &AccountDirectory) -> usize {
        if let Some(&index) = self.index.get(id) {
            return index;
        }

        let metadata = directory.find_by_id(id);
        if metadata.is_none() {
            log::warn!("account {} has no metadata record", id);
        }

        let index = self.nodes.len();
        self.nodes.push(AccountNode {
            id: id.to_string(),
            customer_name: metadata.map(|a| a.customer_name.clone()),
            account_type: metadata.map(|a| a.account_type.clone()),
        });
        self.index.insert(id.to_string(), index);
        index
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&AccountNode> {
        self.node_index(id).map(|index| &self.nodes[index])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edge endpoints as node index pairs, for the layout engines
    pub fn edge_pairs(&self) -> Vec<(usize, usize)> {
        self.edges.iter().map(|e| (e.source, e.target)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::AccountRecord;

    fn directory() -> AccountDirectory {
        vec![
            AccountRecord::new("A", "Alice", "Checking"),
            AccountRecord::new("B", "Bob", "Savings"),
        ]
        .into_iter()
        .collect()
    }

    fn universe(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let transactions = vec![
            TransactionRecord::new("A", "B", 10.0, "01/01/2015"),
            TransactionRecord::new("A", "B", 20.0, "02/01/2015"),
            TransactionRecord::new("B", "A", 5.0, "03/01/2015"),
        ];

        let graph = NetworkGraph::build(&universe(&["A", "B"]), &transactions, &directory());

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edge_pairs(), vec![(0, 1), (0, 1), (1, 0)]);
        assert_eq!(graph.edges[1].transaction.amount, 20.0);
    }

    #[test]
    fn test_edges_grouped_by_source_node() {
        let transactions = vec![
            TransactionRecord::new("A", "B", 10.0, "01/01/2015"),
            TransactionRecord::new("B", "C", 20.0, "01/01/2015"),
            TransactionRecord::new("A", "D", 30.0, "01/01/2015"),
            TransactionRecord::new("A", "B", 40.0, "01/01/2015"),
        ];

        let graph = NetworkGraph::build(
            &universe(&["A", "B", "C", "D"]),
            &transactions,
            &directory(),
        );

        let order: Vec<(&str, &str, f64)> = graph
            .edges
            .iter()
            .map(|e| {
                (
                    e.transaction.source.as_str(),
                    e.transaction.target.as_str(),
                    e.transaction.amount,
                )
            })
            .collect();
        assert_eq!(
            order,
            vec![
                ("A", "B", 10.0),
                ("A", "B", 40.0),
                ("A", "D", 30.0),
                ("B", "C", 20.0),
            ]
        );
    }

    #[test]
    fn test_targets_follow_first_appearance_not_node_order() {
        let transactions = vec![
            TransactionRecord::new("A", "C", 10.0, "01/01/2015"),
            TransactionRecord::new("A", "B", 20.0, "01/01/2015"),
        ];

        let graph = NetworkGraph::build(&universe(&["A", "B", "C"]), &transactions, &directory());

        assert_eq!(graph.edge_pairs(), vec![(0, 2), (0, 1)]);
    }

    #[test]
    fn test_metadata_attached_by_id() {
        let transactions = vec![TransactionRecord::new("A", "C", 10.0, "01/01/2015")];

        let graph = NetworkGraph::build(&universe(&["A", "C"]), &transactions, &directory());

        let a = graph.node("A").unwrap();
        assert_eq!(a.customer_name.as_deref(), Some("Alice"));
        assert_eq!(a.account_type.as_deref(), Some("Checking"));

        let c = graph.node("C").unwrap();
        assert_eq!(c.customer_name, None);
        assert_eq!(c.account_type, None);
    }

    #[test]
    fn test_each_account_is_one_node() {
        let transactions = vec![
            TransactionRecord::new("A", "B", 10.0, "01/01/2015"),
            TransactionRecord::new("B", "A", 10.0, "01/01/2015"),
        ];

        let graph = NetworkGraph::build(&universe(&["A", "B", "Q"]), &transactions, &directory());

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.node_index("Q"), Some(2));
        assert_eq!(graph.edge_pairs(), vec![(0, 1), (1, 0)]);
    }
}
