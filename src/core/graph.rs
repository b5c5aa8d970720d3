//! Directed conversion graph built from provider snapshots.
//!
//! Every edge is inserted together with its inverse, so the graph is always
//! closed under inversion. Edges keep insertion order per node, which the
//! resolver relies on for its tie-break.

use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use super::currency::CurrencyCode;
use super::rate::{RateFact, Snapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct RateEdge {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub factor: f64,
    pub source: String,
}

#[derive(Debug, Clone, Default)]
pub struct RateGraph {
    adjacency: HashMap<CurrencyCode, Vec<RateEdge>>,
}

fn unordered(a: CurrencyCode, b: CurrencyCode) -> (CurrencyCode, CurrencyCode) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Both readings of a fact as `(bridge, other, units of other per 1 bridge)`.
fn legs(fact: &RateFact) -> [(CurrencyCode, CurrencyCode, f64); 2] {
    [
        (fact.base, fact.quote, fact.rate),
        (fact.quote, fact.base, 1.0 / fact.rate),
    ]
}

fn usable_facts(snapshot: &dyn Snapshot) -> Vec<RateFact> {
    snapshot
        .facts()
        .into_iter()
        .filter(|fact| {
            let usable = fact.base != fact.quote && fact.rate.is_finite() && fact.rate > 0.0;
            if !usable {
                warn!(
                    source = snapshot.source(),
                    base = %fact.base,
                    quote = %fact.quote,
                    rate = fact.rate,
                    "Skipping unusable rate fact"
                );
            }
            usable
        })
        .collect()
}

impl RateGraph {
    /// Builds a fresh graph from snapshots given in provider order.
    ///
    /// Direct facts of snapshot `j` are inserted first, then cross edges
    /// bridging `j` with every earlier snapshot. A cross edge is added only
    /// for pairs that no snapshot quotes directly, and the first bridge found
    /// for a pair wins.
    pub fn build(snapshots: &[&dyn Snapshot]) -> Self {
        let feeds: Vec<(&'static str, Vec<RateFact>)> = snapshots
            .iter()
            .map(|snapshot| (snapshot.source(), usable_facts(*snapshot)))
            .collect();

        let quoted: HashSet<(CurrencyCode, CurrencyCode)> = feeds
            .iter()
            .flat_map(|(_, facts)| facts.iter().map(|f| unordered(f.base, f.quote)))
            .collect();

        let mut graph = RateGraph::default();
        for (j, (source, facts)) in feeds.iter().enumerate() {
            for fact in facts {
                graph.insert_pair(fact.base, fact.quote, fact.rate, source);
            }
            for (earlier_source, earlier_facts) in &feeds[..j] {
                let label = format!("{earlier_source}+{source}");
                graph.insert_bridges(earlier_facts, facts, &label, &quoted);
            }
        }
        graph
    }

    fn insert_pair(&mut self, from: CurrencyCode, to: CurrencyCode, factor: f64, source: &str) {
        self.adjacency.entry(from).or_default().push(RateEdge {
            from,
            to,
            factor,
            source: source.to_string(),
        });
        self.adjacency.entry(to).or_default().push(RateEdge {
            from: to,
            to: from,
            factor: 1.0 / factor,
            source: source.to_string(),
        });
    }

    fn insert_bridges(
        &mut self,
        left: &[RateFact],
        right: &[RateFact],
        label: &str,
        quoted: &HashSet<(CurrencyCode, CurrencyCode)>,
    ) {
        for a in left {
            for b in right {
                for (bridge_a, x, rx) in legs(a) {
                    for (bridge_b, y, ry) in legs(b) {
                        if bridge_a != bridge_b || x == y {
                            continue;
                        }
                        if quoted.contains(&unordered(x, y)) || self.has_edge(y, x) {
                            continue;
                        }
                        let factor = rx / ry;
                        debug!(
                            from = %y,
                            to = %x,
                            bridge = %bridge_a,
                            factor,
                            source = label,
                            "Adding cross edge"
                        );
                        self.insert_pair(y, x, factor, label);
                    }
                }
            }
        }
    }

    /// Outgoing edges of `code` in insertion order.
    pub fn edges_from(&self, code: CurrencyCode) -> &[RateEdge] {
        self.adjacency.get(&code).map_or(&[], Vec::as_slice)
    }

    pub fn edges(&self) -> impl Iterator<Item = &RateEdge> {
        self.adjacency.values().flatten()
    }

    pub fn has_edge(&self, from: CurrencyCode, to: CurrencyCode) -> bool {
        self.edges_from(from).iter().any(|edge| edge.to == to)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Returns a copy with every edge touching `code` removed.
    pub fn without(&self, code: CurrencyCode) -> RateGraph {
        let adjacency = self
            .adjacency
            .iter()
            .filter(|(from, _)| **from != code)
            .map(|(from, edges)| {
                let kept = edges.iter().filter(|e| e.to != code).cloned().collect();
                (*from, kept)
            })
            .collect();
        RateGraph { adjacency }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::{StaticSnapshot, scenario_snapshots};
    use CurrencyCode::*;

    fn scenario_graph() -> RateGraph {
        let (cbr, nbu, binance) = scenario_snapshots();
        RateGraph::build(&[&cbr, &nbu, &binance])
    }

    #[test]
    fn test_graph_is_inverse_closed() {
        let graph = scenario_graph();
        for edge in graph.edges() {
            let inverse = graph
                .edges_from(edge.to)
                .iter()
                .find(|e| e.to == edge.from && e.source == edge.source)
                .unwrap_or_else(|| panic!("Missing inverse for {edge:?}"));
            assert!((inverse.factor * edge.factor - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_no_self_loops() {
        let graph = scenario_graph();
        assert!(graph.edges().all(|e| e.from != e.to));
    }

    #[test]
    fn test_cross_edge_uses_first_bridge() {
        let graph = scenario_graph();
        let uah_rub: Vec<_> = graph
            .edges_from(Uah)
            .iter()
            .filter(|e| e.to == Rub)
            .collect();

        // EUR bridges CBR and NBU before USD does
        assert_eq!(uah_rub.len(), 1);
        assert_eq!(uah_rub[0].source, "CBR+NBU");
        assert!((uah_rub[0].factor - 100.0 / 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_cross_edge_for_directly_quoted_pair() {
        let graph = scenario_graph();
        let usdt_uah: Vec<_> = graph
            .edges_from(Usdt)
            .iter()
            .filter(|e| e.to == Uah)
            .collect();
        assert_eq!(usdt_uah.len(), 1);
        assert_eq!(usdt_uah[0].source, "Binance");
    }

    #[test]
    fn test_insertion_order_per_node() {
        let graph = scenario_graph();
        let targets: Vec<_> = graph.edges_from(Uah).iter().map(|e| e.to).collect();
        assert_eq!(targets, vec![Eur, Usd, Rub, Usdt]);
    }

    #[test]
    fn test_cross_edge_between_crypto_and_official_feeds() {
        let graph = scenario_graph();
        let edge = graph
            .edges_from(Usdt)
            .iter()
            .find(|e| e.to == Rub)
            .expect("USDT->RUB cross edge");
        assert_eq!(edge.source, "CBR+Binance");
        assert!((edge.factor - 100.0 / 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_unusable_facts_are_skipped() {
        let snapshot = StaticSnapshot::new(
            "TEST",
            vec![
                RateFact::new(Eur, Eur, 1.0),
                RateFact::new(Eur, Usd, 0.0),
                RateFact::new(Eur, Rub, f64::NAN),
                RateFact::new(Usd, Rub, 90.0),
            ],
        );
        let graph = RateGraph::build(&[&snapshot]);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_edge(Usd, Rub));
        assert!(graph.has_edge(Rub, Usd));
    }

    #[test]
    fn test_without_removes_all_touching_edges() {
        let graph = scenario_graph().without(Rub);
        assert!(graph.edges_from(Rub).is_empty());
        assert!(graph.edges().all(|e| e.to != Rub && e.from != Rub));
        assert!(graph.has_edge(Usd, Uah));
    }

    #[test]
    fn test_empty_input_builds_empty_graph() {
        let graph = RateGraph::build(&[]);
        assert_eq!(graph.edge_count(), 0);
    }
}
