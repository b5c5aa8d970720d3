//! Breadth-first path search over a [`RateGraph`].

use std::collections::{HashMap, HashSet, VecDeque};

use super::currency::CurrencyCode;
use super::error::RateError;
use super::graph::{RateEdge, RateGraph};
use super::rate::{ConversionPath, Hop};

/// Finds the path with the fewest hops from `from` to `to` and composes its rate.
///
/// Among paths of equal length the first one discovered wins, following
/// edge insertion order. Rates do not influence the choice.
pub fn find_path(
    graph: &RateGraph,
    from: CurrencyCode,
    to: CurrencyCode,
) -> Result<(f64, ConversionPath), RateError> {
    if from == to {
        return Ok((1.0, Vec::new()));
    }

    let mut queue = VecDeque::from([from]);
    let mut visited = HashSet::from([from]);
    let mut prev: HashMap<CurrencyCode, &RateEdge> = HashMap::new();

    'search: while let Some(current) = queue.pop_front() {
        for edge in graph.edges_from(current) {
            if !visited.insert(edge.to) {
                continue;
            }
            prev.insert(edge.to, edge);
            if edge.to == to {
                break 'search;
            }
            queue.push_back(edge.to);
        }
    }

    if !prev.contains_key(&to) {
        return Err(RateError::NoPath { from, to });
    }

    let mut edges = Vec::new();
    let mut cursor = to;
    while cursor != from {
        let edge = prev[&cursor];
        edges.push(edge);
        cursor = edge.from;
    }
    edges.reverse();

    let rate = edges.iter().fold(1.0, |acc, edge| acc * edge.factor);
    let path = edges
        .into_iter()
        .map(|edge| Hop {
            from: edge.from,
            to: edge.to,
            source: edge.source.clone(),
        })
        .collect();

    Ok((rate, path))
}
