use std::cmp::Ordering;
use std::collections::BinaryHeap;

use geo::{BoundingRect, Rect};
use hashbrown::HashMap;
use log::debug;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::model::{CancellationToken, RangeUnit, RouteSearchContext};
use crate::Error;

/// Settled nodes between cancellation checks.
const CANCELLATION_STRIDE: usize = 1024;

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: NodeIndex,
}

impl Eq for State {}

// Min-heap by cost (reversed from standard Rust BinaryHeap), ties broken
// by node index so expansion order is deterministic.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.index().cmp(&self.node.index()))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-edge cost record: the settled cost at the edge start, and the cost
/// at its end. `start_cost <= end_cost` always holds; the end cost may
/// exceed the maximum requested range when the reachability frontier lies
/// somewhere along the edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeCostRecord {
    pub edge: EdgeIndex,
    pub start_cost: f64,
    pub end_cost: f64,
}

/// Output of one bounded traversal. Records are sorted by edge index so
/// downstream geometry construction is deterministic.
#[derive(Debug, Clone)]
pub struct TraversalResult {
    pub records: Vec<EdgeCostRecord>,
    /// Bounding rectangle over the geometry of every retained edge.
    pub extent: Option<Rect<f64>>,
    pub max_cost: f64,
}

impl TraversalResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Priority-queue-driven cost expansion from a snapped origin node.
///
/// Stateless beyond its own call frame; several engines may traverse the
/// same context concurrently.
pub struct GraphTraversalEngine<'a> {
    context: &'a RouteSearchContext,
}

impl<'a> GraphTraversalEngine<'a> {
    pub fn new(context: &'a RouteSearchContext) -> Self {
        Self { context }
    }

    /// Expands from `origin` until the frontier minimum exceeds
    /// `max_cost`, then collects a cost record for every edge leaving a
    /// settled node. A traversal that settles no edges is not an error.
    pub fn traverse(
        &self,
        origin: NodeIndex,
        max_cost: f64,
        unit: RangeUnit,
        cancellation: &CancellationToken,
    ) -> Result<TraversalResult, Error> {
        let graph = self.context.graph();
        let estimated = graph.node_count().min(1000);
        let mut distances: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated);
        let mut heap = BinaryHeap::with_capacity(estimated / 4);

        heap.push(State {
            cost: 0.0,
            node: origin,
        });
        distances.insert(origin, 0.0);

        let mut settled = 0usize;
        while let Some(State { cost, node }) = heap.pop() {
            // The frontier minimum is past the bound; everything still
            // queued is unreachable within the maximum range.
            if cost > max_cost {
                break;
            }

            // Skip if we've already found a better path
            if let Some(&best) = distances.get(&node)
                && cost > best
            {
                continue;
            }

            settled += 1;
            if settled % CANCELLATION_STRIDE == 0 {
                cancellation.check()?;
            }

            for edge in graph.edges(node) {
                let edge_cost = self.context.edge_cost(edge.weight(), unit);
                if !edge_cost.is_finite() || edge_cost < 0.0 {
                    return Err(Error::Internal(format!(
                        "edge {} has malformed cost {edge_cost}",
                        edge.id().index()
                    )));
                }
                let next = edge.target();
                let next_cost = cost + edge_cost;

                match distances.entry(next) {
                    hashbrown::hash_map::Entry::Vacant(entry) => {
                        entry.insert(next_cost);
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                    hashbrown::hash_map::Entry::Occupied(mut entry) => {
                        if next_cost < *entry.get() {
                            *entry.get_mut() = next_cost;
                            heap.push(State {
                                cost: next_cost,
                                node: next,
                            });
                        }
                    }
                }
            }
        }

        debug!("traversal settled {settled} nodes within cost {max_cost}");

        Ok(self.collect_records(&distances, max_cost, unit))
    }

    /// Turns settled node costs into per-edge records, one per edge,
    /// keeping the cheapest start cost when both endpoints are settled.
    fn collect_records(
        &self,
        distances: &HashMap<NodeIndex, f64>,
        max_cost: f64,
        unit: RangeUnit,
    ) -> TraversalResult {
        let graph = self.context.graph();

        let mut settled: Vec<NodeIndex> = distances
            .iter()
            .filter(|&(_, &cost)| cost <= max_cost)
            .map(|(&node, _)| node)
            .collect();
        settled.sort_unstable();

        let mut by_edge: HashMap<EdgeIndex, EdgeCostRecord> =
            HashMap::with_capacity(settled.len() * 2);
        for &node in &settled {
            let start_cost = distances[&node];
            for edge in graph.edges(node) {
                let edge_cost = self.context.edge_cost(edge.weight(), unit);
                let through = start_cost + edge_cost;
                let end_cost = match distances.get(&edge.target()) {
                    Some(&target_cost) => through.min(target_cost).max(start_cost),
                    None => through,
                };
                let record = EdgeCostRecord {
                    edge: edge.id(),
                    start_cost,
                    end_cost,
                };
                by_edge
                    .entry(edge.id())
                    .and_modify(|existing| {
                        if record.start_cost < existing.start_cost {
                            *existing = record;
                        }
                    })
                    .or_insert(record);
            }
        }

        let mut records: Vec<EdgeCostRecord> = by_edge.into_values().collect();
        records.sort_unstable_by_key(|record| record.edge.index());

        let mut extent: Option<Rect<f64>> = None;
        for record in &records {
            let Some(weight) = graph.edge_weight(record.edge) else {
                continue;
            };
            let Some(rect) = weight.geometry.bounding_rect() else {
                continue;
            };
            extent = Some(match extent {
                None => rect,
                Some(current) => Rect::new(
                    geo::Coord {
                        x: current.min().x.min(rect.min().x),
                        y: current.min().y.min(rect.min().y),
                    },
                    geo::Coord {
                        x: current.max().x.max(rect.max().x),
                        y: current.max().y.max(rect.max().y),
                    },
                ),
            });
        }

        TraversalResult {
            records,
            extent,
            max_cost,
        }
    }
}
