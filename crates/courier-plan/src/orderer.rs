//! `StopOrderer` — heuristics that permute delivery stops to shorten the
//! straight-line ("crow") round trip depot → stops → depot.
//!
//! Ordering only ever permutes the request slice: no request is dropped,
//! duplicated or invented.  The distances reported are crow distances, not
//! street distances; the plan compiler measures the real route afterwards.
//!
//! Orderers are *composable*: chain them with `.then()` so, for example, a
//! local search refines a greedy tour.

use courier_core::{DeliveryRequest, GeoCoord, PlanRng};

use crate::config::AnnealingConfig;

/// Crow distances before and after reordering, miles.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderingReport {
    pub original_miles:  f64,
    pub optimized_miles: f64,
}

/// Straight-line length of depot → `stops[0]` → … → `stops[n-1]` → depot.
///
/// Zero when there are no stops.
pub fn crow_round_trip_miles(depot: &GeoCoord, stops: &[DeliveryRequest]) -> f64 {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return 0.0;
    };
    let inner: f64 = stops
        .windows(2)
        .map(|pair| pair[0].location.distance_miles(&pair[1].location))
        .sum();
    depot.distance_miles(&first.location) + inner + last.location.distance_miles(depot)
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Reorders delivery requests in place.
///
/// # Contract
///
/// - `requests` afterwards holds exactly the same multiset of requests.
/// - Deterministic given the same `rng` state.
/// - Must not block or perform I/O.
pub trait StopOrderer: Send + Sync {
    fn reorder(
        &self,
        depot: &GeoCoord,
        requests: &mut [DeliveryRequest],
        rng: &mut PlanRng,
    ) -> OrderingReport;
}

/// Rearrange `requests` so position `k` holds the request formerly at
/// `order[k]`.
fn apply_order(requests: &mut [DeliveryRequest], order: &[usize]) {
    debug_assert_eq!(order.len(), requests.len());
    let reordered: Vec<DeliveryRequest> = order.iter().map(|&i| requests[i].clone()).collect();
    requests.clone_from_slice(&reordered);
}

fn unchanged(miles: f64) -> OrderingReport {
    OrderingReport { original_miles: miles, optimized_miles: miles }
}

// ── Keep order ────────────────────────────────────────────────────────────────

/// An orderer that leaves the caller's order alone.
pub struct KeepOrder;

impl StopOrderer for KeepOrder {
    fn reorder(
        &self,
        depot: &GeoCoord,
        requests: &mut [DeliveryRequest],
        _rng: &mut PlanRng,
    ) -> OrderingReport {
        unchanged(crow_round_trip_miles(depot, requests))
    }
}

// ── Nearest neighbour ─────────────────────────────────────────────────────────

/// Greedy tour: from the depot, always drive to the closest unvisited stop.
///
/// O(n²) and deterministic; ties go to the earlier request.  Greedy tours
/// can occasionally be longer than the input order, in which case the input
/// order is kept.
pub struct NearestNeighbor;

impl StopOrderer for NearestNeighbor {
    fn reorder(
        &self,
        depot: &GeoCoord,
        requests: &mut [DeliveryRequest],
        _rng: &mut PlanRng,
    ) -> OrderingReport {
        let original = crow_round_trip_miles(depot, requests);
        let n = requests.len();
        if n < 2 {
            return unchanged(original);
        }

        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        let mut here = depot;

        for _ in 0..n {
            let next = (0..n)
                .filter(|&i| !visited[i])
                .min_by(|&a, &b| {
                    here.distance_miles(&requests[a].location)
                        .total_cmp(&here.distance_miles(&requests[b].location))
                });
            let Some(next) = next else { break };
            visited[next] = true;
            order.push(next);
            here = &requests[next].location;
        }

        let greedy = order_miles(depot, requests, &order);
        if greedy > original {
            log::debug!("nearest-neighbour tour {greedy:.3} mi is worse than input {original:.3} mi; keeping input");
            return unchanged(original);
        }

        apply_order(requests, &order);
        OrderingReport {
            original_miles:  original,
            optimized_miles: crow_round_trip_miles(depot, requests),
        }
    }
}

/// Crow round trip visiting `requests` in `order`.
fn order_miles(depot: &GeoCoord, requests: &[DeliveryRequest], order: &[usize]) -> f64 {
    let mut total = 0.0;
    let mut here = depot;
    for &i in order {
        total += here.distance_miles(&requests[i].location);
        here = &requests[i].location;
    }
    total + here.distance_miles(depot)
}

// ── Local search ──────────────────────────────────────────────────────────────

/// Randomized pairwise-swap search with a decaying acceptance heat.
///
/// Each pass proposes `swaps_per_pass` random swaps.  A swap that does not
/// lengthen the tour is always kept; one that lengthens it by `Δ` is kept with
/// probability `exp(-Δ / T)`.  `T` starts at `initial_heat` × the mean crow
/// leg length and is multiplied by `cooling` after every pass.  The shortest
/// tour seen is the one returned, so the result is never worse than the
/// input.
pub struct LocalSearch {
    config: AnnealingConfig,
}

impl LocalSearch {
    pub fn new(config: AnnealingConfig) -> Self {
        Self { config }
    }
}

impl StopOrderer for LocalSearch {
    fn reorder(
        &self,
        depot: &GeoCoord,
        requests: &mut [DeliveryRequest],
        rng: &mut PlanRng,
    ) -> OrderingReport {
        let original = crow_round_trip_miles(depot, requests);
        let n = requests.len();
        if n < 2 {
            return unchanged(original);
        }

        let mut current: Vec<usize> = (0..n).collect();
        let mut current_len = original;
        let mut best = current.clone();
        let mut best_len = original;
        let mut heat = self.config.initial_heat * original / (n + 1) as f64;

        for _ in 0..self.config.passes {
            for _ in 0..self.config.swaps_per_pass {
                let i = rng.gen_range(0..n);
                let j = rng.gen_range(0..n);
                if i == j {
                    continue;
                }

                current.swap(i, j);
                let len = order_miles(depot, requests, &current);
                let delta = len - current_len;
                let accept = delta <= 0.0 || (heat > 0.0 && rng.gen_bool((-delta / heat).exp()));

                if accept {
                    current_len = len;
                    if len < best_len {
                        best_len = len;
                        best.clone_from(&current);
                    }
                } else {
                    current.swap(i, j);
                }
            }
            heat *= self.config.cooling;
        }

        log::debug!("local search over {n} stops: {original:.3} mi → {best_len:.3} mi");
        apply_order(requests, &best);
        OrderingReport {
            original_miles:  original,
            optimized_miles: crow_round_trip_miles(depot, requests),
        }
    }
}

// ── Chained orderer ───────────────────────────────────────────────────────────

/// Applies two orderers in sequence.
///
/// The second orderer starts from the first one's output.  The report pairs
/// the first orderer's original distance with the second's result.
pub struct ChainedOrderer<A: StopOrderer, B: StopOrderer> {
    first:  A,
    second: B,
}

impl<A: StopOrderer, B: StopOrderer> StopOrderer for ChainedOrderer<A, B> {
    fn reorder(
        &self,
        depot: &GeoCoord,
        requests: &mut [DeliveryRequest],
        rng: &mut PlanRng,
    ) -> OrderingReport {
        let first = self.first.reorder(depot, requests, rng);
        let second = self.second.reorder(depot, requests, rng);
        OrderingReport {
            original_miles:  first.original_miles,
            optimized_miles: second.optimized_miles,
        }
    }
}

/// Extension trait that adds `.then(other)` to any `StopOrderer`.
pub trait StopOrdererExt: StopOrderer + Sized {
    fn then<B: StopOrderer>(self, other: B) -> ChainedOrderer<Self, B> {
        ChainedOrderer { first: self, second: other }
    }
}

impl<O: StopOrderer + Sized> StopOrdererExt for O {}
