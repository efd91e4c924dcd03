//! Connection graph generation and queries.
//!
//! The graph is a minimum spanning tree over all planets (Prim-style growth
//! from planet 0) plus a capped number of shortest non-crossing extra edges.

use ahash::AHashSet;
use smallvec::SmallVec;

use crate::geometry::{point_segment_distance, segments_intersect};
use crate::{Connection, ConnectionKind, Planet, PlanetId, Point, Route};

#[derive(Debug, Clone, Copy)]
struct CandidatePair {
    a: PlanetId,
    b: PlanetId,
    distance: f64,
}

/// All unordered pairs sorted by ascending distance. The sort is stable, so
/// ties keep `(i, j)` enumeration order.
fn candidate_pairs(positions: &[Point]) -> Vec<CandidatePair> {
    let mut pairs = Vec::with_capacity(positions.len() * positions.len().saturating_sub(1) / 2);
    for (i, p) in positions.iter().enumerate() {
        for (j, q) in positions.iter().enumerate().skip(i + 1) {
            pairs.push(CandidatePair {
                a: PlanetId(i),
                b: PlanetId(j),
                distance: p.distance_to(*q),
            });
        }
    }
    pairs.sort_by(|x, y| x.distance.total_cmp(&y.distance));
    pairs
}

/// Builds the connection set for planets at `positions` (indexed by `PlanetId`).
///
/// The first `positions.len() - 1` connections are the spanning tree; at most
/// `floor(supplemental_ratio * positions.len())` supplemental edges follow.
pub fn generate_connections(positions: &[Point], supplemental_ratio: f64) -> Vec<Connection> {
    if positions.len() < 2 {
        return Vec::new();
    }
    let pairs = candidate_pairs(positions);
    let mut connections = spanning_tree(positions.len(), &pairs);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cap = (positions.len() as f64 * supplemental_ratio).floor() as usize;
    add_supplemental(positions, &pairs, cap, &mut connections);

    tracing::debug!(
        planets = positions.len(),
        connections = connections.len(),
        "connection graph generated"
    );
    connections
}

fn spanning_tree(planet_count: usize, pairs: &[CandidatePair]) -> Vec<Connection> {
    let mut connected: AHashSet<PlanetId> = AHashSet::with_capacity(planet_count);
    connected.insert(PlanetId(0));
    let mut tree = Vec::with_capacity(planet_count - 1);

    while connected.len() < planet_count {
        // Pairs are sorted, so the first frontier pair is the shortest one.
        let Some(pair) = pairs
            .iter()
            .find(|p| connected.contains(&p.a) != connected.contains(&p.b))
        else {
            break;
        };
        tree.push(Connection {
            a: pair.a,
            b: pair.b,
            kind: ConnectionKind::Tree,
        });
        connected.insert(pair.a);
        connected.insert(pair.b);
    }
    tree
}

fn add_supplemental(
    positions: &[Point],
    pairs: &[CandidatePair],
    cap: usize,
    connections: &mut Vec<Connection>,
) {
    let mut existing: AHashSet<Route> = connections.iter().map(Connection::route).collect();
    let mut added = 0;

    for pair in pairs {
        if added >= cap {
            break;
        }
        let candidate = Connection {
            a: pair.a,
            b: pair.b,
            kind: ConnectionKind::Supplemental,
        };
        if existing.contains(&candidate.route()) {
            continue;
        }
        let crosses = connections.iter().any(|accepted| {
            !candidate.shares_endpoint(accepted)
                && segments_intersect(
                    positions[candidate.a.0],
                    positions[candidate.b.0],
                    positions[accepted.a.0],
                    positions[accepted.b.0],
                )
        });
        if crosses {
            continue;
        }
        existing.insert(candidate.route());
        connections.push(candidate);
        added += 1;
    }
}

pub fn are_connected(connections: &[Connection], a: PlanetId, b: PlanetId) -> bool {
    connections.iter().any(|c| c.joins(a, b))
}

pub fn degree(connections: &[Connection], planet: PlanetId) -> usize {
    connections.iter().filter(|c| c.touches(planet)).count()
}

/// Neighbours of `planet` in connection order.
pub fn neighbors(connections: &[Connection], planet: PlanetId) -> SmallVec<[PlanetId; 8]> {
    connections.iter().filter_map(|c| c.other(planet)).collect()
}

/// Index of the first connection passing within `threshold` of `point`.
pub fn connection_near_point(
    planets: &[Planet],
    connections: &[Connection],
    point: Point,
    threshold: f64,
) -> Option<usize> {
    connections.iter().position(|c| {
        point_segment_distance(
            point,
            planets[c.a.0].position,
            planets[c.b.0].position,
        ) < threshold
    })
}
