//! Geometry, nodes and edges.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::TspError;

/// A position in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal coordinate (latitude for [`Metric::Geographic`]).
    pub x: f64,
    /// Vertical coordinate (longitude for [`Metric::Geographic`]).
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Distance function between two node positions.
///
/// # References
///
/// Reinelt, G. (1995). "TSPLIB 95", Section 2 (EUC_2D and GEO).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metric {
    /// Straight-line distance.
    #[default]
    Euclidean,

    /// Straight-line distance rounded to the nearest integer (TSPLIB `EUC_2D`).
    RoundedEuclidean,

    /// Great-circle distance in kilometres on `DDD.MM` coordinates
    /// (TSPLIB `GEO`), `x` being latitude and `y` longitude.
    Geographic,
}

/// Earth radius used by TSPLIB `GEO`, in kilometres.
const GEO_RADIUS: f64 = 6378.388;

impl Metric {
    /// Distance between two positions.
    pub fn distance(&self, a: &Point, b: &Point) -> f64 {
        match self {
            Metric::Euclidean => (a.x - b.x).hypot(a.y - b.y),
            Metric::RoundedEuclidean => ((a.x - b.x).hypot(a.y - b.y) + 0.5).trunc(),
            Metric::Geographic => {
                let (lat1, lon1) = (geo_radians(a.x), geo_radians(a.y));
                let (lat2, lon2) = (geo_radians(b.x), geo_radians(b.y));
                let q1 = (lon1 - lon2).cos();
                let q2 = (lat1 - lat2).cos();
                let q3 = (lat1 + lat2).cos();
                let arc = (0.5 * ((1.0 + q1) * q2 - (1.0 - q1) * q3)).clamp(-1.0, 1.0);
                (GEO_RADIUS * arc.acos() + 1.0).trunc()
            }
        }
    }
}

/// Converts a `DDD.MM` coordinate to radians.
fn geo_radians(coordinate: f64) -> f64 {
    let degrees = coordinate.trunc();
    let minutes = coordinate - degrees;
    PI * (degrees + 5.0 * minutes / 3.0) / 180.0
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Metric::Euclidean => "euclidean",
            Metric::RoundedEuclidean => "rounded",
            Metric::Geographic => "geo",
        })
    }
}

impl FromStr for Metric {
    type Err = TspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" | "euc" => Ok(Metric::Euclidean),
            "rounded" | "euc_2d" => Ok(Metric::RoundedEuclidean),
            "geo" | "geographic" => Ok(Metric::Geographic),
            other => Err(TspError::Config(format!("unknown metric '{other}'"))),
        }
    }
}

/// A city of the instance.
///
/// `index` is the stable identity; path graphs may hold the same node twice
/// (the closing copy of the start node).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Stable node identity.
    pub index: usize,
    /// Position in the plane.
    pub position: Point,
    /// Construction bookkeeping, cleared by [`GraphProblem::reset`](super::GraphProblem::reset).
    pub visited: bool,
}

impl Node {
    /// Creates an unvisited node.
    pub fn new(index: usize, x: f64, y: f64) -> Self {
        Self {
            index,
            position: Point::new(x, y),
            visited: false,
        }
    }
}

/// Undirected edge between two nodes, identified by node index.
///
/// `(a, b)` and `(b, a)` denote the same edge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Index of the first endpoint.
    pub node1: usize,
    /// Index of the second endpoint.
    pub node2: usize,
    /// Length under the graph metric, derived from the endpoint positions.
    pub distance: f64,
    /// Auxiliary value read from the text format. Not a geometric length.
    pub value: f64,
    /// Pheromone level. Only ant colony runs write it.
    pub pheromone: f64,
}

impl Edge {
    /// Creates the edge between two nodes under `metric`.
    pub fn between(a: &Node, b: &Node, metric: Metric) -> Self {
        Self {
            node1: a.index,
            node2: b.index,
            distance: metric.distance(&a.position, &b.position),
            value: 0.0,
            pheromone: 0.0,
        }
    }

    /// Edge length.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Whether this edge connects `a` and `b`, in either direction.
    pub fn is_between(&self, a: usize, b: usize) -> bool {
        (self.node1 == a && self.node2 == b) || (self.node1 == b && self.node2 == a)
    }

    /// Whether both edges connect the same pair of nodes.
    pub fn is_equal(&self, other: &Edge) -> bool {
        self.is_between(other.node1, other.node2)
    }

    /// The endpoint opposite to `node`, if `node` is an endpoint.
    pub fn opposite(&self, node: usize) -> Option<usize> {
        if node == self.node1 {
            Some(self.node2)
        } else if node == self.node2 {
            Some(self.node1)
        } else {
            None
        }
    }

    /// Endpoints ordered `(min, max)`.
    pub fn key(&self) -> (usize, usize) {
        (self.node1.min(self.node2), self.node1.max(self.node2))
    }
}
