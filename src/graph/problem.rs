//! The graph model shared by every algorithm.

use std::collections::{HashMap, HashSet};

use rand::Rng;

use super::types::{Edge, Metric, Node, Point};
use crate::error::{TspError, TspResult};

/// A TSP instance or a tour over it.
///
/// Two construction modes are used:
///
/// - **complete**: every unordered pair of distinct nodes has exactly one
///   edge ([`GraphProblem::complete`], [`GraphProblem::connect_all_nodes`]);
/// - **path**: edge `i` connects node `i` and node `i + 1`; a closed path
///   repeats the start node at the end ([`GraphProblem::path`]).
///
/// For a path graph [`costs`](GraphProblem::costs) is the tour length.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphProblem {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    metric: Metric,
}

impl Default for GraphProblem {
    fn default() -> Self {
        Self::new(Metric::default())
    }
}

impl GraphProblem {
    /// Creates an empty graph.
    pub fn new(metric: Metric) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            metric,
        }
    }

    /// Complete Euclidean graph over `points`, node `i` at `points[i]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::graph::{GraphProblem, Point};
    ///
    /// let graph = GraphProblem::from_points(&[
    ///     Point::new(0.0, 0.0),
    ///     Point::new(3.0, 0.0),
    ///     Point::new(3.0, 4.0),
    /// ])
    /// .unwrap();
    /// assert_eq!(graph.edges().len(), 3);
    /// ```
    pub fn from_points(points: &[Point]) -> TspResult<Self> {
        Self::from_points_with_metric(points, Metric::Euclidean)
    }

    /// Complete graph over `points` under `metric`.
    pub fn from_points_with_metric(points: &[Point], metric: Metric) -> TspResult<Self> {
        let nodes = points
            .iter()
            .enumerate()
            .map(|(i, p)| Node::new(i, p.x, p.y))
            .collect();
        Self::complete(nodes, metric)
    }

    /// Complete graph over `nodes`.
    ///
    /// Fails on repeated node indices, repeated positions, or pairs the
    /// metric puts at distance zero.
    pub fn complete(nodes: Vec<Node>, metric: Metric) -> TspResult<Self> {
        let mut graph = Self {
            nodes,
            edges: Vec::new(),
            metric,
        };
        graph.check_nodes()?;
        graph.connect_all_nodes()?;
        Ok(graph)
    }

    /// Random complete graph with `count` nodes on the integer grid
    /// `[0, width) x [0, height)`. Positions already taken are redrawn.
    pub fn random<R: Rng>(width: u32, height: u32, count: usize, rng: &mut R) -> TspResult<Self> {
        if width == 0 || height == 0 || (width as u64) * (height as u64) < count as u64 {
            return Err(TspError::Config(format!(
                "a {width}x{height} grid cannot hold {count} distinct nodes"
            )));
        }

        let mut taken = HashSet::with_capacity(count);
        let mut nodes = Vec::with_capacity(count);
        while nodes.len() < count {
            let x = rng.random_range(0..width);
            let y = rng.random_range(0..height);
            if taken.insert((x, y)) {
                nodes.push(Node::new(nodes.len(), x as f64, y as f64));
            }
        }
        Self::complete(nodes, Metric::Euclidean)
    }

    /// Path graph visiting `nodes` in order, closed back to the first node
    /// when `closed` is set.
    pub fn path(mut nodes: Vec<Node>, closed: bool, metric: Metric) -> Self {
        if closed && nodes.len() > 1 {
            let start = nodes[0].clone();
            nodes.push(start);
        }
        let mut graph = Self {
            nodes,
            edges: Vec::new(),
            metric,
        };
        graph.connect_path_nodes();
        graph
    }

    /// Closed tour visiting the distinct nodes of this graph in their
    /// stored order.
    pub fn ordered(&self) -> Self {
        let nodes = self
            .distinct_nodes()
            .iter()
            .map(|n| Node {
                visited: false,
                ..n.clone()
            })
            .collect();
        Self::path(nodes, true, self.metric)
    }

    /// Adds an edge for every unconnected pair of distinct nodes.
    ///
    /// Idempotent; existing edges keep their value and pheromone.
    pub fn connect_all_nodes(&mut self) -> TspResult<()> {
        let mut existing: HashSet<(usize, usize)> = self.edges.iter().map(Edge::key).collect();
        let count = self.distinct_len();
        self.edges.reserve(count * count.saturating_sub(1) / 2);

        for i in 0..count {
            for j in (i + 1)..count {
                let (a, b) = (&self.nodes[i], &self.nodes[j]);
                let key = (a.index.min(b.index), a.index.max(b.index));
                if !existing.insert(key) {
                    continue;
                }
                let edge = Edge::between(a, b, self.metric);
                if edge.distance <= 0.0 {
                    return Err(TspError::ZeroDistance {
                        first: a.index,
                        second: b.index,
                    });
                }
                self.edges.push(edge);
            }
        }
        Ok(())
    }

    fn connect_path_nodes(&mut self) {
        self.edges = self
            .nodes
            .windows(2)
            .map(|w| Edge::between(&w[0], &w[1], self.metric))
            .collect();
    }

    /// Clears per-run markers: visited flags and pheromone.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.visited = false;
        }
        for edge in &mut self.edges {
            edge.pheromone = 0.0;
        }
    }

    /// Sum of all edge lengths; the tour length for a path graph.
    pub fn costs(&self) -> f64 {
        self.edges.iter().map(Edge::distance).sum()
    }

    /// Node sequence. For a closed path the start node appears twice.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edge list.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub(crate) fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    /// Metric used for every edge of this graph.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Whether the node sequence ends on its start node.
    pub fn is_closed(&self) -> bool {
        self.nodes.len() > 1 && self.nodes[0].index == self.nodes[self.nodes.len() - 1].index
    }

    /// Number of distinct nodes.
    pub fn node_count(&self) -> usize {
        self.distinct_len()
    }

    fn distinct_len(&self) -> usize {
        self.nodes.len() - usize::from(self.is_closed())
    }

    /// Nodes without the closing copy of the start node.
    pub fn distinct_nodes(&self) -> &[Node] {
        &self.nodes[..self.distinct_len()]
    }

    /// Node indices in sequence order.
    pub fn tour(&self) -> Vec<usize> {
        self.nodes.iter().map(|n| n.index).collect()
    }

    /// The node with identity `index`.
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.iter().find(|n| n.index == index)
    }

    /// The edge connecting `a` and `b`, if any.
    pub fn edge_between(&self, a: usize, b: usize) -> Option<&Edge> {
        self.edges.iter().find(|e| e.is_between(a, b))
    }

    /// Distance between two nodes under the graph metric, edge or not.
    pub fn distance(&self, a: &Node, b: &Node) -> f64 {
        self.metric.distance(&a.position, &b.position)
    }

    /// Marks every occurrence of node `index` as visited.
    pub fn mark_visited(&mut self, index: usize) {
        for node in self.nodes.iter_mut().filter(|n| n.index == index) {
            node.visited = true;
        }
    }

    /// Incident edge positions per node index.
    pub fn adjacency(&self) -> HashMap<usize, Vec<usize>> {
        let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::with_capacity(self.nodes.len());
        for (position, edge) in self.edges.iter().enumerate() {
            adjacency.entry(edge.node1).or_default().push(position);
            adjacency.entry(edge.node2).or_default().push(position);
        }
        adjacency
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Rejects repeated indices and repeated positions.
    pub(crate) fn check_nodes(&self) -> TspResult<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.index) {
                return Err(TspError::DuplicateNode {
                    line: 0,
                    index: node.index,
                });
            }
        }

        let mut positions: HashMap<(u64, u64), usize> = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let key = (node.position.x.to_bits(), node.position.y.to_bits());
            if let Some(&first) = positions.get(&key) {
                return Err(TspError::DuplicatePosition {
                    first,
                    second: node.index,
                });
            }
            positions.insert(key, node.index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn triangle() -> GraphProblem {
        GraphProblem::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 4.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_triangle_edge_lengths() {
        let graph = triangle();
        let mut lengths: Vec<f64> = graph.edges().iter().map(Edge::distance).collect();
        lengths.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(lengths.len(), 3);
        assert!((lengths[0] - 3.0).abs() < 1e-12);
        assert!((lengths[1] - 4.0).abs() < 1e-12);
        assert!((lengths[2] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangle_closed_tour_costs_12() {
        let tour = triangle().ordered();
        assert!(tour.is_closed());
        assert_eq!(tour.tour(), vec![0, 1, 2, 0]);
        assert!((tour.costs() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_complete_graph_has_every_pair_once() {
        let mut rng = create_rng(Some(1));
        let graph = GraphProblem::random(50, 50, 12, &mut rng).unwrap();
        assert_eq!(graph.edges().len(), 12 * 11 / 2);
        let keys: HashSet<(usize, usize)> = graph.edges().iter().map(Edge::key).collect();
        assert_eq!(keys.len(), graph.edges().len());
        assert!(graph.edges().iter().all(|e| e.node1 != e.node2));
    }

    #[test]
    fn test_connect_all_nodes_is_idempotent() {
        let mut graph = triangle();
        graph.connect_all_nodes().unwrap();
        graph.connect_all_nodes().unwrap();
        assert_eq!(graph.edges().len(), 3);
    }

    #[test]
    fn test_duplicate_position_rejected() {
        let result = GraphProblem::from_points(&[
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(1.0, 1.0),
        ]);
        assert!(matches!(
            result,
            Err(TspError::DuplicatePosition { first: 0, second: 2 })
        ));
    }

    #[test]
    fn test_rounded_metric_zero_distance_rejected() {
        let result = GraphProblem::from_points_with_metric(
            &[Point::new(0.0, 0.0), Point::new(0.1, 0.1)],
            Metric::RoundedEuclidean,
        );
        assert!(matches!(result, Err(TspError::ZeroDistance { .. })));
    }

    #[test]
    fn test_random_rejects_small_grid() {
        let mut rng = create_rng(Some(1));
        assert!(GraphProblem::random(2, 2, 5, &mut rng).is_err());
        let graph = GraphProblem::random(2, 2, 4, &mut rng).unwrap();
        assert_eq!(graph.node_count(), 4);
    }

    #[test]
    fn test_open_path() {
        let graph = triangle();
        let path = GraphProblem::path(graph.nodes().to_vec(), false, Metric::Euclidean);
        assert!(!path.is_closed());
        assert_eq!(path.edges().len(), 2);
        assert!((path.costs() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset_clears_markers() {
        let mut graph = triangle();
        graph.mark_visited(1);
        graph.edges_mut()[0].pheromone = 0.5;
        assert!(graph.node(1).unwrap().visited);
        graph.reset();
        assert!(graph.nodes().iter().all(|n| !n.visited), "reset must clear visit markers");
        assert!(graph.edges().iter().all(|e| e.pheromone == 0.0));
    }

    #[test]
    fn test_mark_visited_covers_closing_copy() {
        let mut tour = triangle().ordered();
        tour.mark_visited(0);
        let nodes = tour.nodes();
        assert!(nodes[0].visited && nodes[3].visited, "both copies of the start are marked");
        assert!(!nodes[1].visited && !nodes[2].visited);
    }

    #[test]
    fn test_repeated_index_rejected() {
        let result = GraphProblem::complete(
            vec![Node::new(0, 0.0, 0.0), Node::new(1, 1.0, 0.0), Node::new(0, 2.0, 2.0)],
            Metric::Euclidean,
        );
        assert!(matches!(
            result,
            Err(TspError::DuplicateNode { line: 0, index: 0 })
        ));
    }

    #[test]
    fn test_adjacency_lists_incident_edges() {
        let graph = triangle();
        let adjacency = graph.adjacency();
        assert_eq!(adjacency.len(), 3);
        assert!(adjacency.values().all(|edges| edges.len() == 2));
    }

    proptest! {
        #[test]
        fn prop_path_costs_match_consecutive_distances(
            coords in proptest::collection::hash_set((0i32..1000, 0i32..1000), 2..30),
            closed in any::<bool>(),
        ) {
            let nodes: Vec<Node> = coords
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Node::new(i, x as f64, y as f64))
                .collect();
            let path = GraphProblem::path(nodes.clone(), closed, Metric::Euclidean);

            let mut expected: f64 = nodes
                .windows(2)
                .map(|w| Metric::Euclidean.distance(&w[0].position, &w[1].position))
                .sum();
            if closed {
                expected += Metric::Euclidean.distance(
                    &nodes[nodes.len() - 1].position,
                    &nodes[0].position,
                );
            }

            let edge_sum: f64 = path.edges().iter().map(|e| e.distance).sum();
            prop_assert!((path.costs() - edge_sum).abs() < 1e-9);
            prop_assert!((path.costs() - expected).abs() < 1e-6);
        }
    }
}
