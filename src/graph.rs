// This file has code from https://github.com/LIHPC-Computational-Geometry/coupe

use rayon::iter::IntoParallelIterator;
use rayon::iter::ParallelIterator as _;
use rustc_hash::{FxHashMap, FxHashSet};
use sprs::{CsMat, TriMat};
use crate::error::Error;

/// Struct that represents a weighted undirected graph
#[derive(Debug, Clone)]
pub struct Graph {
    /// The CsMat (from sprs) is used to store the graph as a symmetric sparse matrix in CSR format
    pub graph_csr: CsMat<i64>
}

impl Graph {

    /// Build a graph from an undirected edge list.
    ///
    /// Every edge is stored in both directions. Repeated edges add up their
    /// weights and self loops are skipped.
    pub fn from_edges(num_of_vertices: usize, edges: &[(usize, usize, i64)]) -> Self {
        let mut triplet_matrix = TriMat::with_capacity((num_of_vertices, num_of_vertices), 2 * edges.len());

        for &(vertex1, vertex2, edge_weight) in edges {
            if vertex1 == vertex2 {
                continue;
            }
            triplet_matrix.add_triplet(vertex1, vertex2, edge_weight);
            triplet_matrix.add_triplet(vertex2, vertex1, edge_weight);
        }

        Self {
            graph_csr: triplet_matrix.to_csr()
        }
    }

    /// The number of vertices in the graph.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.graph_csr.rows(), self.graph_csr.cols());
        self.graph_csr.rows()
    }

    /// Whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.graph_csr.nnz() / 2
    }

    /// An iterator over the neighbors of the given vertex.
    pub fn neighbors(&self, vertex: usize) -> impl Iterator<Item = (usize, i64)> + '_ {
        let no_neighbors: (&[usize], &[i64]) = (&[], &[]);
        let (indices, data) = self.graph_csr
            .outer_view(vertex)
            .map(|view| view.into_raw_storage())
            .unwrap_or(no_neighbors);
        indices.iter().cloned().zip(data.iter().cloned())
    }

    /// Get edge weight for a pair of vertices.
    pub fn get_edge_weight(&self, vertex1: usize, vertex2: usize) -> Option<i64> {
        self.graph_csr.get(vertex1, vertex2).cloned()
    }

    /// The edge cut of a partition.
    ///
    /// Given a partition and a weighted graph, the edge cut of a partition is
    /// defined as the total weight of the edges that link vertices of
    /// different parts.
    ///
    /// # Example
    ///
    /// A partition with two parts (0 and 1)
    /// ```text,ignore
    ///          0
    ///    1*──┆─*────* 0
    ///    ╱ ╲ ┆╱    ╱
    ///  1*  1*┆ <┈┈╱┈┈┈ Dotted line passes through edged that contribute to edge cut.
    ///    ╲ ╱ ┆   ╱     If all edges have a weight of 1 then edge_cut = 3
    ///    1*  ┆╲ ╱
    ///          * 0
    /// ```
    pub fn edge_cut(&self, partition: &[usize]) -> i64
    {
        debug_assert_eq!(self.len(), partition.len());

        (0..self.len())
            .into_par_iter()
            .map(|vertex| {
                let vertex_part = partition[vertex];
                self.neighbors(vertex)
                    .take_while(|(neighbor, _edge_weight)| *neighbor < vertex)
                    .filter(|(neighbor, _edge_weight)| vertex_part != partition[*neighbor])
                    .map(|(_neighbor, edge_weight)| edge_weight)
                    .sum::<i64>()
            })
            .sum()
    }

    /// The subgraph induced by `vertices`. Vertex `vertices[i]` becomes vertex `i`.
    pub fn subgraph(&self, vertices: &[usize]) -> Graph {
        let mut local_ids = FxHashMap::with_capacity_and_hasher(vertices.len(), Default::default());
        for (local_id, &vertex) in vertices.iter().enumerate() {
            local_ids.insert(vertex, local_id);
        }

        let mut triplet_matrix = TriMat::new((vertices.len(), vertices.len()));
        for (local_id, &vertex) in vertices.iter().enumerate() {
            for (neighbor, edge_weight) in self.neighbors(vertex) {
                if let Some(&local_neighbor) = local_ids.get(&neighbor) {
                    triplet_matrix.add_triplet(local_id, local_neighbor, edge_weight);
                }
            }
        }

        Graph {
            graph_csr: triplet_matrix.to_csr()
        }
    }
}

/// A social graph: students are string-labeled vertices, friendships are edges.
///
/// Labels map to dense vertex ids `0..len()`. Self loops are kept next to the
/// adjacency matrix since partitioning never cuts them.
#[derive(Debug, Clone)]
pub struct SocialGraph {
    adjacency: Graph,
    labels: Vec<String>,
    index: FxHashMap<String, usize>,
    self_loops: Vec<bool>,
}

impl SocialGraph {

    /// Build a graph from vertex labels and edges between labels.
    pub fn from_labeled_edges<S: AsRef<str>>(vertices: &[S], edges: &[(S, S)]) -> Result<Self, Error> {
        let labels: Vec<String> = vertices.iter().map(|label| label.as_ref().to_string()).collect();
        let mut index = FxHashMap::with_capacity_and_hasher(labels.len(), Default::default());
        for (vertex, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), vertex).is_some() {
                return Err(Error::DuplicateVertex { label: label.clone() });
            }
        }

        let lookup = |label: &str| {
            index.get(label).copied().ok_or_else(|| Error::UnknownVertex { label: label.to_string() })
        };
        let edges = edges
            .iter()
            .map(|(a, b)| Ok((lookup(a.as_ref())?, lookup(b.as_ref())?)))
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self::from_indexed(labels, index, edges))
    }

    fn from_indexed(labels: Vec<String>, index: FxHashMap<String, usize>, edges: Vec<(usize, usize)>) -> Self {
        let mut self_loops = vec![false; labels.len()];
        let mut seen = FxHashSet::default();
        let mut weighted_edges = Vec::with_capacity(edges.len());

        for (vertex1, vertex2) in edges {
            if vertex1 == vertex2 {
                self_loops[vertex1] = true;
            } else if seen.insert((vertex1.min(vertex2), vertex1.max(vertex2))) {
                weighted_edges.push((vertex1, vertex2, 1));
            }
        }

        Self {
            adjacency: Graph::from_edges(labels.len(), &weighted_edges),
            labels,
            index,
            self_loops,
        }
    }

    /// The number of students.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Friendships between distinct students, as a weighted adjacency matrix.
    pub fn adjacency(&self) -> &Graph {
        &self.adjacency
    }

    pub fn label(&self, vertex: usize) -> &str {
        &self.labels[vertex]
    }

    pub fn vertex_id(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// The number of edges, self loops included.
    pub fn num_edges(&self) -> usize {
        self.adjacency.num_edges() + self.self_loops.iter().filter(|&&looped| looped).count()
    }

    /// Drop every edge incident to `vertices`.
    ///
    /// Vertex ids and labels stay valid: a removed vertex is left isolated, so
    /// it no longer contributes to any edge count.
    pub fn remove_vertices(&mut self, vertices: &[usize]) {
        if vertices.is_empty() {
            return;
        }
        let mut removed = vec![false; self.len()];
        for &vertex in vertices {
            removed[vertex] = true;
            self.self_loops[vertex] = false;
        }

        let adjacency = &self.adjacency;
        let kept_edges: Vec<(usize, usize, i64)> = (0..self.len())
            .filter(|&vertex| !removed[vertex])
            .flat_map(|vertex| {
                adjacency
                    .neighbors(vertex)
                    .filter(move |&(neighbor, _)| vertex < neighbor)
                    .map(move |(neighbor, edge_weight)| (vertex, neighbor, edge_weight))
            })
            .filter(|&(_, neighbor, _)| !removed[neighbor])
            .collect();

        self.adjacency = Graph::from_edges(self.len(), &kept_edges);
    }

    /// The number of edges whose endpoints share a part, self loops included.
    pub fn same_part_edges(&self, partition: &[usize]) -> usize {
        let cut = self.adjacency.edge_cut(partition) as usize;
        self.num_edges() - cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> SocialGraph {
        SocialGraph::from_labeled_edges(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("C", "D"), ("B", "C")],
        ).unwrap()
    }

    #[test]
    fn test_from_edges_is_symmetric() {
        // Arrange
        let graph = Graph::from_edges(3, &[(0, 1, 5), (0, 2, 10), (1, 2, 15), (2, 2, 7)]);

        // Assert
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.num_edges(), 3);
        assert_eq!(graph.get_edge_weight(1, 0), Some(5));
        assert_eq!(graph.get_edge_weight(2, 1), Some(15));
        assert!(graph.get_edge_weight(2, 2).is_none());
    }

    #[test]
    fn test_edge_cut() {
        // Arrange
        let graph = Graph::from_edges(4, &[(0, 1, 1), (1, 2, 3), (2, 3, 1), (3, 0, 2)]);

        // Act
        let cut = graph.edge_cut(&[0, 0, 1, 1]);

        // Assert
        assert_eq!(cut, 5);
    }

    #[test]
    fn test_subgraph_renumbers_vertices() {
        // Arrange
        let graph = Graph::from_edges(5, &[(0, 1, 1), (1, 2, 2), (2, 3, 3), (3, 4, 4)]);

        // Act
        let subgraph = graph.subgraph(&[3, 2, 4]);

        // Assert
        assert_eq!(subgraph.len(), 3);
        assert_eq!(subgraph.num_edges(), 2);
        assert_eq!(subgraph.get_edge_weight(0, 1), Some(3));
        assert_eq!(subgraph.get_edge_weight(0, 2), Some(4));
        assert!(subgraph.get_edge_weight(1, 2).is_none());
    }

    #[test]
    fn test_social_graph_collapses_duplicate_edges() {
        // Arrange
        let graph = SocialGraph::from_labeled_edges(
            &["a", "b", "c"],
            &[("a", "b"), ("b", "a"), ("c", "c")],
        ).unwrap();

        // Assert
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.adjacency().num_edges(), 1);
        assert_eq!(graph.adjacency().get_edge_weight(0, 1), Some(1));
        assert_eq!(graph.same_part_edges(&[0, 1, 2]), 1);
    }

    #[test]
    fn test_social_graph_rejects_unknown_endpoint() {
        let result = SocialGraph::from_labeled_edges(&["a"], &[("a", "z")]);

        assert!(matches!(result, Err(Error::UnknownVertex { label }) if label == "z"));
    }

    #[test]
    fn test_social_graph_rejects_duplicate_label() {
        let result = SocialGraph::from_labeled_edges::<&str>(&["a", "a"], &[]);

        assert!(matches!(result, Err(Error::DuplicateVertex { .. })));
    }

    #[test]
    fn test_remove_vertices_drops_incident_edges_on_the_copy_only() {
        // Arrange
        let graph = diamond();
        let mut scratch = graph.clone();

        // Act
        scratch.remove_vertices(&[0, 1]);

        // Assert
        assert_eq!(scratch.num_edges(), 1);
        assert_eq!(scratch.adjacency().get_edge_weight(2, 3), Some(1));
        assert!(scratch.adjacency().get_edge_weight(1, 2).is_none());
        assert_eq!(scratch.len(), 4);
        assert_eq!(graph.num_edges(), 3);
    }

    #[test]
    fn test_same_part_edges() {
        let graph = diamond();

        assert_eq!(graph.same_part_edges(&[0, 0, 1, 1]), 2);
        assert_eq!(graph.same_part_edges(&[0, 1, 0, 1]), 0);
    }
}
