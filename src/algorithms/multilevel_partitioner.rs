use log::debug;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use sprs::TriMat;
use crate::algorithms::recursive_bisection::{greedy_graph_growing, recursive_bisection};
use crate::algorithms::{check_partition_input, Error, JetRefiner};
use crate::graph::Graph;
use crate::imbalance::{imbalance, target_weights};
use crate::Partition;

/// A matching level must shrink the graph by at least this much, otherwise coarsening stops.
const MIN_COARSENING_RATIO: f64 = 0.95;

/// Settings shared by every bisection of a recursive bisection run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BisectionSettings {
    pub coarsening_limit: usize,
    pub initial_attempts: usize,
    pub jet: JetRefiner,
}

fn multilevel_partitioner(
    partition: &mut [usize],
    weights: &[i64],
    graph: &Graph,
    settings: &BisectionSettings,
    num_of_partitions: usize,
    seed: Option<u64>,
) -> Result<MultiLevelMetadata, Error> {

    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy()
    };

    let vertices: Vec<usize> = (0..graph.len()).collect();
    recursive_bisection(graph, weights, &vertices, num_of_partitions, 0, partition, &mut rng, settings);
    let bisection_edge_cut = graph.edge_cut(partition);

    // A final k-way pass over the whole graph. It may not empty a part.
    let mut refined_partition = partition.to_vec();
    let total_weight = weights.iter().sum();
    let targets = target_weights(total_weight, &vec![1; num_of_partitions]);
    let mut jet = settings.jet;
    jet.partition(&mut refined_partition, (graph, weights, &targets[..]))?;

    let mut part_sizes = vec![0usize; num_of_partitions];
    for &part in refined_partition.iter() {
        part_sizes[part] += 1;
    }
    if part_sizes.iter().all(|&size| size > 0) {
        partition.copy_from_slice(&refined_partition);
    }

    let edge_cut = graph.edge_cut(partition);
    debug!("recursive bisection cut {bisection_edge_cut}, after k-way refinement {edge_cut}");

    Ok(MultiLevelMetadata {
        edge_cut,
        imbalance: imbalance(num_of_partitions, partition, weights),
    })
}

/// Split `graph` into two sides whose weights follow `targets`.
///
/// The graph is coarsened by heavy edge matching, the coarsest graph is split
/// by greedy graph growing, and the split is refined by Jet at every level on
/// the way back up.
pub(crate) fn multilevel_bisection(
    graph: &Graph,
    weights: &[i64],
    targets: &[f64],
    rng: &mut SmallRng,
    settings: &BisectionSettings,
) -> Vec<usize> {

    if graph.is_empty() {
        return Vec::new();
    }

    let mut coarse_graphs = vec![graph.clone()];
    let mut weights_coarse_graphs = vec![weights.to_vec()];
    let mut fine_vertex_to_coarse_vertex_mappings = Vec::new();

    let total_weight: i64 = weights.iter().sum();
    let max_vertex_weight = ((1.5 * total_weight as f64) / settings.coarsening_limit.max(1) as f64).ceil() as i64;

    // Keep coarsening the graph until it is small enough or matching stalls.
    loop {
        let level = coarse_graphs.len() - 1;
        if coarse_graphs[level].len() <= settings.coarsening_limit {
            break;
        }

        let (coarse_graph, fine_vertex_to_coarse_vertex_mapping, weights_of_coarse_graph) =
            heavy_edge_matching_coarse(&coarse_graphs[level], rng, &weights_coarse_graphs[level], max_vertex_weight);

        if coarse_graph.len() as f64 > MIN_COARSENING_RATIO * coarse_graphs[level].len() as f64 {
            break;
        }

        coarse_graphs.push(coarse_graph);
        weights_coarse_graphs.push(weights_of_coarse_graph);
        fine_vertex_to_coarse_vertex_mappings.push(fine_vertex_to_coarse_vertex_mapping);
    }

    let coarsest = coarse_graphs.len() - 1;
    let mut coarse_graph_partition = greedy_graph_growing(
        &coarse_graphs[coarsest],
        &weights_coarse_graphs[coarsest],
        targets,
        rng,
        settings.initial_attempts,
        settings.jet.balance_factor,
    );

    for index in (0..coarse_graphs.len()).rev() {
        // The refiner only rejects inputs of mismatched length, which the levels never produce.
        let mut jet = settings.jet;
        if let Err(error) = jet.partition(&mut coarse_graph_partition,
                                          (&coarse_graphs[index], &weights_coarse_graphs[index][..], targets)) {
            debug!("skipping refinement at level {index}: {error}");
        }

        // Uncoarsen the graph till we reach the initial graph.
        if index > 0 {
            coarse_graph_partition = partition_uncoarse(&coarse_graph_partition, &fine_vertex_to_coarse_vertex_mappings[index - 1]);
        }
    }

    coarse_graph_partition
}

// This function coarsens the graph using heavy edge matching algorithm.
fn heavy_edge_matching_coarse(graph: &Graph, rng: &mut SmallRng, weights: &[i64], max_vertex_weight: i64) -> (Graph, Vec<usize>, Vec<i64>) {

    let mut matched_nodes = vec![false; graph.len()];
    let mut fine_vertex_to_coarse_vertex = vec![0; graph.len()];

    let mut vertices: Vec<usize> = (0..graph.len()).collect();
    vertices.shuffle(rng);
    let mut super_vertex = 0usize;

    // Iterate over the vertices of the graph.
    for vertex in vertices {
        // If already matched, then ignore
        if matched_nodes[vertex] {
            continue;
        }
        // For each vertex, find its most connected unmatched neighbor whose merge stays under
        // the maximum vertex weight.
        let mut heaviest_edge_weight = 0;
        let mut heaviest_edge_connected_vertex = None;

        for (neighbor_vertex, edge_weight) in graph.neighbors(vertex) {
            if edge_weight > heaviest_edge_weight
                && !matched_nodes[neighbor_vertex]
                && weights[vertex] + weights[neighbor_vertex] <= max_vertex_weight {
                heaviest_edge_weight = edge_weight;
                heaviest_edge_connected_vertex = Some(neighbor_vertex);
            }
        }

        matched_nodes[vertex] = true;
        fine_vertex_to_coarse_vertex[vertex] = super_vertex;

        if let Some(matched_vertex) = heaviest_edge_connected_vertex {
            // The original node and its most connected vertex are now one coarse vertex.
            matched_nodes[matched_vertex] = true;
            fine_vertex_to_coarse_vertex[matched_vertex] = super_vertex;
        }
        super_vertex += 1;
    }

    // We combine the edges of a vertex whose neighbors are merged in the coarsed graph.
    // Eg. If vertex 0 is connected to vertex 2 and vertex 3 which is merged into vertex 1 in the
    // coarse graph, then in the coarse graph vertex 0 will be connected to vertex 1 with
    // an edge weight that is the sum of the weights of edges (0, 2) and (0, 3).
    let mut edge_to_weight_mapping = FxHashMap::with_capacity_and_hasher(graph.graph_csr.nnz(), Default::default());

    for vertex in 0..graph.len() {
        for (neighbor, edge_weight) in graph.neighbors(vertex) {

            if fine_vertex_to_coarse_vertex[vertex] != fine_vertex_to_coarse_vertex[neighbor] {
                let key = (fine_vertex_to_coarse_vertex[vertex], fine_vertex_to_coarse_vertex[neighbor]);
                *edge_to_weight_mapping.entry(key).or_insert(0) += edge_weight;
            }
        }
    }

    // Construction of the coarse graph. First contruct a TriMat and then convert it to CSR format.
    let mut triplet_matrix = TriMat::with_capacity((super_vertex, super_vertex), edge_to_weight_mapping.len());

    for (&(vertex1, vertex2), &weight) in edge_to_weight_mapping.iter() {
        triplet_matrix.add_triplet(vertex1, vertex2, weight);
    }

    let new_coarse_graph = Graph { graph_csr: triplet_matrix.to_csr() };

    // Determine the new weights of the vertices.
    let mut weights_coarse_graph = vec![0; super_vertex];
    for (vertex, &coarse_vertex) in fine_vertex_to_coarse_vertex.iter().enumerate() {
        weights_coarse_graph[coarse_vertex] += weights[vertex];
    }

    (new_coarse_graph, fine_vertex_to_coarse_vertex, weights_coarse_graph)
}

// Projects the partition of a coarse graph back to the finer graph one level up.
fn partition_uncoarse(partition: &[usize], fine_vertex_to_coarse_vertex_mapping: &[usize]) -> Vec<usize> {
    // If vertex 1 and 2 of the uncoarsed graph were merged into vertex 0 in the coarsed graph
    // and it belonged to partition 0, then vertex 1 and 2 would belong to partition 0 in the uncoarsed graph.
    fine_vertex_to_coarse_vertex_mapping
        .iter()
        .map(|&coarse_vertex| partition[coarse_vertex])
        .collect()
}

/// Diagnostic data of a multilevel partitioner run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiLevelMetadata {
    /// Total weight of the edges between parts.
    pub edge_cut: i64,

    /// Largest relative overload of a part.
    pub imbalance: f64,
}

/// Multilevel Partitioner
///
/// Recursive bisection where every bisection is multilevel (Heavy Edge Matching, Greedy Graph
/// Growing, Jet Refinement), followed by a k-way Jet pass over the whole graph.
///
/// # Example
///
/// ```rust
/// use bus_cut::algorithms::MultiLevelPartitioner;
/// use bus_cut::graph::Graph;
/// use bus_cut::Partition;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
///
///     let graph = Graph::from_edges(4, &[(0, 1, 1), (1, 2, 1), (2, 3, 1)]);
///     let weights = vec![1; graph.len()];
///     let mut partition = vec![0; graph.len()];
///
///     MultiLevelPartitioner { seed: Some(7), ..Default::default() }.partition(&mut partition, (&graph, &weights[..]))?;
///
///     let edge_cut = graph.edge_cut(&partition);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MultiLevelPartitioner {
    /// Number of partitions
    pub num_of_partitions: usize,

    /// Seed for MultiLevel Graph Partitioner
    pub seed: Option<u64>,

    /// Coarsening stops once a graph has at most this many vertices.
    pub coarsening_limit: usize,

    /// Number of greedy graph growing attempts on the coarsest graph; the smallest cut wins.
    pub initial_attempts: usize,

    /// This indicates the number of times jetlp/jetrw combination should run without seeing
    /// any improvement before terminating the algorithm
    pub jet_iterations: u32,

    /// A numerical factor ranging between 0.0 and 1.0 that determines the maximum allowable
    /// deviation for a partition. The maximum weight of a partition with a balance factor of lambda
    /// can be (1+lambda)*(target weight of the partition).
    pub balance_factor: f64,

    /// A numerical ratio ranging from 0.0 to 1.0 that determines which vertices are eligible for consideration based on
    /// their gain value in the first filter.
    pub jet_filter_ratio: f64,

    /// A numerical factor ranging from 0.0 to 1.0 that is used to determine when to reset the iteration counter.
    /// If the new edge cut is less than tolerance factor times the best edge cut, then the
    /// iteration counter would be reset, otherwise the iteration counter would increment
    /// as it indicates the edge cut is becoming better at a very slow pace.
    pub jet_tolerance_factor: f64,
}

impl Default for MultiLevelPartitioner {
    fn default() -> Self {
        MultiLevelPartitioner {
            num_of_partitions: 2,
            seed: None,
            coarsening_limit: 40,
            initial_attempts: 4,
            jet_iterations: 12,
            balance_factor: 0.03,
            jet_filter_ratio: 0.75,
            jet_tolerance_factor: 0.99,
        }
    }
}

impl MultiLevelPartitioner {
    pub(crate) fn bisection_settings(&self) -> BisectionSettings {
        BisectionSettings {
            coarsening_limit: self.coarsening_limit,
            initial_attempts: self.initial_attempts.max(1),
            jet: JetRefiner {
                iterations: self.jet_iterations,
                balance_factor: self.balance_factor,
                filter_ratio: self.jet_filter_ratio,
                tolerance_factor: self.jet_tolerance_factor,
            },
        }
    }
}

impl<'a> Partition<(&'a Graph, &'a [i64])> for MultiLevelPartitioner {
    type Metadata = MultiLevelMetadata;
    type Error = Error;

    fn partition(
        &mut self,
        part_ids: &mut [usize],
        (adjacency, weights): (&'a Graph, &'a [i64]),
    ) -> Result<Self::Metadata, Self::Error> {

        if part_ids.len() != weights.len() {
            return Err(Error::InputLenMismatch {
                expected: part_ids.len(),
                actual: weights.len(),
            });
        }
        check_partition_input(part_ids, adjacency.len(), self.num_of_partitions)?;

        multilevel_partitioner(
            part_ids,
            weights,
            adjacency,
            &self.bisection_settings(),
            self.num_of_partitions,
            self.seed,
        )
    }
}
