// This file contains the implementation of the Jet Refiner algorithm used in the refining phase
// # Reference
//
// Gilbert, Michael S., et al. "Jet: Multilevel graph partitioning on graphics processing units."
// SIAM Journal on Scientific Computing 46.5 (2024): B700-B724.
//
// Part weights are balanced against explicit target weights rather than an even split, so the
// refiner also serves the uneven bisections produced by recursive bisection.

use crate::algorithms::Error;
use crate::graph::Graph;
use crate::imbalance::{compute_parts_load, imbalance_against_targets};
use rayon::prelude::*;
use rustc_hash::FxHashSet;

#[derive(Debug)]
struct Move {
    // Struct to store data about a move that can either lead to better edge cuts or
    // re-balance the weights.

    //The index of the vertex.
    vertex: usize,

    // The partition ID of the partition where the vertex should move to.
    partition_id: usize
}

#[allow(clippy::too_many_arguments)]
fn jet_refiner(
    partition: &mut [usize],
    weights: &[i64],
    adjacency: &Graph,
    targets: &[f64],
    iterations: u32,
    balance_factor: f64,
    filter_ratio: f64,
    tolerance_factor: f64,
) {

    debug_assert_eq!(partition.len(), weights.len());
    debug_assert_eq!(partition.len(), adjacency.len());

    if partition.is_empty() {
        return;
    }

    let mut partition_iter = partition.to_vec();
    let mut current_iteration = 0;
    let mut vertex_connectivity_data_structure = init_vertex_connectivity_data_structure(adjacency,
                                                                                         partition,
                                                                                         targets.len());
    let mut locked_vertices = vec![false; adjacency.len()];

    let mut imbalance_of_best_partition = partition_imbalance(partition, weights, targets);
    let mut best_partition_edge_cut = adjacency.edge_cut(partition);
    let mut imbalance_of_current_iter_partition = imbalance_of_best_partition;

    while current_iteration < iterations {

        let moves = if imbalance_of_current_iter_partition < balance_factor {
            // the jetlp subroutine is used to generate a better partition
            let moves = jetlp(adjacency,
                              &partition_iter,
                              &vertex_connectivity_data_structure,
                              &locked_vertices,
                              filter_ratio);

            // Vertices that move now are locked for the next iteration, which prevents oscillation.
            lock_vertices(&moves, &mut locked_vertices);
            moves
        } else {
            // the jetrw subroutine is run to balance the weights of the partition
            jetrw(adjacency,
                  &partition_iter,
                  weights,
                  &vertex_connectivity_data_structure,
                  targets,
                  balance_factor)
        };

        // The moves from either jetlp or jetrw are applied on the current partition state.
        update_parts_and_vertex_connectivity(adjacency,
                                             &mut partition_iter,
                                             &mut vertex_connectivity_data_structure,
                                             moves);

        imbalance_of_current_iter_partition = partition_imbalance(&partition_iter, weights, targets);
        let curr_iter_partition_edge_cut = adjacency.edge_cut(&partition_iter);

        if imbalance_of_current_iter_partition < balance_factor {
            let best_is_balanced = imbalance_of_best_partition < balance_factor;

            if !best_is_balanced || curr_iter_partition_edge_cut < best_partition_edge_cut {
                // Only a significant improvement resets the iteration counter.
                let threshold = (tolerance_factor * (best_partition_edge_cut as f64)).floor() as i64;
                if !best_is_balanced || curr_iter_partition_edge_cut < threshold {
                    current_iteration = 0;
                } else {
                    current_iteration += 1;
                }

                partition.copy_from_slice(&partition_iter);
                imbalance_of_best_partition = imbalance_of_current_iter_partition;
                best_partition_edge_cut = curr_iter_partition_edge_cut;
            } else {
                current_iteration += 1;
            }
        } else if imbalance_of_current_iter_partition < imbalance_of_best_partition {
            // Current iteration is better balanced than the best iteration, hence this is made
            // the best iteration
            partition.copy_from_slice(&partition_iter);
            imbalance_of_best_partition = imbalance_of_current_iter_partition;
            best_partition_edge_cut = curr_iter_partition_edge_cut;
            current_iteration = 0
        } else {
            current_iteration += 1;
        }
    }
}

fn partition_imbalance(partition: &[usize], weights: &[i64], targets: &[f64]) -> f64 {
    let part_loads = compute_parts_load(partition, targets.len(), weights);
    imbalance_against_targets(&part_loads, targets)
}

fn jetlp(graph: &Graph, partition: &[usize], vertex_connectivity_data_structure: &[Vec<i64>], locked_vertices: &[bool], filter_ratio: f64) -> Vec<Move> {

    // iterate over all the vertices to find out which vertices provides the best gain (decrease in edge cut)
    let (partition_dest, gain): (Vec<usize>, Vec<i64>) = (0..graph.len()).into_par_iter().map(|vertex| {
        let mut calculated_gain = 0;
        let mut dest_partition = partition[vertex];
        if !locked_vertices[vertex] {
            let mut neighbors_eligible_partitions = Vec::new();

            for (neighbor_vertex, _edge_weight) in graph.neighbors(vertex) {
                let neighbor_partition = partition[neighbor_vertex];
                if neighbor_partition != partition[vertex] && !neighbors_eligible_partitions.contains(&neighbor_partition) {
                    neighbors_eligible_partitions.push(neighbor_partition);
                }
            }

            if !neighbors_eligible_partitions.is_empty() {
                dest_partition = get_most_connected_partition(
                    vertex,
                    &neighbors_eligible_partitions,
                    vertex_connectivity_data_structure,
                );

                calculated_gain = conn(
                    vertex,
                    dest_partition,
                    vertex_connectivity_data_structure,
                ) - conn(
                    vertex,
                    partition[vertex],
                    vertex_connectivity_data_structure,
                );
            }
        }
        (dest_partition, calculated_gain)
    }).unzip();

    // First filter: the gain should be positive or only slightly negative (based on the filter ratio).
    // Slightly negative gain vertices are also considered in the hope that they could provide better global solutions
    let mut first_filter_eligible_moves = gain_conn_ratio_filter(
        locked_vertices,
        partition,
        &gain,
        vertex_connectivity_data_structure,
        filter_ratio);
    // Interior vertices have no destination.
    first_filter_eligible_moves.retain(|&vertex| partition_dest[vertex] != partition[vertex]);

    // Afterburner: approximate the true gain, since two positive moves applied simultaneously can be detrimental.
    let first_filter_eligible_vertices = first_filter_eligible_moves.iter().copied().collect::<FxHashSet<_>>();
    let gain2: Vec<i64> = first_filter_eligible_moves.par_iter().map(|&vertex| {
        let mut gain_for_vertex = 0;

        for (neighbor_vertex, edge_weight) in graph.neighbors(vertex){
            let mut partition_source = partition[neighbor_vertex];

            if is_higher_placed(neighbor_vertex, vertex, &gain, &first_filter_eligible_vertices) {
                partition_source = partition_dest[neighbor_vertex];
            }

            if partition_source == partition_dest[vertex] {
                gain_for_vertex += edge_weight;
            } else if partition_source == partition[vertex]{
                gain_for_vertex -= edge_weight;
            }
        }
        gain_for_vertex
    }).collect();

    // From the newly calculated approximate gain values, moves that yield positive gain are returned.
    non_negative_gain_filter(&first_filter_eligible_moves, &partition_dest, &gain2)
}

fn jetrw(graph: &Graph, partitions: &[usize], vertex_weights: &[i64], vertex_connectivity_data_structure: &[Vec<i64>], targets: &[f64], balance_factor: f64) -> Vec<Move> {
    let max_slots: usize = 25;
    let num_partitions = targets.len();
    let partition_weights: Vec<f64> = compute_parts_load(partitions, num_partitions, vertex_weights)
        .into_iter()
        .map(|weight| weight as f64)
        .collect();
    let max_weight_per_partition: Vec<f64> = targets
        .iter()
        .map(|target| (1f64 + balance_factor) * target)
        .collect();

    // heavy_index[p] is the position of p in heavy_partitions.
    let mut heavy_index: Vec<Option<usize>> = vec![None; num_partitions];
    let mut heavy_partitions: Vec<usize> = Vec::new();
    let mut light_partitions: Vec<usize> = Vec::new();

    for partition_id in 0..num_partitions {
        let max_weight = max_weight_per_partition[partition_id];
        let weight_of_partition = partition_weights[partition_id];

        // Destination parts must stay a little under their limit so jetrw does not oscillate.
        let max_weight_dest = (max_weight * 0.99).max(max_weight - 100f64);

        if max_weight < weight_of_partition {
            heavy_index[partition_id] = Some(heavy_partitions.len());
            heavy_partitions.push(partition_id);
        }

        if max_weight_dest >= weight_of_partition {
            light_partitions.push(partition_id);
        }
    }

    let lightest_partition = light_partitions.iter().copied().min_by(|&a, &b| {
        let load_a = partition_weights[a] / targets[a].max(f64::MIN_POSITIVE);
        let load_b = partition_weights[b] / targets[b].max(f64::MIN_POSITIVE);
        load_a.partial_cmp(&load_b).unwrap_or(std::cmp::Ordering::Equal)
    });
    let Some(lightest_partition) = lightest_partition else {
        return Vec::new();
    };
    if heavy_partitions.is_empty() {
        return Vec::new();
    }

    // Find out the loss for each eligible vertex move (from an overweight partition to an underweight partition).
    // A positive loss indicates an increase in edge cut.
    let (partitions_dest, loss): (Vec<usize>, Vec<i64>) = (0..graph.len()).into_par_iter().map(|vertex| {
        let source_partition = partitions[vertex];
        let limit = 1.5 * (partition_weights[source_partition] - targets[source_partition]);

        let mut calculated_loss = 0;
        let mut dest_partition: usize = 0;

        if heavy_index[source_partition].is_some() && (vertex_weights[vertex] as f64) < limit {

            let adjacent_partitions = get_adjacent_eligible_destination_partitions(
                graph,
                vertex,
                partitions,
                &light_partitions);

            dest_partition = if adjacent_partitions.is_empty() {
                lightest_partition
            } else {
                get_most_connected_partition(vertex,
                                             &adjacent_partitions,
                                             vertex_connectivity_data_structure)
            };
            calculated_loss = conn(vertex,
                                   source_partition,
                                   vertex_connectivity_data_structure) -
                conn(vertex,
                     dest_partition,
                     vertex_connectivity_data_structure);
        }
        (dest_partition, calculated_loss)
    }).unzip();

    // Slot the loss values into different buckets. This is to prevent sorting the loss values
    // which can be expensive.
    let mut bucket = init_bucket(heavy_partitions.len(), max_slots);

    for vertex in 0..graph.len() {
        if let Some(index) = heavy_index[partitions[vertex]] {
            let slot = calculate_slot(loss[vertex], max_slots);
            bucket[get_index_for_bucket(index, slot, max_slots)].push(vertex);
        }
    }

    // For each of the heavy partitions, decide the vertices that can be moved from the
    // heavy partitions such that the increase in edge cut is minimized.
    let mut moves = Vec::new();
    for (index, &heavy_partition) in heavy_partitions.iter().enumerate() {
        let mut m = 0f64;
        let m_max = partition_weights[heavy_partition] - max_weight_per_partition[heavy_partition];

        for slot in 0..max_slots {
            for &vertex in &bucket[get_index_for_bucket(index, slot, max_slots)] {
                if m < m_max {
                    m += vertex_weights[vertex] as f64;
                    moves.push(Move{vertex, partition_id: partitions_dest[vertex]});
                }
            }
        }
    }

    moves
}

fn lock_vertices(moves: &[Move], locked_vertices: &mut [bool]) {
    // This function gets the list of locked vertices that shouldn't be moved in the subsequent iterations.
    locked_vertices.fill(false);

    for single_move in moves {
        locked_vertices[single_move.vertex] = true;
    }
}

fn gain_conn_ratio_filter(locked_vertices: &[bool], partitions: &[usize], gain: &[i64], vertex_connectivity_data_structure: &[Vec<i64>], filter_ratio: f64) -> Vec<usize> {
    // Get a list of vertices that have a positive gain or slightly negative gain value (based on the filter ratio).

    (0..partitions.len())
        .filter(|&vertex| {
            let own_connectivity = conn(vertex, partitions[vertex], vertex_connectivity_data_structure) as f64;
            !locked_vertices[vertex]
                && (gain[vertex] > 0 || -gain[vertex] < (filter_ratio * own_connectivity).floor() as i64)
        })
        .collect()
}

fn non_negative_gain_filter(first_filter_eligible_moves: &[usize],
                            partition_dest: &[usize],
                            gain: &[i64]) -> Vec<Move> {
    // Gets the list of moves that have positive gain after the first filter is applied.
    first_filter_eligible_moves
        .iter()
        .zip(gain)
        .filter(|(_, &vertex_gain)| vertex_gain > 0)
        .map(|(&vertex, _)| Move{vertex, partition_id: partition_dest[vertex]})
        .collect()
}

fn conn(vertex_id: usize,
        partition_id: usize,
        vertex_connectivity_data_structure: &[Vec<i64>]) -> i64 {
    // Gets how well a vertex is connected to a partition (adds all the edge weights connected to the partition).

    vertex_connectivity_data_structure[vertex_id][partition_id]
}

fn get_most_connected_partition(
    vertex_id: usize,
    partition_ids: &[usize],
    vertex_connectivity_data_structure: &[Vec<i64>]) -> usize {
    // Get the most connected partition to a particular vertex.

    let mut connections = i64::MIN;
    let mut most_connected_partition = partition_ids[0];

    for &partition_id in partition_ids {

        if vertex_connectivity_data_structure[vertex_id][partition_id] > connections {
            connections = vertex_connectivity_data_structure[vertex_id][partition_id];
            most_connected_partition = partition_id;
        }
    }
    most_connected_partition
}

fn init_vertex_connectivity_data_structure(graph: &Graph,
                                           partition: &[usize],
                                           num_partitions: usize) -> Vec<Vec<i64>> {
    let mut vertex_connectivity_data_structure = vec![vec![0; num_partitions]; partition.len()];

    for (vertex, connectivity) in vertex_connectivity_data_structure.iter_mut().enumerate() {
        for (neighbour_vertex, edge_weight) in graph.neighbors(vertex) {
            connectivity[partition[neighbour_vertex]] += edge_weight;
        }
    }

    vertex_connectivity_data_structure
}

fn update_parts_and_vertex_connectivity(
    graph: &Graph,
    partition: &mut [usize],
    vertex_connectivity_data_structure: &mut [Vec<i64>],
    moves: Vec<Move>) {
    // Updates the partitions and the vertex connectivity data structure using the given list of moves.

    for single_move in &moves {
        let vertex = single_move.vertex;
        let partition_source = partition[vertex];

        for (neighbour_vertex, edge_weight) in graph.neighbors(vertex) {
            vertex_connectivity_data_structure[neighbour_vertex][partition_source] -= edge_weight;
        }

        partition[vertex] = single_move.partition_id;
    }

    for single_move in &moves {
        let vertex = single_move.vertex;
        let partition_dest = single_move.partition_id;

        for (neighbour_vertex, edge_weight) in graph.neighbors(vertex) {
            vertex_connectivity_data_structure[neighbour_vertex][partition_dest] += edge_weight;
        }
    }
}

fn is_higher_placed(vertex1: usize, vertex2: usize, gain: &[i64], list_of_vertices: &FxHashSet<usize>) -> bool {
    // Checks if vertex1 is better ranked than vertex2 (used in the vertex afterburner).

    list_of_vertices.contains(&vertex1)
        && (gain[vertex1] > gain[vertex2] || (gain[vertex1] == gain[vertex2] && vertex1 < vertex2))
}

fn calculate_slot(loss: i64, max_slot_size: usize) -> usize {
    // Calculate the slot in which the vertex should be put in based on the loss value.

    if loss < 0 {
        0
    } else if loss == 0 {
        1
    } else {
        ((2 + loss.ilog2()) as usize).min(max_slot_size - 1)
    }
}

fn get_adjacent_eligible_destination_partitions(
    graph: &Graph,
    vertex: usize,
    partitions: &[usize],
    eligible_partitions: &[usize]) -> Vec<usize> {
    // Gets the list of partitions belong to the neighbors of a particular vertex.

    graph
        .neighbors(vertex)
        .map(|(neighbour, _)| partitions[neighbour])
        .filter(|partition| eligible_partitions.contains(partition))
        .collect()
}

fn get_index_for_bucket(partition_index: usize, slot: usize, max_slots: usize) -> usize {
    partition_index * max_slots + slot
}

fn init_bucket(num_heavy_partitions: usize, max_slots: usize) -> Vec<Vec<usize>> {
    vec![Vec::new(); num_heavy_partitions * max_slots]
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct JetRefiner {
    // This indicates the number of times jetlp/jetrw combination should run without seeing
    // any improvement before terminating the algorithm
    pub iterations: u32,

    // Maximum allowed relative overload of a part: part p may weigh up to
    // (1 + balance_factor) * targets[p].
    pub balance_factor: f64,

    // A numerical ratio ranging from 0.0 to 1.0 that determines which vertices are eligible for consideration based on
    // their gain value in the first filter. A vertice would be considered
    // if -gain(vertice) < (filter ratio)*(connectivity of the vertice to its own partition)
    pub filter_ratio: f64,

    // A numerical factor ranging from 0.0 to 1.0 that is used to determine when to reset the iteration counter.
    // If the new edge cut is less than tolerance factor times the best edge cut, then the
    // iteration counter would be reset, otherwise the iteration counter would increment
    // as it indicates the edge cut is becoming better at a very slow pace.
    pub tolerance_factor: f64,
}

impl<'a> crate::Partition<(&'a Graph, &'a [i64], &'a [f64])> for JetRefiner {
    type Metadata = ();
    type Error = Error;

    fn partition(
        &mut self,
        part_ids: &mut [usize],
        (adjacency, weights, targets): (&'a Graph, &'a [i64], &'a [f64]),
    ) -> Result<Self::Metadata, Self::Error> {

        if part_ids.len() != weights.len() {
            return Err(Error::InputLenMismatch {
                expected: part_ids.len(),
                actual: weights.len(),
            });
        }
        if part_ids.len() != adjacency.len() {
            return Err(Error::InputLenMismatch {
                expected: part_ids.len(),
                actual: adjacency.len(),
            });
        }
        if targets.is_empty() {
            return Err(Error::NoParts);
        }
        jet_refiner(
            part_ids,
            weights,
            adjacency,
            targets,
            self.iterations,
            self.balance_factor,
            self.filter_ratio,
            self.tolerance_factor,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Partition;

    fn star() -> Graph {
        Graph::from_edges(4, &[(0, 1, 2), (0, 2, 1), (0, 3, 4)])
    }

    #[test]
    fn test_get_locked_vertices() {
        // Arrange
        let moves = vec![Move{vertex:0, partition_id:3},
                         Move{vertex:3, partition_id:4},
                         Move{vertex:4, partition_id:5}];
        let mut locked_vertices = [false; 5];

        // Act
        lock_vertices(&moves, &mut locked_vertices);

        // Assert
        assert!(locked_vertices[0usize]);
        assert!(locked_vertices[3usize]);
        assert!(locked_vertices[4usize]);
        assert!(!locked_vertices[2usize]);
    }

    #[test]
    fn test_init_vertex_connectivity_data_structure() {
        // Arrange
        let adjacency = star();
        let partition = [0, 0, 0, 1];

        // Act
        let vtx_conn_data_struct = init_vertex_connectivity_data_structure(
            &adjacency,
            &partition,
            2);

        // Assert
        assert_eq!(vtx_conn_data_struct[0][0], 3);
        assert_eq!(vtx_conn_data_struct[0][1], 4);
        assert_eq!(conn(3, 0, &vtx_conn_data_struct), 4);
    }

    #[test]
    fn test_get_most_connected_partition(){
        // Arrange
        let adjacency = star();
        let partition = [0, 0, 0, 1];
        let vtx_conn_data_struct = init_vertex_connectivity_data_structure(
            &adjacency,
            &partition,
            2);

        // Act
        let most_connected_partition = get_most_connected_partition(
            0,
            &[0, 1],
            &vtx_conn_data_struct);

        // Assert
        assert_eq!(most_connected_partition, 1);
    }

    #[test]
    fn test_non_negative_gain_filter() {
        // Arrange
        let gain = vec![3, 2, -1];
        let eligible_vertices_to_move = [0, 1, 2];
        let partition_dest  = [1, 0, 1];

        // Act
        let moves = non_negative_gain_filter(
            &eligible_vertices_to_move,
            &partition_dest,
            &gain);

        // Assert
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].vertex, 0);
        assert_eq!(moves[0].partition_id, 1);
        assert_eq!(moves[1].vertex, 1);
        assert_eq!(moves[1].partition_id, 0);
    }

    #[test]
    fn test_gain_conn_ratio_filter() {
        // Arrange
        let adjacency = Graph::from_edges(4, &[(0, 1, 3), (0, 2, 1), (0, 3, 4)]);
        let partitions = [0, 0, 0, 1];
        let vtx_conn_data_struct = init_vertex_connectivity_data_structure(
            &adjacency,
            &partitions,
            2);
        let gain = [-1, 2, -2, -2];
        let filter_ratio = 0.75;
        let mut locked_vertices = [false; 4];
        locked_vertices[2] = true;
        locked_vertices[3] = true;

        // Act
        let eligible_vertices_to_move = gain_conn_ratio_filter(
            &locked_vertices,
            &partitions,
            &gain,
            &vtx_conn_data_struct,
            filter_ratio);

        // Assert
        assert_eq!(eligible_vertices_to_move, vec![0, 1]);
    }

    #[test]
    fn test_update_parts_and_vertex_connectivity(){
        // Arrange
        let adjacency = Graph::from_edges(6, &[(0, 1, 1), (0, 2, 2), (2, 4, 3), (4, 5, 1), (5, 3, 3), (3, 1, 2)]);
        let mut partitions = [0, 0, 0, 0, 1, 1];
        let mut vtx_conn_data_struct = init_vertex_connectivity_data_structure(
            &adjacency,
            &partitions,
            2);
        let moves = vec![
            Move{ vertex: 2, partition_id: 1 },
            Move{ vertex: 3, partition_id: 1 },
        ];

        // Act
        update_parts_and_vertex_connectivity(&adjacency,
                                             &mut partitions,
                                             &mut vtx_conn_data_struct,
                                             moves);

        // Assert
        assert_eq!(partitions[2], 1);
        assert_eq!(partitions[3], 1);
        assert_eq!(vtx_conn_data_struct[0][0], 1);
        assert_eq!(vtx_conn_data_struct[0][1], 2);
        assert_eq!(vtx_conn_data_struct[1][0], 1);
        assert_eq!(vtx_conn_data_struct[1][1], 2);
        assert_eq!(vtx_conn_data_struct[4][1], 4);
        assert_eq!(vtx_conn_data_struct[5][1], 4);
    }

    #[test]
    fn test_is_higher_placed(){
        // Arrange
        let gain = [4, 2, 2, 1];
        let list_of_vertices = [0, 1, 2].into_iter().collect();

        // Act and Assert
        assert!(is_higher_placed(0, 2, &gain, &list_of_vertices));
        assert!(is_higher_placed(1, 2, &gain, &list_of_vertices));
        assert!(!is_higher_placed(3, 2, &gain, &list_of_vertices));
    }

    #[test]
    fn test_calculate_slot() {
        // Arrange and Act
        let slot1 = calculate_slot(-4, 3);
        let slot2 = calculate_slot(0, 3);
        let slot3 = calculate_slot(6, 8);
        let slot4 = calculate_slot(10, 3);

        // Assert
        assert_eq!(slot1, 0);
        assert_eq!(slot2, 1);
        assert_eq!(slot3, 4);
        assert_eq!(slot4, 2);
    }

    #[test]
    fn test_get_adjacent_eligible_destination_partitions(){
        // Arrange
        let adjacency = Graph::from_edges(5, &[(0, 1, 1), (0, 2, 2), (0, 3, 3), (2, 4, 3)]);
        let partitions = [0, 1, 3, 4, 2];
        let light_partitions = [1, 2];

        // Act
        let adjacent_eligible_partitions = get_adjacent_eligible_destination_partitions(
            &adjacency,
            0,
            &partitions,
            &light_partitions);

        // Assert
        assert_eq!(adjacent_eligible_partitions, vec![1]);
    }

    #[test]
    fn test_jetrw(){
        // Arrange
        let adjacency = Graph::from_edges(4, &[(0, 1, 3), (1, 2, 3), (2, 3, 3), (3, 0, 3)]);
        let vtx_weights = [1, 4, 4, 1];
        let partitions = [0, 0, 0, 1];
        let targets = [5.0, 5.0];

        // Act
        let vtx_conn_data_struct =
            init_vertex_connectivity_data_structure(
                &adjacency,
                &partitions,
                2);
        let moves = jetrw(&adjacency, &partitions, &vtx_weights, &vtx_conn_data_struct, &targets, 0.1);

        // Assert
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].vertex, 0);
        assert_eq!(moves[0].partition_id, 1);
        assert_eq!(moves[1].vertex, 2);
        assert_eq!(moves[1].partition_id, 1);
    }

    #[test]
    fn test_jetrw_without_light_partition_moves_nothing() {
        // Arrange
        let adjacency = Graph::from_edges(2, &[(0, 1, 1)]);
        let vtx_weights = [1, 1];
        let partitions = [0, 1];
        let targets = [0.5, 0.5];
        let vtx_conn_data_struct = init_vertex_connectivity_data_structure(&adjacency, &partitions, 2);

        // Act
        let moves = jetrw(&adjacency, &partitions, &vtx_weights, &vtx_conn_data_struct, &targets, 0.1);

        // Assert
        assert!(moves.is_empty());
    }

    #[test]
    fn test_jetlp() {
        // Arrange
        let adjacency = Graph::from_edges(4, &[(0, 1, 5), (1, 2, 8), (2, 3, 1), (3, 0, 2)]);
        let partitions = [0, 1, 1, 0];
        let locked_vertices = [false; 4];

        // Act
        let vtx_conn_data_struct = init_vertex_connectivity_data_structure(
            &adjacency,
            &partitions,
             2);
        let moves = jetlp(&adjacency,
                          &partitions,
                          &vtx_conn_data_struct,
                          &locked_vertices,
                          0.3);

        // Assert
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].vertex, 0);
        assert_eq!(moves[0].partition_id, 1);
    }

    #[test]
    fn test_jet_refiner_separates_two_triangles() {
        // Arrange
        let adjacency = Graph::from_edges(6, &[
            (0, 1, 1), (0, 2, 1), (1, 2, 1),
            (3, 4, 1), (3, 5, 1), (4, 5, 1),
            (2, 3, 1),
        ]);
        let weights = [1; 6];
        let targets = [3.0, 3.0];
        let mut partition = [0, 0, 1, 1, 1, 0];

        // Act
        JetRefiner { iterations: 12, balance_factor: 0.1, filter_ratio: 0.75, tolerance_factor: 0.99 }
            .partition(&mut partition, (&adjacency, &weights[..], &targets[..]))
            .unwrap();

        // Assert
        assert_eq!(adjacency.edge_cut(&partition), 1);
        assert_eq!(partition, [0, 0, 0, 1, 1, 1]);
    }
}
