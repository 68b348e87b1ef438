// Recursive bisection and the initial bisection of the coarsest graph.
//
// # Reference
//
// Karypis, George, and Vipin Kumar. "A fast and high quality multilevel scheme for partitioning
// irregular graphs." SIAM Journal on Scientific Computing 20.1 (1998): 359-392.

use std::collections::VecDeque;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use crate::algorithms::multilevel_partitioner::{multilevel_bisection, BisectionSettings};
use crate::graph::Graph;
use crate::imbalance::{compute_parts_load, imbalance_against_targets, target_weights};

/// Assign `vertices` to the parts `first_part..first_part + num_of_partitions`.
///
/// The set is bisected with target weights proportional to the number of parts each side
/// still has to produce, then each side is split recursively.
#[allow(clippy::too_many_arguments)]
pub(crate) fn recursive_bisection(
    graph: &Graph,
    weights: &[i64],
    vertices: &[usize],
    num_of_partitions: usize,
    first_part: usize,
    partition: &mut [usize],
    rng: &mut SmallRng,
    settings: &BisectionSettings,
) {
    if num_of_partitions <= 1 {
        for &vertex in vertices {
            partition[vertex] = first_part;
        }
        return;
    }

    let left_partitions = num_of_partitions / 2;
    let right_partitions = num_of_partitions - left_partitions;

    let subgraph = graph.subgraph(vertices);
    let subgraph_weights: Vec<i64> = vertices.iter().map(|&vertex| weights[vertex]).collect();
    let targets = target_weights(subgraph_weights.iter().sum(), &[left_partitions, right_partitions]);

    let mut sides = multilevel_bisection(&subgraph, &subgraph_weights, &targets, rng, settings);
    ensure_minimum_sides(&subgraph, &mut sides, [left_partitions, right_partitions]);

    let mut left = Vec::with_capacity(vertices.len());
    let mut right = Vec::with_capacity(vertices.len());
    for (&vertex, &side) in vertices.iter().zip(&sides) {
        if side == 0 {
            left.push(vertex);
        } else {
            right.push(vertex);
        }
    }

    recursive_bisection(graph, weights, &left, left_partitions, first_part, partition, rng, settings);
    recursive_bisection(graph, weights, &right, right_partitions, first_part + left_partitions, partition, rng, settings);
}

/// Make each side hold at least `minimums[side]` vertices, so that every part it still has to
/// produce can get one. Moved vertices are the ones best connected to the side they join.
fn ensure_minimum_sides(graph: &Graph, sides: &mut [usize], minimums: [usize; 2]) {
    let mut counts = [0usize; 2];
    for &side in sides.iter() {
        counts[side] += 1;
    }

    for (needy, donor) in [(0, 1), (1, 0)] {
        while counts[needy] < minimums[needy] && counts[donor] > minimums[donor] {
            let candidate = (0..sides.len())
                .filter(|&vertex| sides[vertex] == donor)
                .max_by_key(|&vertex| {
                    graph
                        .neighbors(vertex)
                        .filter(|&(neighbor, _)| sides[neighbor] == needy)
                        .map(|(_, edge_weight)| edge_weight)
                        .sum::<i64>()
                });
            let Some(vertex) = candidate else {
                break;
            };
            sides[vertex] = needy;
            counts[needy] += 1;
            counts[donor] -= 1;
        }
    }
}

struct InitialBisection {
    sides: Vec<usize>,
    edge_cut: i64,
    imbalance: f64,
}

/// Greedy graph growing: side 0 grows breadth-first from a random vertex until it reaches
/// `targets[0]`. The attempt with the best balance, then the smallest cut, wins.
pub(crate) fn greedy_graph_growing(
    graph: &Graph,
    weights: &[i64],
    targets: &[f64],
    rng: &mut SmallRng,
    attempts: usize,
    balance_factor: f64,
) -> Vec<usize> {
    let mut best: Option<InitialBisection> = None;

    for _ in 0..attempts.max(1) {
        let sides = grow_from_random_vertex(graph, weights, targets[0], rng);
        let part_loads = compute_parts_load(&sides, 2, weights);
        let candidate = InitialBisection {
            edge_cut: graph.edge_cut(&sides),
            imbalance: imbalance_against_targets(&part_loads, targets),
            sides,
        };

        let is_better = match &best {
            None => true,
            Some(best) => {
                let candidate_balanced = candidate.imbalance < balance_factor;
                let best_balanced = best.imbalance < balance_factor;
                if candidate_balanced != best_balanced {
                    candidate_balanced
                } else if candidate_balanced || candidate.imbalance == best.imbalance {
                    candidate.edge_cut < best.edge_cut
                } else {
                    candidate.imbalance < best.imbalance
                }
            }
        };
        if is_better {
            best = Some(candidate);
        }
    }

    best.map(|best| best.sides).unwrap_or_else(|| vec![1; graph.len()])
}

fn grow_from_random_vertex(graph: &Graph, weights: &[i64], target: f64, rng: &mut SmallRng) -> Vec<usize> {
    let mut sides = vec![1; graph.len()];
    let mut queued = vec![false; graph.len()];
    let mut queue = VecDeque::new();

    // Seeds for the first component and for restarts once a component is exhausted.
    let mut seeds: Vec<usize> = (0..graph.len()).collect();
    seeds.shuffle(rng);
    let mut seeds = seeds.into_iter();

    let mut grown = 0i64;
    while (grown as f64) < target {
        let vertex = match queue.pop_front() {
            Some(vertex) => vertex,
            None => match seeds.find(|&vertex| !queued[vertex]) {
                Some(vertex) => {
                    queued[vertex] = true;
                    vertex
                }
                None => break,
            },
        };

        // Skip a vertex that would overshoot the target by more than leaving it out misses it.
        let weight = weights[vertex];
        if grown > 0 && (grown + weight) as f64 - target > target - grown as f64 {
            continue;
        }

        sides[vertex] = 0;
        grown += weight;
        for (neighbor, _) in graph.neighbors(vertex) {
            if !queued[neighbor] {
                queued[neighbor] = true;
                queue.push_back(neighbor);
            }
        }
    }

    sides
}
