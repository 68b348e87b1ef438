// This file has code from https://github.com/LIHPC-Computational-Geometry/coupe
use num_traits::ToPrimitive;

/// Calculates the total weight for each part of a given partition.
pub fn compute_parts_load(partition: &[usize], num_parts: usize, weights: &[i64]) -> Vec<i64> {
    let mut loads = vec![0; num_parts];

    for (&part, w) in partition.iter().zip(weights.iter()) {
        if part < num_parts {
            loads[part] += w;
        }
    }

    loads
}

/// Split `total_weight` into target part weights proportional to `shares`.
///
/// A bisection that must later produce 1 and 2 parts asks for shares `[1, 2]`.
pub fn target_weights(total_weight: i64, shares: &[usize]) -> Vec<f64> {
    let total_shares: usize = shares.iter().sum();
    if total_shares == 0 {
        return vec![0.0; shares.len()];
    }
    let total_weight = total_weight.to_f64().unwrap_or(0.0);

    shares
        .iter()
        .map(|&share| total_weight * share as f64 / total_shares as f64)
        .collect()
}

/// Largest relative overload of a part with respect to its target weight.
pub fn imbalance_against_targets(part_loads: &[i64], targets: &[f64]) -> f64 {
    debug_assert_eq!(part_loads.len(), targets.len());

    part_loads
        .iter()
        .zip(targets)
        .filter(|(_, target)| **target > 0.0)
        .map(|(&part_weight, &target)| {
            let part_weight: f64 = part_weight.to_f64().unwrap_or(0.0);
            (part_weight - target) / target
        })
        .fold(0.0f64, |acc, dev| acc.max(dev))
}

/// Compute imbalance after passing part loads.
pub fn compute_imbalance_from_part_loads(num_parts: usize, part_loads: &[i64]) -> f64 {
    let total_weight: i64 = part_loads.iter().sum();
    let targets = target_weights(total_weight, &vec![1; num_parts]);

    imbalance_against_targets(part_loads, &targets)
}

/// Compute the imbalance of the given partition.
pub fn imbalance(num_parts: usize, partition: &[usize], weights: &[i64]) -> f64 {
    if num_parts == 0 {
        return 0.0;
    }

    let part_loads = compute_parts_load(partition, num_parts, weights);

    compute_imbalance_from_part_loads(num_parts, &part_loads)
}
