use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use crate::error::{Error, Result};
use crate::io::Problem;
use crate::partitioner::SeededPartitioner;
use crate::rebalance::rebalance;
use crate::score::{score_assignment, Normalization};

/// The retained seating of a selector run.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// One list of student labels per bus.
    pub buses: Vec<Vec<String>>,
    pub score: f64,
    /// Index of the trial that produced it.
    pub trial: usize,
    /// Seed the partitioner ran with.
    pub seed: u64,
}

/// Best of several seeded partition, rebalance and score trials.
#[derive(Debug, Clone, Copy)]
pub struct TrialSelector {
    pub num_trials: usize,

    /// Seed of the per-trial seed sequence. `None` draws it from entropy.
    pub seed: Option<u64>,

    /// Run the trials on the rayon thread pool.
    pub parallel: bool,

    pub normalization: Normalization,
}

impl Default for TrialSelector {
    fn default() -> Self {
        TrialSelector {
            num_trials: 5,
            seed: None,
            parallel: false,
            normalization: Normalization::default(),
        }
    }
}

impl TrialSelector {

    /// The partitioner seed of every trial, drawn up front.
    pub fn trial_seeds(&self) -> Vec<u64> {
        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        (0..self.num_trials).map(|_| rng.gen()).collect()
    }

    /// Run every trial and keep the first one with the highest positive score.
    ///
    /// Returns `Ok(None)` when no trial scores above zero, including when every trial failed
    /// to partition. Fails before any trial when the buses cannot seat every student.
    pub fn select(&self, problem: &Problem, partitioner: &dyn SeededPartitioner) -> Result<Option<Selection>> {
        let students = problem.graph.len();
        if problem.num_buses.saturating_mul(problem.size_bus) < students {
            return Err(Error::CapacityInfeasible {
                buses: problem.num_buses,
                capacity: problem.size_bus,
                students,
            });
        }

        let seeds = self.trial_seeds();
        let candidates: Vec<Option<Selection>> = if self.parallel {
            seeds
                .par_iter()
                .enumerate()
                .map(|(trial, &seed)| self.run_trial(problem, partitioner, trial, seed))
                .collect()
        } else {
            seeds
                .iter()
                .enumerate()
                .map(|(trial, &seed)| self.run_trial(problem, partitioner, trial, seed))
                .collect()
        };

        let best = pick_best(candidates.into_iter().flatten());
        match &best {
            Some(selection) => info!("trial {} won with score {:.4}", selection.trial, selection.score),
            None => warn!("no trial out of {} scored above zero", self.num_trials),
        }
        Ok(best)
    }

    fn run_trial(&self, problem: &Problem, partitioner: &dyn SeededPartitioner, trial: usize, seed: u64) -> Option<Selection> {
        let graph = &problem.graph;
        let mut groups = match partitioner.partition_groups(graph.adjacency(), problem.num_buses, seed) {
            Ok(groups) => groups,
            Err(error) => {
                warn!("trial {trial} (seed {seed}) failed: {error}");
                return None;
            }
        };

        let report = rebalance(&mut groups, problem.size_bus);
        if !report.is_noop() {
            debug!("trial {trial}: moved {} students to fit capacity {}", report.moved, problem.size_bus);
        }

        let buses: Vec<Vec<String>> = groups
            .iter()
            .map(|group| group.iter().map(|&vertex| graph.label(vertex).to_string()).collect())
            .collect();
        let score = score_assignment(
            graph,
            &buses,
            problem.num_buses,
            problem.size_bus,
            &problem.constraints,
            self.normalization,
        );
        debug!("trial {trial} (seed {seed}) scored {score:.4}");

        Some(Selection { buses, score, trial, seed })
    }
}

/// First candidate with a score strictly above every earlier one, starting from zero.
pub fn pick_best(candidates: impl IntoIterator<Item = Selection>) -> Option<Selection> {
    let mut best_score = 0.0;
    let mut best = None;
    for candidate in candidates {
        if candidate.score > best_score {
            best_score = candidate.score;
            best = Some(candidate);
        }
    }
    best
}
