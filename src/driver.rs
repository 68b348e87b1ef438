use std::ops::Range;
use std::path::{Path, PathBuf};
use log::{error, info, warn};
use crate::algorithms::ChunkPartitioner;
use crate::error::Result;
use crate::io::{read_problem, write_assignment};
use crate::partitioner::SeededPartitioner;
use crate::selector::TrialSelector;

/// Where the instances live and which of them to solve.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Root holding one directory per size category, each holding one directory per instance id.
    pub inputs: PathBuf,

    /// Solutions go to `outputs/<size>/<id>.out`.
    pub outputs: PathBuf,

    pub sizes: Vec<String>,

    pub ids: Range<u32>,

    pub selector: TrialSelector,

    /// Instance ids solved with contiguous chunks instead of the batch partitioner.
    pub chunk_ids: Vec<u32>,

    /// Log progress every this many ids.
    pub progress_every: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            inputs: PathBuf::from("all_inputs"),
            outputs: PathBuf::from("outputs"),
            sizes: vec!["small".to_string(), "medium".to_string(), "large".to_string()],
            ids: 1..1100,
            selector: TrialSelector::default(),
            chunk_ids: Vec::new(),
            progress_every: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    /// Instances with a written solution.
    pub solved: usize,

    /// Instances where no trial scored above zero; nothing is written.
    pub unsolved: usize,

    /// Ids without an input directory.
    pub skipped: usize,

    /// Instances that could not be loaded, solved or written.
    pub failed: usize,
}

/// Outcome of a single instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstanceOutcome {
    Solved { score: f64 },
    Unsolved,
}

/// Load, solve and write one instance.
pub fn solve_instance(
    input_dir: &Path,
    output_file: &Path,
    selector: &TrialSelector,
    partitioner: &dyn SeededPartitioner,
) -> Result<InstanceOutcome> {
    let problem = read_problem(input_dir)?;
    match selector.select(&problem, partitioner)? {
        Some(selection) => {
            write_assignment(output_file, &selection.buses)?;
            Ok(InstanceOutcome::Solved { score: selection.score })
        }
        None => Ok(InstanceOutcome::Unsolved),
    }
}

/// Solve every instance of the configured sizes and ids. A failing instance is logged and
/// counted, never fatal.
pub fn run_batch(config: &BatchConfig, partitioner: &dyn SeededPartitioner) -> BatchSummary {
    let mut summary = BatchSummary::default();
    let chunk_partitioner = ChunkPartitioner::default();

    for size in &config.sizes {
        let output_dir = config.outputs.join(size);

        for id in config.ids.clone() {
            if config.progress_every > 0 && id % config.progress_every == 0 {
                info!("{size}: at instance {id}");
            }

            let input_dir = config.inputs.join(size).join(id.to_string());
            if !input_dir.is_dir() {
                summary.skipped += 1;
                continue;
            }

            let instance_partitioner: &dyn SeededPartitioner = if config.chunk_ids.contains(&id) {
                &chunk_partitioner
            } else {
                partitioner
            };
            let output_file = output_dir.join(format!("{id}.out"));
            match solve_instance(&input_dir, &output_file, &config.selector, instance_partitioner) {
                Ok(InstanceOutcome::Solved { score }) => {
                    info!("{size}/{id}: score {score:.4}");
                    summary.solved += 1;
                }
                Ok(InstanceOutcome::Unsolved) => {
                    warn!("{size}/{id}: no valid assignment found");
                    summary.unsolved += 1;
                }
                Err(err) => {
                    error!("{size}/{id}: {err}");
                    summary.failed += 1;
                }
            }
        }
    }

    info!(
        "batch done: {} solved, {} unsolved, {} skipped, {} failed",
        summary.solved, summary.unsolved, summary.skipped, summary.failed
    );
    summary
}

#[cfg(test)]
mod tests {
    use std::fs;
    use tempfile::tempdir;
    use super::*;
    use crate::algorithms::Error;
    use crate::graph::Graph;

    struct FailingPartitioner;

    impl SeededPartitioner for FailingPartitioner {
        fn partition_groups(&self, _graph: &Graph, _num_of_partitions: usize, _seed: u64) -> std::result::Result<Vec<Vec<usize>>, Error> {
            Err(Error::NoParts)
        }
    }

    fn write_instance(root: &Path, size: &str, id: u32, gml: &str, parameters: &str) {
        let dir = root.join(size).join(id.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("graph.gml"), gml).unwrap();
        fs::write(dir.join("parameters.txt"), parameters).unwrap();
    }

    const PATH_GML: &str = "graph [ node [ id 0 label \"a\" ] node [ id 1 label \"b\" ] \
                            node [ id 2 label \"c\" ] node [ id 3 label \"d\" ] \
                            edge [ source 0 target 1 ] edge [ source 1 target 2 ] edge [ source 2 target 3 ] ]";

    #[test]
    fn test_batch_counts_every_outcome() {
        // Arrange
        let inputs = tempdir().unwrap();
        let outputs = tempdir().unwrap();
        write_instance(inputs.path(), "small", 1, PATH_GML, "2\n2\n");
        write_instance(inputs.path(), "small", 2, "graph [", "2\n2\n");
        write_instance(inputs.path(), "small", 4, PATH_GML, "1\n2\n");
        let config = BatchConfig {
            inputs: inputs.path().to_path_buf(),
            outputs: outputs.path().to_path_buf(),
            sizes: vec!["small".to_string()],
            ids: 0..5,
            selector: TrialSelector { seed: Some(1), num_trials: 2, ..Default::default() },
            chunk_ids: Vec::new(),
            progress_every: 5,
        };

        // Act
        let summary = run_batch(&config, &ChunkPartitioner::default());

        // Assert
        assert_eq!(summary, BatchSummary { solved: 1, unsolved: 0, skipped: 2, failed: 2 });
        let written = fs::read_to_string(outputs.path().join("small").join("1.out")).unwrap();
        assert_eq!(written, "['a', 'b']\n['c', 'd']\n");
        assert!(!outputs.path().join("small").join("2.out").exists());
        assert!(!outputs.path().join("small").join("4.out").exists());
    }

    #[test]
    fn test_listed_ids_fall_back_to_chunks() {
        // Arrange
        let inputs = tempdir().unwrap();
        let outputs = tempdir().unwrap();
        write_instance(inputs.path(), "small", 1, PATH_GML, "2\n2\n");
        write_instance(inputs.path(), "small", 2, PATH_GML, "2\n2\n");
        let config = BatchConfig {
            inputs: inputs.path().to_path_buf(),
            outputs: outputs.path().to_path_buf(),
            sizes: vec!["small".to_string()],
            ids: 1..3,
            selector: TrialSelector { seed: Some(4), num_trials: 2, ..Default::default() },
            chunk_ids: vec![2],
            progress_every: 0,
        };

        // Act
        let summary = run_batch(&config, &FailingPartitioner);

        // Assert
        assert_eq!(summary, BatchSummary { solved: 1, unsolved: 1, skipped: 0, failed: 0 });
        assert!(!outputs.path().join("small").join("1.out").exists());
        let written = fs::read_to_string(outputs.path().join("small").join("2.out")).unwrap();
        assert_eq!(written, "['a', 'b']\n['c', 'd']\n");
    }

    #[test]
    fn test_sizes_without_solutions_leave_no_output_directory() {
        // Arrange
        let inputs = tempdir().unwrap();
        let outputs = tempdir().unwrap();
        write_instance(inputs.path(), "small", 1, PATH_GML, "2\n2\n");
        let config = BatchConfig {
            inputs: inputs.path().to_path_buf(),
            outputs: outputs.path().join("run"),
            sizes: vec!["small".to_string(), "medium".to_string()],
            ids: 1..2,
            selector: TrialSelector { seed: Some(2), ..Default::default() },
            ..Default::default()
        };

        // Act
        let summary = run_batch(&config, &ChunkPartitioner::default());

        // Assert
        assert_eq!(summary, BatchSummary { solved: 1, unsolved: 0, skipped: 1, failed: 0 });
        assert!(outputs.path().join("run").join("small").join("1.out").exists());
        assert!(!outputs.path().join("run").join("medium").exists());
    }

    #[test]
    fn test_unsolved_instance_writes_nothing() {
        let inputs = tempdir().unwrap();
        let outputs = tempdir().unwrap();
        let gml = "graph [ node [ id 0 label \"a\" ] node [ id 1 label \"b\" ] ]";
        write_instance(inputs.path(), "small", 3, gml, "2\n1\n");

        let outcome = solve_instance(
            &inputs.path().join("small").join("3"),
            &outputs.path().join("3.out"),
            &TrialSelector { seed: Some(0), ..Default::default() },
            &ChunkPartitioner::default(),
        ).unwrap();

        assert_eq!(outcome, InstanceOutcome::Unsolved);
        assert!(!outputs.path().join("3.out").exists());
    }
}
