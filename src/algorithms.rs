// This file has code from https://github.com/LIHPC-Computational-Geometry/coupe
mod chunk_partitioner;
mod jet_refiner;
mod multilevel_partitioner;
mod recursive_bisection;

use jet_refiner::JetRefiner;
pub use chunk_partitioner::ChunkPartitioner;
pub use multilevel_partitioner::{MultiLevelMetadata, MultiLevelPartitioner};

/// Common errors thrown by algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A partition into zero parts was requested.
    #[error("cannot partition into zero parts")]
    NoParts,

    /// More parts were requested than there are vertices to fill them.
    #[error("cannot split {vertices} vertices into {parts} non-empty parts")]
    TooManyParts { parts: usize, vertices: usize },

    /// Input sets don't have matching lengths.
    #[error("input sets don't have the same length (expected {expected} items, got {actual})")]
    InputLenMismatch { expected: usize, actual: usize },
}

/// Checks shared by the partitioners: matching lengths and a feasible part count.
fn check_partition_input(part_ids: &[usize], num_of_vertices: usize, num_of_partitions: usize) -> Result<(), Error> {
    if part_ids.len() != num_of_vertices {
        return Err(Error::InputLenMismatch {
            expected: part_ids.len(),
            actual: num_of_vertices,
        });
    }
    if num_of_partitions == 0 {
        return Err(Error::NoParts);
    }
    if num_of_partitions > num_of_vertices {
        return Err(Error::TooManyParts {
            parts: num_of_partitions,
            vertices: num_of_vertices,
        });
    }
    Ok(())
}
