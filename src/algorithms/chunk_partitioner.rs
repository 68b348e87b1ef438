use crate::algorithms::{check_partition_input, Error};
use crate::graph::Graph;
use crate::Partition;

/// Chunk Partitioner
///
/// Splits the vertex order `0..n` into `part_count` contiguous chunks whose sizes differ by at
/// most one. Edges are not looked at.
///
/// # Example
///
/// ```rust
/// use bus_cut::algorithms::ChunkPartitioner;
/// use bus_cut::graph::Graph;
/// use bus_cut::Partition;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
///
///     let graph = Graph::from_edges(5, &[]);
///     let mut partition = vec![0; graph.len()];
///
///     ChunkPartitioner { part_count: 2 }.partition(&mut partition, &graph)?;
///
///     assert_eq!(partition, vec![0, 0, 0, 1, 1]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ChunkPartitioner {
    pub part_count: usize,
}

impl Default for ChunkPartitioner {
    fn default() -> Self {
        ChunkPartitioner { part_count: 2 }
    }
}

impl<'a> Partition<&'a Graph> for ChunkPartitioner {
    type Metadata = ();
    type Error = Error;

    fn partition(&mut self, part_ids: &mut [usize], adjacency: &'a Graph) -> Result<Self::Metadata, Self::Error> {
        check_partition_input(part_ids, adjacency.len(), self.part_count)?;

        let num_of_vertices = part_ids.len();
        for (vertex, part) in part_ids.iter_mut().enumerate() {
            *part = vertex * self.part_count / num_of_vertices;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_sizes_differ_by_at_most_one() {
        // Arrange
        let graph = Graph::from_edges(10, &[]);
        let mut partition = vec![0; graph.len()];

        // Act
        ChunkPartitioner { part_count: 3 }.partition(&mut partition, &graph).unwrap();

        // Assert
        let mut sizes = [0usize; 3];
        for &part in &partition {
            sizes[part] += 1;
        }
        assert!(sizes.iter().all(|&size| size == 3 || size == 4));
        assert!(partition.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_one_vertex_per_part() {
        let graph = Graph::from_edges(4, &[(0, 1, 1)]);
        let mut partition = vec![0; graph.len()];

        ChunkPartitioner { part_count: 4 }.partition(&mut partition, &graph).unwrap();

        assert_eq!(partition, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_zero_parts_is_an_error() {
        let graph = Graph::from_edges(2, &[]);
        let mut partition = vec![0; 2];

        let result = ChunkPartitioner { part_count: 0 }.partition(&mut partition, &graph);

        assert_eq!(result, Err(Error::NoParts));
    }
}
