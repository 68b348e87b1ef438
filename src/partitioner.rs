use log::debug;
use crate::algorithms::{ChunkPartitioner, Error, MultiLevelPartitioner};
use crate::graph::Graph;
use crate::Partition;

/// A partitioner the trial selector can drive: a pure function of the graph, the number of
/// parts and a seed.
pub trait SeededPartitioner: Sync {
    /// Split the vertices of `graph` into exactly `num_of_partitions` disjoint groups of vertex
    /// ids covering every vertex.
    fn partition_groups(&self, graph: &Graph, num_of_partitions: usize, seed: u64) -> Result<Vec<Vec<usize>>, Error>;
}

impl SeededPartitioner for MultiLevelPartitioner {
    fn partition_groups(&self, graph: &Graph, num_of_partitions: usize, seed: u64) -> Result<Vec<Vec<usize>>, Error> {
        let weights = vec![1; graph.len()];
        let mut partition = vec![0; graph.len()];

        let mut partitioner = MultiLevelPartitioner {
            num_of_partitions,
            seed: Some(seed),
            ..*self
        };
        let metadata = partitioner.partition(&mut partition, (graph, &weights[..]))?;
        debug!("seed {seed}: edge cut {}, imbalance {:.3}", metadata.edge_cut, metadata.imbalance);

        Ok(groups_from_part_ids(&partition, num_of_partitions))
    }
}

impl SeededPartitioner for ChunkPartitioner {
    fn partition_groups(&self, graph: &Graph, num_of_partitions: usize, _seed: u64) -> Result<Vec<Vec<usize>>, Error> {
        let mut partition = vec![0; graph.len()];
        ChunkPartitioner { part_count: num_of_partitions }.partition(&mut partition, graph)?;

        Ok(groups_from_part_ids(&partition, num_of_partitions))
    }
}

/// Gather the vertices of each part, in increasing vertex order.
pub fn groups_from_part_ids(part_ids: &[usize], num_of_partitions: usize) -> Vec<Vec<usize>> {
    let mut groups = vec![Vec::new(); num_of_partitions];
    for (vertex, &part) in part_ids.iter().enumerate() {
        groups[part].push(vertex);
    }
    groups
}

/// Partitioners selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PartitionerKind {
    /// Multilevel recursive bisection with Jet refinement.
    #[default]
    Multilevel,
    /// Contiguous chunks of the vertex order.
    Chunk,
}

pub fn build_partitioner(kind: PartitionerKind, balance_factor: f64) -> Box<dyn SeededPartitioner> {
    match kind {
        PartitionerKind::Multilevel => Box::new(MultiLevelPartitioner {
            balance_factor,
            ..Default::default()
        }),
        PartitionerKind::Chunk => Box::new(ChunkPartitioner::default()),
    }
}
