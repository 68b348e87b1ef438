use std::path::PathBuf;

/// Errors raised while loading problems, building graphs or solving an instance.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed input {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error("edge references unknown vertex {label:?}")]
    UnknownVertex { label: String },

    #[error("vertex {label:?} is declared more than once")]
    DuplicateVertex { label: String },

    #[error(transparent)]
    Partition(#[from] crate::algorithms::Error),

    #[error("{buses} buses of capacity {capacity} cannot seat {students} students")]
    CapacityInfeasible { buses: usize, capacity: usize, students: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
