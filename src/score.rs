use std::borrow::Cow;
use log::debug;
use rustc_hash::FxHashSet;
use crate::graph::SocialGraph;

/// Score of an assignment that breaks a hard rule.
pub const INVALID_SCORE: f64 = -1.0;

/// Which edge count the same-bus edges are divided by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Normalization {
    /// Edges of the untouched graph, so an unsplit rowdy group only loses credit.
    #[default]
    #[value(name = "original")]
    OriginalEdges,
    /// Edges left after unsplit rowdy groups are removed.
    #[value(name = "remaining")]
    RemainingEdges,
}

/// Why an assignment is not a valid seating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidAssignment {
    #[error("expected {expected} buses, got {actual}")]
    WrongBusCount { expected: usize, actual: usize },

    #[error("bus {bus} seats {size} students, capacity is {capacity}")]
    OverfullBus { bus: usize, size: usize, capacity: usize },

    #[error("bus {bus} is empty")]
    EmptyBus { bus: usize },

    #[error("bus {bus} seats unknown student {label:?}")]
    UnknownStudent { bus: usize, label: String },

    #[error("student {label:?} is seated more than once")]
    DuplicateStudent { label: String },

    #[error("student {label:?} has no seat")]
    MissingStudent { label: String },
}

/// Check the hard rules in order and map every vertex to its bus.
pub fn validate_assignment<S: AsRef<str>>(
    graph: &SocialGraph,
    assignment: &[Vec<S>],
    num_buses: usize,
    size_bus: usize,
) -> Result<Vec<usize>, InvalidAssignment> {
    if assignment.len() != num_buses {
        return Err(InvalidAssignment::WrongBusCount {
            expected: num_buses,
            actual: assignment.len(),
        });
    }

    for (bus, students) in assignment.iter().enumerate() {
        if students.len() > size_bus {
            return Err(InvalidAssignment::OverfullBus {
                bus,
                size: students.len(),
                capacity: size_bus,
            });
        }
        if students.is_empty() {
            return Err(InvalidAssignment::EmptyBus { bus });
        }
    }

    let mut bus_of = vec![usize::MAX; graph.len()];
    for (bus, students) in assignment.iter().enumerate() {
        let vertices = students
            .iter()
            .map(|label| {
                graph.vertex_id(label.as_ref()).ok_or_else(|| InvalidAssignment::UnknownStudent {
                    bus,
                    label: label.as_ref().to_string(),
                })
            })
            .collect::<Result<Vec<usize>, _>>()?;

        for vertex in vertices {
            if bus_of[vertex] != usize::MAX {
                return Err(InvalidAssignment::DuplicateStudent { label: graph.label(vertex).to_string() });
            }
            bus_of[vertex] = bus;
        }
    }

    if let Some(vertex) = bus_of.iter().position(|&bus| bus == usize::MAX) {
        return Err(InvalidAssignment::MissingStudent { label: graph.label(vertex).to_string() });
    }

    Ok(bus_of)
}

/// Vertices of the rowdy groups whose members present in the graph ride at most one bus.
pub fn unsplit_rowdy_members<S: AsRef<str>>(graph: &SocialGraph, bus_of: &[usize], constraints: &[Vec<S>]) -> Vec<usize> {
    let mut members = Vec::new();
    for group in constraints {
        let present: Vec<usize> = group.iter().filter_map(|label| graph.vertex_id(label.as_ref())).collect();
        let buses: FxHashSet<usize> = present.iter().map(|&vertex| bus_of[vertex]).collect();
        if buses.len() <= 1 {
            members.extend(present);
        }
    }
    members
}

/// Score a seating: the share of friendships kept on one bus, or [`INVALID_SCORE`].
///
/// Members of rowdy groups that were not split are dropped, with their friendships, from a
/// scratch copy of the graph before counting. `graph` itself is never modified.
pub fn score_assignment<S: AsRef<str>, C: AsRef<str>>(
    graph: &SocialGraph,
    assignment: &[Vec<S>],
    num_buses: usize,
    size_bus: usize,
    constraints: &[Vec<C>],
    normalization: Normalization,
) -> f64 {
    let bus_of = match validate_assignment(graph, assignment, num_buses, size_bus) {
        Ok(bus_of) => bus_of,
        Err(reason) => {
            debug!("invalid assignment: {reason}");
            return INVALID_SCORE;
        }
    };

    let removed = unsplit_rowdy_members(graph, &bus_of, constraints);
    let scratch = if removed.is_empty() {
        Cow::Borrowed(graph)
    } else {
        let mut scratch = graph.clone();
        scratch.remove_vertices(&removed);
        Cow::Owned(scratch)
    };

    let same_bus_edges = scratch.same_part_edges(&bus_of);
    let total_edges = match normalization {
        Normalization::RemainingEdges => scratch.num_edges(),
        Normalization::OriginalEdges => graph.num_edges(),
    };
    if total_edges == 0 {
        return 0.0;
    }

    same_bus_edges as f64 / total_edges as f64
}
