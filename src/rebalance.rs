use log::debug;

/// What a rebalance pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RebalanceReport {
    /// Members taken out of over-capacity groups.
    pub moved: usize,

    /// Members that found no group with room and were appended to the last group.
    pub unplaced: usize,
}

impl RebalanceReport {
    pub fn is_noop(&self) -> bool {
        self.moved == 0
    }
}

/// Bring every group down to at most `capacity` members by pick and fill.
///
/// Groups within capacity are left untouched. Otherwise, in group order, the members of each
/// over-capacity group past index `capacity` move to an overflow pool, then, in group order,
/// each group under capacity takes members from the tail of the pool until it is full or the
/// pool is empty. New edge cuts are not looked at.
///
/// The member count is conserved. When the groups cannot seat everyone
/// (`groups.len() * capacity` is below the member count) the leftovers go to the last group,
/// which is then over capacity.
pub fn rebalance<T>(groups: &mut [Vec<T>], capacity: usize) -> RebalanceReport {
    if groups.iter().all(|group| group.len() <= capacity) {
        return RebalanceReport::default();
    }

    let mut pool = Vec::new();
    for group in groups.iter_mut() {
        if group.len() > capacity {
            pool.extend(group.drain(capacity..));
        }
    }
    let moved = pool.len();

    for group in groups.iter_mut() {
        let space = capacity.saturating_sub(group.len());
        let take = space.min(pool.len());
        group.extend(pool.drain(pool.len() - take..));
    }

    let unplaced = pool.len();
    if let Some(last) = groups.last_mut() {
        last.append(&mut pool);
    }

    debug!("rebalance moved {moved} members, {unplaced} without room");
    RebalanceReport { moved, unplaced }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_within_capacity_are_untouched() {
        // Arrange
        let mut groups = vec![vec![3, 1], vec![2], vec![0, 4]];
        let original = groups.clone();

        // Act
        let report = rebalance(&mut groups, 2);

        // Assert
        assert_eq!(groups, original);
        assert!(report.is_noop());
    }

    #[test]
    fn test_excess_fills_short_groups_from_the_pool_tail() {
        // Arrange
        let mut groups = vec![vec![0, 1, 2, 3, 4, 5], vec![6, 7, 8], vec![9]];

        // Act
        let report = rebalance(&mut groups, 4);

        // Assert
        // Pool is [4, 5]; group 1 takes 5 off the tail, group 2 takes 4.
        assert_eq!(groups, vec![vec![0, 1, 2, 3], vec![6, 7, 8, 5], vec![9, 4]]);
        assert_eq!(report, RebalanceReport { moved: 2, unplaced: 0 });
    }

    #[test]
    fn test_every_group_ends_within_capacity_when_feasible() {
        // Arrange
        let mut groups = vec![(0..7).collect::<Vec<_>>(), vec![7], vec![], vec![8, 9]];

        // Act
        rebalance(&mut groups, 3);

        // Assert
        assert!(groups.iter().all(|group| group.len() <= 3));
        let mut members: Vec<i32> = groups.concat();
        members.sort();
        assert_eq!(members, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_rebalance_is_idempotent() {
        // Arrange
        let mut groups = vec![vec!["a", "b", "c", "d"], vec!["e"]];
        rebalance(&mut groups, 3);
        let once = groups.clone();

        // Act
        let report = rebalance(&mut groups, 3);

        // Assert
        assert_eq!(groups, once);
        assert!(report.is_noop());
    }

    #[test]
    fn test_infeasible_capacity_conserves_members() {
        // Arrange
        let mut groups = vec![vec![0, 1, 2], vec![3, 4]];

        // Act
        let report = rebalance(&mut groups, 2);

        // Assert
        assert_eq!(report, RebalanceReport { moved: 1, unplaced: 1 });
        assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), 5);
        assert_eq!(groups[1].len(), 3);
    }
}
