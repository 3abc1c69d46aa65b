//! Group assignment
//!
//! Pure helpers that rearrange group membership in memory. The database
//! runs them inside a write transaction and persists the groups they change.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::record::{Developer, Group};

/// Distribute every developer not yet in any group across `groups`.
///
/// Unassigned developers are shuffled, then each goes to the group with the
/// fewest members (the first such group on ties). Existing members stay where
/// they are. Returns the number of developers placed.
pub fn auto_assign<R>(groups: &mut [Group], developers: &[Developer], rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    if groups.is_empty() {
        return 0;
    }

    let assigned: HashSet<String> = groups
        .iter()
        .flat_map(|group| group.members.iter().cloned())
        .collect();

    let mut unassigned: Vec<String> = developers
        .iter()
        .filter(|dev| !assigned.contains(&dev.id))
        .map(|dev| dev.id.clone())
        .collect();

    unassigned.shuffle(rng);

    let placed = unassigned.len();
    for id in unassigned {
        if let Some(smallest) = groups.iter_mut().min_by_key(|group| group.members.len()) {
            smallest.members.push(id);
        }
    }

    placed
}

/// Remove every member from every group. Returns how many groups changed.
pub fn clear_members(groups: &mut [Group]) -> usize {
    let mut changed = 0;
    for group in groups.iter_mut().filter(|group| !group.members.is_empty()) {
        group.members.clear();
        changed += 1;
    }
    changed
}
