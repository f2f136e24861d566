//! Applying one action to an instance and its symmetry counterparts.
//!
//! Which instances are linked is decided by the caller (for parts, see
//! [`Assembly::symmetry_counterparts`](crate::Assembly::symmetry_counterparts)).

use crate::data_structures::part::{Assembly, PartId};

/// Runs `action` on every linked instance, not on the instance itself.
pub fn for_each_linked<T, F>(linked: impl IntoIterator<Item = T>, mut action: F)
where
    F: FnMut(T),
{
    for instance in linked {
        action(instance);
    }
}

/// Runs `action` on `instance` first, then on every linked instance.
pub fn action_with_symmetry<T, F>(instance: T, linked: impl IntoIterator<Item = T>, mut action: F)
where
    F: FnMut(T),
{
    action(instance);
    for_each_linked(linked, action);
}

/// [`action_with_symmetry`] over a part and its recorded counterparts.
pub fn part_action_with_symmetry<F>(assembly: &mut Assembly, part: PartId, mut action: F)
where
    F: FnMut(&mut Assembly, PartId),
{
    let counterparts = assembly.symmetry_counterparts(part).to_vec();
    action_with_symmetry(part, counterparts, |id| action(assembly, id));
}
