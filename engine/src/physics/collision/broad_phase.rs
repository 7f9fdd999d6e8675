//! Broad phase collision detection using sweep and prune

use crate::geometry::AxisAlignedBox;

/// Objects swept by [`sweep_and_prune`].
///
/// Objects are addressed by index. Bounds are read again every time they are
/// needed because the narrow phase may move objects during the sweep.
pub trait SweepTarget {
    type Error;

    /// Current bounds of an object
    fn bounds(&self, index: usize) -> Result<AxisAlignedBox, Self::Error>;

    /// Exact test and resolution for a candidate pair.
    ///
    /// `first` entered the sweep before `second`.
    fn narrow_phase(&mut self, first: usize, second: usize) -> Result<(), Self::Error>;
}

/// Sort `order` by left edge, ties by index, so equal layouts sweep the same
/// way every time
pub fn sort_by_left_edge<T: SweepTarget>(
    target: &T,
    order: &mut [usize],
) -> Result<(), T::Error> {
    let mut keyed = order
        .iter()
        .map(|&index| Ok((target.bounds(index)?.x(), index)))
        .collect::<Result<Vec<_>, T::Error>>()?;
    keyed.sort_unstable();
    for (slot, (_, index)) in order.iter_mut().zip(keyed) {
        *slot = index;
    }
    Ok(())
}

/// Run the narrow phase on every pair whose X extents may overlap.
///
/// `order` must already be sorted by left edge. An active object is dropped
/// once its right edge is at or before the left edge of the next object in
/// order. Returns the number of candidate pairs passed to the narrow phase.
pub fn sweep_and_prune<T: SweepTarget>(target: &mut T, order: &[usize]) -> Result<usize, T::Error> {
    let mut active: Vec<usize> = Vec::new();
    let mut candidates = 0;

    for &index in order {
        let left = target.bounds(index)?.x();

        let mut survivors = Vec::with_capacity(active.len());
        for &previous in &active {
            if target.bounds(previous)?.right() <= left {
                continue;
            }
            target.narrow_phase(previous, index)?;
            candidates += 1;
            survivors.push(previous);
        }

        survivors.push(index);
        active = survivors;
    }

    Ok(candidates)
}
