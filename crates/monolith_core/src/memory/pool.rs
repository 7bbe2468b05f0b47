//! # Slot Pool
//!
//! Generational arena for objects that are frequently created and retired.

use super::handle::SlotId;

/// One storage slot: the generation of its current (or last) occupant.
#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// A generational pool of values addressed by [`SlotId`].
///
/// Freed slots are recycled through a free list; their generation is bumped
/// so handles to the previous occupant stop resolving.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Wrap it in a lock to share it.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool: SlotPool<Cluster> = SlotPool::with_capacity(64);
///
/// // Insert - O(1)
/// let id = pool.insert(cluster);
///
/// // Remove - O(1), `id` is stale afterwards
/// pool.remove(id);
/// assert!(pool.get(id).is_none());
/// ```
#[derive(Debug)]
pub struct SlotPool<T> {
    /// The storage array.
    slots: Vec<Slot<T>>,
    /// Free list - indices of available slots.
    free_list: Vec<u32>,
    /// Number of occupied slots.
    len: usize,
}

impl<T> SlotPool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty pool with room for `capacity` values before growing.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of live values.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no value is live.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `value`, reusing a freed slot when one is available.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX - 1` slots are ever allocated.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return SlotId::new(index, slot.generation);
        }

        let index = u32::try_from(self.slots.len())
            .ok()
            .filter(|&index| index != u32::MAX)
            .expect("slot pool exhausted the u32 index space");
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        SlotId::new(index, 0)
    }

    /// Removes the value named by `id`.
    ///
    /// Returns `None` if the handle is null or stale.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slot_mut(id)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);

        self.free_list.push(id.index());
        self.len -= 1;
        Some(value)
    }

    /// Whether `id` names a live value.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Gets a reference to the value named by `id`.
    #[inline]
    #[must_use]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        if id.is_null() {
            return None;
        }
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    /// Gets a mutable reference to the value named by `id`.
    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slot_mut(id)?.value.as_mut()
    }

    /// Iterates over all live values.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let value = slot.value.as_ref()?;
            let index = u32::try_from(index).ok()?;
            Some((SlotId::new(index, slot.generation), value))
        })
    }

    /// Removes every value. All outstanding handles become stale.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            if let Ok(index) = u32::try_from(index) {
                self.free_list.push(index);
            }
        }
        self.len = 0;
    }

    fn slot_mut(&mut self, id: SlotId) -> Option<&mut Slot<T>> {
        if id.is_null() {
            return None;
        }
        let slot = self.slots.get_mut(id.index() as usize)?;
        (slot.generation == id.generation()).then_some(slot)
    }
}

impl<T> Default for SlotPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_insert_remove() {
        let mut pool: SlotPool<u32> = SlotPool::new();

        let h1 = pool.insert(42);
        assert_eq!(*pool.get(h1).unwrap(), 42);
        assert_eq!(pool.len(), 1);

        let freed = pool.remove(h1).unwrap();
        assert_eq!(freed, 42);
        assert!(pool.is_empty());
        assert!(pool.remove(h1).is_none());
    }

    #[test]
    fn test_pool_reuse_bumps_generation() {
        let mut pool: SlotPool<u32> = SlotPool::with_capacity(1);

        let h1 = pool.insert(1);
        pool.remove(h1);

        let h2 = pool.insert(2);
        assert_eq!(h1.index(), h2.index()); // Same slot reused
        assert_ne!(h1.generation(), h2.generation());
        assert!(pool.get(h1).is_none());
        assert_eq!(*pool.get(h2).unwrap(), 2);
    }

    #[test]
    fn test_null_handle_never_resolves() {
        let mut pool: SlotPool<u8> = SlotPool::new();
        pool.insert(1);
        assert!(pool.get(SlotId::NULL).is_none());
        assert!(pool.get_mut(SlotId::NULL).is_none());
    }

    #[test]
    fn test_iter_and_clear() {
        let mut pool: SlotPool<u32> = SlotPool::new();
        let ids: Vec<_> = (0..4).map(|i| pool.insert(i)).collect();
        pool.remove(ids[1]);

        let live: Vec<_> = pool.iter().map(|(_, v)| *v).collect();
        assert_eq!(live, vec![0, 2, 3]);

        pool.clear();
        assert!(pool.is_empty());
        assert!(ids.iter().all(|&id| !pool.contains(id)));

        let fresh = pool.insert(9);
        assert_eq!(fresh.index(), 0);
        assert_eq!(pool.len(), 1);
    }
}
