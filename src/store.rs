/// Index into a [`BlockStore`]. Valid until the store is reset.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct BlockHandle(u32);

impl BlockHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Fixed-capacity, append-only arena.
///
/// Slots are handed out in order and never reassigned to another owner before
/// [`reset`](Self::reset). A value may be moved out with [`take`](Self::take)
/// and later [`put`](Self::put) back under the same handle. Storing past the
/// capacity is a contract violation and panics.
#[derive(Debug)]
pub struct BlockStore<T> {
    slots: Vec<Option<T>>,
    capacity: usize,
}

impl<T> BlockStore<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn store(&mut self, value: T) -> BlockHandle {
        assert!(
            self.slots.len() < self.capacity,
            "block store overflow: capacity is {}",
            self.capacity
        );
        self.slots.push(Some(value));
        BlockHandle((self.slots.len() - 1) as u32)
    }

    pub fn get(&self, handle: BlockHandle) -> Option<&T> {
        self.slots.get(handle.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, handle: BlockHandle) -> Option<&mut T> {
        self.slots.get_mut(handle.index()).and_then(Option::as_mut)
    }

    /// Moves the value out, leaving the slot reserved for `handle`.
    pub fn take(&mut self, handle: BlockHandle) -> Option<T> {
        self.slots.get_mut(handle.index()).and_then(Option::take)
    }

    /// Places `value` in the slot reserved for `handle`, returning whatever
    /// was there. Panics if the handle was never issued by this store.
    pub fn put(&mut self, handle: BlockHandle, value: T) -> Option<T> {
        let slot = self
            .slots
            .get_mut(handle.index())
            .unwrap_or_else(|| panic!("block handle {} was not issued by this store", handle.0));
        slot.replace(value)
    }

    /// Empties the store. The backing allocation is kept.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Number of issued slots, occupied or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Occupied slots in issue order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockHandle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (BlockHandle(i as u32), v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_stay_valid_as_store_fills() {
        let mut store = BlockStore::with_capacity(4);
        let a = store.store("a");
        let b = store.store("b");
        store.store("c");

        assert_eq!(store.get(a), Some(&"a"));
        assert_eq!(store.get(b), Some(&"b"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn take_and_put_keep_the_handle() {
        let mut store = BlockStore::with_capacity(2);
        let h = store.store(1);

        assert_eq!(store.take(h), Some(1));
        assert_eq!(store.get(h), None);
        assert_eq!(store.iter().count(), 0);

        assert_eq!(store.put(h, 2), None);
        assert_eq!(store.get(h), Some(&2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reset_empties_without_shrinking() {
        let mut store = BlockStore::with_capacity(8);
        for i in 0..8 {
            store.store(i);
        }
        let allocated = store.slots.capacity();

        store.reset();

        assert!(store.is_empty());
        assert_eq!(store.slots.capacity(), allocated);
        assert_eq!(store.capacity(), 8);
        let h = store.store(42);
        assert_eq!(h.index(), 0);
    }

    #[test]
    #[should_panic(expected = "block store overflow")]
    fn overflow_panics() {
        let mut store = BlockStore::with_capacity(1);
        store.store(());
        store.store(());
    }
}
