//! Generational arena backing the graph's node and group storage.
//!
//! Every slot carries a generation counter. A [`Handle`] is a slot index plus
//! the generation it was issued at; removing a value bumps the slot's
//! generation, so every handle issued before the removal stops resolving.
//! Freed slots are reused, which keeps indices small and storage dense.
//!
//! [`Peers`] is the split-borrow view used during evaluation: it gives shared
//! access to every value except the one currently borrowed mutably.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Slot index plus generation. Stable until the value it names is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// Slot index. Reused after removal; pair with [`generation`](Self::generation).
    #[inline]
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation the handle was issued at.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }

    /// Returns a handle that never resolves in any arena.
    #[inline]
    pub fn sentinel() -> Self {
        Self {
            index: u32::MAX,
            generation: u32::MAX,
        }
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational arena.
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty arena with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Inserts a value and returns its handle.
    pub fn insert(&mut self, value: T) -> Handle {
        self.insert_with(|_| value)
    }

    /// Inserts a value built from its own handle.
    pub fn insert_with(&mut self, build: impl FnOnce(Handle) -> T) -> Handle {
        let handle = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            let handle = Handle {
                index,
                generation: slot.generation,
            };
            slot.value = Some(build(handle));
            handle
        } else {
            assert!(self.slots.len() < u32::MAX as usize, "arena is full");
            let index = self.slots.len() as u32;
            let handle = Handle {
                index,
                generation: 0,
            };
            self.slots.push(Slot {
                generation: 0,
                value: Some(build(handle)),
            });
            handle
        };
        self.len += 1;
        handle
    }

    /// Removes and returns the value, invalidating `handle` and all copies of it.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(value)
    }

    /// Returns `true` if `handle` still names a live value.
    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Shared access by handle.
    #[inline]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation == handle.generation {
            slot.value.as_ref()
        } else {
            None
        }
    }

    /// Mutable access by handle.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation == handle.generation {
            slot.value.as_mut()
        } else {
            None
        }
    }

    /// Mutable access to one value plus shared access to all the others.
    pub fn split_mut(&mut self, handle: Handle) -> Option<(&mut T, Peers<'_, T>)> {
        let index = handle.index as usize;
        if index >= self.slots.len() || self.slots[index].generation != handle.generation {
            return None;
        }
        let (before, rest) = self.slots.split_at_mut(index);
        let (slot, after) = rest.split_first_mut()?;
        let value = slot.value.as_mut()?;
        Some((
            value,
            Peers {
                before,
                after,
                index,
            },
        ))
    }

    /// Number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when no values are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over live values with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.value.as_ref().map(|v| {
                (
                    Handle {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    v,
                )
            })
        })
    }

    /// Mutable iteration over live values.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(|slot| slot.value.as_mut())
    }

    /// Upper bound on slot indices; sizes per-slot scratch tables.
    #[inline]
    pub(crate) fn capacity_bound(&self) -> usize {
        self.slots.len()
    }
}

/// Shared view of every arena value except the one held by [`Arena::split_mut`].
pub struct Peers<'a, T> {
    before: &'a [Slot<T>],
    after: &'a [Slot<T>],
    index: usize,
}

impl<'a, T> Peers<'a, T> {
    /// A view that resolves nothing.
    pub(crate) fn empty() -> Self {
        Self {
            before: &[],
            after: &[],
            index: usize::MAX,
        }
    }

    /// Resolves `handle`, or `None` if it is stale or names the excluded value.
    #[inline]
    pub fn get(&self, handle: Handle) -> Option<&'a T> {
        let index = handle.index as usize;
        let slot = if index < self.index {
            self.before.get(index)?
        } else if index > self.index {
            self.after.get(index - self.index - 1)?
        } else {
            return None;
        };
        if slot.generation == handle.generation {
            slot.value.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut arena = Arena::new();
        let a = arena.insert(10);
        let b = arena.insert(20);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&10));
        assert_eq!(arena.get(b), Some(&20));

        assert_eq!(arena.remove(a), Some(10));
        assert_eq!(arena.len(), 1);
        assert!(!arena.contains(a));
        assert_eq!(arena.remove(a), None);
    }

    #[test]
    fn test_reused_slot_rejects_stale_handle() {
        let mut arena = Arena::new();
        let a = arena.insert("first");
        arena.remove(a);
        let b = arena.insert("second");

        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.get(b), Some(&"second"));
    }

    #[test]
    fn test_insert_with_sees_own_handle() {
        let mut arena = Arena::new();
        let h = arena.insert_with(|h| h.index() * 100);
        assert_eq!(arena.get(h), Some(&0));
        let h2 = arena.insert_with(|h| h.index() * 100);
        assert_eq!(arena.get(h2), Some(&100));
    }

    #[test]
    fn test_split_mut_excludes_self() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        let c = arena.insert(3);

        let (value, peers) = arena.split_mut(b).unwrap();
        *value = 20;
        assert_eq!(peers.get(a), Some(&1));
        assert_eq!(peers.get(b), None);
        assert_eq!(peers.get(c), Some(&3));
        assert_eq!(arena.get(b), Some(&20));
    }

    #[test]
    fn test_split_mut_stale_handle() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        arena.remove(a);
        assert!(arena.split_mut(a).is_none());
    }

    #[test]
    fn test_peers_empty_resolves_nothing() {
        let mut arena = Arena::new();
        let a = arena.insert(5);
        let peers: Peers<'_, i32> = Peers::empty();
        assert_eq!(peers.get(a), None);
        assert!(arena.get_mut(a).is_some());
    }

    #[test]
    fn test_iter_skips_removed() {
        let mut arena = Arena::new();
        let a = arena.insert('a');
        let _b = arena.insert('b');
        let _c = arena.insert('c');
        arena.remove(a);
        let values: Vec<char> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!['b', 'c']);
        assert!(!arena.is_empty());
        assert!(!arena.contains(Handle::sentinel()));
    }
}
