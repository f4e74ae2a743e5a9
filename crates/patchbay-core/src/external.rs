//! Zero-copy bridge to collaborator-owned values.
//!
//! An [`ExternalValue`] is a float cell owned by whoever drives the graph
//! (an audio callback, a GUI knob, a test harness). Nodes never own it: an
//! input bound to it holds an [`ExternalRef`], a weak reference that reads the
//! current value on every evaluation.
//!
//! The value is stored as `f32` bits in an `AtomicU32`, so the collaborator may
//! write from another thread between updates without a lock. Once every
//! `ExternalValue` clone is dropped, the reference reads `0.0`, the same
//! default as an unbound input.
//!
//! ```rust
//! use patchbay_core::ExternalValue;
//!
//! let knob = ExternalValue::new(0.25);
//! let r = knob.downgrade();
//! assert_eq!(r.get(), 0.25);
//!
//! knob.set(0.75);
//! assert_eq!(r.get(), 0.75);
//!
//! drop(knob);
//! assert_eq!(r.get(), 0.0);
//! assert!(!r.is_live());
//! ```

#[cfg(not(feature = "std"))]
use alloc::sync::{Arc, Weak};
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};
#[cfg(feature = "std")]
use std::sync::{Arc, Weak};

/// Collaborator-owned float cell that node inputs can reference.
///
/// Cloning shares the same cell.
#[derive(Clone)]
pub struct ExternalValue(Arc<AtomicU32>);

impl ExternalValue {
    /// Creates a cell holding `value`.
    pub fn new(value: f32) -> Self {
        Self(Arc::new(AtomicU32::new(value.to_bits())))
    }

    /// Stores a new value. Visible to the next evaluation that reads it.
    #[inline]
    pub fn set(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Returns the current value.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Creates a non-owning reference for binding into a node input.
    pub fn downgrade(&self) -> ExternalRef {
        ExternalRef(Arc::downgrade(&self.0))
    }
}

impl Default for ExternalValue {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl fmt::Debug for ExternalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExternalValue").field(&self.get()).finish()
    }
}

/// Non-owning reference to an [`ExternalValue`].
#[derive(Clone, Default)]
pub struct ExternalRef(Weak<AtomicU32>);

impl ExternalRef {
    /// Reads the referenced value, or `0.0` if the owner has dropped it.
    #[inline]
    pub fn get(&self) -> f32 {
        self.0
            .upgrade()
            .map_or(0.0, |cell| f32::from_bits(cell.load(Ordering::Relaxed)))
    }

    /// Returns `true` while at least one [`ExternalValue`] owner is alive.
    pub fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Returns `true` if both references point at the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ExternalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_live() {
            f.debug_tuple("ExternalRef").field(&self.get()).finish()
        } else {
            f.write_str("ExternalRef(<dropped>)")
        }
    }
}

impl From<&ExternalValue> for ExternalRef {
    fn from(value: &ExternalValue) -> Self {
        value.downgrade()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_cell() {
        let a = ExternalValue::new(1.0);
        let b = a.clone();
        b.set(4.5);
        assert_eq!(a.get(), 4.5);
    }

    #[test]
    fn test_ref_tracks_writes() {
        let v = ExternalValue::new(1.8);
        let r = ExternalRef::from(&v);
        assert_eq!(r.get(), 1.8);
        v.set(-3.0);
        assert_eq!(r.get(), -3.0);
    }

    #[test]
    fn test_dropped_owner_reads_zero() {
        let v = ExternalValue::new(7.0);
        let r = v.downgrade();
        assert!(r.is_live());
        drop(v);
        assert!(!r.is_live());
        assert_eq!(r.get(), 0.0);
    }

    #[test]
    fn test_default_ref_is_dead() {
        let r = ExternalRef::default();
        assert!(!r.is_live());
        assert_eq!(r.get(), 0.0);
    }

    #[test]
    fn test_ptr_eq() {
        let v = ExternalValue::new(0.0);
        let w = ExternalValue::new(0.0);
        assert!(v.downgrade().ptr_eq(&v.downgrade()));
        assert!(!v.downgrade().ptr_eq(&w.downgrade()));
    }
}
