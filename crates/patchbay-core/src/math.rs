//! Scalar helpers shared by the built-in kernels.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Signal Logic
//!
//! Logic kernels treat any nonzero input as `true` and emit `0.0` / `1.0`:
//!
//! - [`is_truthy`] - Float to bool
//! - [`bool_to_signal`] - Bool to float
//!
//! # Utilities
//!
//! - [`flush_denormal`] - Denormal guard for recursive state

use libm::fabsf;

/// Returns `true` for any nonzero input, `false` for `0.0` and `-0.0`.
///
/// NaN counts as true (it is not equal to zero).
///
/// # Example
/// ```rust
/// use patchbay_core::is_truthy;
///
/// assert!(is_truthy(0.5));
/// assert!(is_truthy(-1.0));
/// assert!(!is_truthy(0.0));
/// ```
#[inline]
pub fn is_truthy(x: f32) -> bool {
    x != 0.0
}

/// Encodes a boolean as a signal value: `1.0` or `0.0`.
#[inline]
pub fn bool_to_signal(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal floats cause severe CPU slowdowns on most architectures. Values
/// below 1e-20 are replaced with zero, leaving margin before the IEEE 754
/// subnormal range begins.
///
/// Use this on state that feeds back into itself every cycle (filter
/// memories) and can decay indefinitely toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if fabsf(x) < 1e-20 { 0.0 } else { x }
}
