//! Built-in compute kernels.
//!
//! | Kernel | Arity | State |
//! |--------|-------|-------|
//! | [`Passthrough`] | n → n | none |
//! | [`Add`], [`Multiply`], [`Subtract`] | n → 1 (default 2) | none |
//! | [`Negate`] | 1 → 1 | none |
//! | [`And`], [`Or`], [`Xor`] | n → 1 (default 2) | none |
//! | [`Integral`] | 1 → 1 | accumulator |
//! | [`Lowpass`] | 3 → 1 | two filter memories |
//!
//! Variadic kernels keep at least one input; a request for zero is raised to one.

mod arithmetic;
mod integral;
mod logic;
mod lowpass;
mod passthrough;

pub use arithmetic::{Add, Multiply, Negate, Subtract};
pub use integral::Integral;
pub use logic::{And, Or, Xor};
pub use lowpass::Lowpass;
pub use passthrough::Passthrough;

/// Default input count of the variadic kernels.
pub const DEFAULT_FAN_IN: usize = 2;
