//! Operation registry and schema factory for patchbay graphs.
//!
//! This crate decouples callers from compile-time kernel types. Operations
//! are discovered and instantiated by a string tag, and a [`Schema`] builds
//! graph nodes from those tags.
//!
//! # Features
//!
//! - **Operation Discovery**: List every built-in kernel with its metadata
//! - **Factory Pattern**: Create operations by tag at runtime
//! - **Category System**: Kernels organized by role (routing, arithmetic, logic, stateful)
//! - **Schema**: Tag-driven node construction with a configuration callback
//!
//! # Example
//!
//! ```rust
//! use patchbay_registry::{OperationCategory, OperationRegistry, Schema};
//!
//! let registry = OperationRegistry::new();
//! for op in registry.all() {
//!     println!("{}: {}", op.id, op.description);
//! }
//! assert_eq!(registry.in_category(OperationCategory::Logic).len(), 3);
//!
//! let mut schema = Schema::new();
//! let add = schema
//!     .new_node("add", |node| {
//!         node.set_constant(0, 1.5);
//!         node.set_constant(1, 2.0);
//!     })
//!     .unwrap();
//! let neg = schema.new_node("negate", |_| {}).unwrap();
//! schema.connect(add, 0, neg, 0).unwrap();
//!
//! schema.update(neg).unwrap();
//! assert_eq!(schema.get(neg, 0), Some(-3.5));
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! patchbay-registry = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use patchbay_core::Operation;
use patchbay_core::ops::{
    Add, And, Integral, Lowpass, Multiply, Negate, Or, Passthrough, Subtract, Xor,
};

mod schema;

pub use schema::{Schema, SchemaError};

/// Category of operation for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationCategory {
    /// Channel routing (passthrough)
    Routing,
    /// Stateless arithmetic (add, multiply, subtract, negate)
    Arithmetic,
    /// Boolean gates over float signals
    Logic,
    /// Kernels that carry state across cycles (integral, lowpass)
    Stateful,
}

impl OperationCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [Self::Routing, Self::Arithmetic, Self::Logic, Self::Stateful];

    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            OperationCategory::Routing => "Routing",
            OperationCategory::Arithmetic => "Arithmetic",
            OperationCategory::Logic => "Logic",
            OperationCategory::Stateful => "Stateful",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            OperationCategory::Routing => "Pass-through and channel routing kernels",
            OperationCategory::Arithmetic => "Sum, product, difference, and negation",
            OperationCategory::Logic => "And, or, and xor over nonzero-is-true signals",
            OperationCategory::Stateful => "Accumulators and filters with per-cycle memory",
        }
    }
}

/// Describes an operation in the registry.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    /// Unique tag for the operation (lowercase, no spaces).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the operation.
    pub description: &'static str,
    /// Category for organization.
    pub category: OperationCategory,
    /// Default number of inputs.
    pub inputs: usize,
    /// Default number of outputs.
    pub outputs: usize,
    /// Whether the input count can be changed after construction.
    pub variadic: bool,
}

/// Factory function type for creating operations.
pub type OperationFactory = fn() -> Box<dyn Operation>;

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: OperationDescriptor,
    factory: OperationFactory,
}

/// Registry of available operations.
///
/// All built-in kernels are registered by [`new()`](Self::new); hosts can add
/// their own with [`register()`](Self::register).
pub struct OperationRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationRegistry {
    /// Create a new registry with all built-in operations registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin();
        registry
    }

    /// Create a registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            entries: Vec::with_capacity(10),
        }
    }

    /// Register all built-in operations.
    fn register_builtin(&mut self) {
        // Routing
        self.register(
            OperationDescriptor {
                id: "passthrough",
                name: "Passthrough",
                description: "Copies each input to the matching output",
                category: OperationCategory::Routing,
                inputs: 1,
                outputs: 1,
                variadic: true,
            },
            || Box::new(Passthrough::new(1)),
        );

        // Arithmetic
        self.register(
            OperationDescriptor {
                id: "add",
                name: "Add",
                description: "Sum of all inputs",
                category: OperationCategory::Arithmetic,
                inputs: 2,
                outputs: 1,
                variadic: true,
            },
            || Box::new(Add::new()),
        );
        self.register(
            OperationDescriptor {
                id: "multiply",
                name: "Multiply",
                description: "Product of all inputs",
                category: OperationCategory::Arithmetic,
                inputs: 2,
                outputs: 1,
                variadic: true,
            },
            || Box::new(Multiply::new()),
        );
        self.register(
            OperationDescriptor {
                id: "subtract",
                name: "Subtract",
                description: "First input minus the others",
                category: OperationCategory::Arithmetic,
                inputs: 2,
                outputs: 1,
                variadic: true,
            },
            || Box::new(Subtract::new()),
        );
        self.register(
            OperationDescriptor {
                id: "negate",
                name: "Negate",
                description: "Sign flip",
                category: OperationCategory::Arithmetic,
                inputs: 1,
                outputs: 1,
                variadic: false,
            },
            || Box::new(Negate::new()),
        );

        // Logic
        self.register(
            OperationDescriptor {
                id: "and",
                name: "And",
                description: "1.0 when every input is nonzero",
                category: OperationCategory::Logic,
                inputs: 2,
                outputs: 1,
                variadic: true,
            },
            || Box::new(And::new()),
        );
        self.register(
            OperationDescriptor {
                id: "or",
                name: "Or",
                description: "1.0 when any input is nonzero",
                category: OperationCategory::Logic,
                inputs: 2,
                outputs: 1,
                variadic: true,
            },
            || Box::new(Or::new()),
        );
        self.register(
            OperationDescriptor {
                id: "xor",
                name: "Xor",
                description: "1.0 when an odd number of inputs are nonzero",
                category: OperationCategory::Logic,
                inputs: 2,
                outputs: 1,
                variadic: true,
            },
            || Box::new(Xor::new()),
        );

        // Stateful
        self.register(
            OperationDescriptor {
                id: "integral",
                name: "Integral",
                description: "Running sum of the input",
                category: OperationCategory::Stateful,
                inputs: 1,
                outputs: 1,
                variadic: false,
            },
            || Box::new(Integral::new()),
        );
        self.register(
            OperationDescriptor {
                id: "lowpass",
                name: "Lowpass",
                description: "Resonant two-pole lowpass (cutoff, resonance, input)",
                category: OperationCategory::Stateful,
                inputs: 3,
                outputs: 1,
                variadic: false,
            },
            || Box::new(Lowpass::new()),
        );
    }

    /// Register an operation. A later registration with the same tag
    /// shadows the earlier one.
    pub fn register(&mut self, descriptor: OperationDescriptor, factory: OperationFactory) {
        self.entries.retain(|e| e.descriptor.id != descriptor.id);
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
    }

    /// Returns descriptors for all registered operations.
    pub fn all(&self) -> Vec<&OperationDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for operations in a specific category.
    pub fn in_category(&self, category: OperationCategory) -> Vec<&OperationDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by tag.
    pub fn get(&self, id: &str) -> Option<&OperationDescriptor> {
        self.entries
            .iter()
            .find(|e| e.descriptor.id == id)
            .map(|e| &e.descriptor)
    }

    /// Create an operation instance by tag.
    ///
    /// Returns `None` if the tag is not registered.
    pub fn create(&self, id: &str) -> Option<Box<dyn Operation>> {
        self.entries
            .iter()
            .find(|e| e.descriptor.id == id)
            .map(|e| (e.factory)())
    }

    /// Returns the number of registered operations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no operations are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = OperationRegistry::new();
        assert_eq!(registry.len(), 10);
        assert!(!registry.is_empty());
        assert!(OperationRegistry::empty().is_empty());
    }

    #[test]
    fn test_get_operation() {
        let registry = OperationRegistry::new();

        let lowpass = registry.get("lowpass");
        assert!(lowpass.is_some());
        assert_eq!(lowpass.unwrap().name, "Lowpass");

        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_create_operation() {
        let registry = OperationRegistry::new();

        let op = registry.create("multiply").unwrap();
        assert_eq!(op.name(), "Multiply");
        assert!(registry.create("nonexistent").is_none());
    }

    #[test]
    fn test_operations_by_category() {
        let registry = OperationRegistry::new();

        let routing = registry.in_category(OperationCategory::Routing);
        assert_eq!(routing.len(), 1); // Passthrough

        let arithmetic = registry.in_category(OperationCategory::Arithmetic);
        assert_eq!(arithmetic.len(), 4); // Add, Multiply, Subtract, Negate

        let logic = registry.in_category(OperationCategory::Logic);
        assert_eq!(logic.len(), 3); // And, Or, Xor

        let stateful = registry.in_category(OperationCategory::Stateful);
        assert_eq!(stateful.len(), 2); // Integral, Lowpass

        let total: usize = OperationCategory::ALL
            .iter()
            .map(|&c| registry.in_category(c).len())
            .sum();
        assert_eq!(total, registry.len());
    }

    #[test]
    fn test_category_names() {
        assert_eq!(OperationCategory::Routing.name(), "Routing");
        assert_eq!(OperationCategory::Stateful.name(), "Stateful");
        assert!(!OperationCategory::Logic.description().is_empty());
    }

    #[test]
    fn test_descriptors_match_created_arity() {
        let registry = OperationRegistry::new();

        for descriptor in registry.all() {
            let mut op = registry
                .create(descriptor.id)
                .unwrap_or_else(|| panic!("Failed to create operation: {}", descriptor.id));
            assert_eq!(op.num_inputs(), descriptor.inputs, "{}", descriptor.id);
            assert_eq!(op.num_outputs(), descriptor.outputs, "{}", descriptor.id);

            op.set_num_inputs(descriptor.inputs + 2);
            assert_eq!(
                op.num_inputs() != descriptor.inputs,
                descriptor.variadic,
                "{}",
                descriptor.id
            );
        }
    }

    #[test]
    fn test_register_shadows_existing_tag() {
        let mut registry = OperationRegistry::new();
        registry.register(
            OperationDescriptor {
                id: "add",
                name: "Wide Add",
                description: "Four-input sum",
                category: OperationCategory::Arithmetic,
                inputs: 4,
                outputs: 1,
                variadic: true,
            },
            || {
                let mut op = Add::new();
                op.set_num_inputs(4);
                Box::new(op)
            },
        );
        assert_eq!(registry.len(), 10);
        assert_eq!(registry.get("add").unwrap().name, "Wide Add");
        assert_eq!(registry.create("add").unwrap().num_inputs(), 4);
    }
}
