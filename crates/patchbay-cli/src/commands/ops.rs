//! Operation listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use patchbay_registry::{OperationCategory, OperationRegistry};

#[derive(Args)]
pub struct OpsArgs {
    /// Show details for a specific operation
    #[arg(value_name = "OPERATION")]
    operation: Option<String>,
}

pub fn run(args: OpsArgs) -> anyhow::Result<()> {
    let registry = OperationRegistry::new();

    let Some(tag) = &args.operation else {
        println!("Available Operations");
        println!("====================");

        for category in OperationCategory::ALL {
            println!();
            println!("{} - {}", category.name(), category.description());
            for op in registry.in_category(category) {
                println!("  {:12} - {}", op.id, op.description);
            }
        }

        println!();
        println!("Use 'patchbay ops <name>' for port details.");
        return Ok(());
    };

    let descriptor = registry
        .get(&tag.to_ascii_lowercase())
        .ok_or_else(|| anyhow::anyhow!("Unknown operation: {}", tag))?;
    let op = registry
        .create(descriptor.id)
        .ok_or_else(|| anyhow::anyhow!("Unknown operation: {}", tag))?;

    println!("{}", descriptor.name);
    println!("{}", "=".repeat(descriptor.name.len()));
    println!();
    println!("{}", descriptor.description);
    println!();
    println!("  {:10}  {}", "Category", descriptor.category.name());
    let arity = if descriptor.variadic {
        "variadic"
    } else {
        "fixed"
    };
    println!(
        "  {:10}  {} in, {} out ({})",
        "Arity", descriptor.inputs, descriptor.outputs, arity
    );
    println!();

    println!("  {:8}  {:8}  {}", "Port", "Channel", "Name");
    println!("  {:8}  {:8}  {}", "----", "-------", "----");
    for ch in 0..op.num_inputs() {
        println!(
            "  {:8}  {:8}  {}",
            "input",
            ch,
            op.input_name(ch).unwrap_or("-")
        );
    }
    for ch in 0..op.num_outputs() {
        println!(
            "  {:8}  {:8}  {}",
            "output",
            ch,
            op.output_name(ch).unwrap_or("-")
        );
    }

    Ok(())
}
