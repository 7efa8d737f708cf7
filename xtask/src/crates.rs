use std::process::Command;

use anyhow::{Context, Result};

/// Workspace crates in dependency order.
const WORKSPACE_CRATES: &[&str] = &["prepdesk-domain", "prepdesk-core", "prepdesk-infra", "prepdesk-cli"];

/// Check that every crate compiles with only its own declared dependencies.
///
/// Catches features that only resolve because a sibling crate enabled them
/// in the unified workspace build.
pub fn check_each_crate() -> Result<()> {
    println!("Checking {} workspace crates in isolation...", WORKSPACE_CRATES.len());

    for (index, name) in WORKSPACE_CRATES.iter().enumerate() {
        println!("\n[{}/{}] cargo check -p {name} --all-targets", index + 1, WORKSPACE_CRATES.len());

        let status = Command::new("cargo")
            .args(["check", "-p", name, "--all-targets"])
            .status()
            .with_context(|| format!("Failed to run cargo check for '{name}'"))?;

        if !status.success() {
            anyhow::bail!("Crate '{name}' failed to compile on its own");
        }

        println!("✅ {name} compiled successfully");
    }

    println!("\n✅ All {} crates compile in isolation!", WORKSPACE_CRATES.len());

    Ok(())
}
