//! Pixel Slots Build Tasks
//!
//! Usage:
//!   cargo xtask test            - Run all tests
//!   cargo xtask wasm            - Build the browser package with wasm-pack
//!   cargo xtask check           - Clippy + rustfmt

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask", about = "Pixel Slots build tasks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all tests
    Test {
        /// Run only the game core tests
        #[arg(long)]
        core: bool,
    },
    /// Build the WASM package for the web front-end
    Wasm {
        /// Build in release mode
        #[arg(short, long)]
        release: bool,
        /// Output directory for the generated package
        #[arg(short, long, default_value = "web/pkg")]
        out_dir: String,
    },
    /// Check code quality
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let project_root = project_root()?;

    match cli.command {
        Commands::Test { core } => run_tests(&project_root, core),
        Commands::Wasm { release, out_dir } => build_wasm(&project_root, release, &out_dir),
        Commands::Check => check_quality(&project_root),
    }
}

fn project_root() -> Result<PathBuf> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR")
        .context("CARGO_MANIFEST_DIR not set")?;

    Ok(Path::new(&manifest_dir)
        .parent()
        .context("Failed to get parent directory")?
        .to_path_buf())
}

fn cargo(root: &Path, args: &[&str], what: &str) -> Result<bool> {
    let status = Command::new("cargo")
        .current_dir(root)
        .args(args)
        .status()
        .with_context(|| format!("Failed to run {}", what))?;
    Ok(status.success())
}

fn run_tests(root: &Path, core_only: bool) -> Result<()> {
    println!("🧪 Running tests...\n");

    let mut args = vec!["test"];
    if core_only {
        args.extend(["--package", "ps-core"]);
    } else {
        args.push("--workspace");
    }

    if !cargo(root, &args, "tests")? {
        bail!("Tests failed");
    }

    println!("\n✅ All tests passed!");
    Ok(())
}

fn build_wasm(root: &Path, release: bool, out_dir: &str) -> Result<()> {
    println!("🕸️  Building WASM package...\n");

    let profile = if release { "--release" } else { "--dev" };
    let out_dir = root.join(out_dir);
    let out_dir = out_dir.to_str().context("Output path is not valid UTF-8")?;

    let status = Command::new("wasm-pack")
        .current_dir(root.join("crates").join("ps-wasm"))
        .args(["build", profile, "--target", "web", "--out-dir", out_dir])
        .status()
        .context("Failed to run wasm-pack (is it installed?)")?;

    if !status.success() {
        bail!("WASM build failed");
    }

    println!("\n✅ WASM package written to {}", out_dir);
    Ok(())
}

fn check_quality(root: &Path) -> Result<()> {
    println!("🔍 Checking code quality...\n");

    println!("Running clippy...");
    if !cargo(root, &["clippy", "--workspace", "--", "-D", "warnings"], "clippy")? {
        bail!("Clippy found issues");
    }

    println!("\nChecking formatting...");
    if !cargo(root, &["fmt", "--all", "--check"], "rustfmt")? {
        println!("⚠️  Formatting issues found. Run 'cargo fmt' to fix.");
    }

    println!("\n✅ Code quality check complete!");
    Ok(())
}
