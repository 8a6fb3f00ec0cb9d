//! Plan an item: load a data directory, build the item's production tree and
//! apply one selection to a path.
//!
//! The data directory holds `planner.{ron,toml,json}` (optional) and one
//! directory per game version with `registry/` and
//! `data/minecraft/recipe/`.
//!
//! Run with:
//! `cargo run -p craftplan-data --example plan_item -- <data-dir> <item> [path] [item=source]`
//!
//! Set `RUST_LOG=craftplan_data=debug` for per-recipe diagnostics.

use craftplan_data::{discover_versions, extract, load_config, load_registry_set};
use craftplan_tree::{ProductionIndex, ProductionTree, build_tree, decode, encode, select_source_for_item};
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn print_tree(tree: &ProductionTree, indent: usize) {
    let pad = "  ".repeat(indent);
    match tree.stop {
        Some(stop) => println!("{pad}{} [{stop:?}]", tree.item.name()),
        None => println!("{pad}{} ({})", tree.item.name(), tree.item_id()),
    }
    for branch in &tree.branches {
        println!(
            "{pad}  > {} ({} distinct, all base: {})",
            branch.key, branch.score.distinct_requirements, branch.score.all_base
        );
        for child in &branch.requirements {
            print_tree(child, indent + 2);
        }
    }
    if tree.more_available > 0 {
        println!("{pad}  ... {} more", tree.more_available);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("craftplan_data=info".parse()?))
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(base), Some(item)) = (args.next(), args.next()) else {
        eprintln!("usage: plan_item <data-dir> <item> [path] [item=source]");
        std::process::exit(2);
    };
    let base = PathBuf::from(base);
    let current = args.next().and_then(|raw| decode(&raw));
    let selection = args.next();

    // --- Load ---

    let config = load_config(&base)?;
    let versions = discover_versions(&base)?;
    let registries = load_registry_set(&base, &versions)?;
    let Some(version) = config.active_version(&registries) else {
        eprintln!("no registry found under {}", base.display());
        std::process::exit(1);
    };
    let Some(registry) = registries.get(&version) else {
        eprintln!("registry for {version} disappeared");
        std::process::exit(1);
    };

    let sources = extract(registry, &version, &base, &config.layout())?;
    let index = ProductionIndex::new(sources);
    println!("{version}: {} sources for {} items", index.len(), index.item_count());

    // --- Tree ---

    let tree = build_tree(&index, &item, config.limits);
    print_tree(&tree, 0);

    // --- Path ---

    let path = match selection.as_deref().and_then(|s| s.split_once('=')) {
        Some((target, source)) => Some(select_source_for_item(current, target, source)),
        None => current,
    };
    if let Some(path) = path {
        println!("path: {}", encode(&path));
        println!(
            "decisions: {}, complete: {}",
            path.count_decisions(),
            path.is_complete_against(&tree)
        );
    }

    Ok(())
}
