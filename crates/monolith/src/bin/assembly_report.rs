//! # Assembly Report
//!
//! Headless walkthrough of the detection engine: builds a few sample
//! structures block by block, then prints every live cluster and the event
//! stream a subscriber would see.
//!
//! ```bash
//! # Built-in limits
//! ./assembly_report
//!
//! # Limits from a file
//! ./assembly_report data/schemas/multiblock/structures.toml
//! ```

use monolith::core::{Bounds, Coord};
use monolith::multiblock::block::storage;
use monolith::{BlockKind, ClusterEvent, MultiblockWorld, Outcome, StructureConfig};

/// Places every cell of `bounds`, choosing each kind with `kind_at`.
fn build<F>(world: &mut MultiblockWorld, label: &str, bounds: Bounds, kind_at: F)
where
    F: Fn(Coord) -> BlockKind,
{
    println!("▶ {label} {bounds}");
    let mut last = None;
    for at in bounds.cells() {
        for (seed, outcome) in world.place(at, kind_at(at)) {
            if seed == at {
                last = Some(outcome);
            }
        }
    }

    match last {
        Some(Outcome::Formed { cluster, created, .. }) => {
            println!("   ✓ formed cluster {cluster} (new: {created})");
        }
        Some(Outcome::Disconnected { stage, reason, .. }) => {
            println!("   ✗ not formed after {stage:?}: {reason}");
        }
        Some(other) => println!("   · {other:?}"),
        None => println!("   · no pass ran"),
    }
}

fn main() {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    MONOLITH ASSEMBLY REPORT");
    println!("═══════════════════════════════════════════════════════════════════");
    println!();

    let config = match std::env::args().nth(1) {
        Some(path) => match StructureConfig::load(&path) {
            Ok(config) => {
                println!("⚙ Limits loaded from {path}");
                config
            }
            Err(e) => {
                eprintln!("✗ FATAL: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("⚙ Built-in limits");
            StructureConfig::default()
        }
    };
    println!();

    let mut world = MultiblockWorld::new(&config);
    let events = world.subscribe(4096);

    // === CRAFTING COMPLEX ===
    let origin = Coord::ORIGIN;
    build(
        &mut world,
        "crafting complex",
        Bounds::new(origin, Coord::new(2, 2, 2)),
        |at| {
            if at == origin {
                BlockKind::CraftingStorage { bytes: storage::TIER_16K }
            } else {
                BlockKind::CraftingUnit
            }
        },
    );

    // === QUANTUM BRIDGE ===
    let centre = Coord::new(11, 0, 1);
    build(
        &mut world,
        "quantum bridge",
        Bounds::new(Coord::new(10, 0, 0), Coord::new(12, 0, 2)),
        |at| {
            if at == centre {
                BlockKind::QuantumLink
            } else {
                BlockKind::QuantumRing
            }
        },
    );

    // === SPATIAL PYLON ===
    build(
        &mut world,
        "spatial pylon",
        Bounds::new(Coord::new(20, 0, 0), Coord::new(20, 7, 0)),
        |_| BlockKind::SpatialPylon,
    );

    // === NO STORAGE: must not form ===
    build(
        &mut world,
        "storage-less complex",
        Bounds::new(Coord::new(30, 0, 0), Coord::new(31, 1, 1)),
        |_| BlockKind::CraftingUnit,
    );

    // === DAMAGE ===
    println!("▶ removing {} from the crafting complex", Coord::new(1, 1, 1));
    world.remove(Coord::new(1, 1, 1));
    println!();

    println!("═══════════════════════════════════════════════════════════════════");
    println!("  LIVE CLUSTERS");
    println!("═══════════════════════════════════════════════════════════════════");
    for (id, cluster) in world.clusters() {
        let status = cluster.status();
        println!(
            "  {id:<8} {:<18} {:<22} members={:<4} active={} capacity={}",
            cluster.kind(),
            cluster.bounds(),
            cluster.members().len(),
            status.active,
            status.capacity
        );
    }
    println!();

    let stats = world.registry().stats();
    let status_changes = events
        .drain()
        .iter()
        .filter(|event| matches!(event, ClusterEvent::StatusChanged { .. }))
        .count();
    println!("  published: {}", stats.published);
    println!("  retired:   {}", stats.retired);
    println!("  live:      {}", stats.live);
    println!("  status recomputes: {status_changes}");
}
