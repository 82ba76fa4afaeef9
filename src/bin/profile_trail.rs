//! Profiling tool to identify performance bottlenecks

use std::time::Instant;

use tracing_subscriber::EnvFilter;

use sector_generator::aggregate::aggregate;
use sector_generator::map_export::{render_sector, ExportOptions};
use sector_generator::quantize::quantize_sector;
use sector_generator::rng::LcgRng;
use sector_generator::sector::compose_sector;
use sector_generator::trail::{self, TrailParams, TrailPreset};
use sector_generator::SectorConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let seed = 1337u32;
    let config = SectorConfig::with_seed(seed);
    let layout = config.layout();

    println!("=== Performance Profiling ===");
    println!(
        "Sector: {}x{} hexes ({} subsectors)",
        layout.cols(),
        layout.rows(),
        layout.subsector_count()
    );
    println!();

    // Single subsector, per preset
    println!("Single subsector ({}x{} hexes):", layout.sub_cols, layout.sub_rows);
    for &preset in TrailPreset::all() {
        let params = TrailParams::from_preset(preset);
        let mut rng = LcgRng::new(seed);
        let start = Instant::now();
        let run = trail::simulate(layout.sub_cols, layout.sub_rows, &params, &mut rng);
        let elapsed = start.elapsed();
        println!(
            "  {:<8} {:>5} agents x {:>4} iterations on {}x{} field: {:?}",
            preset.to_string(),
            params.agent_count,
            params.iterations,
            run.width(),
            run.height(),
            elapsed
        );
    }
    println!();

    let params = config.trail_params();
    let mut rng = LcgRng::new(seed);

    // Profile one simulation + aggregation
    let start = Instant::now();
    let run = trail::simulate(layout.sub_cols, layout.sub_rows, &params, &mut rng);
    let sim_time = start.elapsed();
    println!("Trail simulation: {:?}", sim_time);
    println!("  Steps: {}", run.stats.steps_taken);
    println!(
        "  Turns: {} straight, {} left, {} right, {} random",
        run.stats.straight_turns,
        run.stats.left_turns,
        run.stats.right_turns,
        run.stats.random_turns
    );
    println!("  Reflections: {}", run.stats.reflections);
    println!(
        "  Deposited: {:.1}, final mass: {:.1}",
        run.stats.total_deposited, run.stats.final_mass
    );

    let start = Instant::now();
    let _cells = aggregate(&run.field, layout.sub_cols, layout.sub_rows);
    let aggregate_time = start.elapsed();
    println!("Aggregation: {:?}", aggregate_time);

    // Profile the full sector (the big one)
    rng.set_seed(seed);
    let start = Instant::now();
    let (grid, stats) = compose_sector(&layout, &params, &mut rng);
    let compose_time = start.elapsed();
    println!("Full sector composition: {:?}", compose_time);
    println!("  Agent steps: {}", stats.total_steps());

    let start = Instant::now();
    let levels = quantize_sector(&grid, &config.quantizer(), config.normalization);
    let quantize_time = start.elapsed();
    println!("Quantization: {:?} ({} hexes)", quantize_time, levels.len());

    let start = Instant::now();
    let mut ctx = match sector_generator::GenerationContext::new(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            return;
        }
    };
    let snapshot = ctx.snapshot();
    let snapshot_time = start.elapsed();
    println!("Context + snapshot: {:?} ({} worlds)", snapshot_time, snapshot.worlds().count());

    let start = Instant::now();
    let img = render_sector(&snapshot, &ExportOptions::default());
    let render_time = start.elapsed();
    println!("PNG rasterization: {:?} ({}x{})", render_time, img.width(), img.height());

    // Summary
    let total =
        sim_time + aggregate_time + compose_time + quantize_time + snapshot_time + render_time;
    let pct =
        |d: std::time::Duration| 100.0 * d.as_secs_f64() / total.as_secs_f64().max(f64::EPSILON);
    println!("\n=== Summary ===");
    println!("Simulation:   {:>8.2}% ({:?})", pct(sim_time), sim_time);
    println!("Aggregation:  {:>8.2}% ({:?})", pct(aggregate_time), aggregate_time);
    println!("Composition:  {:>8.2}% ({:?})", pct(compose_time), compose_time);
    println!("Quantization: {:>8.2}% ({:?})", pct(quantize_time), quantize_time);
    println!("Snapshot:     {:>8.2}% ({:?})", pct(snapshot_time), snapshot_time);
    println!("Render:       {:>8.2}% ({:?})", pct(render_time), render_time);
    println!("─────────────────────────────────");
    println!("TOTAL:        {:>8}  {:?}", "100%", total);
}
