use std::error::Error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sector_generator::ascii::{self, AsciiMode};
use sector_generator::export::{self, SectorDocument};
use sector_generator::grid_export::{self, GridExportConfig};
use sector_generator::map_export::{self, ExportOptions};
use sector_generator::quantize::{level_histogram, NormalizationScope};
use sector_generator::trail::TrailPreset;
use sector_generator::{GenerationContext, SectorConfig};

#[derive(Parser, Debug)]
#[command(name = "sector_generator")]
#[command(about = "Generate hex star sectors from slime-mould trail simulations")]
struct Args {
    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Share code to reproduce a sector (overrides seed and display options)
    #[arg(short, long)]
    code: Option<String>,

    /// Trail preset: sparse, normal, dense, fine
    #[arg(short, long)]
    preset: Option<TrailPreset>,

    /// Number of display levels (2-16)
    #[arg(short, long, default_value = "8")]
    levels: u8,

    /// Normalization bias (> 0; above 1 brightens, below 1 darkens)
    #[arg(long, default_value = "1.0")]
    saturate: f64,

    /// Minimum level + 1 for a hex to hold a world
    #[arg(short, long, default_value = "6")]
    threshold: u8,

    /// Agents per subsector simulation
    #[arg(short, long)]
    agents: Option<usize>,

    /// Iterations per subsector simulation
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Simulation scale (sensor distance, step size and rotation)
    #[arg(long)]
    scale: Option<f64>,

    /// Hex columns per subsector
    #[arg(long, default_value = "8")]
    sub_cols: usize,

    /// Hex rows per subsector
    #[arg(long, default_value = "10")]
    sub_rows: usize,

    /// Subsector columns in the sector
    #[arg(long, default_value = "4")]
    sector_cols: usize,

    /// Subsector rows in the sector
    #[arg(long, default_value = "4")]
    sector_rows: usize,

    /// Normalize across the whole sector instead of per subsector
    #[arg(long)]
    sector_normalize: bool,

    /// Skip world generation
    #[arg(long)]
    no_worlds: bool,

    /// Print the ASCII map to stdout
    #[arg(long)]
    ascii: bool,

    /// Use ANSI colours for the ASCII map
    #[arg(long)]
    color: bool,

    /// Export the sector map to PNG (specify output path)
    #[arg(long)]
    export_png: Option<String>,

    /// Scale factor for PNG export
    #[arg(long, default_value = "1.0")]
    export_scale: f32,

    /// Export the sector to JSON (specify output path)
    #[arg(long)]
    export_json: Option<String>,

    /// Include raw per-hex intensities in the JSON export
    #[arg(long)]
    json_intensities: bool,

    /// Export the sector to a text file (e.g., "sector.txt")
    #[arg(long)]
    export_text: Option<String>,

    /// Export a levels x saturate comparison grid (specify output path)
    #[arg(long)]
    compare_levels: Option<String>,

    /// Export a trail preset comparison grid (specify output path)
    #[arg(long)]
    compare_presets: Option<String>,
}

fn build_config(args: &Args) -> Result<SectorConfig, Box<dyn Error>> {
    if let Some(code) = &args.code {
        let mut config = SectorConfig::from_share_code(code)?;
        config.sub_cols = args.sub_cols;
        config.sub_rows = args.sub_rows;
        config.normalization = scope(args);
        config.generate_worlds = !args.no_worlds;
        return Ok(config);
    }

    let mut config = SectorConfig {
        seed: args.seed.unwrap_or_else(rand::random),
        levels: args.levels,
        saturate_factor: args.saturate,
        presence_threshold: args.threshold,
        sub_cols: args.sub_cols,
        sub_rows: args.sub_rows,
        sub_sector_cols: args.sector_cols,
        sub_sector_rows: args.sector_rows,
        normalization: scope(args),
        generate_worlds: !args.no_worlds,
        ..Default::default()
    };
    if let Some(preset) = args.preset {
        config = config.with_preset(preset);
    }
    if let Some(agents) = args.agents {
        config.agent_count = agents;
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if let Some(scale) = args.scale {
        config.simulation_scale = scale;
    }
    Ok(config)
}

fn scope(args: &Args) -> NormalizationScope {
    if args.sector_normalize {
        NormalizationScope::Sector
    } else {
        NormalizationScope::Subsector
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    println!("Generating sector with seed: {}", config.seed);
    let layout = config.layout();
    println!(
        "Sector size: {}x{} hexes ({}x{} subsectors of {}x{})",
        layout.cols(),
        layout.rows(),
        layout.sub_sector_cols,
        layout.sub_sector_rows,
        layout.sub_cols,
        layout.sub_rows,
    );
    println!(
        "Trail: {} agents, {} iterations, scale {}",
        config.agent_count, config.iterations, config.simulation_scale
    );

    // Simulate every subsector
    println!("Running trail simulations...");
    let mut ctx = GenerationContext::new(config)?;
    let stats = ctx.stats();
    println!(
        "Simulated {} subsectors ({} agent steps)",
        stats.subsectors.len(),
        stats.total_steps()
    );

    // Quantize and roll worlds
    println!(
        "Quantizing to {} levels (saturate {}, threshold {}, {} normalization)...",
        ctx.config().levels,
        ctx.config().saturate_factor,
        ctx.config().presence_threshold,
        ctx.config().normalization,
    );
    let snapshot = ctx.snapshot();
    let levels: Vec<u8> = snapshot.cells.iter().map(|c| c.level).collect();
    let histogram = level_histogram(&levels, snapshot.levels);
    println!("Level distribution: {:?}", histogram);
    println!(
        "Occupied hexes: {} ({:.1}%), worlds generated: {}",
        snapshot.present_count(),
        100.0 * snapshot.present_count() as f64 / snapshot.cells.len().max(1) as f64,
        snapshot.worlds().count()
    );
    println!("Share code: {}", snapshot.share_code);

    if args.ascii {
        println!();
        if args.color {
            ascii::print_colored_ascii_sector(&snapshot, AsciiMode::Levels);
        } else {
            ascii::print_ascii_sector(&snapshot, AsciiMode::Levels);
        }
        println!();
        print!("{}", ascii::world_listing(&snapshot));
    }

    if let Some(path) = &args.export_png {
        let options = ExportOptions {
            scale: args.export_scale,
            ..Default::default()
        };
        let (w, h) = map_export::export_sector_png(&snapshot, &options, path)?;
        println!("Exported sector map ({}x{}) to {}", w, h, path);
    }

    if let Some(path) = &args.export_json {
        let mut document = SectorDocument::from_snapshot(&snapshot).with_config(ctx.config());
        if args.json_intensities {
            document = document.with_intensities(ctx.grid());
        }
        export::export_sector_json(&document, path)?;
        println!("Exported sector JSON to {}", path);
    }

    if let Some(path) = &args.export_text {
        ascii::export_sector_file(&snapshot, path)?;
        println!("Exported sector file to {}", path);
    }

    if let Some(path) = &args.compare_levels {
        grid_export::export_levels_grid(&mut ctx, &GridExportConfig::default(), path)?;
    }

    if let Some(path) = &args.compare_presets {
        grid_export::export_preset_grid(ctx.config(), &GridExportConfig::default(), path)?;
    }

    Ok(())
}
