use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use paint_by_numbers_wasm::pipeline::DEFAULT_MAX_WIDTH;
use paint_by_numbers_wasm::{
    PaletteOrder, PipelineConfig, Placement, QuantizeOptions, RegionOptions, RenderOptions,
    RenderStyle, color, rng_from_seed, run_bytes,
};
use serde_json::json;
use std::fs;
use std::path::PathBuf;

/// Turn images into paint-by-numbers artworks.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of paint colors
    #[arg(short = 'k', long, default_value_t = 8)]
    n_colors: usize,

    /// Canvas style: filled, outline or grayscale
    #[arg(short, long, default_value = "filled")]
    style: RenderStyle,

    /// Paint number order: clustered or brightness (darkest = 1)
    #[arg(long, default_value = "clustered")]
    order: PaletteOrder,

    /// Seed for the palette clustering; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Downscale wider images to this width (0 keeps the input size)
    #[arg(long, default_value_t = DEFAULT_MAX_WIDTH)]
    max_width: u32,

    /// k-means rounds
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Maximum number of pixels sampled for clustering
    #[arg(long, default_value_t = 10_000)]
    sample_cap: usize,

    /// Regions must be larger than this many pixels to get a number
    #[arg(long, default_value_t = 100)]
    min_region: usize,

    /// Place numbers at region centroids instead of grid seed points
    #[arg(long)]
    centroid: bool,

    /// Skip the number overlay
    #[arg(long)]
    no_numbers: bool,

    /// Also write the (fitted) original next to the artwork
    #[arg(long)]
    with_original: bool,

    /// Write the legend as JSON next to each artwork
    #[arg(long)]
    legend: bool,

    /// Output directory
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Output filename prefix (ignored when --out-dir supplied)
    #[arg(short = 'p', long, default_value = "pbn_")]
    prefix: String,
}

impl Args {
    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            palette_size: self.n_colors,
            max_width: (self.max_width > 0).then_some(self.max_width),
            quantize: QuantizeOptions {
                sample_cap: self.sample_cap,
                iterations: self.iterations,
            },
            order: self.order,
            regions: RegionOptions {
                min_region_size: self.min_region,
                placement: if self.centroid {
                    Placement::Centroid
                } else {
                    Placement::Seed
                },
                ..RegionOptions::default()
            },
            render: RenderOptions {
                style: self.style,
                numbers: !self.no_numbers,
                ..RenderOptions::default()
            },
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.config();
    let mut rng = rng_from_seed(args.seed);

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let art = run_bytes(&bytes, &config, &mut rng)
            .with_context(|| format!("processing {} failed", input.display()))?;

        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        let out_path = match &args.out_dir {
            Some(dir) => dir.join(format!("{stem}.png")),
            None => PathBuf::from(format!("{}{stem}.png", args.prefix)),
        };
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        art.save_png(&out_path)
            .with_context(|| format!("writing {}", out_path.display()))?;
        println!("Saved → {}", out_path.display());

        if args.with_original {
            let path = out_path.with_extension("original.png");
            fs::write(&path, art.original_png()?)?;
            info!("original written to {}", path.display());
        }

        if args.legend {
            let entries: Vec<_> = art
                .legend()
                .into_iter()
                .map(|(number, c)| json!({ "number": number, "color": color::to_hex(c) }))
                .collect();
            let doc = json!({
                "width": art.width(),
                "height": art.height(),
                "regions": art.regions.len(),
                "palette": entries,
            });
            let path = out_path.with_extension("json");
            fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
            info!("legend written to {}", path.display());
        }
    }

    Ok(())
}
