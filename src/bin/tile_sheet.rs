//! Contact sheet of many seeds for eyeballing generator changes
//! Renders each seed with random sides and lays the previews out on a grid

use std::error::Error;

use clap::Parser;
use log::warn;
use rayon::prelude::*;

use dungeon_tiles::geometry::Point;
use dungeon_tiles::raster::{self, RasterStyle};
use dungeon_tiles::seeds::TileSeeds;
use dungeon_tiles::sides::{generate_exit_configs, SideParams, TileAtlas};
use dungeon_tiles::{TileConfig, TileRenderer, TileStyle};

#[derive(Parser, Debug)]
#[command(name = "tile_sheet")]
#[command(about = "Render a labelled grid of tiles, one per seed")]
struct Args {
    /// First seed
    #[arg(long, default_value = "0")]
    start_seed: u64,

    /// Number of seeds to render
    #[arg(short, long, default_value = "12")]
    count: u64,

    /// Force a style for every tile
    #[arg(long)]
    style: Option<TileStyle>,

    /// Columns in the sheet
    #[arg(long, default_value = "4")]
    cols: usize,

    /// Preview scale relative to tile pixels
    #[arg(long, default_value = "0.5")]
    scale: f64,

    #[arg(short, long, default_value = "tile_sheet.png")]
    output: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let renderer = TileRenderer::new(TileConfig::default())?;
    let params = SideParams::default();
    let style = RasterStyle { scale: args.scale, ..Default::default() };

    println!("Rendering seeds {}..{}...", args.start_seed, args.start_seed + args.count);

    let images: Vec<(String, _)> = (args.start_seed..args.start_seed + args.count)
        .into_par_iter()
        .filter_map(|seed| {
            let seeds = TileSeeds::from_master(seed);
            let mut side_rng = seeds.sides_rng();
            let result = generate_exit_configs(Point::new(0, 0), &TileAtlas::new(), &renderer.config().edges, &params, &mut side_rng)
                .and_then(|exits| {
                    let tile_style = args.style.unwrap_or_else(|| TileStyle::random(&mut side_rng, params.prob_cavern));
                    renderer.render(&exits, tile_style, &mut seeds.geometry_rng())
                });

            match result {
                Ok(tile) => {
                    let label = format!("#{} {} x{}", seed, tile.style, tile.attempts);
                    Some((label, raster::rasterize(&tile, &style)))
                }
                Err(err) => {
                    warn!("seed {} skipped: {}", seed, err);
                    None
                }
            }
        })
        .collect();

    let sheet = raster::contact_sheet(&images, args.cols);
    raster::save_png(&sheet, &args.output)?;

    println!("Saved {} ({} of {} seeds)", args.output, images.len(), args.count);
    Ok(())
}
