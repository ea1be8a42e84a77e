use std::error::Error;
use std::fs;

use clap::Parser;
use rayon::prelude::*;

use dungeon_tiles::geometry::{Direction, Point};
use dungeon_tiles::raster::{self, RasterStyle};
use dungeon_tiles::seeds::TileSeeds;
use dungeon_tiles::sides::{generate_exit_configs, SideParams, TileAtlas};
use dungeon_tiles::{svg, ExitConfig, RenderedTile, TileConfig, TileRenderer, TileStyle};

#[derive(Parser, Debug)]
#[command(name = "tile_generator")]
#[command(about = "Generate dungeon tile walls from per-side exit configurations")]
struct Args {
    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Tile style: tunnel or cavern (random if not specified)
    #[arg(long)]
    style: Option<TileStyle>,

    /// Exit spec, repeatable: DIRECTION:EDGE[:blocked], e.g. "up:4" or "left:3:blocked".
    /// Sides are drawn at random when no exits are given.
    #[arg(short, long = "exit", value_parser = parse_exit)]
    exits: Vec<ExitConfig>,

    /// JSON file overriding the default tile configuration
    #[arg(short, long)]
    config: Option<String>,

    /// SVG output path
    #[arg(short, long, default_value = "tile.svg")]
    output: String,

    /// Write tile metadata (entity candidates, exit positions) as JSON
    #[arg(long)]
    json: Option<String>,

    /// Write a PNG preview
    #[arg(long)]
    png: Option<String>,

    /// Draw corridor cells, wall samples and entity candidates
    #[arg(long)]
    debug: bool,

    /// Probability of each side being blocked when sides are drawn
    #[arg(long, default_value = "0.2")]
    prob_blockage: f64,

    /// Probability of a cavern when the style is drawn
    #[arg(long, default_value = "0.3")]
    prob_cavern: f64,

    /// Render the (2r+1)x(2r+1) neighbourhood around the origin instead of one tile
    #[arg(long)]
    neighbourhood: Option<u32>,

    /// PNG output path for neighbourhood mode
    #[arg(long, default_value = "neighbourhood.png")]
    sheet: String,
}

fn parse_exit(s: &str) -> Result<ExitConfig, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let (direction, edge, blocked) = match parts.as_slice() {
        [d, e] => (d, e, false),
        [d, e, "blocked"] => (d, e, true),
        [d, e, "open"] => (d, e, false),
        _ => return Err(format!("expected DIRECTION:EDGE[:blocked], got '{}'", s)),
    };

    let direction: Direction = direction.parse()?;
    let edge_position: u32 = edge
        .parse()
        .map_err(|_| format!("edge position '{}' is not a positive number", edge))?;
    Ok(ExitConfig::new(direction, edge_position, blocked))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = match &args.config {
        Some(path) => TileConfig::load(path)?,
        None => TileConfig::default(),
    };
    let params = SideParams {
        prob_blockage: args.prob_blockage,
        prob_cavern: args.prob_cavern,
        ..Default::default()
    };

    println!("Generating with seed: {}", seed);
    println!("Tile size: {}x{} ({} px cells)", config.width, config.height, config.cell_size);

    let renderer = TileRenderer::new(config)?;
    match args.neighbourhood {
        Some(radius) => render_neighbourhood(&args, &renderer, &params, seed, radius as i32),
        None => render_single(&args, &renderer, &params, seed),
    }
}

fn render_single(args: &Args, renderer: &TileRenderer, params: &SideParams, seed: u64) -> Result<(), Box<dyn Error>> {
    let seeds = TileSeeds::from_master(seed);
    println!("{}", seeds);
    let mut side_rng = seeds.sides_rng();

    let exits = if args.exits.is_empty() {
        println!("Drawing random sides...");
        generate_exit_configs(Point::new(0, 0), &TileAtlas::new(), &renderer.config().edges, params, &mut side_rng)?
    } else {
        args.exits.clone()
    };
    let style = args
        .style
        .unwrap_or_else(|| TileStyle::random(&mut side_rng, params.prob_cavern));

    println!("Rendering {} tile...", style);
    for exit in &exits {
        println!(
            "  {:>5}: edge {}{}",
            exit.direction,
            exit.edge_position,
            if exit.is_blocked { " (blocked)" } else { "" }
        );
    }

    let mut geometry_rng = seeds.geometry_rng();
    let tile = renderer.render(&exits, style, &mut geometry_rng)?;
    report(&tile);

    svg::write_svg(&tile, &args.output, args.debug)?;
    println!("Saved {}", args.output);

    if let Some(path) = &args.json {
        fs::write(path, serde_json::to_string_pretty(&tile)?)?;
        println!("Saved {}", path);
    }
    if let Some(path) = &args.png {
        raster::save_png(&raster::rasterize(&tile, &RasterStyle::default()), path)?;
        println!("Saved {}", path);
    }

    Ok(())
}

fn render_neighbourhood(
    args: &Args,
    renderer: &TileRenderer,
    params: &SideParams,
    seed: u64,
    radius: i32,
) -> Result<(), Box<dyn Error>> {
    let side = (2 * radius + 1) as usize;
    println!("Planning {}x{} neighbourhood...", side, side);

    let mut atlas = TileAtlas::new();
    for y in (-radius..=radius).rev() {
        for x in -radius..=radius {
            let coord = Point::new(x, y);
            let mut rng = TileSeeds::for_tile(seed, coord).sides_rng();
            atlas.get_or_plan(coord, &renderer.config().edges, params, &mut rng)?;
        }
    }

    println!("Rendering {} tiles...", atlas.len());
    let coords = atlas.coords();
    let tiles: Vec<RenderedTile> = coords
        .par_iter()
        .map(|coord| {
            let entry = atlas.get(coord).ok_or_else(|| format!("tile {} was not planned", coord))?;
            let style = args.style.unwrap_or(entry.style);
            let mut rng = TileSeeds::for_tile(seed, *coord).geometry_rng();
            renderer
                .render(&entry.exits, style, &mut rng)
                .map_err(|e| format!("tile {}: {}", coord, e))
        })
        .collect::<Result<_, String>>()?;

    let retried = tiles.iter().filter(|t| t.attempts > 1).count();
    let caverns = tiles.iter().filter(|t| t.style == TileStyle::Cavern).count();
    println!("{} caverns, {} tunnels, {} needed retries", caverns, tiles.len() - caverns, retried);

    let style = RasterStyle { scale: 0.5, ..Default::default() };
    let images: Vec<_> = tiles.par_iter().map(|t| raster::rasterize(t, &style)).collect();
    raster::save_png(&raster::mosaic(&images, side), &args.sheet)?;
    println!("Saved {}", args.sheet);

    Ok(())
}

fn report(tile: &RenderedTile) {
    println!("Geometry accepted after {} attempt(s)", tile.attempts);
    println!("{} stub(s), {} entity candidate(s)", tile.stubs.len(), tile.entity_candidates.len());
    for (direction, point) in &tile.exit_positions {
        println!("  exit {:>5} ({}) at {}", direction, direction.to_nesw(), point);
    }
    for link in tile.floor_links() {
        println!("  floor link {}{}", link.direction, if link.is_blocked { " (blocked)" } else { "" });
    }
    if !tile.truncated_walks.is_empty() {
        println!("Warning: {} corridor walk(s) were truncated", tile.truncated_walks.len());
    }
}
