use anyhow::{Context, Result};
use jigsaw::helpers;
use jigsaw::{
    assemble, build_adjacency, corner_product, find_corners, find_pattern, mark_pattern,
    parse_tiles, Pattern,
};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

fn multiply_corner_tile_ids(s: &str) -> Result<u64> {
    let tiles = parse_tiles(s)?;
    let graph = build_adjacency(&tiles)?;
    log::info!(
        "{} tiles, {} shared borders",
        tiles.len(),
        graph.shared_border_count()
    );
    let corners = find_corners(&graph);
    let product = corner_product(&corners)?;
    Ok(product)
}

fn check_water_roughness(s: &str) -> Result<usize> {
    let tiles = parse_tiles(s)?;
    let graph = build_adjacency(&tiles)?;
    let corners = find_corners(&graph);
    let assembly = assemble(&tiles, &graph, &corners)?;
    log::info!("Tile layout:\n{}", assembly.display_ids());
    log::debug!("Corner tiles in place: {:?}", assembly.corner_ids());

    let image = assembly.to_pixels();
    let monster = Pattern::sea_monster();
    if let Some(matches) = find_pattern(&image, monster) {
        log::info!("Sea monsters:\n{}", mark_pattern(&image, monster, &matches));
    }
    let roughness = jigsaw::count_unmatched_set_pixels(&image, monster)?;
    Ok(roughness)
}

fn solve_p1() -> Result<()> {
    let input = helpers::get_data_from_file_res("d20").context("Coudn't read file contents.")?;
    let result = multiply_corner_tile_ids(&input)?;
    println!("The multiplication of the 4 corner tile ids is: {}", result);
    Ok(())
}

fn solve_p2() -> Result<()> {
    let input = helpers::get_data_from_file_res("d20").context("Coudn't read file contents.")?;
    let result = check_water_roughness(&input)?;
    println!("Water roughness is: {}", result);
    Ok(())
}

fn init_logging() {
    let level = std::env::var("JIGSAW_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Warn);
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto).ok();
}

fn main() -> Result<()> {
    init_logging();
    solve_p1()?;
    solve_p2()?;
    Ok(())
}
