use grid36_rs::{Grid36, Grid36Error};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Grid36Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let lon = 149.13;
    let lat = -35.28;

    let grid = Grid36::australia()?;
    let tile = grid.encode(&(lon, lat), 9)?;

    println!("Tile ID: {}", tile.id);
    println!("Centroid: ({}, {})", tile.easting(), tile.northing());
    println!("Origin index: {:?}", tile.origin_index);
    println!("Parent at depth 4: {}", grid.adjust_depth(&tile.id, 4)?);

    let json = serde_json::to_string_pretty(&tile).map_err(|e| Grid36Error::Config(e.to_string()))?;
    println!("{}", json);

    let feature = tile.to_geojson_feature(grid.projection())?;
    println!("{}", feature);

    Ok(())
}
