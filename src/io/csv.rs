use crate::coord::{Crs, PlanarPoint, Projection};
use crate::error::Grid36Error;
use crate::geom::{parse_tile_points, polygon_to_geojson, polygon_to_wkt};
use crate::grid::Grid36;
use crate::tile::TileRecord;
use geo_types::Coord;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

enum SourceIndices {
    Geometry(usize),
    Coordinates { x_idx: usize, y_idx: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

#[derive(Debug, Clone)]
pub enum CoordinateSource {
    /// A single column containing WKT or GeoJSON geometry
    GeometryColumn(String),
    /// Separate X and Y coordinate columns (e.g., Longitude/Latitude or Easting/Northing)
    CoordinateColumns { x_column: String, y_column: String },
}

#[derive(Debug, Clone)]
pub struct CsvTileConfig {
    pub source: CoordinateSource,
    pub exclude_columns: Vec<String>,
    pub depth: u8,
    pub crs: Crs,
    pub include_tile_geometry: Option<GeometryFormat>,
}

impl CsvTileConfig {
    /// Create config for a CSV with a geometry column (WKT or GeoJSON).
    ///
    /// # Example
    /// ```
    /// use grid36_rs::CsvTileConfig;
    ///
    /// let config = CsvTileConfig::new("geometry", 6);
    /// ```
    pub fn new(geometry_column: impl Into<String>, depth: u8) -> Self {
        Self {
            source: CoordinateSource::GeometryColumn(geometry_column.into()),
            exclude_columns: Vec::new(),
            depth,
            crs: Crs::default(),
            include_tile_geometry: None,
        }
    }

    /// Create config for a CSV with separate X/Y coordinate columns.
    ///
    /// # Example
    /// ```
    /// use grid36_rs::{Crs, CsvTileConfig};
    ///
    /// let config = CsvTileConfig::from_coords("Longitude", "Latitude", 6).crs(Crs::Wgs84);
    /// let config = CsvTileConfig::from_coords("Easting", "Northing", 6).crs(Crs::Planar);
    /// ```
    pub fn from_coords(
        x_column: impl Into<String>,
        y_column: impl Into<String>,
        depth: u8,
    ) -> Self {
        Self {
            source: CoordinateSource::CoordinateColumns {
                x_column: x_column.into(),
                y_column: y_column.into(),
            },
            exclude_columns: Vec::new(),
            depth,
            crs: Crs::default(),
            include_tile_geometry: None,
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    pub fn crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    /// Include the tile outline in the output, in the input's coordinate system.
    pub fn with_tile_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_tile_geometry = Some(format);
        self
    }
}

pub trait CsvToTiles {
    fn to_tile_csv<P: Projection>(
        &self,
        output_path: impl AsRef<Path>,
        grid: &Grid36<P>,
        config: &CsvTileConfig,
    ) -> Result<(), Grid36Error>;
}

impl<T: AsRef<Path>> CsvToTiles for T {
    fn to_tile_csv<P: Projection>(
        &self,
        output_path: impl AsRef<Path>,
        grid: &Grid36<P>,
        config: &CsvTileConfig,
    ) -> Result<(), Grid36Error> {
        csv_to_tile_csv(self, output_path, grid, config)
    }
}

fn csv_err(e: impl ToString) -> Grid36Error {
    Grid36Error::Csv(e.to_string())
}

fn column_index(
    headers: &csv::StringRecord,
    name: &str,
    label: &str,
) -> Result<usize, Grid36Error> {
    if name.is_empty() {
        return Err(Grid36Error::Csv(format!("{} column name cannot be empty", label)));
    }
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Grid36Error::Csv(format!("{} column '{}' not found", label, name)))
}

fn encode_coord<P: Projection>(
    grid: &Grid36<P>,
    c: Coord<f64>,
    depth: u8,
    crs: Crs,
) -> Result<TileRecord, Grid36Error> {
    match crs {
        Crs::Wgs84 => grid.encode(&(c.x, c.y), depth),
        Crs::Planar => grid.encode_planar(&PlanarPoint::new(c.x, c.y), depth),
    }
}

fn tile_geometry<P: Projection>(
    grid: &Grid36<P>,
    tile: &TileRecord,
    crs: Crs,
    format: GeometryFormat,
) -> Result<String, Grid36Error> {
    let polygon = match crs {
        Crs::Wgs84 => tile.to_geo_polygon(grid.projection())?,
        Crs::Planar => tile.to_polygon(),
    };
    Ok(match format {
        GeometryFormat::Wkt => polygon_to_wkt(&polygon),
        GeometryFormat::GeoJson => polygon_to_geojson(&polygon),
    })
}

/// Converts a CSV file with geometry or coordinate columns to a CSV file with tile IDs.
///
/// Streams rows so large files never sit in memory. A row whose geometry
/// touches several tiles is written once per distinct tile.
///
/// # Example
///
/// ```no_run
/// use grid36_rs::{csv_to_tile_csv, Crs, CsvTileConfig, Grid36};
///
/// let grid = Grid36::australia().unwrap();
/// let config = CsvTileConfig::from_coords("Longitude", "Latitude", 6).crs(Crs::Wgs84);
///
/// csv_to_tile_csv("stations.csv", "stations_tiled.csv", &grid, &config).unwrap();
/// ```
pub fn csv_to_tile_csv<P: Projection>(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    grid: &Grid36<P>,
    config: &CsvTileConfig,
) -> Result<(), Grid36Error> {
    let file = File::open(csv_path).map_err(|e| Grid36Error::Io(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers().map_err(csv_err)?.clone();

    // Source columns are never passed through.
    let (source_indices, mut exclude_indices) = match &config.source {
        CoordinateSource::GeometryColumn(col) => {
            let idx = column_index(&headers, col, "Geometry")?;
            (SourceIndices::Geometry(idx), HashSet::from([idx]))
        }
        CoordinateSource::CoordinateColumns { x_column, y_column } => {
            let x_idx = column_index(&headers, x_column, "X")?;
            let y_idx = column_index(&headers, y_column, "Y")?;
            (
                SourceIndices::Coordinates { x_idx, y_idx },
                HashSet::from([x_idx, y_idx]),
            )
        }
    };

    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }

    let out_file = File::create(output_path).map_err(|e| Grid36Error::Io(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec!["tile_id"];
    if config.include_tile_geometry.is_some() {
        header_row.push("tile_geometry");
    }
    header_row.extend(
        headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !exclude_indices.contains(i))
            .map(|(_, h)| h),
    );
    writer.write_record(&header_row).map_err(csv_err)?;

    for result in reader.records() {
        let record = result.map_err(csv_err)?;

        let points: Vec<Coord<f64>> = match &source_indices {
            SourceIndices::Geometry(idx) => {
                let geom_str = record.get(*idx).ok_or_else(|| {
                    Grid36Error::Csv(format!("Missing geometry column at index {}", idx))
                })?;
                parse_tile_points(geom_str)?
            }
            SourceIndices::Coordinates { x_idx, y_idx } => {
                let x = parse_field(&record, *x_idx, "X")?;
                let y = parse_field(&record, *y_idx, "Y")?;
                vec![Coord { x, y }]
            }
        };

        let mut seen = HashSet::new();
        for point in points {
            let tile = encode_coord(grid, point, config.depth, config.crs)?;
            if !seen.insert(tile.id.clone()) {
                continue;
            }

            let mut row: Vec<String> = vec![tile.id.clone()];
            if let Some(format) = config.include_tile_geometry {
                row.push(tile_geometry(grid, &tile, config.crs, format)?);
            }
            row.extend(
                record
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !exclude_indices.contains(i))
                    .map(|(_, field)| field.to_string()),
            );
            writer.write_record(&row).map_err(csv_err)?;
        }
    }

    writer.flush().map_err(|e| Grid36Error::Io(e.to_string()))?;
    Ok(())
}

fn parse_field(record: &csv::StringRecord, idx: usize, label: &str) -> Result<f64, Grid36Error> {
    let raw = record
        .get(idx)
        .ok_or_else(|| Grid36Error::Csv(format!("Missing {} column at index {}", label, idx)))?
        .trim();
    raw.parse()
        .map_err(|_| Grid36Error::Csv(format!("Invalid {} coordinate: '{}'", label, raw)))
}
