use crate::error::Grid36Error;
use crate::index::constants::{MAX_DEPTH, POW6, SYMBOL_DIGITS, SYMBOL_GRID};
use crate::index::indexing::{TileIndex, validate_depth};

/// Generates the tile ID of the depth-`depth` tile containing full-resolution cell `(i, j)`.
///
/// Each character encodes one base-6 digit of the column and row, most
/// significant first: digit `k` of `i` picks the symbol-grid column and digit
/// `k` of `j` picks the row counted from the bottom.
///
/// # Example
/// ```
/// use grid36_rs::generate_tile_identifier;
///
/// let id = generate_tile_identifier(0, 0, 3).unwrap();
/// assert_eq!(id, "000");
/// ```
pub fn generate_tile_identifier(i: i64, j: i64, depth: u8) -> Result<String, Grid36Error> {
    let depth = validate_depth(depth)?;

    let mut id = String::with_capacity(depth as usize);
    for k in ((MAX_DEPTH - depth)..MAX_DEPTH).rev() {
        let power = POW6[k as usize];
        let di = ((i / power) % 6).clamp(0, 5) as usize;
        let dj = ((j / power) % 6).clamp(0, 5) as usize;
        id.push(SYMBOL_GRID[5 - dj][di]);
    }
    Ok(id)
}

/// Decodes a tile ID into its tile index.
///
/// Lower-case symbols are accepted. The reserved reference ID is not special
/// here; callers that care check for it first.
///
/// # Errors
///
/// - [`Grid36Error::InvalidTileId`] - Empty, longer than 9 characters, or a symbol
///   outside the 36-character alphabet
pub fn decode_tile_identifier(id: &str) -> Result<TileIndex, Grid36Error> {
    let depth = check_length(id)?;

    let mut col = 0i64;
    let mut row = 0i64;
    for c in id.chars() {
        let (di, dj) = symbol_digits(c).ok_or_else(|| {
            Grid36Error::invalid_id(id, format!("unknown symbol '{}'", c))
        })?;
        col = col * 6 + di as i64;
        row = row * 6 + dj as i64;
    }

    Ok(TileIndex { col, row, depth })
}

/// Validates `id` and returns its canonical upper-case form.
pub fn normalize_tile_identifier(id: &str) -> Result<String, Grid36Error> {
    check_length(id)?;
    if let Some(bad) = id.chars().find(|c| symbol_digits(*c).is_none()) {
        return Err(Grid36Error::invalid_id(
            id,
            format!("unknown symbol '{}'", bad),
        ));
    }
    Ok(id.to_ascii_uppercase())
}

/// Tile ID of an already-resolved tile index.
pub fn tile_index_to_identifier(tile: &TileIndex) -> Result<String, Grid36Error> {
    let (i, j) = tile.origin();
    generate_tile_identifier(i, j, tile.depth)
}

fn symbol_digits(c: char) -> Option<(u8, u8)> {
    if !c.is_ascii() {
        return None;
    }
    SYMBOL_DIGITS[c.to_ascii_uppercase() as usize]
}

fn check_length(id: &str) -> Result<u8, Grid36Error> {
    let len = id.chars().count();
    if len == 0 {
        return Err(Grid36Error::invalid_id(id, "empty identifier"));
    }
    if len > MAX_DEPTH as usize {
        return Err(Grid36Error::invalid_id(
            id,
            format!("length {} exceeds {}", len, MAX_DEPTH),
        ));
    }
    Ok(len as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::constants::FULL_RESOLUTION;

    #[test]
    fn test_generate_and_decode_identifier() -> Result<(), Grid36Error> {
        let id = generate_tile_identifier(6589418, 4081479, 9)?;
        assert_eq!(id, "FHKDX9REL");

        let tile = decode_tile_identifier(&id)?;
        assert_eq!(tile.origin(), (6589418, 4081479));
        assert_eq!(tile.depth, 9);
        Ok(())
    }

    #[test]
    fn test_prefixes_match_shallower_depths() -> Result<(), Grid36Error> {
        let full = generate_tile_identifier(6799829, 4210098, 9)?;
        assert_eq!(full, "GN17EJ7B5");
        for depth in 1..=9u8 {
            let id = generate_tile_identifier(6799829, 4210098, depth)?;
            assert_eq!(id, full[..depth as usize]);
        }
        Ok(())
    }

    #[test]
    fn test_corners() -> Result<(), Grid36Error> {
        let last = FULL_RESOLUTION - 1;
        assert_eq!(generate_tile_identifier(0, 0, 2)?, "00");
        assert_eq!(generate_tile_identifier(last, 0, 2)?, "55");
        assert_eq!(generate_tile_identifier(0, last, 2)?, "ZZ");
        assert_eq!(generate_tile_identifier(last, last, 2)?, "UU");
        Ok(())
    }

    #[test]
    fn test_decode_depth_one() -> Result<(), Grid36Error> {
        let tile = decode_tile_identifier("K")?;
        assert_eq!((tile.col, tile.row, tile.depth), (3, 3, 1));
        assert_eq!(tile.origin(), (5038848, 5038848));
        Ok(())
    }

    #[test]
    fn test_lower_case_accepted() -> Result<(), Grid36Error> {
        assert_eq!(decode_tile_identifier("gn17e")?, decode_tile_identifier("GN17E")?);
        assert_eq!(normalize_tile_identifier("gn17e")?, "GN17E");
        Ok(())
    }

    #[test]
    fn test_invalid_identifiers() {
        for bad in ["", "0123456789", "AB-C", "ÄB", "A B"] {
            assert!(
                matches!(
                    decode_tile_identifier(bad),
                    Err(Grid36Error::InvalidTileId { .. })
                ),
                "expected {:?} to be rejected",
                bad
            );
            assert!(normalize_tile_identifier(bad).is_err());
        }
    }

    #[test]
    fn test_invalid_depth() {
        assert_eq!(
            generate_tile_identifier(0, 0, 0),
            Err(Grid36Error::InvalidDepth(0))
        );
        assert_eq!(
            generate_tile_identifier(0, 0, 10),
            Err(Grid36Error::InvalidDepth(10))
        );
    }

    #[test]
    fn test_tile_index_roundtrip() -> Result<(), Grid36Error> {
        let tile = TileIndex::new(123, 45, 4)?;
        let id = tile_index_to_identifier(&tile)?;
        assert_eq!(id.len(), 4);
        assert_eq!(decode_tile_identifier(&id)?, tile);
        Ok(())
    }
}
