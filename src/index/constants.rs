/// Each depth level splits a tile into SUBDIVISION x SUBDIVISION children
pub const SUBDIVISION: i64 = 6;

/// Shallowest valid depth
pub const MIN_DEPTH: u8 = 1;

/// Deepest valid depth, one full-resolution unit per tile
pub const MAX_DEPTH: u8 = 9;

/// Powers of six for depths 0-9
pub const POW6: [i64; 10] = [
    1, 6, 36, 216, 1296, 7776, 46656, 279936, 1679616, 10077696,
];

/// Number of full-resolution cells along each domain axis
pub const FULL_RESOLUTION: i64 = POW6[MAX_DEPTH as usize];

/// Symbol table indexed as `SYMBOL_GRID[5 - dj][di]`.
///
/// Row 0 is the top of a tile (local row digit 5). Symbols run serpentine
/// from the lower-left corner so consecutive symbols touch.
pub const SYMBOL_GRID: [[char; 6]; 6] = [
    ['Z', 'Y', 'X', 'W', 'V', 'U'],
    ['O', 'P', 'Q', 'R', 'S', 'T'],
    ['N', 'M', 'L', 'K', 'J', 'I'],
    ['C', 'D', 'E', 'F', 'G', 'H'],
    ['B', 'A', '9', '8', '7', '6'],
    ['0', '1', '2', '3', '4', '5'],
];

/// Reserved identifier of the reference tile at the false origin
pub const RESERVED_ID: &str = "000000000";

/// Symbol appended by lower-left refinement, the bottom-left child of any tile
pub const FILLER_SYMBOL: char = '0';

/// Digit pair `(di, dj)` for each ASCII byte, `None` outside the alphabet.
pub(crate) static SYMBOL_DIGITS: [Option<(u8, u8)>; 128] = build_symbol_digits();

const fn build_symbol_digits() -> [Option<(u8, u8)>; 128] {
    let mut table = [None; 128];
    let mut row = 0;
    while row < 6 {
        let mut col = 0;
        while col < 6 {
            let symbol = SYMBOL_GRID[row][col] as usize;
            table[symbol] = Some((col as u8, (5 - row) as u8));
            col += 1;
        }
        row += 1;
    }
    table
}

/// Tile side in full-resolution units at `depth`.
pub fn tile_scale(depth: u8) -> i64 {
    POW6[(MAX_DEPTH - depth.min(MAX_DEPTH)) as usize]
}
