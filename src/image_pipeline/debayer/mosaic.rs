//! Bayer channel extraction.
//!
//! The mosaic is deinterleaved by strided sampling: every 2x2 cell
//! contributes exactly one sample to each of the four planes.

use ndarray::{ArrayView2, s};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::types::ChannelPlanes;

/// `(row, col)` position of a site inside the 2x2 cell.
pub type CellOffset = (usize, usize);

/// Where each color site sits inside the repeating 2x2 tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfaLayout {
    pub g1: CellOffset,
    pub r: CellOffset,
    pub b: CellOffset,
    pub g2: CellOffset,
}

impl CfaLayout {
    /// ```text
    /// G R
    /// B G
    /// ```
    pub const GRBG: CfaLayout = CfaLayout {
        g1: (0, 0),
        r: (0, 1),
        b: (1, 0),
        g2: (1, 1),
    };

    /// Builds a layout, checking the offsets cover the 2x2 cell exactly once.
    pub fn new(g1: CellOffset, r: CellOffset, b: CellOffset, g2: CellOffset) -> Result<Self> {
        let mut seen = [[false; 2]; 2];
        for (name, (row, col)) in [("g1", g1), ("r", r), ("b", b), ("g2", g2)] {
            if row > 1 || col > 1 {
                return Err(ConversionError::InvalidCfaLayout(format!(
                    "{name} offset ({row}, {col}) lies outside the 2x2 cell"
                )));
            }
            if seen[row][col] {
                return Err(ConversionError::InvalidCfaLayout(format!(
                    "{name} offset ({row}, {col}) is already taken"
                )));
            }
            seen[row][col] = true;
        }
        Ok(Self { g1, r, b, g2 })
    }
}

impl Default for CfaLayout {
    fn default() -> Self {
        Self::GRBG
    }
}

fn plane<'a>(grid: &ArrayView2<'a, u16>, offset: CellOffset, rows: usize, cols: usize) -> ArrayView2<'a, u16> {
    // An empty plane must still start inside the grid.
    let (row, col) = if rows == 0 || cols == 0 { (0, 0) } else { offset };
    // Bounding the range by 2*rows drops a trailing odd row/column.
    grid.clone().slice_move(s![row..2 * rows; 2, col..2 * cols; 2])
}

/// Splits a `H x W` mosaic into four `H/2 x W/2` planes.
///
/// With odd `H` or `W` the last row or column is silently ignored.
pub fn extract_planes<'a>(grid: ArrayView2<'a, u16>, layout: &CfaLayout) -> ChannelPlanes<'a> {
    let (height, width) = grid.dim();
    let (rows, cols) = (height / 2, width / 2);
    if height % 2 != 0 || width % 2 != 0 {
        debug!("Odd mosaic {}x{}, dropping trailing row/column", width, height);
    }

    ChannelPlanes {
        g1: plane(&grid, layout.g1, rows, cols),
        r: plane(&grid, layout.r, rows, cols),
        b: plane(&grid, layout.b, rows, cols),
        g2: plane(&grid, layout.g2, rows, cols),
    }
}
