//! Types for debayering operations

use ndarray::{Array3, ArrayView2};

/// The four half-resolution sub-grids of a 2x2 Bayer mosaic.
///
/// Each plane is a strided view into the frame, so extraction copies nothing.
#[derive(Debug, Clone)]
pub struct ChannelPlanes<'a> {
    pub g1: ArrayView2<'a, u16>,
    pub r: ArrayView2<'a, u16>,
    pub b: ArrayView2<'a, u16>,
    pub g2: ArrayView2<'a, u16>,
}

impl ChannelPlanes<'_> {
    /// `(rows, cols)` shared by all four planes.
    pub fn dim(&self) -> (usize, usize) {
        self.r.dim()
    }
}

/// Working image: linear sensor values, `height/2 x width/2 x [R, G, B]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRgb {
    pub data: Array3<f32>,
}

impl LinearRgb {
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }
}

/// Display image: 8-bit RGB, row-major, interleaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rgb8Image {
    pub data: Array3<u8>,
}

impl Rgb8Image {
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Interleaved `[R, G, B, R, G, B, ...]` bytes in logical row order.
    pub fn to_interleaved(&self) -> Vec<u8> {
        self.data.iter().copied().collect()
    }

    pub fn pixel(&self, row: usize, col: usize) -> [u8; 3] {
        [
            self.data[[row, col, 0]],
            self.data[[row, col, 1]],
            self.data[[row, col, 2]],
        ]
    }
}
