//! The quantized height field.

/// Errors updating the field from a capture readback.
#[derive(Debug, thiserror::Error)]
pub enum HeightFieldError {
    /// The readback length does not match the field's RGBA footprint.
    #[error("capture buffer is {got} bytes, expected {expected}")]
    BufferSizeMismatch { got: usize, expected: usize },
}

/// A square grid of quantized elevation samples.
///
/// Side length is `detail + 1`, one sample per terrain-mesh vertex, which is
/// also the capture buffer's pixel resolution: every vertex maps to exactly
/// one sample through the affine plane-to-grid transform in
/// [`sample`](Self::sample). Each sample is an 8-bit intensity where 128 is
/// sea level; the fixed `height_multiplier` turns intensities into scene
/// elevations.
///
/// The grid is regenerated wholesale each frame by
/// [`update_from_rgba`](Self::update_from_rgba) and is read-only to every
/// consumer within that frame.
#[derive(Debug, Clone)]
pub struct HeightField {
    detail: u32,
    resolution: u32,
    plane_scale: f32,
    height_multiplier: f32,
    samples: Vec<u8>,
}

impl HeightField {
    /// Create a field at sea level everywhere.
    pub fn new(detail: u32, plane_scale: f32, height_multiplier: f32) -> Self {
        let resolution = detail + 1;
        Self {
            detail,
            resolution,
            plane_scale,
            height_multiplier,
            samples: vec![128; (resolution * resolution) as usize],
        }
    }

    /// Replace every sample from an RGBA readback's red channel.
    ///
    /// The buffer must be exactly `resolution² * 4` bytes (tightly packed,
    /// row padding already stripped by the render host).
    pub fn update_from_rgba(&mut self, rgba: &[u8]) -> Result<(), HeightFieldError> {
        let expected = self.samples.len() * 4;
        if rgba.len() != expected {
            return Err(HeightFieldError::BufferSizeMismatch {
                got: rgba.len(),
                expected,
            });
        }
        for (sample, pixel) in self.samples.iter_mut().zip(rgba.chunks_exact(4)) {
            *sample = pixel[0];
        }
        Ok(())
    }

    /// Nearest-neighbor elevation at a plane coordinate.
    ///
    /// Coordinates beyond the captured patch clamp to the edge cells; the
    /// query degrades silently at the borders rather than failing. There is
    /// no interpolation between samples: stair-stepping at cell boundaries
    /// is an accepted approximation, traded for a single byte lookup per
    /// query. See [`sample_bilinear`](Self::sample_bilinear) for the smooth
    /// variant.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let ix = self.grid_index(x);
        let iy = self.grid_index(y);
        self.sample_cell(ix, iy)
    }

    /// Elevation of one grid cell.
    pub fn sample_cell(&self, ix: u32, iy: u32) -> f32 {
        let ix = ix.min(self.resolution - 1);
        let iy = iy.min(self.resolution - 1);
        let byte = self.samples[(iy * self.resolution + ix) as usize];
        self.elevation_of(byte)
    }

    /// Bilinearly interpolated elevation at a plane coordinate.
    ///
    /// Opt-in quality mode; the nearest-neighbor [`sample`](Self::sample) is
    /// the contract the deformer and placement queries are specified against.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> f32 {
        let u = self.grid_coord(x);
        let v = self.grid_coord(y);
        let i0 = u.floor() as u32;
        let j0 = v.floor() as u32;
        let i1 = (i0 + 1).min(self.resolution - 1);
        let j1 = (j0 + 1).min(self.resolution - 1);
        let fu = u - i0 as f32;
        let fv = v - j0 as f32;

        let bottom = self.sample_cell(i0, j0) * (1.0 - fu) + self.sample_cell(i1, j0) * fu;
        let top = self.sample_cell(i0, j1) * (1.0 - fu) + self.sample_cell(i1, j1) * fu;
        bottom * (1.0 - fv) + top * fv
    }

    /// Plane coordinate of a grid cell's center along one axis.
    pub fn cell_coord(&self, index: u32) -> f32 {
        self.plane_scale * (index as f32 / self.detail as f32 - 0.5)
    }

    /// Samples per axis (`detail + 1`).
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Grid segments per axis.
    pub fn detail(&self) -> u32 {
        self.detail
    }

    /// Side length of the terrain plane the grid spans.
    pub fn plane_scale(&self) -> f32 {
        self.plane_scale
    }

    /// The fixed byte-to-elevation scale.
    pub fn height_multiplier(&self) -> f32 {
        self.height_multiplier
    }

    fn elevation_of(&self, byte: u8) -> f32 {
        self.height_multiplier * (byte as f32 - 128.0) / 255.0 * 2.0
    }

    /// Continuous grid coordinate of a plane coordinate, clamped to the grid.
    fn grid_coord(&self, coord: f32) -> f32 {
        (self.detail as f32 * (coord / self.plane_scale + 0.5))
            .clamp(0.0, (self.resolution - 1) as f32)
    }

    fn grid_index(&self, coord: f32) -> u32 {
        self.grid_coord(coord).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: u32 = 8;
    const SCALE: f32 = 40.0;
    const MULT: f32 = 3.5;

    fn field() -> HeightField {
        HeightField::new(DETAIL, SCALE, MULT)
    }

    fn rgba_of(samples: &[u8]) -> Vec<u8> {
        samples.iter().flat_map(|&r| [r, 0, 0, 255]).collect()
    }

    #[test]
    fn test_new_field_is_sea_level() {
        let f = field();
        assert_eq!(f.resolution(), DETAIL + 1);
        for iy in 0..f.resolution() {
            for ix in 0..f.resolution() {
                assert_eq!(f.sample_cell(ix, iy), 0.0);
            }
        }
    }

    #[test]
    fn test_quantization_formula_is_exact() {
        let n = DETAIL + 1;
        let mut f = field();
        let mut bytes = vec![128u8; (n * n) as usize];
        bytes[0] = 0;
        bytes[1] = 255;
        bytes[2] = 200;
        f.update_from_rgba(&rgba_of(&bytes)).unwrap();

        for (i, byte) in [(0u32, 0u8), (1, 255), (2, 200)].iter() {
            let expected = MULT * (*byte as f32 - 128.0) / 255.0 * 2.0;
            assert_eq!(f.sample_cell(*i, 0), expected, "cell {i} byte {byte}");
        }
    }

    #[test]
    fn test_red_channel_only() {
        let n = DETAIL + 1;
        let mut f = field();
        // Green/blue/alpha carry garbage; only red matters.
        let rgba: Vec<u8> = (0..(n * n))
            .flat_map(|_| [130u8, 17, 250, 3])
            .collect();
        f.update_from_rgba(&rgba).unwrap();
        let expected = MULT * (130.0 - 128.0) / 255.0 * 2.0;
        assert_eq!(f.sample_cell(3, 3), expected);
    }

    #[test]
    fn test_buffer_size_mismatch_rejected() {
        let mut f = field();
        let err = f.update_from_rgba(&[0u8; 7]).unwrap_err();
        assert!(matches!(
            err,
            HeightFieldError::BufferSizeMismatch { got: 7, .. }
        ));
        // The field keeps its previous contents on failure.
        assert_eq!(f.sample_cell(0, 0), 0.0);
    }

    #[test]
    fn test_cell_coord_round_trips_through_sample() {
        let n = DETAIL + 1;
        let mut f = field();
        let bytes: Vec<u8> = (0..(n * n)).map(|i| (i % 256) as u8).collect();
        f.update_from_rgba(&rgba_of(&bytes)).unwrap();

        for iy in 0..n {
            for ix in 0..n {
                let x = f.cell_coord(ix);
                let y = f.cell_coord(iy);
                assert_eq!(
                    f.sample(x, y),
                    f.sample_cell(ix, iy),
                    "vertex coordinate ({x}, {y}) did not map back to cell ({ix}, {iy})"
                );
            }
        }
    }

    #[test]
    fn test_out_of_range_coordinates_clamp_to_edges() {
        let n = DETAIL + 1;
        let mut f = field();
        let mut bytes = vec![128u8; (n * n) as usize];
        bytes[0] = 10; // corner (0, 0)
        bytes[(n * n - 1) as usize] = 240; // corner (n-1, n-1)
        f.update_from_rgba(&rgba_of(&bytes)).unwrap();

        assert_eq!(f.sample(-1e6, -1e6), f.sample_cell(0, 0));
        assert_eq!(f.sample(1e6, 1e6), f.sample_cell(n - 1, n - 1));
    }

    #[test]
    fn test_all_128_buffer_is_flat_zero() {
        let n = DETAIL + 1;
        let mut f = field();
        f.update_from_rgba(&rgba_of(&vec![128u8; (n * n) as usize]))
            .unwrap();
        for iy in 0..n {
            for ix in 0..n {
                assert_eq!(f.sample_cell(ix, iy), 0.0);
            }
        }
    }

    #[test]
    fn test_bilinear_matches_nearest_at_cell_centers() {
        let n = DETAIL + 1;
        let mut f = field();
        let bytes: Vec<u8> = (0..(n * n)).map(|i| (i * 7 % 256) as u8).collect();
        f.update_from_rgba(&rgba_of(&bytes)).unwrap();

        for iy in 0..n {
            for ix in 0..n {
                let x = f.cell_coord(ix);
                let y = f.cell_coord(iy);
                assert!((f.sample_bilinear(x, y) - f.sample(x, y)).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_bilinear_midpoint_is_average_of_neighbors() {
        let n = DETAIL + 1;
        let mut f = field();
        let mut bytes = vec![128u8; (n * n) as usize];
        bytes[0] = 100;
        bytes[1] = 200;
        f.update_from_rgba(&rgba_of(&bytes)).unwrap();

        let x = (f.cell_coord(0) + f.cell_coord(1)) / 2.0;
        let y = f.cell_coord(0);
        let expected = (f.sample_cell(0, 0) + f.sample_cell(1, 0)) / 2.0;
        assert!((f.sample_bilinear(x, y) - expected).abs() < 1e-4);
    }
}
