//! Cell dimensions on the WGS84 spheroid
//!
//! For geographic (lon/lat) grids the ground size of a cell shrinks with
//! latitude: dx = N·cos(φ)·Δλ, dy = M·Δφ, where N and M are the prime
//! vertical and meridional radii of curvature.

/// WGS84 semi-major axis (m)
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Spheroid used for geographic cell areas
#[derive(Debug, Clone, Copy)]
pub struct SpheroidalParams {
    /// Semi-major axis in meters. Default: WGS84 (6378137.0)
    pub semi_major: f64,
    /// Flattening. Default: WGS84 (1/298.257223563)
    pub flattening: f64,
}

impl Default for SpheroidalParams {
    fn default() -> Self {
        Self {
            semi_major: WGS84_A,
            flattening: WGS84_F,
        }
    }
}

/// Ground dimensions of one grid cell
#[derive(Debug, Clone, Copy)]
pub struct CellDimensions {
    /// East-West cell size in meters
    pub dx: f64,
    /// North-South cell size in meters
    pub dy: f64,
    /// Cell area in m²
    pub area: f64,
}

/// Cell dimensions at `latitude_deg` for a grid spaced `d_lon` × `d_lat` degrees.
pub fn cell_dimensions(
    latitude_deg: f64,
    d_lon: f64,
    d_lat: f64,
    params: &SpheroidalParams,
) -> CellDimensions {
    let lat = latitude_deg.to_radians();
    let a = params.semi_major;
    let f = params.flattening;
    let e2 = 2.0 * f - f * f;

    let sin_lat = lat.sin();
    let w2 = 1.0 - e2 * sin_lat * sin_lat;

    let n = a / w2.sqrt();
    let m = a * (1.0 - e2) / w2.powf(1.5);

    let dx = (n * lat.cos() * d_lon.to_radians()).abs();
    let dy = (m * d_lat.to_radians()).abs();

    CellDimensions { dx, dy, area: dx * dy }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARC_SECOND: f64 = 1.0 / 3600.0;

    #[test]
    fn test_cell_dimensions_equator() {
        let dims = cell_dimensions(0.0, ARC_SECOND, ARC_SECOND, &SpheroidalParams::default());
        // 1 arcsecond at the equator is about 30.9 m E-W and 30.7 m N-S
        assert!(dims.dx > 30.5 && dims.dx < 31.2, "dx = {:.2}", dims.dx);
        assert!(dims.dy > 30.4 && dims.dy < 31.0, "dy = {:.2}", dims.dy);
    }

    #[test]
    fn test_cell_width_halves_at_sixty_degrees() {
        let params = SpheroidalParams::default();
        let eq = cell_dimensions(0.0, ARC_SECOND, ARC_SECOND, &params);
        let at60 = cell_dimensions(60.0, ARC_SECOND, ARC_SECOND, &params);

        let ratio = at60.dx / eq.dx;
        assert!((ratio - 0.5).abs() < 0.02, "ratio = {:.4}", ratio);
        assert!(at60.area < eq.area);
    }

    #[test]
    fn test_hemispheres_are_symmetric() {
        let params = SpheroidalParams::default();
        let north = cell_dimensions(45.0, 0.01, 0.01, &params);
        let south = cell_dimensions(-45.0, 0.01, 0.01, &params);
        assert!((north.area - south.area).abs() < 1e-6);
    }
}
