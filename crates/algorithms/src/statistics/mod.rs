//! Raster statistics
//!
//! - Eligible area per category, in km²
//! - Spheroidal cell dimensions for geographic grids

mod area;
mod spheroid;

pub use area::{eligible_areas, AreaParams, AreaReport, EligibleArea, EligibleAreas};
pub use spheroid::{cell_dimensions, CellDimensions, SpheroidalParams};
