//! Eligible area per category
//!
//! Sums the ground area of every cell of an eligibility raster by category.
//! Results carry the `eligibility_<name>_km2` property names used in region
//! tables.
//!
//! Cell area depends on the grid:
//! - geographic grids (a geographic CRS, or no CRS with lon/lat-sized cells
//!   inside ±180°/±90°) use the spheroidal cell area at each row's latitude;
//! - all others use the planar pixel area scaled by `linear_unit_m`.

use serde::Serialize;
use tracing::debug;

use crate::eligibility::Eligibility;
use crate::maybe_rayon::*;
use eligis_core::raster::{GeoTransform, Raster};
use eligis_core::{Algorithm, Error, Result};

use super::spheroid::{cell_dimensions, SpheroidalParams};

const M2_PER_KM2: f64 = 1.0e6;

/// Parameters for eligible-area aggregation
#[derive(Debug, Clone)]
pub struct AreaParams {
    /// Length of one projected map unit in meters (1.0 for metric CRSs)
    pub linear_unit_m: f64,
    /// Spheroid for geographic grids
    pub spheroid: SpheroidalParams,
}

impl Default for AreaParams {
    fn default() -> Self {
        Self {
            linear_unit_m: 1.0,
            spheroid: SpheroidalParams::default(),
        }
    }
}

/// Area covered by one eligibility category
#[derive(Debug, Clone, Serialize)]
pub struct EligibleArea {
    pub category: Eligibility,
    /// e.g. `eligibility_onshore_wind_farm_km2`
    pub property_name: String,
    pub pixel_count: u64,
    pub area_km2: f64,
}

/// Per-category areas of an eligibility raster
#[derive(Debug, Clone, Serialize)]
pub struct AreaReport {
    /// One entry per [`Eligibility`] category, in code order
    pub areas: Vec<EligibleArea>,
    /// Cells holding a value that is not an eligibility code
    pub unclassified_cells: u64,
}

impl AreaReport {
    /// Area entry for `category`
    pub fn get(&self, category: Eligibility) -> Option<&EligibleArea> {
        self.areas.iter().find(|a| a.category == category)
    }

    /// Total classified area in km²
    pub fn total_km2(&self) -> f64 {
        self.areas.iter().map(|a| a.area_km2).sum()
    }
}

/// Eligible-area aggregation algorithm
#[derive(Debug, Clone, Default)]
pub struct EligibleAreas;

impl Algorithm for EligibleAreas {
    type Input = Raster<u8>;
    type Output = AreaReport;
    type Params = AreaParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Eligible Areas"
    }

    fn description(&self) -> &'static str {
        "Sum ground area per renewable-energy eligibility category"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        eligible_areas(&input, params)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct RowTally {
    counts: [u64; Eligibility::ALL.len()],
    area_m2: [f64; Eligibility::ALL.len()],
    unclassified: u64,
}

/// Sum the ground area of each eligibility category.
///
/// # Errors
/// [`Error::InvalidParameter`] if `linear_unit_m` is not a positive number.
pub fn eligible_areas(eligibility: &Raster<u8>, params: AreaParams) -> Result<AreaReport> {
    if !(params.linear_unit_m > 0.0 && params.linear_unit_m.is_finite()) {
        return Err(Error::InvalidParameter {
            name: "linear_unit_m",
            value: params.linear_unit_m.to_string(),
            reason: "must be a positive finite length".into(),
        });
    }

    let (rows, cols) = eligibility.shape();
    let transform = *eligibility.transform();
    let geographic = is_geographic(eligibility);
    debug!(rows, cols, geographic, "aggregating eligible areas");

    let planar_area_m2 = transform.cell_area() * params.linear_unit_m * params.linear_unit_m;

    let tallies: Vec<RowTally> = (0..rows)
        .into_par_iter()
        .map(|row| {
            let cell_area_m2 = if geographic {
                row_cell_area_m2(&transform, row, &params.spheroid)
            } else {
                planar_area_m2
            };

            let mut tally = RowTally::default();
            for col in 0..cols {
                let code = unsafe { eligibility.get_unchecked(row, col) };
                match Eligibility::ALL.iter().position(|c| c.code() == code) {
                    Some(idx) => {
                        tally.counts[idx] += 1;
                        tally.area_m2[idx] += cell_area_m2;
                    }
                    None => tally.unclassified += 1,
                }
            }
            tally
        })
        .collect();

    let total = tallies.iter().fold(RowTally::default(), |mut acc, t| {
        for idx in 0..Eligibility::ALL.len() {
            acc.counts[idx] += t.counts[idx];
            acc.area_m2[idx] += t.area_m2[idx];
        }
        acc.unclassified += t.unclassified;
        acc
    });

    let areas = Eligibility::ALL
        .iter()
        .enumerate()
        .map(|(idx, &category)| EligibleArea {
            category,
            property_name: category.property_name(),
            pixel_count: total.counts[idx],
            area_km2: total.area_m2[idx] / M2_PER_KM2,
        })
        .collect();

    Ok(AreaReport {
        areas,
        unclassified_cells: total.unclassified,
    })
}

fn row_cell_area_m2(transform: &GeoTransform, row: usize, spheroid: &SpheroidalParams) -> f64 {
    let lat = transform.row_center_y(row);
    cell_dimensions(lat, transform.pixel_width, transform.pixel_height, spheroid).area
}

fn is_geographic(raster: &Raster<u8>) -> bool {
    if let Some(crs) = raster.crs() {
        return crs.is_geographic();
    }
    let (min_x, min_y, max_x, max_y) = raster.bounds();
    raster.transform().pixel_width.abs() <= 1.0
        && min_x >= -180.0
        && max_x <= 180.0
        && min_y >= -90.0
        && max_y <= 90.0
}
