//! Land eligibility classification from co-registered rasters
//!
//! Combines GlobCover land cover, a protected-area mask, slope in degrees and
//! bathymetry in metres into one `u8` raster of [`Eligibility`] codes using
//! the rule table in [`super::rules`].

use ndarray::Array2;
use tracing::{debug, warn};

use crate::maybe_rayon::*;
use eligis_core::raster::{Raster, RasterElement};
use eligis_core::{Algorithm, Error, Result};

use super::category::Eligibility;
use super::landcover::{GlobCover, ProtectedArea};
use super::rules::{classify_cell, CellInputs};

/// Parameters for eligibility classification
#[derive(Debug, Clone, Default)]
pub struct EligibilityParams {
    /// Reject land cover or protection codes outside their enumerations
    /// instead of leaving those cells NOT_ELIGIBLE
    pub strict_codes: bool,
}

/// The four input layers, all on the same pixel grid.
#[derive(Debug, Clone)]
pub struct EligibilityInputs {
    /// GlobCover 2009 class codes
    pub land_cover: Raster<u8>,
    /// 255 inside protected areas, 0 elsewhere
    pub protected_areas: Raster<u8>,
    /// Terrain slope in degrees
    pub slope: Raster<f64>,
    /// Elevation relative to sea level in metres, negative below
    pub bathymetry: Raster<f64>,
}

/// Land eligibility algorithm
#[derive(Debug, Clone, Default)]
pub struct EligibilityClassifier;

impl Algorithm for EligibilityClassifier {
    type Input = EligibilityInputs;
    type Output = Raster<u8>;
    type Params = EligibilityParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Land Eligibility"
    }

    fn description(&self) -> &'static str {
        "Classify land into renewable-energy eligibility categories from land cover, protection, slope and bathymetry"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        determine_eligibility(
            &input.land_cover,
            &input.protected_areas,
            &input.slope,
            &input.bathymetry,
            params,
        )
    }
}

/// Determine renewable-energy eligibility for every cell.
///
/// # Arguments
/// * `land_cover` - GlobCover class codes; also supplies the output georeferencing
/// * `protected_areas` - Protection flags (0 or 255)
///
/// The two categorical layers may use any sample type. A sample that is not
/// exactly one of the enumerated codes (NaN, -1, 256, 14.7, ...) matches no
/// rule.
/// * `slope` - Slope in degrees
/// * `bathymetry` - Elevation in metres, negative under water
/// * `params` - Code validation policy
///
/// # Returns
/// Raster with values in {0, 80, 150, 200, 250} and the shape of the inputs
///
/// # Errors
/// [`Error::SizeMismatch`] if any input shape differs from `land_cover`;
/// [`Error::InvalidParameter`] for unknown codes when `strict_codes` is set.
pub fn determine_eligibility<L, P>(
    land_cover: &Raster<L>,
    protected_areas: &Raster<P>,
    slope: &Raster<f64>,
    bathymetry: &Raster<f64>,
    params: EligibilityParams,
) -> Result<Raster<u8>>
where
    L: RasterElement,
    P: RasterElement,
{
    land_cover.ensure_same_shape(protected_areas, "protected_areas")?;
    land_cover.ensure_same_shape(slope, "slope")?;
    land_cover.ensure_same_shape(bathymetry, "bathymetry")?;

    if !land_cover.is_coregistered_with(protected_areas)
        || !land_cover.is_coregistered_with(slope)
        || !land_cover.is_coregistered_with(bathymetry)
    {
        warn!("input rasters differ in transform or CRS; classifying on the land cover grid");
    }

    if params.strict_codes {
        validate_codes(land_cover, protected_areas)?;
    }

    let (rows, cols) = land_cover.shape();
    debug!(rows, cols, "classifying land eligibility");

    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![Eligibility::NotEligible.code(); cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                // SAFETY: all four rasters were checked to share (rows, cols).
                let cell = unsafe {
                    CellInputs::from_samples(
                        sample(land_cover.get_unchecked(row, col)),
                        sample(protected_areas.get_unchecked(row, col)),
                        slope.get_unchecked(row, col),
                        bathymetry.get_unchecked(row, col),
                    )
                };
                *out = classify_cell(&cell).code();
            }
            row_data
        })
        .collect();

    let mut output = land_cover.with_same_meta::<u8>(rows, cols);
    *output.data_mut() =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(output)
}

fn sample<T: RasterElement>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn validate_codes<L, P>(land_cover: &Raster<L>, protected_areas: &Raster<P>) -> Result<()>
where
    L: RasterElement,
    P: RasterElement,
{
    for ((row, col), &value) in land_cover.data().indexed_iter() {
        let value = sample(value);
        if GlobCover::from_sample(value).is_none() {
            return Err(Error::InvalidParameter {
                name: "land_cover",
                value: value.to_string(),
                reason: format!("not a GlobCover class (cell {}, {})", row, col),
            });
        }
    }
    for ((row, col), &value) in protected_areas.data().indexed_iter() {
        let value = sample(value);
        if ProtectedArea::from_sample(value).is_none() {
            return Err(Error::InvalidParameter {
                name: "protected_areas",
                value: value.to_string(),
                reason: format!("expected 0 or 255 (cell {}, {})", row, col),
            });
        }
    }
    Ok(())
}
