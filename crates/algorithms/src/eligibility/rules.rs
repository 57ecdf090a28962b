//! The ordered eligibility rule table
//!
//! Rules are evaluated in table order and the last matching rule wins, so
//! the order encodes priority:
//!
//! | # | Land cover                   | Protection    | Slope / depth        | Category                |
//! |---|------------------------------|---------------|----------------------|-------------------------|
//! | 1 | urban / artificial           | any           | any                  | ROOFTOP_PV              |
//! | 2 | farm, vegetation, bare       | not protected | slope <= 3°          | ONSHORE_WIND_OR_PV_FARM |
//! | 3 | farm, vegetation, bare       | not protected | 3° < slope <= 20°    | ONSHORE_WIND_FARM       |
//! | 4 | forest                       | not protected | slope <= 20°         | ONSHORE_WIND_FARM       |
//! | 5 | water bodies                 | not protected | bathymetry > -50 m   | OFFSHORE_WIND_FARM      |
//!
//! Cells matching no rule stay NOT_ELIGIBLE. NaN slope or bathymetry fails
//! every comparison.

use super::category::Eligibility;
use super::landcover::{GlobCover, ProtectedArea};

/// Maximum slope in degrees for PV farms
pub const MAX_SLOPE_PV: f64 = 3.0;

/// Maximum slope in degrees for onshore wind farms
pub const MAX_SLOPE_WIND: f64 = 20.0;

/// Offshore wind requires bathymetry strictly above this depth, in metres
pub const MIN_BATHYMETRY_OFFSHORE: f64 = -50.0;

/// Decoded inputs of a single cell.
///
/// Codes outside the land cover or protection enumerations are `None` and
/// never satisfy a membership test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellInputs {
    pub land_cover: Option<GlobCover>,
    pub protection: Option<ProtectedArea>,
    pub slope: f64,
    pub bathymetry: f64,
}

impl CellInputs {
    /// Decode raw raster values
    pub fn from_codes(land_cover: u8, protection: u8, slope: f64, bathymetry: f64) -> Self {
        Self {
            land_cover: GlobCover::try_from(land_cover).ok(),
            protection: ProtectedArea::try_from(protection).ok(),
            slope,
            bathymetry,
        }
    }

    /// Decode raster samples of any numeric type; anything that is not an
    /// exact land cover or protection code decodes to `None`
    pub fn from_samples(land_cover: f64, protection: f64, slope: f64, bathymetry: f64) -> Self {
        Self {
            land_cover: GlobCover::from_sample(land_cover),
            protection: ProtectedArea::from_sample(protection),
            slope,
            bathymetry,
        }
    }

    fn is_unprotected(&self) -> bool {
        self.protection == Some(ProtectedArea::NotProtected)
    }

    fn land_cover_is(&self, test: fn(GlobCover) -> bool) -> bool {
        self.land_cover.is_some_and(test)
    }
}

/// One entry of the rule table: a cell predicate and the category it assigns.
#[derive(Clone, Copy)]
pub struct EligibilityRule {
    /// Short identifier used in logs and tests
    pub name: &'static str,
    /// Category written when the predicate holds
    pub category: Eligibility,
    predicate: fn(&CellInputs) -> bool,
}

impl EligibilityRule {
    /// Whether this rule applies to `cell`
    pub fn matches(&self, cell: &CellInputs) -> bool {
        (self.predicate)(cell)
    }
}

impl std::fmt::Debug for EligibilityRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EligibilityRule")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

fn urban(cell: &CellInputs) -> bool {
    cell.land_cover == Some(GlobCover::ArtificialSurfacesAndUrbanAreas)
}

fn flat_open_land(cell: &CellInputs) -> bool {
    cell.land_cover_is(GlobCover::is_open_land)
        && cell.is_unprotected()
        && cell.slope <= MAX_SLOPE_PV
}

fn sloped_open_land(cell: &CellInputs) -> bool {
    cell.land_cover_is(GlobCover::is_open_land)
        && cell.is_unprotected()
        && cell.slope <= MAX_SLOPE_WIND
        && cell.slope > MAX_SLOPE_PV
}

fn forest(cell: &CellInputs) -> bool {
    cell.land_cover_is(GlobCover::is_forest)
        && cell.is_unprotected()
        && cell.slope <= MAX_SLOPE_WIND
}

fn shallow_water(cell: &CellInputs) -> bool {
    cell.land_cover == Some(GlobCover::WaterBodies)
        && cell.is_unprotected()
        && cell.bathymetry > MIN_BATHYMETRY_OFFSHORE
}

/// The rule table, lowest priority first.
pub const ELIGIBILITY_RULES: &[EligibilityRule] = &[
    EligibilityRule {
        name: "urban",
        category: Eligibility::RooftopPv,
        predicate: urban,
    },
    EligibilityRule {
        name: "flat_open_land",
        category: Eligibility::OnshoreWindOrPvFarm,
        predicate: flat_open_land,
    },
    EligibilityRule {
        name: "sloped_open_land",
        category: Eligibility::OnshoreWindFarm,
        predicate: sloped_open_land,
    },
    EligibilityRule {
        name: "forest",
        category: Eligibility::OnshoreWindFarm,
        predicate: forest,
    },
    EligibilityRule {
        name: "shallow_water",
        category: Eligibility::OffshoreWindFarm,
        predicate: shallow_water,
    },
];

/// Category of a single cell: the last matching rule, or NOT_ELIGIBLE.
pub fn classify_cell(cell: &CellInputs) -> Eligibility {
    ELIGIBILITY_RULES
        .iter()
        .fold(Eligibility::NotEligible, |current, rule| {
            if rule.matches(cell) {
                rule.category
            } else {
                current
            }
        })
}
