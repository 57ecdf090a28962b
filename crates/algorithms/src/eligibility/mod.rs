//! Renewable-energy land eligibility
//!
//! - Land cover and protection code enumerations
//! - Eligibility categories and their raster codes
//! - The ordered rule table and single-cell evaluation
//! - Whole-raster classification

mod category;
mod classifier;
mod landcover;
mod rules;

pub use category::Eligibility;
pub use classifier::{
    determine_eligibility, EligibilityClassifier, EligibilityInputs, EligibilityParams,
};
pub use landcover::{GlobCover, ProtectedArea, BARE, FARM, FOREST, VEGETATION};
pub use rules::{
    classify_cell, CellInputs, EligibilityRule, ELIGIBILITY_RULES, MAX_SLOPE_PV, MAX_SLOPE_WIND,
    MIN_BATHYMETRY_OFFSHORE,
};
