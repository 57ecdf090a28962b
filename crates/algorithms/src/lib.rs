//! # eligis algorithms
//!
//! Renewable-energy land eligibility for eligis.
//!
//! ## Modules
//!
//! - **eligibility**: land cover, protection and category enumerations, the
//!   ordered rule table and the raster classifier
//! - **statistics**: eligible area per category

pub mod eligibility;
pub mod statistics;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::eligibility::{
        classify_cell, determine_eligibility, CellInputs, Eligibility, EligibilityClassifier,
        EligibilityInputs, EligibilityParams, GlobCover, ProtectedArea, ELIGIBILITY_RULES,
    };
    pub use crate::statistics::{eligible_areas, AreaParams, AreaReport, EligibleArea, EligibleAreas};
    pub use eligis_core::prelude::*;
}
