//! Output eligibility categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which renewable technology a cell can host.
///
/// The discriminants are the raster codes consumed by downstream area
/// aggregation and must not change.
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    #[default]
    NotEligible = 0,
    OffshoreWindFarm = 80,
    OnshoreWindFarm = 150,
    OnshoreWindOrPvFarm = 200,
    RooftopPv = 250,
}

impl Eligibility {
    /// Every category, in ascending code order
    pub const ALL: [Eligibility; 5] = [
        Eligibility::NotEligible,
        Eligibility::OffshoreWindFarm,
        Eligibility::OnshoreWindFarm,
        Eligibility::OnshoreWindOrPvFarm,
        Eligibility::RooftopPv,
    ];

    /// Raw raster code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Lower snake case name, e.g. `onshore_wind_or_pv_farm`
    pub fn name(self) -> &'static str {
        match self {
            Eligibility::NotEligible => "not_eligible",
            Eligibility::OffshoreWindFarm => "offshore_wind_farm",
            Eligibility::OnshoreWindFarm => "onshore_wind_farm",
            Eligibility::OnshoreWindOrPvFarm => "onshore_wind_or_pv_farm",
            Eligibility::RooftopPv => "rooftop_pv",
        }
    }

    /// Name of the area property used in region tables, e.g. `eligibility_rooftop_pv_km2`
    pub fn property_name(self) -> String {
        format!("eligibility_{}_km2", self.name())
    }
}

impl TryFrom<u8> for Eligibility {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Eligibility::ALL
            .iter()
            .copied()
            .find(|category| category.code() == code)
            .ok_or(code)
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
