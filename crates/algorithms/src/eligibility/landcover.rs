//! Input code enumerations: GlobCover 2009 land cover and protected-area flags

/// Land cover classes of the GlobCover 2009 product.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobCover {
    PostFlooding = 11,
    RainfedCroplands = 14,
    MosaicCropland = 20,
    MosaicVegetation = 30,
    ClosedToOpenBroadleavedForest = 40,
    ClosedBroadleavedForest = 50,
    OpenBroadleavedForest = 60,
    ClosedNeedleleavedForest = 70,
    OpenNeedleleavedForest = 90,
    ClosedToOpenMixedForest = 100,
    MosaicForest = 110,
    MosaicGrassland = 120,
    ClosedToOpenShrubland = 130,
    ClosedToOpenHerbs = 140,
    SparseVegetation = 150,
    ClosedToOpenRegularlyFloodedForest = 160,
    ClosedRegularlyFloodedForest = 170,
    ClosedToOpenRegularlyFloodedGrassland = 180,
    ArtificialSurfacesAndUrbanAreas = 190,
    BareAreas = 200,
    WaterBodies = 210,
    PermanentSnow = 220,
    NoData = 230,
}

/// Croplands and cropland mosaics
pub const FARM: &[GlobCover] = &[
    GlobCover::PostFlooding,
    GlobCover::RainfedCroplands,
    GlobCover::MosaicCropland,
    GlobCover::MosaicVegetation,
];

/// Forest classes. Regularly flooded grassland is listed here as well as
/// in [`VEGETATION`]; rule order decides which category such cells get.
pub const FOREST: &[GlobCover] = &[
    GlobCover::ClosedToOpenBroadleavedForest,
    GlobCover::ClosedBroadleavedForest,
    GlobCover::OpenBroadleavedForest,
    GlobCover::ClosedNeedleleavedForest,
    GlobCover::OpenNeedleleavedForest,
    GlobCover::ClosedToOpenMixedForest,
    GlobCover::MosaicForest,
    GlobCover::ClosedToOpenRegularlyFloodedForest,
    GlobCover::ClosedToOpenRegularlyFloodedGrassland,
];

/// Grassland, shrubland and sparse vegetation
pub const VEGETATION: &[GlobCover] = &[
    GlobCover::MosaicGrassland,
    GlobCover::ClosedToOpenShrubland,
    GlobCover::ClosedToOpenHerbs,
    GlobCover::SparseVegetation,
    GlobCover::ClosedToOpenRegularlyFloodedGrassland,
];

/// Bare areas
pub const BARE: &[GlobCover] = &[GlobCover::BareAreas];

impl GlobCover {
    /// Every class, in ascending code order
    pub const ALL: [GlobCover; 23] = [
        GlobCover::PostFlooding,
        GlobCover::RainfedCroplands,
        GlobCover::MosaicCropland,
        GlobCover::MosaicVegetation,
        GlobCover::ClosedToOpenBroadleavedForest,
        GlobCover::ClosedBroadleavedForest,
        GlobCover::OpenBroadleavedForest,
        GlobCover::ClosedNeedleleavedForest,
        GlobCover::OpenNeedleleavedForest,
        GlobCover::ClosedToOpenMixedForest,
        GlobCover::MosaicForest,
        GlobCover::MosaicGrassland,
        GlobCover::ClosedToOpenShrubland,
        GlobCover::ClosedToOpenHerbs,
        GlobCover::SparseVegetation,
        GlobCover::ClosedToOpenRegularlyFloodedForest,
        GlobCover::ClosedRegularlyFloodedForest,
        GlobCover::ClosedToOpenRegularlyFloodedGrassland,
        GlobCover::ArtificialSurfacesAndUrbanAreas,
        GlobCover::BareAreas,
        GlobCover::WaterBodies,
        GlobCover::PermanentSnow,
        GlobCover::NoData,
    ];

    /// Raw raster code
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_farm(self) -> bool {
        FARM.contains(&self)
    }

    pub fn is_forest(self) -> bool {
        FOREST.contains(&self)
    }

    pub fn is_vegetation(self) -> bool {
        VEGETATION.contains(&self)
    }

    pub fn is_bare(self) -> bool {
        BARE.contains(&self)
    }

    /// Open land usable for both wind and PV farms: farm, vegetation or bare
    pub fn is_open_land(self) -> bool {
        self.is_farm() || self.is_vegetation() || self.is_bare()
    }

    /// Class of a raster sample of any numeric type.
    ///
    /// NaN, fractional and out-of-range samples are no class.
    pub fn from_sample(sample: f64) -> Option<Self> {
        exact_code(sample).and_then(|code| Self::try_from(code).ok())
    }
}

/// The `u8` code a sample holds exactly, if any
fn exact_code(sample: f64) -> Option<u8> {
    (sample.fract() == 0.0 && (0.0..=255.0).contains(&sample)).then(|| sample as u8)
}

impl TryFrom<u8> for GlobCover {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        GlobCover::ALL
            .iter()
            .copied()
            .find(|class| class.code() == code)
            .ok_or(code)
    }
}

/// Protection status derived from the UNEP-WCMC protected areas data set.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectedArea {
    NotProtected = 0,
    Protected = 255,
}

impl ProtectedArea {
    /// Raw raster code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Protection status of a raster sample of any numeric type
    pub fn from_sample(sample: f64) -> Option<Self> {
        exact_code(sample).and_then(|code| Self::try_from(code).ok())
    }
}

impl TryFrom<u8> for ProtectedArea {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ProtectedArea::NotProtected),
            255 => Ok(ProtectedArea::Protected),
            other => Err(other),
        }
    }
}
