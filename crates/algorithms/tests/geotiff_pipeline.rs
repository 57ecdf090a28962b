//! File-based classification: GeoTIFF inputs in, GeoTIFF categories out.
//!
//! Inputs are written in the sample types typical of the source products
//! (u8 land cover and protection, f32 slope, i16 bathymetry) and read back
//! the way the command-line tool reads them.

use eligis_algorithms::eligibility::{determine_eligibility, Eligibility, EligibilityParams};
use eligis_algorithms::statistics::{eligible_areas, AreaParams};
use eligis_core::io::{read_geotiff, write_geotiff};
use eligis_core::raster::Raster;
use eligis_core::{Error, GeoTransform, CRS};
use std::path::{Path, PathBuf};

const ROWS: usize = 3;
const COLS: usize = 4;

fn georeference<T: eligis_core::RasterElement>(mut raster: Raster<T>) -> Raster<T> {
    raster.set_transform(GeoTransform::new(4_321_000.0, 3_210_000.0, 100.0, -100.0));
    raster.set_crs(Some(CRS::from_epsg(3035)));
    raster
}

fn write_inputs(dir: &Path) -> [PathBuf; 4] {
    #[rustfmt::skip]
    let land_cover: Vec<u8> = vec![
        190, 14,  14,  50,
        210, 210, 120, 220,
        200, 70,  230, 11,
    ];
    #[rustfmt::skip]
    let protection: Vec<u8> = vec![
        255, 0, 0,   0,
        0,   0, 255, 0,
        0,   0, 0,   0,
    ];
    #[rustfmt::skip]
    let slope: Vec<f32> = vec![
        40.0, 3.0, 3.5,  19.0,
        0.0,  0.0, 1.0,  0.0,
        20.0, 21.0, 0.0, 2.0,
    ];
    #[rustfmt::skip]
    let bathymetry: Vec<i16> = vec![
        12,  40, 35, 300,
        -49, -50, 5, 900,
        2,   600, 0, -3,
    ];

    let paths = [
        dir.join("land_cover.tif"),
        dir.join("protected_areas.tif"),
        dir.join("slope.tif"),
        dir.join("bathymetry.tif"),
    ];
    write_geotiff(&georeference(Raster::from_vec(land_cover, ROWS, COLS).unwrap()), &paths[0], None).unwrap();
    write_geotiff(&georeference(Raster::from_vec(protection, ROWS, COLS).unwrap()), &paths[1], None).unwrap();
    write_geotiff(&georeference(Raster::from_vec(slope, ROWS, COLS).unwrap()), &paths[2], None).unwrap();
    write_geotiff(&georeference(Raster::from_vec(bathymetry, ROWS, COLS).unwrap()), &paths[3], None).unwrap();
    paths
}

fn classify_files(paths: &[PathBuf; 4]) -> eligis_core::Result<Raster<u8>> {
    classify_files_with(paths, EligibilityParams::default())
}

fn classify_files_with(paths: &[PathBuf; 4], params: EligibilityParams) -> eligis_core::Result<Raster<u8>> {
    let land_cover: Raster<f64> = read_geotiff(&paths[0], None)?;
    let protected_areas: Raster<f64> = read_geotiff(&paths[1], None)?;
    let slope: Raster<f64> = read_geotiff(&paths[2], None)?;
    let bathymetry: Raster<f64> = read_geotiff(&paths[3], None)?;
    determine_eligibility(
        &land_cover,
        &protected_areas,
        &slope,
        &bathymetry,
        params,
    )
}

#[test]
fn classify_from_files_and_roundtrip_output() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_inputs(dir.path());

    let eligibility = classify_files(&paths).unwrap();

    #[rustfmt::skip]
    let expected: Vec<u8> = vec![
        250, 200, 150, 150,
        80,  0,   0,   0,
        150, 0,   0,   200,
    ];
    assert_eq!(eligibility.data().iter().copied().collect::<Vec<_>>(), expected);

    let out_path = dir.path().join("eligibility.tif");
    write_geotiff(&eligibility, &out_path, None).unwrap();
    let back: Raster<u8> = read_geotiff(&out_path, None).unwrap();

    assert_eq!(back.data(), eligibility.data());
    assert_eq!(back.crs().and_then(CRS::epsg), Some(3035));
    assert!(back.transform().is_aligned_with(eligibility.transform()));
}

#[test]
fn areas_of_classified_output() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_inputs(dir.path());
    let eligibility = classify_files(&paths).unwrap();

    let report = eligible_areas(&eligibility, AreaParams::default()).unwrap();
    let km2 = |c: Eligibility| report.get(c).unwrap().area_km2;

    // 100 m cells are 0.01 km² each
    assert!((km2(Eligibility::RooftopPv) - 0.01).abs() < 1e-9);
    assert!((km2(Eligibility::OnshoreWindOrPvFarm) - 0.02).abs() < 1e-9);
    assert!((km2(Eligibility::OnshoreWindFarm) - 0.03).abs() < 1e-9);
    assert!((km2(Eligibility::OffshoreWindFarm) - 0.01).abs() < 1e-9);
    assert!((km2(Eligibility::NotEligible) - 0.05).abs() < 1e-9);
    assert_eq!(report.unclassified_cells, 0);
}

#[test]
fn missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = write_inputs(dir.path());
    paths[2] = dir.path().join("missing_slope.tif");

    assert!(matches!(classify_files(&paths), Err(Error::Io(_))));
}

#[test]
fn mismatched_input_shape_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_inputs(dir.path());
    let small: Raster<f64> = georeference(Raster::filled(2, 2, -10.0));
    write_geotiff(&small, &paths[3], None).unwrap();

    match classify_files(&paths) {
        Err(Error::SizeMismatch { layer, ar, ac, .. }) => {
            assert_eq!(layer, "bathymetry");
            assert_eq!((ar, ac), (2, 2));
        }
        other => panic!("expected size mismatch, got {:?}", other.map(|r| r.shape())),
    }
}

#[test]
fn wide_protection_codes_outside_the_flags_are_not_eligible() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_inputs(dir.path());

    // cropland at 1° everywhere, so only the protection layer decides
    write_geotiff(&georeference(Raster::<u8>::filled(ROWS, COLS, 14)), &paths[0], None).unwrap();
    write_geotiff(&georeference(Raster::<f32>::filled(ROWS, COLS, 1.0)), &paths[2], None).unwrap();

    #[rustfmt::skip]
    let protection: Vec<i16> = vec![
        -1,  256, 255, 0,
        0,   -9999, 0, 0,
        511, 0,   0,   1,
    ];
    write_geotiff(&georeference(Raster::from_vec(protection, ROWS, COLS).unwrap()), &paths[1], None).unwrap();

    let eligibility = classify_files(&paths).unwrap();
    #[rustfmt::skip]
    let expected: Vec<u8> = vec![
        0, 0,   0,   200,
        200, 0, 200, 200,
        0, 200, 200, 0,
    ];
    assert_eq!(eligibility.data().iter().copied().collect::<Vec<_>>(), expected);

    let strict = classify_files_with(&paths, EligibilityParams { strict_codes: true });
    assert!(matches!(
        strict,
        Err(Error::InvalidParameter { name: "protected_areas", .. })
    ));

    // a narrow read refuses the samples instead of folding them onto 0
    assert!(matches!(
        read_geotiff::<u8, _>(&paths[1], None),
        Err(Error::UnsupportedDataType(_))
    ));
}

#[test]
fn float_protection_nan_is_not_eligible() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_inputs(dir.path());

    write_geotiff(&georeference(Raster::<u8>::filled(ROWS, COLS, 14)), &paths[0], None).unwrap();
    write_geotiff(&georeference(Raster::<f32>::filled(ROWS, COLS, 1.0)), &paths[2], None).unwrap();
    let mut protection = vec![0.0f32; ROWS * COLS];
    protection[0] = f32::NAN;
    protection[1] = 255.0;
    write_geotiff(&georeference(Raster::from_vec(protection, ROWS, COLS).unwrap()), &paths[1], None).unwrap();

    let eligibility = classify_files(&paths).unwrap();
    assert_eq!(eligibility.get(0, 0).unwrap(), 0);
    assert_eq!(eligibility.get(0, 1).unwrap(), 0);
    assert!(eligibility.data().iter().skip(2).all(|&v| v == 200));
}
