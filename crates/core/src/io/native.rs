//! Native single-band GeoTIFF reading/writing
//!
//! Uses the `tiff` crate. Georeferencing is carried by the ModelPixelScale and
//! ModelTiepoint tags, the CRS by an EPSG entry in the GeoKeyDirectory and the
//! no-data value by the GDAL_NODATA tag. Bands are written in the raster's own
//! sample type so integer category codes round-trip exactly.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement, SampleKind};
use num_traits::NumCast;
use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::{
    ColorType, Gray16, Gray32, Gray32Float, Gray64, Gray64Float, Gray8, GrayI16, GrayI32,
    GrayI64, GrayI8,
};
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKindStandard, TiffValue};
use tiff::tags::Tag;
use tracing::debug;

const GT_MODEL_TYPE_KEY: u16 = 1024;
const GT_RASTER_TYPE_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_KEY: u16 = 3072;

const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;

/// Options for writing GeoTIFF files
#[derive(Debug, Clone)]
pub struct GeoTiffOptions {
    /// Write the CRS EPSG code into the GeoKeyDirectory when known
    pub write_crs: bool,
    /// Write the GDAL_NODATA tag when the raster has a no-data value
    pub write_nodata: bool,
}

impl Default for GeoTiffOptions {
    fn default() -> Self {
        Self {
            write_crs: true,
            write_nodata: true,
        }
    }
}

/// Read a single-band GeoTIFF file into a Raster
///
/// Samples are cast to `T`. Integer targets only accept samples they hold
/// exactly; NaN, out-of-range or fractional samples are an
/// [`Error::UnsupportedDataType`]. Only band 1 is supported.
pub fn read_geotiff<T, P>(path: P, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    debug!("reading {}", path.display());
    let file = File::open(path)?;
    decode_geotiff(file, band)
}

/// Read a GeoTIFF from an in-memory buffer into a Raster
pub fn read_geotiff_from_buffer<T>(data: &[u8], band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_geotiff(Cursor::new(data), band)
}

fn cast_samples<S, T>(buf: Vec<S>) -> Result<Vec<T>>
where
    S: NumCast + Copy + std::fmt::Display,
    T: RasterElement,
{
    buf.into_iter()
        .enumerate()
        .map(|(idx, v)| cast_sample::<S, T>(v).ok_or_else(|| unrepresentable::<T, S>(v, idx)))
        .collect()
}

fn cast_sample<S, T>(v: S) -> Option<T>
where
    S: NumCast + Copy,
    T: RasterElement,
{
    let cast: T = num_traits::cast(v)?;
    if T::is_float() {
        return Some(cast);
    }
    // integer targets: reject truncation (14.7 -> 14)
    let source: f64 = num_traits::cast(v)?;
    (cast.to_f64()? == source).then_some(cast)
}

fn unrepresentable<T: RasterElement, S: std::fmt::Display>(v: S, idx: usize) -> Error {
    Error::UnsupportedDataType(format!(
        "sample {} at index {} cannot be read as {:?}",
        v,
        idx,
        T::sample_kind()
    ))
}

fn decode_geotiff<T, R>(reader: R, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    R: Read + Seek,
{
    if let Some(b) = band.filter(|&b| b != 1) {
        return Err(Error::InvalidParameter {
            name: "band",
            value: b.to_string(),
            reason: "only single-band rasters are supported".into(),
        });
    }

    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;
    let rows = height as usize;
    let cols = width as usize;

    let data: Vec<T> = match decoder.read_image()? {
        DecodingResult::U8(buf) => cast_samples(buf)?,
        DecodingResult::U16(buf) => cast_samples(buf)?,
        DecodingResult::U32(buf) => cast_samples(buf)?,
        DecodingResult::U64(buf) => cast_samples(buf)?,
        DecodingResult::I8(buf) => cast_samples(buf)?,
        DecodingResult::I16(buf) => cast_samples(buf)?,
        DecodingResult::I32(buf) => cast_samples(buf)?,
        DecodingResult::I64(buf) => cast_samples(buf)?,
        DecodingResult::F32(buf) => cast_samples(buf)?,
        DecodingResult::F64(buf) => cast_samples(buf)?,
        #[allow(unreachable_patterns)]
        _ => {
            return Err(Error::UnsupportedDataType(
                "Unsupported TIFF sample format".to_string(),
            ))
        }
    };

    if data.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Some(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }
    raster.set_crs(read_crs(&mut decoder));
    raster.set_nodata(read_nodata(&mut decoder));

    Ok(raster)
}

fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag).ok()?;
    let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag).ok()?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }

    // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
    Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]))
}

fn read_crs<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<CRS> {
    let keys = decoder.get_tag_u16_vec(Tag::GeoKeyDirectoryTag).ok()?;
    // Header: [version, revision, minor, key count], then 4-short entries
    // [key id, tag location, count, value]; location 0 means inline value.
    let entries = keys.get(4..)?;
    entries
        .chunks_exact(4)
        .find(|entry| {
            (entry[0] == PROJECTED_CS_TYPE_KEY || entry[0] == GEOGRAPHIC_TYPE_KEY) && entry[1] == 0
        })
        .map(|entry| CRS::from_epsg(entry[3].into()))
}

fn read_nodata<R: Read + Seek, T: RasterElement>(decoder: &mut Decoder<R>) -> Option<T> {
    let text = decoder.get_tag_ascii_string(Tag::GdalNodata).ok()?;
    let value: f64 = text.trim_matches(char::from(0)).trim().parse().ok()?;
    num_traits::cast(value)
}

/// Write a Raster to a single-band GeoTIFF file
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P, options: Option<GeoTiffOptions>) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    debug!("writing {}", path.display());
    let mut writer = BufWriter::new(File::create(path)?);
    encode_geotiff(raster, &mut writer, options.unwrap_or_default())?;
    writer.flush()?;
    Ok(())
}

/// Write a Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T>(raster: &Raster<T>, options: Option<GeoTiffOptions>) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf), options.unwrap_or_default())?;
    Ok(buf)
}

fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W, options: GeoTiffOptions) -> Result<()>
where
    T: RasterElement,
    W: Write + Seek,
{
    let mut encoder = TiffEncoder::new(writer)?;

    match T::sample_kind() {
        SampleKind::U8 => encode_band::<Gray8, _, _>(&mut encoder, raster, &options, 0),
        SampleKind::U16 => encode_band::<Gray16, _, _>(&mut encoder, raster, &options, 0),
        SampleKind::U32 => encode_band::<Gray32, _, _>(&mut encoder, raster, &options, 0),
        SampleKind::U64 => encode_band::<Gray64, _, _>(&mut encoder, raster, &options, 0),
        SampleKind::I8 => encode_band::<GrayI8, _, _>(&mut encoder, raster, &options, 0),
        SampleKind::I16 => encode_band::<GrayI16, _, _>(&mut encoder, raster, &options, 0),
        SampleKind::I32 => encode_band::<GrayI32, _, _>(&mut encoder, raster, &options, 0),
        SampleKind::I64 => encode_band::<GrayI64, _, _>(&mut encoder, raster, &options, 0),
        SampleKind::F32 => encode_band::<Gray32Float, _, _>(&mut encoder, raster, &options, f32::NAN),
        SampleKind::F64 => encode_band::<Gray64Float, _, _>(&mut encoder, raster, &options, f64::NAN),
    }
}

fn encode_band<C, T, W>(
    encoder: &mut TiffEncoder<W>,
    raster: &Raster<T>,
    options: &GeoTiffOptions,
    fallback: C::Inner,
) -> Result<()>
where
    C: ColorType,
    C::Inner: NumCast + Copy,
    [C::Inner]: TiffValue,
    T: RasterElement,
    W: Write + Seek,
{
    let (rows, cols) = raster.shape();
    let width = u32::try_from(cols).map_err(|_| Error::InvalidDimensions { width: cols, height: rows })?;
    let height = u32::try_from(rows).map_err(|_| Error::InvalidDimensions { width: cols, height: rows })?;

    let data: Vec<C::Inner> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(fallback))
        .collect();

    let mut image = encoder.new_image::<C>(width, height)?;
    write_geo_tags(image.encoder(), raster, options)?;
    image.write_data(&data)?;
    Ok(())
}

fn write_geo_tags<W, T>(
    dir: &mut DirectoryEncoder<'_, W, TiffKindStandard>,
    raster: &Raster<T>,
    options: &GeoTiffOptions,
) -> Result<()>
where
    W: Write + Seek,
    T: RasterElement,
{
    let gt = raster.transform();

    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    dir.write_tag(Tag::ModelPixelScaleTag, &scale[..])?;

    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    dir.write_tag(Tag::ModelTiepointTag, &tiepoint[..])?;

    let crs = raster.crs().filter(|_| options.write_crs);
    dir.write_tag(Tag::GeoKeyDirectoryTag, &geo_keys(crs)[..])?;

    if options.write_nodata {
        if let Some(nodata) = raster.nodata().and_then(|nd| nd.to_f64()) {
            let text = if nodata.is_nan() {
                "nan".to_string()
            } else {
                nodata.to_string()
            };
            dir.write_tag(Tag::GdalNodata, text.as_str())?;
        }
    }

    Ok(())
}

fn geo_keys(crs: Option<&CRS>) -> Vec<u16> {
    let geographic = crs.is_some_and(CRS::is_geographic);
    let model_type = if geographic {
        MODEL_TYPE_GEOGRAPHIC
    } else {
        MODEL_TYPE_PROJECTED
    };

    let mut entries: Vec<[u16; 4]> = vec![
        [GT_MODEL_TYPE_KEY, 0, 1, model_type],
        [GT_RASTER_TYPE_KEY, 0, 1, RASTER_PIXEL_IS_AREA],
    ];
    if let Some(code) = crs.and_then(CRS::epsg).and_then(|c| u16::try_from(c).ok()) {
        let key = if geographic {
            GEOGRAPHIC_TYPE_KEY
        } else {
            PROJECTED_CS_TYPE_KEY
        };
        entries.push([key, 0, 1, code]);
    }

    let mut keys = vec![1, 1, 0, entries.len() as u16];
    keys.extend(entries.into_iter().flatten());
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn category_raster() -> Raster<u8> {
        let mut r = Raster::from_vec(vec![0, 80, 150, 200, 250, 0], 2, 3).unwrap();
        r.set_transform(GeoTransform::new(-10.0, 60.0, 0.0025, -0.0025));
        r.set_crs(Some(CRS::wgs84()));
        r
    }

    #[test]
    fn test_u8_buffer_roundtrip_is_lossless() {
        let raster = category_raster();
        let buf = write_geotiff_to_buffer(&raster, None).unwrap();
        let back: Raster<u8> = read_geotiff_from_buffer(&buf, None).unwrap();

        assert_eq!(back.shape(), (2, 3));
        assert_eq!(back.data(), raster.data());
        assert_eq!(back.crs().and_then(CRS::epsg), Some(4326));

        let gt = back.transform();
        assert_relative_eq!(gt.origin_x, -10.0, epsilon = 1e-12);
        assert_relative_eq!(gt.origin_y, 60.0, epsilon = 1e-12);
        assert_relative_eq!(gt.pixel_width, 0.0025, epsilon = 1e-12);
        assert_relative_eq!(gt.pixel_height, -0.0025, epsilon = 1e-12);
    }

    #[test]
    fn test_projected_crs_and_nodata() {
        let mut raster: Raster<f64> = Raster::from_vec(vec![-60.0, -49.9, f64::NAN, 12.5], 2, 2).unwrap();
        raster.set_crs(Some(CRS::from_epsg(3035)));
        raster.set_nodata(Some(-9999.0));

        let buf = write_geotiff_to_buffer(&raster, None).unwrap();
        let back: Raster<f64> = read_geotiff_from_buffer(&buf, None).unwrap();

        assert_eq!(back.crs().and_then(CRS::epsg), Some(3035));
        assert_eq!(back.nodata(), Some(-9999.0));
        assert_relative_eq!(back.get(0, 1).unwrap(), -49.9, epsilon = 1e-12);
        assert!(back.get(1, 0).unwrap().is_nan());
    }

    #[test]
    fn test_read_u8_as_f64() {
        let buf = write_geotiff_to_buffer(&category_raster(), None).unwrap();
        let back: Raster<f64> = read_geotiff_from_buffer(&buf, None).unwrap();
        assert_eq!(back.get(1, 1).unwrap(), 250.0);
    }

    #[test]
    fn test_file_roundtrip() {
        let tmp = tempfile::NamedTempFile::with_suffix(".tif").unwrap();
        let raster = category_raster();

        write_geotiff(&raster, tmp.path(), Some(GeoTiffOptions::default())).unwrap();
        let back: Raster<u8> = read_geotiff(tmp.path(), Some(1)).unwrap();
        assert_eq!(back.data(), raster.data());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_geotiff::<u8, _>("/nonexistent/eligis/land_cover.tif", None);
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_integer_target_rejects_out_of_range_samples() {
        let wide: Raster<i16> = Raster::from_vec(vec![-1, 256, 255], 1, 3).unwrap();
        let buf = write_geotiff_to_buffer(&wide, None).unwrap();

        let result = read_geotiff_from_buffer::<u8>(&buf, None);
        assert!(matches!(result, Err(Error::UnsupportedDataType(_))));

        let back: Raster<i32> = read_geotiff_from_buffer(&buf, None).unwrap();
        assert_eq!(back.data().iter().copied().collect::<Vec<_>>(), vec![-1, 256, 255]);
    }

    #[test]
    fn test_integer_target_rejects_nan_and_fractions() {
        for values in [vec![f32::NAN, 0.0, 255.0], vec![14.7, 0.0, 255.0]] {
            let raster: Raster<f32> = Raster::from_vec(values, 1, 3).unwrap();
            let buf = write_geotiff_to_buffer(&raster, None).unwrap();
            assert!(matches!(
                read_geotiff_from_buffer::<u8>(&buf, None),
                Err(Error::UnsupportedDataType(_))
            ));
        }

        let whole: Raster<f32> = Raster::from_vec(vec![14.0, 0.0, 255.0], 1, 3).unwrap();
        let buf = write_geotiff_to_buffer(&whole, None).unwrap();
        let back: Raster<u8> = read_geotiff_from_buffer(&buf, None).unwrap();
        assert_eq!(back.data().iter().copied().collect::<Vec<_>>(), vec![14, 0, 255]);
    }

    #[test]
    fn test_float_target_keeps_nan() {
        let raster: Raster<f32> = Raster::from_vec(vec![f32::NAN, 1.5], 1, 2).unwrap();
        let buf = write_geotiff_to_buffer(&raster, None).unwrap();
        let back: Raster<f64> = read_geotiff_from_buffer(&buf, None).unwrap();
        assert!(back.get(0, 0).unwrap().is_nan());
        assert_relative_eq!(back.get(0, 1).unwrap(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_other_bands() {
        let buf = write_geotiff_to_buffer(&category_raster(), None).unwrap();
        let result = read_geotiff_from_buffer::<u8>(&buf, Some(2));
        assert!(matches!(result, Err(Error::InvalidParameter { name: "band", .. })));
    }
}
