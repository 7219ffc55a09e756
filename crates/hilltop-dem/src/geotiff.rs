//! GeoTIFF elevation reader.
//!
//! Only north-up rasters in a planar CRS are supported. The extent comes from
//! the ModelTiepoint and ModelPixelScale tags.

use crate::grid::{ElevationGrid, GridTransform};
use crate::{DemError, Result};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;

// The decoder keys its directory by the named variant, so `Tag::Unknown`
// with the same number never matches these.
const MODEL_PIXEL_SCALE: Tag = Tag::ModelPixelScaleTag;
const MODEL_TIEPOINT: Tag = Tag::ModelTiepointTag;
const GDAL_NODATA: Tag = Tag::GdalNodata;

/// Decoder buffer limit, raised from the default for large DEM mosaics.
const DECODE_LIMIT_BYTES: usize = 1024 * 1024 * 1024;

impl ElevationGrid {
    /// Load an elevation grid from a GeoTIFF file.
    pub fn from_geotiff<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let mut decoder = Decoder::new(std::io::BufReader::new(file))?;

        let mut limits = Limits::default();
        limits.decoding_buffer_size = DECODE_LIMIT_BYTES;
        limits.intermediate_buffer_size = DECODE_LIMIT_BYTES;
        limits.ifd_value_size = DECODE_LIMIT_BYTES;
        decoder = decoder.with_limits(limits);

        let (width, height) = decoder.dimensions()?;
        let transform = read_geotransform(&mut decoder, path, height)?;
        let no_data_value = read_nodata_value(&mut decoder);
        let samples = decode_elevation_data(&mut decoder)?;

        tracing::debug!(
            width,
            height,
            ?no_data_value,
            "decoded GeoTIFF {}",
            path.display()
        );

        ElevationGrid::from_north_up(
            transform,
            width as usize,
            height as usize,
            &samples,
            no_data_value,
        )
    }
}

/// Read the geotransform from the tiepoint and pixel scale tags.
fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    path: &Path,
    height: u32,
) -> Result<GridTransform> {
    let tiepoint = decoder.get_tag_f64_vec(MODEL_TIEPOINT);
    let pixel_scale = decoder.get_tag_f64_vec(MODEL_PIXEL_SCALE);

    match (tiepoint, pixel_scale) {
        (Ok(tiepoint), Ok(scale)) if tiepoint.len() >= 6 && scale.len() >= 2 => {
            // Tiepoint format: [i, j, k, x, y, z] ties raster (i, j) to world (x, y).
            let (i, j) = (tiepoint[0], tiepoint[1]);
            let (scale_x, scale_y) = (scale[0], scale[1]);
            let min_x = tiepoint[3] - i * scale_x;
            let max_y = tiepoint[4] + j * scale_y;
            let min_y = max_y - height as f64 * scale_y;
            Ok(GridTransform::new(min_x, min_y, scale_x, scale_y))
        }
        _ => Err(DemError::InvalidGeoTiff(format!(
            "{} has no ModelTiepoint/ModelPixelScale tags",
            path.display()
        ))),
    }
}

/// Widen every listed integer or float variant to `f32`.
macro_rules! samples_as_f32 {
    ($result:expr, $($variant:ident),+ $(,)?) => {
        match $result {
            DecodingResult::F32(data) => data,
            $(DecodingResult::$variant(data) => data.into_iter().map(|v| v as f32).collect(),)+
        }
    };
}

/// Decode the first band, converting any sample type to f32.
fn decode_elevation_data<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<Vec<f32>> {
    let result = decoder.read_image()?;
    Ok(samples_as_f32!(result, F64, I8, I16, I32, I64, U8, U16, U32, U64))
}

/// GDAL stores the no-data value as an ASCII string.
fn read_nodata_value<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f32> {
    decoder
        .get_tag_ascii_string(GDAL_NODATA)
        .ok()
        .and_then(|raw| raw.trim().trim_end_matches('\0').parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;
    use tiff::encoder::{colortype, TiffEncoder};

    /// 3 x 2 north-up raster of 10 m cells with its top-left corner at
    /// (500, 1020).
    const TOP_LINE: [f32; 3] = [1.0, 2.0, 3.0];
    const BOTTOM_LINE: [f32; 3] = [4.0, -9999.0, 6.0];

    fn write_tiff<C>(name: &str, samples: &[C::Inner], nodata: Option<&str>) -> PathBuf
    where
        C: colortype::ColorType,
        [C::Inner]: tiff::encoder::TiffValue,
    {
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut bytes).unwrap();
            let mut image = encoder.new_image::<C>(3, 2).unwrap();
            let dir = image.encoder();
            dir.write_tag(MODEL_PIXEL_SCALE, &[10.0f64, 10.0, 0.0][..])
                .unwrap();
            dir.write_tag(
                MODEL_TIEPOINT,
                &[0.0f64, 0.0, 0.0, 500.0, 1020.0, 0.0][..],
            )
            .unwrap();
            if let Some(nodata) = nodata {
                dir.write_tag(GDAL_NODATA, nodata).unwrap();
            }
            image.write_data(samples).unwrap();
        }

        let path = std::env::temp_dir().join(format!(
            "hilltop-geotiff-{}-{}.tif",
            std::process::id(),
            name
        ));
        std::fs::write(&path, bytes.into_inner()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ElevationGrid::from_geotiff("does/not/exist.tif").unwrap_err();
        assert!(matches!(err, DemError::Io(_)));
    }

    #[test]
    fn test_float_raster_extent_and_corners() {
        let samples: Vec<f32> = TOP_LINE.iter().chain(BOTTOM_LINE.iter()).copied().collect();
        let path = write_tiff::<colortype::Gray32Float>("f32", &samples, Some("-9999"));
        let grid = crate::load_grid(&path).unwrap();
        std::fs::remove_file(&path).ok();

        // Rows run along x, so a 3-wide raster has 3 rows.
        assert_eq!(grid.dimensions(), (3, 2));
        assert_eq!(grid.resolution(), (10.0, 10.0));
        assert_eq!(grid.no_data_value(), Some(-9999.0));

        let bounds = grid.bounds();
        assert_eq!((bounds.min_x, bounds.max_x), (500.0, 530.0));
        assert_eq!((bounds.min_y, bounds.max_y), (1000.0, 1020.0));

        assert_eq!(grid.value_at(505.0, 1015.0).unwrap(), 1.0);
        assert_eq!(grid.value_at(525.0, 1015.0).unwrap(), 3.0);
        assert_eq!(grid.value_at(505.0, 1005.0).unwrap(), 4.0);
        assert_eq!(grid.value_at(525.0, 1005.0).unwrap(), 6.0);
        assert!(matches!(
            grid.value_at(515.0, 1005.0),
            Err(DemError::NoData { .. })
        ));
    }

    #[test]
    fn test_integer_raster_is_widened() {
        let samples: [i16; 6] = [100, 200, 300, -400, 500, 600];
        let path = write_tiff::<colortype::GrayI16>("i16", &samples, None);
        let grid = ElevationGrid::from_geotiff(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(grid.no_data_value(), None);
        assert_eq!(grid.value_at(515.0, 1015.0).unwrap(), 200.0);
        assert_eq!(grid.value_at(505.0, 1005.0).unwrap(), -400.0);
    }

    #[test]
    fn test_missing_georeference_is_rejected() {
        let mut bytes = Cursor::new(Vec::new());
        TiffEncoder::new(&mut bytes)
            .unwrap()
            .write_image::<colortype::Gray32Float>(1, 1, &[5.0])
            .unwrap();
        let path = std::env::temp_dir().join(format!(
            "hilltop-geotiff-{}-bare.tif",
            std::process::id()
        ));
        std::fs::write(&path, bytes.into_inner()).unwrap();

        let err = ElevationGrid::from_geotiff(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, DemError::InvalidGeoTiff(_)));
    }
}
