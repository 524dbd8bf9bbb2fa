/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

//! Generate a watersheds polygon file from a GeoJSON file of points.

use std::fs;
use std::io::{Error, ErrorKind};

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};

use crate::watershed::{delineate, DelineateOptions};

/// Delineates a watershed for every point feature in `src` and writes the
/// results to `dst` as a GeoJSON FeatureCollection of MultiPolygons. Each
/// output feature carries the input feature's properties plus the snapped
/// outlet (`fastws_snap_x`, `fastws_snap_y`) and the watershed area
/// (`fastws_area`). Point coordinates are taken to be in the raster CRS
/// unless `xy_srs` is given.
pub fn delineate_watersheds(
    src: &str,
    dst: &str,
    streams: &str,
    flow_direction: &str,
    snap: bool,
    flow_accumulation: Option<&str>,
    xy_srs: Option<u16>,
) -> Result<(), Error> {
    if snap && flow_accumulation.is_none() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "Flow accumulation data must be provided when snapping",
        ));
    }

    let raw = fs::read_to_string(src)?;
    let geojson: GeoJson = raw
        .parse()
        .map_err(|e| Error::new(ErrorKind::InvalidData, format!("Invalid GeoJSON: {}", e)))?;
    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        _ => {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Input file must be a GeoJSON FeatureCollection",
            ))
        }
    };

    let options = DelineateOptions {
        snap,
        fa_src: flow_accumulation.map(|p| p.to_string()),
        xy_srs,
        ..Default::default()
    };

    let mut features: Vec<Feature> = vec![];
    for feature in collection.features {
        let geometry = match &feature.geometry {
            Some(geometry) => geometry,
            None => continue,
        };
        let (x, y) = match &geometry.value {
            Value::Point(position) if position.len() >= 2 => (position[0], position[1]),
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    "Input file must have a Point geometry type",
                ))
            }
        };

        let watershed = delineate(x, y, streams, flow_direction, &options)?;

        let mut properties: JsonObject = feature.properties.clone().unwrap_or_default();
        properties.insert("fastws_snap_x".to_string(), watershed.x.into());
        properties.insert("fastws_snap_y".to_string(), watershed.y.into());
        properties.insert("fastws_area".to_string(), watershed.area.into());

        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(watershed.geometry.value.clone())),
            id: feature.id.clone(),
            properties: Some(properties),
            foreign_members: None,
        });
    }

    let out = GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    });
    fs::write(dst, out.to_string())?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::delineate_watersheds;
    use crate::raster::{write_geotiff, DataType, RasterConfigs};
    use crate::structures::Array2D;
    use geojson::GeoJson;

    fn temp_path(name: &str, ext: &str) -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("fastws_pts_{}_{}.{}", name, std::process::id(), ext));
        p.to_string_lossy().to_string()
    }

    fn write_grid(path: &str, values: &[f64], nodata: f64, data_type: DataType) {
        let configs = RasterConfigs {
            rows: 4,
            columns: 4,
            nodata,
            north: 0.0,
            south: -4.0,
            east: 4.0,
            west: 0.0,
            resolution_x: 1.0,
            resolution_y: 1.0,
            data_type,
            epsg_code: 32611,
            block_width: 2,
            block_height: 2,
            ..Default::default()
        };
        let mut data = Array2D::new(4, 4, nodata, nodata).unwrap();
        for row in 0..4 {
            for col in 0..4 {
                data.set_value(row, col, values[(row * 4 + col) as usize]);
            }
        }
        write_geotiff(path, &configs, &data).unwrap();
    }

    #[test]
    fn test_batch_delineation() {
        // columns 0..=2 flow east into column 3, which flows south to a
        // stream cell at (3, 3)
        let mut fd = vec![8f64; 16];
        for row in 0..4 {
            fd[row * 4 + 3] = 6.0;
        }
        let mut streams = vec![0f64; 16];
        streams[3 * 4 + 3] = 1.0;
        let fa = vec![1f64; 16];

        let fd_path = temp_path("fd", "tif");
        let streams_path = temp_path("streams", "tif");
        let fa_path = temp_path("fa", "tif");
        write_grid(&fd_path, &fd, -32768.0, DataType::I16);
        write_grid(&streams_path, &streams, 0.0, DataType::I16);
        write_grid(&fa_path, &fa, -9999.0, DataType::F32);

        let src_path = temp_path("src", "geojson");
        let dst_path = temp_path("dst", "geojson");
        std::fs::write(
            &src_path,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0.5, -0.5]},
                 "properties": {"name": "outlet-a"}}
            ]}"#,
        )
        .unwrap();

        delineate_watersheds(
            &src_path,
            &dst_path,
            &streams_path,
            &fd_path,
            true,
            Some(&fa_path),
            None,
        )
        .unwrap();

        let written = std::fs::read_to_string(&dst_path).unwrap();
        let parsed: GeoJson = written.parse().unwrap();
        match parsed {
            GeoJson::FeatureCollection(collection) => {
                assert_eq!(collection.features.len(), 1);
                let feature = &collection.features[0];
                let props = feature.properties.as_ref().unwrap();
                assert_eq!(props["name"], "outlet-a");
                assert_eq!(props["fastws_area"], 16.0);
                assert_eq!(props["fastws_snap_x"], 3.5);
                assert_eq!(props["fastws_snap_y"], -3.5);
                match &feature.geometry.as_ref().unwrap().value {
                    geojson::Value::MultiPolygon(coords) => assert_eq!(coords.len(), 1),
                    other => panic!("expected MultiPolygon, got {:?}", other),
                }
            }
            _ => panic!("expected a FeatureCollection"),
        }

        for p in [&fd_path, &streams_path, &fa_path, &src_path, &dst_path] {
            let _ = std::fs::remove_file(p);
        }
    }

    #[test]
    fn test_rejects_non_point_features() {
        let src_path = temp_path("bad_src", "geojson");
        let dst_path = temp_path("bad_dst", "geojson");
        std::fs::write(
            &src_path,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "LineString",
                 "coordinates": [[0, 0], [1, 1]]}, "properties": {}}
            ]}"#,
        )
        .unwrap();
        let err = delineate_watersheds(&src_path, &dst_path, "s", "f", false, None, None)
            .unwrap_err();
        assert!(err.to_string().contains("Point geometry"), "unexpected error: {}", err);
        let _ = std::fs::remove_file(&src_path);
    }

    #[test]
    fn test_snap_requires_accumulation() {
        let err = delineate_watersheds("a", "b", "s", "f", true, None, None).unwrap_err();
        assert!(err.to_string().contains("accumulation"), "unexpected error: {}", err);
    }
}
