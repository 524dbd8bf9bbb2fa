/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

use std::io::{Error, ErrorKind};

use proj4rs::proj::Proj;

/// A reusable transform between two EPSG coordinate systems. Coordinates
/// are degrees in geographic systems and linear units in projected ones;
/// the radian convention of the transform backend is handled internally.
pub struct CrsTransformer {
    src: Proj,
    dst: Proj,
    identity: bool,
}

impl CrsTransformer {
    pub fn new(s_srs: u16, t_srs: u16) -> Result<CrsTransformer, Error> {
        let src = projection_from_epsg(s_srs)?;
        let dst = projection_from_epsg(t_srs)?;
        Ok(CrsTransformer {
            src,
            dst,
            identity: s_srs == t_srs,
        })
    }

    pub fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), Error> {
        if self.identity {
            return Ok((x, y));
        }
        let mut point = (x, y, 0.0f64);
        if self.src.is_latlong() {
            point.0 = point.0.to_radians();
            point.1 = point.1.to_radians();
        }
        proj4rs::transform::transform(&self.src, &self.dst, &mut point).map_err(|e| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("Could not transform the point ({}, {}): {:?}", x, y, e),
            )
        })?;
        if self.dst.is_latlong() {
            point.0 = point.0.to_degrees();
            point.1 = point.1.to_degrees();
        }
        Ok((point.0, point.1))
    }
}

/// Builds a projection from an EPSG code using the bundled definition set.
fn projection_from_epsg(epsg_code: u16) -> Result<Proj, Error> {
    let def = crs_definitions::from_code(epsg_code).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("No definition available for EPSG:{}", epsg_code),
        )
    })?;
    Proj::from_proj_string(def.proj4).map_err(|e| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("Invalid projection for EPSG:{}: {:?}", epsg_code, e),
        )
    })
}

/// Reproject a single point from one coordinate system to another.
pub fn transform_point(x: f64, y: f64, s_srs: u16, t_srs: u16) -> Result<(f64, f64), Error> {
    CrsTransformer::new(s_srs, t_srs)?.transform(x, y)
}
