/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

//! Request handling for a resolution-tiered delineation service. The HTTP
//! framing is left to the embedding server; this module owns the
//! environment configuration, the tier selection, and the request/response
//! JSON shapes.

use std::env;
use std::io::{Error, ErrorKind};

use serde_derive::{Deserialize, Serialize};
use serde_json::json;

use crate::watershed::{delineate, find_stream, DelineateOptions};

/// A delineation request as posted by clients.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DelineateRequest {
    pub x: f64,
    pub y: f64,
    pub crs: u16,
    /// Warm-up request: answer immediately without touching data.
    #[serde(default)]
    pub prime: bool,
    #[serde(default)]
    pub simplify: f64,
    #[serde(default)]
    pub smooth: f64,
    #[serde(rename = "outCrs", default)]
    pub out_crs: Option<u16>,
}

/// Paths and tier tables for the service, read from the environment:
/// `STREAMS_PATH`, `DIRECTION_PATH`, and `ACCUMULATION_PATH` are format
/// strings with a `{}` token standing in for the resolution, `RESOLUTIONS`
/// and `AREA_THRESH` are JSON lists.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub streams_path: String,
    pub direction_path: String,
    pub accumulation_path: String,
    pub resolutions: Vec<u32>,
    pub area_thresholds: Vec<f64>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<ServiceConfig, Error> {
        let streams_path = require_env("STREAMS_PATH")?;
        let direction_path = require_env("DIRECTION_PATH")?;
        let accumulation_path = require_env("ACCUMULATION_PATH")?;
        let resolutions: Vec<u32> = serde_json::from_str(&require_env("RESOLUTIONS")?)
            .map_err(|e| {
                Error::new(ErrorKind::InvalidInput, format!("Invalid RESOLUTIONS: {}", e))
            })?;
        let area_thresholds: Vec<f64> = serde_json::from_str(&require_env("AREA_THRESH")?)
            .map_err(|e| {
                Error::new(ErrorKind::InvalidInput, format!("Invalid AREA_THRESH: {}", e))
            })?;
        if resolutions.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "RESOLUTIONS must name at least one resolution",
            ));
        }
        Ok(ServiceConfig {
            streams_path,
            direction_path,
            accumulation_path,
            resolutions,
            area_thresholds,
        })
    }

    /// The tier used for snapping: the first (finest) resolution, whose
    /// stream network places outlets most precisely.
    pub fn snap_resolution(&self) -> u32 {
        self.resolutions[0]
    }

    /// First tier whose area threshold exceeds the drainage area; the last
    /// tier is the fallback for large basins.
    pub fn select_resolution(&self, accum_area: f64) -> u32 {
        for (n, threshold) in self.area_thresholds.iter().enumerate() {
            if accum_area < *threshold && n < self.resolutions.len() {
                return self.resolutions[n];
            }
        }
        self.resolutions[self.resolutions.len() - 1]
    }

    pub fn streams_for(&self, resolution: u32) -> String {
        self.streams_path.replace("{}", &resolution.to_string())
    }

    pub fn direction_for(&self, resolution: u32) -> String {
        self.direction_path.replace("{}", &resolution.to_string())
    }

    pub fn accumulation_for(&self, resolution: u32) -> String {
        self.accumulation_path.replace("{}", &resolution.to_string())
    }
}

fn require_env(name: &str) -> Result<String, Error> {
    env::var(name).map_err(|_| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("The {} environment variable is not set", name),
        )
    })
}

/// Serves one request: snap against the snapping tier to measure drainage
/// area, pick the delineation tier from the area thresholds, and delineate
/// there. Failures are folded into the error response shape rather than
/// surfaced, so the embedding server always has a body to return.
pub fn handle_request(config: &ServiceConfig, request: &DelineateRequest) -> serde_json::Value {
    if request.prime {
        return json!({ "response": "success" });
    }
    match run_request(config, request) {
        Ok(value) => value,
        Err(e) => json!({ "response": "error", "error": e.to_string() }),
    }
}

fn run_request(
    config: &ServiceConfig,
    request: &DelineateRequest,
) -> Result<serde_json::Value, Error> {
    let snap_res = config.snap_resolution();
    let (x, y, accum_area) = find_stream(
        &config.streams_for(snap_res),
        &config.direction_for(snap_res),
        Some(&config.accumulation_for(snap_res)),
        request.x,
        request.y,
        Some(request.crs),
    )?;
    let accum_area = accum_area.unwrap_or(0f64);

    let resolution = config.select_resolution(accum_area);

    let options = DelineateOptions {
        snap: true,
        fa_src: Some(config.accumulation_for(resolution)),
        xy_srs: Some(request.crs),
        out_crs: request.out_crs,
        simplify: request.simplify,
        smooth: request.smooth,
    };
    let watershed = delineate(
        x,
        y,
        &config.streams_for(resolution),
        &config.direction_for(resolution),
        &options,
    )?;

    Ok(json!({
        "response": "success",
        "x": watershed.x,
        "y": watershed.y,
        "res": resolution,
        "area": watershed.area,
        "watershedPolygon": watershed.geometry,
    }))
}
