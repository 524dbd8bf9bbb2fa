/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

use std::fs;
use std::io::{Error, ErrorKind};
use std::path;
use std::time::Instant;

use crate::tools::{flag_value, ParameterType, ToolParameter, WatershedTool};
use crate::utils::get_formatted_elapsed_time;
use crate::watershed;
use crate::watershed::DelineateOptions;

/// This tool delineates the watershed draining through a point and writes
/// the result as a GeoJSON MultiPolygon. The point can optionally be
/// snapped downstream to the nearest stream cell first (`--snap`), which
/// requires a flow-accumulation raster (`--fa`).
pub struct Delineate {
    name: String,
    description: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl Delineate {
    pub fn new() -> Delineate {
        // public constructor
        let name = "Delineate".to_string();
        let description =
            "Delineates the watershed draining to a point as a polygon.".to_string();

        let mut parameters = vec![];
        parameters.push(ToolParameter {
            name: "Input Streams Raster".to_owned(),
            flags: vec!["--streams".to_owned()],
            description: "Input streams raster file.".to_owned(),
            parameter_type: ParameterType::ExistingFile,
            default_value: None,
            optional: false,
        });
        parameters.push(ToolParameter {
            name: "Input D8 Flow Direction Raster".to_owned(),
            flags: vec!["--fd".to_owned()],
            description: "Input D8 flow direction raster file.".to_owned(),
            parameter_type: ParameterType::ExistingFile,
            default_value: None,
            optional: false,
        });
        parameters.push(ToolParameter {
            name: "Input Flow Accumulation Raster".to_owned(),
            flags: vec!["--fa".to_owned()],
            description: "Input flow accumulation raster file; required with --snap.".to_owned(),
            parameter_type: ParameterType::ExistingFile,
            default_value: None,
            optional: true,
        });
        parameters.push(ToolParameter {
            name: "X Coordinate".to_owned(),
            flags: vec!["--x".to_owned()],
            description: "Query point x-coordinate.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: None,
            optional: false,
        });
        parameters.push(ToolParameter {
            name: "Y Coordinate".to_owned(),
            flags: vec!["--y".to_owned()],
            description: "Query point y-coordinate.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: None,
            optional: false,
        });
        parameters.push(ToolParameter {
            name: "Snap To Stream".to_owned(),
            flags: vec!["--snap".to_owned()],
            description: "Snap the point downstream to the nearest stream cell first.".to_owned(),
            parameter_type: ParameterType::Boolean,
            default_value: Some("false".to_owned()),
            optional: true,
        });
        parameters.push(ToolParameter {
            name: "Point EPSG Code".to_owned(),
            flags: vec!["--xy_srs".to_owned()],
            description: "EPSG code of the query point; raster CRS if absent.".to_owned(),
            parameter_type: ParameterType::Integer,
            default_value: None,
            optional: true,
        });
        parameters.push(ToolParameter {
            name: "Output EPSG Code".to_owned(),
            flags: vec!["--out_crs".to_owned()],
            description: "EPSG code of the output polygon; raster CRS if absent.".to_owned(),
            parameter_type: ParameterType::Integer,
            default_value: None,
            optional: true,
        });
        parameters.push(ToolParameter {
            name: "Simplification Tolerance".to_owned(),
            flags: vec!["--simplify".to_owned()],
            description: "Douglas-Peucker tolerance for the output polygon.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: Some("0.0".to_owned()),
            optional: true,
        });
        parameters.push(ToolParameter {
            name: "Smoothing Distance".to_owned(),
            flags: vec!["--smooth".to_owned()],
            description: "Morphological smoothing distance for the output polygon.".to_owned(),
            parameter_type: ParameterType::Float,
            default_value: Some("0.0".to_owned()),
            optional: true,
        });
        parameters.push(ToolParameter {
            name: "Output File".to_owned(),
            flags: vec!["-o".to_owned(), "--output".to_owned()],
            description: "Output GeoJSON file; printed to stdout if absent.".to_owned(),
            parameter_type: ParameterType::NewFile,
            default_value: None,
            optional: true,
        });

        let sep: String = path::MAIN_SEPARATOR.to_string();
        let usage = format!(
            ">>.*fastws -r={} -v --wd=\"*path*to*data*\" --streams=streams.tif --fd=fd.tif --fa=fa.tif --x=680122.5 --y=5501234.5 --snap -o=watershed.geojson",
            name
        )
        .replace("*", &sep);

        Delineate {
            name,
            description,
            parameters,
            example_usage: usage,
        }
    }
}

impl WatershedTool for Delineate {
    fn get_tool_name(&self) -> String {
        self.name.clone()
    }

    fn get_tool_description(&self) -> String {
        self.description.clone()
    }

    fn get_tool_parameters(&self) -> String {
        match serde_json::to_string(&self.parameters) {
            Ok(json_str) => format!("{{\"parameters\":{}}}", json_str),
            Err(err) => format!("{:?}", err),
        }
    }

    fn get_example_usage(&self) -> String {
        self.example_usage.clone()
    }

    fn run(
        &self,
        args: Vec<String>,
        working_directory: &str,
        verbose: bool,
    ) -> Result<(), Error> {
        let mut streams_file = String::new();
        let mut fd_file = String::new();
        let mut fa_file = String::new();
        let mut output_file = String::new();
        let mut x = f64::NAN;
        let mut y = f64::NAN;
        let mut snap = false;
        let mut xy_srs: Option<u16> = None;
        let mut out_crs: Option<u16> = None;
        let mut simplify = 0f64;
        let mut smooth = 0f64;

        if args.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Tool run with no parameters.",
            ));
        }
        for i in 0..args.len() {
            let mut arg = args[i].replace("\"", "");
            arg = arg.replace("\'", "");
            let cmd = arg.split("="); // in case an equals sign was used
            let vec = cmd.collect::<Vec<&str>>();
            let keyval = vec.len() > 1;
            let flag_val = vec[0].to_lowercase().replace("--", "-");
            if flag_val == "-streams" {
                streams_file = flag_value(&args, i, keyval, &vec);
            } else if flag_val == "-fd" {
                fd_file = flag_value(&args, i, keyval, &vec);
            } else if flag_val == "-fa" {
                fa_file = flag_value(&args, i, keyval, &vec);
            } else if flag_val == "-x" {
                x = flag_value(&args, i, keyval, &vec)
                    .parse::<f64>()
                    .map_err(|_| Error::new(ErrorKind::InvalidInput, "Error parsing --x"))?;
            } else if flag_val == "-y" {
                y = flag_value(&args, i, keyval, &vec)
                    .parse::<f64>()
                    .map_err(|_| Error::new(ErrorKind::InvalidInput, "Error parsing --y"))?;
            } else if flag_val == "-snap" {
                if vec.len() == 1 || !vec[1].to_string().to_lowercase().contains("false") {
                    snap = true;
                }
            } else if flag_val == "-xy_srs" {
                let code = flag_value(&args, i, keyval, &vec)
                    .parse::<u16>()
                    .map_err(|_| Error::new(ErrorKind::InvalidInput, "Error parsing --xy_srs"))?;
                xy_srs = Some(code);
            } else if flag_val == "-out_crs" {
                let code = flag_value(&args, i, keyval, &vec)
                    .parse::<u16>()
                    .map_err(|_| Error::new(ErrorKind::InvalidInput, "Error parsing --out_crs"))?;
                out_crs = Some(code);
            } else if flag_val == "-simplify" {
                simplify = flag_value(&args, i, keyval, &vec)
                    .parse::<f64>()
                    .map_err(|_| Error::new(ErrorKind::InvalidInput, "Error parsing --simplify"))?;
            } else if flag_val == "-smooth" {
                smooth = flag_value(&args, i, keyval, &vec)
                    .parse::<f64>()
                    .map_err(|_| Error::new(ErrorKind::InvalidInput, "Error parsing --smooth"))?;
            } else if flag_val == "-o" || flag_val == "-output" {
                output_file = flag_value(&args, i, keyval, &vec);
            }
        }

        if x.is_nan() || y.is_nan() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Both --x and --y must be provided.",
            ));
        }

        if verbose {
            println!("***************{}", "*".repeat(self.get_tool_name().len()));
            println!("* Welcome to {} *", self.get_tool_name());
            println!("***************{}", "*".repeat(self.get_tool_name().len()));
        }

        let sep: String = path::MAIN_SEPARATOR.to_string();
        if !streams_file.contains(&sep) && !streams_file.contains("/") {
            streams_file = format!("{}{}", working_directory, streams_file);
        }
        if !fd_file.contains(&sep) && !fd_file.contains("/") {
            fd_file = format!("{}{}", working_directory, fd_file);
        }
        if !fa_file.is_empty() && !fa_file.contains(&sep) && !fa_file.contains("/") {
            fa_file = format!("{}{}", working_directory, fa_file);
        }
        if !output_file.is_empty() && !output_file.contains(&sep) && !output_file.contains("/") {
            output_file = format!("{}{}", working_directory, output_file);
        }

        if verbose {
            println!("Delineating watershed...");
        }
        let start = Instant::now();

        let options = DelineateOptions {
            snap,
            fa_src: if fa_file.is_empty() {
                None
            } else {
                Some(fa_file.clone())
            },
            xy_srs,
            out_crs,
            simplify,
            smooth,
        };
        let watershed = watershed::delineate(x, y, &streams_file, &fd_file, &options)?;

        let result = serde_json::json!({
            "x": watershed.x,
            "y": watershed.y,
            "area": watershed.area,
            "watershedPolygon": watershed.geometry,
        });
        if output_file.is_empty() {
            println!("{}", result);
        } else {
            fs::write(&output_file, result.to_string())?;
            if verbose {
                println!("Output file written");
            }
        }

        if verbose {
            println!(
                "{}",
                &format!("Elapsed Time: {}", get_formatted_elapsed_time(start))
            );
        }

        Ok(())
    }
}
