/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

use std::io::{Error, ErrorKind};
use std::path;
use std::time::Instant;

use crate::tools::{flag_value, ParameterType, ToolParameter, WatershedTool};
use crate::utils::get_formatted_elapsed_time;
use crate::watershed;

/// This tool delineates a watershed polygon for every point feature in a
/// GeoJSON file, writing a GeoJSON FeatureCollection of MultiPolygons that
/// carries the input properties plus the snapped outlet and area.
pub struct DelineateWatersheds {
    name: String,
    description: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl DelineateWatersheds {
    pub fn new() -> DelineateWatersheds {
        // public constructor
        let name = "DelineateWatersheds".to_string();
        let description =
            "Delineates watersheds for every point in a GeoJSON point file.".to_string();

        let mut parameters = vec![];
        parameters.push(ToolParameter {
            name: "Input Points File".to_owned(),
            flags: vec!["--points".to_owned()],
            description: "Input GeoJSON point file.".to_owned(),
            parameter_type: ParameterType::ExistingFile,
            default_value: None,
            optional: false,
        });
        parameters.push(ToolParameter {
            name: "Output File".to_owned(),
            flags: vec!["-o".to_owned(), "--output".to_owned()],
            description: "Output GeoJSON file.".to_owned(),
            parameter_type: ParameterType::NewFile,
            default_value: None,
            optional: false,
        });
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
            name: "Snap To Stream".to_owned(),
            flags: vec!["--snap".to_owned()],
            description: "Snap each point downstream to the nearest stream cell.".to_owned(),
            parameter_type: ParameterType::Boolean,
            default_value: Some("true".to_owned()),
            optional: true,
        });
        parameters.push(ToolParameter {
            name: "Point EPSG Code".to_owned(),
            flags: vec!["--xy_srs".to_owned()],
            description: "EPSG code of the input points; raster CRS if absent.".to_owned(),
            parameter_type: ParameterType::Integer,
            default_value: None,
            optional: true,
        });

        let sep: String = path::MAIN_SEPARATOR.to_string();
        let usage = format!(
            ">>.*fastws -r={} -v --wd=\"*path*to*data*\" --points=outlets.geojson --streams=streams.tif --fd=fd.tif --fa=fa.tif -o=watersheds.geojson",
            name
        )
        .replace("*", &sep);

        DelineateWatersheds {
            name,
            description,
            parameters,
            example_usage: usage,
        }
    }
}

impl WatershedTool for DelineateWatersheds {
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
        let mut points_file = String::new();
        let mut output_file = String::new();
        let mut streams_file = String::new();
        let mut fd_file = String::new();
        let mut fa_file = String::new();
        let mut snap = true;
        let mut xy_srs: Option<u16> = None;

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
            if flag_val == "-points" {
                points_file = flag_value(&args, i, keyval, &vec);
            } else if flag_val == "-o" || flag_val == "-output" {
                output_file = flag_value(&args, i, keyval, &vec);
            } else if flag_val == "-streams" {
                streams_file = flag_value(&args, i, keyval, &vec);
            } else if flag_val == "-fd" {
                fd_file = flag_value(&args, i, keyval, &vec);
            } else if flag_val == "-fa" {
                fa_file = flag_value(&args, i, keyval, &vec);
            } else if flag_val == "-snap" {
                snap = vec.len() == 1 || !vec[1].to_string().to_lowercase().contains("false");
            } else if flag_val == "-xy_srs" {
                let code = flag_value(&args, i, keyval, &vec)
                    .parse::<u16>()
                    .map_err(|_| Error::new(ErrorKind::InvalidInput, "Error parsing --xy_srs"))?;
                xy_srs = Some(code);
            }
        }

        if verbose {
            println!("***************{}", "*".repeat(self.get_tool_name().len()));
            println!("* Welcome to {} *", self.get_tool_name());
            println!("***************{}", "*".repeat(self.get_tool_name().len()));
        }

        let sep: String = path::MAIN_SEPARATOR.to_string();
        if !points_file.contains(&sep) && !points_file.contains("/") {
            points_file = format!("{}{}", working_directory, points_file);
        }
        if !output_file.contains(&sep) && !output_file.contains("/") {
            output_file = format!("{}{}", working_directory, output_file);
        }
        if !streams_file.contains(&sep) && !streams_file.contains("/") {
            streams_file = format!("{}{}", working_directory, streams_file);
        }
        if !fd_file.contains(&sep) && !fd_file.contains("/") {
            fd_file = format!("{}{}", working_directory, fd_file);
        }
        if !fa_file.is_empty() && !fa_file.contains(&sep) && !fa_file.contains("/") {
            fa_file = format!("{}{}", working_directory, fa_file);
        }

        if verbose {
            println!("Delineating watersheds...");
        }
        let start = Instant::now();

        let fa = if fa_file.is_empty() {
            None
        } else {
            Some(fa_file.as_str())
        };
        watershed::delineate_watersheds(
            &points_file,
            &output_file,
            &streams_file,
            &fd_file,
            snap,
            fa,
            xy_srs,
        )?;

        if verbose {
            println!("Output file written");
            println!(
                "{}",
                &format!("Elapsed Time: {}", get_formatted_elapsed_time(start))
            );
        }

        Ok(())
    }
}
