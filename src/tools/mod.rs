// private sub-module defined in other files
mod delineate;
mod delineate_watersheds;
mod find_stream;

pub use self::delineate::Delineate;
pub use self::delineate_watersheds::DelineateWatersheds;
pub use self::find_stream::FindStream;

use serde_derive::{Deserialize, Serialize};
use std::io::{Error, ErrorKind};

#[derive(Default)]
pub struct ToolManager {
    pub working_dir: String,
    pub verbose: bool,
    tool_names: Vec<String>,
}

impl ToolManager {
    pub fn new(working_directory: &str, verbose_mode: &bool) -> Result<ToolManager, Error> {
        let tool_names = vec![
            "Delineate".to_string(),
            "DelineateWatersheds".to_string(),
            "FindStream".to_string(),
        ];
        let tm = ToolManager {
            working_dir: working_directory.to_string(),
            verbose: *verbose_mode,
            tool_names,
        };
        Ok(tm)
    }

    fn get_tool(&self, tool_name: &str) -> Option<Box<dyn WatershedTool>> {
        match tool_name.to_lowercase().replace("_", "").as_ref() {
            "delineate" => Some(Box::new(Delineate::new())),
            "delineatewatersheds" => Some(Box::new(DelineateWatersheds::new())),
            "findstream" => Some(Box::new(FindStream::new())),
            _ => None,
        }
    }

    pub fn run_tool(&self, tool_name: String, args: Vec<String>) -> Result<(), Error> {
        match self.get_tool(tool_name.as_ref()) {
            Some(tool) => return tool.run(args, &self.working_dir, self.verbose),
            None => {
                return Err(Error::new(
                    ErrorKind::NotFound,
                    format!("Unrecognized tool name {}.", tool_name),
                ))
            }
        }
    }

    pub fn tool_help(&self, tool_name: String) -> Result<(), Error> {
        match self.get_tool(tool_name.as_ref()) {
            Some(tool) => println!("{}", get_help(tool)),
            None => {
                return Err(Error::new(
                    ErrorKind::NotFound,
                    format!("Unrecognized tool name {}.", tool_name),
                ))
            }
        }
        Ok(())
    }

    pub fn tool_parameters(&self, tool_name: String) -> Result<(), Error> {
        match self.get_tool(tool_name.as_ref()) {
            Some(tool) => println!("{}", tool.get_tool_parameters()),
            None => {
                return Err(Error::new(
                    ErrorKind::NotFound,
                    format!("Unrecognized tool name {}.", tool_name),
                ))
            }
        }
        Ok(())
    }

    pub fn list_tools(&self) {
        let mut ret = format!("All {} Available Tools:\n", self.tool_names.len());
        for name in &self.tool_names {
            let tool = self.get_tool(name).unwrap();
            ret.push_str(&format!(
                "{}: {}\n\n",
                tool.get_tool_name(),
                tool.get_tool_description()
            ));
        }
        println!("{}", ret);
    }
}

pub trait WatershedTool {
    fn get_tool_name(&self) -> String;
    fn get_tool_description(&self) -> String;
    fn get_tool_parameters(&self) -> String;
    fn get_example_usage(&self) -> String;
    fn run(&self, args: Vec<String>, working_directory: &str, verbose: bool)
        -> Result<(), Error>;
}

fn get_help(wt: Box<dyn WatershedTool>) -> String {
    let tool_name = wt.get_tool_name();
    let description = wt.get_tool_description();
    let parameters = wt.get_tool_parameters();
    let o: serde_json::Value = serde_json::from_str(&parameters).unwrap_or_default();
    let mut p = String::new();
    p.push_str("Flag               Description\n");
    p.push_str("-----------------  -----------\n");
    if let Some(a) = o["parameters"].as_array() {
        for d in a {
            let mut s = String::new();
            if let Some(flags) = d["flags"].as_array() {
                for f in flags {
                    s.push_str(&format!("{}, ", f.as_str().unwrap_or("")));
                }
            }
            p.push_str(&format!(
                "{:width$} {}\n",
                s.trim().trim_matches(','),
                d["description"].as_str().unwrap_or(""),
                width = 18
            ));
        }
    }
    format!(
        "{}
Description:\n{}
Parameters:\n
{}

Example usage:
{}
",
        tool_name,
        description,
        p,
        wt.get_example_usage()
    )
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ToolParameter {
    pub name: String,
    pub flags: Vec<String>,
    pub description: String,
    pub parameter_type: ParameterType,
    pub default_value: Option<String>,
    pub optional: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub enum ParameterType {
    Boolean,
    String,
    Integer,
    Float,
    ExistingFile,
    NewFile,
}

/// Splits a raw `--flag=value` / `--flag value` argument list the way the
/// individual tools expect: returns the value for the flag at `i`, if any.
pub(crate) fn flag_value(args: &[String], i: usize, keyval: bool, vec: &[&str]) -> String {
    if keyval {
        vec[1].to_string()
    } else {
        args.get(i + 1).cloned().unwrap_or_default()
    }
}
