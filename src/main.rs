/*
This code is part of the fastws watershed delineation library.
License: MIT
*/

use std::env;
use std::io::Error;
use std::path;

use fastws::tools::ToolManager;

fn main() {
    match run() {
        Ok(()) => {}
        Err(err) => panic!("{}", err),
    }
}

fn run() -> Result<(), Error> {
    let sep: &str = &path::MAIN_SEPARATOR.to_string();
    let mut working_dir = String::new();
    let mut tool_name = String::new();
    let mut run_tool = false;
    let mut tool_help = false;
    let mut tool_parameters = false;
    let mut list_tools = false;
    let mut tool_args_vec: Vec<String> = vec![];
    let mut verbose = false;
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        help();
        let tm = ToolManager::new(&working_dir, &verbose)?;
        tm.list_tools();
        return Ok(());
    }
    for arg in args.iter().skip(1) {
        if arg.starts_with("-h") || arg.starts_with("--help") {
            help();
            return Ok(());
        } else if arg.starts_with("--cd") || arg.starts_with("--wd") {
            let mut v = arg
                .replace("--cd", "")
                .replace("--wd", "")
                .replace("\"", "")
                .replace("\'", "");
            if v.starts_with("=") {
                v = v[1..v.len()].to_string();
            }
            if !v.ends_with(sep) {
                v.push_str(sep);
            }
            working_dir = v.to_string();
        } else if arg.starts_with("-run") || arg.starts_with("--run") || arg.starts_with("-r") {
            let mut v = arg
                .replace("--run", "")
                .replace("-run", "")
                .replace("-r", "")
                .replace("\"", "")
                .replace("\'", "");
            if v.starts_with("=") {
                v = v[1..v.len()].to_string();
            }
            tool_name = v;
            run_tool = true;
        } else if arg.starts_with("-toolhelp") || arg.starts_with("--toolhelp") {
            let mut v = arg
                .replace("--toolhelp", "")
                .replace("-toolhelp", "")
                .replace("\"", "")
                .replace("\'", "");
            if v.starts_with("=") {
                v = v[1..v.len()].to_string();
            }
            tool_name = v;
            tool_help = true;
        } else if arg.starts_with("-toolparameters") || arg.starts_with("--toolparameters") {
            let mut v = arg
                .replace("--toolparameters", "")
                .replace("-toolparameters", "")
                .replace("\"", "")
                .replace("\'", "");
            if v.starts_with("=") {
                v = v[1..v.len()].to_string();
            }
            tool_name = v;
            tool_parameters = true;
        } else if arg.starts_with("-listtools") || arg.starts_with("--listtools") {
            list_tools = true;
        } else if arg.starts_with("-version") || arg.starts_with("--version") {
            version();
            return Ok(());
        } else if arg.trim() == "-v" {
            verbose = true;
        } else if arg.starts_with("-") {
            // it's an arg to be fed to the tool
            tool_args_vec.push(arg.trim().to_string().clone());
        }
    }

    let sep = path::MAIN_SEPARATOR;
    if !working_dir.is_empty() && !working_dir.ends_with(sep) {
        working_dir.push_str(&(sep.to_string()));
    }
    let tm = ToolManager::new(&working_dir, &verbose)?;
    if run_tool {
        return tm.run_tool(tool_name, tool_args_vec);
    } else if tool_help {
        return tm.tool_help(tool_name);
    } else if tool_parameters {
        return tm.tool_parameters(tool_name);
    } else if list_tools {
        tm.list_tools();
    }

    Ok(())
}

fn help() {
    let mut ext = "";
    if cfg!(target_os = "windows") {
        ext = ".exe";
    }

    let exe_name = &format!("fastws{}", ext);
    let sep: String = path::MAIN_SEPARATOR.to_string();
    let s = "fastws Help

The following commands are recognized:
--cd, --wd       Changes the working directory; used in conjunction with --run flag.
-h, --help       Prints help information.
--listtools      Lists all available tools.
-r, --run        Runs a tool; used in conjunction with --wd flag; -r=\"Delineate\".
--toolhelp       Prints the help associated with a tool; --toolhelp=\"FindStream\".
--toolparameters Prints the parameters (in json form) for a specific tool; --toolparameters=\"Delineate\".
-v               Verbose mode. Without this flag, tool outputs will not be printed.
--version        Prints the version information.

Example Usage:
>> .*EXE_NAME -r=Delineate -v --wd=\"*path*to*data*\" --streams=streams.tif --fd=fd.tif --fa=fa.tif --x=680122.5 --y=5501234.5 --snap
"
    .replace("*", &sep)
    .replace("EXE_NAME", exe_name);
    println!("{}", s);
}

fn version() {
    const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
    println!("fastws v{}", VERSION.unwrap_or("unknown"));
}
