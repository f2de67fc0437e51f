// pbl-projects - keeps track of the learning projects in a workspace
//
// This is the main entry point. Parses CLI args and dispatches to handlers.
// Everything interesting lives in the library.

use anyhow::{Context, Result};
use pbl_projects_lib::{config::resolve_workspace_root, logging, ProjectConfig, ProjectRecord};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init_logger();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let root_override = take_root_option(&mut args);

    if args.is_empty() {
        print_usage();
        return Ok(ExitCode::SUCCESS);
    }

    let command = args.remove(0);

    match command.as_str() {
        "version" | "-v" | "--version" => {
            println!("pbl-projects v{}", env!("CARGO_PKG_VERSION"));
            return Ok(ExitCode::SUCCESS);
        }
        "help" | "-h" | "--help" => {
            print_usage();
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    // The root is resolved here once and passed down explicitly
    let root = resolve_workspace_root(root_override.as_deref())
        .context("could not resolve workspace root")?;
    let config = ProjectConfig::new(&root)
        .with_context(|| format!("could not open workspace {}", root.display()))?;

    match command.as_str() {
        "list" => handle_list(&config, &args),
        "names" => handle_names(&config, &args),
        "paths" => handle_paths(&config, &args),
        "refresh" => handle_refresh(&config),
        "add" => handle_add(&config, &args),
        "remove" => handle_remove(&config, &args),
        "info" => handle_info(&config, &args),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Pull `--root <dir>` or `--root=<dir>` out of the argument list
fn take_root_option(args: &mut Vec<String>) -> Option<String> {
    let position = args
        .iter()
        .position(|arg| arg == "--root" || arg.starts_with("--root="))?;
    let flag = args.remove(position);

    if let Some(value) = flag.strip_prefix("--root=") {
        return Some(value.to_string());
    }
    if position < args.len() {
        return Some(args.remove(position));
    }
    None
}

fn wants_refresh(args: &[String]) -> bool {
    args.iter().any(|arg| arg == "--refresh" || arg == "-r")
}

fn handle_list(config: &ProjectConfig, args: &[String]) -> Result<ExitCode> {
    let projects = config.get_projects(wants_refresh(args))?;

    println!(
        "Found {} projects in {}",
        projects.len(),
        config.layout().projects_dir().display()
    );
    println!("{}", "=".repeat(50));

    for project in &projects {
        println!("{} {}", status_column(project), project.name);
        if let Some(description) = &project.description {
            println!("   {}", description);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn handle_names(config: &ProjectConfig, args: &[String]) -> Result<ExitCode> {
    for name in config.get_names(wants_refresh(args))? {
        println!("{}", name);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_paths(config: &ProjectConfig, args: &[String]) -> Result<ExitCode> {
    let full = args.iter().any(|arg| arg == "--full");
    let paths = if full {
        config.get_full_paths(wants_refresh(args))?
    } else {
        config.get_paths(wants_refresh(args))?
    };

    for path in paths {
        println!("{}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_refresh(config: &ProjectConfig) -> Result<ExitCode> {
    let projects = config.refresh()?;

    println!("Refreshed project list - found {} projects", projects.len());
    for project in &projects {
        println!("  {}", project.name);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_add(config: &ProjectConfig, args: &[String]) -> Result<ExitCode> {
    let Some(name) = args.first() else {
        eprintln!("Error: Project name is required for 'add'");
        return Ok(ExitCode::FAILURE);
    };

    if config.add_project(name)? {
        println!("Added {} to the project index", name);
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "Could not add {}: {} is missing or has no {} / {}",
            name,
            config.layout().project_dir(name).display(),
            config.layout().entry_file,
            config.layout().manifest_file
        );
        Ok(ExitCode::FAILURE)
    }
}

fn handle_remove(config: &ProjectConfig, args: &[String]) -> Result<ExitCode> {
    let Some(name) = args.first() else {
        eprintln!("Error: Project name is required for 'remove'");
        return Ok(ExitCode::FAILURE);
    };

    if config.remove_project(name)? {
        println!("Removed {} from the project index (files were not touched)", name);
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("Project {} is not in the index", name);
        Ok(ExitCode::FAILURE)
    }
}

fn handle_info(config: &ProjectConfig, args: &[String]) -> Result<ExitCode> {
    let Some(name) = args.first() else {
        eprintln!("Error: Project name is required for 'info'");
        return Ok(ExitCode::FAILURE);
    };

    let Some(project) = config.get_project_info(name)? else {
        eprintln!("Project {} not found", name);
        return Ok(ExitCode::FAILURE);
    };

    println!("Project Information: {}", project.name);
    println!("{}", "=".repeat(50));
    println!("Name:        {}", project.name);
    println!("Path:        {}", project.relative_path.display());
    println!("Full path:   {}", project.absolute_path.display());
    if let Some(description) = &project.description {
        println!("Description: {}", description);
    }
    println!("Entry file:  {}", yes_no(project.has_entry_file));
    println!("Manifest:    {}", yes_no(project.has_manifest));
    println!("Environment: {}", yes_no(project.has_environment));
    println!("Package:     {}", yes_no(project.has_package_config));

    Ok(ExitCode::SUCCESS)
}

fn status_column(project: &ProjectRecord) -> String {
    let labels = project.status_labels();
    if labels.is_empty() {
        "[-]".to_string()
    } else {
        format!("[{}]", labels.join(" "))
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn print_usage() {
    println!(
        r#"pbl-projects v{} - Index of the learning projects in a workspace

USAGE:
    pbl-projects [--root <dir>] <COMMAND> [OPTIONS]

COMMANDS:
    list [--refresh]           List projects with descriptions
    names [--refresh]          Print project names, one per line
    paths [--refresh] [--full] Print project paths (relative, or absolute with --full)
    refresh                    Rescan the projects directory and rewrite the cache
    add <name>                 Index an existing project directory
    remove <name>              Drop a project from the index (keeps its files)
    info <name>                Show details for one project
    version                    Show version
    help                       Show this help

WORKSPACE ROOT:
    --root <dir>, then $PBL_WORKSPACE, then the current directory.

LOGGING:
    Set RUST_LOG (e.g. RUST_LOG=debug) for more detail on stderr.
"#,
        env!("CARGO_PKG_VERSION")
    );
}
