//! Command-line interface for sidenote
//! Prints the literate sections of a Clojure source file.
//!
//! Usage:
//!   sidenote `<path>` [--format json|yaml] [--config `<file>`] [--source-path `<dir>`]...
//!            [--attach-comments] [--verbose]

use clap::{Arg, ArgAction, Command};
use sidenote::{ConfigLoader, Section, SidenoteConfig, SourceLoader};
use tracing::{debug, Level};

fn main() {
    let matches = Command::new("sidenote")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Split a Clojure source file into comment and code sections")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the source file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["json", "yaml"])
                .default_value("json"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("source-path")
                .long("source-path")
                .short('s')
                .help("Directory searched for required namespaces (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("attach-comments")
                .long("attach-comments")
                .help("Fold comments directly above a form into its docstring")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pipeline progress to stderr (twice for trace output)")
                .action(ArgAction::Count),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    let config = load_config(
        matches.get_one::<String>("config"),
        matches.get_flag("attach-comments"),
    );
    let source_paths: Vec<String> = matches
        .get_many::<String>("source-path")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default();

    // Both are declared with defaults or as required
    let path = matches.get_one::<String>("path").unwrap();
    let format = matches.get_one::<String>("format").unwrap();

    let sections = parse_path(path, config, source_paths);
    print_sections(&sections, format);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(file: Option<&String>, attach_comments: bool) -> SidenoteConfig {
    let mut loader = ConfigLoader::new();
    if let Some(file) = file {
        loader = loader.with_file(file);
    }
    if attach_comments {
        loader = loader
            .set_override("arrange.attach_adjacent_comments", true)
            .unwrap_or_else(|e| {
                eprintln!("Configuration error: {}", e);
                std::process::exit(1);
            });
    }
    loader.build().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    })
}

fn parse_path(path: &str, mut config: SidenoteConfig, source_paths: Vec<String>) -> Vec<Section> {
    config.lookup.source_paths.extend(source_paths);
    debug!(path, ?config, "parsing");

    SourceLoader::from_path(path)
        .and_then(|loader| loader.parse_with_config(&config))
        .unwrap_or_else(|e| {
            eprintln!("Error in {}: {}", path, e);
            std::process::exit(1);
        })
}

fn print_sections(sections: &[Section], format: &str) {
    let formatted = match format {
        "yaml" => serde_yaml::to_string(sections).map_err(|e| e.to_string()),
        _ => serde_json::to_string_pretty(sections).map_err(|e| e.to_string()),
    };
    match formatted {
        Ok(text) => println!("{}", text.trim_end()),
        Err(e) => {
            eprintln!("Error formatting sections: {}", e);
            std::process::exit(1);
        }
    }
}
