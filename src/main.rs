use std::fs;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use valrepr::{render, render_tree, value_from_json, ConfigFile, ReprConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("valrepr")
        .about("Render a JSON document as unambiguous debug text or a typed tree")
        .arg(
            Arg::new("input")
                .help("Input JSON file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("tree")
                .long("tree")
                .help("Emit the hierarchical JSON tree instead of text")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .help("Pretty-print the tree output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("int-format")
                .long("int-format")
                .value_name("SPEC")
                .help("Integer format specifier, e.g. X, x8, B, O, Q"),
        )
        .arg(
            Arg::new("float-format")
                .long("float-format")
                .value_name("SPEC")
                .help("Float format specifier, e.g. EX, HP, F2, E5, N2"),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .value_name("N")
                .help("Maximum nesting depth, -1 for unlimited"),
        )
        .arg(
            Arg::new("max-items")
                .long("max-items")
                .value_name("N")
                .help("Maximum items per container, -1 for unlimited"),
        )
        .arg(
            Arg::new("max-string")
                .long("max-string")
                .value_name("N")
                .help("Maximum characters per string, -1 for unlimited"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("JSON file with rendering options, overridden by flags"),
        )
        .get_matches();

    let mut config = ReprConfig::default();
    if let Some(path) = matches.get_one::<String>("config") {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        let file: ConfigFile = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path))?;
        config = file.apply(config);
    }

    if let Some(spec) = matches.get_one::<String>("int-format") {
        config.int_style = valrepr::IntStyle::parse(spec);
    }
    if let Some(spec) = matches.get_one::<String>("float-format") {
        config.float_style = valrepr::FloatStyle::parse(spec);
    }
    if let Some(raw) = matches.get_one::<String>("max-depth") {
        config.max_depth = raw.parse().context("--max-depth expects an integer")?;
    }
    if let Some(raw) = matches.get_one::<String>("max-items") {
        config.max_items = raw.parse().context("--max-items expects an integer")?;
    }
    if let Some(raw) = matches.get_one::<String>("max-string") {
        config.max_string_length = raw.parse().context("--max-string expects an integer")?;
    }

    let input_file = matches.get_one::<String>("input").unwrap();
    let json_content = fs::read_to_string(input_file)
        .with_context(|| format!("failed to read {}", input_file))?;
    let document: serde_json::Value = serde_json::from_str(&json_content)
        .with_context(|| format!("{} is not valid JSON", input_file))?;

    let value = value_from_json(&document);
    debug!(input = input_file, tree = matches.get_flag("tree"), "rendering");

    if matches.get_flag("tree") {
        let tree = render_tree(&value, &config);
        if matches.get_flag("pretty") {
            println!("{}", serde_json::to_string_pretty(&tree)?);
        } else {
            println!("{}", serde_json::to_string(&tree)?);
        }
    } else {
        println!("{}", render(&value, &config));
    }

    Ok(())
}
