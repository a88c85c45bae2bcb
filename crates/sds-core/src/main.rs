use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use sds_core::commands::{format_actions, format_report, format_summary, read_script_text};
use sds_core::{Studio, StudioConfig};
use sds_script::text::to_indented_json;
use sds_script::SiteScriptContent;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("sds-studio")
        .version(sds_core::VERSION)
        .about("Schema-driven authoring for SharePoint site scripts")
        .subcommand_required(true)
        .arg(
            Arg::new("schema")
                .long("schema")
                .global(true)
                .value_name("SOURCE")
                .help("Schema document: URL, /-relative path or inline JSON (default: bundled)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("FILE")
                .help("TOML configuration file"),
        )
        .subcommand(Command::new("actions").about("List available actions"))
        .subcommand(
            Command::new("subactions")
                .about("List sub-actions of an action")
                .arg(Arg::new("parent").required(true).help("Parent action verb")),
        )
        .subcommand(
            Command::new("new-action")
                .about("Print a new action with default values")
                .arg(Arg::new("verb").required(true).help("Action verb"))
                .arg(
                    Arg::new("parent")
                        .long("parent")
                        .value_name("VERB")
                        .help("Create a sub-action of this action"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a site script file")
                .arg(Arg::new("file").required(true).help("Site script JSON file")),
        )
        .subcommand(
            Command::new("summary")
                .about("Summarize the actions of a site script file")
                .arg(Arg::new("file").required(true).help("Site script JSON file")),
        )
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<StudioConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => StudioConfig::load(path).with_context(|| format!("reading {path}"))?,
        None => StudioConfig::default(),
    };
    if let Some(source) = matches.get_one::<String>("schema") {
        config = config.with_schema_source(source.clone());
    }
    // pickers need a tenant directory, which the CLI does not have
    Ok(config.with_default_pickers(false))
}

fn init_tracing(config: &StudioConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    init_tracing(&config);

    let studio = Studio::new(config);
    studio.configure(false).await.context("loading schema")?;
    let engine = studio.engine();

    match matches.subcommand() {
        Some(("actions", _)) => {
            print!("{}", format_actions(&engine.get_available_actions()?));
        }
        Some(("subactions", args)) => {
            let parent = args.get_one::<String>("parent").map_or("", String::as_str);
            let descriptors = engine.get_available_sub_actions(parent)?;
            if descriptors.is_empty() {
                eprintln!("'{parent}' has no sub-actions");
                std::process::exit(1);
            }
            print!("{}", format_actions(&descriptors));
        }
        Some(("new-action", args)) => {
            let verb = args.get_one::<String>("verb").map_or("", String::as_str);
            let action = match args.get_one::<String>("parent") {
                Some(parent) => engine.get_new_sub_action_from_verb(parent, verb)?,
                None => engine.get_new_action_from_verb(verb)?,
            };
            println!("{}", to_indented_json(&action)?);
        }
        Some(("validate", args)) => {
            let path = args.get_one::<String>("file").map_or("", String::as_str);
            let text = read_script_text(path).with_context(|| format!("reading {path}"))?;
            let report = engine.validate_report(&text)?;
            print!("{}", format_report(&report));
            std::process::exit(if report.is_valid() { 0 } else { 1 });
        }
        Some(("summary", args)) => {
            let path = args.get_one::<String>("file").map_or("", String::as_str);
            let text = read_script_text(path).with_context(|| format!("reading {path}"))?;
            let content = SiteScriptContent::from_json(&text)?;
            print!("{}", format_summary(engine, &content)?);
        }
        _ => {}
    }
    Ok(())
}
