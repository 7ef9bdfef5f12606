//! Thin CLI wrapper around the `cdl` library. Contains no parsing logic of
//! its own: every subcommand calls straight into `cdl::api`.

use std::io::Write;

use clap::{Parser, Subcommand};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use cdl::api;

#[derive(Parser)]
#[command(name = "cdl", version = env!("CARGO_PKG_VERSION"), about = "Crystal Description Language tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a CDL string and print its tree.
    Parse {
        cdl: String,
        /// Print the canonical JSON serialization instead of Debug output.
        #[arg(long)]
        json: bool,
    },
    /// Validate a CDL string without printing its tree.
    Validate { cdl: String },
    /// List the recognized crystal systems.
    ListSystems,
    /// List the point groups permitted for a system, or for every system
    /// when `--system` is omitted.
    ListPointGroups {
        #[arg(long)]
        system: Option<String>,
    },
    /// List the named forms recognized for a system, or for every system
    /// when `--system` is omitted.
    ListForms {
        #[arg(long)]
        system: Option<String>,
    },
    /// List the recognized twin laws.
    ListTwins,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match cli.command {
        Command::Parse { cdl, json } => run_parse(&cdl, json),
        Command::Validate { cdl } => run_validate(&cdl),
        Command::ListSystems => {
            for system in api::crystal_systems() {
                println!("{}", system);
            }
            0
        }
        Command::ListPointGroups { system: Some(system) } => match api::point_groups_for(&system)
        {
            Some(groups) => {
                for group in groups {
                    println!("{}", group);
                }
                0
            }
            None => {
                eprintln!("unknown crystal system '{}'", system);
                1
            }
        },
        Command::ListPointGroups { system: None } => {
            for system in api::crystal_systems() {
                if let Some(groups) = api::point_groups_for(system) {
                    for group in groups {
                        println!("{}:{}", system, group);
                    }
                }
            }
            0
        }
        Command::ListForms { system: Some(system) } => {
            for name in api::named_form_names(&system) {
                println!("{}", name);
            }
            0
        }
        Command::ListForms { system: None } => {
            for system in api::crystal_systems() {
                for name in api::named_form_names(system) {
                    println!("{}:{}", system, name);
                }
            }
            0
        }
        Command::ListTwins => {
            for law in api::twin_laws() {
                println!("{}", law);
            }
            0
        }
    };
    std::process::exit(exit_code);
}

fn run_parse(cdl: &str, json: bool) -> i32 {
    match api::parse(cdl) {
        Ok(description) => {
            if json {
                match serde_json::to_string_pretty(&description) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("failed to serialize tree: {}", e);
                        return 1;
                    }
                }
            } else {
                println!("{:#?}", description);
            }
            0
        }
        Err(e) => {
            print_status(false, &e.to_string());
            1
        }
    }
}

fn run_validate(cdl: &str) -> i32 {
    let (ok, message) = api::validate(cdl);
    print_status(ok, message.as_deref().unwrap_or("Valid CDL string"));
    if ok {
        0
    } else {
        1
    }
}

/// Prints a colored `Valid CDL string` / `Invalid: <reason>` line, matching
/// the plain-text form when stdout is not a terminal.
fn print_status(ok: bool, message: &str) {
    let choice = if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(if ok { Color::Green } else { Color::Red })).set_bold(true);
    let _ = stdout.set_color(&spec);
    if ok {
        let _ = write!(stdout, "Valid CDL string");
    } else {
        let _ = write!(stdout, "Invalid: {}", message);
    }
    let _ = stdout.reset();
    let _ = writeln!(stdout);
}
