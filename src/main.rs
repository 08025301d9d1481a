use anyhow::Result;
use clap::{Arg, ArgAction, Command};

fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("PATH")
        .help("Config file (default: <config dir>/barmon/config.json)")
}

fn main() -> Result<()> {
    let matches = Command::new("barmon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Template-driven CPU, GPU and power metrics for status bars")
        .disable_version_flag(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about("Run all configured modules, printing one JSON line per update")
                .long_about("Run all configured modules until Ctrl+C\n\nEvery update is printed to stdout as a JSON line.\nWriting a module name to stdin toggles its alt format.")
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("once")
                .about("Render a single module once and print the result")
                .arg(
                    Arg::new("module")
                        .help("Module name (cpu, gpu, rapl, optionally with a #suffix)")
                        .required(true)
                        .index(1),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("probe")
                .about("Show which files each configured module reads and whether they exist")
                .arg(config_arg()),
        )
        .subcommand(Command::new("version").about("Shows version information"))
        .get_matches();

    barmon::init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("run", sub_matches)) => {
            barmon::commands::run(sub_matches)?;
        }
        Some(("once", sub_matches)) => {
            barmon::commands::once(sub_matches)?;
        }
        Some(("probe", sub_matches)) => {
            barmon::commands::probe(sub_matches)?;
        }
        Some(("version", _)) => {
            barmon::commands::version()?;
        }
        _ => {
            println!("Use --help for more information");
        }
    }

    Ok(())
}
