use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use colored::Colorize;

use crate::core::modules::ModuleKind;
use crate::core::BarConfig;

/// List the files each configured module reads and whether they exist.
pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let config = BarConfig::load(matches.get_one::<String>("config").map(Path::new))?;

    for name in config.module_names() {
        let kind = match ModuleKind::from_str(&name) {
            Ok(kind) => kind,
            Err(e) => {
                println!("{} {}", name.white().bold(), e.to_string().red());
                continue;
            }
        };

        println!("{} {}", name.white().bold(), format!("({})", kind).dimmed());
        for path in kind.resource_paths(&config.module_config(&name)) {
            let status = if path.exists() {
                "ok".green()
            } else {
                "missing".red()
            };
            println!("  [{}] {}", status, path.display());
        }
    }
    Ok(())
}
