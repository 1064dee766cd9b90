//! Config command - inspect and edit the configuration file.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use factura_core::FacturaConfig;

use super::default_config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Write here instead of the active config path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value (e.g., "export.print_settle_ms")
    Get {
        /// Dotted key
        key: String,
    },

    /// Change one value; JSON literals are parsed, anything else is a string
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },

    /// Print the active config path
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => {
            if !path.exists() {
                eprintln!("{} No config file, showing defaults", style("ℹ").blue());
            }
            println!("{}", serde_json::to_string_pretty(&read_or_default(&path)?)?);
            Ok(())
        }
        ConfigCommand::Init { output, force } => init(output.as_deref().unwrap_or(&path), force),
        ConfigCommand::Get { key } => {
            let tree = serde_json::to_value(read_or_default(&path)?)?;
            let value = lookup(&tree, &key)
                .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(())
        }
        ConfigCommand::Set { key, value } => set(&path, &key, &value),
        ConfigCommand::Path => {
            println!("Configuration file: {}", path.display());
            if path.exists() {
                println!("Status: {}", style("exists").green());
            } else {
                println!("Status: {}", style("not created").yellow());
                println!("\nRun 'factura config init' to create it.");
            }
            Ok(())
        }
    }
}

fn read_or_default(path: &Path) -> anyhow::Result<FacturaConfig> {
    if path.exists() {
        Ok(FacturaConfig::from_file(path)?)
    } else {
        Ok(FacturaConfig::default())
    }
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    FacturaConfig::default().save(path)?;
    println!("{} Created {}", style("✓").green(), path.display());
    Ok(())
}

fn set(path: &Path, key: &str, raw: &str) -> anyhow::Result<()> {
    let value: Value =
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };

    let mut tree = serde_json::to_value(read_or_default(path)?)?;
    let section = match parents {
        Some(parents) => lookup_mut(&mut tree, parents),
        None => Some(&mut tree),
    };
    section
        .and_then(Value::as_object_mut)
        .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?
        .insert(leaf.to_string(), value.clone());

    let config: FacturaConfig = serde_json::from_value(tree)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    // Unknown keys are dropped by deserialization
    let stored = serde_json::to_value(&config)?;
    let kept = match lookup(&stored, key) {
        Some(found) => *found == value,
        None => value.is_null(),
    };
    if !kept {
        anyhow::bail!("Unknown configuration key: {}", key);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&value)?
    );
    Ok(())
}

fn lookup<'a>(tree: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(tree, |node, part| node.get(part))
}

fn lookup_mut<'a>(tree: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    key.split('.').try_fold(tree, |node, part| node.get_mut(part))
}
