//! Minimal CLI: flags → schema → JSON Schema document
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use json_schema_dsl::{Attr, Format, Kind, Schema};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// build a JSON Schema node from command line attributes and print the encoded document
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// build one schema node and emit it as JSON
    Emit(EmitOut),
    /// list the accepted `format` values
    Formats,
}

#[derive(Args, Debug, Clone)]
struct SchemaSettings {
    /// schema kind (object, array, string, integer, number, boolean, null, oneOf, allOf, anyOf)
    #[arg(long, short)]
    kind: Kind,

    /// attribute as key=value, applied in order (e.g. minLength=2, enum=a,b, items=string)
    #[arg(long = "set", short = 's')]
    attrs: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct EmitOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// single-line output
    #[arg(long)]
    compact: bool,

    /// print the parsed arguments to stderr and exit without building
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaSettings {
    fn build(&self) -> Result<Schema> {
        let attrs = self.attrs
            .iter()
            .map(|raw| {
                Attr::parse(self.kind, raw).with_context(|| format!("bad attribute `{raw}`"))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(kind = %self.kind, attrs = attrs.len(), "building schema");
        let schema = json_schema_dsl::attr::build(self.kind, attrs)
            .with_context(|| format!("failed to build `{}` schema", self.kind))?;
        Ok(schema)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Emit(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(())
                }

                let schema = target.schema_settings.build()?;
                let schema_src = if target.compact {
                    json_schema_dsl::to_json_string(&schema)?
                } else {
                    json_schema_dsl::to_json_string_pretty(&schema)?
                };

                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    std::fs::write(out, &schema_src)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    info!(path = %out.display(), "schema written");
                } else {
                    println!("{schema_src}");
                }
            }
            Command::Formats => {
                for f in Format::ALL {
                    println!("{f}");
                }
            }
        }
        Ok(())
    }
}
