//! Schema command implementation for scenario and configuration files

use anyhow::{Context, Result};
use clap::Args;
use schemars::schema_for;
use serde_json::Value;
use std::{fs, path::PathBuf};

use dialog_stack::scenario::Scenario;
use dialog_stack::Config;

/// Generate JSON schemas
#[derive(Debug, Args)]
pub struct SchemaCommand {
    /// Which document the schema describes
    #[arg(short, long, default_value = "scenario")]
    pub target: SchemaTarget,

    /// Output format for schema generation
    #[arg(short, long, default_value = "json")]
    pub format: SchemaFormat,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaTarget {
    Scenario,
    Config,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaCommand {
    /// Execute the schema command
    pub async fn execute(&self) -> Result<()> {
        let output = self.render()?;

        if let Some(ref output_path) = self.output {
            fs::write(output_path, output)
                .with_context(|| format!("Failed to write schema to: {}", output_path.display()))?;
            println!("Schema written to: {}", output_path.display());
        } else {
            println!("{}", output);
        }

        Ok(())
    }

    fn render(&self) -> Result<String> {
        let (schema, title) = match self.target {
            SchemaTarget::Scenario => (schema_for!(Scenario), "dialog-stack scenario"),
            SchemaTarget::Config => (schema_for!(Config), "dialog-stack configuration"),
        };
        let mut schema_value = serde_json::to_value(schema)
            .context("Failed to convert schema to JSON value")?;

        if let Some(obj) = schema_value.as_object_mut() {
            obj.insert("title".to_string(), Value::String(title.to_string()));
        }

        let output = match self.format {
            SchemaFormat::Json => serde_json::to_string_pretty(&schema_value)?,
            SchemaFormat::Yaml => {
                serde_yaml::to_string(&schema_value).context("Failed to convert schema to YAML")?
            }
        };
        Ok(output)
    }
}
