//! Thin I/O shell: flag parsing, input bytes in, formatted source out.
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use crate::Options;
use crate::parse::Format;

/// generate a Go struct definition from a JSON or YAML document
#[derive(Parser, Debug)]
#[command(name = "gostruct", version)]
pub struct CommandLineInterface {
    /// name of the generated struct
    #[arg(long, default_value = "Foo")]
    name: String,

    /// package name for the generated code
    #[arg(long, default_value = "main")]
    pkg: String,

    /// input format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    fmt: Format,

    /// struct tag to attach to each field; repeatable
    #[arg(long = "tag", default_values_t = vec![String::from("json")])]
    tags: Vec<String>,

    /// hoist repeated nested object shapes into shared named sub-structs
    #[arg(long)]
    sub_struct: bool,

    /// type every number as float64 instead of recovering integers
    #[arg(long)]
    force_floats: bool,

    /// input file; '-' or omitted reads standard input
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// output file (stdout if omitted)
    #[arg(long, short)]
    out: Option<PathBuf>,
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        let input = self.read_input()?;
        let options = Options {
            struct_name: self.name.clone(),
            package: self.pkg.clone(),
            tags: self.tags.clone(),
            sub_structs: self.sub_struct,
            force_floats: self.force_floats,
            format: self.fmt,
        };
        let source = crate::generate(&input, &options)?;
        match self.out.as_ref() {
            Some(out) => {
                if let Some(parent) = out.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                std::fs::write(out, &source)
                    .with_context(|| format!("failed to write {}", out.display()))?;
            }
            None => print!("{source}"),
        }
        Ok(())
    }

    fn read_input(&self) -> anyhow::Result<Vec<u8>> {
        match self.input.as_deref() {
            Some(path) if path != Path::new("-") => std::fs::read(path)
                .with_context(|| format!("failed to read input file {}", path.display())),
            _ => {
                let mut buf = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buf)
                    .context("failed to read standard input")?;
                Ok(buf)
            }
        }
    }
}
