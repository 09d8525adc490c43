//! Document parser: input bytes plus a format selector, out comes a value
//! tree. The whole document is materialized before inference begins; there is
//! no streaming path.

use clap::ValueEnum;

use crate::error::Result;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Yaml,
}

pub fn parse_document(input: &[u8], format: Format) -> Result<Value> {
    match format {
        Format::Json => {
            let root: serde_json::Value = serde_json::from_slice(input)?;
            Ok(Value::from_json(root))
        }
        Format::Yaml => {
            let root: serde_yaml::Value = serde_yaml::from_slice(input)?;
            Ok(Value::from_yaml(root))
        }
    }
}
