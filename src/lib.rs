//! Generate Go struct definitions from JSON or YAML documents.
//!
//! The pipeline is a single synchronous pass: decode the document into a
//! format-agnostic value tree, unify it into an inferred record type, then
//! emit and format a Go type declaration. Everything is scoped to one
//! [`generate`] call; there is no cross-call state.
//!
//! ```
//! use gostruct::parse::Format;
//! use gostruct::{Options, generate};
//!
//! let options = Options {
//!     struct_name: "User".to_string(),
//!     package: "main".to_string(),
//!     tags: vec!["json".to_string()],
//!     sub_structs: false,
//!     force_floats: false,
//!     format: Format::Json,
//! };
//! let source = generate(br#"{"login": "octocat", "id": 1}"#, &options).unwrap();
//! assert!(source.contains("Login string `json:\"login\"`"));
//! assert!(source.contains("ID    int    `json:\"id\"`"));
//! ```

pub mod cli;
pub mod codegen;
pub mod error;
pub mod gofmt;
pub mod ident;
pub mod infer;
pub mod ir;
pub mod parse;
pub mod value;

use crate::codegen::Codegen;
use crate::error::{Error, Result};
use crate::infer::Config;
use crate::parse::Format;
use crate::value::Value;

/// Configuration for one `generate` call.
#[derive(Debug, Clone)]
pub struct Options {
    /// Name of the generated root type.
    pub struct_name: String,
    /// Go package the declaration is emitted into.
    pub package: String,
    /// Tag names attached to every field, each carrying the raw source key.
    pub tags: Vec<String>,
    /// Hoist repeated nested record shapes into shared named types.
    pub sub_structs: bool,
    /// Type every number as `float64`, skipping integer recovery.
    pub force_floats: bool,
    pub format: Format,
}

/// Infer a schema from `input` and render it as a formatted Go declaration.
///
/// Pure and deterministic: byte-identical input with identical options yields
/// byte-identical output.
pub fn generate(input: &[u8], options: &Options) -> Result<String> {
    let root = parse::parse_document(input, options.format)?;
    check_top_level(&root)?;
    let config = Config {
        force_floats: options.force_floats,
    };
    let ty = infer::infer(&root, &config);
    Codegen::new(
        &options.struct_name,
        &options.package,
        &options.tags,
        options.sub_structs,
    )
    .emit(&ty)
}

/// Only mappings and non-empty sequences of mappings have an inferable field
/// shape at the top level.
fn check_top_level(root: &Value) -> Result<()> {
    match root {
        Value::Map(_) => Ok(()),
        Value::Seq(elems) if elems.is_empty() => Err(Error::UnsupportedShape(
            "top-level sequence is empty, no field shape can be inferred".to_string(),
        )),
        Value::Seq(elems) => {
            if elems.iter().all(|e| matches!(e, Value::Map(_))) {
                Ok(())
            } else {
                Err(Error::UnsupportedShape(
                    "top-level sequence must contain only mappings".to_string(),
                ))
            }
        }
        other => Err(Error::UnsupportedShape(format!(
            "expected a mapping or a sequence of mappings, got {}",
            other.kind()
        ))),
    }
}
