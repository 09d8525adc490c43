//! Source emitter: inferred types → a formatted Go type declaration.
//!
//! Every field carries one struct tag per configured tag name, each holding
//! the raw source key verbatim, so the generated type round-trips the
//! original document regardless of how the identifier was reformatted.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::gofmt;
use crate::ir::{Field, Ty};

pub struct Codegen {
    struct_name: String,
    package: String,
    tags: Vec<String>,
    /// Canonical record body → assigned auxiliary type name. Insertion order
    /// is emission order. `None` when sub-structuring is disabled.
    sub_structs: Option<IndexMap<String, String>>,
}

impl Codegen {
    pub fn new(
        struct_name: impl Into<String>,
        package: impl Into<String>,
        tags: &[String],
        sub_structs: bool,
    ) -> Self {
        Self {
            struct_name: struct_name.into(),
            package: package.into(),
            tags: tags.to_vec(),
            sub_structs: sub_structs.then(IndexMap::new),
        }
    }

    /// Render the root type plus any hoisted auxiliaries and pass the result
    /// through the formatter. The root renders inline even with
    /// sub-structuring enabled; only nested records consult the table.
    pub fn emit(mut self, root: &Ty) -> Result<String> {
        let rendered = match root {
            Ty::Record(fields) => self.render_record_body(fields),
            Ty::Slice(elem) => match elem.as_ref() {
                Ty::Record(fields) => {
                    let body = self.render_record_body(fields);
                    format!("[]{body}")
                }
                other => format!("[]{}", self.render_type(other)),
            },
            other => self.render_type(other),
        };

        let mut src = format!(
            "package {}\n\ntype {} {}\n",
            self.package, self.struct_name, rendered
        );
        if let Some(table) = &self.sub_structs {
            for (body, name) in table {
                src.push_str(&format!("\ntype {name} {body}\n"));
            }
        }

        gofmt::format_source(&src).map_err(|e| Error::Emit {
            message: e.to_string(),
            source_text: src,
        })
    }

    fn render_type(&mut self, ty: &Ty) -> String {
        match ty {
            Ty::Unknown => "interface{}".to_string(),
            Ty::Primitive(name) => (*name).to_string(),
            Ty::Slice(elem) => format!("[]{}", self.render_type(elem)),
            Ty::Record(fields) => self.render_record(fields),
        }
    }

    /// With sub-structuring enabled, a record renders as a synthetic type
    /// name: the first record with a given canonical body allocates
    /// `<root>_sub<N>` (N counts up in table-insertion order), later records
    /// with byte-identical bodies reuse it. Disabled, the body renders
    /// inline.
    fn render_record(&mut self, fields: &[Field]) -> String {
        let body = self.render_record_body(fields);
        let Some(table) = &mut self.sub_structs else {
            return body;
        };
        if let Some(name) = table.get(&body) {
            return name.clone();
        }
        let name = format!("{}_sub{}", self.struct_name, table.len() + 1);
        table.insert(body, name.clone());
        name
    }

    fn render_record_body(&mut self, fields: &[Field]) -> String {
        let mut out = String::from("struct {");
        for field in fields {
            let ty = self.render_type(&field.ty);
            out.push('\n');
            out.push_str(&field.ident);
            out.push(' ');
            out.push_str(&ty);
            if !self.tags.is_empty() {
                out.push_str(&format!(" `{}`", self.render_tags(&field.key)));
            }
        }
        out.push_str("\n}");
        out
    }

    fn render_tags(&self, key: &str) -> String {
        self.tags
            .iter()
            .map(|tag| format!("{tag}:\"{key}\""))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
