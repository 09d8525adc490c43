// Strongly-typed IR for codegen. No document values past this point.

/// Inferred schema type for one document position.
#[derive(Debug, Clone, PartialEq)]
pub enum Ty {
    /// Null evidence or irreconcilable shapes; renders as `interface{}`.
    Unknown,
    /// A Go scalar type name: "string", "bool", "int", "float64".
    Primitive(&'static str),
    Slice(Box<Ty>),
    /// Fields in lexicographic raw-key order, for deterministic codegen.
    Record(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Raw source key, preserved verbatim for the serialization tags.
    pub key: String,
    /// Exported Go identifier derived from `key`.
    pub ident: String,
    pub ty: Ty,
}
