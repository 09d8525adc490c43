//! gofmt-style formatter for the declaration subset the emitter produces.
//!
//! Stands in for Go's `go/format`: the generated source is parsed back into
//! declarations and pretty-printed with tab indentation and space-padded
//! column alignment. Parsing doubles as a syntax check; a failure here means
//! the emitter produced malformed source, which callers surface with the
//! offending text attached.
//!
//! Grammar:
//!
//! ```text
//! file  := "package" IDENT decl+
//! decl  := "type" IDENT type
//! type  := "struct" "{" field* "}" | "interface" "{" "}" | "[]" type | IDENT
//! field := IDENT type TAG?
//! ```

use std::fmt;

#[derive(Debug)]
pub struct FmtError {
    pub message: String,
    /// Byte offset into the source being formatted.
    pub offset: usize,
}

impl fmt::Display for FmtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for FmtError {}

pub fn format_source(src: &str) -> Result<String, FmtError> {
    let tokens = tokenize(src)?;
    let end = src.len();
    let file = Parser { tokens, pos: 0, end }.parse_file()?;
    Ok(print_file(&file))
}

// ------------------------------- Tokens ----------------------------------- //

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    LBrace,
    RBrace,
    /// The two-character `[]` slice marker.
    Brackets,
    /// Struct tag contents, without the enclosing backticks.
    Tag(String),
}

fn tokenize(src: &str) -> Result<Vec<(usize, Token)>, FmtError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();
    while let Some(&(i, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '{' => {
                chars.next();
                tokens.push((i, Token::LBrace));
            }
            '}' => {
                chars.next();
                tokens.push((i, Token::RBrace));
            }
            '[' => {
                chars.next();
                match chars.next() {
                    Some((_, ']')) => tokens.push((i, Token::Brackets)),
                    _ => {
                        return Err(FmtError {
                            message: "expected ']' after '['".to_string(),
                            offset: i,
                        });
                    }
                }
            }
            '`' => {
                chars.next();
                let mut tag = String::new();
                loop {
                    match chars.next() {
                        Some((_, '`')) => break,
                        Some((_, ch)) => tag.push(ch),
                        None => {
                            return Err(FmtError {
                                message: "unterminated struct tag".to_string(),
                                offset: i,
                            });
                        }
                    }
                }
                tokens.push((i, Token::Tag(tag)));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        ident.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((i, Token::Ident(ident)));
            }
            other => {
                return Err(FmtError {
                    message: format!("unexpected character {other:?}"),
                    offset: i,
                });
            }
        }
    }
    Ok(tokens)
}

// ------------------------------- Parser ----------------------------------- //

#[derive(Debug)]
struct File {
    package: String,
    decls: Vec<Decl>,
}

#[derive(Debug)]
struct Decl {
    name: String,
    ty: GoType,
}

#[derive(Debug)]
enum GoType {
    Name(String),
    Interface,
    Slice(Box<GoType>),
    Struct(Vec<StructField>),
}

#[derive(Debug)]
struct StructField {
    name: String,
    ty: GoType,
    tag: Option<String>,
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn next(&mut self) -> Option<(usize, Token)> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(i, _)| *i)
    }

    fn err<T>(&self, message: impl Into<String>) -> Result<T, FmtError> {
        Err(FmtError {
            message: message.into(),
            offset: self.offset(),
        })
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), FmtError> {
        match self.peek() {
            Some(Token::Ident(w)) if w == keyword => {
                self.pos += 1;
                Ok(())
            }
            _ => self.err(format!("expected {keyword:?}")),
        }
    }

    fn expect_token(&mut self, which: &Token) -> Result<(), FmtError> {
        if self.peek() == Some(which) {
            self.pos += 1;
            Ok(())
        } else {
            self.err(format!("expected {which:?}"))
        }
    }

    fn ident(&mut self, what: &str) -> Result<String, FmtError> {
        if let Some(Token::Ident(name)) = self.peek() {
            let name = name.clone();
            self.pos += 1;
            Ok(name)
        } else {
            self.err(format!("expected {what}"))
        }
    }

    fn parse_file(mut self) -> Result<File, FmtError> {
        self.expect_keyword("package")?;
        let package = self.ident("package name")?;
        let mut decls = Vec::new();
        while self.pos < self.tokens.len() {
            self.expect_keyword("type")?;
            let name = self.ident("type name")?;
            let ty = self.parse_type()?;
            decls.push(Decl { name, ty });
        }
        if decls.is_empty() {
            return self.err("expected at least one type declaration");
        }
        Ok(File { package, decls })
    }

    fn parse_type(&mut self) -> Result<GoType, FmtError> {
        let offset = self.offset();
        let Some((_, tok)) = self.next() else {
            return Err(FmtError {
                message: "expected a type".to_string(),
                offset,
            });
        };
        match tok {
            Token::Brackets => Ok(GoType::Slice(Box::new(self.parse_type()?))),
            Token::Ident(w) if w == "struct" => {
                self.expect_token(&Token::LBrace)?;
                let mut fields = Vec::new();
                loop {
                    match self.peek() {
                        Some(Token::RBrace) => {
                            self.pos += 1;
                            break;
                        }
                        Some(Token::Ident(_)) => {
                            let name = self.ident("field name")?;
                            let ty = self.parse_type()?;
                            let tag = if matches!(self.peek(), Some(Token::Tag(_))) {
                                match self.next() {
                                    Some((_, Token::Tag(t))) => Some(t),
                                    _ => None,
                                }
                            } else {
                                None
                            };
                            fields.push(StructField { name, ty, tag });
                        }
                        _ => return self.err("expected a field or '}' in struct body"),
                    }
                }
                Ok(GoType::Struct(fields))
            }
            Token::Ident(w) if w == "interface" => {
                self.expect_token(&Token::LBrace)?;
                self.expect_token(&Token::RBrace)?;
                Ok(GoType::Interface)
            }
            Token::Ident(name) => Ok(GoType::Name(name)),
            other => Err(FmtError {
                message: format!("unexpected token {other:?} in type"),
                offset,
            }),
        }
    }
}

// ------------------------------- Printer ---------------------------------- //

fn print_file(file: &File) -> String {
    let mut out = format!("package {}\n", file.package);
    for decl in &file.decls {
        out.push('\n');
        out.push_str("type ");
        out.push_str(&decl.name);
        out.push(' ');
        out.push_str(&print_type(&decl.ty, 0));
        out.push('\n');
    }
    out
}

/// `depth` is the indentation level of the line the type starts on.
fn print_type(ty: &GoType, depth: usize) -> String {
    match ty {
        GoType::Name(name) => name.clone(),
        GoType::Interface => "interface{}".to_string(),
        GoType::Slice(elem) => format!("[]{}", print_type(elem, depth)),
        GoType::Struct(fields) if fields.is_empty() => "struct{}".to_string(),
        GoType::Struct(fields) => {
            let mut out = String::from("struct {\n");
            out.push_str(&print_fields(fields, depth + 1));
            out.push_str(&tabs(depth));
            out.push('}');
            out
        }
    }
}

/// Column alignment applies to runs of consecutive single-line fields; a
/// struct-typed field spans lines and breaks the run, mirroring how a
/// tabwriter cell that contains a newline resets its column block.
fn print_fields(fields: &[StructField], depth: usize) -> String {
    let mut out = String::new();
    let mut run: Vec<(String, String, Option<String>)> = Vec::new();
    for field in fields {
        if is_multiline(&field.ty) {
            flush_run(&mut out, &mut run, depth);
            out.push_str(&tabs(depth));
            out.push_str(&field.name);
            out.push(' ');
            out.push_str(&print_type(&field.ty, depth));
            if let Some(tag) = &field.tag {
                out.push_str(&format!(" `{tag}`"));
            }
            out.push('\n');
        } else {
            run.push((
                field.name.clone(),
                print_type(&field.ty, depth),
                field.tag.clone(),
            ));
        }
    }
    flush_run(&mut out, &mut run, depth);
    out
}

fn is_multiline(ty: &GoType) -> bool {
    match ty {
        GoType::Struct(fields) => !fields.is_empty(),
        GoType::Slice(elem) => is_multiline(elem),
        GoType::Name(_) | GoType::Interface => false,
    }
}

fn flush_run(out: &mut String, run: &mut Vec<(String, String, Option<String>)>, depth: usize) {
    if run.is_empty() {
        return;
    }
    let name_width = run.iter().map(|(n, _, _)| n.chars().count()).max().unwrap_or(0);
    let type_width = run.iter().map(|(_, t, _)| t.chars().count()).max().unwrap_or(0);
    for (name, ty, tag) in run.drain(..) {
        out.push_str(&tabs(depth));
        match tag {
            Some(tag) => {
                out.push_str(&format!(
                    "{name:<name_width$} {ty:<type_width$} `{tag}`\n"
                ));
            }
            None => {
                out.push_str(&format!("{name:<name_width$} {ty}\n"));
            }
        }
    }
}

fn tabs(depth: usize) -> String {
    "\t".repeat(depth)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn single_field_declaration() {
        let src = "package main\n\ntype test struct {\nSample string `json:\"sample\"`\n}\n";
        let formatted = format_source(src).unwrap();
        assert_eq!(
            formatted,
            "package main\n\ntype test struct {\n\tSample string `json:\"sample\"`\n}\n"
        );
    }

    #[test]
    fn columns_align_to_the_widest_member() {
        let src = "package main\ntype T struct {\nBaz interface{} `json:\"baz\"`\nFoo string `json:\"foo\"`\n}";
        let formatted = format_source(src).unwrap();
        assert_eq!(
            formatted,
            concat!(
                "package main\n",
                "\n",
                "type T struct {\n",
                "\tBaz interface{} `json:\"baz\"`\n",
                "\tFoo string      `json:\"foo\"`\n",
                "}\n",
            )
        );
    }

    #[test]
    fn nested_struct_fields_break_alignment_runs() {
        let src = "package main\ntype T struct {\nA int `json:\"a\"`\nOwner struct {\nID int `json:\"id\"`\n} `json:\"owner\"`\nZz string `json:\"zz\"`\n}";
        let formatted = format_source(src).unwrap();
        assert_eq!(
            formatted,
            concat!(
                "package main\n",
                "\n",
                "type T struct {\n",
                "\tA int `json:\"a\"`\n",
                "\tOwner struct {\n",
                "\t\tID int `json:\"id\"`\n",
                "\t} `json:\"owner\"`\n",
                "\tZz string `json:\"zz\"`\n",
                "}\n",
            )
        );
    }

    #[test]
    fn slice_of_struct_renders_inline_body() {
        let src = "package main\ntype Users []struct {\nName string `json:\"name\"`\n}";
        let formatted = format_source(src).unwrap();
        assert_eq!(
            formatted,
            concat!(
                "package main\n",
                "\n",
                "type Users []struct {\n",
                "\tName string `json:\"name\"`\n",
                "}\n",
            )
        );
    }

    #[test]
    fn formatting_is_idempotent() {
        let src = "package main\ntype T struct {\nBaz interface{} `json:\"baz\"`\nFoo string `json:\"foo\"`\n}";
        let once = format_source(src).unwrap();
        assert_eq!(format_source(&once).unwrap(), once);
    }

    #[test]
    fn empty_struct_prints_compact() {
        let formatted = format_source("package main\ntype T struct {\n}").unwrap();
        assert_eq!(formatted, "package main\n\ntype T struct{}\n");
    }

    #[test]
    fn unbalanced_brace_is_rejected() {
        let err = format_source("package main\ntype T struct {\nA int `json:\"a\"`\n").unwrap_err();
        assert!(err.message.contains("expected a field or '}'"));
    }

    #[test]
    fn stray_token_is_rejected() {
        assert!(format_source("package main\ntype my type struct {}").is_err());
        assert!(format_source("package main\ntype T struct { A in!t }").is_err());
        assert!(format_source("no declarations here").is_err());
    }

    #[test]
    fn multiple_declarations_get_blank_line_separators() {
        let src = "package main\ntype A struct {\nB b_sub1 `json:\"b\"`\n}\ntype b_sub1 struct {\nC int `json:\"c\"`\n}";
        let formatted = format_source(src).unwrap();
        assert_eq!(
            formatted,
            concat!(
                "package main\n",
                "\n",
                "type A struct {\n",
                "\tB b_sub1 `json:\"b\"`\n",
                "}\n",
                "\n",
                "type b_sub1 struct {\n",
                "\tC int `json:\"c\"`\n",
                "}\n",
            )
        );
    }
}
