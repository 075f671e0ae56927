//! Reconstructs the declarations of a translation unit as source text.

use declarator::{SynthesisError, Synthesizer};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::trace;
use xir_core::Representation;
use xir_core::config::{Config, Language};
use xir_ir::{
    ContainerKind, Entry, FrameContainer, NnsKind, RecordType, TranslationUnit, TypeId, TypeNode,
};

/// The reconstructed declarations, one line per definition or declaration.
pub struct Declarations {
    language: Language,
    lines: Vec<String>,
}

impl Declarations {
    /// Walks the frame containers of `unit` in order. Namespaces are reopened around their
    /// contents; the contents of function, block, template and class frames are not nameable
    /// at namespace scope and are left out. Definitions are printed where their body was seen,
    /// preceded by forward declarations when something refers to the record earlier.
    pub fn render(config: &Config, unit: &TranslationUnit) -> Result<Declarations, SynthesisError> {
        let mut out = Declarations {
            language: config.language,
            lines: vec![],
        };
        let synthesizer = Synthesizer::for_unit(config, unit);
        out.container(&synthesizer, unit, &unit.root, 0)?;
        Ok(out)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The file name the declarations are materialized under.
    pub fn file_name(&self) -> &'static str {
        match self.language {
            Language::C => "declarations.c",
            Language::Cxx => "declarations.cpp",
        }
    }

    fn container(
        &mut self,
        synthesizer: &Synthesizer<'_>,
        unit: &TranslationUnit,
        container: &FrameContainer,
        depth: usize,
    ) -> Result<(), SynthesisError> {
        // Named records mentioned so far whose definition has not been printed yet.
        let mut forward: Vec<&TypeId> = vec![];
        for entry in &container.entries {
            match entry {
                Entry::Type { id } => {
                    if printable_record(unit, id).is_some() {
                        forward.push(id);
                    }
                }
                Entry::Definition { id } => {
                    let fragment = match unit.types.get(id) {
                        Some(TypeNode::Record(record)) if record.complete => {
                            if printable_record(unit, id).is_none() {
                                continue;
                            }
                            synthesizer.record_definition(id)?
                        }
                        Some(TypeNode::Enum(e)) if e.complete => synthesizer.enum_definition(id)?,
                        _ => continue,
                    };
                    forward.retain(|pending| *pending != id);
                    self.forward_declare(unit, &mut forward, depth);
                    self.push(depth, format!("{};", fragment.render()));
                }
                Entry::Scope { .. } => {}
                Entry::Decl(decl) => {
                    let fragment = synthesizer.declaration(decl)?;
                    self.forward_declare(unit, &mut forward, depth);
                    self.push(depth, format!("{};", fragment.render()));
                }
                Entry::Frame(frame) if frame.kind == ContainerKind::Namespace => {
                    self.forward_declare(unit, &mut forward, depth);
                    let name = frame
                        .scope
                        .as_ref()
                        .and_then(|scope| unit.scopes.get(scope))
                        .and_then(|node| match &node.kind {
                            NnsKind::Namespace { name } => name.clone(),
                            _ => None,
                        });
                    match name {
                        Some(name) => self.push(depth, format!("namespace {name} {{")),
                        None => self.push(depth, "namespace {".into()),
                    }
                    self.container(synthesizer, unit, frame, depth + 1)?;
                    self.push(depth, "}".into());
                }
                Entry::Frame(frame) => {
                    trace!("Not emitting the contents of a {:?} frame", frame.kind);
                }
            }
        }
        Ok(())
    }

    /// Prints `struct Name;` for every pending record, so whatever is printed next may refer
    /// to them.
    fn forward_declare(&mut self, unit: &TranslationUnit, forward: &mut Vec<&TypeId>, depth: usize) {
        for id in forward.drain(..) {
            if let Some((record, name)) = printable_record(unit, id) {
                self.push(depth, format!("{} {name};", record.tag.keyword()));
            }
        }
    }

    fn push(&mut self, depth: usize, line: String) {
        self.lines.push(format!("{}{line}", "    ".repeat(depth)));
    }
}

/// The record behind `id` and its name, if it gets declarations of its own. Anonymous records
/// are printed inline where they are used. Class template specializations are left out: their
/// primary template is not part of the IR, and a specialization without one does not compile.
fn printable_record<'a>(unit: &'a TranslationUnit, id: &TypeId) -> Option<(&'a RecordType, &'a str)> {
    match unit.types.get(id) {
        Some(TypeNode::Record(record)) if record.template_args.is_none() => {
            record.name.as_deref().map(|name| (record, name))
        }
        _ => None,
    }
}

impl Representation for Declarations {
    fn name(&self) -> &'static str {
        "declarations"
    }

    fn materialize(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.to_string())
    }
}

impl fmt::Display for Declarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use c_ast::EventStream;
    use interner::intern_events;
    use std::sync::Arc;

    const EVENTS: &str = r#"[
        { "event": "enter_scope", "frame": "namespace", "label": "geo",
          "context": { "kind": "namespace", "decl": "0x10", "name": "geo" } },
        { "event": "decl", "decl": {
            "id": "0x11", "name": "Point",
            "context": { "kind": "namespace", "decl": "0x10", "name": "geo" },
            "kind": { "kind": "record", "tag": "struct", "members": [
                { "name": "x", "ty": { "kind": "builtin", "name": "int" } },
                { "name": "y", "ty": { "kind": "builtin", "name": "int" } } ] } } },
        { "event": "decl", "decl": {
            "id": "0x12", "name": "origin",
            "context": { "kind": "namespace", "decl": "0x10", "name": "geo" },
            "kind": { "kind": "var", "ty": { "kind": "pointer", "pointee": {
                "kind": "record", "decl": "0x11", "tag": "struct", "name": "Point",
                "context": { "kind": "namespace", "decl": "0x10", "name": "geo" } } } } } },
        { "event": "leave_scope", "frame": "namespace" },
        { "event": "decl", "decl": {
            "id": "0x13", "name": "handler",
            "kind": { "kind": "var", "ty": { "kind": "pointer", "pointee": {
                "kind": "function", "ret": { "kind": "builtin", "name": "void" },
                "params": [ { "kind": "builtin", "name": "int" } ] } } } } },
        { "event": "enter_scope", "frame": "function", "label": "main" },
        { "event": "decl", "decl": {
            "id": "0x14", "name": "local",
            "kind": { "kind": "var", "ty": { "kind": "builtin", "name": "int" } } } },
        { "event": "leave_scope", "frame": "function" }
    ]"#;

    #[test]
    fn renders_namespaces_and_declarations() {
        let config = Arc::new(Config::mock());
        let events = EventStream::from_reader(EVENTS.as_bytes()).unwrap();
        let unit = intern_events(config.clone(), events).unwrap();
        let declarations = Declarations::render(&config, &unit).unwrap();
        assert_eq!(declarations.lines(), [
            "namespace geo {",
            "    struct Point { int x; int y; };",
            "    struct geo::Point *origin;",
            "}",
            "void (*handler)(int);",
        ]);
        assert_eq!(declarations.file_name(), "declarations.cpp");
        assert!(declarations.to_string().ends_with("void (*handler)(int);\n"));
    }

    const LATE_DEFINITIONS: &str = r#"[
        { "event": "decl", "decl": { "id": "0x30", "name": "A",
            "kind": { "kind": "record", "tag": "struct" } } },
        { "event": "decl", "decl": { "id": "0x31", "name": "B",
            "kind": { "kind": "record", "tag": "struct", "members": [
                { "name": "x", "ty": { "kind": "builtin", "name": "int" } } ] } } },
        { "event": "decl", "decl": { "id": "0x30", "name": "A",
            "kind": { "kind": "record", "tag": "struct", "members": [
                { "name": "b", "ty": { "kind": "record", "decl": "0x31", "tag": "struct", "name": "B" } } ] } } },
        { "event": "decl", "decl": { "id": "0x32", "name": "Box",
            "kind": { "kind": "record", "tag": "struct", "members": [],
                "template_args": [ { "kind": "type", "ty": { "kind": "builtin", "name": "int" } } ] } } },
        { "event": "decl", "decl": { "id": "0x33",
            "kind": { "kind": "record", "tag": "struct", "members": [
                { "name": "x", "ty": { "kind": "builtin", "name": "int" } } ] } } },
        { "event": "decl", "decl": { "id": "0x34", "name": "v",
            "kind": { "kind": "var", "ty": { "kind": "record", "decl": "0x33", "tag": "struct" } } } }
    ]"#;

    #[test]
    fn definitions_follow_their_dependencies() {
        let config = Arc::new(Config::mock());
        let events = EventStream::from_reader(LATE_DEFINITIONS.as_bytes()).unwrap();
        let unit = intern_events(config.clone(), events).unwrap();
        let declarations = Declarations::render(&config, &unit).unwrap();
        // `Box<int>` has no primary template to go with it and is left out.
        assert_eq!(declarations.lines(), [
            "struct A;",
            "struct B { int x; };",
            "struct A { struct B b; };",
            "struct { int x; } v;",
        ]);
    }

    #[test]
    fn records_used_before_their_definition_are_forward_declared() {
        let events = r#"[
            { "event": "decl", "decl": { "id": "0x50", "name": "head",
                "kind": { "kind": "var", "ty": { "kind": "pointer", "pointee": {
                    "kind": "record", "decl": "0x51", "tag": "struct", "name": "Node" } } } } },
            { "event": "decl", "decl": { "id": "0x51", "name": "Node",
                "kind": { "kind": "record", "tag": "struct", "members": [] } } }
        ]"#;
        let config = Arc::new(Config::mock());
        let unit = intern_events(config.clone(), EventStream::from_reader(events.as_bytes()).unwrap())
            .unwrap();
        assert_eq!(Declarations::render(&config, &unit).unwrap().lines(), [
            "struct Node;",
            "struct Node *head;",
            "struct Node { };",
        ]);
    }
}
