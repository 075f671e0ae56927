use crate::frames::{ContainerKind, FrameContainer};
use crate::inheritance::InheritanceIndex;
use crate::tables::{NnsKind, NnsTable, TypeTable};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use xir_core::Representation;

/// The complete interned IR of one translation unit.
#[derive(Debug, PartialEq, Serialize)]
pub struct TranslationUnit {
    pub types: TypeTable,
    pub scopes: NnsTable,
    pub inheritance: InheritanceIndex,
    pub root: FrameContainer,
}

impl Default for TranslationUnit {
    fn default() -> Self {
        TranslationUnit {
            types: TypeTable::new(),
            scopes: NnsTable::new(),
            inheritance: InheritanceIndex::new(),
            root: FrameContainer::new(ContainerKind::TranslationUnit, None, None),
        }
    }
}

impl TranslationUnit {
    /// Lists violations of the IR's referential invariants: type edges to ids that were never
    /// reserved, scopes whose parent is unknown, and class scopes naming unknown types.
    pub fn problems(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .types
            .dangling_references()
            .into_iter()
            .map(|(from, to)| format!("type {from} refers to unknown type {to}"))
            .collect();
        for (id, node) in self.scopes.iter() {
            if let Some(parent) = &node.parent {
                if !self.scopes.contains(parent) {
                    out.push(format!("scope {id} has unknown parent {parent}"));
                }
            }
            if let NnsKind::Class { class } = &node.kind {
                if !self.types.contains(class) {
                    out.push(format!("scope {id} names unknown class {class}"));
                }
            }
        }
        for record in self.inheritance.iter() {
            for ty in [&record.derived, &record.base] {
                if !self.types.contains(ty) {
                    out.push(format!("inheritance record refers to unknown type {ty}"));
                }
            }
        }
        out
    }
}

impl Representation for TranslationUnit {
    fn name(&self) -> &'static str {
        "xcodeml_ir"
    }

    fn materialize(&self, path: &Path) -> std::io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl fmt::Display for TranslationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "translation unit: {} types, {} scopes, {} base specifiers, {} declarations",
            self.types.iter().count(),
            self.scopes.len(),
            self.inheritance.len(),
            self.root.declarations().len()
        )?;
        for (id, node) in self.types.iter() {
            writeln!(f, "  {id}: {node}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{IdKind, ScopeId, TypeId};
    use crate::tables::NnsNode;
    use crate::type_graph::{Access, TypeNode};
    use xir_core::test_util::tempdir;

    #[test]
    fn materializes_json() {
        let mut unit = TranslationUnit::default();
        let int = unit.types.add_reserved("int", "int");
        let ptr = unit.types.reserve(IdKind::Pointer);
        unit.types.add(&ptr, TypeNode::Pointer { pointee: int });
        assert!(unit.problems().is_empty());

        let dir = tempdir().unwrap();
        let path = dir.path().join(format!("{}.json", unit.name()));
        unit.materialize(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["types"][1]["id"], "P0001");
        assert_eq!(json["scopes"][0]["id"], "global");
        assert_eq!(json["root"]["kind"], "translation_unit");
        assert!(unit.to_string().contains("P0001: pointer to int"));
    }

    #[test]
    fn reports_broken_references() {
        let mut unit = TranslationUnit::default();
        let scope = unit.scopes.reserve();
        unit.scopes.add(&scope, NnsNode {
            kind: NnsKind::Class {
                class: TypeId::new("C0009"),
            },
            parent: Some(ScopeId::new("N0042")),
        });
        unit.inheritance
            .record_base(TypeId::new("C0009"), TypeId::new("C0008"), Access::Public, false);
        assert_eq!(unit.problems().len(), 4);
    }
}
