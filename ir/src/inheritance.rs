//! The inheritance side table: one record per base specifier, kept in declaration order.

use crate::ids::TypeId;
use crate::type_graph::Access;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BaseClassRecord {
    pub derived: TypeId,
    pub base: TypeId,
    pub access: Access,
    pub is_virtual: bool,
}

/// Append-only list of [BaseClassRecord]s, indexed by the derived type.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct InheritanceIndex {
    records: Vec<BaseClassRecord>,
    #[serde(skip)]
    by_derived: HashMap<TypeId, Vec<usize>>,
}

impl InheritanceIndex {
    pub fn new() -> InheritanceIndex {
        InheritanceIndex::default()
    }

    pub fn record_base(&mut self, derived: TypeId, base: TypeId, access: Access, is_virtual: bool) {
        self.by_derived
            .entry(derived.clone())
            .or_default()
            .push(self.records.len());
        self.records.push(BaseClassRecord {
            derived,
            base,
            access,
            is_virtual,
        });
    }

    /// The bases of `derived` in the order they were recorded. Empty for unknown types.
    pub fn bases_of(&self, derived: &TypeId) -> Vec<&BaseClassRecord> {
        match self.by_derived.get(derived) {
            Some(slots) => slots.iter().map(|&i| &self.records[i]).collect(),
            None => vec![],
        }
    }

    pub fn has_bases(&self, derived: &TypeId) -> bool {
        self.by_derived.contains_key(derived)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BaseClassRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bases_keep_declaration_order() {
        let mut index = InheritanceIndex::new();
        let (d, e) = (TypeId::new("C0003"), TypeId::new("S0004"));
        index.record_base(d.clone(), TypeId::new("C0001"), Access::Public, false);
        index.record_base(e.clone(), TypeId::new("C0001"), Access::Public, false);
        index.record_base(d.clone(), TypeId::new("C0002"), Access::Private, true);

        let bases: Vec<_> = index.bases_of(&d).iter().map(|r| r.base.as_str()).collect();
        assert_eq!(bases, ["C0001", "C0002"]);
        assert!(index.bases_of(&d)[1].is_virtual);
        assert_eq!(index.bases_of(&e).len(), 1);
        assert!(index.bases_of(&TypeId::new("int")).is_empty());
        assert!(!index.has_bases(&TypeId::new("int")));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn serializes_records_only() {
        let mut index = InheritanceIndex::new();
        index.record_base(TypeId::new("C0002"), TypeId::new("C0001"), Access::Protected, false);
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json["records"][0]["access"], "protected");
        assert!(json.get("by_derived").is_none());
    }
}
