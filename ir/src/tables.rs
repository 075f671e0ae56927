//! The flat id → node maps of the IR. Nodes are stored in the order their ids were minted, so
//! iteration (and therefore serialization) is deterministic.

use crate::ids::{IdKind, ScopeId, TypeId};
use crate::type_graph::TypeNode;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::ops::Index;

/// Maps type ids to type nodes.
///
/// An id is first *reserved* and later *added*. Between the two the id is pending: it is
/// known to the table (so other nodes may refer to it) but has no node yet.
#[derive(Debug, Default, PartialEq)]
pub struct TypeTable {
    id_count: u64,
    entries: Vec<(TypeId, Option<TypeNode>)>,
    index: HashMap<TypeId, usize>,
}

impl TypeTable {
    pub fn new() -> TypeTable {
        TypeTable::default()
    }

    /// Mints a fresh id of the given kind.
    pub fn reserve(&mut self, kind: IdKind) -> TypeId {
        self.id_count += 1; // uid assignment counter, not the number of entries
        let id = TypeId::minted(kind, self.id_count);
        self.insert_slot(id.clone());
        id
    }

    /// Adds a builtin type under its reserved name. Adding the same name twice is a no-op.
    pub fn add_reserved(&mut self, name: &str, spelling: &str) -> TypeId {
        let id = TypeId::new(name);
        if !self.index.contains_key(&id) {
            self.insert_slot(id.clone());
            self.add(&id, TypeNode::Reserved {
                spelling: spelling.to_string(),
            });
        }
        id
    }

    /// Stores the node for a reserved id.
    pub fn add(&mut self, id: &TypeId, node: TypeNode) {
        let slot = *self
            .index
            .get(id)
            .unwrap_or_else(|| panic!("type id {id} was never reserved"));
        debug_assert!(
            node.id_kind().is_none_or(|k| id.as_str().starts_with(k.prefix())),
            "{node} stored under mismatched id {id}"
        );
        self.entries[slot].1 = Some(node);
    }

    fn insert_slot(&mut self, id: TypeId) {
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id, None));
    }

    /// Returns the node for `id`, or `None` if the id is unknown or still pending.
    pub fn get(&self, id: &TypeId) -> Option<&TypeNode> {
        self.index
            .get(id)
            .and_then(|&slot| self.entries[slot].1.as_ref())
    }

    /// Mutable access, for completing a node whose body arrived late.
    pub fn get_mut(&mut self, id: &TypeId) -> Option<&mut TypeNode> {
        match self.index.get(id) {
            Some(&slot) => self.entries[slot].1.as_mut(),
            None => None,
        }
    }

    /// True if `id` has been reserved, whether or not its node was added yet.
    pub fn contains(&self, id: &TypeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_pending(&self, id: &TypeId) -> bool {
        self.index
            .get(id)
            .is_some_and(|&slot| self.entries[slot].1.is_none())
    }

    /// Iterates over the nodes that have been added, in minting order.
    pub fn iter(&self) -> impl Iterator<Item = (&TypeId, &TypeNode)> {
        self.entries
            .iter()
            .filter_map(|(id, node)| node.as_ref().map(|n| (id, n)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every `(referrer, referenced)` pair where `referenced` is not in the table.
    pub fn dangling_references(&self) -> Vec<(&TypeId, &TypeId)> {
        self.iter()
            .flat_map(|(id, node)| {
                node.referenced_types()
                    .into_iter()
                    .filter(|target| !self.contains(target))
                    .map(move |target| (id, target))
            })
            .collect()
    }
}

impl Index<&TypeId> for TypeTable {
    type Output = TypeNode;

    fn index(&self, index: &TypeId) -> &TypeNode {
        self.get(index)
            .unwrap_or_else(|| panic!("could not find type id: {index}"))
    }
}

#[derive(Serialize)]
struct TypeEntry<'a> {
    id: &'a TypeId,
    node: &'a TypeNode,
}

impl Serialize for TypeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(id, node)| TypeEntry { id, node }))
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NnsKind {
    Global,
    /// `name` is `None` for an anonymous namespace.
    Namespace { name: Option<String> },
    Class { class: TypeId },
    /// The body of a function; names declared there cannot be qualified from outside.
    Local { function: Option<String> },
    Other { description: String },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct NnsNode {
    #[serde(flatten)]
    pub kind: NnsKind,
    /// `None` only for the global scope.
    pub parent: Option<ScopeId>,
}

/// Maps scope ids to nested-name-specifier nodes. The global scope is always present.
#[derive(Debug, PartialEq)]
pub struct NnsTable {
    id_count: u64,
    entries: Vec<(ScopeId, Option<NnsNode>)>,
    index: HashMap<ScopeId, usize>,
}

impl Default for NnsTable {
    fn default() -> Self {
        let global = ScopeId::global();
        NnsTable {
            id_count: 0,
            entries: vec![(
                global.clone(),
                Some(NnsNode {
                    kind: NnsKind::Global,
                    parent: None,
                }),
            )],
            index: HashMap::from([(global, 0)]),
        }
    }
}

impl NnsTable {
    pub fn new() -> NnsTable {
        NnsTable::default()
    }

    pub fn reserve(&mut self) -> ScopeId {
        self.id_count += 1;
        let id = ScopeId::minted(self.id_count);
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push((id.clone(), None));
        id
    }

    pub fn add(&mut self, id: &ScopeId, node: NnsNode) {
        let slot = *self
            .index
            .get(id)
            .unwrap_or_else(|| panic!("scope id {id} was never reserved"));
        assert!(node.parent.is_some(), "only the global scope has no parent");
        self.entries[slot].1 = Some(node);
    }

    pub fn get(&self, id: &ScopeId) -> Option<&NnsNode> {
        self.index
            .get(id)
            .and_then(|&slot| self.entries[slot].1.as_ref())
    }

    pub fn contains(&self, id: &ScopeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn parent_of(&self, id: &ScopeId) -> Option<&ScopeId> {
        self.get(id).and_then(|node| node.parent.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScopeId, &NnsNode)> {
        self.entries
            .iter()
            .filter_map(|(id, node)| node.as_ref().map(|n| (id, n)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Index<&ScopeId> for NnsTable {
    type Output = NnsNode;

    fn index(&self, index: &ScopeId) -> &NnsNode {
        self.get(index)
            .unwrap_or_else(|| panic!("could not find scope id: {index}"))
    }
}

#[derive(Serialize)]
struct NnsEntry<'a> {
    id: &'a ScopeId,
    node: &'a NnsNode,
}

impl Serialize for NnsTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(id, node)| NnsEntry { id, node }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_then_add() {
        let mut table = TypeTable::new();
        let int = table.add_reserved("int", "int");
        assert_eq!(table.add_reserved("int", "int"), int);
        let ptr = table.reserve(IdKind::Pointer);
        assert_eq!(ptr.as_str(), "P0001");
        assert!(table.contains(&ptr));
        assert!(table.is_pending(&ptr));
        assert!(table.get(&ptr).is_none());

        table.add(&ptr, TypeNode::Pointer { pointee: int.clone() });
        assert!(!table.is_pending(&ptr));
        assert_eq!(table[&ptr], TypeNode::Pointer { pointee: int });
        assert_eq!(table.iter().count(), 2);
        assert!(table.dangling_references().is_empty());
    }

    #[test]
    fn reports_dangling_references() {
        let mut table = TypeTable::new();
        let ptr = table.reserve(IdKind::Pointer);
        let missing = TypeId::new("S0099");
        table.add(&ptr, TypeNode::Pointer {
            pointee: missing.clone(),
        });
        assert_eq!(table.dangling_references(), vec![(&ptr, &missing)]);
    }

    #[test]
    fn nns_table_starts_with_global() {
        let mut table = NnsTable::new();
        assert_eq!(table[&ScopeId::global()].kind, NnsKind::Global);
        let ns = table.reserve();
        table.add(&ns, NnsNode {
            kind: NnsKind::Namespace {
                name: Some("A".into()),
            },
            parent: Some(ScopeId::global()),
        });
        assert_eq!(table.parent_of(&ns), Some(&ScopeId::global()));
        assert_eq!(table.iter().count(), 2);
    }

    #[test]
    fn serializes_in_minting_order() {
        let mut table = TypeTable::new();
        table.add_reserved("char", "char");
        let ptr = table.reserve(IdKind::Pointer);
        table.add(&ptr, TypeNode::Pointer {
            pointee: TypeId::new("char"),
        });
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json[0]["id"], "char");
        assert_eq!(json[1]["id"], "P0001");
        assert_eq!(json[1]["node"]["kind"], "pointer");
        assert_eq!(json[1]["node"]["pointee"], "char");
    }
}
