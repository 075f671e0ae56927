//! Nested-name-specifiers and bare type names.

use crate::{Fragment, SynthesisError, Synthesizer};
use tracing::warn;
use xir_ir::{NnsKind, ScopeId, TypeId, TypeNode};

impl Synthesizer<'_> {
    /// The qualifying prefix that names entities declared in `scope`, e.g. `A :: B ::`.
    /// Empty for the global scope and for function bodies.
    pub fn nested_name_spec(&self, scope: &ScopeId) -> Result<Fragment, SynthesisError> {
        let node = self
            .scopes
            .get(scope)
            .ok_or_else(|| SynthesisError::UnknownScope(scope.clone()))?;
        let mut out = match (&node.kind, &node.parent) {
            // A class name carries its own prefix.
            (NnsKind::Class { .. }, _) | (_, None) => Fragment::new(),
            (_, Some(parent)) => self.nested_name_spec(parent)?,
        };
        match &node.kind {
            NnsKind::Global => {}
            NnsKind::Namespace { name: Some(name) } => {
                out.append(name.as_str());
                out.append("::");
            }
            NnsKind::Namespace { name: None } => out.append("/* anonymous namespace */"),
            NnsKind::Class { class } => {
                out.append_all(self.type_name(class)?);
                out.append("::");
            }
            // Names local to a function cannot be qualified from outside it.
            NnsKind::Local { .. } => out = Fragment::new(),
            NnsKind::Other { description } => {
                warn!("Printing placeholder for unsupported scope {scope} ({description})");
                out.append(format!("/* unsupported scope: {description} */"));
            }
        }
        Ok(out)
    }

    /// The name of a type as it appears after a keyword or before `::`: qualified, with template
    /// arguments, but without `struct`/`class`/`enum`.
    pub fn type_name(&self, id: &TypeId) -> Result<Fragment, SynthesisError> {
        let Some(node) = self.types.get(id) else {
            warn!("Type {id} is not in the type table; printing it as incomplete");
            return Ok(Fragment::name(&self.config.synthesis.incomplete_type));
        };
        match node {
            TypeNode::Record(record) => {
                let mut out = self.nested_name_spec(&record.scope)?;
                match &record.name {
                    Some(name) => out.append(name.as_str()),
                    None => out.append(self.anonymous_name(id.as_str())),
                }
                if let Some(args) = &record.template_args {
                    out.append_all(self.template_arguments(args)?);
                }
                Ok(out)
            }
            TypeNode::Enum(e) => {
                let mut out = self.nested_name_spec(&e.scope)?;
                match &e.name {
                    Some(name) => out.append(name.as_str()),
                    None => out.append(self.anonymous_name(id.as_str())),
                }
                Ok(out)
            }
            TypeNode::TemplateTypeParm {
                name, depth, index, ..
            } => Ok(match name {
                Some(name) => Fragment::name(name),
                None => Fragment::name(&format!("type-parameter-{depth}-{index}")),
            }),
            TypeNode::TemplateSpecialization { name, scope, args } => {
                let mut out = self.nested_name_spec(scope)?;
                out.append(name.as_str());
                out.append_all(self.template_arguments(args)?);
                Ok(out)
            }
            TypeNode::DependentName { qualifier, name } => {
                let mut out = self.type_name(qualifier)?;
                out.append("::");
                out.append(name.as_str());
                Ok(out)
            }
            _ => self.declarator(id, Fragment::new()),
        }
    }
}
