//! Declarator synthesis: rendering an interned type plus a name as C/C++ declaration syntax.
//!
//! The algorithm works right to left. Each type node receives the declarator built so far (the
//! *inner* fragment, initially just the declared name) and wraps it: a pointer prepends `*`, an
//! array appends `[N]`, a function appends its parameter list. Whenever a pointer's target binds
//! tighter than `*` (functions and arrays) the inner fragment is parenthesized first, which is
//! what separates `int (*p)[3]` from `int *a[3]`.

mod definition;
mod error;
mod fragment;
mod nns;

pub use error::SynthesisError;
pub use fragment::Fragment;

use tracing::warn;
use xir_core::config::{Config, Language};
use xir_ir::{
    ArraySize, FunctionType, NnsTable, Qualifiers, TemplateArg, TranslationUnit, TypeId, TypeNode,
    TypeTable,
};

/// Renders declarators over a finished type table. Holds no state besides the tables, so any
/// number of calls may be made in any order.
#[derive(Clone, Copy)]
pub struct Synthesizer<'a> {
    config: &'a Config,
    types: &'a TypeTable,
    scopes: &'a NnsTable,
}

impl<'a> Synthesizer<'a> {
    pub fn new(config: &'a Config, types: &'a TypeTable, scopes: &'a NnsTable) -> Self {
        Synthesizer {
            config,
            types,
            scopes,
        }
    }

    pub fn for_unit(config: &'a Config, unit: &'a TranslationUnit) -> Self {
        Synthesizer::new(config, &unit.types, &unit.scopes)
    }

    /// Wraps `inner` in the declarator of type `id`.
    pub fn synthesize(&self, id: &TypeId, inner: Fragment) -> Result<Fragment, SynthesisError> {
        self.declarator(id, inner)
    }

    /// The declarator of a variable or parameter called `name`.
    pub fn synthesize_named(&self, id: &TypeId, name: &str) -> Result<Fragment, SynthesisError> {
        self.declarator(id, Fragment::name(name))
    }

    /// Like [Synthesizer::synthesize_named], but names the parameters of a function type.
    pub fn synthesize_function(
        &self,
        id: &TypeId,
        name: &str,
        param_names: &[String],
    ) -> Result<Fragment, SynthesisError> {
        match self.node(id)? {
            TypeNode::Function(function) => {
                let mut inner = Fragment::name(name);
                inner.append_all(self.parameter_list(function, param_names)?);
                self.declarator_or_incomplete(&function.ret, inner)
            }
            _ => self.synthesize_named(id, name),
        }
    }

    fn node(&self, id: &TypeId) -> Result<&'a TypeNode, SynthesisError> {
        self.types
            .get(id)
            .ok_or_else(|| SynthesisError::UnknownType(id.clone()))
    }

    fn declarator(&self, id: &TypeId, mut inner: Fragment) -> Result<Fragment, SynthesisError> {
        match self.node(id)? {
            TypeNode::Reserved { spelling } => {
                inner.prepend(spelling.as_str());
                Ok(inner)
            }
            TypeNode::Qualified { unqualified, quals } => self.qualified(unqualified, *quals, inner),
            TypeNode::Pointer { pointee } => self.pointer_like(pointee, "*", inner),
            TypeNode::Reference { referee, ref_kind } => {
                self.pointer_like(referee, ref_kind.token(), inner)
            }
            TypeNode::MemberPointer { class, pointee } => {
                let mut outer = self.type_name(class)?;
                outer.append("::");
                outer.append("*");
                outer.append_all(inner);
                outer.parenthesize();
                self.declarator_or_incomplete(pointee, outer)
            }
            TypeNode::Array { element, size } => {
                inner.append_all(array_suffix(size));
                self.declarator_or_incomplete(element, inner)
            }
            TypeNode::Function(function) => {
                inner.append_all(self.parameter_list(function, &[])?);
                self.declarator_or_incomplete(&function.ret, inner)
            }
            TypeNode::Record(record) => {
                let mut head = Fragment::name(record.tag.keyword());
                head.append_all(self.type_name(id)?);
                head.append_all(inner);
                Ok(head)
            }
            TypeNode::Enum(_) => {
                let mut head = Fragment::name("enum");
                head.append_all(self.type_name(id)?);
                head.append_all(inner);
                Ok(head)
            }
            TypeNode::TemplateTypeParm { .. } | TypeNode::TemplateSpecialization { .. } => {
                let mut head = self.type_name(id)?;
                head.append_all(inner);
                Ok(head)
            }
            TypeNode::DependentName { .. } => {
                let mut head = Fragment::name("typename");
                head.append_all(self.type_name(id)?);
                head.append_all(inner);
                Ok(head)
            }
            TypeNode::PackExpansion { pattern } => {
                inner.prepend("...");
                self.declarator_or_incomplete(pattern, inner)
            }
            TypeNode::UnaryTransform { transform, base } => {
                let mut head = Fragment::name(transform);
                head.append("(");
                head.append_all(self.declarator_or_incomplete(base, Fragment::new())?);
                head.append(")");
                head.append_all(inner);
                Ok(head)
            }
            TypeNode::Atomic { value } => {
                let mut head = Fragment::name("_Atomic");
                head.append("(");
                head.append_all(self.declarator_or_incomplete(value, Fragment::new())?);
                head.append(")");
                head.append_all(inner);
                Ok(head)
            }
            TypeNode::Other { description } => {
                warn!("Printing placeholder for unsupported type {id} ({description})");
                inner.prepend(format!("/* unsupported type: {description} */"));
                inner.prepend(self.config.synthesis.unsupported_type.as_str());
                Ok(inner)
            }
        }
    }

    /// Synthesizes a type reached through an edge of another node. A target missing from the
    /// table is not a contract violation here; it prints as the incomplete-type placeholder.
    fn declarator_or_incomplete(
        &self,
        id: &TypeId,
        mut inner: Fragment,
    ) -> Result<Fragment, SynthesisError> {
        if self.types.get(id).is_some() {
            return self.declarator(id, inner);
        }
        warn!("Type {id} is not in the type table; printing it as incomplete");
        inner.prepend(self.config.synthesis.incomplete_type.as_str());
        Ok(inner)
    }

    fn pointer_like(
        &self,
        target: &TypeId,
        token: &str,
        mut inner: Fragment,
    ) -> Result<Fragment, SynthesisError> {
        inner.prepend(token);
        if self.binds_tighter(target) {
            inner.parenthesize();
        }
        self.declarator_or_incomplete(target, inner)
    }

    /// True if a declarator for `id` appends to the inner fragment, so a pointer to it needs
    /// parentheses.
    fn binds_tighter(&self, id: &TypeId) -> bool {
        match self.types.get(id) {
            Some(TypeNode::Qualified { unqualified, .. }) => self.binds_tighter(unqualified),
            Some(TypeNode::Function(_) | TypeNode::Array { .. }) => true,
            _ => false,
        }
    }

    /// Qualifiers of a pointer-like type sit right of its `*`; qualifiers of an array apply to
    /// its elements; everything else gets its qualifiers in front.
    fn qualified(
        &self,
        unqualified: &TypeId,
        quals: Qualifiers,
        mut inner: Fragment,
    ) -> Result<Fragment, SynthesisError> {
        let Some(node) = self.types.get(unqualified) else {
            warn!("Type {unqualified} is not in the type table; printing it as incomplete");
            inner.prepend(self.config.synthesis.incomplete_type.as_str());
            inner.prepend_all(self.qualifier_tokens(quals));
            return Ok(inner);
        };
        if node.is_pointer_like() {
            inner.prepend_all(self.qualifier_tokens(quals));
            return self.declarator(unqualified, inner);
        }
        if let TypeNode::Array { element, size } = node {
            inner.append_all(array_suffix(size));
            return match self.types.get(element) {
                Some(_) => self.qualified(element, quals, inner),
                None => self.declarator_or_incomplete(element, inner),
            };
        }
        let mut out = self.declarator(unqualified, inner)?;
        out.prepend_all(self.qualifier_tokens(quals));
        Ok(out)
    }

    fn qualifier_tokens(&self, quals: Qualifiers) -> Fragment {
        let mut out = Fragment::new();
        if quals.is_const {
            out.append("const");
        }
        if quals.is_volatile {
            out.append("volatile");
        }
        if quals.is_restrict {
            out.append(match self.config.language {
                Language::C => "restrict",
                Language::Cxx => "__restrict",
            });
        }
        out
    }

    /// `( params ) cv ref`, with parameter names taken from `names` where present.
    fn parameter_list(
        &self,
        function: &FunctionType,
        names: &[String],
    ) -> Result<Fragment, SynthesisError> {
        let mut out = Fragment::name("(");
        for (i, param) in function.params.iter().enumerate() {
            if i > 0 {
                out.append(",");
            }
            let name = names.get(i).map(String::as_str).unwrap_or("");
            out.append_all(self.declarator_or_incomplete(param, Fragment::name(name))?);
        }
        if function.variadic {
            if !function.params.is_empty() {
                out.append(",");
            }
            out.append("...");
        } else if function.params.is_empty()
            && function.has_prototype
            && self.config.language == Language::C
        {
            out.append("void");
        }
        out.append(")");
        out.append_all(self.qualifier_tokens(function.quals));
        if let Some(ref_kind) = function.ref_qualifier {
            out.append(ref_kind.token());
        }
        Ok(out)
    }

    /// `< args >`
    fn template_arguments(&self, args: &[TemplateArg]) -> Result<Fragment, SynthesisError> {
        let mut out = Fragment::name("<");
        self.append_arguments(args, &mut out)?;
        out.append(">");
        Ok(out)
    }

    fn append_arguments(&self, args: &[TemplateArg], out: &mut Fragment) -> Result<(), SynthesisError> {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.append(",");
            }
            match arg {
                TemplateArg::Type(id) if self.types.get(id).is_some() => {
                    out.append_all(self.declarator(id, Fragment::new())?);
                }
                TemplateArg::Literal(text) | TemplateArg::Template(text) => out.append(text.as_str()),
                TemplateArg::Pack(inner) => self.append_arguments(inner, out)?,
                TemplateArg::Type(_) | TemplateArg::Unresolved(_) => {
                    warn!("Printing placeholder for unresolved template argument {arg}");
                    out.append(format!("/* {} */", self.config.synthesis.unresolved_argument));
                }
            }
        }
        Ok(())
    }

    /// The synthetic name of an anonymous record, enum or namespace.
    fn anonymous_name(&self, id: &str) -> String {
        format!("{}{id}", self.config.synthesis.anonymous_prefix)
    }
}

fn array_suffix(size: &ArraySize) -> Fragment {
    let mut out = Fragment::name("[");
    match size {
        ArraySize::Fixed(n) => out.append(n.to_string()),
        ArraySize::Incomplete => {}
        ArraySize::Variable => out.append("*"),
        ArraySize::Dependent(expr) => out.append(expr.as_str()),
    }
    out.append("]");
    out
}
