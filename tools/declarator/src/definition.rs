use crate::{Fragment, SynthesisError, Synthesizer};
use xir_ir::{Declaration, DeclarationKind, RecordType, TypeId, TypeNode};

impl Synthesizer<'_> {
    /// Renders the definition of a record, e.g.
    /// `class D : public B , virtual private C { int x ; }`.
    ///
    /// The definition is written as it appears inside its own scope, so the record's name is
    /// not qualified. Members of anonymous record type are defined inline. Types other than
    /// records render as their plain declarator.
    pub fn record_definition(&self, id: &TypeId) -> Result<Fragment, SynthesisError> {
        let record = match self.node(id)? {
            TypeNode::Record(record) => record,
            _ => return self.synthesize(id, Fragment::new()),
        };
        let mut out = Fragment::name(record.tag.keyword());
        if let Some(name) = &record.name {
            out.append(name.as_str());
            if let Some(args) = &record.template_args {
                out.append_all(self.template_arguments(args)?);
            }
        }
        out.append_all(self.base_clause(id)?);
        out.append("{");
        for member in &record.members {
            match self.inline_record(&member.ty) {
                Some(_) => {
                    out.append_all(self.record_definition(&member.ty)?);
                    if !member.name.is_empty() {
                        out.append(member.name.as_str());
                    }
                }
                None => out.append_all(self.synthesize_named(&member.ty, &member.name)?),
            }
            out.append(";");
        }
        out.append("}");
        Ok(out)
    }

    /// Renders an enum definition, e.g. `enum class Color : unsigned char { Red , Green }`.
    pub fn enum_definition(&self, id: &TypeId) -> Result<Fragment, SynthesisError> {
        let e = match self.node(id)? {
            TypeNode::Enum(e) => e,
            _ => return self.synthesize(id, Fragment::new()),
        };
        let mut out = Fragment::name("enum");
        if e.scoped {
            out.append("class");
        }
        match &e.name {
            Some(name) => out.append(name.as_str()),
            None if e.scoped => out.append(self.anonymous_name(id.as_str())),
            None => {}
        }
        if let Some(underlying) = &e.underlying {
            out.append(":");
            out.append_all(self.declarator_or_incomplete(underlying, Fragment::new())?);
        }
        out.append("{");
        for (i, enumerator) in e.enumerators.iter().enumerate() {
            if i > 0 {
                out.append(",");
            }
            out.append(enumerator.as_str());
        }
        out.append("}");
        Ok(out)
    }

    /// `: access base , ...`, or nothing for a record without bases. Anonymous bases are
    /// named by their synthetic name.
    pub fn base_clause(&self, id: &TypeId) -> Result<Fragment, SynthesisError> {
        let mut out = Fragment::new();
        let TypeNode::Record(record) = self.node(id)? else {
            return Ok(out);
        };
        for (i, base) in record.bases.iter().enumerate() {
            out.append(if i == 0 { ":" } else { "," });
            if base.is_virtual {
                out.append("virtual");
            }
            out.append(base.access.keyword());
            out.append_all(self.type_name(&base.ty)?);
        }
        Ok(out)
    }

    /// The declarator of a recorded declaration, without the trailing `;`. A variable or
    /// typedef of anonymous record type carries the record's definition inline, as in
    /// `struct { int x; } v`.
    pub fn declaration(&self, decl: &Declaration) -> Result<Fragment, SynthesisError> {
        if decl.kind != DeclarationKind::Function && self.inline_record(&decl.ty).is_some() {
            let mut out = self.record_definition(&decl.ty)?;
            out.append(decl.name.as_str());
            if decl.kind == DeclarationKind::Typedef {
                out.prepend("typedef");
            }
            return Ok(out);
        }
        match decl.kind {
            DeclarationKind::Variable => self.synthesize_named(&decl.ty, &decl.name),
            DeclarationKind::Function => {
                self.synthesize_function(&decl.ty, &decl.name, &decl.params)
            }
            DeclarationKind::Typedef => {
                let mut out = self.synthesize_named(&decl.ty, &decl.name)?;
                out.prepend("typedef");
                Ok(out)
            }
        }
    }

    /// The anonymous, complete record behind `id`, if any.
    fn inline_record(&self, id: &TypeId) -> Option<&RecordType> {
        match self.types.get(id) {
            Some(TypeNode::Record(record)) if record.name.is_none() && record.complete => {
                Some(record)
            }
            _ => None,
        }
    }
}
