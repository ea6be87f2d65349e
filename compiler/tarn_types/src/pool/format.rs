//! Human-readable type rendering for diagnostics.

use tarn_ir::StringInterner;

use crate::{Idx, Pool, Tag, VarState};

impl Pool {
    /// Render a type the way it would be written in source.
    ///
    /// Variables are followed through their links. Unbound variables print
    /// as their name or `?N`, impl parameters as `_`.
    pub fn format_type(&self, idx: Idx, interner: &StringInterner) -> String {
        let mut out = String::new();
        self.write_type(idx, interner, &mut out);
        out
    }

    fn write_type(&self, idx: Idx, interner: &StringInterner, out: &mut String) {
        let idx = self.resolved(idx);
        let tag = self.tag(idx);

        match tag {
            _ if tag.is_primitive() => out.push_str(tag.name()),
            Tag::Ref => {
                out.push('&');
                self.write_type(self.inner(idx), interner, out);
            }
            Tag::MutRef => {
                out.push_str("&mut ");
                self.write_type(self.inner(idx), interner, out);
            }
            Tag::Slice => {
                out.push('[');
                self.write_type(self.inner(idx), interner, out);
                out.push(']');
            }
            Tag::Array => {
                out.push('[');
                self.write_type(self.array_elem(idx), interner, out);
                out.push_str("; ");
                out.push_str(&self.array_len(idx).to_string());
                out.push(']');
            }
            Tag::Dyn => {
                out.push_str("dyn ");
                out.push_str(interner.lookup(self.dyn_trait(idx)));
            }
            Tag::Applied => {
                out.push_str(interner.lookup(self.applied_name(idx)));
                let args = self.applied_args(idx);
                if !args.is_empty() {
                    out.push('<');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.write_type(*arg, interner, out);
                    }
                    out.push('>');
                }
            }
            Tag::Var => match self.var_state(self.data(idx)) {
                VarState::Unbound {
                    name: Some(name), ..
                } => out.push_str(interner.lookup(*name)),
                VarState::Unbound { id, .. } => {
                    out.push('?');
                    out.push_str(&id.to_string());
                }
                // `resolved` stopped, so this is not a link; rigid is tagged separately.
                VarState::Link { .. } | VarState::Rigid { .. } => out.push('?'),
            },
            Tag::RigidVar => match self.rigid_name(idx) {
                Some(name) => out.push_str(interner.lookup(name)),
                None => out.push('?'),
            },
            Tag::BoundVar => out.push('_'),
            _ => out.push_str("<unknown>"),
        }
    }
}
