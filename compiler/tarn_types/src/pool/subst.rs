//! Substitution of impl parameters.

use smallvec::SmallVec;

use crate::{Idx, Pool, Tag};

impl Pool {
    /// Replace every `BoundVar(i)` in `ty` with `args[i]`.
    ///
    /// Parameters without a corresponding argument are left in place.
    pub fn substitute_bound(&mut self, ty: Idx, args: &[Idx]) -> Idx {
        if !self.flags(ty).needs_subst() {
            return ty;
        }

        match self.tag(ty) {
            Tag::BoundVar => args
                .get(self.bound_index(ty) as usize)
                .copied()
                .unwrap_or(ty),
            Tag::Ref => {
                let inner = self.substitute_bound(self.inner(ty), args);
                self.reference(inner)
            }
            Tag::MutRef => {
                let inner = self.substitute_bound(self.inner(ty), args);
                self.mut_reference(inner)
            }
            Tag::Slice => {
                let elem = self.substitute_bound(self.inner(ty), args);
                self.slice(elem)
            }
            Tag::Array => {
                let len = self.array_len(ty);
                let elem = self.substitute_bound(self.array_elem(ty), args);
                self.array(elem, len)
            }
            Tag::Applied => {
                let name = self.applied_name(ty);
                let substituted: SmallVec<[Idx; 4]> = self
                    .applied_args(ty)
                    .into_iter()
                    .map(|arg| self.substitute_bound(arg, args))
                    .collect();
                self.applied(name, &substituted)
            }
            _ => ty,
        }
    }
}
