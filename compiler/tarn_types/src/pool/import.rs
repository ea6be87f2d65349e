//! Moving types between a pool and its clones.

use smallvec::SmallVec;

use crate::{Idx, Pool, Tag};

impl Pool {
    /// Re-intern `ty`, a type of `from`, in this pool.
    ///
    /// `from` must be a clone of this pool (or of an ancestor state of it).
    /// Variables are followed through their links in `from`. Variables that
    /// only exist in `from` become fresh variables here.
    pub fn import(&mut self, from: &Pool, ty: Idx) -> Idx {
        let ty = from.resolved(ty);
        if ty.is_primitive() {
            return ty;
        }

        match from.tag(ty) {
            Tag::Ref => {
                let inner = self.import(from, from.inner(ty));
                self.reference(inner)
            }
            Tag::MutRef => {
                let inner = self.import(from, from.inner(ty));
                self.mut_reference(inner)
            }
            Tag::Slice => {
                let elem = self.import(from, from.inner(ty));
                self.slice(elem)
            }
            Tag::Array => {
                let elem = self.import(from, from.array_elem(ty));
                self.array(elem, from.array_len(ty))
            }
            Tag::Applied => {
                let args: SmallVec<[Idx; 4]> = from
                    .applied_args(ty)
                    .into_iter()
                    .map(|arg| self.import(from, arg))
                    .collect();
                self.applied(from.applied_name(ty), &args)
            }
            Tag::Dyn => self.dyn_trait_object(from.dyn_trait(ty)),
            Tag::BoundVar => self.bound_var(from.bound_index(ty)),
            Tag::Var | Tag::RigidVar => {
                let id = from.data(ty);
                if (id as usize) < self.var_count() {
                    self.intern(from.tag(ty), id)
                } else {
                    self.fresh_var()
                }
            }
            _ => ty,
        }
    }
}
