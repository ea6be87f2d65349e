//! Outermost type constructor, used as the impl index key.

use tarn_ir::Name;

use crate::{Pool, Tag};

/// The outermost constructor of a type, ignoring its arguments.
///
/// Two types can only unify if they have the same head (or one of them is a
/// variable), so impls are bucketed by the head of their self type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeHead {
    Prim(Tag),
    Ref,
    MutRef,
    Slice,
    Array,
    Adt(Name),
    Dyn(Name),
}

impl Pool {
    /// Head of `ty` after following variable links.
    ///
    /// Returns `None` for variables and parameters (no fixed head) and for
    /// the error type.
    pub fn type_head(&self, ty: crate::Idx) -> Option<TypeHead> {
        let ty = self.resolved(ty);
        let tag = self.tag(ty);
        match tag {
            Tag::Error => None,
            _ if tag.is_primitive() => Some(TypeHead::Prim(tag)),
            Tag::Ref => Some(TypeHead::Ref),
            Tag::MutRef => Some(TypeHead::MutRef),
            Tag::Slice => Some(TypeHead::Slice),
            Tag::Array => Some(TypeHead::Array),
            Tag::Applied => Some(TypeHead::Adt(self.applied_name(ty))),
            Tag::Dyn => Some(TypeHead::Dyn(self.dyn_trait(ty))),
            _ => None,
        }
    }
}
