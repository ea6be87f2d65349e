//! Type system core for Tarn.
//!
//! - All types are interned in a [`Pool`] and referenced by [`Idx`]
//! - Type equality is index equality
//! - Unification links variables in place; snapshots make it transactional
//! - [`TraitRegistry`] is the impl database consulted by method resolution

mod flags;
mod head;
mod idx;
mod item;
mod pool;
mod registry;
mod tag;
mod unify;

pub use flags::TypeFlags;
pub use head::TypeHead;
pub use idx::Idx;
pub use item::Item;
pub use pool::{Pool, Snapshot, VarState};
pub use registry::{
    ConversionRule, ImplEntry, ImplId, MethodSig, SelfShape, TraitEntry, TraitId, TraitRegistry,
    WhereConstraint,
};
pub use tag::Tag;
pub use unify::{UnifyContext, UnifyEngine, UnifyError};
