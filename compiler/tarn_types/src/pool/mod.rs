//! Unified type pool.
//!
//! Every type is interned here exactly once: structurally equal types get
//! the same [`Idx`]. Inference variable state lives alongside the items so
//! that unification can link variables without a separate substitution map.
//!
//! # Layout
//!
//! - `items`: one `Item` per type (tag + data)
//! - `flags`: cached `TypeFlags`, parallel to `items`
//! - `extra`: variable-length payloads (array length, applied arguments)
//! - `var_states`: one entry per inference or rigid variable
//! - `undo_log`: variable-state writes made while a snapshot is open

mod construct;
mod format;
mod import;
mod snapshot;
mod subst;

pub use snapshot::Snapshot;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tarn_ir::Name;

use crate::{Idx, Item, Tag, TypeFlags};

/// State of a type variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum VarState {
    /// Not yet unified with anything.
    Unbound {
        id: u32,
        /// Source-level name, for display only.
        name: Option<Name>,
    },
    /// Unified with `target`; follow the link to resolve.
    Link { target: Idx },
    /// Caller generic parameter; only equal to itself.
    Rigid { name: Name },
}

/// Interning key: tag plus either inline data or the extra payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum InternKey {
    Simple(Tag, u32),
    Extra(Tag, SmallVec<[u32; 6]>),
}

#[derive(Clone, Debug)]
struct UndoEntry {
    var_id: u32,
    old: VarState,
}

/// The type pool.
///
/// Cloning a pool produces an independent inference context; this is how
/// parallel probing gets a frozen view per request.
#[derive(Clone, Debug)]
pub struct Pool {
    items: Vec<Item>,
    flags: Vec<TypeFlags>,
    extra: Vec<u32>,
    intern_map: FxHashMap<InternKey, Idx>,
    var_states: Vec<VarState>,
    undo_log: Vec<UndoEntry>,
    open_snapshots: usize,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    /// Create a pool with all primitive types pre-interned at fixed indices.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new() -> Self {
        let mut pool = Pool {
            items: Vec::with_capacity(256),
            flags: Vec::with_capacity(256),
            extra: Vec::new(),
            intern_map: FxHashMap::default(),
            var_states: Vec::new(),
            undo_log: Vec::new(),
            open_snapshots: 0,
        };

        for tag in Tag::PRIMITIVES {
            let idx = Idx::from_raw(pool.items.len() as u32);
            pool.items.push(Item::primitive(tag));
            pool.flags.push(Self::primitive_flags(tag));
            pool.intern_map.insert(InternKey::Simple(tag, 0), idx);
        }

        // Reserved slots are error placeholders; they are never handed out.
        while pool.items.len() < Idx::FIRST_DYNAMIC as usize {
            pool.items.push(Item::primitive(Tag::Error));
            pool.flags.push(TypeFlags::HAS_ERROR);
        }

        pool
    }

    fn primitive_flags(tag: Tag) -> TypeFlags {
        let mut flags = TypeFlags::IS_PRIMITIVE;
        match tag {
            Tag::Error => flags |= TypeFlags::HAS_ERROR,
            Tag::Str => flags |= TypeFlags::IS_UNSIZED,
            _ => {}
        }
        flags
    }

    // === Interning ===

    /// Intern a type whose payload fits in the data field.
    #[allow(clippy::cast_possible_truncation)]
    pub fn intern(&mut self, tag: Tag, data: u32) -> Idx {
        let key = InternKey::Simple(tag, data);
        if let Some(&idx) = self.intern_map.get(&key) {
            return idx;
        }

        let flags = self.compute_flags(tag, data, &[]);
        let idx = Idx::from_raw(self.items.len() as u32);
        self.items.push(Item::new(tag, data));
        self.flags.push(flags);
        self.intern_map.insert(key, idx);
        idx
    }

    /// Intern a type whose payload is stored in the extra array.
    #[allow(clippy::cast_possible_truncation)]
    pub fn intern_complex(&mut self, tag: Tag, payload: &[u32]) -> Idx {
        debug_assert!(tag.uses_extra());
        let key = InternKey::Extra(tag, SmallVec::from_slice(payload));
        if let Some(&idx) = self.intern_map.get(&key) {
            return idx;
        }

        let flags = self.compute_flags(tag, 0, payload);
        let extra_start = self.extra.len() as u32;
        self.extra.extend_from_slice(payload);

        let idx = Idx::from_raw(self.items.len() as u32);
        self.items.push(Item::new(tag, extra_start));
        self.flags.push(flags);
        self.intern_map.insert(key, idx);
        idx
    }

    fn compute_flags(&self, tag: Tag, data: u32, payload: &[u32]) -> TypeFlags {
        match tag {
            _ if tag.is_primitive() => Self::primitive_flags(tag),
            Tag::Ref | Tag::MutRef => {
                TypeFlags::IS_REFERENCE
                    | TypeFlags::propagate_from(self.flags(Idx::from_raw(data)))
            }
            Tag::Slice => {
                TypeFlags::IS_UNSIZED | TypeFlags::propagate_from(self.flags(Idx::from_raw(data)))
            }
            Tag::Array => payload
                .first()
                .map_or(TypeFlags::empty(), |&elem| {
                    TypeFlags::propagate_from(self.flags(Idx::from_raw(elem)))
                }),
            Tag::Dyn => TypeFlags::IS_UNSIZED,
            Tag::Applied => {
                let args = payload.get(2..).unwrap_or(&[]);
                TypeFlags::IS_NOMINAL
                    | TypeFlags::propagate_all(
                        args.iter().map(|&a| self.flags(Idx::from_raw(a))),
                    )
            }
            Tag::Var => TypeFlags::HAS_VAR,
            Tag::BoundVar => TypeFlags::HAS_BOUND_VAR,
            Tag::RigidVar => TypeFlags::HAS_RIGID_VAR,
            _ => TypeFlags::empty(),
        }
    }

    // === Item Access ===

    #[inline]
    pub fn tag(&self, idx: Idx) -> Tag {
        self.items[idx.raw() as usize].tag
    }

    #[inline]
    pub fn data(&self, idx: Idx) -> u32 {
        self.items[idx.raw() as usize].data
    }

    #[inline]
    pub fn flags(&self, idx: Idx) -> TypeFlags {
        self.flags[idx.raw() as usize]
    }

    /// Number of interned types (including reserved slots).
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Never true: primitives are always present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn extra_at(&self, idx: Idx, offset: usize) -> u32 {
        self.extra[self.data(idx) as usize + offset]
    }

    // === Structural Accessors ===

    /// Pointee of `&T` / `&mut T`, or element of `[T]`.
    #[inline]
    pub fn inner(&self, idx: Idx) -> Idx {
        debug_assert!(matches!(self.tag(idx), Tag::Ref | Tag::MutRef | Tag::Slice));
        Idx::from_raw(self.data(idx))
    }

    pub fn array_elem(&self, idx: Idx) -> Idx {
        debug_assert_eq!(self.tag(idx), Tag::Array);
        Idx::from_raw(self.extra_at(idx, 0))
    }

    pub fn array_len(&self, idx: Idx) -> u32 {
        debug_assert_eq!(self.tag(idx), Tag::Array);
        self.extra_at(idx, 1)
    }

    pub fn applied_name(&self, idx: Idx) -> Name {
        debug_assert_eq!(self.tag(idx), Tag::Applied);
        Name::from_raw(self.extra_at(idx, 0))
    }

    pub fn applied_args(&self, idx: Idx) -> SmallVec<[Idx; 4]> {
        debug_assert_eq!(self.tag(idx), Tag::Applied);
        let start = self.data(idx) as usize;
        let count = self.extra[start + 1] as usize;
        self.extra[start + 2..start + 2 + count]
            .iter()
            .map(|&raw| Idx::from_raw(raw))
            .collect()
    }

    /// Trait named by a `dyn Trait` type.
    pub fn dyn_trait(&self, idx: Idx) -> Name {
        debug_assert_eq!(self.tag(idx), Tag::Dyn);
        Name::from_raw(self.data(idx))
    }

    /// Parameter index of a `BoundVar`.
    pub fn bound_index(&self, idx: Idx) -> u32 {
        debug_assert_eq!(self.tag(idx), Tag::BoundVar);
        self.data(idx)
    }

    /// Name of a rigid variable, `None` for any other type.
    pub fn rigid_name(&self, idx: Idx) -> Option<Name> {
        if self.tag(idx) != Tag::RigidVar {
            return None;
        }
        match self.var_state(self.data(idx)) {
            VarState::Rigid { name } => Some(*name),
            _ => None,
        }
    }

    // === Variables ===

    #[allow(clippy::cast_possible_truncation)]
    fn push_var_state(&mut self, make: impl FnOnce(u32) -> VarState) -> u32 {
        let id = self.var_states.len() as u32;
        self.var_states.push(make(id));
        id
    }

    /// Create a fresh unbound inference variable.
    pub fn fresh_var(&mut self) -> Idx {
        let id = self.push_var_state(|id| VarState::Unbound { id, name: None });
        self.intern(Tag::Var, id)
    }

    /// Create a fresh inference variable with a display name.
    pub fn fresh_named_var(&mut self, name: Name) -> Idx {
        let id = self.push_var_state(|id| VarState::Unbound {
            id,
            name: Some(name),
        });
        self.intern(Tag::Var, id)
    }

    /// Create a rigid variable for a caller generic parameter.
    pub fn rigid_var(&mut self, name: Name) -> Idx {
        let id = self.push_var_state(|_| VarState::Rigid { name });
        self.intern(Tag::RigidVar, id)
    }

    /// Reference to impl/rule parameter number `index`.
    pub fn bound_var(&mut self, index: u32) -> Idx {
        self.intern(Tag::BoundVar, index)
    }

    #[inline]
    pub fn var_state(&self, var_id: u32) -> &VarState {
        &self.var_states[var_id as usize]
    }

    /// Overwrite a variable's state, recording the old one if a snapshot is open.
    pub fn set_var_state(&mut self, var_id: u32, state: VarState) {
        let slot = &mut self.var_states[var_id as usize];
        if self.open_snapshots > 0 {
            let old = std::mem::replace(slot, state);
            self.undo_log.push(UndoEntry { var_id, old });
        } else {
            *slot = state;
        }
    }

    pub fn var_count(&self) -> usize {
        self.var_states.len()
    }

    /// Follow variable links without path compression.
    pub fn resolved(&self, idx: Idx) -> Idx {
        let mut current = idx;
        while self.tag(current) == Tag::Var {
            match self.var_state(self.data(current)) {
                VarState::Link { target } => current = *target,
                _ => break,
            }
        }
        current
    }
}

#[cfg(test)]
mod tests;
