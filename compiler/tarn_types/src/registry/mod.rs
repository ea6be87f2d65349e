//! Registry for traits, impls and conversion rules.
//!
//! The `TraitRegistry` is the read-only impl database consulted by method
//! resolution. It never changes while a call site is being probed.
//!
//! # Design
//!
//! - Traits and impls live in `Vec`s and are referred to by dense ids
//! - Traits indexed by name (`BTreeMap` for deterministic iteration)
//! - Impls indexed by the [`TypeHead`] of their self type; impls whose self
//!   type is a bare parameter (`impl<T> Tr for T`) go in a blanket list
//! - Secondary index by trait, for constraint evaluation
//! - User-declared deref and unsize rules, written with impl parameters

use std::collections::{BTreeMap, VecDeque};

use rustc_hash::{FxHashMap, FxHashSet};
use tarn_ir::Name;

use crate::{Idx, Pool, TypeHead};

/// Dense trait identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitId(u32);

/// Dense impl identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ImplId(u32);

impl TraitId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl ImplId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// How a method takes its receiver: `self`, `&self` or `&mut self`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum SelfShape {
    ByValue,
    ByRef,
    ByMutRef,
}

impl SelfShape {
    /// The receiver type this shape expects when the impl self type is `self_ty`.
    pub fn apply(self, pool: &mut Pool, self_ty: Idx) -> Idx {
        match self {
            SelfShape::ByValue => self_ty,
            SelfShape::ByRef => pool.reference(self_ty),
            SelfShape::ByMutRef => pool.mut_reference(self_ty),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SelfShape::ByValue => "self",
            SelfShape::ByRef => "&self",
            SelfShape::ByMutRef => "&mut self",
        }
    }
}

/// A method signature, as far as method lookup cares.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodSig {
    pub name: Name,
    /// `None` for associated functions (no `self` parameter).
    pub receiver: Option<SelfShape>,
}

impl MethodSig {
    pub fn method(name: Name, receiver: SelfShape) -> Self {
        MethodSig {
            name,
            receiver: Some(receiver),
        }
    }

    pub fn associated(name: Name) -> Self {
        MethodSig {
            name,
            receiver: None,
        }
    }
}

/// A registered trait definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraitEntry {
    pub name: Name,
    /// Direct parents in the super-trait DAG.
    pub super_traits: Vec<TraitId>,
    pub methods: FxHashMap<Name, MethodSig>,
}

impl TraitEntry {
    pub fn new(name: Name) -> Self {
        TraitEntry {
            name,
            super_traits: Vec::new(),
            methods: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_super_trait(mut self, super_trait: TraitId) -> Self {
        self.super_traits.push(super_trait);
        self
    }

    #[must_use]
    pub fn with_method(mut self, sig: MethodSig) -> Self {
        self.methods.insert(sig.name, sig);
        self
    }
}

/// A where-clause constraint: `ty: Bound1 + Bound2`.
///
/// `ty` is written in terms of the impl's parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WhereConstraint {
    pub ty: Idx,
    pub bounds: Vec<TraitId>,
}

/// An inherent or trait implementation.
///
/// `self_type` and the where-clause types refer to the impl's own generic
/// parameters as `BoundVar(0..type_params.len())`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImplEntry {
    /// The trait being implemented (`None` for inherent impls).
    pub trait_id: Option<TraitId>,
    pub type_params: Vec<Name>,
    pub self_type: Idx,
    /// Methods defined in an inherent impl. Trait impls provide the trait's
    /// methods and leave this empty.
    pub methods: FxHashMap<Name, MethodSig>,
    pub where_clause: Vec<WhereConstraint>,
}

impl ImplEntry {
    /// An inherent impl `impl<params> self_type { .. }`.
    pub fn inherent(type_params: Vec<Name>, self_type: Idx) -> Self {
        ImplEntry {
            trait_id: None,
            type_params,
            self_type,
            methods: FxHashMap::default(),
            where_clause: Vec::new(),
        }
    }

    /// A trait impl `impl<params> Trait for self_type`.
    pub fn of_trait(trait_id: TraitId, type_params: Vec<Name>, self_type: Idx) -> Self {
        ImplEntry {
            trait_id: Some(trait_id),
            ..Self::inherent(type_params, self_type)
        }
    }

    #[must_use]
    pub fn with_method(mut self, sig: MethodSig) -> Self {
        self.methods.insert(sig.name, sig);
        self
    }

    #[must_use]
    pub fn with_where(mut self, ty: Idx, bounds: Vec<TraitId>) -> Self {
        self.where_clause.push(WhereConstraint { ty, bounds });
        self
    }
}

/// A user-declared conversion `source → target` (deref or unsize).
///
/// Both sides refer to the rule's parameters as `BoundVar(0..param_count)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConversionRule {
    pub param_count: usize,
    pub source: Idx,
    pub target: Idx,
}

/// Registry for traits, implementations and conversion rules.
#[derive(Clone, Debug, Default)]
pub struct TraitRegistry {
    traits: Vec<TraitEntry>,
    /// Name → trait (`BTreeMap` for deterministic iteration).
    traits_by_name: BTreeMap<Name, TraitId>,

    impls: Vec<ImplEntry>,
    /// Head of the self type → impls, in registration order.
    impls_by_head: FxHashMap<TypeHead, Vec<ImplId>>,
    /// Impls whose self type has no head (`impl<T> Tr for T`).
    blanket_impls: Vec<ImplId>,
    impls_by_trait: FxHashMap<TraitId, Vec<ImplId>>,

    deref_rules: Vec<ConversionRule>,
    unsize_rules: Vec<ConversionRule>,
}

impl TraitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // === Registration ===

    /// Register a trait definition.
    #[allow(clippy::cast_possible_truncation)]
    pub fn register_trait(&mut self, entry: TraitEntry) -> TraitId {
        let id = TraitId(self.traits.len() as u32);
        self.traits_by_name.insert(entry.name, id);
        self.traits.push(entry);
        id
    }

    /// Register an implementation, indexing it by the head of its self type.
    #[allow(clippy::cast_possible_truncation)]
    pub fn register_impl(&mut self, pool: &Pool, entry: ImplEntry) -> ImplId {
        let id = ImplId(self.impls.len() as u32);

        match pool.type_head(entry.self_type) {
            Some(head) => self.impls_by_head.entry(head).or_default().push(id),
            None => self.blanket_impls.push(id),
        }

        if let Some(trait_id) = entry.trait_id {
            self.impls_by_trait.entry(trait_id).or_default().push(id);
        }

        self.impls.push(entry);
        id
    }

    /// Register `source` as dereferencing to `target`.
    pub fn register_deref_rule(&mut self, param_count: usize, source: Idx, target: Idx) {
        self.deref_rules.push(ConversionRule {
            param_count,
            source,
            target,
        });
    }

    /// Register `source` as unsizing to `target`.
    pub fn register_unsize_rule(&mut self, param_count: usize, source: Idx, target: Idx) {
        self.unsize_rules.push(ConversionRule {
            param_count,
            source,
            target,
        });
    }

    // === Trait Lookup ===

    #[inline]
    pub fn get_trait(&self, id: TraitId) -> Option<&TraitEntry> {
        self.traits.get(id.0 as usize)
    }

    #[inline]
    pub fn trait_by_name(&self, name: Name) -> Option<TraitId> {
        self.traits_by_name.get(&name).copied()
    }

    /// Name of a trait, or `Name::EMPTY` for an unknown id.
    pub fn trait_name(&self, id: TraitId) -> Name {
        self.get_trait(id).map_or(Name::EMPTY, |t| t.name)
    }

    /// A method declared directly on `trait_id`.
    pub fn trait_method(&self, trait_id: TraitId, method: Name) -> Option<&MethodSig> {
        self.get_trait(trait_id).and_then(|t| t.methods.get(&method))
    }

    /// Collect all super-traits transitively, breadth-first, without duplicates.
    pub fn all_super_traits(&self, trait_id: TraitId) -> Vec<TraitId> {
        let mut visited = FxHashSet::default();
        visited.insert(trait_id);
        let mut result = Vec::new();
        let mut queue = VecDeque::new();

        if let Some(entry) = self.get_trait(trait_id) {
            for &st in &entry.super_traits {
                if visited.insert(st) {
                    queue.push_back(st);
                }
            }
        }

        while let Some(id) = queue.pop_front() {
            result.push(id);
            if let Some(entry) = self.get_trait(id) {
                for &st in &entry.super_traits {
                    if visited.insert(st) {
                        queue.push_back(st);
                    }
                }
            }
        }

        result
    }

    /// `trait_id` followed by all of its super-traits.
    pub fn trait_and_supers(&self, trait_id: TraitId) -> Vec<TraitId> {
        let mut all = vec![trait_id];
        all.extend(self.all_super_traits(trait_id));
        all
    }

    /// Check if `sub` is `sup` or has it as a (transitive) super-trait.
    pub fn implies(&self, sub: TraitId, sup: TraitId) -> bool {
        sub == sup || self.all_super_traits(sub).contains(&sup)
    }

    // === Impl Lookup ===

    #[inline]
    pub fn get_impl(&self, id: ImplId) -> Option<&ImplEntry> {
        self.impls.get(id.0 as usize)
    }

    /// Impls that could apply to a type with the given head, in id order.
    ///
    /// Includes blanket impls. A type with no head (an unresolved variable)
    /// could match any impl, so every impl is returned.
    #[allow(clippy::cast_possible_truncation)]
    pub fn impls_for_head(&self, head: Option<TypeHead>) -> Vec<ImplId> {
        let Some(head) = head else {
            return (0..self.impls.len()).map(|i| ImplId(i as u32)).collect();
        };

        let mut ids: Vec<ImplId> = self
            .impls_by_head
            .get(&head)
            .into_iter()
            .flatten()
            .chain(self.blanket_impls.iter())
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    /// All implementations of a specific trait, in id order.
    pub fn impls_of_trait(&self, trait_id: TraitId) -> &[ImplId] {
        self.impls_by_trait
            .get(&trait_id)
            .map_or(&[], Vec::as_slice)
    }

    /// The signature of `method` as provided by an impl.
    ///
    /// Inherent impls provide their own methods; trait impls provide the
    /// methods declared on the trait.
    pub fn impl_method(&self, id: ImplId, method: Name) -> Option<&MethodSig> {
        let entry = self.get_impl(id)?;
        match entry.trait_id {
            None => entry.methods.get(&method),
            Some(trait_id) => self.trait_method(trait_id, method),
        }
    }

    // === Conversion Rules ===

    pub fn deref_rules(&self) -> &[ConversionRule] {
        &self.deref_rules
    }

    pub fn unsize_rules(&self) -> &[ConversionRule] {
        &self.unsize_rules
    }
}
