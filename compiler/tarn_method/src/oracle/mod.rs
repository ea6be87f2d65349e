//! Capabilities method lookup consults.
//!
//! Probing never looks at the registry or the conversion rules directly; it
//! asks three narrow questions:
//!
//! - [`DerefOracle`]: what does this type dereference to?
//! - [`UnsizeOracle`]: can this type be unsized, and to what?
//! - [`ImplDatabase`]: which impls and traits exist?
//!
//! All three are read-only and shared between probing threads.

use tarn_ir::Name;
use tarn_types::{
    ConversionRule, Idx, ImplEntry, ImplId, MethodSig, Tag, TraitId, TraitRegistry, TypeHead,
    UnifyEngine,
};

use crate::{ParamEnv, ProbeConfig};

/// Answers "what does `ty` dereference to".
pub trait DerefOracle: Sync {
    /// The dereference target of `ty`, or `None` if it does not dereference.
    ///
    /// Must not leave bindings behind in `engine`.
    fn deref_target(&self, engine: &mut UnifyEngine<'_>, ty: Idx) -> Option<Idx>;
}

/// Answers "can `ty` be unsized, and to what".
pub trait UnsizeOracle: Sync {
    /// The unsized form of `ty`, or `None`.
    ///
    /// Must not leave bindings behind in `engine`.
    fn unsize_target(&self, engine: &mut UnifyEngine<'_>, ty: Idx) -> Option<Idx>;
}

/// Read access to traits and impls.
pub trait ImplDatabase: Sync {
    /// Impls whose self type could have the given head, in id order.
    fn impls_for_head(&self, head: Option<TypeHead>) -> Vec<ImplId>;

    fn impls_of_trait(&self, trait_id: TraitId) -> &[ImplId];

    fn impl_entry(&self, id: ImplId) -> Option<&ImplEntry>;

    /// The signature of `method` as provided by an impl.
    fn impl_method(&self, id: ImplId, method: Name) -> Option<&MethodSig>;

    fn trait_method(&self, trait_id: TraitId, method: Name) -> Option<&MethodSig>;

    fn trait_by_name(&self, name: Name) -> Option<TraitId>;

    fn trait_name(&self, trait_id: TraitId) -> Name;

    /// `trait_id` followed by its transitive super-traits.
    fn trait_and_supers(&self, trait_id: TraitId) -> Vec<TraitId>;

    /// Whether `sub` is `sup` or has it as a super-trait.
    fn implies(&self, sub: TraitId, sup: TraitId) -> bool {
        self.trait_and_supers(sub).contains(&sup)
    }
}

impl ImplDatabase for TraitRegistry {
    fn impls_for_head(&self, head: Option<TypeHead>) -> Vec<ImplId> {
        TraitRegistry::impls_for_head(self, head)
    }

    fn impls_of_trait(&self, trait_id: TraitId) -> &[ImplId] {
        TraitRegistry::impls_of_trait(self, trait_id)
    }

    fn impl_entry(&self, id: ImplId) -> Option<&ImplEntry> {
        self.get_impl(id)
    }

    fn impl_method(&self, id: ImplId, method: Name) -> Option<&MethodSig> {
        TraitRegistry::impl_method(self, id, method)
    }

    fn trait_method(&self, trait_id: TraitId, method: Name) -> Option<&MethodSig> {
        TraitRegistry::trait_method(self, trait_id, method)
    }

    fn trait_by_name(&self, name: Name) -> Option<TraitId> {
        TraitRegistry::trait_by_name(self, name)
    }

    fn trait_name(&self, trait_id: TraitId) -> Name {
        TraitRegistry::trait_name(self, trait_id)
    }

    fn trait_and_supers(&self, trait_id: TraitId) -> Vec<TraitId> {
        TraitRegistry::trait_and_supers(self, trait_id)
    }

    fn implies(&self, sub: TraitId, sup: TraitId) -> bool {
        TraitRegistry::implies(self, sub, sup)
    }
}

/// Conversions backed by the built-in rules plus a registry's declared rules.
///
/// Built in: `&T` and `&mut T` dereference to `T`; `[T; N]` unsizes to `[T]`.
/// Declared rules are tried in registration order; the first whose source
/// unifies with the type wins.
#[derive(Copy, Clone, Debug)]
pub struct RegistryOracle<'db> {
    registry: &'db TraitRegistry,
}

impl<'db> RegistryOracle<'db> {
    pub fn new(registry: &'db TraitRegistry) -> Self {
        RegistryOracle { registry }
    }
}

impl DerefOracle for RegistryOracle<'_> {
    fn deref_target(&self, engine: &mut UnifyEngine<'_>, ty: Idx) -> Option<Idx> {
        let ty = engine.resolve(ty);
        match engine.pool().tag(ty) {
            Tag::Ref | Tag::MutRef => Some(engine.pool().inner(ty)),
            _ => convert_by_rules(engine, self.registry.deref_rules(), ty),
        }
    }
}

impl UnsizeOracle for RegistryOracle<'_> {
    fn unsize_target(&self, engine: &mut UnifyEngine<'_>, ty: Idx) -> Option<Idx> {
        let ty = engine.resolve(ty);
        match engine.pool().tag(ty) {
            Tag::Array => {
                let elem = engine.pool().array_elem(ty);
                Some(engine.pool_mut().slice(elem))
            }
            _ => convert_by_rules(engine, self.registry.unsize_rules(), ty),
        }
    }
}

/// Apply the first rule whose source matches `ty`.
///
/// Rules only fire on types with a known head; a bare variable could match
/// every rule and is left alone. Matching happens inside a probe, so the
/// caller's variables are never bound by it.
fn convert_by_rules(
    engine: &mut UnifyEngine<'_>,
    rules: &[ConversionRule],
    ty: Idx,
) -> Option<Idx> {
    let head = engine.pool().type_head(ty)?;

    for rule in rules {
        if engine.pool().type_head(rule.source) != Some(head) {
            continue;
        }
        let target = engine.probe(|e| {
            let args = e.fresh_args(rule.param_count);
            let source = e.instantiate(rule.source, &args);
            e.unify(source, ty).ok()?;
            let target = e.instantiate(rule.target, &args);
            Some(e.resolve_deep(target))
        });
        if target.is_some() {
            return target;
        }
    }
    None
}

/// The read-only inputs of one method lookup.
#[derive(Copy, Clone)]
pub struct ProbeContext<'a> {
    pub db: &'a dyn ImplDatabase,
    pub deref: &'a dyn DerefOracle,
    pub unsize: &'a dyn UnsizeOracle,
    pub config: &'a ProbeConfig,
    /// Bounds on the caller's generic parameters.
    pub env: &'a ParamEnv,
}

impl<'a> ProbeContext<'a> {
    pub fn new<O>(
        db: &'a dyn ImplDatabase,
        oracle: &'a O,
        config: &'a ProbeConfig,
        env: &'a ParamEnv,
    ) -> Self
    where
        O: DerefOracle + UnsizeOracle,
    {
        ProbeContext {
            db,
            deref: oracle,
            unsize: oracle,
            config,
            env,
        }
    }
}
