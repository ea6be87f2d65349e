//! Shared setup for unit tests.

use std::collections::BTreeSet;

use tarn_ir::{Name, StringInterner};
use tarn_types::{
    Idx, ImplEntry, ImplId, MethodSig, Pool, SelfShape, TraitEntry, TraitId, TraitRegistry,
    UnifyEngine,
};

use crate::{lookup_method, MethodError, ParamEnv, Pick, ProbeConfig, ProbeContext, RegistryOracle};

pub(crate) struct Fixture {
    pub pool: Pool,
    pub interner: StringInterner,
    pub registry: TraitRegistry,
    pub config: ProbeConfig,
    pub env: ParamEnv,
}

impl Fixture {
    pub fn new() -> Self {
        crate::init_tracing();
        Fixture {
            pool: Pool::new(),
            interner: StringInterner::new(),
            registry: TraitRegistry::new(),
            config: ProbeConfig::default(),
            env: ParamEnv::new(),
        }
    }

    /// A fixture where `Box<T>` and `Rc<T>` dereference to `T`.
    pub fn with_smart_pointers() -> Self {
        let mut f = Self::new();
        for wrapper in ["Box", "Rc"] {
            let p0 = f.pool.bound_var(0);
            let source = f.adt(wrapper, &[p0]);
            f.registry.register_deref_rule(1, source, p0);
        }
        f
    }

    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn adt(&mut self, name: &str, args: &[Idx]) -> Idx {
        let name = self.interner.intern(name);
        self.pool.applied(name, args)
    }

    pub fn param(&mut self, index: u32) -> Idx {
        self.pool.bound_var(index)
    }

    pub fn rigid(&mut self, name: &str) -> Idx {
        let name = self.interner.intern(name);
        self.pool.rigid_var(name)
    }

    pub fn trait_with_method(&mut self, trait_name: &str, method: &str, shape: SelfShape) -> TraitId {
        let entry = TraitEntry::new(self.name(trait_name))
            .with_method(MethodSig::method(self.name(method), shape));
        self.registry.register_trait(entry)
    }

    pub fn inherent(&mut self, params: usize, self_ty: Idx, method: &str, shape: SelfShape) -> ImplId {
        let entry = ImplEntry::inherent(self.param_names(params), self_ty)
            .with_method(MethodSig::method(self.name(method), shape));
        self.registry.register_impl(&self.pool, entry)
    }

    pub fn trait_impl(&mut self, trait_id: TraitId, params: usize, self_ty: Idx) -> ImplId {
        let entry = ImplEntry::of_trait(trait_id, self.param_names(params), self_ty);
        self.registry.register_impl(&self.pool, entry)
    }

    pub fn render(&self, ty: Idx) -> String {
        self.pool.format_type(ty, &self.interner)
    }

    pub fn lookup(
        &mut self,
        receiver: Idx,
        method: &str,
        visible: &[TraitId],
    ) -> Result<Pick, MethodError> {
        let method = self.name(method);
        let visible: BTreeSet<TraitId> = visible.iter().copied().collect();
        let oracle = RegistryOracle::new(&self.registry);
        let cx = ProbeContext::new(&self.registry, &oracle, &self.config, &self.env);
        let mut engine = UnifyEngine::new(&mut self.pool);
        lookup_method(&mut engine, &cx, receiver, method, &visible)
    }

    fn param_names(&self, count: usize) -> Vec<Name> {
        (0..count).map(|i| self.name(&format!("T{i}"))).collect()
    }
}
