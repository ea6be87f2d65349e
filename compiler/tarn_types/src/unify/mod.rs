//! Type unification engine.
//!
//! Link-based unification with path compression: variables point directly at
//! the type they were unified with, and resolution shortens chains as it goes.
//! The occurs check is gated on `HAS_VAR`, so concrete types never pay for it.
//!
//! # Checkpoints
//!
//! Every variable write goes through [`Pool::set_var_state`], which records
//! the previous state while a snapshot is open. Method probing tests each
//! candidate inside [`UnifyEngine::probe`], so a failed or merely tentative
//! match leaves no trace; confirmation uses [`UnifyEngine::commit_if_ok`].
//!
//! ```ignore
//! let mut engine = UnifyEngine::new(&mut pool);
//! let var = engine.fresh_var();
//! let fits = engine.probe(|e| e.unify(var, Idx::I32).is_ok());
//! assert!(fits);
//! assert_eq!(engine.resolve(var), var); // rolled back
//! ```

mod error;

pub use error::{UnifyContext, UnifyError};

use smallvec::SmallVec;
use tarn_ir::Name;

use crate::{Idx, Pool, Snapshot, Tag, VarState};

/// The unification engine.
pub struct UnifyEngine<'pool> {
    pool: &'pool mut Pool,
}

impl<'pool> UnifyEngine<'pool> {
    pub fn new(pool: &'pool mut Pool) -> Self {
        Self { pool }
    }

    /// Create a fresh unbound type variable.
    pub fn fresh_var(&mut self) -> Idx {
        self.pool.fresh_var()
    }

    pub fn fresh_named_var(&mut self, name: Name) -> Idx {
        self.pool.fresh_named_var(name)
    }

    #[inline]
    pub fn pool(&self) -> &Pool {
        self.pool
    }

    /// Mutable pool access for type construction.
    #[inline]
    pub fn pool_mut(&mut self) -> &mut Pool {
        self.pool
    }

    // ========================================
    // Checkpoints
    // ========================================

    pub fn snapshot(&mut self) -> Snapshot {
        self.pool.start_snapshot()
    }

    pub fn rollback_to(&mut self, snapshot: Snapshot) {
        self.pool.rollback_to(snapshot);
    }

    pub fn commit(&mut self, snapshot: Snapshot) {
        self.pool.commit(snapshot);
    }

    /// Run `f` and undo every variable write it made.
    pub fn probe<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let snapshot = self.pool.start_snapshot();
        let result = f(self);
        self.pool.rollback_to(snapshot);
        result
    }

    /// Run `f`, keeping its writes only if it succeeds.
    pub fn commit_if_ok<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let snapshot = self.pool.start_snapshot();
        let result = f(self);
        if result.is_ok() {
            self.pool.commit(snapshot);
        } else {
            self.pool.rollback_to(snapshot);
        }
        result
    }

    // ========================================
    // Resolution
    // ========================================

    /// Resolve a type by following links, compressing the path.
    pub fn resolve(&mut self, idx: Idx) -> Idx {
        if self.pool.tag(idx) != Tag::Var {
            return idx;
        }

        let var_id = self.pool.data(idx);
        match self.pool.var_state(var_id) {
            VarState::Link { target } => {
                let target = *target;
                let resolved = self.resolve(target);
                if resolved != target {
                    self.pool
                        .set_var_state(var_id, VarState::Link { target: resolved });
                }
                resolved
            }
            _ => idx,
        }
    }

    /// Resolve a type and every type nested inside it.
    pub fn resolve_deep(&mut self, idx: Idx) -> Idx {
        if !self.pool.flags(idx).has_vars() {
            return idx;
        }

        let idx = self.resolve(idx);
        match self.pool.tag(idx) {
            Tag::Ref => {
                let inner = self.resolve_deep(self.pool.inner(idx));
                self.pool.reference(inner)
            }
            Tag::MutRef => {
                let inner = self.resolve_deep(self.pool.inner(idx));
                self.pool.mut_reference(inner)
            }
            Tag::Slice => {
                let elem = self.resolve_deep(self.pool.inner(idx));
                self.pool.slice(elem)
            }
            Tag::Array => {
                let len = self.pool.array_len(idx);
                let elem = self.resolve_deep(self.pool.array_elem(idx));
                self.pool.array(elem, len)
            }
            Tag::Applied => {
                let name = self.pool.applied_name(idx);
                let args: SmallVec<[Idx; 4]> = self
                    .pool
                    .applied_args(idx)
                    .into_iter()
                    .map(|arg| self.resolve_deep(arg))
                    .collect();
                self.pool.applied(name, &args)
            }
            _ => idx,
        }
    }

    // ========================================
    // Instantiation
    // ========================================

    /// One fresh variable per impl parameter.
    pub fn fresh_args(&mut self, count: usize) -> SmallVec<[Idx; 4]> {
        (0..count).map(|_| self.pool.fresh_var()).collect()
    }

    /// Substitute `args` for the impl parameters in `ty`.
    pub fn instantiate(&mut self, ty: Idx, args: &[Idx]) -> Idx {
        self.pool.substitute_bound(ty, args)
    }

    // ========================================
    // Unification
    // ========================================

    /// Unify two types, making them equivalent.
    pub fn unify(&mut self, a: Idx, b: Idx) -> Result<(), UnifyError> {
        self.unify_with_context(a, b, UnifyContext::TopLevel)
    }

    pub fn unify_with_context(
        &mut self,
        a: Idx,
        b: Idx,
        context: UnifyContext,
    ) -> Result<(), UnifyError> {
        if a == b {
            return Ok(());
        }

        let a = self.resolve(a);
        let b = self.resolve(b);
        if a == b {
            return Ok(());
        }

        // Error type propagates (don't report cascading errors)
        if self.pool.flags(a).has_errors() || self.pool.flags(b).has_errors() {
            return Ok(());
        }

        if self.pool.flags(a).needs_subst() || self.pool.flags(b).needs_subst() {
            let ty = if self.pool.flags(a).needs_subst() { a } else { b };
            tracing::error!(?ty, "unified a type with uninstantiated impl parameters");
            return Err(UnifyError::UninstantiatedParam { ty });
        }

        match (self.pool.tag(a), self.pool.tag(b)) {
            (Tag::Var, _) => self.unify_var_with(a, b, context),
            (_, Tag::Var) => self.unify_var_with(b, a, context),

            (Tag::RigidVar, Tag::RigidVar) => Err(UnifyError::RigidRigidMismatch {
                rigid1: self.rigid_name(a),
                rigid2: self.rigid_name(b),
            }),
            (Tag::RigidVar, _) => Err(UnifyError::RigidMismatch {
                rigid_name: self.rigid_name(a),
                concrete: b,
            }),
            (_, Tag::RigidVar) => Err(UnifyError::RigidMismatch {
                rigid_name: self.rigid_name(b),
                concrete: a,
            }),

            _ => self.unify_structural(a, b, context),
        }
    }

    fn unify_var_with(
        &mut self,
        var_idx: Idx,
        other: Idx,
        context: UnifyContext,
    ) -> Result<(), UnifyError> {
        let var_id = self.pool.data(var_idx);

        if self.occurs(var_id, other) {
            return Err(UnifyError::InfiniteType {
                var_id,
                containing_type: other,
            });
        }

        match self.pool.var_state(var_id).clone() {
            VarState::Unbound { .. } => {
                self.pool
                    .set_var_state(var_id, VarState::Link { target: other });
                Ok(())
            }
            // Should not happen after resolve(), but handle it
            VarState::Link { target } => self.unify_with_context(target, other, context),
            VarState::Rigid { name } => Err(UnifyError::RigidMismatch {
                rigid_name: name,
                concrete: other,
            }),
        }
    }

    fn rigid_name(&self, idx: Idx) -> Name {
        self.pool.rigid_name(idx).unwrap_or(Name::EMPTY)
    }

    // ========================================
    // Occurs Check
    // ========================================

    /// Check if variable `var_id` occurs in type `ty`.
    fn occurs(&self, var_id: u32, ty: Idx) -> bool {
        if !self.pool.flags(ty).has_vars() {
            return false;
        }
        self.occurs_inner(var_id, ty)
    }

    fn occurs_inner(&self, var_id: u32, ty: Idx) -> bool {
        match self.pool.tag(ty) {
            Tag::Var => {
                let other_id = self.pool.data(ty);
                if other_id == var_id {
                    return true;
                }
                if let VarState::Link { target } = self.pool.var_state(other_id) {
                    return self.occurs(var_id, *target);
                }
                false
            }
            Tag::Ref | Tag::MutRef | Tag::Slice => self.occurs(var_id, self.pool.inner(ty)),
            Tag::Array => self.occurs(var_id, self.pool.array_elem(ty)),
            Tag::Applied => self
                .pool
                .applied_args(ty)
                .iter()
                .any(|&arg| self.occurs(var_id, arg)),
            _ => false,
        }
    }

    // ========================================
    // Structural Unification
    // ========================================

    fn unify_structural(
        &mut self,
        a: Idx,
        b: Idx,
        context: UnifyContext,
    ) -> Result<(), UnifyError> {
        let tag_a = self.pool.tag(a);
        let tag_b = self.pool.tag(b);

        if tag_a != tag_b {
            return Err(UnifyError::Mismatch {
                expected: a,
                found: b,
                context,
            });
        }

        match tag_a {
            // Same primitive tag means same type; `never` is not a wildcard here.
            _ if tag_a.is_primitive() => Ok(()),

            Tag::Ref | Tag::MutRef => {
                let inner_a = self.pool.inner(a);
                let inner_b = self.pool.inner(b);
                self.unify_with_context(inner_a, inner_b, UnifyContext::RefInner)
            }

            Tag::Slice => {
                let elem_a = self.pool.inner(a);
                let elem_b = self.pool.inner(b);
                self.unify_with_context(elem_a, elem_b, UnifyContext::SliceElement)
            }

            Tag::Array => {
                let len_a = self.pool.array_len(a);
                let len_b = self.pool.array_len(b);
                if len_a != len_b {
                    return Err(UnifyError::ArrayLenMismatch {
                        expected: len_a,
                        found: len_b,
                    });
                }
                let elem_a = self.pool.array_elem(a);
                let elem_b = self.pool.array_elem(b);
                self.unify_with_context(elem_a, elem_b, UnifyContext::ArrayElement)
            }

            Tag::Dyn => {
                if self.pool.dyn_trait(a) == self.pool.dyn_trait(b) {
                    Ok(())
                } else {
                    Err(UnifyError::Mismatch {
                        expected: a,
                        found: b,
                        context,
                    })
                }
            }

            Tag::Applied => {
                if self.pool.applied_name(a) != self.pool.applied_name(b) {
                    return Err(UnifyError::Mismatch {
                        expected: a,
                        found: b,
                        context,
                    });
                }

                let args_a = self.pool.applied_args(a);
                let args_b = self.pool.applied_args(b);
                if args_a.len() != args_b.len() {
                    return Err(UnifyError::ArityMismatch {
                        expected: args_a.len(),
                        found: args_b.len(),
                    });
                }

                for (i, (aa, ab)) in args_a.iter().zip(args_b.iter()).enumerate() {
                    self.unify_with_context(*aa, *ab, UnifyContext::type_arg(i))?;
                }
                Ok(())
            }

            _ => Err(UnifyError::Mismatch {
                expected: a,
                found: b,
                context,
            }),
        }
    }
}
