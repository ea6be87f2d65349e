//! Unification error types.

use std::fmt;

use tarn_ir::Name;

use crate::Idx;

/// Error from type unification.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum UnifyError {
    /// Types could not be unified.
    Mismatch {
        expected: Idx,
        found: Idx,
        context: UnifyContext,
    },

    /// Occurs check failed (`?0 = Box<?0>`).
    InfiniteType { var_id: u32, containing_type: Idx },

    /// Rigid type variable cannot unify with a concrete type.
    RigidMismatch { rigid_name: Name, concrete: Idx },

    /// Two different rigid variables cannot unify.
    RigidRigidMismatch { rigid1: Name, rigid2: Name },

    /// Nominal types with different argument counts.
    ArityMismatch { expected: usize, found: usize },

    /// Arrays with different lengths.
    ArrayLenMismatch { expected: u32, found: u32 },

    /// A type still containing impl parameters reached unification.
    ///
    /// Compiler invariant violation, not a user error.
    UninstantiatedParam { ty: Idx },
}

/// Where inside a type the failing unification happened.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum UnifyContext {
    #[default]
    TopLevel,
    /// Pointee of a reference.
    RefInner,
    SliceElement,
    ArrayElement,
    /// Type argument of a nominal type.
    TypeArg { index: usize },
}

impl UnifyContext {
    pub fn type_arg(index: usize) -> Self {
        Self::TypeArg { index }
    }
}

impl fmt::Display for UnifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnifyError::Mismatch {
                expected,
                found,
                context,
            } => write!(
                f,
                "type mismatch: expected {expected:?}, found {found:?} ({context})"
            ),
            UnifyError::InfiniteType {
                var_id,
                containing_type,
            } => write!(
                f,
                "infinite type: ?{var_id} occurs in {containing_type:?}"
            ),
            UnifyError::RigidMismatch { concrete, .. } => {
                write!(f, "generic parameter cannot be {concrete:?}")
            }
            UnifyError::RigidRigidMismatch { .. } => {
                write!(f, "distinct generic parameters cannot be unified")
            }
            UnifyError::ArityMismatch { expected, found } => write!(
                f,
                "expected {expected} type argument(s), found {found}"
            ),
            UnifyError::ArrayLenMismatch { expected, found } => {
                write!(f, "expected array of length {expected}, found length {found}")
            }
            UnifyError::UninstantiatedParam { ty } => {
                write!(f, "impl parameters in {ty:?} were not instantiated")
            }
        }
    }
}

impl std::error::Error for UnifyError {}

impl fmt::Display for UnifyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnifyContext::TopLevel => write!(f, "at top level"),
            UnifyContext::RefInner => write!(f, "in reference target"),
            UnifyContext::SliceElement => write!(f, "in slice element"),
            UnifyContext::ArrayElement => write!(f, "in array element"),
            UnifyContext::TypeArg { index } => write!(f, "in type argument {index}"),
        }
    }
}
