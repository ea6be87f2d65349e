//! Type kind tag for tag-driven dispatch.
//!
//! Each type in the pool has a `Tag` that identifies its kind and determines
//! how to interpret the associated `data` field.
//!
//! # Tag Categories
//!
//! - 0-15: Primitives (data unused)
//! - 16-31: Simple wrappers (data = child Idx)
//! - 32-47: Two-field types (data = extra index)
//! - 80-95: Named types (data = extra index or trait name)
//! - 96-111: Type variables (data = var id or parameter index)

use std::fmt;

/// Type kind discriminant.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Tag {
    // === Primitives (0-15) ===
    I32 = 0,
    I64 = 1,
    U8 = 2,
    Usize = 3,
    F64 = 4,
    Bool = 5,
    Char = 6,
    /// String slice (unsized).
    Str = 7,
    Unit = 8,
    Never = 9,
    /// Error placeholder (propagates silently).
    Error = 10,

    // === Simple Wrappers (16-31) ===
    // data: child Idx.raw()
    /// Shared reference `&T`.
    Ref = 16,
    /// Mutable reference `&mut T`.
    MutRef = 17,
    /// Slice `[T]` (unsized).
    Slice = 18,

    // === Two-Field Types (32-47) ===
    // data: index into extra[] with [elem, len]
    /// Fixed-length array `[T; N]`.
    Array = 32,

    // === Named Types (80-95) ===
    /// Trait object `dyn Trait`. data: trait `Name` raw value.
    Dyn = 80,
    /// Nominal type with arguments `Name<A, B>`.
    /// data: index into extra[] with [name, arg_count, args..].
    Applied = 81,

    // === Type Variables (96-111) ===
    // data: variable id (into var_states), or parameter index for BoundVar
    /// Inference variable (unification target).
    Var = 96,
    /// Impl/rule generic parameter, substituted on instantiation.
    BoundVar = 97,
    /// Caller's generic parameter (cannot unify with concrete types).
    RigidVar = 98,
}

impl Tag {
    /// Check if this tag uses the extra array for data.
    #[inline]
    pub const fn uses_extra(self) -> bool {
        matches!(self, Self::Array | Self::Applied)
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        (self as u8) < 16
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::Usize => "usize",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Str => "str",
            Self::Unit => "()",
            Self::Never => "never",
            Self::Error => "<error>",
            Self::Ref => "ref",
            Self::MutRef => "mut_ref",
            Self::Slice => "slice",
            Self::Array => "array",
            Self::Dyn => "dyn",
            Self::Applied => "applied",
            Self::Var => "var",
            Self::BoundVar => "bound_var",
            Self::RigidVar => "rigid_var",
        }
    }

    /// Primitive tags in index order, matching `Idx::I32..=Idx::ERROR`.
    pub const PRIMITIVES: [Tag; 11] = [
        Self::I32,
        Self::I64,
        Self::U8,
        Self::Usize,
        Self::F64,
        Self::Bool,
        Self::Char,
        Self::Str,
        Self::Unit,
        Self::Never,
        Self::Error,
    ];
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag::{}", self.name())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

const _: () = assert!(std::mem::size_of::<Tag>() == 1);

#[cfg(test)]
mod tests;
