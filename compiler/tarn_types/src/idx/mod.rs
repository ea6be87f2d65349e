//! Type index handle.
//!
//! All types live in a [`Pool`](crate::Pool) and are referenced by a 32-bit
//! index. Primitive types have fixed indices so they can be named without a
//! pool, and type equality is index equality.

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Primitive Types (indices 0-10) ===
    // Pre-interned at pool creation; index equals the primitive's `Tag`.

    /// 32-bit signed integer.
    pub const I32: Self = Self(0);
    /// 64-bit signed integer.
    pub const I64: Self = Self(1);
    /// 8-bit unsigned integer.
    pub const U8: Self = Self(2);
    /// Pointer-sized unsigned integer.
    pub const USIZE: Self = Self(3);
    /// 64-bit floating point.
    pub const F64: Self = Self(4);
    pub const BOOL: Self = Self(5);
    /// Unicode scalar value.
    pub const CHAR: Self = Self(6);
    /// String slice (unsized).
    pub const STR: Self = Self(7);
    /// The unit type `()`.
    pub const UNIT: Self = Self(8);
    /// The never type (no values).
    pub const NEVER: Self = Self(9);
    /// Error placeholder; unifies with everything so failures don't cascade.
    pub const ERROR: Self = Self(10);

    // === Reserved Range (11-63) ===

    /// First index for dynamically allocated types.
    pub const FIRST_DYNAMIC: u32 = 64;

    /// Sentinel value indicating no type.
    pub const NONE: Self = Self(u32::MAX);

    /// Number of pre-interned primitive types.
    pub const PRIMITIVE_COUNT: u32 = 11;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is a primitive type (pre-interned).
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }

    /// Human-readable name for primitive types, `None` for dynamic types.
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("i32"),
            1 => Some("i64"),
            2 => Some("u8"),
            3 => Some("usize"),
            4 => Some("f64"),
            5 => Some("bool"),
            6 => Some("char"),
            7 => Some("str"),
            8 => Some("()"),
            9 => Some("never"),
            10 => Some("<error>"),
            _ => None,
        }
    }
}

impl Default for Idx {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "Idx::NONE")
        } else if let Some(name) = self.name() {
            write!(f, "Idx::{name}")
        } else {
            write!(f, "Idx({})", self.0)
        }
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Idx;
    tarn_ir::static_assert_size!(Idx, 4);
}
