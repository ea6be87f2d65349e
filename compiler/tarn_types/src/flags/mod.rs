//! Pre-computed type metadata flags.
//!
//! `TypeFlags` are computed once when a type is interned, so questions like
//! "does this contain inference variables" never require a traversal.

use bitflags::bitflags;

bitflags! {
    /// Pre-computed type properties for O(1) queries.
    ///
    /// Used to gate expensive operations (substitution, occurs check, etc.).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u32 {
        // === Presence Flags (bits 0-7) ===

        /// Contains inference variables.
        const HAS_VAR = 1 << 0;
        /// Contains impl parameters awaiting substitution.
        const HAS_BOUND_VAR = 1 << 1;
        /// Contains the caller's generic parameters.
        const HAS_RIGID_VAR = 1 << 2;
        /// Contains the error type.
        const HAS_ERROR = 1 << 3;

        // === Category Flags (bits 8-15) ===

        /// Built-in primitive type.
        const IS_PRIMITIVE = 1 << 8;
        /// `&T` or `&mut T`.
        const IS_REFERENCE = 1 << 9;
        /// `str`, `[T]` or `dyn Trait`.
        const IS_UNSIZED = 1 << 10;
        /// Nominal type `Name<..>`.
        const IS_NOMINAL = 1 << 11;
    }
}

impl TypeFlags {
    /// Flags inherited by a compound type from its children.
    pub const PROPAGATE_MASK: Self = Self::from_bits_truncate(
        Self::HAS_VAR.bits()
            | Self::HAS_BOUND_VAR.bits()
            | Self::HAS_RIGID_VAR.bits()
            | Self::HAS_ERROR.bits(),
    );

    #[inline]
    pub const fn has_vars(self) -> bool {
        self.contains(Self::HAS_VAR)
    }

    #[inline]
    pub const fn has_errors(self) -> bool {
        self.contains(Self::HAS_ERROR)
    }

    /// Check if substituting impl parameters would change this type.
    #[inline]
    pub const fn needs_subst(self) -> bool {
        self.contains(Self::HAS_BOUND_VAR)
    }

    #[inline]
    pub const fn propagate_from(child: Self) -> Self {
        Self::from_bits_truncate(child.bits() & Self::PROPAGATE_MASK.bits())
    }

    /// Combine propagated flags from multiple children.
    #[inline]
    pub fn propagate_all(children: impl IntoIterator<Item = Self>) -> Self {
        let mut result = Self::empty();
        for child in children {
            result = result.union(Self::propagate_from(child));
        }
        result
    }
}
