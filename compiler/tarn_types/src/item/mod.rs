//! Compact type item storage.
//!
//! Each type in the pool is stored as an `Item` with a tag and data field.
//! The interpretation of `data` depends on the tag.

use crate::Tag;

/// A single type item in the pool.
///
/// - `tag`: Identifies the type kind (see [`Tag`])
/// - `data`: child index, extra index, var id or parameter index
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct Item {
    pub tag: Tag,
    pub data: u32,
}

impl Item {
    #[inline]
    pub const fn new(tag: Tag, data: u32) -> Self {
        Self { tag, data }
    }

    #[inline]
    pub const fn primitive(tag: Tag) -> Self {
        Self { tag, data: 0 }
    }

}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Item;
    tarn_ir::static_assert_size!(Item, 8);
}
