//! Shared identifier and source-location types for the Tarn compiler.
//!
//! Every later phase speaks in terms of these three things:
//! - [`Name`]: a 32-bit interned identifier (type names, trait names, method names)
//! - [`StringInterner`]: the sharded table that owns the identifier text
//! - [`Span`]: a byte range in the source file, used to anchor diagnostics

/// Compile-time size assertion.
///
/// Fails to compile when `size_of::<$ty>() != $size`.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod interner;
mod name;
mod span;

pub use interner::StringInterner;
pub use name::Name;
pub use span::Span;
