//! Type construction helpers for the Pool.

use smallvec::SmallVec;
use tarn_ir::Name;

use crate::{Idx, Pool, Tag};

impl Pool {
    // === Wrapper Constructors ===

    /// Create a shared reference type `&inner`.
    pub fn reference(&mut self, inner: Idx) -> Idx {
        self.intern(Tag::Ref, inner.raw())
    }

    /// Create a mutable reference type `&mut inner`.
    pub fn mut_reference(&mut self, inner: Idx) -> Idx {
        self.intern(Tag::MutRef, inner.raw())
    }

    /// Create a slice type `[elem]`.
    pub fn slice(&mut self, elem: Idx) -> Idx {
        self.intern(Tag::Slice, elem.raw())
    }

    /// Create an array type `[elem; len]`.
    pub fn array(&mut self, elem: Idx, len: u32) -> Idx {
        self.intern_complex(Tag::Array, &[elem.raw(), len])
    }

    // === Named Constructors ===

    /// Create a nominal type `name<args..>`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn applied(&mut self, name: Name, args: &[Idx]) -> Idx {
        // Layout: [name, arg_count, arg0, arg1, ...]
        let mut payload: SmallVec<[u32; 6]> = SmallVec::with_capacity(args.len() + 2);
        payload.push(name.raw());
        payload.push(args.len() as u32);
        payload.extend(args.iter().map(|a| a.raw()));
        self.intern_complex(Tag::Applied, &payload)
    }

    /// Create a nominal type without arguments.
    pub fn named(&mut self, name: Name) -> Idx {
        self.applied(name, &[])
    }

    /// Create a trait object type `dyn trait_name`.
    pub fn dyn_trait_object(&mut self, trait_name: Name) -> Idx {
        self.intern(Tag::Dyn, trait_name.raw())
    }
}
