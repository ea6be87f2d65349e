use super::*;
use crate::Idx;
use pretty_assertions::assert_eq;

#[test]
fn primitive_tags_match_fixed_indices() {
    for (i, tag) in Tag::PRIMITIVES.iter().enumerate() {
        assert!(tag.is_primitive());
        assert_eq!(*tag as u8 as usize, i);
        assert_eq!(Some(tag.name()), Idx::from_raw(i as u32).name());
    }
}

#[test]
fn categories() {
    assert!(Tag::Array.uses_extra());
    assert!(Tag::Applied.uses_extra());
    assert!(!Tag::Dyn.uses_extra());
}

#[test]
fn display_and_debug() {
    assert_eq!(Tag::MutRef.to_string(), "mut_ref");
    assert_eq!(format!("{:?}", Tag::Applied), "Tag::applied");
}
