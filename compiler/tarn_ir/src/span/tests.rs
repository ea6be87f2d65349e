use super::*;
use pretty_assertions::assert_eq;

#[test]
fn debug_renders_the_range() {
    assert_eq!(format!("{:?}", Span::new(4, 8)), "4..8");
    assert_eq!(Span::default(), Span::DUMMY);
}
