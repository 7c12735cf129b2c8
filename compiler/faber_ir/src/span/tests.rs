use super::*;

#[test]
fn test_span_size() {
    assert_eq!(std::mem::size_of::<Span>(), 8);
}

#[test]
fn test_span_merge() {
    let a = Span::new(4, 10);
    let b = Span::new(12, 20);
    assert_eq!(a.merge(b), Span::new(4, 20));
    assert_eq!(b.merge(a), Span::new(4, 20));
}

#[test]
fn test_span_len_and_empty() {
    assert_eq!(Span::new(3, 8).len(), 5);
    assert!(Span::DUMMY.is_empty());
    assert!(!Span::new(0, 1).is_empty());
}

#[test]
fn test_span_display() {
    assert_eq!(Span::new(1, 7).to_string(), "1..7");
    assert_eq!(format!("{:?}", Span::new(2, 3)), "2..3");
}
