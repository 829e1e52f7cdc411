use super::*;

#[test]
fn merge_covers_both_operands() {
    let left = Span::new(4, 5);
    let right = Span::new(8, 11);
    assert_eq!(left.merge(right), Span::new(4, 11));
    assert_eq!(right.merge(left), Span::new(4, 11));
}

#[test]
fn try_from_range_rejects_oversized_offsets() {
    let big = u32::MAX as usize + 1;
    assert_eq!(
        Span::try_from_range(big..big + 1),
        Err(SpanError::StartTooLarge(big))
    );
    assert_eq!(Span::try_from_range(0..big), Err(SpanError::EndTooLarge(big)));
    assert_eq!(Span::try_from_range(3..9), Ok(Span::new(3, 9)));
}

#[test]
fn dummy_is_empty_default() {
    assert!(Span::DUMMY.is_empty());
    assert_eq!(Span::default(), Span::DUMMY);
    assert_eq!(Span::new(2, 7).len(), 5);
    assert_eq!(format!("{:?}", Span::new(2, 7)), "2..7");
}
