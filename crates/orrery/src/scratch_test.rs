use crate::scratch::{ScratchArena, ScratchError};

#[test]
fn test_reserve_bumps_offset() {
    let mut arena: ScratchArena<f64> = ScratchArena::new(10);

    let a = arena.reserve(3).unwrap();
    let b = arena.reserve(4).unwrap();

    assert_eq!(a.len(), 3);
    assert_eq!(b.len(), 4);
    assert_eq!(arena.offset(), 7);
    assert_eq!(arena.available(), 3);
    assert_eq!(arena.high_water_mark(), 7);
}

#[test]
fn test_exhaustion_leaves_offset_alone() {
    let mut arena: ScratchArena<f64> = ScratchArena::new(4);
    arena.reserve(3).unwrap();

    let err = arena.reserve(2).unwrap_err();

    assert_eq!(
        err,
        ScratchError {
            requested: 2,
            available: 1
        }
    );
    assert_eq!(arena.offset(), 3);
}

#[test]
fn test_zero_capacity_rejects_everything_but_empty() {
    let mut arena: ScratchArena<f64> = ScratchArena::new(0);

    assert!(arena.reserve(1).is_err());
    assert!(arena.reserve(0).unwrap().is_empty());
}

#[test]
fn test_restore_rolls_back() {
    let mut arena: ScratchArena<f64> = ScratchArena::new(8);
    let mark = arena.offset();

    arena.reserve(5).unwrap();
    arena.restore(mark);

    assert_eq!(arena.offset(), 0);
    assert_eq!(arena.high_water_mark(), 5);
}

#[test]
fn test_restore_forward_is_ignored() {
    let mut arena: ScratchArena<f64> = ScratchArena::new(8);
    arena.reserve(2).unwrap();

    arena.restore(6);

    assert_eq!(arena.offset(), 2);
}

#[test]
fn test_reserved_spans_are_zeroed() {
    let mut arena: ScratchArena<f64> = ScratchArena::new(4);

    let span = arena.reserve(4).unwrap();
    arena.slice_mut(span).fill(9.0);
    arena.restore(0);

    let span = arena.reserve(4).unwrap();
    assert!(arena.slice_mut(span).iter().all(|v| *v == 0.0));
}

#[test]
fn test_checkpoint_restores_on_drop() {
    let mut arena: ScratchArena<u32> = ScratchArena::new(16);
    arena.reserve(2).unwrap();

    {
        let mut scope = arena.checkpoint();
        assert_eq!(scope.mark(), 2);
        scope.reserve(10).unwrap();
        assert_eq!(scope.offset(), 12);
    }

    assert_eq!(arena.offset(), 2);
    assert_eq!(arena.high_water_mark(), 12);
}

#[test]
fn test_checkpoint_restores_on_early_return() {
    fn needs_too_much(arena: &mut ScratchArena<u32>) -> Result<(), ScratchError> {
        let mut scope = arena.checkpoint();
        scope.reserve(3)?;
        scope.reserve(100)?;
        Ok(())
    }

    let mut arena: ScratchArena<u32> = ScratchArena::new(8);

    assert!(needs_too_much(&mut arena).is_err());
    assert_eq!(arena.offset(), 0);
}

#[test]
fn test_nested_checkpoints_unwind_in_order() {
    let mut arena: ScratchArena<u32> = ScratchArena::new(16);

    let mut outer = arena.checkpoint();
    outer.reserve(4).unwrap();
    {
        let mut inner = outer.checkpoint();
        inner.reserve(6).unwrap();
        assert_eq!(inner.offset(), 10);
    }
    assert_eq!(outer.offset(), 4);
    drop(outer);

    assert_eq!(arena.offset(), 0);
}

#[test]
fn test_pair_mut_gives_disjoint_slices() {
    let mut arena: ScratchArena<u32> = ScratchArena::new(6);
    let a = arena.reserve(3).unwrap();
    let b = arena.reserve(3).unwrap();

    {
        let (first, second) = arena.pair_mut(a, b);
        first.fill(1);
        second.fill(2);
    }
    // order of the arguments decides the order of the slices
    let (second, first) = arena.pair_mut(b, a);
    assert_eq!(first, &[1u32, 1, 1]);
    assert_eq!(second, &[2u32, 2, 2]);
}

#[test]
#[should_panic(expected = "scratch spans overlap")]
fn test_pair_mut_rejects_same_span() {
    let mut arena: ScratchArena<u32> = ScratchArena::new(6);
    let a = arena.reserve(3).unwrap();

    let _ = arena.pair_mut(a, a);
}

#[test]
fn test_repeated_use_keeps_high_water_bounded() {
    let mut arena: ScratchArena<u32> = ScratchArena::new(64);

    for round in 0..1000 {
        let mut scope = arena.checkpoint();
        scope.reserve(8 + round % 3).unwrap();
        scope.reserve(8 + round % 3).unwrap();
    }

    assert_eq!(arena.offset(), 0);
    assert_eq!(arena.high_water_mark(), 20);
}
