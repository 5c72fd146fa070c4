//! Cross-module behavioural tests: slicing composition, null accounting,
//! dictionary invariants, and boundary conditions.

use minicol::{
    Array, Bitmask, Buffer, DictionaryArray, FloatArray, IntegerArray, ListArray, MaskedArray,
    MinicolError, Scalar, StringArray,
};

fn nullable_ints() -> Array {
    Array::from_int64(IntegerArray::from_options(&[
        Some(10),
        None,
        Some(30),
        Some(40),
        None,
        Some(60),
        Some(70),
        None,
        Some(90),
        Some(100),
    ]))
}

#[test]
fn slicing_is_compositional() {
    let a = nullable_ints();
    // a.slice(o1, l1).slice(o2, l2) == a.slice(o1 + o2, l2) when o2 + l2 <= l1
    for (o1, l1, o2, l2) in [(0, 10, 3, 4), (2, 7, 1, 5), (1, 8, 0, 8), (4, 6, 5, 1)] {
        let nested = a
            .slice(o1, Some(l1))
            .unwrap()
            .slice(o2, Some(l2))
            .unwrap();
        let direct = a.slice(o1 + o2, Some(l2)).unwrap();
        assert_eq!(nested, direct, "({o1},{l1})/({o2},{l2})");
    }
}

#[test]
fn null_count_matches_per_slot_scan() {
    let arrays = vec![
        nullable_ints(),
        Array::from_float64(FloatArray::from_options(&[Some(1.0), None, None])),
        Array::from_string32(StringArray::from_options(&[Some("a"), None, Some("c")])),
        Array::null(4),
        nullable_ints().slice(1, Some(6)).unwrap(),
    ];
    for a in arrays {
        let scanned = (0..a.len()).filter(|&i| a.is_null(i).unwrap()).count();
        assert_eq!(a.null_count(), scanned);
    }
}

#[test]
fn slice_boundaries() {
    let a = nullable_ints();
    // Full-length offset with zero length is a valid empty array.
    let empty = a.slice(a.len(), Some(0)).unwrap();
    assert_eq!(empty.len(), 0);
    assert_eq!(empty.null_count(), 0);
    // Default length runs to the end.
    let tail = a.slice(7, None).unwrap();
    assert_eq!(tail.len(), 3);
    // Out-of-bounds windows are caller errors.
    assert!(matches!(
        a.slice(11, None),
        Err(MinicolError::InvalidArgument(_))
    ));
    assert!(matches!(
        a.slice(8, Some(5)),
        Err(MinicolError::InvalidArgument(_))
    ));
}

#[test]
fn slicing_shares_buffers() {
    let inner = IntegerArray::from_slice(&[1i64, 2, 3, 4]);
    let a = Array::from_int64(inner);
    let s = a.slice(1, Some(2)).unwrap();
    let (orig, sliced) = (a.i64().unwrap(), s.i64().unwrap());
    assert!(sliced.data.shares_region_with(&orig.data));
}

#[test]
fn dictionary_index_invariant() {
    let dict = Array::from_string32(StringArray::from_slice(&["x", "y", "z"]));
    let arr = DictionaryArray::<i32>::from_slices(&[2, 0, -1, 1, 2], dict, None).unwrap();
    for i in 0..arr.len() {
        match arr.code_at(i) {
            Some(code) => assert!(code < arr.values().len()),
            None => assert!(arr.is_null(i)),
        }
    }
}

#[test]
fn dictionary_scenario_from_spec_shape() {
    // indices [0, 1, 0] over dictionary ["x", "y"]
    let dict = Array::from_string32(StringArray::from_slice(&["x", "y"]));
    let arr = DictionaryArray::<i32>::from_slices(&[0, 1, 0], dict, None).unwrap();
    assert_eq!(arr.get(0).unwrap().as_str(), Some("x"));
    assert_eq!(arr.get(1).unwrap().as_str(), Some("y"));
    assert_eq!(arr.get(2).unwrap().as_str(), Some("x"));
    assert_eq!(arr.null_count(), 0);
}

#[test]
fn equality_ignores_storage_layout() {
    let wide = nullable_ints();
    let window = wide.slice(2, Some(3)).unwrap();
    let rebuilt = Array::from_int64(IntegerArray::from_options(&[
        Some(30),
        Some(40),
        None,
    ]));
    assert_eq!(window, rebuilt);
}

#[test]
fn iteration_is_lazy_finite_restartable() {
    let a = nullable_ints();
    let mut iter = a.iter();
    assert_eq!(iter.next(), Some(Scalar::Int64(10)));
    assert_eq!(iter.next(), Some(Scalar::Null));
    let collected: Vec<Scalar> = a.iter().collect();
    assert_eq!(collected.len(), 10);
    assert_eq!(collected[0], Scalar::Int64(10));
}

#[test]
fn list_windows_follow_slices() {
    let child = Array::from_int64(IntegerArray::from_slice(&[1, 2, 3, 4, 5, 6]));
    let lists = ListArray::new(
        Buffer::from_slice(&[0u32, 2, 2, 5, 6]),
        child,
        Some(Bitmask::from_bools(&[true, true, false, true])),
    )
    .unwrap();
    let arr = Array::from_list(lists);
    let s = arr.slice(2, Some(2)).unwrap();
    assert!(s.value(0).unwrap().is_null());
    match s.value(1).unwrap() {
        Scalar::List(inner) => {
            assert_eq!(inner.len(), 1);
            assert_eq!(inner.value(0).unwrap(), Scalar::Int64(6));
        }
        other => panic!("expected a list scalar, got {other:?}"),
    }
}
