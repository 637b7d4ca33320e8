//! Fuzz target for batch broadcasting.
//!
//! Elementwise operations either fail with a shape error or produce the
//! broadcast shape, and broadcasting is symmetric.

#![no_main]

use arbitrary::Arbitrary;
use ib_math::{broadcast_shapes, Batch};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    left: Vec<u8>,
    right: Vec<u8>,
}

/// Small shape from fuzz bytes: at most 4 axes of length 0..=3.
fn shape(raw: &[u8]) -> Vec<usize> {
    raw.iter().take(4).map(|b| (*b % 4) as usize).collect()
}

fn filled(shape: &[usize]) -> Batch {
    let len: usize = shape.iter().product();
    Batch::from_shape_vec(shape.to_vec(), (0..len).map(|i| i as f64).collect())
        .expect("length matches shape")
}

fuzz_target!(|input: Input| {
    let left_shape = shape(&input.left);
    let right_shape = shape(&input.right);
    let left = filled(&left_shape);
    let right = filled(&right_shape);

    let forward = broadcast_shapes(&left_shape, &right_shape);
    let backward = broadcast_shapes(&right_shape, &left_shape);
    assert_eq!(forward.is_ok(), backward.is_ok());

    match (forward, left.checked_add(&right)) {
        (Ok(out_shape), Ok(sum)) => {
            assert_eq!(sum.shape(), out_shape.as_slice());
            assert_eq!(sum.len(), out_shape.iter().product::<usize>());
            assert!(left.broadcast_to(&out_shape).is_ok());
        }
        (Err(_), Err(_)) => {}
        (f, s) => panic!("broadcast_shapes {:?} disagrees with checked_add {:?}", f, s),
    }

    if let Ok(min) = left.elementwise_min(&right) {
        let max = left.elementwise_max(&right).expect("same shapes as min");
        assert!(min.iter().zip(max.iter()).all(|(a, b)| a <= b));
    }
});
