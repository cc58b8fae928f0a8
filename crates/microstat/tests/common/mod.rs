// do we have to use this to silence warnings?
#![allow(dead_code)]

// the reason this is named mod.rs has to do with some complexities of how
// testing is handled
//
// we are following the advice of the rust book
// https://doc.rust-lang.org/book/ch11-03-test-organization.html#submodules-in-integration-tests

use ndarray::{ArrayD, IxDyn};
use rand::distr::{Distribution, Uniform};
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;

// based on numpy!
// https://numpy.org/doc/stable/reference/generated/numpy.isclose.html
pub fn isclose(actual: f64, ref_val: f64, rtol: f64, atol: f64) -> bool {
    let actual_nan = actual.is_nan();
    let ref_nan = ref_val.is_nan();
    if actual_nan || ref_nan {
        actual_nan && ref_nan
    } else {
        (actual - ref_val).abs() <= (atol + rtol * ref_val.abs())
    }
}

pub fn assert_allclose(actual: &ArrayD<f64>, expected: &ArrayD<f64>, rtol: f64, atol: f64) {
    assert_eq!(actual.shape(), expected.shape(), "the shapes are unequal");
    for ((idx, actual_val), ref_val) in actual.indexed_iter().zip(expected.iter()) {
        assert!(
            isclose(*actual_val, *ref_val, rtol, atol),
            "values at {idx:?} aren't to within rtol={rtol}, atol={atol}\
            \n  actual   = {actual_val}\
            \n  expected = {ref_val}",
        );
    }
}

/// a binary image where each voxel is nonzero with (roughly) the
/// probability `fraction`
pub fn random_binary(shape: &[usize], fraction: f64, seed: u64) -> ArrayD<i32> {
    let mut my_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let dist = Uniform::try_from(0.0..1.0).unwrap();
    ArrayD::from_shape_simple_fn(IxDyn(shape), || {
        if dist.sample(&mut my_rng) < fraction { 1 } else { 0 }
    })
}

/// a field of values drawn uniformly from `[-1, 1]`
pub fn random_field(shape: &[usize], seed: u64) -> ArrayD<f64> {
    let mut my_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let dist = Uniform::try_from(-1.0..=1.0).unwrap();
    ArrayD::from_shape_simple_fn(IxDyn(shape), || dist.sample(&mut my_rng))
}
