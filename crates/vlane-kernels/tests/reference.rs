//! Public-API integration tests against brute-force references.

use proptest::prelude::*;

use vlane_kernels::{conv3x3, haloed, matmul, try_convolve, try_matmul, KernelError, MAX_LANES};

/// Row-major triple loop with wrapping accumulation.
fn matmul_ref(a: &[i32], b: &[i32], m: usize, n: usize, p: usize) -> Vec<i32> {
    let mut c = vec![0i32; m * p];
    for i in 0..m {
        for j in 0..p {
            let mut acc = 0i32;
            for k in 0..n {
                acc = acc.wrapping_add(a[i * n + k].wrapping_mul(b[k * p + j]));
            }
            c[i * p + j] = acc;
        }
    }
    c
}

/// Direct 3x3 cross-correlation over the haloed input.
fn conv_ref(input: &[i32], filter: &[i32], rows: usize, cols: usize) -> Vec<i32> {
    let stride = haloed(cols);
    let mut o = vec![0i32; rows * cols];
    for r in 0..rows {
        for c in 0..cols {
            let mut acc = 0i32;
            for fr in 0..3 {
                for fc in 0..3 {
                    let x = input[(r + fr) * stride + c + fc];
                    acc = acc.wrapping_add(x.wrapping_mul(filter[fr * 3 + fc]));
                }
            }
            o[r * cols + c] = acc;
        }
    }
    o
}

#[test]
fn matmul_identity_is_a_copy() {
    let m = 8;
    let n = 5;
    let a: Vec<i32> = (0..m * n).map(|i| i as i32 * 3 - 40).collect();
    let mut eye = vec![0i32; n * n];
    for i in 0..n {
        eye[i * n + i] = 1;
    }

    assert_eq!(matmul(&a, m, n, &eye, n), a);
}

#[test]
fn matmul_matches_reference_on_wide_output() {
    // P wider than one stripe forces the column loop.
    let (m, n, p) = (4, 7, MAX_LANES + 13);
    let a: Vec<i32> = (0..m * n).map(|i| i as i32 - 11).collect();
    let b: Vec<i32> = (0..n * p).map(|i| (i as i32).wrapping_mul(37)).collect();

    assert_eq!(matmul(&a, m, n, &b, p), matmul_ref(&a, &b, m, n, p));
}

#[test]
fn conv_identity_filter_extracts_center() {
    let (rows, cols) = (4, 6);
    let stride = haloed(cols);
    let input: Vec<i32> = (0..haloed(rows) * stride).map(|i| i as i32).collect();
    let filter = vec![0, 0, 0, 0, 1, 0, 0, 0, 0];

    let o = conv3x3(&input, &filter, rows, cols);
    for r in 0..rows {
        for c in 0..cols {
            assert_eq!(o[r * cols + c], input[(r + 1) * stride + c + 1]);
        }
    }
}

#[test]
fn conv_matches_reference_on_sobel() {
    let (rows, cols) = (8, 10);
    let input: Vec<i32> = (0..haloed(rows) * haloed(cols))
        .map(|i| (i as i32 * 17) % 101 - 50)
        .collect();
    let filter = vec![-1, 0, 1, -2, 0, 2, -1, 0, 1];

    assert_eq!(
        conv3x3(&input, &filter, rows, cols),
        conv_ref(&input, &filter, rows, cols)
    );
}

#[test]
fn try_matmul_accepts_what_matmul_accepts() {
    let a = vec![1i32; 4 * 5];
    let b = vec![-1i32; 5 * 3];
    assert_eq!(try_matmul(&a, 4, 5, &b, 3).unwrap(), matmul(&a, 4, 5, &b, 3));
}

#[test]
fn try_convolve_reports_each_bad_shape() {
    let ok_input = vec![0i32; 36];
    let ok_filter = vec![0i32; 9];

    assert!(matches!(
        try_convolve(&ok_input, &ok_filter, 4, 4, 3),
        Ok(_)
    ));
    assert_eq!(
        try_convolve(&ok_input, &ok_filter, 0, 4, 3).unwrap_err(),
        KernelError::ZeroDimension { name: "rows" }
    );
    assert_eq!(
        try_convolve(&ok_input[..30], &ok_filter, 4, 4, 3).unwrap_err(),
        KernelError::BufferTooSmall {
            name: "input",
            expected: 36,
            got: 30
        }
    );
}

fn matmul_inputs() -> impl Strategy<Value = (usize, usize, usize, Vec<i32>, Vec<i32>)> {
    (1usize..=4, 1usize..=12, 1usize..=80).prop_flat_map(|(blocks, n, p)| {
        let m = blocks * 4;
        (
            Just(m),
            Just(n),
            Just(p),
            prop::collection::vec(any::<i32>(), m * n),
            prop::collection::vec(any::<i32>(), n * p),
        )
    })
}

fn conv_inputs() -> impl Strategy<Value = (usize, usize, Vec<i32>, Vec<i32>)> {
    (1usize..=4, 1usize..=(MAX_LANES - 2)).prop_flat_map(|(blocks, cols)| {
        let rows = blocks * 4;
        (
            Just(rows),
            Just(cols),
            prop::collection::vec(-100i32..=100, haloed(rows) * haloed(cols)),
            prop::collection::vec(-8i32..=8, 9),
        )
    })
}

proptest! {
    #[test]
    fn prop_matmul_matches_reference((m, n, p, a, b) in matmul_inputs()) {
        prop_assert_eq!(matmul(&a, m, n, &b, p), matmul_ref(&a, &b, m, n, p));
    }

    #[test]
    fn prop_conv_matches_reference((rows, cols, input, filter) in conv_inputs()) {
        prop_assert_eq!(
            conv3x3(&input, &filter, rows, cols),
            conv_ref(&input, &filter, rows, cols)
        );
    }
}
