use crate::ops::traits::payload::Payload;

/// Checks that a payload has the expected shape and elements within `tolerance`.
/// Panics with the first offending index otherwise.
pub fn check_payload_near<P: Payload>(
    actual: &P,
    expected_shape: &[usize],
    expected_data: &[f64],
    tolerance: f64,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data = actual.to_f64_vec();
    assert_eq!(
        actual_data.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data.iter().zip(expected_data.iter()).enumerate() {
        let diff = (a - e).abs();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Routes `log` output through `env_logger` for the current test binary.
#[cfg(test)]
pub(crate) fn init_test_logger() {
    // Attempt to initialize env_logger. If it fails (already initialized), that's okay.
    let _ = env_logger::builder().is_test(true).try_init();
}
