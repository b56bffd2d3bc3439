/// wrap_f64 maps x into the half-open range [0.0, period[ using a true (Euclidean) modulo, such
/// that negative values and values of arbitrary magnitude are handled. Non-finite inputs and
/// non-positive periods return 0.0.
pub fn wrap_f64(x: f64, period: f64) -> f64 {
    if !x.is_finite() || !(period > 0.0) {
        return 0.0;
    }

    let wrapped = x.rem_euclid(period);

    // rem_euclid may round up to exactly `period` for tiny negative inputs
    if wrapped >= period {
        0.0
    } else {
        wrapped
    }
}

/// wrap_index maps an arbitrary signed index into [0, len[. len must be larger than zero.
pub fn wrap_index(idx: i64, len: usize) -> usize {
    assert!(len > 0, "Cannot wrap an index into an empty range!");
    idx.rem_euclid(len as i64) as usize
}

/// nearest_wrap_delta returns the difference `to - from` on a loop of the given period, choosing
/// the wrap direction that yields the smaller absolute difference. The result lies in
/// [-period / 2, period / 2].
pub fn nearest_wrap_delta(from: f64, to: f64, period: f64) -> f64 {
    let mut delta = to - from;

    if delta > period / 2.0 {
        delta -= period;
    } else if delta < -period / 2.0 {
        delta += period;
    }

    delta
}

/// min_max returns the minimum and maximum value of the inserted values, or None if there are
/// none. NaN values are ignored.
pub fn min_max<I: IntoIterator<Item = f64>>(vals: I) -> Option<(f64, f64)> {
    vals.into_iter()
        .filter(|val| !val.is_nan())
        .fold(None, |acc, val| match acc {
            None => Some((val, val)),
            Some((lo, hi)) => Some((lo.min(val), hi.max(val))),
        })
}
