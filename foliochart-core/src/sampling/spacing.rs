//! Evenly spaced selection of `k` items out of `n`, preserving order.

/// Positions of `k` evenly spaced picks across `len` items.
///
/// - `len <= k`: every position
/// - `k == 0`: none
/// - `k == 1`: the middle position, `len / 2`
/// - otherwise `round(i * (len - 1) / (k - 1))` for `i in 0..k`, rounding
///   halves up. The step is > 1 here, so positions strictly increase.
pub fn even_positions(len: usize, k: usize) -> Vec<usize> {
    if len <= k {
        return (0..len).collect();
    }
    match k {
        0 => Vec::new(),
        1 => vec![len / 2],
        _ => {
            let step = (len - 1) as f64 / (k - 1) as f64;
            (0..k)
                .map(|i| round_half_up(i as f64 * step).min(len - 1))
                .collect()
        }
    }
}

/// `k` items evenly spaced across `items`.
pub fn space_evenly<T: Clone>(items: &[T], k: usize) -> Vec<T> {
    even_positions(items.len(), k)
        .into_iter()
        .map(|i| items[i].clone())
        .collect()
}

fn round_half_up(x: f64) -> usize {
    (x + 0.5).floor() as usize
}
