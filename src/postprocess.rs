use ndarray::{Array1, ArrayView1};

/// Applies softmax to a 1D array (slice) and returns a new Array1<f32>.
pub fn softmax(slice: ArrayView1<f32>) -> Array1<f32> {
    let max_val = slice.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp_vals: Array1<f32> = slice.mapv(|x| (x - max_val).exp());
    let sum_exp: f32 = exp_vals.sum();
    exp_vals.mapv(|v| v / sum_exp)
}

/// Index and value of the largest entry; the first one wins on ties.
pub fn argmax_and_max(softmaxed: ArrayView1<f32>) -> (usize, f32) {
    softmaxed
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(max_idx, max_val), (i, &val)| {
            if val > max_val { (i, val) } else { (max_idx, max_val) }
        })
}
