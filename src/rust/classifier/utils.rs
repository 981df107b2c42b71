use ndarray::{Array1, Array2};

/// 32-bit FNV-1a over the UTF-8 bytes of `token`.
pub(crate) fn hash_token(token: &str) -> u32 {
    let mut h: u32 = 2_166_136_261;
    for byte in token.bytes() {
        h ^= u32::from(byte);
        h = h.wrapping_mul(16_777_619);
    }
    h
}

/// Mean of the given rows of `matrix`. Zero vector when `rows` is empty.
pub(crate) fn average_rows(matrix: &Array2<f32>, rows: &[usize]) -> Array1<f32> {
    let mut hidden = Array1::zeros(matrix.ncols());
    if rows.is_empty() {
        return hidden;
    }
    for &row in rows {
        hidden += &matrix.row(row);
    }
    hidden / rows.len() as f32
}

/// Numerically stable softmax, computed in place.
pub(crate) fn softmax(scores: &mut Array1<f32>) {
    let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    scores.mapv_inplace(|s| (s - max).exp());
    let sum = scores.sum();
    if sum > 0.0 {
        scores.mapv_inplace(|s| s / sum);
    }
}

pub(crate) fn argmax(values: &Array1<f32>) -> Option<(usize, f32)> {
    values
        .iter()
        .cloned()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fnv_reference_values() {
        assert_eq!(hash_token(""), 0x811c_9dc5);
        assert_eq!(hash_token("a"), 0xe40c_292c);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let mut scores = array![1.0_f32, 2.0, 3.0];
        softmax(&mut scores);
        assert!((scores.sum() - 1.0).abs() < 1e-6);
        assert_eq!(argmax(&scores).map(|(i, _)| i), Some(2));
    }

    #[test]
    fn test_average_rows() {
        let m = array![[1.0_f32, 0.0], [3.0, 2.0], [100.0, 100.0]];
        let avg = average_rows(&m, &[0, 1]);
        assert_eq!(avg, array![2.0_f32, 1.0]);
        assert_eq!(average_rows(&m, &[]), array![0.0_f32, 0.0]);
    }
}
