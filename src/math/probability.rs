/// Shannon entropy of a weighted distribution from its running sums
///
/// With `W = Σw` and `L = Σ w·ln(w)` the entropy of the normalized
/// distribution is `ln(W) - L / W`. Keeping both sums per cell lets the wave
/// update entropy in O(1) whenever a tile is removed.
pub fn entropy_from_sums(weight_sum: f64, weight_log_weight_sum: f64) -> f64 {
    if weight_sum <= 0.0 {
        return 0.0;
    }
    weight_sum.ln() - weight_log_weight_sum / weight_sum
}

/// Contribution of one weight to the `Σ w·ln(w)` sum
pub fn weight_log_weight(weight: f64) -> f64 {
    if weight > 0.0 { weight * weight.ln() } else { 0.0 }
}

/// Index picked by cumulative-weight sampling
///
/// `unit` is a uniform sample in `[0, 1)`. Weights are walked in order and
/// the first index whose cumulative weight reaches `unit · Σw` wins, so the
/// draw order is part of the reproducibility contract.
pub fn weighted_index(weights: &[f64], unit: f64) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return 0;
    }

    let mut remaining = unit * total;
    for (i, &weight) in weights.iter().enumerate() {
        remaining -= weight;
        if remaining < 0.0 {
            return i;
        }
    }
    weights.len().saturating_sub(1)
}
