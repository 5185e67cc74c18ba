// Mann-Whitney U rank test
//
// Ranks the pooled samples (ties get their average rank) and uses the normal
// approximation of U with tie correction and a 0.5 continuity correction.

use super::distribution::normal_two_tailed_p;
use super::{direction, TestOutcome};

/// Rank-sum comparison of two samples
///
/// `statistic` is U of the left sample: the number of (left, right) pairs
/// where the left value is larger, ties counting one half. Returns `None`
/// when either sample is empty.
pub fn mann_whitney_u(left: &[f64], right: &[f64]) -> Option<TestOutcome> {
    if left.is_empty() || right.is_empty() {
        return None;
    }

    let n1 = left.len();
    let n2 = right.len();
    let n = n1 + n2;

    let mut pooled: Vec<(f64, bool)> = Vec::with_capacity(n);
    pooled.extend(left.iter().map(|&x| (x, true)));
    pooled.extend(right.iter().map(|&x| (x, false)));
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut rank_sum_left = 0.0;
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && pooled[j].0 == pooled[i].0 {
            j += 1;
        }
        // Positions i..j share the average of ranks i+1..=j
        let average_rank = (i + 1 + j) as f64 / 2.0;
        let group = (j - i) as f64;
        tie_term += group * group * group - group;
        for item in &pooled[i..j] {
            if item.1 {
                rank_sum_left += average_rank;
            }
        }
        i = j;
    }

    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let nf = n as f64;

    let u_left = rank_sum_left - n1f * (n1f + 1.0) / 2.0;
    let mean_u = n1f * n2f / 2.0;
    let variance = if n > 1 {
        n1f * n2f / 12.0 * ((nf + 1.0) - tie_term / (nf * (nf - 1.0)))
    } else {
        0.0
    };

    let deviation = u_left - mean_u;
    let corrected = (deviation.abs() - 0.5).max(0.0);
    let p_value = if variance <= 0.0 || corrected == 0.0 {
        1.0
    } else {
        normal_two_tailed_p(corrected / variance.sqrt())
    };

    Some(TestOutcome {
        statistic: u_left,
        p_value,
        left_larger: direction(deviation),
    })
}
