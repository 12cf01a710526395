use crate::constants::SPARK_RESOLUTION;

/// Bracketed, space separated listing: `[ 1.2 3.4  ]`.
pub fn format_dump(samples: &[f64]) -> String {
    let mut out = String::from("[ ");
    for value in samples {
        out.push_str(&value.to_string());
        out.push(' ');
    }
    out.push_str(" ]");
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stats {
    pub last: f64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

// Over the whole snapshot, zero-filled slots included
pub fn window_stats(values: &[f64]) -> Stats {
    if values.is_empty() {
        return Stats::default();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    Stats {
        last: values[values.len() - 1],
        min,
        max,
        avg,
    }
}

pub fn format_stats(stats: &Stats) -> String {
    format!(
        "last={:.1} min={:.1} max={:.1} avg={:.1}",
        stats.last, stats.min, stats.max, stats.avg
    )
}

/// Map samples onto `0..=SPARK_RESOLUTION` relative to the largest one.
/// Negative and non-finite samples become 0.
pub fn scale_for_sparkline(values: &[f64]) -> Vec<u64> {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);
    values
        .iter()
        .map(|&v| {
            if max <= 0.0 || !v.is_finite() || v <= 0.0 {
                0
            } else {
                (v / max * SPARK_RESOLUTION as f64).round() as u64
            }
        })
        .collect()
}
