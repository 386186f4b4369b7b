pub const PRICE_BINS: usize = 25;

#[derive(Clone, Debug, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width bins over `[min, max]`; the maximum lands in the last bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max == min {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|idx| HistogramBin {
            start: min + width * idx as f64,
            end: if idx + 1 == bins {
                max
            } else {
                min + width * (idx + 1) as f64
            },
            count: 0,
        })
        .collect();

    for value in finite {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_cover_every_value() {
        let values: Vec<f64> = (0..100).map(|v| 20_000.0 + v as f64 * 713.0).collect();
        let bins = histogram(&values, PRICE_BINS);
        assert_eq!(bins.len(), PRICE_BINS);
        assert_eq!(bins.iter().map(|bin| bin.count).sum::<usize>(), values.len());
        assert_eq!(bins.first().map(|bin| bin.start), Some(20_000.0));
        assert_eq!(bins.last().map(|bin| bin.end), Some(20_000.0 + 99.0 * 713.0));
    }

    #[test]
    fn maximum_falls_in_last_bin() {
        let bins = histogram(&[0.0, 10.0], 5);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[4].count, 1);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(histogram(&[], PRICE_BINS).is_empty());
        let single = histogram(&[5.0, 5.0, 5.0], PRICE_BINS);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].count, 3);
    }
}
