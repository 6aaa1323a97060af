use super::{clock::SampleClock, view::RangeStats};
/// Average, maximum and span of the samples between two timestamps.
///
/// Returns `None` while either bound is unset. Bounds may be given in any
/// order. Gap samples are skipped; with no valid sample the average is `0.0`
/// and the maximum is unset.
pub fn calc_stats<C: SampleClock>(
    values: &[f32],
    begin: Option<f64>,
    end: Option<f64>,
    clock: &C,
) -> Option<RangeStats> {
    let (mut begin, mut end) = (begin?, end?);
    if end < begin {
        std::mem::swap(&mut begin, &mut end);
    }
    let delta = end - begin;
    let index_begin = clock.index_for_timestamp(begin).ceil();
    let index_end = clock.index_for_timestamp(end).floor();
    if values.is_empty() || !index_begin.is_finite() || !index_end.is_finite() {
        return Some(RangeStats {
            average: 0.0,
            max: None,
            delta,
        });
    }
    let len = values.len() as i64;
    let first = index_begin as i64;
    // Each slot of the ring contributes at most once.
    let last = (index_end as i64).min(first.saturating_add(len - 1));
    let mut sum = 0.0f64;
    let mut count = 0usize;
    let mut max: Option<f64> = None;
    for n in first..=last {
        let v = values[n.rem_euclid(len) as usize];
        if v.is_nan() {
            continue;
        }
        let v = f64::from(v);
        max = Some(max.map_or(v, |m| m.max(v)));
        sum += v;
        count += 1;
    }
    let average = if count == 0 { 0.0 } else { sum / count as f64 };
    Some(RangeStats {
        average,
        max,
        delta,
    })
}
