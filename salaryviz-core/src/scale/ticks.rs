// Port of the tick generation in https://github.com/d3/d3-array/blob/main/src/ticks.js

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// (i1, i2, inc). A negative `inc` means ticks are `i / -inc`, which keeps fractional ticks exact.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let pos_inc = 10f64.powf(-power) / factor;
        i1 = (start * pos_inc).round();
        i2 = (stop * pos_inc).round();
        if i1 / pos_inc < start {
            i1 += 1.0;
        }
        if i2 / pos_inc > stop {
            i2 -= 1.0;
        }
        inc = -pos_inc;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Step between ticks for `[start, stop]`; negative values are inverted steps (see `tick_spec`)
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_spec(start, stop, count as f64).2
}

/// Roughly `count` evenly spaced round values within `[start, stop]`
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (i1, i2, inc) = if reverse {
        tick_spec(stop, start, count as f64)
    } else {
        tick_spec(start, stop, count as f64)
    };
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    let tick = |i: f64| if inc < 0.0 { i / -inc } else { i * inc };
    if reverse {
        (0..n).map(|i| tick(i2 - i as f64)).collect()
    } else {
        (0..n).map(|i| tick(i1 + i as f64)).collect()
    }
}

/// Extend `[start, stop]` outward to round values aligned with the tick step.
///
/// Returns the input unchanged for degenerate domains, or when the step does not settle
/// within ten refinements.
pub fn nice(domain: [f64; 2], count: usize) -> [f64; 2] {
    let [d0, d1] = domain;
    if !d0.is_finite() || !d1.is_finite() || d0 == d1 || count == 0 {
        return domain;
    }
    let reverse = d1 < d0;
    let (mut start, mut stop) = if reverse { (d1, d0) } else { (d0, d1) };

    let mut prestep: Option<f64> = None;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if prestep == Some(step) {
            return if reverse { [stop, start] } else { [start, stop] };
        } else if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        prestep = Some(step);
    }
    domain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks() {
        assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(0.0, 10.0, 10), (0..=10).map(|i| i as f64).collect::<Vec<_>>());
        assert_eq!(ticks(1.0, 0.0, 2), vec![1.0, 0.5, 0.0]);
        assert_eq!(ticks(3.0, 3.0, 10), vec![3.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_tick_increment() {
        assert_eq!(tick_increment(0.0, 1.0, 10), -10.0);
        assert_eq!(tick_increment(0.0, 600000.0, 10), 50000.0);
    }

    #[test]
    fn test_nice() {
        assert_eq!(nice([5132.0, 598000.0], 10), [0.0, 600000.0]);
        assert_eq!(nice([2020.0, 2023.0], 10), [2020.0, 2023.0]);
        assert_eq!(nice([0.12, 0.87], 10), [0.1, 0.9]);
        assert_eq!(nice([7.0, 7.0], 10), [7.0, 7.0]);
        assert_eq!(nice([10.0, 1.0], 10), [10.0, 1.0]);
    }
}
