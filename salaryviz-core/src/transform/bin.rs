/*
 * SalaryViz
 * Copyright (C) 2024 SalaryViz Contributors
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
use crate::scale::ticks::ticks;
use crate::transform::extent::extent;
use float_cmp::approx_eq;
use salaryviz_common::error::{Result, SalaryVizError};
use serde::{Deserialize, Serialize};

/// Histogram binning parameters.
///
/// With `thresholds` set, bin edges are the round tick values for that count that fall strictly
/// inside the domain, so the number of bins may exceed the count. Otherwise step selection
/// follows the Vega statistics bin algorithm: a step is chosen among powers of `base`
/// (optionally divided by the entries of `divide`) so that the span is covered by at most
/// `maxbins` bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinConfig {
    /// A value in the binned domain at which to anchor the bins. The bin boundaries will be
    /// shifted, if necessary, to ensure that a boundary aligns with the anchor value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<f64>,

    /// The number base to use for automatic bin selection (e.g. base 10)
    pub base: f64,

    /// Scale factors indicating the allowed subdivisions. The default value is [5.0, 2.0],
    /// which indicates that for base 10 numbers, the method may consider dividing bin sizes by 5
    /// and/or 2.
    pub divide: Vec<f64>,

    /// The maximum number of bins allowed
    pub maxbins: f64,

    /// A minimum distance between adjacent bins
    pub minstep: f64,

    /// If true, attempt to make the bin boundaries use human-friendly boundaries
    pub nice: bool,

    /// An exact step size to use between bins. Overrides other options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    /// A list of allowable step sizes to choose from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<f64>>,

    /// Approximate threshold count. Takes precedence over the step search when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<usize>,
}

impl Default for BinConfig {
    fn default() -> Self {
        Self {
            anchor: None,
            base: 10.0,
            divide: vec![5.0, 2.0],
            maxbins: 20.0,
            minstep: 0.0,
            nice: true,
            step: None,
            steps: None,
            thresholds: None,
        }
    }
}

impl BinConfig {
    pub fn with_maxbins(maxbins: usize) -> Self {
        Self {
            maxbins: maxbins as f64,
            ..Default::default()
        }
    }

    pub fn with_thresholds(count: usize) -> Self {
        Self {
            thresholds: Some(count),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.thresholds == Some(0) {
            return Err(SalaryVizError::specification(
                "bin thresholds must be at least 1",
            ));
        }
        if !(self.base > 1.0) {
            return Err(SalaryVizError::specification(format!(
                "bin base must be greater than 1: Received {}",
                self.base
            )));
        }
        if !(self.maxbins >= 1.0) {
            return Err(SalaryVizError::specification(format!(
                "maxbins must be at least 1: Received {}",
                self.maxbins
            )));
        }
        if let Some(step) = self.step {
            if !(step > 0.0) {
                return Err(SalaryVizError::specification(format!(
                    "bin step must be positive: Received {step}"
                )));
            }
        }
        if let Some(steps) = &self.steps {
            if steps.is_empty() || steps.iter().any(|s| !(*s > 0.0)) {
                return Err(SalaryVizError::specification(
                    "bin steps must be a non-empty list of positive values",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinParams {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
    pub n: i32,
}

pub fn calculate_bin_params(extent: [f64; 2], config: &BinConfig) -> Result<BinParams> {
    config.validate()?;

    let [min_, max_] = extent;
    if min_ > max_ {
        return Err(SalaryVizError::specification(format!(
            "extent[1] must be greater than extent[0]: Received {extent:?}"
        )));
    }

    let span = if !approx_eq!(f64, min_, max_) {
        max_ - min_
    } else if !approx_eq!(f64, min_, 0.0) {
        min_.abs()
    } else {
        1.0
    };

    let logb = config.base.ln();

    let step = if let Some(step) = config.step {
        step
    } else if let Some(steps) = &config.steps {
        // Choose the first element of steps that will result in fewer than maxbins
        let min_step_size = span / config.maxbins;
        steps
            .iter()
            .copied()
            .find(|s| *s > min_step_size)
            .or_else(|| steps.last().copied())
            .unwrap_or(min_step_size)
    } else {
        let level = (config.maxbins.ln() / logb).ceil();
        let minstep = config.minstep;
        let mut step = minstep.max(config.base.powf((span.ln() / logb).round() - level));

        // increase step size if too many bins
        while (span / step).ceil() > config.maxbins {
            step *= config.base;
        }

        // decrease step size if allowed
        for div in &config.divide {
            let v = step / div;
            if v >= minstep && span / v <= config.maxbins {
                step = v
            }
        }
        step
    };

    let v = step.ln();
    let precision = if v >= 0.0 {
        0.0
    } else {
        (-v / logb).floor() + 1.0
    };
    let eps = config.base.powf(-precision - 1.0);
    let (min_, max_) = if config.nice {
        let v = (min_ / step + eps).floor() * step;
        let min_ = if min_ < v { v - step } else { v };
        let max_ = (max_ / step).ceil() * step;
        (min_, max_)
    } else {
        (min_, max_)
    };

    let start = min_;
    let stop = if !approx_eq!(f64, max_, min_) {
        max_
    } else {
        min_ + step
    };

    let (start, stop) = if let Some(anchor) = config.anchor {
        let shift = anchor - (start + step * ((anchor - start) / step).floor());
        (start + shift, stop + shift)
    } else {
        (start, stop)
    };

    Ok(BinParams {
        start,
        stop,
        step,
        n: ((stop - start) / step).ceil() as i32,
    })
}

/// A bin `[x0, x1)`. The last bin of a histogram is closed on the right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub x0: f64,
    pub x1: f64,
    pub count: usize,
}

/// Partition `values` into bins covering `domain` contiguously.
///
/// `domain` defaults to the extent of the finite values. Bin thresholds come from
/// [`ticks`] when `config.thresholds` is set and from [`calculate_bin_params`] otherwise. They
/// are clipped to the domain so that the first bin starts at `domain[0]` and the last ends at
/// `domain[1]`. A value equal to a threshold lands in the
/// upper bin. Non-finite values and values outside the domain are not counted.
pub fn bin_values(values: &[f64], domain: Option<[f64; 2]>, config: &BinConfig) -> Result<Vec<Bin>> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let Some([lo, hi]) = domain.or_else(|| extent(&finite)) else {
        return Ok(Vec::new());
    };
    if finite.is_empty() {
        return Ok(Vec::new());
    }
    if !(lo <= hi) {
        return Err(SalaryVizError::specification(format!(
            "bin domain must be ordered: Received [{lo}, {hi}]"
        )));
    }

    if lo == hi {
        let count = finite.iter().filter(|v| **v == lo).count();
        return Ok(vec![Bin {
            x0: lo,
            x1: hi,
            count,
        }]);
    }

    let thresholds: Vec<f64> = bin_thresholds(lo, hi, config)?
        .into_iter()
        .filter(|t| *t > lo && *t < hi)
        .collect();

    let mut bins: Vec<Bin> = std::iter::once(lo)
        .chain(thresholds.iter().copied())
        .zip(thresholds.iter().copied().chain(std::iter::once(hi)))
        .map(|(x0, x1)| Bin { x0, x1, count: 0 })
        .collect();

    let mut outside = 0usize;
    for v in finite {
        if v < lo || v > hi {
            outside += 1;
            continue;
        }
        let index = thresholds.partition_point(|t| *t <= v);
        bins[index].count += 1;
    }
    if outside > 0 {
        log::debug!("{outside} values outside bin domain [{lo}, {hi}] were not binned");
    }

    Ok(bins)
}

fn bin_thresholds(lo: f64, hi: f64, config: &BinConfig) -> Result<Vec<f64>> {
    if let Some(count) = config.thresholds {
        config.validate()?;
        return Ok(ticks(lo, hi, count));
    }
    let BinParams { start, step, n, .. } = calculate_bin_params([lo, hi], config)?;
    Ok((0..=n).map(|i| start + step * i as f64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_bins_split_at_midpoint() {
        let bins = bin_values(
            &[100000.0, 300000.0],
            Some([100000.0, 300000.0]),
            &BinConfig::with_maxbins(2),
        )
        .unwrap();
        assert_eq!(
            bins,
            vec![
                Bin {
                    x0: 100000.0,
                    x1: 200000.0,
                    count: 1
                },
                Bin {
                    x0: 200000.0,
                    x1: 300000.0,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_boundary_value_goes_to_upper_bin() {
        let bins = bin_values(
            &[0.0, 10.0, 10.0, 20.0],
            Some([0.0, 20.0]),
            &BinConfig::with_maxbins(2),
        )
        .unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 3);
    }

    #[test]
    fn test_empty_input_yields_no_bins() {
        let bins = bin_values(&[], None, &BinConfig::default()).unwrap();
        assert!(bins.is_empty());

        let bins = bin_values(&[f64::NAN], None, &BinConfig::default()).unwrap();
        assert!(bins.is_empty());
    }

    #[test]
    fn test_single_value_is_one_closed_bin() {
        let bins = bin_values(&[5.0, 5.0], None, &BinConfig::default()).unwrap();
        assert_eq!(
            bins,
            vec![Bin {
                x0: 5.0,
                x1: 5.0,
                count: 2
            }]
        );
    }

    #[test]
    fn test_bins_partition_domain() {
        let values: Vec<f64> = (0..500).map(|i| 5000.0 + (i * 1187 % 600000) as f64).collect();
        let domain = [0.0, 600000.0];
        let bins = bin_values(&values, Some(domain), &BinConfig::default()).unwrap();

        assert!(bins.len() <= 20);
        assert_eq!(bins.first().unwrap().x0, domain[0]);
        assert_eq!(bins.last().unwrap().x1, domain[1]);
        for pair in bins.windows(2) {
            assert_eq!(pair[0].x1, pair[1].x0);
        }
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
    }

    #[test]
    fn test_tick_thresholds_for_salary_range() {
        let values = [5132.0, 60000.0, 120000.0, 450000.0];
        let bins =
            bin_values(&values, Some([0.0, 450000.0]), &BinConfig::with_thresholds(20)).unwrap();
        assert_eq!(bins.len(), 23);
        assert_eq!(bins[0].x1, 20000.0);
        assert_eq!(bins[21].x0, 420000.0);
        assert_eq!(bins[22].x0, 440000.0);
        assert_eq!(bins[22].x1, 450000.0);
        assert_eq!(bins[22].count, 1);

        let bins =
            bin_values(&values, Some([0.0, 600000.0]), &BinConfig::with_thresholds(20)).unwrap();
        assert_eq!(bins.len(), 30);
        assert!(bins.iter().all(|b| b.x1 - b.x0 == 20000.0));
    }

    #[test]
    fn test_tick_thresholds_two_bins() {
        let bins = bin_values(
            &[100000.0, 300000.0],
            Some([100000.0, 300000.0]),
            &BinConfig::with_thresholds(2),
        )
        .unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].x1, 200000.0);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].count, 1);
    }

    #[test]
    fn test_vega_params_for_salary_range() {
        let params = calculate_bin_params([0.0, 600000.0], &BinConfig::default()).unwrap();
        assert_eq!(params.step, 50000.0);
        assert_eq!(params.start, 0.0);
        assert_eq!(params.stop, 600000.0);
        assert_eq!(params.n, 12);
    }

    #[test]
    fn test_reversed_extent_is_rejected() {
        let err = calculate_bin_params([2.0, 1.0], &BinConfig::default()).unwrap_err();
        assert!(matches!(err, SalaryVizError::SpecificationError(..)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = BinConfig {
            step: Some(0.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(BinConfig::with_maxbins(0).validate().is_err());
        assert!(BinConfig::with_thresholds(0).validate().is_err());
    }
}
