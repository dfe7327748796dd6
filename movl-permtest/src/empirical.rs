use crate::errors::StatsError;

/// Histogram cell count used by [`EmpiricalDistribution::default`].
pub const DEFAULT_CELLS: usize = 100;

///
/// Histogram-backed running distribution of a real-valued statistic.
///
/// Samples accumulate with [`add`]; [`evaluate`] freezes the moments and a
/// piecewise-linear CDF approximation built from a fixed number of
/// equal-width histogram cells over `[low, high]`. Adding a sample
/// invalidates the previous evaluation. Queries fail with a named condition
/// instead of returning a bogus number: [`StatsError::Empty`] without any
/// samples, [`StatsError::NotEvaluated`] before (re-)evaluation, and
/// [`StatsError::InsufficientData`] for the variance of fewer than two
/// samples.
///
/// [`add`]: EmpiricalDistribution::add
/// [`evaluate`]: EmpiricalDistribution::evaluate
#[derive(Debug, Clone)]
pub struct EmpiricalDistribution {
    cells: usize,
    samples: Vec<f64>,
    eval: Option<Evaluation>,
}

#[derive(Debug, Clone)]
struct Evaluation {
    low: f64,
    high: f64,
    mean: f64,
    variance: f64,
    // cumulative sample fractions at the cells+1 cell boundaries
    cdf: Vec<f64>,
}

impl Default for EmpiricalDistribution {
    fn default() -> Self {
        EmpiricalDistribution::new(DEFAULT_CELLS)
    }
}

impl EmpiricalDistribution {
    /// A distribution approximated over `cells` histogram cells (at least 1).
    pub fn new(cells: usize) -> Self {
        EmpiricalDistribution {
            cells: cells.max(1),
            samples: Vec::new(),
            eval: None,
        }
    }

    /// Record one raw sample, invalidating any previous evaluation.
    pub fn add(&mut self, value: f64) {
        self.samples.push(value);
        self.eval = None;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_evaluated(&self) -> bool {
        self.eval.is_some()
    }

    /// Freeze the moments and the piecewise-linear CDF for the samples seen
    /// so far. A no-op on an empty distribution, which stays unevaluated.
    pub fn evaluate(&mut self) {
        if self.samples.is_empty() {
            return;
        }
        let n = self.samples.len() as f64;
        let mut low = f64::INFINITY;
        let mut high = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &x in &self.samples {
            low = low.min(x);
            high = high.max(x);
            sum += x;
        }
        let mean = sum / n;
        let variance = if self.samples.len() < 2 {
            0.0
        } else {
            self.samples
                .iter()
                .map(|&x| (x - mean) * (x - mean))
                .sum::<f64>()
                / (n - 1.0)
        };
        let mut counts = vec![0u64; self.cells];
        if high > low {
            let width = (high - low) / self.cells as f64;
            for &x in &self.samples {
                let cell = (((x - low) / width) as usize).min(self.cells - 1);
                counts[cell] += 1;
            }
        }
        let mut cdf = Vec::with_capacity(self.cells + 1);
        cdf.push(0.0);
        let mut cum = 0u64;
        for &count in &counts {
            cum += count;
            cdf.push(cum as f64 / n);
        }
        self.eval = Some(Evaluation {
            low,
            high,
            mean,
            variance,
            cdf,
        });
    }

    pub fn low(&self) -> Result<f64, StatsError> {
        Ok(self.frozen()?.low)
    }

    pub fn high(&self) -> Result<f64, StatsError> {
        Ok(self.frozen()?.high)
    }

    pub fn mean(&self) -> Result<f64, StatsError> {
        Ok(self.frozen()?.mean)
    }

    /// Unbiased sample variance; needs at least two samples.
    pub fn variance(&self) -> Result<f64, StatsError> {
        let eval = self.frozen()?;
        if self.samples.len() < 2 {
            return Err(StatsError::InsufficientData);
        }
        Ok(eval.variance)
    }

    pub fn std_dev(&self) -> Result<f64, StatsError> {
        Ok(self.variance()?.sqrt())
    }

    /// The approximated `P(X <= x)`, linear within each histogram cell.
    ///
    /// Outside `[low, high]` the CDF is exactly 0 or 1. A degenerate
    /// all-equal distribution steps 0 → ½ → 1 at the single point.
    pub fn cdf(&self, x: f64) -> Result<f64, StatsError> {
        let eval = self.frozen()?;
        if eval.high == eval.low {
            return Ok(if x < eval.low {
                0.0
            } else if x > eval.high {
                1.0
            } else {
                0.5
            });
        }
        if x <= eval.low {
            return Ok(0.0);
        }
        if x >= eval.high {
            return Ok(1.0);
        }
        let width = (eval.high - eval.low) / self.cells as f64;
        let t = (x - eval.low) / width;
        let cell = (t as usize).min(self.cells - 1);
        let frac = t - cell as f64;
        Ok(eval.cdf[cell] + frac * (eval.cdf[cell + 1] - eval.cdf[cell]))
    }

    fn frozen(&self) -> Result<&Evaluation, StatsError> {
        if self.samples.is_empty() {
            return Err(StatsError::Empty);
        }
        self.eval.as_ref().ok_or(StatsError::NotEvaluated)
    }
}
