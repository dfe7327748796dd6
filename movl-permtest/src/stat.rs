use std::collections::BTreeMap;

use crate::empirical::{DEFAULT_CELLS, EmpiricalDistribution};
use crate::errors::StatsError;

///
/// The observed value of one multiplicity paired with its permutation null
/// model.
///
#[derive(Debug, Clone)]
pub struct Distr {
    actual: Option<f64>,
    null: EmpiricalDistribution,
}

impl Distr {
    fn new(cells: usize) -> Self {
        Distr {
            actual: None,
            null: EmpiricalDistribution::new(cells),
        }
    }

    /// The observed (unshuffled) value, if one was recorded.
    pub fn actual(&self) -> Option<f64> {
        self.actual
    }

    /// The null model fed by the permutation rounds.
    pub fn null(&self) -> &EmpiricalDistribution {
        &self.null
    }

    /// True once an actual value is present and the null model has been
    /// evaluated with at least two samples.
    pub fn valid(&self) -> bool {
        self.actual.is_some() && self.null.is_evaluated() && self.null.len() >= 2
    }

    /// Two-sided empirical p-value `min(cdf(actual), 1 - cdf(actual))`.
    ///
    /// Fails [`StatsError::Empty`] when no actual value was recorded, and
    /// with the null model's own condition when it cannot answer.
    pub fn p_value(&self) -> Result<f64, StatsError> {
        let actual = self.actual.ok_or(StatsError::Empty)?;
        let cdf = self.null.cdf(actual)?;
        Ok(cdf.min(1.0 - cdf))
    }

    /// `(actual - mean) / std_dev` against the null model.
    pub fn z_score(&self) -> Result<f64, StatsError> {
        let actual = self.actual.ok_or(StatsError::Empty)?;
        Ok((actual - self.null.mean()?) / self.null.std_dev()?)
    }
}

///
/// Per-multiplicity statistics accumulator for permutation testing.
///
/// The actual pass feeds each multiplicity's observed value once
/// (`is_actual = true`, a later actual add overwrites); every permutation
/// round feeds the null models. After [`evaluate`](Stat::evaluate) the
/// per-multiplicity [`Distr`]s answer p-value and z-score queries.
///
#[derive(Debug, Clone)]
pub struct Stat {
    cells: usize,
    distrs: BTreeMap<u32, Distr>,
}

impl Default for Stat {
    fn default() -> Self {
        Stat::new()
    }
}

impl Stat {
    pub fn new() -> Self {
        Stat::with_cells(DEFAULT_CELLS)
    }

    /// Use `cells` histogram cells for every null model.
    pub fn with_cells(cells: usize) -> Self {
        Stat {
            cells,
            distrs: BTreeMap::new(),
        }
    }

    /// Record one value for `multiplicity`.
    pub fn add(&mut self, multiplicity: u32, value: f64, is_actual: bool) {
        let distr = self
            .distrs
            .entry(multiplicity)
            .or_insert_with(|| Distr::new(self.cells));
        if is_actual {
            distr.actual = Some(value);
        } else {
            distr.null.add(value);
        }
    }

    /// Evaluate every null model. A multiplicity never produced by a
    /// permutation round keeps an unevaluated null model and stays
    /// `!valid()`; its queries fail with the matching precondition.
    pub fn evaluate(&mut self) {
        for distr in self.distrs.values_mut() {
            distr.null.evaluate();
        }
    }

    /// The distribution pair of one multiplicity.
    pub fn distr(&self, multiplicity: u32) -> Result<&Distr, StatsError> {
        self.distrs
            .get(&multiplicity)
            .ok_or(StatsError::MultiplicityNotFound(multiplicity))
    }

    /// Seen multiplicities in ascending order.
    pub fn multiplicities(&self) -> Vec<u32> {
        self.distrs.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.distrs.is_empty()
    }
}
