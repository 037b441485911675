use crate::classifier::{Classification, ClassifiedCell};
use crate::error::{Result, TilingError};
use log::{trace, warn};
use serde::{Deserialize, Serialize};

/// Coverage fraction at or above which a partial tile counts as a whole one.
pub const DEFAULT_PROMOTION_THRESHOLD: f64 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountingRules {
    pub promotion_threshold: f64,
}

impl Default for CountingRules {
    fn default() -> Self {
        Self {
            promotion_threshold: DEFAULT_PROMOTION_THRESHOLD,
        }
    }
}

impl CountingRules {
    pub fn validate(&self) -> Result<()> {
        let t = self.promotion_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(TilingError::InvalidConfig(format!(
                "promotion threshold must be in (0, 1], got {}",
                t
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CoverageResult {
    pub full_tile_count: usize,
    pub rollup_count: usize,
    /// Fractional coverage that has not yet added up to a whole tile.
    /// Always in `[0, 1)`.
    pub residual_pool: f64,
    pub total_tiles: usize,
}

/// Running state of the counting pass.
///
/// Partial tiles below the promotion threshold are pooled. When a fraction
/// would bring the pool to 1.0 or more, one rollup tile is counted and the
/// pool restarts at zero; whatever went past 1.0 is dropped, not carried.
/// The result depends on push order.
#[derive(Debug, Clone)]
pub struct CoverageAccumulator {
    rules: CountingRules,
    full: usize,
    rollup: usize,
    pool: f64,
}

impl CoverageAccumulator {
    pub fn new(rules: CountingRules) -> Self {
        Self {
            rules,
            full: 0,
            rollup: 0,
            pool: 0.0,
        }
    }

    pub fn push(&mut self, classification: Classification, fraction: f64) {
        match classification {
            Classification::FullyInside => self.full += 1,
            Classification::PartiallyInside => self.push_partial(fraction),
            Classification::Outside => {}
        }
    }

    pub fn push_partial(&mut self, fraction: f64) {
        if fraction >= self.rules.promotion_threshold {
            self.full += 1;
        } else if fraction > 0.0 {
            if self.pool + fraction >= 1.0 {
                self.rollup += 1;
                trace!(
                    "pool {:.4} + {:.4} reached a whole tile, rollup #{}",
                    self.pool,
                    fraction,
                    self.rollup
                );
                self.pool = 0.0;
            } else {
                self.pool += fraction;
            }
        } else {
            warn!("ignoring partial tile with coverage fraction {}", fraction);
        }
    }

    pub fn pool(&self) -> f64 {
        self.pool
    }

    pub fn finish(&self) -> CoverageResult {
        let leftover = if self.pool > 0.0 { 1 } else { 0 };
        CoverageResult {
            full_tile_count: self.full,
            rollup_count: self.rollup,
            residual_pool: self.pool,
            total_tiles: self.full + self.rollup + leftover,
        }
    }
}

/// Counts tiles with the default rules.
pub fn count(cells: &[ClassifiedCell], tile_area: f64) -> CoverageResult {
    count_with(cells, tile_area, &CountingRules::default())
}

/// Folds `cells` in order into a [`CoverageResult`].
pub fn count_with(cells: &[ClassifiedCell], tile_area: f64, rules: &CountingRules) -> CoverageResult {
    cells
        .iter()
        .fold(CoverageAccumulator::new(*rules), |mut acc, c| {
            acc.push(c.classification, c.coverage_fraction(tile_area));
            acc
        })
        .finish()
}

#[cfg(test)]
#[path = "accounting_tests.rs"]
mod tests;
