//! Pipe catalog: the discrete set of purchasable pipe sizes.

use tracing::warn;

use crate::error::{HydroError, HydroResult};

/// One purchasable pipe size.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeSpec {
    /// Nominal designation, e.g. "DN100".
    pub label: String,
    /// Internal diameter [m].
    pub d_int_m: f64,
    /// External diameter of the carrier pipe [m].
    pub d_ext_m: f64,
    /// Outer diameter including insulation [m].
    pub d_ins_m: f64,
    /// Installed cost per trench metre, one pipe [currency/m].
    pub cost_per_m: f64,
}

/// Catalog of pipe sizes, held sorted by internal diameter.
#[derive(Debug, Clone)]
pub struct PipeCatalog {
    rows: Vec<PipeSpec>,
}

impl PipeCatalog {
    pub fn new(mut rows: Vec<PipeSpec>) -> HydroResult<Self> {
        if rows.is_empty() {
            return Err(HydroError::EmptyCatalog);
        }
        for row in &rows {
            if !(row.d_int_m > 0.0) || row.d_ext_m < row.d_int_m || row.d_ins_m < row.d_ext_m {
                return Err(HydroError::BadCatalogRow {
                    label: row.label.clone(),
                    d_int_m: row.d_int_m,
                });
            }
        }
        rows.sort_by(|a, b| a.d_int_m.total_cmp(&b.d_int_m));
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[PipeSpec] {
        &self.rows
    }

    /// Smallest row whose internal diameter covers the requirement. A pipe is
    /// never undersized; a requirement beyond the largest row clamps to it
    /// with a warning.
    pub fn select(&self, required_d_int_m: f64) -> &PipeSpec {
        match self
            .rows
            .iter()
            .find(|row| row.d_int_m >= required_d_int_m)
        {
            Some(row) => row,
            None => {
                let largest = self.rows.last().expect("catalog is non-empty");
                warn!(
                    required_d_int_m,
                    largest_d_int_m = largest.d_int_m,
                    "required diameter exceeds catalog, clamping to largest size"
                );
                largest
            }
        }
    }
}
