use crate::types::SimulationTable;

/// Min-max scales `series` onto `[0, 1]`, skipping missing values.
///
/// A series without spread maps every present value to zero.
///
/// ```rust
/// use ecoliframe_core::analysis::normalize_series;
///
/// let scaled = normalize_series(&[Some(10.0), None, Some(20.0), Some(30.0)]);
/// assert_eq!(scaled, vec![Some(0.0), None, Some(0.5), Some(1.0)]);
/// ```
#[must_use]
pub fn normalize_series(series: &[Option<f64>]) -> Vec<Option<f64>> {
    let (min, max) = series
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;
    series
        .iter()
        .map(|value| {
            value.map(|v| if range > 0.0 { (v - min) / range } else { 0.0 })
        })
        .collect()
}

/// Copy of `table` with every efficiency column min-max normalized.
#[must_use]
pub fn normalize_table(table: &SimulationTable) -> SimulationTable {
    let mut normalized = table.clone();
    for slot in 0..table.codon_index().len() {
        let column: Vec<Option<f64>> = table.efficiency_series(slot).collect();
        for (row, value) in normalized.rows.iter_mut().zip(normalize_series(&column)) {
            row.efficiencies[slot] = value;
        }
    }
    normalized
}
