use std::collections::BTreeSet;

use super::model::{GlassDataset, GlassRecord, GlassType};

// ---------------------------------------------------------------------------
// Filter criteria: type checkboxes + two range sliders
// ---------------------------------------------------------------------------

/// Inclusive numeric range `[min, max]` on the 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const FULL: Range = Range { min: 0.0, max: 100.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Range { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for Range {
    fn default() -> Self {
        Range::FULL
    }
}

/// What the user currently asks to see. Rebuilt from the widgets on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Empty set means "all types".
    pub glass_types: BTreeSet<GlassType>,
    pub solar_factor: Range,
    pub transmittance: Range,
}

/// Both types ticked, full ranges: the dashboard's initial state.
impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            glass_types: GlassType::ALL.into_iter().collect(),
            solar_factor: Range::FULL,
            transmittance: Range::FULL,
        }
    }
}

impl FilterCriteria {
    /// Whether a single record passes every predicate.
    pub fn matches(&self, record: &GlassRecord) -> bool {
        (self.glass_types.is_empty() || self.glass_types.contains(&record.glass_type))
            && self.solar_factor.contains(record.solar_factor)
            && self.transmittance.contains(record.luminous_transmittance)
    }

    pub fn summary(&self) -> FilterSummary {
        let types_line = if self.glass_types.is_empty() {
            "Showing all glass types".to_string()
        } else {
            let names: Vec<&str> = self.glass_types.iter().map(|t| t.label()).collect();
            format!("Selected types: {}", names.join(", "))
        };
        FilterSummary {
            types_line,
            solar_factor_line: format!(
                "Solar factor: {} to {}",
                self.solar_factor.min, self.solar_factor.max
            ),
            transmittance_line: format!(
                "Transmittance: {} to {}",
                self.transmittance.min, self.transmittance.max
            ),
        }
    }
}

/// Human-readable description of the active filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSummary {
    pub types_line: String,
    pub solar_factor_line: String,
    pub transmittance_line: String,
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Records that passed the filter, as dataset indices in dataset order.
/// Position `i` in `record_indices` is the plot's point index `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    pub record_indices: Vec<usize>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.record_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_indices.is_empty()
    }

    /// Resolve a point index against this view.
    pub fn record<'a>(&self, dataset: &'a GlassDataset, point_index: usize) -> Option<&'a GlassRecord> {
        self.record_indices
            .get(point_index)
            .and_then(|&i| dataset.get(i))
    }

    /// Iterate `(point_index, record)` pairs.
    pub fn iter<'a>(
        &'a self,
        dataset: &'a GlassDataset,
    ) -> impl Iterator<Item = (usize, &'a GlassRecord)> + 'a {
        self.record_indices
            .iter()
            .enumerate()
            .filter_map(move |(pi, &i)| dataset.get(i).map(|r| (pi, r)))
    }
}

/// Return the records passing `criteria`, preserving their relative order.
pub fn filter(dataset: &GlassDataset, criteria: &FilterCriteria) -> FilteredView {
    let record_indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect();
    FilteredView { record_indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn sample() -> GlassDataset {
        GlassDataset::from_records(vec![
            record(GlassType::Laminated, 19.9, 40.0, Some(100.0)),
            record(GlassType::Insulated, 50.0, 70.0, Some(300.0)),
            record(GlassType::Laminated, 35.0, 90.0, None),
            record(GlassType::Insulated, 80.0, 10.0, Some(0.0)),
        ])
    }

    #[test]
    fn empty_type_set_and_full_ranges_keep_everything_in_order() {
        let ds = sample();
        let no_types = FilterCriteria {
            glass_types: BTreeSet::new(),
            ..Default::default()
        };
        let view = filter(&ds, &no_types);
        assert_eq!(view.record_indices, vec![0, 1, 2, 3]);

        let view = filter(&ds, &FilterCriteria::default());
        assert_eq!(view.record_indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let ds = sample();
        let criteria = FilterCriteria {
            solar_factor: Range::new(20.0, 50.0),
            ..Default::default()
        };
        let view = filter(&ds, &criteria);
        assert_eq!(view.record_indices, vec![1, 2]);
    }

    #[test]
    fn type_and_ranges_combine_with_and() {
        let ds = sample();
        let criteria = FilterCriteria {
            glass_types: [GlassType::Laminated].into_iter().collect(),
            solar_factor: Range::new(0.0, 100.0),
            transmittance: Range::new(50.0, 100.0),
        };
        let view = filter(&ds, &criteria);
        assert_eq!(view.record_indices, vec![2]);
        for (i, rec) in ds.records.iter().enumerate() {
            assert_eq!(view.record_indices.contains(&i), criteria.matches(rec));
        }
    }

    #[test]
    fn empty_dataset_yields_empty_view() {
        let view = filter(&GlassDataset::default(), &FilterCriteria::default());
        assert!(view.is_empty());
    }

    #[test]
    fn view_resolves_point_indices() {
        let ds = sample();
        let criteria = FilterCriteria {
            glass_types: [GlassType::Insulated].into_iter().collect(),
            ..Default::default()
        };
        let view = filter(&ds, &criteria);
        assert_eq!(view.record(&ds, 1).map(|r| r.key), Some(3));
        assert!(view.record(&ds, 2).is_none());
        let keys: Vec<(usize, usize)> = view.iter(&ds).map(|(pi, r)| (pi, r.key)).collect();
        assert_eq!(keys, vec![(0, 1), (1, 3)]);
    }

    #[test]
    fn summary_lists_types_and_ranges() {
        let s = FilterCriteria::default().summary();
        assert_eq!(s.types_line, "Selected types: Laminado, Insulado");
        assert_eq!(s.solar_factor_line, "Solar factor: 0 to 100");
        assert_eq!(s.transmittance_line, "Transmittance: 0 to 100");

        let criteria = FilterCriteria {
            glass_types: BTreeSet::new(),
            transmittance: Range::new(20.0, 55.0),
            ..Default::default()
        };
        let s = criteria.summary();
        assert_eq!(s.types_line, "Showing all glass types");
        assert_eq!(s.transmittance_line, "Transmittance: 20 to 55");
    }
}
