use super::model::GlassRecord;

// ---------------------------------------------------------------------------
// Marker sizing: cost → marker diameter in points
// ---------------------------------------------------------------------------

pub const SIZE_MIN: f64 = 10.0;
pub const SIZE_MAX: f64 = 40.0;
/// Used for records whose cost is unknown while the others are scaled.
pub const SIZE_MISSING: f64 = (SIZE_MIN + SIZE_MAX) / 2.0;

/// Min-max scale each record's cost into `[SIZE_MIN, SIZE_MAX]`.
///
/// `sizes[i]` belongs to `records[i]`. When every known cost is equal, or no
/// cost is known at all, every record gets `SIZE_MIN`.
pub fn marker_sizes<'a, I>(records: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a GlassRecord>,
    I::IntoIter: Clone,
{
    let records = records.into_iter();
    let costs = records.clone().filter_map(known_cost);

    let (cost_min, cost_max) = costs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
        (lo.min(c), hi.max(c))
    });

    if cost_max > cost_min {
        let span = cost_max - cost_min;
        records
            .map(|r| match known_cost(r) {
                Some(c) => SIZE_MIN + (SIZE_MAX - SIZE_MIN) * (c - cost_min) / span,
                None => SIZE_MISSING,
            })
            .collect()
    } else {
        records.map(|_| SIZE_MIN).collect()
    }
}

fn known_cost(record: &GlassRecord) -> Option<f64> {
    record.cost.filter(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::GlassType;
    use crate::data::model::tests::record;

    fn with_costs(costs: &[Option<f64>]) -> Vec<GlassRecord> {
        costs
            .iter()
            .map(|&c| record(GlassType::Laminated, 30.0, 30.0, c))
            .collect()
    }

    #[test]
    fn two_costs_map_to_the_bounds() {
        let recs = with_costs(&[Some(100.0), Some(300.0)]);
        assert_eq!(marker_sizes(&recs), vec![10.0, 40.0]);
    }

    #[test]
    fn linear_between_bounds() {
        let recs = with_costs(&[Some(0.0), Some(50.0), Some(100.0)]);
        assert_eq!(marker_sizes(&recs), vec![10.0, 25.0, 40.0]);
    }

    #[test]
    fn equal_costs_all_get_minimum() {
        let recs = with_costs(&[Some(250.0), Some(250.0), None]);
        assert_eq!(marker_sizes(&recs), vec![SIZE_MIN; 3]);

        let single = with_costs(&[Some(5.0)]);
        assert_eq!(marker_sizes(&single), vec![SIZE_MIN]);
    }

    #[test]
    fn missing_cost_gets_midpoint_when_scaling() {
        let recs = with_costs(&[Some(100.0), None, Some(f64::NAN), Some(300.0)]);
        assert_eq!(marker_sizes(&recs), vec![10.0, 25.0, 25.0, 40.0]);
    }

    #[test]
    fn empty_input_has_no_sizes() {
        assert!(marker_sizes(&Vec::<GlassRecord>::new()).is_empty());
    }

    #[test]
    fn sizes_stay_in_bounds_and_follow_their_record() {
        let recs = with_costs(&[Some(7.0), Some(1200.0), None, Some(33.3), Some(980.0)]);
        let sizes = marker_sizes(&recs);
        assert!(sizes.iter().all(|s| (SIZE_MIN..=SIZE_MAX).contains(s)));

        let reversed: Vec<GlassRecord> = recs.iter().rev().cloned().collect();
        let mut rev_sizes = marker_sizes(&reversed);
        rev_sizes.reverse();
        assert_eq!(sizes, rev_sizes);
    }
}
