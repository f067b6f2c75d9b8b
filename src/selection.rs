use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::model::GlassRecord;

// ---------------------------------------------------------------------------
// Selection store
// ---------------------------------------------------------------------------
//
// The table next to the plot lists every glass the user has picked. Entries
// survive filter changes; they leave only through a per-row removal or the
// "Clear all" button.

/// Label shown instead of a price for blank, unreadable or zero costs.
pub const COST_NOT_REPORTED: &str = "cost not reported";

/// A point picked on the plot: its position in the rendered view plus a copy
/// of the record shown there.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedPoint {
    pub point_index: usize,
    pub record: GlassRecord,
}

/// One row of the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEntry {
    /// Assigned on insert, never reused.
    pub id: u64,
    /// Index into the view that was rendered when the point was picked.
    pub point_index: usize,
    pub snapshot: GlassRecord,
}

/// Typed removal action attached to each table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemoveAction {
    pub entry_id: u64,
}

/// Display form of a [`SelectionEntry`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    #[serde(rename = "Fabricante")]
    pub manufacturer: String,
    #[serde(rename = "Modelo")]
    pub model: String,
    #[serde(rename = "Tipo de vidro")]
    pub glass_type: String,
    #[serde(rename = "Fator Solar")]
    pub solar_factor: String,
    #[serde(rename = "Transmitancia Luminosa")]
    pub transmittance: String,
    #[serde(rename = "Fator U")]
    pub u_factor: String,
    #[serde(rename = "Custo")]
    pub cost: String,
    #[serde(skip)]
    pub remove: RemoveAction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionStore {
    entries: Vec<SelectionEntry>,
    next_id: u64,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn contains_point(&self, point_index: usize) -> bool {
        self.entries.iter().any(|e| e.point_index == point_index)
    }

    /// Append every point whose `point_index` is not selected yet.
    ///
    /// Re-selecting a point is a no-op, so merging the same batch twice gives
    /// the same store as merging it once. Returns the number of entries added.
    pub fn merge_selection<I>(&mut self, points: I) -> usize
    where
        I: IntoIterator<Item = SelectedPoint>,
    {
        let mut added = 0;
        for point in points {
            if self.contains_point(point.point_index) {
                continue;
            }
            let id = self.next_id;
            self.next_id += 1;
            log::debug!(
                "Selected point {} ({}) as entry {id}",
                point.point_index,
                point.record.display_name()
            );
            self.entries.push(SelectionEntry {
                id,
                point_index: point.point_index,
                snapshot: point.record,
            });
            added += 1;
        }
        added
    }

    /// Remove the entry with `id`. Unknown ids are ignored; returns whether
    /// anything was removed.
    pub fn remove_by_id(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            log::debug!("Removed selection entry {id}");
        }
        removed
    }

    /// Drop every entry. The id counter keeps running.
    pub fn clear_all(&mut self) {
        log::debug!("Clearing {} selection entries", self.entries.len());
        self.entries.clear();
    }

    /// Stable record keys of the selected glasses, used for plot highlighting.
    pub fn highlighted_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|e| e.snapshot.key)
    }

    pub fn to_table_rows(&self, currency_symbol: &str) -> Vec<TableRow> {
        self.entries
            .iter()
            .map(|e| {
                let r = &e.snapshot;
                TableRow {
                    manufacturer: r.manufacturer.clone(),
                    model: r.model.clone(),
                    glass_type: r.glass_type.label().to_string(),
                    solar_factor: format!("{:.1}", r.solar_factor),
                    transmittance: format!("{:.1}", r.luminous_transmittance),
                    u_factor: r.u_factor.to_string(),
                    cost: format_cost(r.cost, currency_symbol),
                    remove: RemoveAction { entry_id: e.id },
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Cost formatting
// ---------------------------------------------------------------------------

/// `R$ 1,234.50` style: two decimals, comma thousands separator.
/// Missing, non-finite or zero costs read [`COST_NOT_REPORTED`].
pub fn format_cost(cost: Option<f64>, currency_symbol: &str) -> String {
    match cost {
        Some(c) if c.is_finite() && c != 0.0 => {
            let amount = group_thousands(c);
            if currency_symbol.is_empty() {
                amount
            } else {
                format!("{currency_symbol} {amount}")
            }
        }
        _ => COST_NOT_REPORTED.to_string(),
    }
}

fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write the table rows (without the removal column) as CSV.
pub fn export_csv(rows: &[TableRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing selection row")?;
    }
    writer.flush().context("flushing selection CSV")?;
    Ok(())
}
