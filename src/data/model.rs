use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// GlassType – the "Tipo de vidro" column
// ---------------------------------------------------------------------------

/// Construction of the glass unit. Labels follow the catalog's own spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GlassType {
    Laminated,
    Insulated,
}

impl GlassType {
    pub const ALL: [GlassType; 2] = [GlassType::Laminated, GlassType::Insulated];

    /// Label as it appears in the catalog and in the UI.
    pub fn label(self) -> &'static str {
        match self {
            GlassType::Laminated => "Laminado",
            GlassType::Insulated => "Insulado",
        }
    }
}

impl fmt::Display for GlassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown glass type '{0}' (expected Laminado or Insulado)")]
pub struct GlassTypeParseError(pub String);

impl FromStr for GlassType {
    type Err = GlassTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        GlassType::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| GlassTypeParseError(trimmed.to_string()))
    }
}

// ---------------------------------------------------------------------------
// GlassRecord – one row of the catalog
// ---------------------------------------------------------------------------

/// A single glass product. Never mutated after load.
#[derive(Debug, Clone, PartialEq)]
pub struct GlassRecord {
    /// Row position in the source file; stable for the process lifetime.
    pub key: usize,
    pub manufacturer: String,
    pub model: String,
    pub glass_type: GlassType,
    /// Solar factor, 0–100.
    pub solar_factor: f64,
    /// Luminous transmittance, 0–100.
    pub luminous_transmittance: f64,
    pub u_factor: f64,
    pub external_reflectance: f64,
    pub internal_reflectance: f64,
    /// `None` when the catalog left the cost blank or unreadable.
    pub cost: Option<f64>,
    pub aspect: String,
    /// Canonical `#RRGGBB` (see [`crate::color::normalize_hex`]).
    pub color_hex: String,
}

impl GlassRecord {
    /// "Manufacturer - Model", used as tooltip title and point name.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.manufacturer, self.model)
    }
}

// ---------------------------------------------------------------------------
// GlassDataset – the complete loaded catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct GlassDataset {
    pub records: Vec<GlassRecord>,
}

impl GlassDataset {
    /// Wrap loaded records, re-keying them by position.
    pub fn from_records(mut records: Vec<GlassRecord>) -> Self {
        for (i, rec) in records.iter_mut().enumerate() {
            rec.key = i;
        }
        GlassDataset { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GlassRecord> {
        self.records.get(index)
    }
}
