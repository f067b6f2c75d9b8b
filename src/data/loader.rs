use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{GlassDataset, GlassRecord, GlassType};
use crate::color::normalize_hex;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a glass catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the catalog column names (recommended)
/// * `.json`    – `[{ "Fabricante": ..., "Fator Solar": ..., ... }, ...]`
/// * `.parquet` – one column per catalog field
pub fn load_file(path: &Path) -> Result<GlassDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading glass catalog {}", path.display()))?;

    if dataset.is_empty() {
        log::warn!("Glass catalog {} has no records", path.display());
    } else {
        log::info!("Loaded {} glass records from {}", dataset.len(), path.display());
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Catalog row, shared by every format
// ---------------------------------------------------------------------------

/// One catalog row as written in the source file, before validation.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Fabricante")]
    manufacturer: String,
    #[serde(rename = "Modelo")]
    model: String,
    #[serde(rename = "Tipo de vidro")]
    glass_type: String,
    #[serde(rename = "Fator Solar")]
    solar_factor: f64,
    #[serde(rename = "Transmitancia Luminosa")]
    luminous_transmittance: f64,
    #[serde(rename = "Fator U")]
    u_factor: f64,
    #[serde(rename = "Reflexao externa")]
    external_reflectance: f64,
    #[serde(rename = "Reflexao interna")]
    internal_reflectance: f64,
    /// Blank or non-numeric costs become `None`.
    #[serde(rename = "Custo", default, deserialize_with = "csv::invalid_option")]
    cost: Option<f64>,
    #[serde(rename = "Aspecto", default)]
    aspect: String,
    #[serde(rename = "HEX", default)]
    hex: String,
}

impl CatalogRow {
    fn into_record(self, row: usize) -> Result<GlassRecord> {
        let glass_type: GlassType = self
            .glass_type
            .parse()
            .with_context(|| format!("Row {row}: invalid 'Tipo de vidro'"))?;

        let color_hex = normalize_hex(&self.hex);
        if crate::color::parse_hex(&color_hex).is_none() {
            log::warn!("Row {row}: colour code {:?} is not #RRGGBB", self.hex);
        }

        Ok(GlassRecord {
            key: row,
            manufacturer: self.manufacturer,
            model: self.model,
            glass_type,
            solar_factor: self.solar_factor,
            luminous_transmittance: self.luminous_transmittance,
            u_factor: self.u_factor,
            external_reflectance: self.external_reflectance,
            internal_reflectance: self.internal_reflectance,
            cost: self.cost,
            aspect: self.aspect,
            color_hex,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<GlassDataset> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<GlassDataset> {
    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<CatalogRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(row.into_record(row_no)?);
    }
    Ok(GlassDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "Fabricante": "Acme", "Modelo": "X1", "Tipo de vidro": "Laminado",
///     "Fator Solar": 42.0, "Transmitancia Luminosa": 55.0, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<GlassDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<GlassDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, value) in rows.iter().enumerate() {
        if !value.is_object() {
            bail!("Row {i} is not a JSON object");
        }
        let row: CatalogRow = serde_json::from_value(value.clone())
            .with_context(|| format!("Row {i}: missing or invalid field"))?;
        records.push(row.into_record(i)?);
    }
    Ok(GlassDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet catalog: one column per catalog field, numeric columns as
/// Float64/Float32/Int64/Int32, text columns as Utf8/LargeUtf8. `Custo`,
/// `Aspecto` and `HEX` may be absent.
fn load_parquet(path: &Path) -> Result<GlassDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = ParquetColumns::locate(&batch)?;
        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let raw = columns
                .row(row)
                .with_context(|| format!("Parquet row {row_no}"))?;
            records.push(raw.into_record(row_no)?);
        }
    }
    Ok(GlassDataset::from_records(records))
}

/// Column handles of one record batch.
struct ParquetColumns {
    manufacturer: ArrayRef,
    model: ArrayRef,
    glass_type: ArrayRef,
    solar_factor: ArrayRef,
    luminous_transmittance: ArrayRef,
    u_factor: ArrayRef,
    external_reflectance: ArrayRef,
    internal_reflectance: ArrayRef,
    cost: Option<ArrayRef>,
    aspect: Option<ArrayRef>,
    hex: Option<ArrayRef>,
}

impl ParquetColumns {
    fn locate(batch: &RecordBatch) -> Result<Self> {
        let required = |name: &str| -> Result<ArrayRef> {
            batch
                .column_by_name(name)
                .cloned()
                .with_context(|| format!("Parquet file missing '{name}' column"))
        };
        let optional = |name: &str| batch.column_by_name(name).cloned();

        Ok(ParquetColumns {
            manufacturer: required("Fabricante")?,
            model: required("Modelo")?,
            glass_type: required("Tipo de vidro")?,
            solar_factor: required("Fator Solar")?,
            luminous_transmittance: required("Transmitancia Luminosa")?,
            u_factor: required("Fator U")?,
            external_reflectance: required("Reflexao externa")?,
            internal_reflectance: required("Reflexao interna")?,
            cost: optional("Custo"),
            aspect: optional("Aspecto"),
            hex: optional("HEX"),
        })
    }

    fn row(&self, row: usize) -> Result<CatalogRow> {
        let number = |col: &ArrayRef, name: &str| -> Result<f64> {
            extract_f64(col, row).with_context(|| format!("'{name}' is null or not numeric"))
        };
        let optional_text =
            |col: &Option<ArrayRef>| col.as_ref().and_then(|c| extract_text(c, row)).unwrap_or_default();

        Ok(CatalogRow {
            manufacturer: extract_text(&self.manufacturer, row).unwrap_or_default(),
            model: extract_text(&self.model, row).unwrap_or_default(),
            glass_type: extract_text(&self.glass_type, row).unwrap_or_default(),
            solar_factor: number(&self.solar_factor, "Fator Solar")?,
            luminous_transmittance: number(&self.luminous_transmittance, "Transmitancia Luminosa")?,
            u_factor: number(&self.u_factor, "Fator U")?,
            external_reflectance: number(&self.external_reflectance, "Reflexao externa")?,
            internal_reflectance: number(&self.internal_reflectance, "Reflexao interna")?,
            cost: self.cost.as_ref().and_then(|c| extract_f64(c, row)),
            aspect: optional_text(&self.aspect),
            hex: optional_text(&self.hex),
        })
    }
}

// -- Parquet / Arrow helpers --

/// Read a numeric cell as `f64`. Text cells are parsed; nulls give `None`.
fn extract_f64(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Utf8 | DataType::LargeUtf8 => {
            extract_text(col, row).and_then(|s| s.trim().parse().ok())
        }
        _ => None,
    }
}

/// Read a text cell. Numeric cells are rendered (e.g. an all-digit HEX code).
fn extract_text(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| s.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str = "Fabricante,Modelo,Tipo de vidro,Fator Solar,Transmitancia Luminosa,\
Fator U,Reflexao externa,Reflexao interna,Custo,Aspecto,HEX";

    fn csv_dataset(body: &str) -> Result<GlassDataset> {
        let text = format!("{HEADER}\n{body}");
        read_csv(csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(text.as_bytes()))
    }

    #[test]
    fn csv_rows_become_records() {
        let ds = csv_dataset(
            "Acme,Solar 40,Laminado,40.5,62,5.6,10,11,1234.5,Verde,a1b2c3\n\
             Vitra,Cool 20,Insulado,20,35.2,2.8,18,14,,Prata,#C0C0C0\n",
        )
        .unwrap();

        assert_eq!(ds.len(), 2);
        let first = &ds.records[0];
        assert_eq!(first.key, 0);
        assert_eq!(first.glass_type, GlassType::Laminated);
        assert_eq!(first.luminous_transmittance, 62.0);
        assert_eq!(first.cost, Some(1234.5));
        assert_eq!(first.color_hex, "#A1B2C3");

        let second = &ds.records[1];
        assert_eq!(second.key, 1);
        assert_eq!(second.cost, None);
        assert_eq!(second.color_hex, "#C0C0C0");
    }

    #[test]
    fn csv_unparseable_cost_is_unreported() {
        let ds = csv_dataset("Acme,X,Laminado,40,60,5,10,11,n/a,Incolor,FFFFFF\n").unwrap();
        assert_eq!(ds.records[0].cost, None);

        let ds = csv_dataset("Acme,X,Laminado,40,60,5,10,11,0,Incolor,FFFFFF\n").unwrap();
        assert_eq!(ds.records[0].cost, Some(0.0));
    }

    #[test]
    fn csv_non_ascii_colour_code_loads_as_malformed() {
        let ds = csv_dataset("Acme,X,Laminado,40,60,5,10,11,1,Incolor,aééb\n").unwrap();
        assert_eq!(ds.records[0].color_hex, "#aééb");
        assert!(crate::color::parse_hex(&ds.records[0].color_hex).is_none());
    }

    #[test]
    fn header_only_csv_is_an_empty_catalog() {
        let ds = csv_dataset("").unwrap();
        assert!(ds.is_empty());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, format!("{HEADER}\n")).unwrap();
        assert!(load_file(&path).unwrap().is_empty());
    }

    #[test]
    fn csv_unknown_glass_type_fails() {
        let err = csv_dataset("Acme,X,Temperado,40,60,5,10,11,1,Incolor,FFFFFF\n").unwrap_err();
        assert!(format!("{err:#}").contains("Temperado"));
    }

    #[test]
    fn csv_non_numeric_solar_factor_fails() {
        assert!(csv_dataset("Acme,X,Laminado,high,60,5,10,11,1,Incolor,FFFFFF\n").is_err());
    }

    #[test]
    fn load_file_reads_csv_from_disk_and_rejects_unknown_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vid_input.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{HEADER}").unwrap();
        writeln!(f, "Acme,X,Insulado,30,50,2.9,12,13,800,Azul,336699").unwrap();
        drop(f);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records[0].glass_type, GlassType::Insulated);

        assert!(load_file(&dir.path().join("catalog.xlsx")).is_err());
        assert!(load_file(&dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn bundled_catalog_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("vid_input.csv");
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 12);
        assert!(ds.records.iter().all(|r| r.color_hex.len() == 7));
        assert_eq!(ds.records[3].cost, None);
        assert_eq!(ds.records[7].cost, None);
    }

    #[test]
    fn json_records_are_loaded() {
        let ds = parse_json(
            r##"[
                {"Fabricante": "Acme", "Modelo": "J1", "Tipo de vidro": "Insulado",
                 "Fator Solar": 25, "Transmitancia Luminosa": 44.5, "Fator U": 1.9,
                 "Reflexao externa": 20, "Reflexao interna": 15, "Custo": null,
                 "Aspecto": "Azul", "HEX": "#3366cc"},
                {"Fabricante": "Acme", "Modelo": "J2", "Tipo de vidro": "Laminado",
                 "Fator Solar": 55, "Transmitancia Luminosa": 70, "Fator U": 5.5,
                 "Reflexao externa": 8, "Reflexao interna": 8, "Custo": 410.0}
            ]"##,
        )
        .unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].cost, None);
        assert_eq!(ds.records[0].color_hex, "#3366CC");
        assert_eq!(ds.records[1].cost, Some(410.0));
        assert_eq!(ds.records[1].color_hex, "#");
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(parse_json(r#"{"Fabricante": "Acme"}"#).is_err());
        assert!(parse_json("[1, 2]").is_err());
    }

    #[test]
    fn parquet_catalog_is_loaded() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Fabricante", DataType::Utf8, false),
            Field::new("Modelo", DataType::Utf8, false),
            Field::new("Tipo de vidro", DataType::Utf8, false),
            Field::new("Fator Solar", DataType::Float64, false),
            Field::new("Transmitancia Luminosa", DataType::Int64, false),
            Field::new("Fator U", DataType::Float64, false),
            Field::new("Reflexao externa", DataType::Float64, false),
            Field::new("Reflexao interna", DataType::Float64, false),
            Field::new("Custo", DataType::Float64, true),
            Field::new("HEX", DataType::Utf8, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["Acme", "Vitra"])),
            Arc::new(StringArray::from(vec!["P1", "P2"])),
            Arc::new(StringArray::from(vec!["Laminado", "Insulado"])),
            Arc::new(Float64Array::from(vec![33.0, 61.5])),
            Arc::new(Int64Array::from(vec![48, 77])),
            Arc::new(Float64Array::from(vec![5.6, 2.7])),
            Arc::new(Float64Array::from(vec![9.0, 12.0])),
            Arc::new(Float64Array::from(vec![10.0, 13.0])),
            Arc::new(Float64Array::from(vec![Some(250.0), None])),
            Arc::new(StringArray::from(vec!["00ff00", "#123456"])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].luminous_transmittance, 48.0);
        assert_eq!(ds.records[0].color_hex, "#00FF00");
        assert_eq!(ds.records[0].aspect, "");
        assert_eq!(ds.records[1].glass_type, GlassType::Insulated);
        assert_eq!(ds.records[1].cost, None);
        assert_eq!(ds.records[1].key, 1);
    }
}
