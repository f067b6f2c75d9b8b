use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One catalog row, serialized with the catalog's column names.
#[derive(Debug, Serialize)]
struct SampleGlass {
    #[serde(rename = "Fabricante")]
    manufacturer: String,
    #[serde(rename = "Modelo")]
    model: String,
    #[serde(rename = "Tipo de vidro")]
    glass_type: &'static str,
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
    #[serde(rename = "Custo")]
    cost: Option<f64>,
    #[serde(rename = "Aspecto")]
    aspect: &'static str,
    #[serde(rename = "HEX")]
    hex: String,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`, rounded to one decimal.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        ((lo + (hi - lo) * self.next_f64()) * 10.0).round() / 10.0
    }
}

/// Tint name and base colour of each aspect.
const ASPECTS: [(&str, [u8; 3]); 5] = [
    ("Incolor", [0xE8, 0xF1, 0xF2]),
    ("Verde", [0x7F, 0xB0, 0x8E]),
    ("Azul", [0x6A, 0x9F, 0xC8]),
    ("Cinza", [0x8A, 0x8F, 0x94]),
    ("Bronze", [0xA9, 0x83, 0x5C]),
];

fn generate(rng: &mut SimpleRng) -> Vec<SampleGlass> {
    let manufacturers = ["Vitra", "Solaris", "Cristalux"];
    let mut rows = Vec::new();

    for manufacturer in manufacturers {
        for (series, &(aspect, rgb)) in ASPECTS.iter().enumerate() {
            for (glass_type, u_range) in [("Laminado", (5.0, 5.8)), ("Insulado", (1.6, 3.0))] {
                // Darker tints block more light and more heat.
                let transmittance = rng.range(15.0, 90.0) - series as f64 * 4.0;
                let solar_factor = (transmittance * rng.range(0.55, 0.95)).max(5.0);
                let mut shade = |c: u8| c.saturating_sub((rng.next_u64() % 24) as u8);
                let hex = format!("{:02X}{:02X}{:02X}", shade(rgb[0]), shade(rgb[1]), shade(rgb[2]));

                rows.push(SampleGlass {
                    manufacturer: manufacturer.to_string(),
                    model: format!("{}-{}{}", &manufacturer[..3].to_uppercase(), series + 1, &glass_type[..1]),
                    glass_type,
                    solar_factor: (solar_factor * 10.0).round() / 10.0,
                    luminous_transmittance: transmittance.max(1.0),
                    u_factor: rng.range(u_range.0, u_range.1),
                    external_reflectance: rng.range(5.0, 35.0),
                    internal_reflectance: rng.range(5.0, 30.0),
                    // Roughly one catalog entry in six has no published price.
                    cost: (rng.next_u64() % 6 != 0).then(|| rng.range(180.0, 2400.0)),
                    aspect,
                    hex,
                });
            }
        }
    }
    rows
}

fn write_csv(rows: &[SampleGlass], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[SampleGlass], path: &str) -> Result<()> {
    let text = |f: fn(&SampleGlass) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let number = |f: fn(&SampleGlass) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Fabricante", DataType::Utf8, false),
        Field::new("Modelo", DataType::Utf8, false),
        Field::new("Tipo de vidro", DataType::Utf8, false),
        Field::new("Fator Solar", DataType::Float64, false),
        Field::new("Transmitancia Luminosa", DataType::Float64, false),
        Field::new("Fator U", DataType::Float64, false),
        Field::new("Reflexao externa", DataType::Float64, false),
        Field::new("Reflexao interna", DataType::Float64, false),
        Field::new("Custo", DataType::Float64, true),
        Field::new("Aspecto", DataType::Utf8, false),
        Field::new("HEX", DataType::Utf8, false),
    ]));

    let cost: ArrayRef = Arc::new(Float64Array::from(
        rows.iter().map(|r| r.cost).collect::<Vec<_>>(),
    ));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.manufacturer.as_str()),
            text(|r| r.model.as_str()),
            text(|r| r.glass_type),
            number(|r| r.solar_factor),
            number(|r| r.luminous_transmittance),
            number(|r| r.u_factor),
            number(|r| r.external_reflectance),
            number(|r| r.internal_reflectance),
            cost,
            text(|r| r.aspect),
            text(|r| r.hex.as_str()),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows, "vid_input.csv")?;
    write_parquet(&rows, "vid_input.parquet")?;

    println!(
        "Wrote {} sample glasses to vid_input.csv and vid_input.parquet",
        rows.len()
    );
    Ok(())
}
