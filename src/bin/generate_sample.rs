//! Writes a deterministic synthetic sales dataset as `vendas.csv` and
//! `vendas.parquet` in the working directory.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use sales_panda::data::model::{
    COL_CUSTOMER, COL_ORDER_DATE, COL_ORDER_ID, COL_PRODUCT, COL_REGION, COL_SALES,
    REQUIRED_COLUMNS,
};

const N_ORDERS: usize = 1200;

const PRODUCTS: [(&str, f64); 12] = [
    ("Office Chair", 180.0),
    ("Standing Desk", 520.0),
    ("Bookcase", 260.0),
    ("Desk Lamp", 45.0),
    ("Monitor 27\"", 330.0),
    ("Mechanical Keyboard", 120.0),
    ("Wireless Mouse", 35.0),
    ("Printer", 240.0),
    ("Paper Pack", 12.0),
    ("Stapler", 9.0),
    ("Headset", 85.0),
    ("Webcam", 70.0),
];

const CUSTOMERS: [&str; 16] = [
    "Ana Souza",
    "Bruno Lima",
    "Carla Dias",
    "Diego Alves",
    "Elisa Rocha",
    "Felipe Costa",
    "Gabriela Nunes",
    "Henrique Melo",
    "Isabela Prado",
    "João Ribeiro",
    "Karina Teixeira",
    "Lucas Martins",
    "Mariana Freitas",
    "Nicolas Barros",
    "Olivia Cardoso",
    "Pedro Gomes",
];

const REGIONS: [&str; 4] = ["Central", "East", "South", "West"];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct SampleRow {
    order_id: String,
    order_date: String,
    product: String,
    customer: String,
    region: String,
    sales: f64,
}

fn generate(rng: &mut SimpleRng) -> Result<Vec<SampleRow>> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).context("invalid start date")?;
    let mut rows = Vec::with_capacity(N_ORDERS);

    for i in 0..N_ORDERS {
        // Later orders land later in the two-year window, with jitter.
        let base_day = (i * 730 / N_ORDERS) as i64;
        let day = (base_day + rng.below(20) as i64 - 10).clamp(0, 729);
        let date = start + Duration::days(day);
        let hour = 8 + rng.below(14);
        let minute = rng.below(60);

        // A handful of rows carry dates the normalizer must drop.
        let order_date = if i % 97 == 13 {
            ["31/02/2023", "n/a", ""][i % 3].to_string()
        } else {
            format!("{} {hour:02}:{minute:02}", date.format("%d/%m/%Y"))
        };

        let (product, price) = PRODUCTS[rng.below(PRODUCTS.len())];
        let quantity = 1 + rng.below(4) as u32;
        let noise = rng.gauss(1.0, 0.08).max(0.5);
        let sales = (price * quantity as f64 * noise * 100.0).round() / 100.0;

        rows.push(SampleRow {
            order_id: format!("BR-{}-{:05}", date.format("%Y"), 10000 + i),
            order_date,
            product: product.to_string(),
            customer: CUSTOMERS[rng.below(CUSTOMERS.len())].to_string(),
            region: REGIONS[rng.below(REGIONS.len())].to_string(),
            sales,
        });
    }

    Ok(rows)
}

fn write_csv(rows: &[SampleRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(REQUIRED_COLUMNS)?;
    for r in rows {
        let sales = r.sales.to_string();
        writer.write_record([
            r.order_id.as_str(),
            r.order_date.as_str(),
            r.product.as_str(),
            r.customer.as_str(),
            r.region.as_str(),
            sales.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[SampleRow], path: &str) -> Result<()> {
    let text = |f: fn(&SampleRow) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new(COL_ORDER_ID, DataType::Utf8, false),
        Field::new(COL_ORDER_DATE, DataType::Utf8, false),
        Field::new(COL_PRODUCT, DataType::Utf8, false),
        Field::new(COL_CUSTOMER, DataType::Utf8, false),
        Field::new(COL_REGION, DataType::Utf8, false),
        Field::new(COL_SALES, DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.order_id.as_str()),
            text(|r| r.order_date.as_str()),
            text(|r| r.product.as_str()),
            text(|r| r.customer.as_str()),
            text(|r| r.region.as_str()),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.sales).collect::<Vec<_>>(),
            )),
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
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng)?;

    write_csv(&rows, "vendas.csv")?;
    write_parquet(&rows, "vendas.parquet")?;

    println!(
        "Wrote {} sales from {} products, {} customers and {} regions to vendas.csv and vendas.parquet",
        rows.len(),
        PRODUCTS.len(),
        CUSTOMERS.len(),
        REGIONS.len()
    );
    Ok(())
}
