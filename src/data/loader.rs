use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use super::error::DataError;
use super::model::{
    RawSale, SalesDataset, COL_CUSTOMER, COL_ORDER_DATE, COL_ORDER_ID, COL_PRODUCT, COL_REGION,
    COL_SALES, REQUIRED_COLUMNS,
};
use super::normalize::{normalize, EXPORT_DATE_FORMAT};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and normalize a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the six required columns (extra columns ignored)
/// * `.json`    – `[{ "Order ID": ..., "Order Date": ..., ... }, ...]`
/// * `.parquet` – one column per required field, `Sales` numeric
///
/// A missing file is reported as [`DataError::NotFound`]; rows with an
/// unparseable date are dropped, not rejected.
pub fn load_file(path: &Path) -> Result<SalesDataset> {
    let rows = read_rows(path)?;
    let dataset = normalize(rows, Some(path.to_path_buf()));
    log::info!(
        "Loaded {} sales from {} ({} dropped)",
        dataset.len(),
        path.display(),
        dataset.dropped_rows
    );
    Ok(dataset)
}

/// Load the dataset again from the file it came from.
pub fn reload(dataset: &SalesDataset) -> Result<SalesDataset> {
    match &dataset.source {
        Some(path) => load_file(path),
        None => bail!("dataset was not loaded from a file"),
    }
}

/// Read raw rows without normalizing them.
pub fn read_rows(path: &Path) -> Result<Vec<RawSale>> {
    if !path.exists() {
        return Err(DataError::NotFound(path.to_path_buf()).into());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(path),
        "json" => read_json(path),
        "parquet" | "pq" => read_parquet(path),
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
}

/// Write the normalized dataset back out as CSV with the required columns.
///
/// Dates are written as `YYYY-MM-DD HH:MM:SS`, which [`load_file`] reads
/// back to the same timestamp.
pub fn save_csv(dataset: &SalesDataset, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    // Written by hand so an empty dataset still exports a loadable header.
    writer
        .write_record(REQUIRED_COLUMNS)
        .context("writing CSV header")?;

    for sale in &dataset.sales {
        let order_date = sale.order_date.format(EXPORT_DATE_FORMAT).to_string();
        writer
            .serialize(ExportRow {
                order_id: &sale.order_id,
                order_date: &order_date,
                product: &sale.product,
                customer: &sale.customer,
                region: &sale.region,
                sales: sale.amount,
            })
            .context("writing CSV row")?;
    }

    writer.flush().context("flushing CSV output")?;
    log::info!("Exported {} sales to {}", dataset.len(), path.display());
    Ok(())
}

#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Order ID")]
    order_id: &'a str,
    #[serde(rename = "Order Date")]
    order_date: &'a str,
    #[serde(rename = "Product Name")]
    product: &'a str,
    #[serde(rename = "Customer Name")]
    customer: &'a str,
    #[serde(rename = "Region")]
    region: &'a str,
    #[serde(rename = "Sales")]
    sales: f64,
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Positions of the required columns, resolved once per source.
struct ColumnIndex {
    order_id: usize,
    order_date: usize,
    product: usize,
    customer: usize,
    region: usize,
    sales: usize,
}

impl ColumnIndex {
    fn resolve(lookup: impl Fn(&str) -> Option<usize>) -> Result<Self, DataError> {
        let find = |name: &'static str| lookup(name).ok_or(DataError::MissingColumn(name));
        Ok(ColumnIndex {
            order_id: find(COL_ORDER_ID)?,
            order_date: find(COL_ORDER_DATE)?,
            product: find(COL_PRODUCT)?,
            customer: find(COL_CUSTOMER)?,
            region: find(COL_REGION)?,
            sales: find(COL_SALES)?,
        })
    }
}

fn parse_amount(text: &str, row: usize) -> Result<f64, DataError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| DataError::InvalidAmount {
            row,
            value: text.to_string(),
        })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Vec<RawSale>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV file")?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let cols = ColumnIndex::resolve(|name| headers.iter().position(|h| h == name))?;

    let mut rows = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.with_context(|| format!("CSV row {row}"))?;
        let text = |idx: usize| record.get(idx).unwrap_or("").to_string();

        rows.push(RawSale {
            order_id: text(cols.order_id),
            order_date: text(cols.order_date),
            product: text(cols.product),
            customer: text(cols.customer),
            region: text(cols.region),
            amount: parse_amount(record.get(cols.sales).unwrap_or(""), row)?,
        });
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Order ID": "CA-2017-152156",
///     "Order Date": "08/11/2017",
///     "Product Name": "Bush Somerset Collection Bookcase",
///     "Customer Name": "Claire Gute",
///     "Region": "South",
///     "Sales": 261.96
///   },
///   ...
/// ]
/// ```
fn read_json(path: &Path) -> Result<Vec<RawSale>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let row = i + 1;
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {row} is not a JSON object"))?;

        rows.push(RawSale {
            order_id: json_text(obj, COL_ORDER_ID)?,
            order_date: json_text(obj, COL_ORDER_DATE)?,
            product: json_text(obj, COL_PRODUCT)?,
            customer: json_text(obj, COL_CUSTOMER)?,
            region: json_text(obj, COL_REGION)?,
            amount: json_amount(obj, row)?,
        });
    }

    Ok(rows)
}

fn json_text(obj: &Map<String, JsonValue>, col: &'static str) -> Result<String, DataError> {
    match obj.get(col) {
        None => Err(DataError::MissingColumn(col)),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(JsonValue::Null) => Ok(String::new()),
        Some(other) => Ok(other.to_string()),
    }
}

fn json_amount(obj: &Map<String, JsonValue>, row: usize) -> Result<f64, DataError> {
    match obj.get(COL_SALES) {
        None => Err(DataError::MissingColumn(COL_SALES)),
        Some(JsonValue::Number(n)) => n.as_f64().ok_or_else(|| DataError::InvalidAmount {
            row,
            value: n.to_string(),
        }),
        Some(JsonValue::String(s)) => parse_amount(s, row),
        Some(other) => Err(DataError::InvalidAmount {
            row,
            value: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Text columns may be any Arrow type with a display form (strings, integer
/// ids, timestamps); `Sales` must cast to `Float64`.
fn read_parquet(path: &Path) -> Result<Vec<RawSale>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let cols = ColumnIndex::resolve(|name| schema.index_of(name).ok())?;

        let sales = cast(batch.column(cols.sales).as_ref(), &DataType::Float64)
            .context("casting 'Sales' column to Float64")?;
        let sales = sales.as_primitive::<Float64Type>();

        for i in 0..batch.num_rows() {
            let row = rows.len() + 1;
            let text = |idx: usize| arrow_text(batch.column(idx), i);

            if sales.is_null(i) {
                let original = text(cols.sales)?;
                return Err(DataError::InvalidAmount {
                    row,
                    value: original,
                }
                .into());
            }

            rows.push(RawSale {
                order_id: text(cols.order_id)?,
                order_date: text(cols.order_date)?,
                product: text(cols.product)?,
                customer: text(cols.customer)?,
                region: text(cols.region)?,
                amount: sales.value(i),
            });
        }
    }

    Ok(rows)
}

/// Display form of a single Arrow cell; nulls become empty text.
fn arrow_text(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    array_value_to_string(col, row).context("formatting parquet value")
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str = "Row ID,Order ID,Order Date,Product Name,Customer Name,Region,Sales";

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_and_drops_bad_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "vendas.csv",
            &format!(
                "{HEADER}\n\
                 1,O1,15/07/2023,Desk,Ana,North,120.5\n\
                 2,O2,??,Lamp,Bia,South,30\n\
                 3,O3,2023-08-01 10:30:00,\"Chair, oak\",Caio,East,-4\n"
            ),
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.dropped_rows, 1);
        assert_eq!(ds.sales[0].amount, 120.5);
        assert_eq!(ds.sales[1].product, "Chair, oak");
        assert_eq!(ds.sales[1].hour, 10);
        assert_eq!(ds.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn missing_column_rejects_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "vendas.csv",
            "Order ID,Order Date,Product Name,Customer Name,Sales\nO1,15/07/2023,Desk,Ana,1\n",
        );

        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::MissingColumn("Region"))
        ));
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "vendas.csv",
            "order id,Order Date,Product Name,Customer Name,Region,Sales\n",
        );
        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::MissingColumn("Order ID"))
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::NotFound(_))
        ));
    }

    #[test]
    fn non_numeric_amount_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "vendas.csv",
            &format!("{HEADER}\n1,O1,15/07/2023,Desk,Ana,North,abc\n"),
        );
        let err = load_file(&path).unwrap_err();
        match err.downcast_ref::<DataError>() {
            Some(DataError::InvalidAmount { row, value }) => {
                assert_eq!(*row, 1);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "vendas.xlsx", "");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "vendas.json",
            r#"[
                {"Order ID": 17, "Order Date": "08/11/2017", "Product Name": "Bookcase",
                 "Customer Name": "Claire", "Region": "South", "Sales": 261.96},
                {"Order ID": "B2", "Order Date": null, "Product Name": "Chair",
                 "Customer Name": "Dan", "Region": "West", "Sales": "10"}
            ]"#,
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.dropped_rows, 1);
        assert_eq!(ds.sales[0].order_id, "17");
        assert_eq!(ds.sales[0].month.to_string(), "2017-11");
    }

    #[test]
    fn loads_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendas.parquet");

        let text = |values: &[&str]| Arc::new(StringArray::from(values.to_vec())) as ArrayRef;
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
                text(&["O1", "O2"]),
                text(&["01/03/2023 09:00", "31/03/2023 17:45"]),
                text(&["Desk", "Lamp"]),
                text(&["Ana", "Bia"]),
                text(&["North", "South"]),
                Arc::new(Float64Array::from(vec![10.0, 20.5])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.sales[1].amount, 20.5);
        assert_eq!(ds.sales[1].hour, 17);
        assert_eq!(ds.sales[1].quarter, 1);
    }

    #[test]
    fn export_then_reload_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "vendas.csv",
            &format!(
                "{HEADER}\n\
                 1,O1,15/07/2023 08:05:09,Desk,Ana,North,120.1\n\
                 2,O2,bad,Lamp,Bia,South,30\n\
                 3,O3,01/01/2024,Chair,Caio,East,0.3\n"
            ),
        );
        let first = load_file(&path).unwrap();
        assert_eq!(first.dropped_rows, 1);

        let exported = dir.path().join("vendas_tratadas.csv");
        save_csv(&first, &exported).unwrap();
        let second = load_file(&exported).unwrap();

        assert_eq!(second.dropped_rows, 0);
        assert_eq!(first.sales, second.sales);

        let again = reload(&second).unwrap();
        assert_eq!(again.sales, second.sales);
    }

    #[test]
    fn empty_export_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        save_csv(&SalesDataset::default(), &path).unwrap();
        let ds = load_file(&path).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn reload_without_source_fails() {
        assert!(reload(&SalesDataset::default()).is_err());
    }
}
