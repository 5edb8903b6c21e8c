//! Per-symbol CSV persistence for trade records

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::cache::SymbolCache;
use crate::common::errors::{ClientError, Result};
use crate::common::types::TradeRecord;

/// Column order of the backing files
const HEADER: [&str; 6] = ["id", "price", "volume", "funds", "time", "trend"];

/// Reads and writes one tabular record file per symbol.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write cannot corrupt a previously-good file. Failures are per
/// symbol; one bad file never affects the others.
#[derive(Debug, Clone)]
pub struct TradeStore {
    data_dir: PathBuf,
}

impl TradeStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// Backing file path for a symbol
    pub fn file_path(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", symbol))
    }

    /// Read a symbol's backing file into records.
    ///
    /// Returns an empty set when the file does not exist yet.
    pub fn hydrate(&self, symbol: &str) -> Result<Vec<TradeRecord>> {
        let path = self.file_path(symbol);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)?;

        let columns = resolve_columns(reader.headers()?, &path)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            records.push(parse_row(&row, &columns, &path)?);
        }

        debug!("Read {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Overwrite a symbol's backing file with the cache contents.
    ///
    /// An empty cache writes nothing and leaves any existing file untouched.
    pub fn persist(&self, symbol: &str, cache: &SymbolCache) -> Result<()> {
        if cache.is_empty() {
            return Ok(());
        }

        let path = self.file_path(symbol);
        let tmp_path = self.data_dir.join(format!("{}.csv.tmp", symbol));

        let mut writer = csv::Writer::from_path(&tmp_path)?;
        writer.write_record(HEADER)?;
        for record in cache.sorted_records() {
            writer.write_record([
                record.id.to_string(),
                record.price.to_string(),
                record.volume.to_string(),
                record.funds.to_string(),
                record.time.to_string(),
                record.trend.clone(),
            ])?;
        }
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp_path, &path)?;
        debug!(
            "Wrote {} records of {} to {}",
            cache.len(),
            symbol,
            path.display()
        );
        Ok(())
    }
}

struct ColumnMap {
    id: usize,
    price: usize,
    volume: usize,
    funds: usize,
    time: usize,
    trend: usize,
}

fn resolve_columns(headers: &csv::StringRecord, path: &Path) -> Result<ColumnMap> {
    let find = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                ClientError::Persistence(format!(
                    "Missing column '{}' in {}",
                    name,
                    path.display()
                ))
            })
    };

    Ok(ColumnMap {
        id: find("id")?,
        price: find("price")?,
        volume: find("volume")?,
        funds: find("funds")?,
        time: find("time")?,
        trend: find("trend")?,
    })
}

fn parse_row(row: &csv::StringRecord, columns: &ColumnMap, path: &Path) -> Result<TradeRecord> {
    let field = |index: usize, name: &str| -> Result<&str> {
        row.get(index).ok_or_else(|| {
            ClientError::Persistence(format!("Short row in {}: no '{}'", path.display(), name))
        })
    };
    let parse_err = |name: &str, value: &str| {
        ClientError::Persistence(format!(
            "Invalid '{}' value '{}' in {}",
            name,
            value,
            path.display()
        ))
    };

    let id_raw = field(columns.id, "id")?;
    let price_raw = field(columns.price, "price")?;
    let volume_raw = field(columns.volume, "volume")?;
    let funds_raw = field(columns.funds, "funds")?;
    let time_raw = field(columns.time, "time")?;
    let trend = field(columns.trend, "trend")?.to_string();

    Ok(TradeRecord {
        id: id_raw.parse().map_err(|_| parse_err("id", id_raw))?,
        price: price_raw.parse().map_err(|_| parse_err("price", price_raw))?,
        volume: volume_raw
            .parse()
            .map_err(|_| parse_err("volume", volume_raw))?,
        funds: funds_raw.parse().map_err(|_| parse_err("funds", funds_raw))?,
        time: time_raw.parse().map_err(|_| parse_err("time", time_raw))?,
        trend,
    })
}
