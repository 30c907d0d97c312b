//! Portfolio CSV loader
//!
//! Expected layout, columns in any order:
//!
//! ```text
//! Asset,InitialPrice,InitialWeight,AssetType,CorrelationWithIndex
//! World,100,0.6,akcie,0.8
//! Bonds,50,0.4,dluhopis,
//! ```
//!
//! `CorrelationWithIndex` is optional. Without the column every asset gets
//! correlation 0.0; an empty cell leaves it unspecified. Cells may be
//! double-quoted, with `""` standing for a literal quote.

use std::path::Path;

use portsim_core::model::{Asset, AssetClass, Portfolio};

use crate::error::LoadError;

const ASSET: &str = "Asset";
const INITIAL_PRICE: &str = "InitialPrice";
const INITIAL_WEIGHT: &str = "InitialWeight";
const ASSET_TYPE: &str = "AssetType";
const CORRELATION: &str = "CorrelationWithIndex";

/// Correlation of every asset when the column is absent
const MISSING_COLUMN_CORRELATION: f64 = 0.0;

/// Load a portfolio named after the file stem
pub fn load_portfolio(path: &Path) -> Result<Portfolio, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|err| LoadError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    parse_portfolio(&portfolio_name(path), &content)
}

/// File stem used as portfolio name and output prefix
pub fn portfolio_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Split a row on commas outside double quotes. `""` inside quotes is a
/// literal quote; surrounding whitespace is trimmed.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

struct Columns {
    asset: usize,
    price: usize,
    weight: usize,
    class: usize,
    correlation: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self, LoadError> {
        let find = |name: &'static str| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or(LoadError::MissingColumn(name))
        };
        Ok(Self {
            asset: find(ASSET)?,
            price: find(INITIAL_PRICE)?,
            weight: find(INITIAL_WEIGHT)?,
            class: find(ASSET_TYPE)?,
            correlation: find(CORRELATION).ok(),
        })
    }

    /// Fields a row needs; a trailing empty correlation cell may be omitted
    fn required(&self) -> usize {
        [self.asset, self.price, self.weight, self.class]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

fn parse_number(field: &str, line: usize, column: &'static str) -> Result<f64, LoadError> {
    field.parse().map_err(|_| LoadError::MalformedValue {
        line,
        column,
        value: field.to_string(),
    })
}

/// Parse portfolio CSV text and validate the resulting portfolio
pub fn parse_portfolio(name: &str, content: &str) -> Result<Portfolio, LoadError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_start_matches('\u{feff}')))
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Err(LoadError::MissingColumn(ASSET));
    };
    let columns = Columns::from_header(&split_fields(header))?;

    let mut assets = Vec::new();
    for (line_no, line) in lines {
        let fields = split_fields(line);
        if fields.len() < columns.required() {
            return Err(LoadError::MalformedRow {
                line: line_no,
                expected: columns.required(),
                found: fields.len(),
            });
        }

        let asset_name = fields[columns.asset].as_str();
        if asset_name.is_empty() {
            return Err(LoadError::MalformedValue {
                line: line_no,
                column: ASSET,
                value: String::new(),
            });
        }
        let price = parse_number(&fields[columns.price], line_no, INITIAL_PRICE)?;
        let weight = parse_number(&fields[columns.weight], line_no, INITIAL_WEIGHT)?;
        let class = AssetClass::parse(&fields[columns.class]);

        let mut asset = Asset::new(asset_name, class, price, weight);
        match columns.correlation {
            None => asset = asset.with_correlation(MISSING_COLUMN_CORRELATION),
            Some(index) => match fields.get(index).map_or("", String::as_str) {
                "" => {}
                cell => asset = asset.with_correlation(parse_number(cell, line_no, CORRELATION)?),
            },
        }
        assets.push(asset);
    }

    Ok(Portfolio::new(name, assets)?)
}
