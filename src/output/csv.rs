// CSV tables consumed by the downstream financial-data steps.
//
// Both tables start with the filing columns. The raw scan then has a text
// column and a keyword-count column per item; the relevant-firms table has
// only the count columns. Count maps are written as JSON objects. Files carry
// a UTF-8 byte order mark so spreadsheet tools detect the encoding.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::models::{
    parse_counts, render_counts, EnrichedFilingRecord, FilingIndexRecord, ItemSection,
    RelevantFirmRecord,
};

/// Leading filing columns shared by both tables.
pub const FILING_COLUMNS: [&str; 6] = [
    "cik",
    "file_date",
    "report_date",
    "company_name",
    "filing_url",
    "sic",
];

const BOM: &[u8] = b"\xEF\xBB\xBF";
const TEXT_SUFFIX: &str = "_text";
const COUNTS_SUFFIX: &str = "_keyword_counts";

/// Column holding an item's section text, e.g. `item_1a_text`.
pub fn text_column(item: &str) -> String {
    format!("item_{}{TEXT_SUFFIX}", item.to_lowercase())
}

/// Column holding an item's keyword counts, e.g. `item_1a_keyword_counts`.
pub fn counts_column(item: &str) -> String {
    format!("item_{}{COUNTS_SUFFIX}", item.to_lowercase())
}

/// Write every scanned filing, section text included.
pub fn write_raw_scan(path: &Path, items: &[String], records: &[EnrichedFilingRecord]) -> Result<()> {
    let mut header: Vec<String> = FILING_COLUMNS.iter().map(|c| c.to_string()).collect();
    for item in items {
        header.push(text_column(item));
        header.push(counts_column(item));
    }

    let mut writer = open_writer(path)?;
    writer.write_record(&header)?;

    for record in records {
        let mut row = filing_fields(&record.filing);
        for item in items {
            match record.sections.iter().find(|s| s.item.eq_ignore_ascii_case(item)) {
                Some(section) => {
                    row.push(section.text.clone());
                    row.push(render_counts(&section.counts));
                }
                None => {
                    row.push(String::new());
                    row.push("{}".to_string());
                }
            }
        }
        writer
            .write_record(&row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// Write the relevant filings without any text columns.
pub fn write_relevant_firms(
    path: &Path,
    items: &[String],
    records: &[RelevantFirmRecord],
) -> Result<()> {
    let mut header: Vec<String> = FILING_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(items.iter().map(|item| counts_column(item)));

    let mut writer = open_writer(path)?;
    writer.write_record(&header)?;

    for record in records {
        let mut row = filing_fields(&record.filing);
        for item in items {
            let counts = record
                .item_counts
                .iter()
                .find(|(code, _)| code.eq_ignore_ascii_case(item))
                .map(|(_, counts)| render_counts(counts))
                .unwrap_or_else(|| "{}".to_string());
            row.push(counts);
        }
        writer
            .write_record(&row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// Read a raw scan table back into enriched records.
///
/// Returns the item codes found in the header (uppercased, in column order)
/// and the records. Missing text columns read as empty text; missing count
/// cells read as empty maps.
pub fn read_raw_scan(path: &Path) -> Result<(Vec<String>, Vec<EnrichedFilingRecord>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open raw scan '{}'", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read header of '{}'", path.display()))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let column = |name: &str| headers.iter().position(|h| h == name);

    let filing_idx: Vec<Option<usize>> = FILING_COLUMNS.iter().map(|c| column(*c)).collect();
    if filing_idx[0].is_none() || filing_idx[4].is_none() {
        anyhow::bail!(
            "'{}' is not a raw keyword scan (missing cik or filing_url column)",
            path.display()
        );
    }

    // (item code, text column, counts column)
    let item_columns: Vec<(String, Option<usize>, usize)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| {
            let code = h.strip_prefix("item_")?.strip_suffix(COUNTS_SUFFIX)?;
            Some((code.to_uppercase(), column(text_column(code).as_str()), i))
        })
        .collect();

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("Failed to parse '{}'", path.display()))?;
        let field = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .unwrap_or_default()
                .to_string()
        };

        let filing = FilingIndexRecord {
            cik: field(filing_idx[0]),
            file_date: parse_date(&field(filing_idx[1])),
            report_date: parse_date(&field(filing_idx[2])),
            company_name: field(filing_idx[3]),
            filing_url: field(filing_idx[4]),
            sic: field(filing_idx[5]),
        };

        let mut sections = Vec::with_capacity(item_columns.len());
        for (item, text_idx, counts_idx) in &item_columns {
            let counts = parse_counts(&field(Some(*counts_idx))).with_context(|| {
                format!("Bad keyword counts for item {item} on data row {}", line + 1)
            })?;
            sections.push(ItemSection {
                item: item.clone(),
                text: field(*text_idx),
                counts,
            });
        }

        records.push(EnrichedFilingRecord { filing, sections });
    }

    let items = item_columns.into_iter().map(|(item, _, _)| item).collect();
    Ok((items, records))
}

fn open_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    out.write_all(BOM)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(csv::Writer::from_writer(out))
}

fn filing_fields(filing: &FilingIndexRecord) -> Vec<String> {
    vec![
        filing.cik.clone(),
        format_date(filing.file_date),
        format_date(filing.report_date),
        filing.company_name.clone(),
        filing.filing_url.clone(),
        filing.sic.clone(),
    ]
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
