use std::collections::BTreeMap;
use std::io;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;

/// Per-transcript display metadata from the differential-expression
/// table. The statistic columns are kept verbatim as text; they are
/// only ever printed onto the diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceEntry {
    pub name: String,
    pub gdc_mean: String,
    pub s35_mean: String,
    pub cell_type: String,
    pub log2_ratio: String,
}

/// Gene identifier to its splice variants, in table order. The sorted
/// map keeps gene iteration (and so output) reproducible across runs.
pub type SpliceTable = BTreeMap<String, Vec<SpliceEntry>>;

const NAME_COL: usize = 0;
const GDC_MEAN_COL: usize = 9;
const S35_MEAN_COL: usize = 10;
const CELL_TYPE_COL: usize = 12;
const LOG2_COL: usize = 13;

/// Strips the trailing `.<N>` isoform suffix from a transcript
/// identifier; identifiers without the suffix are their own gene id.
pub fn gene_id(transcript_id: &str) -> &str {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    let suffix = SUFFIX.get_or_init(|| Regex::new(r"^(\S+)\.\d+$").unwrap());

    suffix
        .captures(transcript_id)
        .and_then(|caps| caps.get(1))
        .map_or(transcript_id, |m| m.as_str())
}

pub fn load_splice_table<R: io::Read>(input: R) -> Result<SpliceTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(input);

    let mut table = SpliceTable::new();

    for result in reader.records() {
        let fields = result?;

        if fields.len() <= LOG2_COL {
            eprintln!(
                "skipping splice table row with {} fields: {:?}",
                fields.len(),
                fields.get(NAME_COL).unwrap_or("")
            );
            continue;
        }

        let name = fields[NAME_COL].to_string();
        let entry = SpliceEntry {
            gdc_mean: fields[GDC_MEAN_COL].to_string(),
            s35_mean: fields[S35_MEAN_COL].to_string(),
            cell_type: fields[CELL_TYPE_COL].to_string(),
            log2_ratio: fields[LOG2_COL].to_string(),
            name,
        };

        table
            .entry(gene_id(&entry.name).to_string())
            .or_default()
            .push(entry);
    }

    Ok(table)
}
