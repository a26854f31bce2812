use std::collections::HashMap;
use std::io;

use anyhow::Result;

use crate::transcript::{SampleSlot, Transcript};

/// One mapped read: reference sequence number, 1-based genomic
/// position, and the number of covered bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentRecord {
    pub chromosome: u32,
    pub pos: usize,
    pub len: usize,
}

/// Outcome of validating a raw input record before accumulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Valid(AlignmentRecord),
    Skip(&'static str),
}

const RNAME_COL: usize = 2;
const POS_COL: usize = 3;
const SEQ_COL: usize = 9;

/// Counts for one accumulation pass. `matched` counts records that
/// contributed coverage to at least one transcript.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassStats {
    pub total: u64,
    pub matched: u64,
    pub skipped: u64,
}

pub fn classify_record(fields: &csv::StringRecord) -> RecordOutcome {
    if fields.len() <= SEQ_COL {
        return RecordOutcome::Skip("fewer fields than an alignment record");
    }

    let pos = match fields[POS_COL].parse::<usize>() {
        Ok(pos) => pos,
        Err(_) => return RecordOutcome::Skip("unparseable position"),
    };

    // A non-numeric reference name becomes chromosome 0, which no real
    // transcript matches.
    let chromosome = fields[RNAME_COL].parse::<u32>().unwrap_or(0);

    RecordOutcome::Valid(AlignmentRecord {
        chromosome,
        pos,
        len: fields[SEQ_COL].len(),
    })
}

/// Adds the record's coverage to every transcript containing its
/// position, returning the number of transcripts hit. Accumulation is
/// a commutative sum, so record order never affects the result.
pub fn apply_record(
    transcripts: &mut HashMap<String, Transcript>,
    slot: SampleSlot,
    rec: &AlignmentRecord,
) -> usize {
    let mut hits = 0;

    for trx in transcripts.values_mut() {
        if trx.contains(rec.chromosome, rec.pos) {
            trx.add_coverage(slot, rec.pos, rec.len);
            hits += 1;
        }
    }

    hits
}

/// Streams tab-separated alignment records into the selected coverage
/// array of every matching transcript. Lines starting with `@` are
/// headers; malformed records are skipped with a diagnostic.
pub fn accumulate<R: io::Read>(
    input: R,
    transcripts: &mut HashMap<String, Transcript>,
    slot: SampleSlot,
) -> Result<PassStats> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'@'))
        .from_reader(input);

    let mut stats = PassStats::default();

    for result in reader.records() {
        let fields = result?;
        stats.total += 1;

        match classify_record(&fields) {
            RecordOutcome::Valid(rec) => {
                if apply_record(transcripts, slot, &rec) > 0 {
                    stats.matched += 1;
                }
            }
            RecordOutcome::Skip(reason) => {
                stats.skipped += 1;
                eprintln!("skipping alignment record {}: {}", stats.total, reason);
            }
        }
    }

    Ok(stats)
}
