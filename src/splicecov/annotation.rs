use std::collections::{HashMap, HashSet};
use std::io;

use anyhow::Result;
use bio::io::gff;
use bio_types::strand::{ReqStrand, Strand};

use crate::splice_table::gene_id;
use crate::transcript::{SubInterval, SubIntervalKind, Transcript};

/// Feature-type markers recognized in the annotation. Matching is by
/// substring so that e.g. `five_prime_UTR` and `three_prime_UTR` both
/// count as UTR records.
const TRANSCRIPT_MARKER: &str = "mRNA";
const UTR_MARKER: &str = "UTR";
const EXON_MARKER: &str = "exon";

/// Reads a GFF3 stream and builds a transcript per `mRNA` record whose
/// identifier belongs to one of the target genes, then attaches exon
/// and UTR records to the transcript named by their `Parent` (or `ID`)
/// attribute.
///
/// Transcript records must precede their sub-interval records; a
/// sub-interval whose transcript has not been seen is dropped with a
/// diagnostic, as is any record that fails to parse. Neither aborts
/// the load.
pub fn load_transcripts<R: io::Read>(
    input: R,
    genes: &HashSet<String>,
) -> Result<HashMap<String, Transcript>> {
    let mut reader = gff::Reader::new(input, gff::GffType::GFF3);
    let mut transcripts = HashMap::new();

    for result in reader.records() {
        let rec = match result {
            Ok(rec) => rec,
            Err(err) => {
                eprintln!("skipping unparseable annotation record: {}", err);
                continue;
            }
        };

        let feature = rec.feature_type();
        if feature.contains(TRANSCRIPT_MARKER) {
            add_transcript(&mut transcripts, genes, &rec);
        } else if feature.contains(UTR_MARKER) {
            add_sub_interval(&mut transcripts, genes, &rec, SubIntervalKind::Utr);
        } else if feature.contains(EXON_MARKER) {
            add_sub_interval(&mut transcripts, genes, &rec, SubIntervalKind::Exon);
        }
    }

    Ok(transcripts)
}

fn add_transcript(
    transcripts: &mut HashMap<String, Transcript>,
    genes: &HashSet<String>,
    rec: &gff::Record,
) {
    let name = match rec.attributes().get("ID") {
        Some(id) => id,
        None => return,
    };

    if !genes.contains(gene_id(name)) {
        return;
    }

    let strand = match rec.strand() {
        Some(Strand::Forward) => ReqStrand::Forward,
        Some(Strand::Reverse) => ReqStrand::Reverse,
        _ => {
            eprintln!("skipping transcript {} without a strand", name);
            return;
        }
    };

    let chromosome = chromosome_number(rec.seqname());
    let trx = match Transcript::new(
        name.to_string(),
        chromosome,
        *rec.start() as usize,
        *rec.end() as usize,
        strand,
    ) {
        Ok(trx) => trx,
        Err(err) => {
            eprintln!("skipping transcript record: {}", err);
            return;
        }
    };

    transcripts.insert(name.to_string(), trx);
}

fn add_sub_interval(
    transcripts: &mut HashMap<String, Transcript>,
    genes: &HashSet<String>,
    rec: &gff::Record,
    kind: SubIntervalKind,
) {
    let attributes = rec.attributes();
    let parent = match attributes.get("Parent").or_else(|| attributes.get("ID")) {
        Some(parent) => parent,
        None => return,
    };

    if !genes.contains(gene_id(parent)) {
        return;
    }

    match transcripts.get_mut(parent.as_str()) {
        Some(trx) => trx.add_sub_interval(SubInterval::new(
            *rec.start() as usize,
            *rec.end() as usize,
            kind,
        )),
        None => eprintln!("couldn't find transcript {} for a {:?} record", parent, kind),
    }
}

/// Strips a leading `Chr` label and converts the rest to a chromosome
/// number. Anything non-numeric maps to chromosome 0, which no real
/// alignment matches.
fn chromosome_number(seqname: &str) -> u32 {
    seqname.trim_start_matches("Chr").parse().unwrap_or(0)
}
