use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::alignment;
use crate::annotation;
use crate::layout;
use crate::render;
use crate::splice_table;
use crate::transcript::SampleSlot;

pub struct CLI {
    pub sam: String,
    pub sam2: String,
    pub gff: String,
    pub table: String,
    pub output_dir: String,
}

pub struct Config {
    sam: PathBuf,
    sam2: PathBuf,
    gff: PathBuf,
    table: PathBuf,
    output_dir: PathBuf,
    sample1: String,
    sample2: String,
}

impl Config {
    pub fn new(cli: &CLI) -> Result<Self> {
        for (option, path) in [
            ("sam", &cli.sam),
            ("sam2", &cli.sam2),
            ("gff", &cli.gff),
            ("table", &cli.table),
        ] {
            if !Path::new(path).exists() {
                bail!("--{} {}: no such file", option, path);
            }
        }

        let output_dir = PathBuf::from(&cli.output_dir);
        fs::DirBuilder::new().recursive(true).create(&output_dir)?;

        Ok(Config {
            sam: PathBuf::from(&cli.sam),
            sam2: PathBuf::from(&cli.sam2),
            gff: PathBuf::from(&cli.gff),
            table: PathBuf::from(&cli.table),
            output_dir,
            sample1: sample_name(&cli.sam),
            sample2: sample_name(&cli.sam2),
        })
    }
}

/// Base name of an alignment file: the file name up to its first `.`,
/// with any directory part removed.
pub fn sample_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .unwrap_or("")
        .to_string()
}

pub fn output_name(gene: &str, sample1: &str, sample2: &str) -> String {
    format!("{}-{}-{}.svg", gene, sample1, sample2)
}

pub fn draw_splices(config: Config) -> Result<()> {
    print!("Reading splice table...");
    let table = splice_table::load_splice_table(fs::File::open(&config.table)?)?;
    println!(" {} genes", table.len());

    let genes: HashSet<String> = table.keys().cloned().collect();

    print!("Reading annotation...");
    let mut transcripts = annotation::load_transcripts(fs::File::open(&config.gff)?, &genes)?;
    println!(" {} transcripts", transcripts.len());

    for (path, slot) in [
        (&config.sam, SampleSlot::First),
        (&config.sam2, SampleSlot::Second),
    ] {
        print!("Reading alignments from {}...", path.display());
        let stats = alignment::accumulate(fs::File::open(path)?, &mut transcripts, slot)?;
        println!(
            " {} records, {} matched, {} skipped",
            stats.total, stats.matched, stats.skipped
        );
    }

    for (gene, entries) in table.iter() {
        for entry in entries {
            if !transcripts.contains_key(&entry.name) {
                eprintln!("no transcript loaded for {} of gene {}", entry.name, gene);
            }
        }

        let diagram =
            layout::layout_gene(gene, entries, &transcripts, &config.sample1, &config.sample2);

        let mut path = config.output_dir.clone();
        path.push(output_name(gene, &config.sample1, &config.sample2));

        // one bad gene should not stop the rest
        match render::write_diagram(&path, &diagram) {
            Ok(()) => println!("Wrote {}", path.display()),
            Err(err) => eprintln!("failed to write {}: {}", path.display(), err),
        }
    }

    Ok(())
}
