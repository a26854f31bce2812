use std::io::{self, Write};
use std::process;

use clap::{Arg, Command};

use splicecov::draw_splices::*;

fn main() {
    if let Err(e) = wrapper() {
        io::stderr().write_all(format!("{}\n", e).as_bytes()).ok();
        process::exit(1);
    }
}

fn wrapper() -> Result<(), anyhow::Error> {
    let cli = get_cli()?;
    let config = Config::new(&cli)?;
    draw_splices(config)
}

fn get_cli() -> Result<CLI, anyhow::Error> {
    let matches = Command::new("draw-splices")
        .version("0.1.0")
        .about("Draws per-gene diagrams comparing splice-variant coverage between two alignment sets")
        .arg(
            Arg::new("sam")
                .short('s')
                .long("sam")
                .value_name("SAM")
                .help("First alignment file")
                .required(true),
        )
        .arg(
            Arg::new("sam2")
                .short('t')
                .long("sam2")
                .value_name("SAM2")
                .help("Second alignment file")
                .required(true),
        )
        .arg(
            Arg::new("gff")
                .short('g')
                .long("gff")
                .value_name("GFF")
                .help("GFF3 annotation file")
                .required(true),
        )
        .arg(
            Arg::new("table")
                .short('d')
                .long("table")
                .value_name("TABLE")
                .help("Tab-delimited differential-expression table keyed by transcript id")
                .default_value("At_DE.txt"),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .value_name("OUTPUT-DIR")
                .help("Directory for the per-gene SVG files")
                .default_value("."),
        )
        .get_matches();

    Ok(CLI {
        sam: matches.get_one::<String>("sam").cloned().unwrap_or_default(),
        sam2: matches.get_one::<String>("sam2").cloned().unwrap_or_default(),
        gff: matches.get_one::<String>("gff").cloned().unwrap_or_default(),
        table: matches.get_one::<String>("table").cloned().unwrap_or_default(),
        output_dir: matches
            .get_one::<String>("output_dir")
            .cloned()
            .unwrap_or_default(),
    })
}
