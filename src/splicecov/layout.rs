use std::collections::HashMap;

use crate::splice_table::SpliceEntry;
use crate::transcript::{SampleSlot, SubIntervalKind, Transcript};

pub const X_SCALE: f64 = 0.2;
pub const Y_SCALE_DEFAULT: f64 = 2.0;
pub const X_OFFSET: f64 = 110.0;
pub const Y_START: f64 = 36.0;
pub const EXON_HEIGHT: f64 = 50.0;
pub const PANEL_GAP: f64 = 60.0;
pub const PANEL_PAD: f64 = 30.0;
/// Tallest a coverage curve is allowed to grow, in pixels.
pub const COVERAGE_BUDGET: f64 = 100.0;
pub const Y_STEP_START: u32 = 10;
pub const Y_STEP_INCREMENT: u32 = 5;
/// Minimum pixel distance between vertical-axis ticks.
pub const MIN_TICK_SPACING: f64 = 20.0;
/// Horizontal-axis tick interval in genomic positions.
pub const X_TICK_SPACING: usize = 200;

/// Stroke classes; the renderer maps these to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pen {
    Sample1,
    Sample2,
    Faint,
    Axis,
}

/// Fill classes for annotation blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Exon,
    Utr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeg {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub pen: Pen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Fill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub size: u32,
    pub text: String,
}

/// Drawable geometry in paint order; later shapes occlude earlier
/// ones. In particular the UTR block pass is emitted after the exon
/// pass, so UTR blocks win where the two overlap.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line(LineSeg),
    Rect(Block),
    Text(Label),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneDiagram {
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
}

/// Vertical scaling for one panel, a pure function of that panel's own
/// maximum coverage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelScale {
    pub yscale: f64,
    pub ystep: u32,
    pub height: f64,
}

impl PanelScale {
    pub fn for_max_coverage(maxcov: u32) -> Self {
        let mut yscale = Y_SCALE_DEFAULT;
        if maxcov as f64 * yscale > COVERAGE_BUDGET {
            yscale = COVERAGE_BUDGET / maxcov as f64;
        }

        // Grow the tick step until labels stay legible.
        let mut ystep = Y_STEP_START;
        while yscale * (ystep as f64) < MIN_TICK_SPACING {
            ystep += Y_STEP_INCREMENT;
        }

        PanelScale {
            yscale,
            ystep,
            height: PANEL_PAD + yscale * maxcov as f64,
        }
    }
}

/// Maximum sub-interval extent past its transcript's start, over all of
/// the gene's loaded transcripts. Sets the shared horizontal extent.
pub fn max_sub_extent(
    entries: &[SpliceEntry],
    transcripts: &HashMap<String, Transcript>,
) -> usize {
    let mut maxlength = 0;

    for entry in entries {
        let trx = match transcripts.get(&entry.name) {
            Some(trx) => trx,
            None => continue,
        };
        for sub in trx.subintervals() {
            if sub.stop() > trx.start() && sub.stop() - trx.start() > maxlength {
                maxlength = sub.stop() - trx.start();
            }
        }
    }

    maxlength
}

/// Lays out the stacked panel diagram for one gene. Entries without a
/// loaded transcript are left out; the caller reports them.
pub fn layout_gene(
    gene: &str,
    entries: &[SpliceEntry],
    transcripts: &HashMap<String, Transcript>,
    sample1: &str,
    sample2: &str,
) -> GeneDiagram {
    let maxlength = max_sub_extent(entries, transcripts);
    let width = maxlength as f64 * X_SCALE + X_OFFSET * 2.0 + 50.0;

    let drawable = entries
        .iter()
        .filter(|entry| transcripts.contains_key(&entry.name))
        .count();
    let height =
        drawable as f64 * (COVERAGE_BUDGET + EXON_HEIGHT + PANEL_GAP + PANEL_PAD) + X_OFFSET;

    let mut shapes = Vec::new();
    shapes.push(Shape::Text(Label {
        x: 10.0,
        y: 24.0,
        size: 18,
        text: format!("Mapping {} and {} reads to {}", sample1, sample2, gene),
    }));

    let mut yoffset = Y_START;
    for entry in entries {
        let trx = match transcripts.get(&entry.name) {
            Some(trx) => trx,
            None => continue,
        };

        let scale = PanelScale::for_max_coverage(trx.max_coverage());
        layout_panel(
            &mut shapes,
            entry,
            trx,
            &scale,
            maxlength,
            yoffset,
            sample1,
            sample2,
        );

        yoffset += trx.max_coverage() as f64 * scale.yscale + EXON_HEIGHT + PANEL_GAP + PANEL_PAD;
    }

    GeneDiagram { width, height, shapes }
}

#[allow(clippy::too_many_arguments)]
fn layout_panel(
    shapes: &mut Vec<Shape>,
    entry: &SpliceEntry,
    trx: &Transcript,
    scale: &PanelScale,
    maxlength: usize,
    yoffset: f64,
    sample1: &str,
    sample2: &str,
) {
    let height = scale.height;
    let maxcov = trx.max_coverage();

    coverage_polyline(
        shapes,
        trx.coverage(SampleSlot::First),
        scale.yscale,
        height,
        yoffset,
        Pen::Sample1,
        Some(Pen::Faint),
    );
    coverage_polyline(
        shapes,
        trx.coverage(SampleSlot::Second),
        scale.yscale,
        height,
        yoffset,
        Pen::Sample2,
        None,
    );

    // reference line and exon/UTR blocks; exon pass first, UTR pass
    // painted over it (documented z-order)
    let block_top = yoffset + PANEL_GAP + height - EXON_HEIGHT;
    let mid = block_top + EXON_HEIGHT / 2.0;
    shapes.push(Shape::Line(LineSeg {
        x1: X_OFFSET,
        y1: mid,
        x2: X_OFFSET + X_SCALE * trx.span_length() as f64,
        y2: mid,
        pen: Pen::Axis,
    }));

    for kind in [SubIntervalKind::Exon, SubIntervalKind::Utr] {
        for sub in trx.subintervals().iter().filter(|sub| sub.kind() == kind) {
            let fill = match kind {
                SubIntervalKind::Exon => Fill::Exon,
                SubIntervalKind::Utr => Fill::Utr,
            };
            shapes.push(Shape::Rect(Block {
                x: X_OFFSET + X_SCALE * (sub.start() as f64 - trx.start() as f64),
                y: block_top,
                width: X_SCALE * (sub.stop() as f64 - sub.start() as f64),
                height: EXON_HEIGHT,
                fill,
            }));
        }
    }

    // vertical axis
    let axis_x = X_OFFSET - 10.0;
    let base_y = yoffset + height;
    shapes.push(Shape::Line(LineSeg {
        x1: axis_x,
        y1: base_y,
        x2: axis_x,
        y2: base_y - (maxcov + scale.ystep) as f64 * scale.yscale,
        pen: Pen::Axis,
    }));

    let mut tick = 0;
    while tick <= maxcov + scale.ystep {
        let y = base_y - tick as f64 * scale.yscale;
        shapes.push(Shape::Text(Label {
            x: X_OFFSET - ytick_label_offset(tick),
            y: y + 4.0,
            size: 10,
            text: tick.to_string(),
        }));
        shapes.push(Shape::Line(LineSeg {
            x1: axis_x,
            y1: y,
            x2: axis_x - 8.0,
            y2: y,
            pen: Pen::Axis,
        }));
        tick += scale.ystep;
    }

    // horizontal axis
    let axis_y = yoffset + PANEL_GAP + height + 5.0;
    shapes.push(Shape::Line(LineSeg {
        x1: X_OFFSET,
        y1: axis_y,
        x2: X_OFFSET + trx.span_length() as f64 * X_SCALE,
        y2: axis_y,
        pen: Pen::Axis,
    }));

    let mut pos = 0;
    while pos <= trx.span_length() {
        let x = X_OFFSET + pos as f64 * X_SCALE;
        shapes.push(Shape::Text(Label {
            x: x - xtick_label_offset(pos),
            y: axis_y + 20.0,
            size: 10,
            text: pos.to_string(),
        }));
        shapes.push(Shape::Line(LineSeg {
            x1: x,
            y1: axis_y,
            x2: x,
            y2: axis_y + 8.0,
            pen: Pen::Axis,
        }));
        pos += X_TICK_SPACING;
    }

    // panel labels
    shapes.push(Shape::Text(Label {
        x: 10.0,
        y: yoffset + height + PANEL_GAP - 60.0,
        size: 24,
        text: trx.strand_symbol().to_string(),
    }));
    shapes.push(Shape::Text(Label {
        x: 10.0,
        y: yoffset + height + PANEL_GAP - 30.0,
        size: 12,
        text: trx.name().to_string(),
    }));
    shapes.push(Shape::Text(Label {
        x: 10.0,
        y: yoffset + height + PANEL_GAP - 10.0,
        size: 18,
        text: entry.cell_type.clone(),
    }));

    let margin_x = X_OFFSET + maxlength as f64 * X_SCALE + 10.0;
    shapes.push(Shape::Text(Label {
        x: margin_x,
        y: yoffset + height + PANEL_GAP + 4.0,
        size: 14,
        text: format!("GDC.mean: {}", entry.gdc_mean),
    }));
    shapes.push(Shape::Text(Label {
        x: margin_x,
        y: yoffset + height + PANEL_GAP + 18.0,
        size: 14,
        text: format!("35S.mean: {}", entry.s35_mean),
    }));

    // sample legend
    shapes.push(Shape::Line(LineSeg {
        x1: margin_x,
        y1: base_y,
        x2: margin_x + 20.0,
        y2: base_y,
        pen: Pen::Sample1,
    }));
    shapes.push(Shape::Line(LineSeg {
        x1: margin_x,
        y1: base_y + 14.0,
        x2: margin_x + 20.0,
        y2: base_y + 14.0,
        pen: Pen::Sample2,
    }));
    shapes.push(Shape::Text(Label {
        x: margin_x + 23.0,
        y: base_y + 4.0,
        size: 12,
        text: sample1.to_string(),
    }));
    shapes.push(Shape::Text(Label {
        x: margin_x + 23.0,
        y: base_y + 18.0,
        size: 12,
        text: sample2.to_string(),
    }));
}

/// One segment per adjacent coverage index pair. Segments whose
/// endpoints are both non-zero use the solid pen; others use the zero
/// pen, or are omitted when there is none, breaking the line over
/// zero-coverage stretches.
fn coverage_polyline(
    shapes: &mut Vec<Shape>,
    cov: &[u32],
    yscale: f64,
    height: f64,
    yoffset: f64,
    solid: Pen,
    zero_pen: Option<Pen>,
) {
    for i in 1..cov.len() {
        let pen = if cov[i] > 0 && cov[i - 1] > 0 {
            Some(solid)
        } else {
            zero_pen
        };

        if let Some(pen) = pen {
            shapes.push(Shape::Line(LineSeg {
                x1: X_OFFSET + (i - 1) as f64 * X_SCALE,
                y1: yoffset + height - cov[i - 1] as f64 * yscale,
                x2: X_OFFSET + i as f64 * X_SCALE,
                y2: yoffset + height - cov[i] as f64 * yscale,
                pen,
            }));
        }
    }
}

fn ytick_label_offset(value: u32) -> f64 {
    if value > 999 {
        40.0
    } else if value > 99 {
        35.0
    } else if value > 9 {
        30.0
    } else {
        25.0
    }
}

fn xtick_label_offset(value: usize) -> f64 {
    if value > 99 {
        10.0
    } else {
        3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bio_types::strand::ReqStrand;

    use crate::transcript::SubInterval;

    fn entry(name: &str) -> SpliceEntry {
        SpliceEntry {
            name: name.to_string(),
            gdc_mean: "10.0".to_string(),
            s35_mean: "2.0".to_string(),
            cell_type: "root".to_string(),
            log2_ratio: "-2.3".to_string(),
        }
    }

    fn small_transcript() -> Transcript {
        let mut trx =
            Transcript::new("AT1G15530.1".to_string(), 1, 100, 103, ReqStrand::Forward).unwrap();
        trx.add_sub_interval(SubInterval::new(100, 103, SubIntervalKind::Exon));
        trx.add_coverage(SampleSlot::First, 101, 1);
        trx
    }

    #[test]
    fn default_scale_for_low_coverage() {
        let scale = PanelScale::for_max_coverage(2);
        assert_eq!(scale.yscale, 2.0);
        assert_eq!(scale.ystep, 10);
        assert_eq!(scale.height, 34.0);

        let empty = PanelScale::for_max_coverage(0);
        assert_eq!(empty.yscale, 2.0);
        assert_eq!(empty.height, 30.0);
    }

    #[test]
    fn scale_compresses_high_coverage() {
        let at_budget = PanelScale::for_max_coverage(50);
        assert_eq!(at_budget.yscale, 2.0);
        assert_eq!(at_budget.height, 130.0);

        let over = PanelScale::for_max_coverage(400);
        assert_eq!(over.yscale, 0.25);
        assert_eq!(over.height, 130.0);
        // 0.25 * 80 = 20 >= minimum tick spacing
        assert_eq!(over.ystep, 80);
    }

    #[test]
    fn doubling_coverage_at_most_halves_yscale() {
        for maxcov in [1u32, 7, 49, 50, 51, 430, 12345] {
            let one = PanelScale::for_max_coverage(maxcov);
            let two = PanelScale::for_max_coverage(maxcov * 2);

            assert!(two.yscale > 0.0);
            assert!(two.yscale >= one.yscale / 2.0 - 1e-12, "maxcov {}", maxcov);
            assert!(two.height >= PANEL_PAD, "maxcov {}", maxcov);
        }
    }

    #[test]
    fn max_sub_extent_spans_all_transcripts() {
        let mut transcripts = HashMap::new();

        let mut a =
            Transcript::new("G.1".to_string(), 1, 1000, 2000, ReqStrand::Forward).unwrap();
        a.add_sub_interval(SubInterval::new(1000, 1400, SubIntervalKind::Exon));
        transcripts.insert("G.1".to_string(), a);

        let mut b =
            Transcript::new("G.2".to_string(), 1, 1000, 2000, ReqStrand::Forward).unwrap();
        b.add_sub_interval(SubInterval::new(1500, 1900, SubIntervalKind::Utr));
        transcripts.insert("G.2".to_string(), b);

        let entries = vec![entry("G.1"), entry("G.2"), entry("G.3")];
        assert_eq!(max_sub_extent(&entries, &transcripts), 900);
    }

    #[test]
    fn polyline_breaks_over_zero_coverage() {
        // coverage is [0, 1, 1, 0]
        let mut transcripts = HashMap::new();
        transcripts.insert("AT1G15530.1".to_string(), small_transcript());

        let diagram = layout_gene(
            "AT1G15530",
            &[entry("AT1G15530.1")],
            &transcripts,
            "s1",
            "s2",
        );

        let pens: Vec<Pen> = diagram
            .shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Line(seg) => Some(seg.pen),
                _ => None,
            })
            .collect();

        // one solid segment flanked by two faint ones, plus the legend
        // swatch for each sample
        assert_eq!(pens.iter().filter(|p| **p == Pen::Sample1).count(), 2);
        assert_eq!(pens.iter().filter(|p| **p == Pen::Faint).count(), 2);
        assert_eq!(pens.iter().filter(|p| **p == Pen::Sample2).count(), 1);
    }

    #[test]
    fn panels_skip_missing_transcripts() {
        let mut transcripts = HashMap::new();
        transcripts.insert("AT1G15530.1".to_string(), small_transcript());

        let entries = vec![entry("AT1G15530.1"), entry("AT1G15530.2")];
        let diagram = layout_gene("AT1G15530", &entries, &transcripts, "s1", "s2");

        let one_panel = layout_gene(
            "AT1G15530",
            &entries[..1],
            &transcripts,
            "s1",
            "s2",
        );

        assert_eq!(diagram.height, one_panel.height);
        assert_eq!(diagram.shapes.len(), one_panel.shapes.len());
    }

    #[test]
    fn utr_blocks_paint_after_exon_blocks() {
        let mut transcripts = HashMap::new();
        let mut trx =
            Transcript::new("G.1".to_string(), 1, 100, 300, ReqStrand::Forward).unwrap();
        trx.add_sub_interval(SubInterval::new(100, 150, SubIntervalKind::Utr));
        trx.add_sub_interval(SubInterval::new(150, 250, SubIntervalKind::Exon));
        trx.add_sub_interval(SubInterval::new(250, 300, SubIntervalKind::Utr));
        transcripts.insert("G.1".to_string(), trx);

        let diagram = layout_gene("G", &[entry("G.1")], &transcripts, "s1", "s2");

        let fills: Vec<Fill> = diagram
            .shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Rect(block) => Some(block.fill),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![Fill::Exon, Fill::Utr, Fill::Utr]);
    }

    #[test]
    fn title_names_samples_and_gene() {
        let mut transcripts = HashMap::new();
        transcripts.insert("AT1G15530.1".to_string(), small_transcript());

        let diagram = layout_gene(
            "AT1G15530",
            &[entry("AT1G15530.1")],
            &transcripts,
            "wt",
            "mut",
        );

        match &diagram.shapes[0] {
            Shape::Text(label) => {
                assert_eq!(label.text, "Mapping wt and mut reads to AT1G15530")
            }
            other => panic!("expected title text, got {:?}", other),
        }
    }
}
