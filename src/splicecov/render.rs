use std::fs;
use std::path::Path;

use anyhow::Result;
use svg::node::element::{Line, Rectangle, Text};
use svg::Document;

use crate::layout::{Fill, GeneDiagram, Pen, Shape};

fn pen_color(pen: Pen) -> &'static str {
    match pen {
        Pen::Sample1 => "red",
        Pen::Sample2 => "blue",
        Pen::Faint => "gray",
        Pen::Axis => "black",
    }
}

fn fill_color(fill: Fill) -> &'static str {
    match fill {
        Fill::Exon => "black",
        Fill::Utr => "gray",
    }
}

/// Serializes a gene diagram as SVG text, emitting shapes in paint
/// order.
pub fn render_diagram(diagram: &GeneDiagram) -> String {
    let mut doc = Document::new()
        .set("width", diagram.width)
        .set("height", diagram.height)
        .set("viewBox", (0.0, 0.0, diagram.width, diagram.height));

    for shape in &diagram.shapes {
        doc = match shape {
            Shape::Line(seg) => doc.add(
                Line::new()
                    .set("x1", seg.x1)
                    .set("y1", seg.y1)
                    .set("x2", seg.x2)
                    .set("y2", seg.y2)
                    .set("stroke", pen_color(seg.pen)),
            ),
            Shape::Rect(block) => doc.add(
                Rectangle::new()
                    .set("x", block.x)
                    .set("y", block.y)
                    .set("width", block.width)
                    .set("height", block.height)
                    .set("fill", fill_color(block.fill)),
            ),
            Shape::Text(label) => doc.add(
                Text::new(label.text.clone())
                    .set("x", label.x)
                    .set("y", label.y)
                    .set("font-size", label.size as f64),
            ),
        };
    }

    doc.to_string()
}

pub fn write_diagram<P: AsRef<Path>>(path: P, diagram: &GeneDiagram) -> Result<()> {
    fs::write(path, render_diagram(diagram))?;
    Ok(())
}
