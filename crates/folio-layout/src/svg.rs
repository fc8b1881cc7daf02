//! Headless SVG output for a [`TimelineLayout`].

use crate::model::{TimelineEntryLayout, TimelineLayout};
use std::fmt::Write as _;

const EMPTY_STATE_TEXT: &str = "No experience to show yet.";
const AXIS_LABEL_WIDTH: f64 = 48.0;
const PADDING: f64 = 16.0;

#[derive(Debug, Clone)]
pub struct SvgOptions {
    pub diagram_id: String,
    pub font_family: String,
    pub font_size: f64,
    pub background: Option<String>,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            diagram_id: "timeline".to_string(),
            font_family: "system-ui, sans-serif".to_string(),
            font_size: 14.0,
            background: None,
        }
    }
}

fn escape_xml_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        out.push_str(esc);
        start = i + 1;
    }
    out.push_str(&text[start..]);
}

/// Stringifies a coordinate without float noise or `-0`.
fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == 0.0 {
        v = 0.0;
    }
    format!("{v}")
}

fn date_range(entry: &TimelineEntryLayout) -> String {
    let start = entry.start.year_month();
    match (entry.is_current, entry.end) {
        (true, _) | (false, None) => format!("{start} – present"),
        (false, Some(end)) => format!("{start} – {}", end.year_month()),
    }
}

fn push_text(out: &mut String, x: f64, y: f64, class: &str, text: &str) {
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" class="{class}">"#,
        fmt(x),
        fmt(y)
    );
    escape_xml_into(out, text);
    out.push_str("</text>");
}

fn render_entry(out: &mut String, index: usize, entry: &TimelineEntryLayout, id: &str) {
    let bar = &entry.bar;
    let card = &entry.card;
    let mut color = String::new();
    escape_xml_into(&mut color, &entry.color);

    out.push_str(r#"<g class="timeline-entry">"#);
    let fill = if bar.open_ended {
        format!("url(#{id}-fade-{index})")
    } else {
        color.clone()
    };
    let _ = write!(
        out,
        r#"<rect class="bar" x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{fill}" stroke="{color}"/>"#,
        fmt(bar.x),
        fmt(bar.y),
        fmt(bar.width),
        fmt(bar.height),
        fmt(bar.width / 2.0),
    );
    let c = &entry.connector;
    let _ = write!(
        out,
        r#"<line class="connector" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{color}"/>"#,
        fmt(c.x1),
        fmt(c.y1),
        fmt(c.x2),
        fmt(c.y2),
    );
    let _ = write!(
        out,
        r#"<rect class="card" x="{}" y="{}" width="{}" height="{}" rx="8" stroke="{color}"/>"#,
        fmt(card.x),
        fmt(card.y),
        fmt(card.width),
        fmt(card.height),
    );
    let text_x = card.x + 12.0;
    push_text(out, text_x, card.y + 24.0, "card-title", &entry.label);
    if let Some(subtitle) = &entry.subtitle {
        push_text(out, text_x, card.y + 46.0, "card-subtitle", subtitle);
    }
    push_text(out, text_x, card.y + 68.0, "card-dates", &date_range(entry));
    out.push_str("</g>");
}

fn render_empty(options: &SvgOptions) -> String {
    let mut id = String::new();
    escape_xml_into(&mut id, &options.diagram_id);
    let mut font_family = String::new();
    escape_xml_into(&mut font_family, &options.font_family);
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 320 64" class="timeline timeline-empty">"#,
    );
    let _ = write!(
        out,
        r#"<text x="160" y="36" text-anchor="middle" font-family="{font_family}" font-size="{}">"#,
        fmt(options.font_size)
    );
    escape_xml_into(&mut out, EMPTY_STATE_TEXT);
    out.push_str("</text></svg>");
    out
}

/// Renders the timeline as a standalone SVG document.
pub fn render_timeline_svg(layout: &TimelineLayout, options: &SvgOptions) -> String {
    if layout.is_empty() {
        return render_empty(options);
    }

    let mut id = String::new();
    escape_xml_into(&mut id, &options.diagram_id);
    let mut font_family = String::new();
    escape_xml_into(&mut font_family, &options.font_family);
    let b = &layout.bounds;
    let min_x = b.min_x - AXIS_LABEL_WIDTH - PADDING;
    let min_y = b.min_y - PADDING;
    let width = b.width() + AXIS_LABEL_WIDTH + 2.0 * PADDING;
    let height = b.height() + 2.0 * PADDING;

    let mut out = String::with_capacity(1024 + layout.entries.len() * 512);
    let _ = write!(
        out,
        r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}" class="timeline">"#,
        fmt(min_x),
        fmt(min_y),
        fmt(width),
        fmt(height),
    );
    let _ = write!(
        out,
        r#"<style>#{id} text{{font-family:{font_family};font-size:{}px;fill:#333}}#{id} .card{{fill:#fff}}#{id} .card-title{{font-weight:600}}#{id} .card-dates,#{id} .year{{fill:#777}}</style>"#,
        fmt(options.font_size),
    );
    if let Some(bg) = &options.background {
        let mut escaped = String::new();
        escape_xml_into(&mut escaped, bg);
        let _ = write!(
            out,
            r#"<rect class="background" x="{}" y="{}" width="{}" height="{}" fill="{escaped}"/>"#,
            fmt(min_x),
            fmt(min_y),
            fmt(width),
            fmt(height),
        );
    }

    out.push_str("<defs>");
    // Gradients are keyed by entry index; lanes can be shared by several open-ended bars.
    for (index, entry) in layout.entries.iter().enumerate() {
        if !entry.bar.open_ended {
            continue;
        }
        let mut color = String::new();
        escape_xml_into(&mut color, &entry.color);
        let _ = write!(
            out,
            r#"<linearGradient id="{id}-fade-{index}" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="{color}" stop-opacity="0"/><stop offset="0.3" stop-color="{color}"/></linearGradient>"#,
        );
    }
    out.push_str("</defs>");

    out.push_str(r#"<g class="axis">"#);
    for tick in &layout.axis {
        let _ = write!(
            out,
            r##"<line class="tick" x1="{}" y1="{}" x2="{}" y2="{}" stroke="#ddd"/>"##,
            fmt(-8.0),
            fmt(tick.y),
            fmt(b.max_x),
            fmt(tick.y),
        );
        push_text(&mut out, -AXIS_LABEL_WIDTH, tick.y - 4.0, "year", &tick.year.to_string());
    }
    out.push_str("</g>");

    for (index, entry) in layout.entries.iter().enumerate() {
        render_entry(&mut out, index, entry, &id);
    }
    out.push_str("</svg>");
    out
}
