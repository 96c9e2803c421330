use crate::projection::Projection;
use std::fmt::Write;
use std::path::Path;

pub struct SvgDocument {
    pub content: String,
}

impl SvgDocument {
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, &self.content)
    }
}

pub fn write_svg(projection: &Projection) -> Result<SvgDocument, std::fmt::Error> {
    let mut out = String::new();
    let vp = projection.viewport;

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="100%" viewBox="{} {} {} {}">"#,
        vp.x, vp.y, vp.width, vp.height
    )?;

    // Spaces first so surface lines draw on top.
    for path in &projection.space_paths {
        let mut d = String::new();
        for (i, p) in path.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            write!(d, "{}{} {} ", cmd, p.x, p.y)?;
        }
        d.push('Z');
        writeln!(
            out,
            r#"  <path data-space="{}" d="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            escape(&path.space_id),
            d,
            hex(path.fill),
            hex(path.stroke),
            path.stroke_width
        )?;
    }

    for line in &projection.surface_lines {
        writeln!(
            out,
            r#"  <line data-surface="{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
            escape(&line.surface_id),
            line.a.x,
            line.a.y,
            line.b.x,
            line.b.y,
            hex(line.stroke),
            line.stroke_width
        )?;
    }

    writeln!(out, "</svg>")?;
    Ok(SvgDocument { content: out })
}

fn hex(color: u32) -> String {
    format!("#{:06x}", color & 0x00ff_ffff)
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
