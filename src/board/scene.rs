//! View model for one board render, and its SVG markup.
//!
//! Building a scene is a pure function of the state, the palette and the
//! lock flag, so rendering the same snapshot twice gives identical output.

use std::fmt::Write as _;

use crate::board::layout::{BoardLayout, LineSegment, Point, VIEW_SIZE};
use crate::config::Palette;
use crate::state::{GameState, Seat};

#[derive(Clone, Debug, PartialEq)]
pub struct BoxView {
    pub index: usize,
    pub origin: Point,
    pub size: f64,
    pub seat: Seat,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineView {
    pub segment: LineSegment,
    pub seat: Option<Seat>,
    /// Stroke for owned lines; unclaimed lines take their colour from CSS.
    pub color: Option<String>,
    pub available: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoardScene {
    pub dot_color: String,
    pub dot_radius: f64,
    pub box_opacity: f64,
    pub dots: Vec<Point>,
    pub boxes: Vec<BoxView>,
    pub lines: Vec<LineView>,
}

/// Knobs that do not come from the game state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneOptions {
    pub padding: f64,
    pub dot_radius: f64,
    pub box_opacity: f64,
    /// A move is in flight; nothing is clickable.
    pub locked: bool,
}

impl BoardScene {
    pub fn build(state: &GameState, palette: &Palette, opts: SceneOptions) -> Self {
        let layout = BoardLayout::new(state.grid_size, opts.padding);
        let seat_color = |seat: Seat| match seat {
            Seat::One => palette.player_one.clone(),
            Seat::Two => palette.player_two.clone(),
        };

        // Only captured boxes are drawn.
        let boxes = layout
            .boxes()
            .into_iter()
            .filter_map(|cell| {
                let seat = state.owner_seat(state.boxes.get(cell.index)?)?;
                Some(BoxView {
                    index: cell.index,
                    origin: cell.origin,
                    size: cell.size,
                    seat,
                    color: seat_color(seat),
                })
            })
            .collect();

        let lines = layout
            .lines()
            .into_iter()
            .map(|segment| {
                let seat = state
                    .lines
                    .get(segment.index)
                    .and_then(|owner| state.owner_seat(owner));
                LineView {
                    segment,
                    seat,
                    color: seat.map(seat_color),
                    available: !opts.locked && state.is_line_available(segment.index),
                }
            })
            .collect();

        Self {
            dot_color: palette.dot.clone(),
            dot_radius: opts.dot_radius,
            box_opacity: opts.box_opacity,
            dots: layout.dots().collect(),
            boxes,
            lines,
        }
    }

    pub fn available_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines
            .iter()
            .filter(|l| l.available)
            .map(|l| l.segment.index)
    }

    /// Inner markup for the host `<svg>`: dots, then boxes, then lines on top.
    pub fn to_svg_markup(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, r#"<g class="dots">"#);
        for d in &self.dots {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                d.x,
                d.y,
                self.dot_radius,
                escape_attr(&self.dot_color)
            );
        }
        out.push_str("</g><g class=\"boxes\">");
        for b in &self.boxes {
            let _ = write!(
                out,
                r#"<rect class="box" x="{}" y="{}" width="{}" height="{}" fill="{}" fill-opacity="{}"/>"#,
                b.origin.x,
                b.origin.y,
                b.size,
                b.size,
                escape_attr(&b.color),
                self.box_opacity
            );
        }
        out.push_str("</g><g class=\"lines\">");
        for l in &self.lines {
            let s = &l.segment;
            let class = if l.available { "line available" } else { "line" };
            let _ = write!(
                out,
                r#"<line class="{}" data-index="{}" x1="{}" y1="{}" x2="{}" y2="{}""#,
                class, s.index, s.from.x, s.from.y, s.to.x, s.to.y
            );
            if let Some(color) = &l.color {
                let _ = write!(out, r#" style="stroke:{}""#, escape_attr(color));
            }
            out.push_str("/>");
        }
        out.push_str("</g>");
        out
    }

    pub fn view_box() -> String {
        format!("0 0 {VIEW_SIZE} {VIEW_SIZE}")
    }
}

fn escape_attr(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '"' | '<' | '>' | '&' | ';'))
        .collect()
}
