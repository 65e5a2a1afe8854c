//! # Layout Engine
//!
//! Turns a [`CanonicalLabel`] into a [`LayoutPlan`]: every block the
//! renderer will draw, with its final position. Line breaks are decided here
//! and only here; the renderer draws the plan without re-wrapping.
//!
//! ## Label Anatomy
//!
//! ```text
//! ┌──────────────────────────────┐ ─┬─ MARGIN_TOP
//! │        ┌────────────┐        │  │
//! │        │  QR block  │        │  │ width × 5/8, square
//! │        └────────────┘        │  │
//! │                              │ ─┼─ QR_GAP
//! │      Organic Whole Milk      │  │ title lines (large font)
//! │              2L              │  │
//! │                              │ ─┼─ TITLE_GAP (only with details)
//! │           1 liter            │  │ detail lines (medium font)
//! │       Best: 2024-12-31       │  │
//! │                              │ ─┴─ MARGIN_BOTTOM
//! └──────────────────────────────┘
//! ```
//!
//! Absent fields contribute no height at all. The width is always the
//! configured output width; the height follows the content.

use crate::font::{FontTier, LabelAssets};
use crate::normalize::CanonicalLabel;

/// Default print width in dots (58 mm paper at 203 DPI).
pub const DEFAULT_WIDTH: u32 = 384;

pub const MARGIN_TOP: u32 = 15;
pub const MARGIN_BOTTOM: u32 = 15;
/// Gap between the QR block and the title.
pub const QR_GAP: u32 = 15;
/// Gap between the title and the first detail line.
pub const TITLE_GAP: u32 = 20;
/// Gap between consecutive lines of the same block.
pub const LINE_GAP: u32 = 4;

/// Prefix of the best-before line.
pub const BEST_BEFORE_PREFIX: &str = "Best:";
/// Prefix of the purchase-date line.
pub const PURCHASED_PREFIX: &str = "Purchased:";

/// Side of the square QR block for a given output width.
pub fn qr_block_size(width: u32) -> u32 {
    width * 5 / 8
}

/// Horizontal placement of a block within the label width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl Alignment {
    /// Left edge of content `content_width` wide. Content wider than the
    /// container starts at 0 and overflows to the right.
    pub fn offset(self, container_width: u32, content_width: u32) -> u32 {
        let free = container_width.saturating_sub(content_width);
        match self {
            Alignment::Left => 0,
            Alignment::Center => free / 2,
            Alignment::Right => free,
        }
    }
}

/// What a text line shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Title,
    Quantity,
    BestBefore,
    Purchased,
}

impl LineRole {
    pub fn is_detail(self) -> bool {
        !matches!(self, LineRole::Title)
    }

    pub fn tier(self) -> FontTier {
        match self {
            LineRole::Title => FontTier::Large,
            _ => FontTier::Medium,
        }
    }
}

/// The reserved QR area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrBlock {
    pub payload: String,
    pub left: u32,
    pub top: u32,
    pub size: u32,
}

/// One line of text, already broken and measured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub role: LineRole,
    pub text: String,
    pub tier: FontTier,
    pub align: Alignment,
    pub top: u32,
    pub height: u32,
    /// Measured advance width, may exceed the label width
    pub width: u32,
}

impl TextLine {
    pub fn left(&self, label_width: u32) -> u32 {
        self.align.offset(label_width, self.width)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Qr(QrBlock),
    Line(TextLine),
}

impl Block {
    pub fn top(&self) -> u32 {
        match self {
            Block::Qr(qr) => qr.top,
            Block::Line(line) => line.top,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Block::Qr(qr) => qr.size,
            Block::Line(line) => line.height,
        }
    }

    pub fn as_line(&self) -> Option<&TextLine> {
        match self {
            Block::Line(line) => Some(line),
            Block::Qr(_) => None,
        }
    }
}

/// Positioned blocks of one label, in drawing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    pub width: u32,
    pub height: u32,
    pub blocks: Vec<Block>,
}

impl LayoutPlan {
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.blocks.iter().filter_map(Block::as_line)
    }

    pub fn lines_with_role(&self, role: LineRole) -> impl Iterator<Item = &TextLine> {
        self.lines().filter(move |line| line.role == role)
    }

    pub fn qr(&self) -> Option<&QrBlock> {
        self.blocks.iter().find_map(|block| match block {
            Block::Qr(qr) => Some(qr),
            Block::Line(_) => None,
        })
    }

    /// Title lines joined back into one string.
    pub fn title_text(&self) -> String {
        self.lines_with_role(LineRole::Title)
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Computes plans with measurements taken from the injected fonts.
#[derive(Debug, Clone)]
pub struct LayoutEngine<'a> {
    assets: &'a LabelAssets,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(assets: &'a LabelAssets) -> Self {
        Self { assets }
    }

    /// Lay out a label at `width` dots. Pure: equal inputs give equal plans.
    pub fn layout(&self, label: &CanonicalLabel, width: u32) -> LayoutPlan {
        let mut blocks = Vec::new();
        let mut y = MARGIN_TOP;

        let size = qr_block_size(width);
        blocks.push(Block::Qr(QrBlock {
            payload: label.qr_payload.clone(),
            left: Alignment::Center.offset(width, size),
            top: y,
            size,
        }));
        y += size + QR_GAP;

        let title_face = self.assets.face(FontTier::Large);
        let title_lines = wrap_words(&label.title, width, |s| title_face.measure(s))
            .into_iter()
            .map(|text| (LineRole::Title, text))
            .collect();
        y = self.stack(&mut blocks, title_lines, y);

        let details = detail_lines(label);
        if !details.is_empty() {
            y += TITLE_GAP;
            y = self.stack(&mut blocks, details, y);
        }

        LayoutPlan {
            width,
            height: y + MARGIN_BOTTOM,
            blocks,
        }
    }

    /// Append lines below `y`, returning the new cursor position.
    fn stack(&self, blocks: &mut Vec<Block>, lines: Vec<(LineRole, String)>, mut y: u32) -> u32 {
        for (i, (role, text)) in lines.into_iter().enumerate() {
            if i > 0 {
                y += LINE_GAP;
            }
            let tier = role.tier();
            let face = self.assets.face(tier);
            let height = face.line_height();
            let measured = face.measure(&text);
            blocks.push(Block::Line(TextLine {
                role,
                text,
                tier,
                align: Alignment::Center,
                top: y,
                height,
                width: measured,
            }));
            y += height;
        }
        y
    }
}

/// Detail lines in print order, honoring suppression and absence.
fn detail_lines(label: &CanonicalLabel) -> Vec<(LineRole, String)> {
    if label.suppress_details {
        return Vec::new();
    }

    let mut lines = Vec::new();
    if !label.quantity.is_empty() {
        lines.push((LineRole::Quantity, label.quantity.clone()));
    }
    if let Some(date) = &label.best_before {
        lines.push((LineRole::BestBefore, format!("{} {}", BEST_BEFORE_PREFIX, date)));
    }
    if let Some(date) = &label.purchased {
        lines.push((LineRole::Purchased, format!("{} {}", PURCHASED_PREFIX, date)));
    }
    lines
}

/// Greedy word wrap.
///
/// Words are added to the current line while the line still fits in
/// `max_width`. A word that is wider than `max_width` on its own gets a line
/// to itself and overflows; it is never split or dropped.
pub fn wrap_words(text: &str, max_width: u32, measure: impl Fn(&str) -> u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
