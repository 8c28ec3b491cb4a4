//! Page geometry, the type scale and the positioned-block output of the layout engine.
//!
//! All lengths are millimetres measured from the top-left corner of the page.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontWeight;

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
}

impl PageGeometry {
    /// A4 portrait with 20 mm margins on every side.
    pub fn a4() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin_top: 20.0,
            margin_right: 20.0,
            margin_bottom: 20.0,
            margin_left: 20.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Lowest y a block may reach before it has to move to the next page.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }

    pub fn right_edge(&self) -> f32 {
        self.width - self.margin_right
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Type scale
// ────────────────────────────────────────────────────────────────────────────

/// Semantic role of a block; the renderer picks font size and weight from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleRole {
    Name,
    Title,
    Contact,
    SectionHeader,
    EntryTitle,
    DateRange,
    Body,
    Bullet,
    /// Bold run-in label in front of a skills list.
    SkillLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleStyle {
    pub size_pt: f32,
    pub weight: FontWeight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeScale {
    pub name: RoleStyle,
    pub title: RoleStyle,
    pub contact: RoleStyle,
    pub section_header: RoleStyle,
    pub entry_title: RoleStyle,
    pub date_range: RoleStyle,
    pub body: RoleStyle,
    pub bullet: RoleStyle,
    pub skill_label: RoleStyle,
}

impl Default for TypeScale {
    fn default() -> Self {
        let style = |size_pt, weight| RoleStyle { size_pt, weight };
        Self {
            name: style(18.0, FontWeight::Bold),
            title: style(12.0, FontWeight::Normal),
            contact: style(10.0, FontWeight::Normal),
            section_header: style(11.0, FontWeight::Bold),
            entry_title: style(10.0, FontWeight::Bold),
            date_range: style(9.0, FontWeight::Normal),
            body: style(9.0, FontWeight::Normal),
            bullet: style(9.0, FontWeight::Normal),
            skill_label: style(9.0, FontWeight::Bold),
        }
    }
}

impl TypeScale {
    pub fn style(&self, role: StyleRole) -> RoleStyle {
        match role {
            StyleRole::Name => self.name,
            StyleRole::Title => self.title,
            StyleRole::Contact => self.contact,
            StyleRole::SectionHeader => self.section_header,
            StyleRole::EntryTitle => self.entry_title,
            StyleRole::DateRange => self.date_range,
            StyleRole::Body => self.body,
            StyleRole::Bullet => self.bullet,
            StyleRole::SkillLabel => self.skill_label,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Everything the layout engine and the renderers need besides the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub geometry: PageGeometry,
    pub scale: TypeScale,
}

/// The single supported configuration: A4, 20 mm margins, default type scale.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        geometry: PageGeometry::a4(),
        scale: TypeScale::default(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
    /// Stretch inter-word spacing so the line fills `width`.
    Justify,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockContent {
    Text { text: String },
    /// Horizontal rule drawn at `y` across `width`.
    Rule { thickness: f32 },
}

/// One positioned unit of page content. `y` is the top of the block's line box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub role: StyleRole,
    pub align: Align,
    pub content: BlockContent,
}

#[cfg(test)]
impl Block {
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            BlockContent::Text { text } => Some(text),
            BlockContent::Rule { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub blocks: Vec<Block>,
}

#[cfg(test)]
impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(Block::text)
    }
}
