//! Cursor-based flow layout: Document → fixed-size pages of positioned blocks.
//!
//! # Flow
//! - A vertical cursor starts at the top margin of page 1.
//! - Header (name, title, contact line, separator) is emitted first.
//! - Sections follow in fixed order: Summary, Experience, Education, Skills.
//!   Empty sections emit nothing.
//! - A section only starts on the current page if its header plus one body line fit.
//! - Every line is checked against the content bottom before it is emitted; a line
//!   that does not fit moves to a fresh page. Lines are never split.
//!
//! The preview endpoint and the PDF exporter both consume this output, so there is
//! exactly one place where line-breaking and page-breaking decisions are made.

use tracing::debug;

use crate::layout::dates::date_range;
use crate::layout::font_metrics::TextMeasure;
use crate::layout::page::{Align, Block, BlockContent, Page, PageConfig, PageGeometry, StyleRole};
use crate::layout::wrap::{wrap_hanging, wrap_text};
use crate::models::document::{Document, Education, Skills, WorkExperience};

// ────────────────────────────────────────────────────────────────────────────
// Vertical rhythm (mm)
// ────────────────────────────────────────────────────────────────────────────

const NAME_ADVANCE: f32 = 8.0;
const TITLE_ADVANCE: f32 = 6.0;
const CONTACT_ADVANCE: f32 = 8.0;
const SEPARATOR_ADVANCE: f32 = 8.0;
const RULE_THICKNESS: f32 = 0.3;

const SECTION_HEADER_ADVANCE: f32 = 7.0;
const SECTION_UNDERLINE_OFFSET: f32 = 5.0;
const SECTION_GAP: f32 = 10.0;

const LINE_HEIGHT: f32 = 5.0;
const PARAGRAPH_GAP: f32 = 2.0;

const ENTRY_TITLE_ADVANCE: f32 = 6.0;
const BULLET_GAP: f32 = 1.0;
const ENTRY_GAP: f32 = 4.0;
const EDUCATION_ADVANCE: f32 = 7.0;
const SKILL_GROUP_GAP: f32 = 3.0;

// Horizontal offsets from the left margin (mm).
const BULLET_MARKER_INDENT: f32 = 3.0;
const BULLET_TEXT_INDENT: f32 = 8.0;

const BULLET_MARKER: &str = "\u{2022}";
const BULLET_PREFIXES: [char; 3] = ['\u{2022}', '-', '*'];

pub const SUMMARY_TITLE: &str = "PROFESSIONAL SUMMARY";
pub const EXPERIENCE_TITLE: &str = "PROFESSIONAL EXPERIENCE";
pub const EDUCATION_TITLE: &str = "EDUCATION";
pub const SKILLS_TITLE: &str = "SKILLS";
pub const TECHNICAL_SKILLS_LABEL: &str = "Technical Skills: ";
pub const SOFT_SKILLS_LABEL: &str = "Core Competencies: ";

// ────────────────────────────────────────────────────────────────────────────
// Page writer
// ────────────────────────────────────────────────────────────────────────────

/// Owns the cursor and the pages completed so far.
struct PageWriter {
    geometry: PageGeometry,
    pages: Vec<Page>,
    blocks: Vec<Block>,
    y: f32,
}

impl PageWriter {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            blocks: Vec::new(),
            y: geometry.margin_top,
        }
    }

    /// Starts a new page unless `height` more millimetres fit above the content bottom.
    /// A fresh page always accepts the content, so oversized blocks cannot loop forever.
    fn ensure_room(&mut self, height: f32) {
        if self.y + height > self.geometry.content_bottom() && !self.blocks.is_empty() {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        let blocks = std::mem::take(&mut self.blocks);
        self.pages.push(Page {
            number: self.pages.len() + 1,
            blocks,
        });
        self.y = self.geometry.margin_top;
    }

    fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.blocks.is_empty() || self.pages.is_empty() {
            self.break_page();
        }
        self.pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Summary,
    Experience,
    Education,
    Skills,
}

impl Section {
    const ORDER: [Section; 4] = [
        Section::Summary,
        Section::Experience,
        Section::Education,
        Section::Skills,
    ];

    fn title(&self) -> &'static str {
        match self {
            Section::Summary => SUMMARY_TITLE,
            Section::Experience => EXPERIENCE_TITLE,
            Section::Education => EDUCATION_TITLE,
            Section::Skills => SKILLS_TITLE,
        }
    }

    fn has_content(&self, document: &Document) -> bool {
        match self {
            Section::Summary => !document.personal.summary.trim().is_empty(),
            Section::Experience => !document.work_experience.is_empty(),
            Section::Education => !document.education.is_empty(),
            Section::Skills => !document.skills.is_empty(),
        }
    }
}

/// Lays out documents with one page configuration and one measurement capability.
pub struct LayoutEngine<'a> {
    config: &'a PageConfig,
    measure: &'a dyn TextMeasure,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a PageConfig, measure: &'a dyn TextMeasure) -> Self {
        Self { config, measure }
    }

    /// Produces the page sequence for `document`. Pure: the same input always
    /// yields the same pages.
    pub fn paginate(&self, document: &Document) -> Vec<Page> {
        let mut writer = PageWriter::new(self.config.geometry);

        self.emit_header(&mut writer, document);

        let mut first_section = true;
        for section in Section::ORDER {
            if !section.has_content(document) {
                continue;
            }
            if !first_section {
                writer.advance(SECTION_GAP);
            }
            first_section = false;

            self.emit_section_header(&mut writer, section.title());
            match section {
                Section::Summary => self.emit_summary(&mut writer, &document.personal.summary),
                Section::Experience => self.emit_experience(&mut writer, &document.work_experience),
                Section::Education => self.emit_education(&mut writer, &document.education),
                Section::Skills => self.emit_skills(&mut writer, &document.skills),
            }
        }

        let pages = writer.finish();
        debug!(pages = pages.len(), "document paginated");
        pages
    }

    fn geometry(&self) -> &PageGeometry {
        &self.config.geometry
    }

    fn text_block(
        &self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        role: StyleRole,
        align: Align,
    ) -> Block {
        Block {
            x,
            y,
            width,
            height,
            role,
            align,
            content: BlockContent::Text { text: text.into() },
        }
    }

    fn rule_block(&self, x: f32, y: f32, width: f32, role: StyleRole) -> Block {
        Block {
            x,
            y,
            width,
            height: RULE_THICKNESS,
            role,
            align: Align::Left,
            content: BlockContent::Rule {
                thickness: RULE_THICKNESS,
            },
        }
    }

    /// A line centered on the full page width.
    fn centered(&self, writer: &mut PageWriter, text: &str, role: StyleRole, height: f32) {
        let width = self.measure.measure(text, role);
        let x = (self.geometry().width - width) / 2.0;
        writer.push(self.text_block(text, x, writer.y, width, height, role, Align::Center));
        writer.advance(height);
    }

    // ── Header ──────────────────────────────────────────────────────────────

    fn emit_header(&self, writer: &mut PageWriter, document: &Document) {
        let personal = &document.personal;

        let full_name = personal.full_name().to_uppercase();
        self.centered(writer, &full_name, StyleRole::Name, NAME_ADVANCE);

        let title = personal.professional_title.trim();
        if !title.is_empty() {
            self.centered(writer, title, StyleRole::Title, TITLE_ADVANCE);
        }

        let contact = format!("{} | {}", personal.email.trim(), personal.phone.trim());
        self.centered(writer, &contact, StyleRole::Contact, CONTACT_ADVANCE);

        let g = self.geometry();
        writer.push(self.rule_block(g.margin_left, writer.y, g.content_width(), StyleRole::Contact));
        writer.advance(SEPARATOR_ADVANCE);
    }

    // ── Sections ────────────────────────────────────────────────────────────

    fn emit_section_header(&self, writer: &mut PageWriter, title: &str) {
        writer.ensure_room(SECTION_HEADER_ADVANCE + LINE_HEIGHT);

        let left = self.geometry().margin_left;
        let width = self.measure.measure(title, StyleRole::SectionHeader);
        let y = writer.y;
        writer.push(self.text_block(
            title,
            left,
            y,
            width,
            SECTION_HEADER_ADVANCE,
            StyleRole::SectionHeader,
            Align::Left,
        ));
        writer.push(self.rule_block(left, y + SECTION_UNDERLINE_OFFSET, width, StyleRole::SectionHeader));
        writer.advance(SECTION_HEADER_ADVANCE);
    }

    fn emit_summary(&self, writer: &mut PageWriter, summary: &str) {
        let g = self.geometry();
        let lines = wrap_text(summary, g.content_width(), StyleRole::Body, self.measure);
        let last = lines.len().saturating_sub(1);

        for (i, line) in lines.into_iter().enumerate() {
            writer.ensure_room(LINE_HEIGHT);
            let align = if i < last { Align::Justify } else { Align::Left };
            writer.push(self.text_block(
                line,
                g.margin_left,
                writer.y,
                g.content_width(),
                LINE_HEIGHT,
                StyleRole::Body,
                align,
            ));
            writer.advance(LINE_HEIGHT);
        }
        writer.advance(PARAGRAPH_GAP);
    }

    /// Left-aligned title and right-aligned date range sharing one line.
    fn emit_titled_line(&self, writer: &mut PageWriter, title: &str, dates: &str, height: f32) {
        let g = self.geometry();
        let title_width = self.measure.measure(title, StyleRole::EntryTitle);
        let date_width = self.measure.measure(dates, StyleRole::DateRange);
        let y = writer.y;

        writer.push(self.text_block(
            title,
            g.margin_left,
            y,
            title_width,
            height,
            StyleRole::EntryTitle,
            Align::Left,
        ));
        writer.push(self.text_block(
            dates,
            g.right_edge() - date_width,
            y,
            date_width,
            height,
            StyleRole::DateRange,
            Align::Right,
        ));
        writer.advance(height);
    }

    fn emit_experience(&self, writer: &mut PageWriter, entries: &[WorkExperience]) {
        let g = *self.geometry();
        let text_width = g.content_width() - BULLET_TEXT_INDENT;

        for entry in entries {
            let bullets = bullet_lines(entry.effective_description());

            // Keep the title line with the first line of its first bullet.
            let keep = if bullets.is_empty() { 0.0 } else { LINE_HEIGHT };
            writer.ensure_room(ENTRY_TITLE_ADVANCE + keep);

            let title = format!("{} | {}", entry.position.trim(), entry.company.trim());
            let dates = date_range(&entry.start_date, &entry.end_date, entry.is_current);
            self.emit_titled_line(writer, &title, &dates, ENTRY_TITLE_ADVANCE);

            for bullet in bullets {
                let lines = wrap_text(&bullet, text_width, StyleRole::Bullet, self.measure);
                for (i, line) in lines.into_iter().enumerate() {
                    writer.ensure_room(LINE_HEIGHT);
                    if i == 0 {
                        let marker_width = self.measure.measure(BULLET_MARKER, StyleRole::Bullet);
                        writer.push(self.text_block(
                            BULLET_MARKER,
                            g.margin_left + BULLET_MARKER_INDENT,
                            writer.y,
                            marker_width,
                            LINE_HEIGHT,
                            StyleRole::Bullet,
                            Align::Left,
                        ));
                    }
                    writer.push(self.text_block(
                        line,
                        g.margin_left + BULLET_TEXT_INDENT,
                        writer.y,
                        text_width,
                        LINE_HEIGHT,
                        StyleRole::Bullet,
                        Align::Left,
                    ));
                    writer.advance(LINE_HEIGHT);
                }
                writer.advance(BULLET_GAP);
            }

            writer.advance(ENTRY_GAP);
        }
    }

    fn emit_education(&self, writer: &mut PageWriter, entries: &[Education]) {
        for entry in entries {
            writer.ensure_room(EDUCATION_ADVANCE);
            let title = format!("{} | {}", entry.degree.trim(), entry.institution.trim());
            let dates = date_range(&entry.start_date, &entry.end_date, entry.is_current);
            self.emit_titled_line(writer, &title, &dates, EDUCATION_ADVANCE);
        }
    }

    fn emit_skills(&self, writer: &mut PageWriter, skills: &Skills) {
        if !skills.technical.is_empty() {
            self.emit_skill_group(writer, TECHNICAL_SKILLS_LABEL, &skills.technical);
            writer.advance(SKILL_GROUP_GAP);
        }
        if !skills.soft.is_empty() {
            self.emit_skill_group(writer, SOFT_SKILLS_LABEL, &skills.soft);
        }
    }

    /// Run-in bold label, then the comma-joined list. Continuation lines start at
    /// the section margin, not under the label.
    fn emit_skill_group(&self, writer: &mut PageWriter, label: &str, items: &[String]) {
        let g = *self.geometry();
        let label_width = self.measure.measure(label, StyleRole::SkillLabel);
        let joined = items.join(", ");
        let lines = wrap_hanging(
            &joined,
            g.content_width() - label_width,
            g.content_width(),
            StyleRole::Body,
            self.measure,
        );

        for (i, line) in lines.into_iter().enumerate() {
            writer.ensure_room(LINE_HEIGHT);
            if i == 0 {
                writer.push(self.text_block(
                    label,
                    g.margin_left,
                    writer.y,
                    label_width,
                    LINE_HEIGHT,
                    StyleRole::SkillLabel,
                    Align::Left,
                ));
                writer.push(self.text_block(
                    line,
                    g.margin_left + label_width,
                    writer.y,
                    g.content_width() - label_width,
                    LINE_HEIGHT,
                    StyleRole::Body,
                    Align::Left,
                ));
            } else {
                writer.push(self.text_block(
                    line,
                    g.margin_left,
                    writer.y,
                    g.content_width(),
                    LINE_HEIGHT,
                    StyleRole::Body,
                    Align::Left,
                ));
            }
            writer.advance(LINE_HEIGHT);
        }
    }
}

/// Splits a description into bullet texts: one per non-blank line, with a single
/// leading `•`, `-` or `*` marker and surrounding whitespace removed.
pub fn bullet_lines(description: &str) -> Vec<String> {
    description
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let line = line
                .strip_prefix(|c: char| BULLET_PREFIXES.contains(&c))
                .unwrap_or(line)
                .trim();
            (!line.is_empty()).then(|| line.to_string())
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::dates::ONGOING_MARKER;
    use crate::layout::font_metrics::StandardFontMeasure;
    use crate::layout::page::{default_page_config, TypeScale};
    use crate::models::document::{PersonalData, Skills};

    /// Every character is 1 mm wide regardless of role.
    struct Monospace;

    impl TextMeasure for Monospace {
        fn measure(&self, text: &str, _role: StyleRole) -> f32 {
            text.chars().count() as f32
        }
    }

    fn personal() -> PersonalData {
        PersonalData {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+44 20 7946 0000".to_string(),
            professional_title: "Analyst".to_string(),
            summary: String::new(),
        }
    }

    fn experience(position: &str, description: &str) -> WorkExperience {
        WorkExperience {
            position: position.to_string(),
            company: "Analytical Engines Ltd".to_string(),
            start_date: "2019-04".to_string(),
            end_date: "2022-11".to_string(),
            description: description.to_string(),
            ..WorkExperience::empty()
        }
    }

    fn full_document() -> Document {
        let mut doc = Document {
            personal: personal(),
            ..Default::default()
        };
        doc.personal.summary = "Mathematician with a taste for machinery and notation. ".repeat(6);
        doc.work_experience = vec![
            experience("Lead Analyst", "- Wrote the first published algorithm\n- Annotated the translation"),
            experience("Analyst", "• Corresponded with Babbage"),
        ];
        doc.education = vec![Education {
            institution: "Home tutoring".to_string(),
            degree: "Mathematics".to_string(),
            start_date: "1830-01".to_string(),
            end_date: String::new(),
            is_current: true,
            ..Education::empty()
        }];
        doc.skills = Skills {
            technical: vec!["Calculus".to_string(), "Punched cards".to_string()],
            soft: vec!["Writing".to_string()],
        };
        doc
    }

    fn paginate_default(doc: &Document) -> Vec<Page> {
        let config = default_page_config();
        let measure = StandardFontMeasure::new(TypeScale::default());
        LayoutEngine::new(&config, &measure).paginate(doc)
    }

    fn all_texts(pages: &[Page]) -> Vec<String> {
        pages
            .iter()
            .flat_map(|p| p.texts().map(str::to_string))
            .collect()
    }

    // ── bullet_lines ────────────────────────────────────────────────────────

    #[test]
    fn test_bullet_lines_strip_markers_and_blanks() {
        let lines = bullet_lines("- Led team\n\n   \u{2022} Built X  \n*Shipped\r\nPlain line\n-\n");
        assert_eq!(lines, vec!["Led team", "Built X", "Shipped", "Plain line"]);
    }

    #[test]
    fn test_bullet_lines_strip_only_one_marker() {
        assert_eq!(bullet_lines("-- double"), vec!["- double"]);
    }

    // ── Header and sections ─────────────────────────────────────────────────

    #[test]
    fn test_header_is_centered_and_uppercased() {
        let pages = paginate_default(&full_document());
        let first = &pages[0].blocks[0];
        assert_eq!(first.role, StyleRole::Name);
        assert_eq!(first.text(), Some("ADA LOVELACE"));
        let center = first.x + first.width / 2.0;
        assert!((center - 105.0).abs() < 1e-3, "name should be centered, got {center}");

        let texts = all_texts(&pages);
        assert!(texts.contains(&"ada@example.com | +44 20 7946 0000".to_string()));
        assert!(texts.contains(&"Analyst".to_string()));
    }

    #[test]
    fn test_empty_title_is_skipped() {
        let mut doc = full_document();
        doc.personal.professional_title = "  ".to_string();
        let pages = paginate_default(&doc);
        assert!(pages[0].blocks.iter().all(|b| b.role != StyleRole::Title));
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let doc = Document {
            personal: personal(),
            ..Default::default()
        };
        let pages = paginate_default(&doc);
        assert_eq!(pages.len(), 1);
        let texts = all_texts(&pages);
        for title in [SUMMARY_TITLE, EXPERIENCE_TITLE, EDUCATION_TITLE, SKILLS_TITLE] {
            assert!(!texts.contains(&title.to_string()), "{title} should be absent");
        }
        // Name, title, contact and the separator rule only.
        assert_eq!(pages[0].blocks.len(), 4);
    }

    #[test]
    fn test_sections_appear_in_fixed_order() {
        let texts = all_texts(&paginate_default(&full_document()));
        let pos = |t: &str| texts.iter().position(|s| s == t).unwrap();
        assert!(pos(SUMMARY_TITLE) < pos(EXPERIENCE_TITLE));
        assert!(pos(EXPERIENCE_TITLE) < pos(EDUCATION_TITLE));
        assert!(pos(EDUCATION_TITLE) < pos(SKILLS_TITLE));
    }

    #[test]
    fn test_section_underline_matches_header_width() {
        let pages = paginate_default(&full_document());
        let blocks = &pages[0].blocks;
        let idx = blocks
            .iter()
            .position(|b| b.text() == Some(EXPERIENCE_TITLE))
            .unwrap();
        let header = &blocks[idx];
        let underline = &blocks[idx + 1];
        assert!(matches!(underline.content, BlockContent::Rule { .. }));
        assert_eq!(underline.width, header.width);
        assert!(underline.y > header.y);
    }

    #[test]
    fn test_summary_is_justified_except_last_line() {
        let pages = paginate_default(&full_document());
        let summary: Vec<&Block> = pages[0]
            .blocks
            .iter()
            .filter(|b| b.role == StyleRole::Body && b.align != Align::Center)
            .take_while(|b| b.x == 20.0 && b.width == 170.0)
            .collect();
        assert!(summary.len() >= 2, "summary should wrap to several lines");
        let (last, rest) = summary.split_last().unwrap();
        assert!(rest.iter().all(|b| b.align == Align::Justify));
        assert_eq!(last.align, Align::Left);
    }

    #[test]
    fn test_experience_line_has_right_aligned_dates() {
        let pages = paginate_default(&full_document());
        let blocks = &pages[0].blocks;
        let title = blocks
            .iter()
            .find(|b| b.text() == Some("Lead Analyst | Analytical Engines Ltd"))
            .unwrap();
        let dates = blocks
            .iter()
            .find(|b| b.role == StyleRole::DateRange && b.y == title.y)
            .unwrap();
        assert_eq!(dates.text(), Some("Apr 2019 \u{2013} Nov 2022"));
        assert!((dates.x + dates.width - 190.0).abs() < 1e-3);
    }

    #[test]
    fn test_improved_description_is_rendered() {
        let mut doc = full_document();
        doc.work_experience[1].improved_description = Some("Negotiated publication terms".to_string());
        let texts = all_texts(&paginate_default(&doc));
        assert!(texts.contains(&"Negotiated publication terms".to_string()));
        assert!(!texts.contains(&"Corresponded with Babbage".to_string()));
    }

    #[test]
    fn test_bullets_have_marker_and_indented_text() {
        let pages = paginate_default(&full_document());
        let blocks = &pages[0].blocks;
        let text = blocks
            .iter()
            .find(|b| b.text() == Some("Wrote the first published algorithm"))
            .unwrap();
        let marker = blocks
            .iter()
            .find(|b| b.text() == Some(BULLET_MARKER) && b.y == text.y)
            .unwrap();
        assert_eq!(marker.x, 23.0);
        assert_eq!(text.x, 28.0);
    }

    #[test]
    fn test_bullet_continuation_aligns_under_text() {
        let config = PageConfig {
            geometry: PageGeometry {
                width: 60.0,
                ..PageGeometry::a4()
            },
            scale: TypeScale::default(),
        };
        let mut doc = Document {
            personal: personal(),
            ..Default::default()
        };
        // Content width 20 → bullet text width 12.
        doc.work_experience = vec![experience("P", "- aaaaa bbbbb ccccc")];
        let pages = LayoutEngine::new(&config, &Monospace).paginate(&doc);
        let lines: Vec<&Block> = pages[0]
            .blocks
            .iter()
            .filter(|b| b.role == StyleRole::Bullet && b.text() != Some(BULLET_MARKER))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), Some("aaaaa bbbbb"));
        assert_eq!(lines[1].text(), Some("ccccc"));
        assert!(lines.iter().all(|b| b.x == 28.0));
        let markers = pages[0]
            .blocks
            .iter()
            .filter(|b| b.text() == Some(BULLET_MARKER))
            .count();
        assert_eq!(markers, 1, "continuation lines carry no marker");
    }

    #[test]
    fn test_current_education_ends_with_ongoing_marker() {
        let texts = all_texts(&paginate_default(&full_document()));
        assert!(texts
            .iter()
            .any(|t| t.starts_with("Jan 1830") && t.ends_with(ONGOING_MARKER)));
    }

    #[test]
    fn test_skills_continuation_starts_at_margin() {
        let config = PageConfig {
            geometry: PageGeometry {
                width: 80.0,
                ..PageGeometry::a4()
            },
            scale: TypeScale::default(),
        };
        let mut doc = Document {
            personal: personal(),
            ..Default::default()
        };
        doc.skills.technical = vec![
            "Rust".to_string(),
            "SQL".to_string(),
            "Kubernetes".to_string(),
            "PostgreSQL".to_string(),
        ];
        // Content width 40; label "Technical Skills: " is 18 wide → first line 22.
        let pages = LayoutEngine::new(&config, &Monospace).paginate(&doc);
        let blocks = &pages[0].blocks;
        let label = blocks
            .iter()
            .find(|b| b.role == StyleRole::SkillLabel)
            .unwrap();
        assert_eq!(label.text(), Some(TECHNICAL_SKILLS_LABEL));
        let body: Vec<&Block> = blocks
            .iter()
            .filter(|b| b.role == StyleRole::Body && b.y >= label.y)
            .collect();
        assert_eq!(body[0].text(), Some("Rust, SQL, Kubernetes,"));
        assert_eq!(body[0].x, 38.0);
        assert_eq!(body[1].text(), Some("PostgreSQL"));
        assert_eq!(body[1].x, 20.0);
    }

    #[test]
    fn test_soft_skills_render_after_technical() {
        let texts = all_texts(&paginate_default(&full_document()));
        let tech = texts.iter().position(|t| t == TECHNICAL_SKILLS_LABEL).unwrap();
        let soft = texts.iter().position(|t| t == SOFT_SKILLS_LABEL).unwrap();
        assert!(tech < soft);
    }

    // ── Pagination ──────────────────────────────────────────────────────────

    #[test]
    fn test_layout_is_deterministic() {
        let doc = full_document();
        assert_eq!(paginate_default(&doc), paginate_default(&doc));
    }

    #[test]
    fn test_wrapped_paragraph_straddles_page_boundary_on_line_boundary() {
        // Header ends at y=50; summary header at 50..57; one 5 mm line fits before
        // the content bottom at 64, the next line must open page 2.
        let config = PageConfig {
            geometry: PageGeometry {
                width: 60.0,
                height: 84.0,
                ..PageGeometry::a4()
            },
            scale: TypeScale::default(),
        };
        let mut doc = Document {
            personal: personal(),
            ..Default::default()
        };
        doc.personal.summary =
            "w01 w02 w03 w04 w05 w06 w07 w08 w09 w10 w11 w12 w13 w14 w15".to_string();

        let pages = LayoutEngine::new(&config, &Monospace).paginate(&doc);
        assert!(pages.len() >= 2);

        let last_on_first = pages[0].blocks.last().unwrap();
        assert_eq!(last_on_first.text(), Some("w01 w02 w03 w04 w05"));

        let first_on_second = &pages[1].blocks[0];
        assert_eq!(first_on_second.text(), Some("w06 w07 w08 w09 w10"));
        assert_eq!(first_on_second.y, 20.0);
        assert_eq!(pages[1].number, 2);
    }

    #[test]
    fn test_section_moves_to_next_page_when_header_and_line_do_not_fit() {
        // Content bottom 60: header ends at 50, look-ahead needs 12 mm.
        let config = PageConfig {
            geometry: PageGeometry {
                width: 60.0,
                height: 80.0,
                ..PageGeometry::a4()
            },
            scale: TypeScale::default(),
        };
        let mut doc = Document {
            personal: personal(),
            ..Default::default()
        };
        doc.personal.summary = "short".to_string();
        let pages = LayoutEngine::new(&config, &Monospace).paginate(&doc);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].blocks[0].text(), Some(SUMMARY_TITLE));
        assert!(pages[0].texts().all(|t| t != SUMMARY_TITLE));
    }

    #[test]
    fn test_long_document_stays_inside_content_box_and_loses_nothing() {
        let mut doc = full_document();
        doc.work_experience = (0..25)
            .map(|i| {
                experience(
                    &format!("Role {i}"),
                    "- Designed a difference engine subroutine for Bernoulli numbers with careful attention to carries\n\
                     - Reviewed the notes and corrected the tables by hand",
                )
            })
            .collect();

        let pages = paginate_default(&doc);
        assert!(pages.len() > 1, "25 entries should overflow one page");

        let bottom = PageGeometry::a4().content_bottom();
        for page in &pages {
            for block in &page.blocks {
                assert!(
                    block.y + block.height <= bottom + 1e-3,
                    "block {:?} on page {} crosses the bottom margin",
                    block.text(),
                    page.number
                );
            }
        }

        let texts = all_texts(&pages);
        for i in 0..25 {
            let title = format!("Role {i} | Analytical Engines Ltd");
            assert_eq!(texts.iter().filter(|t| **t == title).count(), 1);
        }
        let page_numbers: Vec<usize> = pages.iter().map(|p| p.number).collect();
        assert_eq!(page_numbers, (1..=pages.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_entry_title_is_kept_with_first_bullet_line() {
        let mut doc = full_document();
        doc.work_experience = (0..25)
            .map(|i| experience(&format!("Role {i}"), "- One line"))
            .collect();
        for page in paginate_default(&doc) {
            for title in page
                .blocks
                .iter()
                .filter(|b| b.role == StyleRole::EntryTitle && b.text().is_some_and(|t| t.starts_with("Role ")))
            {
                assert!(
                    page.blocks
                        .iter()
                        .any(|b| b.role == StyleRole::Bullet && b.y > title.y),
                    "page {} leaves {:?} without its first bullet",
                    page.number,
                    title.text()
                );
            }
        }
    }
}
