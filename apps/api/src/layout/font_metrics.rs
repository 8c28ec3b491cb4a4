//! Static advance-width tables for the two fonts the CV is set in.
//!
//! Widths come from the Adobe AFM files for the standard-14 Helvetica faces and
//! are stored in 1/1000 em. The PDF exporter references the same standard fonts,
//! so a line that fits here fits on paper.
//! Tables cover ASCII 0x20..=0x7E (95 printable characters), index = (char as usize) - 32.
//! A handful of WinAnsi extras (bullet, dashes, Latin-1 letters) are looked up separately.

use serde::{Deserialize, Serialize};

use crate::layout::page::{StyleRole, TypeScale};

/// Millimetres per PostScript point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

// ────────────────────────────────────────────────────────────────────────────
// Font weight
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    /// Helvetica.
    Normal,
    /// Helvetica-Bold.
    Bold,
}

impl FontWeight {
    /// PostScript base font name, as written into the PDF font dictionary.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontWeight::Normal => "Helvetica",
            FontWeight::Bold => "Helvetica-Bold",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Measurement capability
// ────────────────────────────────────────────────────────────────────────────

/// Text measurement supplied by the host renderer.
///
/// The layout engine makes every line-breaking decision through this trait, so
/// the preview and the exported file break lines identically as long as they
/// share one implementation.
pub trait TextMeasure: Send + Sync {
    /// Rendered width of `text` in millimetres when set in `role`.
    fn measure(&self, text: &str, role: StyleRole) -> f32;
}

/// `TextMeasure` backed by the static Helvetica tables below.
#[derive(Debug, Clone)]
pub struct StandardFontMeasure {
    scale: TypeScale,
}

impl StandardFontMeasure {
    pub fn new(scale: TypeScale) -> Self {
        Self { scale }
    }
}

impl TextMeasure for StandardFontMeasure {
    fn measure(&self, text: &str, role: StyleRole) -> f32 {
        let style = self.scale.style(role);
        let em = get_metrics(style.weight).measure_str(text);
        em * style.size_pt * MM_PER_PT
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one font face.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub weight: FontWeight,
    widths: [u16; 95],
    /// Fallback for characters outside the table and the WinAnsi extras.
    pub average_char_width: u16,
}

impl FontMetricTable {
    /// Width of a single character in 1/1000 em.
    pub fn char_width(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        match c {
            '\u{2022}' => 350,                                // bullet
            '\u{2013}' => 556,                                // en dash
            '\u{2014}' => 1000,                               // em dash
            '\u{2018}' | '\u{2019}' => 222 + self.bold_bump(56), // single quotes
            '\u{201C}' | '\u{201D}' => 333 + self.bold_bump(167),
            '\u{00A0}' => 278,
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'é' | 'è' | 'ê' | 'ë' | 'ó' | 'ò' | 'ô' | 'ö'
            | 'õ' | 'ú' | 'ù' | 'û' | 'ü' | 'ñ' => self.widths['a' as usize - 32],
            'í' | 'ì' | 'î' | 'ï' => self.widths['i' as usize - 32],
            'ç' => self.widths['c' as usize - 32],
            'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => self.widths['A' as usize - 32],
            'É' | 'È' | 'Ê' | 'Ë' => self.widths['E' as usize - 32],
            'Í' | 'Ì' | 'Î' | 'Ï' => self.widths['I' as usize - 32],
            'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => self.widths['O' as usize - 32],
            'Ú' | 'Ù' | 'Û' | 'Ü' => self.widths['U' as usize - 32],
            'Ñ' => self.widths['N' as usize - 32],
            'Ç' => self.widths['C' as usize - 32],
            _ => self.average_char_width,
        }
    }

    fn bold_bump(&self, amount: u16) -> u16 {
        match self.weight {
            FontWeight::Normal => 0,
            FontWeight::Bold => amount,
        }
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        let thousandths: u32 = s.chars().map(|c| u32::from(self.char_width(c))).sum();
        thousandths as f32 / 1000.0
    }
}

/// Returns the metric table for a weight.
pub fn get_metrics(weight: FontWeight) -> &'static FontMetricTable {
    match weight {
        FontWeight::Normal => &HELVETICA_TABLE,
        FontWeight::Bold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    weight: FontWeight::Normal,
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    average_char_width: 556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    weight: FontWeight::Bold,
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    average_char_width: 584,
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
