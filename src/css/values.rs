//! Typed CSS property values.
//!
//! Every property category knows how to parse itself from CSS syntax, parse
//! the looser legacy markup-attribute syntax (`size="+2"` vs
//! `font-size: 2em`), and serialize back to canonical string form. Parsing
//! never fails hard: a malformed value yields `None` and the property falls
//! back to its default or inherited value.

use crate::render::color::Color;

/// Unit-to-point scale factors. The legacy table matches the historical
/// renderer (px at 1.3pt); the W3C table follows the CSS 96-dpi reference
/// pixel. Which table is active is a per-stylesheet setting.
const LENGTH_SCALE_LEGACY: &[(&str, f32)] = &[
    ("pt", 1.0),
    ("px", 1.3),
    ("mm", 2.83464),
    ("cm", 28.3464),
    ("pc", 12.0),
    ("in", 72.0),
];

const LENGTH_SCALE_W3C: &[(&str, f32)] = &[
    ("pt", 96.0 / 72.0),
    ("px", 1.0),
    ("mm", 96.0 / 25.4),
    ("cm", 96.0 / 2.54),
    ("pc", 96.0 / 6.0),
    ("in", 96.0),
];

fn unit_scale(units: &str, w3c: bool) -> Option<f32> {
    let table = if w3c { LENGTH_SCALE_W3C } else { LENGTH_SCALE_LEGACY };
    table.iter().find(|(u, _)| *u == units).map(|(_, s)| *s)
}

/// The seven-slot HTML size model, in points.
pub const SIZE_MAP_DEFAULT: [i32; 7] = [8, 10, 12, 14, 18, 24, 36];

/// Index into the size map that `<basefont>`-relative sizes are measured
/// from.
pub const BASE_FONT_INDEX: i32 = 4;

/// Point size used when a relative font size has no resolved ancestor.
pub const FALLBACK_FONT_SIZE: f32 = 12.0;

/// Returns the 1-based size index whose point value first reaches `pt`.
pub fn index_of_size(pt: f32, map: &[i32; 7]) -> i32 {
    for (i, size) in map.iter().enumerate() {
        if pt <= *size as f32 {
            return i as i32 + 1;
        }
    }
    map.len() as i32
}

/// Returns the point size for a 1-based size index, clamping out-of-range
/// indices to the table bounds.
pub fn point_size(index: i32, map: &[i32; 7]) -> f32 {
    let i = (index - 1).clamp(0, map.len() as i32 - 1) as usize;
    map[i] as f32
}

/// Splits `value` on whitespace, keeping parenthesized runs such as
/// `rgb(...)` and `url(...)` intact.
pub fn split_values(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let bytes = value.as_bytes();
    let mut current = 0;
    let len = bytes.len();
    while current < len {
        while current < len && bytes[current].is_ascii_whitespace() {
            current += 1;
        }
        let last = current;
        let mut in_parens = 0i32;
        while current < len && (!bytes[current].is_ascii_whitespace() || in_parens > 0) {
            match bytes[current] {
                b'(' => in_parens += 1,
                b')' => in_parens -= 1,
                _ => {}
            }
            current += 1;
        }
        if last != current {
            parts.push(&value[last..current]);
        }
        current += 1;
    }
    parts
}

/// Unwraps `url(...)` syntax, stripping surrounding quotes. Returns the
/// input unchanged when it is not a url() form.
pub fn extract_url(value: &str) -> &str {
    let inner = value
        .strip_prefix("url(")
        .and_then(|v| v.strip_suffix(')'))
        .unwrap_or(value)
        .trim();
    inner
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| inner.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(inner)
}

/// Parses a color in any CSS1 form: named, `#RGB`/`#RRGGBB`,
/// `rgb(...)`/`rgba(...)`, or bare hex digits without the leading `#`.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if value.is_empty() {
        return Some(Color::BLACK);
    }
    if value.starts_with("rgb(") {
        return parse_rgb_function(&value[4..], false);
    }
    if value.starts_with("rgba(") {
        return parse_rgb_function(&value[5..], true);
    }
    if value.starts_with('#') {
        return Color::from_hex(value);
    }
    // Pages sometimes specify hex colors without the leading '#'.
    Color::from_name(value).or_else(|| Color::from_hex(value))
}

/// Scans the next numeric component out of an rgb()/rgba() body. Integers
/// and percentages both map onto 0-255; out-of-range components are
/// clamped rather than rejected.
fn color_component(body: &str, pos: &mut usize) -> f32 {
    let bytes = body.as_bytes();
    let len = bytes.len();
    while *pos < len {
        let c = bytes[*pos];
        if c == b'-' || c == b'.' || c.is_ascii_digit() {
            break;
        }
        *pos += 1;
    }
    let start = *pos;
    if *pos < len && bytes[*pos] == b'-' {
        *pos += 1;
    }
    while *pos < len && bytes[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if *pos < len && bytes[*pos] == b'.' {
        *pos += 1;
        while *pos < len && bytes[*pos].is_ascii_digit() {
            *pos += 1;
        }
    }
    if start == *pos {
        return 0.0;
    }
    let mut value: f32 = body[start..*pos].parse().unwrap_or(0.0);
    if *pos < len && bytes[*pos] == b'%' {
        *pos += 1;
        value = value * 255.0 / 100.0;
    }
    value.clamp(0.0, 255.0)
}

/// Alpha component: plain numbers clamp to [0,1], percentages map
/// 100% -> 1.0.
fn alpha_component(body: &str, pos: &mut usize) -> f32 {
    let bytes = body.as_bytes();
    let len = bytes.len();
    while *pos < len {
        let c = bytes[*pos];
        if c == b'-' || c == b'.' || c.is_ascii_digit() {
            break;
        }
        *pos += 1;
    }
    let start = *pos;
    if *pos < len && bytes[*pos] == b'-' {
        *pos += 1;
    }
    while *pos < len && (bytes[*pos].is_ascii_digit() || bytes[*pos] == b'.') {
        *pos += 1;
    }
    if start == *pos {
        return 1.0;
    }
    let mut value: f32 = body[start..*pos].parse().unwrap_or(1.0);
    if *pos < len && bytes[*pos] == b'%' {
        *pos += 1;
        value /= 100.0;
    }
    value.clamp(0.0, 1.0)
}

fn parse_rgb_function(body: &str, has_alpha: bool) -> Option<Color> {
    let mut pos = 0;
    let r = color_component(body, &mut pos) as u8;
    let g = color_component(body, &mut pos) as u8;
    let b = color_component(body, &mut pos) as u8;
    let a = if has_alpha {
        alpha_component(body, &mut pos)
    } else {
        1.0
    };
    Some(Color::rgba(r, g, b, a))
}

/// How a parsed length relates to its resolution context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthKind {
    /// Scaled through the active unit table.
    Absolute,
    /// Fraction of a context value (stored as 0.5 for `50%`).
    Percentage,
    /// `em`/`ex`: multiple of the resolved ancestor font size.
    FontRelative,
    /// `larger`/`smaller`: index steps through the size map.
    Step,
}

/// A raw length: magnitude plus the unit it was written in. Resolution to
/// points happens later, against the active scale table and (for relative
/// kinds) the ancestor context.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthUnit {
    pub kind: LengthKind,
    pub value: f32,
    pub units: Option<&'static str>,
}

impl LengthUnit {
    pub fn parse(value: &str) -> Option<LengthUnit> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if let Some(num) = value.strip_suffix('%') {
            let v: f32 = num.parse().ok()?;
            return Some(LengthUnit {
                kind: LengthKind::Percentage,
                value: v / 100.0,
                units: None,
            });
        }
        if value.len() >= 2 && value.is_char_boundary(value.len() - 2) {
            let (num, units) = value.split_at(value.len() - 2);
            let interned = LENGTH_SCALE_LEGACY
                .iter()
                .find(|(u, _)| *u == units)
                .map(|(u, _)| *u);
            if let Some(interned) = interned {
                if let Ok(v) = num.parse::<f32>() {
                    return Some(LengthUnit {
                        kind: LengthKind::Absolute,
                        value: v,
                        units: Some(interned),
                    });
                }
            }
            if units == "em" || units == "ex" {
                if let Ok(v) = num.parse::<f32>() {
                    return Some(LengthUnit {
                        kind: LengthKind::FontRelative,
                        value: v,
                        units: None,
                    });
                }
            }
            if value == "larger" {
                return Some(LengthUnit {
                    kind: LengthKind::Step,
                    value: 2.0,
                    units: None,
                });
            }
            if value == "smaller" {
                return Some(LengthUnit {
                    kind: LengthKind::Step,
                    value: -2.0,
                    units: None,
                });
            }
        }
        // A bare number is treated as points.
        value.parse::<f32>().ok().map(|v| LengthUnit {
            kind: LengthKind::Absolute,
            value: v,
            units: None,
        })
    }

    /// Concrete point value for an absolute length.
    pub fn to_points(&self, w3c: bool) -> f32 {
        match self.units {
            Some(units) => self.value * unit_scale(units, w3c).unwrap_or(1.0),
            None => self.value,
        }
    }
}

/// Declared value for box lengths: margins, paddings, width, height,
/// spacing. Only absolute and percentage lengths are valid here.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthValue {
    pub unit: LengthUnit,
}

impl LengthValue {
    pub fn parse_css(value: &str) -> Option<LengthValue> {
        let unit = LengthUnit::parse(value)?;
        match unit.kind {
            LengthKind::Absolute | LengthKind::Percentage => Some(LengthValue { unit }),
            _ => None,
        }
    }

    /// Markup attributes allow a bare flag (`<td nowrap>`-style) to mean 1.
    pub fn parse_html(value: &str) -> Option<LengthValue> {
        if value.is_empty() {
            return Self::parse_css("1");
        }
        Self::parse_css(value)
    }

    pub fn is_percentage(&self) -> bool {
        self.unit.kind == LengthKind::Percentage
    }

    /// Point value; percentages resolve against `base`.
    pub fn resolve(&self, base: f32, w3c: bool) -> f32 {
        match self.unit.kind {
            LengthKind::Percentage => self.unit.value * base,
            _ => self.unit.to_points(w3c),
        }
    }

    pub fn to_css_string(&self) -> String {
        match self.unit.kind {
            LengthKind::Percentage => format!("{}%", self.unit.value * 100.0),
            _ => match self.unit.units {
                Some(units) => format!("{}{}", self.unit.value, units),
                None => format!("{}", self.unit.value),
            },
        }
    }
}

/// `border-*-width`: keyword widths map to fixed point values, everything
/// else parses as a length.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderWidth {
    pub length: LengthValue,
}

impl BorderWidth {
    pub fn parse_css(value: &str) -> Option<BorderWidth> {
        let mapped = match value {
            "thin" => "1",
            "medium" => "2",
            "thick" => "4",
            other => other,
        };
        LengthValue::parse_css(mapped).map(|length| BorderWidth { length })
    }

    pub fn parse_html(value: &str) -> Option<BorderWidth> {
        if value.is_empty() {
            return Self::parse_css("medium");
        }
        Self::parse_css(value)
    }

    pub fn to_points(&self, w3c: bool) -> f32 {
        self.length.resolve(0.0, w3c)
    }

    pub fn to_css_string(&self) -> String {
        self.length.to_css_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FontSizeSpec {
    /// 1-7 index into the stylesheet's size map.
    Index(i32),
    Unit(LengthUnit),
}

/// `font-size`. Resolution of the relative kinds needs the ancestor's
/// already-resolved point size, so the final conversion lives in the
/// resolver, parameterized by the stylesheet's size map and unit table.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSize {
    pub spec: FontSizeSpec,
}

impl FontSize {
    pub fn parse_css(value: &str) -> Option<FontSize> {
        let index = match value {
            "xx-small" => Some(1),
            "x-small" => Some(2),
            "small" => Some(3),
            "medium" => Some(4),
            "large" => Some(5),
            "x-large" => Some(6),
            "xx-large" => Some(7),
            _ => None,
        };
        if let Some(i) = index {
            return Some(FontSize {
                spec: FontSizeSpec::Index(i),
            });
        }
        LengthUnit::parse(value).map(|unit| FontSize {
            spec: FontSizeSpec::Unit(unit),
        })
    }

    /// The markup grammar: `+n`/`-n` relative to the base font index, or a
    /// bare index clamped to the table.
    pub fn parse_html(value: &str) -> Option<FontSize> {
        if value.is_empty() {
            return None;
        }
        let index = if let Some(rel) = value.strip_prefix('+') {
            BASE_FONT_INDEX + rel.parse::<i32>().ok()?
        } else if let Some(rel) = value.strip_prefix('-') {
            BASE_FONT_INDEX - rel.parse::<i32>().ok()?
        } else {
            value.parse::<i32>().ok()?.clamp(0, 7)
        };
        Some(FontSize {
            spec: FontSizeSpec::Index(index),
        })
    }

    /// Point size given the parent's resolved point size.
    pub fn resolve(&self, parent_pt: Option<f32>, map: &[i32; 7], w3c: bool) -> f32 {
        match &self.spec {
            FontSizeSpec::Index(i) => point_size(*i, map),
            FontSizeSpec::Unit(unit) => match unit.kind {
                LengthKind::Absolute => unit.to_points(w3c),
                LengthKind::Percentage | LengthKind::FontRelative => {
                    unit.value * parent_pt.unwrap_or(FALLBACK_FONT_SIZE)
                }
                LengthKind::Step => {
                    let base = index_of_size(parent_pt.unwrap_or(FALLBACK_FONT_SIZE), map);
                    point_size(base + unit.value as i32, map)
                }
            },
        }
    }

    pub fn to_css_string(&self) -> String {
        match &self.spec {
            FontSizeSpec::Index(i) => match i {
                1 => "xx-small".to_string(),
                2 => "x-small".to_string(),
                3 => "small".to_string(),
                4 => "medium".to_string(),
                5 => "large".to_string(),
                6 => "x-large".to_string(),
                7 => "xx-large".to_string(),
                other => format!("{}", other),
            },
            FontSizeSpec::Unit(unit) => match unit.kind {
                LengthKind::Percentage => format!("{}%", unit.value * 100.0),
                LengthKind::FontRelative => format!("{}em", unit.value),
                LengthKind::Step => {
                    if unit.value > 0.0 { "larger" } else { "smaller" }.to_string()
                }
                LengthKind::Absolute => match unit.units {
                    Some(units) => format!("{}{}", unit.value, units),
                    None => format!("{}", unit.value),
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontWeight {
    pub weight: i32,
}

impl FontWeight {
    pub fn parse_css(value: &str) -> Option<FontWeight> {
        let weight = match value {
            "bold" => 700,
            "normal" => 400,
            other => other.parse().ok()?,
        };
        Some(FontWeight { weight })
    }

    pub fn is_bold(&self) -> bool {
        self.weight > 500
    }

    pub fn to_css_string(&self) -> String {
        match self.weight {
            700 => "bold".to_string(),
            400 => "normal".to_string(),
            w => format!("{}", w),
        }
    }
}

/// `font-family`: the first usable entry of the comma list, with generic
/// families mapped to concrete names.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFamily {
    pub family: Option<String>,
    svalue: String,
}

impl FontFamily {
    pub fn parse_css(value: &str) -> Option<FontFamily> {
        let family = value
            .split(',')
            .map(|entry| entry.trim().trim_matches('"').trim_matches('\''))
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.to_ascii_lowercase().as_str() {
                "monospace" => "Monospaced".to_string(),
                "serif" => "Serif".to_string(),
                "sans-serif" => "SansSerif".to_string(),
                _ => entry.to_string(),
            })
            .next();
        Some(FontFamily {
            family,
            svalue: value.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        self.family.as_deref().unwrap_or("SansSerif")
    }

    pub fn to_css_string(&self) -> String {
        self.svalue.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorValue {
    pub color: Color,
}

impl ColorValue {
    pub fn parse_css(value: &str) -> Option<ColorValue> {
        parse_color(value).map(|color| ColorValue { color })
    }

    pub fn to_css_string(&self) -> String {
        self.color.to_hex_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyleKind {
    None,
    Dotted,
    Dashed,
    Solid,
    Double,
    Groove,
    Ridge,
    Inset,
    Outset,
}

impl BorderStyleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorderStyleKind::None => "none",
            BorderStyleKind::Dotted => "dotted",
            BorderStyleKind::Dashed => "dashed",
            BorderStyleKind::Solid => "solid",
            BorderStyleKind::Double => "double",
            BorderStyleKind::Groove => "groove",
            BorderStyleKind::Ridge => "ridge",
            BorderStyleKind::Inset => "inset",
            BorderStyleKind::Outset => "outset",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BorderStyleValue {
    pub style: BorderStyleKind,
}

impl BorderStyleValue {
    pub fn parse_css(value: &str) -> Option<BorderStyleValue> {
        let style = match value {
            "none" => BorderStyleKind::None,
            "dotted" => BorderStyleKind::Dotted,
            "dashed" => BorderStyleKind::Dashed,
            "solid" => BorderStyleKind::Solid,
            "double" => BorderStyleKind::Double,
            "groove" => BorderStyleKind::Groove,
            "ridge" => BorderStyleKind::Ridge,
            "inset" => BorderStyleKind::Inset,
            "outset" => BorderStyleKind::Outset,
            _ => return None,
        };
        Some(BorderStyleValue { style })
    }

    pub fn to_css_string(&self) -> String {
        self.style.as_str().to_string()
    }
}

/// `background-position`. Positions are stored as fractions (percentages)
/// or point offsets per axis; the flags record which interpretation each
/// axis uses so the painter can place the tile origin.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundPosition {
    pub horizontal: f32,
    pub vertical: f32,
    pub horizontal_relative: bool,
    pub vertical_relative: bool,
    pub horizontal_font_relative: bool,
    pub vertical_font_relative: bool,
    svalue: String,
}

impl BackgroundPosition {
    pub fn parse_css(value: &str) -> Option<BackgroundPosition> {
        let tokens = split_values(value);
        let mut bp = BackgroundPosition {
            horizontal: 0.0,
            vertical: 0.0,
            horizontal_relative: true,
            vertical_relative: true,
            horizontal_font_relative: false,
            vertical_font_relative: false,
            svalue: value.to_string(),
        };
        if tokens.is_empty() {
            return Some(bp);
        }

        let mut have_vertical = false;
        let mut have_horizontal = false;
        let mut have_center = false;
        for token in &tokens {
            match *token {
                "center" => have_center = true,
                "top" if !have_vertical => {
                    have_vertical = true;
                    bp.vertical = 0.0;
                }
                "bottom" if !have_vertical => {
                    have_vertical = true;
                    bp.vertical = 1.0;
                }
                "left" if !have_horizontal => {
                    have_horizontal = true;
                    bp.horizontal = 0.0;
                }
                "right" if !have_horizontal => {
                    have_horizontal = true;
                    bp.horizontal = 1.0;
                }
                _ => {}
            }
        }

        if have_vertical || have_horizontal || have_center {
            // Keyword grammar: an unset axis defaults to 50%.
            if have_vertical && !have_horizontal {
                bp.horizontal = 0.5;
            } else if have_horizontal && !have_vertical {
                bp.vertical = 0.5;
            } else if !have_horizontal && !have_vertical {
                bp.horizontal = 0.5;
                bp.vertical = 0.5;
            }
            return Some(bp);
        }

        // Length grammar.
        let first = LengthUnit::parse(tokens[0]).unwrap_or(LengthUnit {
            kind: LengthKind::Absolute,
            value: 0.0,
            units: None,
        });
        match first.kind {
            LengthKind::Percentage => bp.horizontal = first.value,
            LengthKind::FontRelative => {
                bp.horizontal = first.value;
                bp.horizontal_relative = false;
                bp.horizontal_font_relative = true;
            }
            _ => {
                bp.horizontal = first.value;
                bp.horizontal_relative = false;
            }
        }
        if tokens.len() > 1 {
            let second = LengthUnit::parse(tokens[1]).unwrap_or(LengthUnit {
                kind: LengthKind::Absolute,
                value: 0.0,
                units: None,
            });
            match second.kind {
                LengthKind::Percentage => bp.vertical = second.value,
                LengthKind::FontRelative => {
                    bp.vertical = second.value;
                    bp.vertical_relative = false;
                    bp.vertical_font_relative = true;
                }
                _ => {
                    bp.vertical = second.value;
                    bp.vertical_relative = false;
                }
            }
        } else {
            bp.vertical = 0.5;
        }
        Some(bp)
    }

    pub fn to_css_string(&self) -> String {
        self.svalue.clone()
    }
}

/// `background-image` / `list-style-image`: `none` or a URL reference.
/// Fetching and decoding are deferred to the image loader.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    pub url: Option<String>,
}

impl BackgroundImage {
    pub fn parse_css(value: &str) -> Option<BackgroundImage> {
        if value == "none" {
            return Some(BackgroundImage { url: None });
        }
        Some(BackgroundImage {
            url: Some(extract_url(value).to_string()),
        })
    }

    pub fn to_css_string(&self) -> String {
        match &self.url {
            Some(url) => format!("url({})", url),
            None => "none".to_string(),
        }
    }
}

/// One declared value, bound to exactly one property category. Immutable
/// after construction; updates replace the whole value.
#[derive(Debug, Clone, PartialEq)]
pub enum CssValue {
    Keyword(String),
    Length(LengthValue),
    BorderWidth(BorderWidth),
    FontSize(FontSize),
    FontFamily(FontFamily),
    FontWeight(FontWeight),
    Color(ColorValue),
    BorderStyle(BorderStyleValue),
    BackgroundPosition(BackgroundPosition),
    BackgroundImage(BackgroundImage),
}

impl CssValue {
    pub fn to_css_string(&self) -> String {
        match self {
            CssValue::Keyword(k) => k.clone(),
            CssValue::Length(v) => v.to_css_string(),
            CssValue::BorderWidth(v) => v.to_css_string(),
            CssValue::FontSize(v) => v.to_css_string(),
            CssValue::FontFamily(v) => v.to_css_string(),
            CssValue::FontWeight(v) => v.to_css_string(),
            CssValue::Color(v) => v.to_css_string(),
            CssValue::BorderStyle(v) => v.to_css_string(),
            CssValue::BackgroundPosition(v) => v.to_css_string(),
            CssValue::BackgroundImage(v) => v.to_css_string(),
        }
    }

    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            CssValue::Keyword(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_length(&self) -> Option<&LengthValue> {
        match self {
            CssValue::Length(v) => Some(v),
            CssValue::BorderWidth(v) => Some(&v.length),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            CssValue::Color(v) => Some(v.color),
            _ => None,
        }
    }

    pub fn as_font_size(&self) -> Option<&FontSize> {
        match self {
            CssValue::FontSize(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_border_style(&self) -> Option<BorderStyleKind> {
        match self {
            CssValue::BorderStyle(v) => Some(v.style),
            _ => None,
        }
    }
}
