//! Shorthand property expansion.
//!
//! Each expander parses a shorthand's raw value and writes the longhand
//! properties into the target attribute set, following the CSS1 shorthand
//! grammars. The failure policies differ by design: `font`, `background`
//! and the 4-value box shorthands fill unmatched slots with defaults
//! (CSS1 reset semantics), while `border` is all-or-nothing — any token
//! that fits no open slot aborts the whole shorthand.

use super::attrset::AttrSet;
use super::properties::Property;
use super::values::{
    parse_color, split_values, BorderStyleValue, BorderWidth, ColorValue, CssValue,
};

fn is_font_style(token: &str) -> bool {
    token == "italic" || token == "oblique"
}

fn is_font_variant(token: &str) -> bool {
    token == "small-caps"
}

fn is_font_weight(token: &str) -> bool {
    if token == "bold" || token == "bolder" || token == "lighter" {
        return true;
    }
    // 100-900
    let b = token.as_bytes();
    b.len() == 3 && (b'1'..=b'9').contains(&b[0]) && b[1] == b'0' && b[2] == b'0'
}

/// `font: [style || variant || weight]? size[/line-height]? family`
pub fn expand_font(value: &str, attrs: &mut AttrSet) {
    let tokens = split_values(value);
    let count = tokens.len();
    let mut index = 0;
    let mut found_style = false;
    let mut found_variant = false;
    let mut found_weight = false;

    // The leading optional slots are order-independent; a bare "normal"
    // is consumed without claiming any of them.
    let max_optional = count.min(3);
    while index < max_optional {
        let token = tokens[index];
        if !found_style && is_font_style(token) {
            attrs.add_css(Property::FontStyle, token);
            found_style = true;
            index += 1;
        } else if !found_variant && is_font_variant(token) {
            attrs.add_css(Property::FontVariant, token);
            found_variant = true;
            index += 1;
        } else if !found_weight && is_font_weight(token) {
            attrs.add_css(Property::FontWeight, token);
            found_weight = true;
            index += 1;
        } else if token == "normal" {
            index += 1;
        } else {
            break;
        }
    }
    if !found_style {
        attrs.add_css(Property::FontStyle, "normal");
    }
    if !found_variant {
        attrs.add_css(Property::FontVariant, "normal");
    }
    if !found_weight {
        attrs.add_css(Property::FontWeight, "normal");
    }

    // Mandatory size, optionally fused with /line-height.
    let mut pending_line_height: Option<&str> = None;
    if index < count {
        let token = tokens[index];
        if let Some(slash) = token.find('/') {
            attrs.add_css(Property::FontSize, &token[..slash]);
            pending_line_height = Some(&token[slash..]);
        } else {
            attrs.add_css(Property::FontSize, token);
        }
        index += 1;
    } else {
        attrs.add_css(Property::FontSize, "medium");
    }

    // Line height: either fused ("12pt/14pt"), a detached "/", or absent.
    let mut line_height: Option<&str> = None;
    if let Some(rest) = pending_line_height {
        if rest == "/" {
            if index < count {
                line_height = Some(tokens[index]);
                index += 1;
            }
        } else {
            line_height = Some(&rest[1..]);
        }
    } else if index < count && tokens[index].starts_with('/') {
        let token = tokens[index];
        index += 1;
        if token == "/" {
            if index < count {
                line_height = Some(tokens[index]);
                index += 1;
            }
        } else {
            line_height = Some(&token[1..]);
        }
    }
    attrs.add_css(Property::LineHeight, line_height.unwrap_or("normal"));

    // Everything left is the family list.
    if index < count {
        let family = tokens[index..].join(" ");
        attrs.add_css(Property::FontFamily, &family);
    } else {
        attrs.add_css(Property::FontFamily, "SansSerif");
    }
}

fn is_image(token: &str) -> bool {
    token.starts_with("url(") && token.ends_with(')')
}

fn is_repeat(token: &str) -> bool {
    matches!(token, "repeat-x" | "repeat-y" | "repeat" | "no-repeat")
}

fn is_attachment(token: &str) -> bool {
    token == "fixed" || token == "scroll"
}

fn is_position(token: &str) -> bool {
    matches!(token, "top" | "bottom" | "left" | "right" | "center")
        || token.as_bytes().first().is_some_and(|b| b.is_ascii_digit())
}

/// `background: image || repeat || attachment || position || color`
pub fn expand_background(value: &str, attrs: &mut AttrSet) {
    let tokens = split_values(value);
    let count = tokens.len();
    let mut index = 0;
    let mut found_image = false;
    let mut found_repeat = false;
    let mut found_attachment = false;
    let mut found_position = false;
    let mut found_color = false;

    while index < count {
        let token = tokens[index];
        index += 1;
        if !found_image && is_image(token) {
            attrs.add_css(Property::BackgroundImage, token);
            found_image = true;
        } else if !found_repeat && is_repeat(token) {
            attrs.add_css(Property::BackgroundRepeat, token);
            found_repeat = true;
        } else if !found_attachment && is_attachment(token) {
            attrs.add_css(Property::BackgroundAttachment, token);
            found_attachment = true;
        } else if !found_position && is_position(token) {
            // Position may consume a second token.
            if index < count && is_position(tokens[index]) {
                let pair = format!("{} {}", token, tokens[index]);
                index += 1;
                attrs.add_css(Property::BackgroundPosition, &pair);
            } else {
                attrs.add_css(Property::BackgroundPosition, token);
            }
            found_position = true;
        } else if !found_color && parse_color(token).is_some() {
            attrs.add_css(Property::BackgroundColor, token);
            found_color = true;
        }
    }

    if !found_image {
        attrs.add_css(Property::BackgroundImage, "none");
    }
    if !found_repeat {
        attrs.add_css(Property::BackgroundRepeat, "repeat");
    }
    if !found_attachment {
        attrs.add_css(Property::BackgroundAttachment, "scroll");
    }
    if !found_position {
        attrs.add_css(Property::BackgroundPosition, "0% 0%");
    }
    // Color deliberately left unset when absent.
}

/// CSS1 4-value box distribution for margin/padding/border-width/
/// border-color/border-style.
pub fn expand_box(value: &str, attrs: &mut AttrSet, names: &[Property; 4]) {
    let tokens = split_values(value);
    match tokens.len() {
        0 => {}
        1 => {
            for name in names {
                attrs.add_css(*name, tokens[0]);
            }
        }
        2 => {
            // top/bottom from the first, left/right from the second
            attrs.add_css(names[0], tokens[0]);
            attrs.add_css(names[2], tokens[0]);
            attrs.add_css(names[1], tokens[1]);
            attrs.add_css(names[3], tokens[1]);
        }
        3 => {
            attrs.add_css(names[0], tokens[0]);
            attrs.add_css(names[1], tokens[1]);
            attrs.add_css(names[2], tokens[2]);
            attrs.add_css(names[3], tokens[1]);
        }
        _ => {
            for (name, token) in names.iter().zip(tokens.iter()) {
                attrs.add_css(*name, token);
            }
        }
    }
}

const BORDER_SIDES: [(Property, Property, Property, Property); 4] = [
    (
        Property::BorderTop,
        Property::BorderTopColor,
        Property::BorderTopStyle,
        Property::BorderTopWidth,
    ),
    (
        Property::BorderRight,
        Property::BorderRightColor,
        Property::BorderRightStyle,
        Property::BorderRightWidth,
    ),
    (
        Property::BorderBottom,
        Property::BorderBottomColor,
        Property::BorderBottomStyle,
        Property::BorderBottomWidth,
    ),
    (
        Property::BorderLeft,
        Property::BorderLeftColor,
        Property::BorderLeftStyle,
        Property::BorderLeftWidth,
    ),
];

/// `border` and its per-side forms: width, style and color collected
/// order-independently through per-slot parsers. A token that matches no
/// open slot fails the whole shorthand, leaving no attributes set.
pub fn expand_border(key: Property, value: &str, attrs: &mut AttrSet) {
    let mut color: Option<CssValue> = None;
    let mut style: Option<CssValue> = None;
    let mut width: Option<CssValue> = None;

    for token in split_values(value) {
        let mut valid = false;
        if let Some(c) = ColorValue::parse_css(token) {
            if color.is_none() {
                color = Some(CssValue::Color(c));
                valid = true;
            }
        } else if let Some(s) = BorderStyleValue::parse_css(token) {
            if style.is_none() {
                style = Some(CssValue::BorderStyle(s));
                valid = true;
            }
        } else if let Some(w) = BorderWidth::parse_css(token) {
            if width.is_none() {
                width = Some(CssValue::BorderWidth(w));
                valid = true;
            }
        }
        if !valid {
            // Unparseable, or the slot was already claimed.
            return;
        }
    }

    let style = style.or_else(|| Property::BorderTopStyle.parse_css_value("none"));
    let width = width.or_else(|| Property::BorderTopWidth.parse_css_value("medium"));

    for (side, color_key, style_key, width_key) in BORDER_SIDES {
        if key == Property::Border || key == side {
            if let Some(c) = &color {
                attrs.set(color_key, c.clone());
            }
            if let Some(s) = &style {
                attrs.set(style_key, s.clone());
            }
            if let Some(w) = &width {
                attrs.set(width_key, w.clone());
            }
        }
    }
}
