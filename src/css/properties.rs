//! The closed set of recognized style properties.
//!
//! Property identity is the enum variant; the set is fixed at compile time
//! and shared freely across threads. Each key carries its name, its default
//! value text (parsed lazily by the resolver), and whether it participates
//! in inheritance.

use super::values::{
    BackgroundImage, BackgroundPosition, BorderStyleValue, BorderWidth, ColorValue, CssValue,
    FontFamily, FontSize, FontWeight, LengthValue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Background,
    BackgroundAttachment,
    BackgroundColor,
    BackgroundImage,
    BackgroundPosition,
    BackgroundRepeat,
    Border,
    BorderBottom,
    BorderBottomColor,
    BorderBottomStyle,
    BorderBottomWidth,
    BorderColor,
    BorderLeft,
    BorderLeftColor,
    BorderLeftStyle,
    BorderLeftWidth,
    BorderRight,
    BorderRightColor,
    BorderRightStyle,
    BorderRightWidth,
    BorderSpacing,
    BorderStyle,
    BorderTop,
    BorderTopColor,
    BorderTopStyle,
    BorderTopWidth,
    BorderWidth,
    Clear,
    Color,
    Display,
    Float,
    Font,
    FontFamily,
    FontSize,
    FontStyle,
    FontVariant,
    FontWeight,
    Height,
    LetterSpacing,
    LineHeight,
    ListStyle,
    ListStyleImage,
    ListStylePosition,
    ListStyleType,
    Margin,
    MarginBottom,
    MarginLeft,
    MarginRight,
    MarginTop,
    Padding,
    PaddingBottom,
    PaddingLeft,
    PaddingRight,
    PaddingTop,
    TextAlign,
    TextDecoration,
    TextIndent,
    TextTransform,
    VerticalAlign,
    WhiteSpace,
    Width,
    WordSpacing,
}

impl Property {
    /// Every recognized property, for building the default table.
    pub const ALL: [Property; 62] = [
        Property::Background,
        Property::BackgroundAttachment,
        Property::BackgroundColor,
        Property::BackgroundImage,
        Property::BackgroundPosition,
        Property::BackgroundRepeat,
        Property::Border,
        Property::BorderBottom,
        Property::BorderBottomColor,
        Property::BorderBottomStyle,
        Property::BorderBottomWidth,
        Property::BorderColor,
        Property::BorderLeft,
        Property::BorderLeftColor,
        Property::BorderLeftStyle,
        Property::BorderLeftWidth,
        Property::BorderRight,
        Property::BorderRightColor,
        Property::BorderRightStyle,
        Property::BorderRightWidth,
        Property::BorderSpacing,
        Property::BorderStyle,
        Property::BorderTop,
        Property::BorderTopColor,
        Property::BorderTopStyle,
        Property::BorderTopWidth,
        Property::BorderWidth,
        Property::Clear,
        Property::Color,
        Property::Display,
        Property::Float,
        Property::Font,
        Property::FontFamily,
        Property::FontSize,
        Property::FontStyle,
        Property::FontVariant,
        Property::FontWeight,
        Property::Height,
        Property::LetterSpacing,
        Property::LineHeight,
        Property::ListStyle,
        Property::ListStyleImage,
        Property::ListStylePosition,
        Property::ListStyleType,
        Property::Margin,
        Property::MarginBottom,
        Property::MarginLeft,
        Property::MarginRight,
        Property::MarginTop,
        Property::Padding,
        Property::PaddingBottom,
        Property::PaddingLeft,
        Property::PaddingRight,
        Property::PaddingTop,
        Property::TextAlign,
        Property::TextDecoration,
        Property::TextIndent,
        Property::TextTransform,
        Property::VerticalAlign,
        Property::WhiteSpace,
        Property::Width,
        Property::WordSpacing,
    ];
}

/// The four sides of the box shorthands, in CSS order.
pub const ALL_MARGINS: [Property; 4] = [
    Property::MarginTop,
    Property::MarginRight,
    Property::MarginBottom,
    Property::MarginLeft,
];

pub const ALL_PADDING: [Property; 4] = [
    Property::PaddingTop,
    Property::PaddingRight,
    Property::PaddingBottom,
    Property::PaddingLeft,
];

pub const ALL_BORDER_WIDTHS: [Property; 4] = [
    Property::BorderTopWidth,
    Property::BorderRightWidth,
    Property::BorderBottomWidth,
    Property::BorderLeftWidth,
];

pub const ALL_BORDER_COLORS: [Property; 4] = [
    Property::BorderTopColor,
    Property::BorderRightColor,
    Property::BorderBottomColor,
    Property::BorderLeftColor,
];

pub const ALL_BORDER_STYLES: [Property; 4] = [
    Property::BorderTopStyle,
    Property::BorderRightStyle,
    Property::BorderBottomStyle,
    Property::BorderLeftStyle,
];

/// The value category a property's raw text parses through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Color,
    Length,
    BorderWidth,
    BorderStyle,
    FontSize,
    FontFamily,
    FontWeight,
    BackgroundPosition,
    Image,
    /// Keyword/string-valued, or length-or-keyword (line-height, spacing).
    Keyword,
    /// Shorthands never hold a value directly; they expand to longhands.
    Shorthand,
}

impl Property {
    pub fn name(&self) -> &'static str {
        self.info().0
    }

    pub fn default_value(&self) -> Option<&'static str> {
        self.info().1
    }

    pub fn is_inherited(&self) -> bool {
        self.info().2
    }

    pub fn is_shorthand(&self) -> bool {
        self.category() == Category::Shorthand
    }

    fn info(&self) -> (&'static str, Option<&'static str>, bool) {
        use Property::*;
        match self {
            Background => ("background", None, false),
            BackgroundAttachment => ("background-attachment", Some("scroll"), false),
            BackgroundColor => ("background-color", Some("transparent"), false),
            BackgroundImage => ("background-image", Some("none"), false),
            BackgroundPosition => ("background-position", None, false),
            BackgroundRepeat => ("background-repeat", Some("repeat"), false),
            Border => ("border", None, false),
            BorderBottom => ("border-bottom", None, false),
            BorderBottomColor => ("border-bottom-color", None, false),
            BorderBottomStyle => ("border-bottom-style", Some("none"), false),
            BorderBottomWidth => ("border-bottom-width", Some("medium"), false),
            BorderColor => ("border-color", None, false),
            BorderLeft => ("border-left", None, false),
            BorderLeftColor => ("border-left-color", None, false),
            BorderLeftStyle => ("border-left-style", Some("none"), false),
            BorderLeftWidth => ("border-left-width", Some("medium"), false),
            BorderRight => ("border-right", None, false),
            BorderRightColor => ("border-right-color", None, false),
            BorderRightStyle => ("border-right-style", Some("none"), false),
            BorderRightWidth => ("border-right-width", Some("medium"), false),
            BorderSpacing => ("border-spacing", Some("0"), true),
            BorderStyle => ("border-style", Some("none"), false),
            BorderTop => ("border-top", None, false),
            BorderTopColor => ("border-top-color", None, false),
            BorderTopStyle => ("border-top-style", Some("none"), false),
            BorderTopWidth => ("border-top-width", Some("medium"), false),
            BorderWidth => ("border-width", Some("medium"), false),
            Clear => ("clear", Some("none"), false),
            Color => ("color", Some("black"), true),
            Display => ("display", Some("block"), false),
            Float => ("float", Some("none"), false),
            Font => ("font", None, true),
            FontFamily => ("font-family", None, true),
            FontSize => ("font-size", Some("medium"), true),
            FontStyle => ("font-style", Some("normal"), true),
            FontVariant => ("font-variant", Some("normal"), true),
            FontWeight => ("font-weight", Some("normal"), true),
            Height => ("height", Some("auto"), false),
            LetterSpacing => ("letter-spacing", Some("normal"), true),
            LineHeight => ("line-height", Some("normal"), true),
            ListStyle => ("list-style", None, true),
            ListStyleImage => ("list-style-image", Some("none"), true),
            ListStylePosition => ("list-style-position", Some("outside"), true),
            ListStyleType => ("list-style-type", Some("disc"), true),
            Margin => ("margin", None, false),
            MarginBottom => ("margin-bottom", Some("0"), false),
            MarginLeft => ("margin-left", Some("0"), false),
            MarginRight => ("margin-right", Some("0"), false),
            MarginTop => ("margin-top", Some("0"), false),
            Padding => ("padding", None, false),
            PaddingBottom => ("padding-bottom", Some("0"), false),
            PaddingLeft => ("padding-left", Some("0"), false),
            PaddingRight => ("padding-right", Some("0"), false),
            PaddingTop => ("padding-top", Some("0"), false),
            TextAlign => ("text-align", None, true),
            TextDecoration => ("text-decoration", Some("none"), true),
            TextIndent => ("text-indent", Some("0"), true),
            TextTransform => ("text-transform", Some("none"), true),
            VerticalAlign => ("vertical-align", Some("baseline"), false),
            WhiteSpace => ("white-space", Some("normal"), true),
            Width => ("width", Some("auto"), false),
            WordSpacing => ("word-spacing", Some("normal"), true),
        }
    }

    pub fn from_name(name: &str) -> Option<Property> {
        use Property::*;
        let p = match name {
            "background" => Background,
            "background-attachment" => BackgroundAttachment,
            "background-color" => BackgroundColor,
            "background-image" => BackgroundImage,
            "background-position" => BackgroundPosition,
            "background-repeat" => BackgroundRepeat,
            "border" => Border,
            "border-bottom" => BorderBottom,
            "border-bottom-color" => BorderBottomColor,
            "border-bottom-style" => BorderBottomStyle,
            "border-bottom-width" => BorderBottomWidth,
            "border-color" => BorderColor,
            "border-left" => BorderLeft,
            "border-left-color" => BorderLeftColor,
            "border-left-style" => BorderLeftStyle,
            "border-left-width" => BorderLeftWidth,
            "border-right" => BorderRight,
            "border-right-color" => BorderRightColor,
            "border-right-style" => BorderRightStyle,
            "border-right-width" => BorderRightWidth,
            "border-spacing" => BorderSpacing,
            "border-style" => BorderStyle,
            "border-top" => BorderTop,
            "border-top-color" => BorderTopColor,
            "border-top-style" => BorderTopStyle,
            "border-top-width" => BorderTopWidth,
            "border-width" => BorderWidth,
            "clear" => Clear,
            "color" => Color,
            "display" => Display,
            "float" => Float,
            "font" => Font,
            "font-family" => FontFamily,
            "font-size" => FontSize,
            "font-style" => FontStyle,
            "font-variant" => FontVariant,
            "font-weight" => FontWeight,
            "height" => Height,
            "letter-spacing" => LetterSpacing,
            "line-height" => LineHeight,
            "list-style" => ListStyle,
            "list-style-image" => ListStyleImage,
            "list-style-position" => ListStylePosition,
            "list-style-type" => ListStyleType,
            "margin" => Margin,
            "margin-bottom" => MarginBottom,
            "margin-left" => MarginLeft,
            "margin-right" => MarginRight,
            "margin-top" => MarginTop,
            "padding" => Padding,
            "padding-bottom" => PaddingBottom,
            "padding-left" => PaddingLeft,
            "padding-right" => PaddingRight,
            "padding-top" => PaddingTop,
            "text-align" => TextAlign,
            "text-decoration" => TextDecoration,
            "text-indent" => TextIndent,
            "text-transform" => TextTransform,
            "vertical-align" => VerticalAlign,
            "white-space" => WhiteSpace,
            "width" => Width,
            "word-spacing" => WordSpacing,
            _ => return None,
        };
        Some(p)
    }

    fn category(&self) -> Category {
        use Property::*;
        match self {
            Color | BackgroundColor | BorderTopColor | BorderRightColor | BorderBottomColor
            | BorderLeftColor => Category::Color,
            MarginTop | MarginRight | MarginBottom | MarginLeft | PaddingTop | PaddingRight
            | PaddingBottom | PaddingLeft | Width | Height | BorderSpacing | TextIndent => {
                Category::Length
            }
            BorderTopWidth | BorderRightWidth | BorderBottomWidth | BorderLeftWidth => {
                Category::BorderWidth
            }
            BorderTopStyle | BorderRightStyle | BorderBottomStyle | BorderLeftStyle => {
                Category::BorderStyle
            }
            FontSize => Category::FontSize,
            FontFamily => Category::FontFamily,
            FontWeight => Category::FontWeight,
            BackgroundPosition => Category::BackgroundPosition,
            BackgroundImage | ListStyleImage => Category::Image,
            Font | Background | Margin | Padding | Border | BorderTop | BorderRight
            | BorderBottom | BorderLeft | BorderWidth | BorderColor | BorderStyle => {
                Category::Shorthand
            }
            _ => Category::Keyword,
        }
    }

    /// Parses a raw CSS-syntax value into this property's typed form.
    /// Shorthands return `None`; they are expanded by the attribute-set
    /// layer, not stored.
    pub fn parse_css_value(&self, raw: &str) -> Option<CssValue> {
        let raw = raw.trim();
        match self.category() {
            Category::Color => ColorValue::parse_css(raw).map(CssValue::Color),
            Category::Length => {
                // The one keyword length, auto, stays a keyword.
                LengthValue::parse_css(raw)
                    .map(CssValue::Length)
                    .or_else(|| (raw == "auto").then(|| CssValue::Keyword("auto".to_string())))
            }
            Category::BorderWidth => BorderWidth::parse_css(raw).map(CssValue::BorderWidth),
            Category::BorderStyle => BorderStyleValue::parse_css(raw).map(CssValue::BorderStyle),
            Category::FontSize => FontSize::parse_css(raw).map(CssValue::FontSize),
            Category::FontFamily => FontFamily::parse_css(raw).map(CssValue::FontFamily),
            Category::FontWeight => FontWeight::parse_css(raw).map(CssValue::FontWeight),
            Category::BackgroundPosition => {
                BackgroundPosition::parse_css(raw).map(CssValue::BackgroundPosition)
            }
            Category::Image => BackgroundImage::parse_css(raw).map(CssValue::BackgroundImage),
            Category::Keyword => {
                if matches!(self, Property::LineHeight | Property::LetterSpacing
                    | Property::WordSpacing)
                {
                    if let Some(v) = LengthValue::parse_css(raw) {
                        return Some(CssValue::Length(v));
                    }
                }
                keyword_value(raw)
            }
            Category::Shorthand => None,
        }
    }

    /// Parses a legacy markup-attribute value. The grammar is looser than
    /// CSS: `size="+2"`, bare numbers for widths, empty values for boolean
    /// attributes.
    pub fn parse_html_value(&self, raw: &str) -> Option<CssValue> {
        let raw = raw.trim();
        match self.category() {
            Category::FontSize => FontSize::parse_html(raw).map(CssValue::FontSize),
            Category::Length => LengthValue::parse_html(raw).map(CssValue::Length),
            Category::BorderWidth => BorderWidth::parse_html(raw).map(CssValue::BorderWidth),
            Category::Keyword if *self == Property::WhiteSpace => {
                // The nowrap boolean attribute carries no useful value text.
                Some(CssValue::Keyword("nowrap".to_string()))
            }
            Category::Keyword if *self == Property::ListStyleType => {
                let keyword = match raw {
                    "1" => "decimal".to_string(),
                    "a" => "lower-alpha".to_string(),
                    "A" => "upper-alpha".to_string(),
                    "i" => "lower-roman".to_string(),
                    "I" => "upper-roman".to_string(),
                    other => other.to_ascii_lowercase(),
                };
                Some(CssValue::Keyword(keyword))
            }
            _ => self.parse_css_value(raw),
        }
    }
}

fn keyword_value(raw: &str) -> Option<CssValue> {
    if raw.is_empty() {
        return None;
    }
    Some(CssValue::Keyword(raw.to_ascii_lowercase()))
}

/// The closed set of legacy structural-markup attributes that translate
/// into declared properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkupAttr {
    Align,
    Background,
    Bgcolor,
    Border,
    Cellpadding,
    Cellspacing,
    Clear,
    Color,
    Face,
    Height,
    Hspace,
    Marginheight,
    Marginwidth,
    Nowrap,
    Size,
    Text,
    Type,
    Valign,
    Vspace,
    Width,
}

impl MarkupAttr {
    pub fn name(&self) -> &'static str {
        use MarkupAttr::*;
        match self {
            Align => "align",
            Background => "background",
            Bgcolor => "bgcolor",
            Border => "border",
            Cellpadding => "cellpadding",
            Cellspacing => "cellspacing",
            Clear => "clear",
            Color => "color",
            Face => "face",
            Height => "height",
            Hspace => "hspace",
            Marginheight => "marginheight",
            Marginwidth => "marginwidth",
            Nowrap => "nowrap",
            Size => "size",
            Text => "text",
            Type => "type",
            Valign => "valign",
            Vspace => "vspace",
            Width => "width",
        }
    }

    pub fn from_name(name: &str) -> Option<MarkupAttr> {
        use MarkupAttr::*;
        let a = match name {
            "align" => Align,
            "background" => Background,
            "bgcolor" => Bgcolor,
            "border" => Border,
            "cellpadding" => Cellpadding,
            "cellspacing" => Cellspacing,
            "clear" => Clear,
            "color" => Color,
            "face" => Face,
            "height" => Height,
            "hspace" => Hspace,
            "marginheight" => Marginheight,
            "marginwidth" => Marginwidth,
            "nowrap" => Nowrap,
            "size" => Size,
            "text" => Text,
            "type" => Type,
            "valign" => Valign,
            "vspace" => Vspace,
            "width" => Width,
            _ => return None,
        };
        Some(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for p in [
            Property::Color,
            Property::FontSize,
            Property::BorderTopWidth,
            Property::ListStyleType,
            Property::WordSpacing,
        ] {
            assert_eq!(Property::from_name(p.name()), Some(p));
        }
        assert_eq!(Property::from_name("font-stretch"), None);
    }

    #[test]
    fn test_inheritance_flags() {
        assert!(Property::Color.is_inherited());
        assert!(Property::FontSize.is_inherited());
        assert!(!Property::MarginTop.is_inherited());
        assert!(!Property::BackgroundColor.is_inherited());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Property::Color.default_value(), Some("black"));
        assert_eq!(Property::FontSize.default_value(), Some("medium"));
        assert_eq!(Property::Background.default_value(), None);
    }

    #[test]
    fn test_parse_dispatch() {
        assert!(matches!(
            Property::Color.parse_css_value("red"),
            Some(CssValue::Color(_))
        ));
        assert!(matches!(
            Property::MarginTop.parse_css_value("10pt"),
            Some(CssValue::Length(_))
        ));
        assert!(matches!(
            Property::MarginTop.parse_css_value("auto"),
            Some(CssValue::Keyword(_))
        ));
        assert!(matches!(
            Property::BorderTopStyle.parse_css_value("solid"),
            Some(CssValue::BorderStyle(_))
        ));
        // Shorthands are not stored directly.
        assert_eq!(Property::Margin.parse_css_value("1px 2px"), None);
    }

    #[test]
    fn test_parse_failure_is_none() {
        assert_eq!(Property::Color.parse_css_value("#zzz"), None);
        assert_eq!(Property::FontWeight.parse_css_value("heavy"), None);
        assert_eq!(Property::BorderTopStyle.parse_css_value("wavy"), None);
    }

    #[test]
    fn test_html_grammar_differs() {
        // HTML size="+2" is not valid CSS font-size.
        assert!(Property::FontSize.parse_html_value("+2").is_some());
        assert!(matches!(
            Property::ListStyleType.parse_html_value("A"),
            Some(CssValue::Keyword(k)) if k == "upper-alpha"
        ));
    }

    #[test]
    fn test_markup_attr_names() {
        assert_eq!(MarkupAttr::from_name("bgcolor"), Some(MarkupAttr::Bgcolor));
        assert_eq!(MarkupAttr::from_name("onclick"), None);
    }
}
