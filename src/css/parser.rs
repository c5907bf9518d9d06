//! CSS1 rule-text parsing.
//!
//! Tokenization is delegated to `cssparser`; declaration values are
//! re-serialized to raw text and handed to the typed value model, which
//! owns the per-property grammars. Anything malformed is skipped, never
//! surfaced: a bad declaration loses only itself, a bad rule only itself.

use cssparser::{ParseError, Parser, ParserInput, Token};
use url::Url;

use super::attrset::AttrSet;
use super::properties::Property;
use super::selector::{clean_selector_string, simple_selectors};
use super::values::extract_url;

/// One parsed top-level item, in document order.
#[derive(Debug)]
pub enum SheetItem {
    /// An `@import url(...)` directive, already resolved against the
    /// sheet's base URL where possible.
    Import(String),
    Rule {
        /// One token chain per selector in the comma group.
        selectors: Vec<Vec<String>>,
        declaration: AttrSet,
    },
}

/// Parses a chunk of CSS1 text into rules and import directives.
pub fn parse_sheet(css: &str, base: Option<&Url>) -> Vec<SheetItem> {
    let mut items = Vec::new();
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);

    while !parser.is_exhausted() {
        if parse_item(&mut parser, base, &mut items).is_err() {
            let _ = parser.next();
        }
    }
    items
}

/// Parses inline declaration text (the body of a `style="..."`
/// attribute) into an attribute set.
pub fn parse_declaration_block(decl: &str, base: Option<&Url>) -> AttrSet {
    let mut input = ParserInput::new(decl);
    let mut parser = Parser::new(&mut input);
    let mut attrs = AttrSet::new();
    parse_declarations(&mut parser, base, &mut attrs);
    attrs
}

fn parse_item<'i>(
    parser: &mut Parser<'i, '_>,
    base: Option<&Url>,
    items: &mut Vec<SheetItem>,
) -> Result<(), ParseError<'i, ()>> {
    let state = parser.state();
    let token = parser.next()?.clone();
    match token {
        Token::AtKeyword(name) if name.eq_ignore_ascii_case("import") => {
            if let Ok(url) = parse_import_url(parser) {
                let resolved = match base {
                    Some(base) => base
                        .join(&url)
                        .map(|u| u.to_string())
                        .unwrap_or(url),
                    None => url,
                };
                items.push(SheetItem::Import(resolved));
            }
            skip_at_rule(parser);
            Ok(())
        }
        Token::AtKeyword(_) => {
            // Unrecognized at-rule; drop it whole.
            skip_at_rule(parser);
            Ok(())
        }
        _ => {
            parser.reset(&state);
            parse_style_rule(parser, base, items)
        }
    }
}

fn parse_import_url<'i>(parser: &mut Parser<'i, '_>) -> Result<String, ParseError<'i, ()>> {
    let token = parser.next()?.clone();
    match token {
        Token::UnquotedUrl(url) => Ok(url.to_string()),
        Token::QuotedString(url) => Ok(url.to_string()),
        Token::Function(ref name) if name.eq_ignore_ascii_case("url") => {
            parser.parse_nested_block(|p| {
                let token = p.next()?.clone();
                match token {
                    Token::QuotedString(url) => Ok(url.to_string()),
                    Token::Ident(url) => Ok(url.to_string()),
                    Token::UnquotedUrl(url) => Ok(url.to_string()),
                    t => {
                        let t = t.clone();
                        Err(p.new_unexpected_token_error(t))
                    }
                }
            })
        }
        t => Err(parser.new_unexpected_token_error(t)),
    }
}

/// Consumes the remainder of an at-rule: up to a semicolon or a whole
/// block (which `next` yields as one token at this nesting level).
fn skip_at_rule(parser: &mut Parser<'_, '_>) {
    loop {
        match parser.next() {
            Ok(Token::Semicolon) | Ok(Token::CurlyBracketBlock) | Err(_) => break,
            Ok(_) => {}
        }
    }
}

fn parse_style_rule<'i>(
    parser: &mut Parser<'i, '_>,
    base: Option<&Url>,
    items: &mut Vec<SheetItem>,
) -> Result<(), ParseError<'i, ()>> {
    let selector_text = parse_selector_prelude(parser)?;

    let mut selectors = Vec::new();
    for group in selector_text.split(',') {
        let cleaned = clean_selector_string(group);
        let tokens: Vec<String> = simple_selectors(&cleaned)
            .iter()
            .map(|t| normalize_selector_token(t))
            .collect();
        if !tokens.is_empty() {
            selectors.push(tokens);
        }
    }

    parser.expect_curly_bracket_block()?;
    let mut declaration = AttrSet::new();
    parser.parse_nested_block(|p| {
        parse_declarations(p, base, &mut declaration);
        Ok::<(), ParseError<'i, ()>>(())
    })?;

    if !selectors.is_empty() && !declaration.is_empty() {
        items.push(SheetItem::Rule {
            selectors,
            declaration,
        });
    }
    Ok(())
}

/// Tag names are case-insensitive; class and id qualifiers are not.
fn normalize_selector_token(token: &str) -> String {
    if token.starts_with('.') || token.starts_with('#') {
        token.to_string()
    } else {
        token.to_ascii_lowercase()
    }
}

fn parse_selector_prelude<'i>(parser: &mut Parser<'i, '_>) -> Result<String, ParseError<'i, ()>> {
    let mut selector = String::new();
    loop {
        let state = parser.state();
        let token = match parser.next_including_whitespace() {
            Ok(token) => token,
            Err(_) => break,
        };
        match token {
            Token::CurlyBracketBlock => {
                parser.reset(&state);
                break;
            }
            Token::Ident(ident) => selector.push_str(ident),
            Token::IDHash(id) => {
                selector.push('#');
                selector.push_str(id);
            }
            Token::Hash(id) => {
                selector.push('#');
                selector.push_str(id);
            }
            Token::Delim('.') => selector.push('.'),
            Token::Delim('#') => selector.push('#'),
            Token::Delim('*') => selector.push('*'),
            Token::Comma => selector.push(','),
            Token::WhiteSpace(_) => selector.push(' '),
            _ => {}
        }
        if parser.is_exhausted() {
            break;
        }
    }
    Ok(selector.trim().to_string())
}

fn parse_declarations(parser: &mut Parser<'_, '_>, base: Option<&Url>, attrs: &mut AttrSet) {
    while !parser.is_exhausted() {
        if parse_one_declaration(parser, base, attrs).is_err() {
            // Resynchronize at the next declaration boundary.
            loop {
                match parser.next() {
                    Ok(Token::Semicolon) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        }
    }
}

fn parse_one_declaration<'i>(
    parser: &mut Parser<'i, '_>,
    base: Option<&Url>,
    attrs: &mut AttrSet,
) -> Result<(), ParseError<'i, ()>> {
    while parser.try_parse(|p| p.expect_semicolon()).is_ok() {}
    if parser.is_exhausted() {
        return Ok(());
    }

    let name = parser.expect_ident()?.to_ascii_lowercase();
    parser.expect_colon()?;
    let raw = serialize_value(parser)?;
    let raw = raw.trim();

    let Some(property) = Property::from_name(&name) else {
        // Unrecognized property; drop silently.
        return Ok(());
    };

    // list-style-image is fetched later, away from the sheet text, so its
    // URL has to be absolutized now while the base is known.
    if property == Property::ListStyleImage && raw != "none" {
        if let Some(base) = base {
            if let Ok(abs) = base.join(extract_url(raw)) {
                attrs.add_css(property, &format!("url({})", abs));
                return Ok(());
            }
        }
    }
    attrs.add_css(property, raw);
    Ok(())
}

/// Re-serializes the value tokens of one declaration back into raw text
/// for the typed value model. Stops after the terminating semicolon.
fn serialize_value<'i>(parser: &mut Parser<'i, '_>) -> Result<String, ParseError<'i, ()>> {
    let mut out = String::new();
    loop {
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::Semicolon => break,
            Token::Function(name) => {
                out.push_str(&name);
                out.push('(');
                parser.parse_nested_block(|p| {
                    let inner = serialize_value(p)?;
                    out.push_str(&inner);
                    Ok::<(), ParseError<'i, ()>>(())
                })?;
                out.push(')');
            }
            Token::ParenthesisBlock => {
                out.push('(');
                parser.parse_nested_block(|p| {
                    let inner = serialize_value(p)?;
                    out.push_str(&inner);
                    Ok::<(), ParseError<'i, ()>>(())
                })?;
                out.push(')');
            }
            other => append_token(&mut out, &other),
        }
        if parser.is_exhausted() {
            break;
        }
    }
    Ok(out)
}

fn append_token(out: &mut String, token: &Token) {
    match token {
        Token::Ident(v) => out.push_str(v),
        Token::QuotedString(v) => {
            out.push('"');
            out.push_str(v);
            out.push('"');
        }
        Token::UnquotedUrl(v) => {
            out.push_str("url(");
            out.push_str(v);
            out.push(')');
        }
        Token::Hash(v) | Token::IDHash(v) => {
            out.push('#');
            out.push_str(v);
        }
        Token::Number { value, .. } => out.push_str(&format_number(*value)),
        Token::Percentage { unit_value, .. } => {
            out.push_str(&format_number(unit_value * 100.0));
            out.push('%');
        }
        Token::Dimension { value, unit, .. } => {
            out.push_str(&format_number(*value));
            out.push_str(unit);
        }
        Token::Delim(c) => out.push(*c),
        Token::Comma => out.push(','),
        Token::Colon => out.push(':'),
        Token::WhiteSpace(_) => out.push(' '),
        _ => {}
    }
}

/// Prints whole-valued floats without a fraction so re-parsed text stays
/// stable.
fn format_number(value: f32) -> String {
    if (value - value.round()).abs() < 1e-4 {
        format!("{}", value.round() as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(css: &str) -> Vec<SheetItem> {
        parse_sheet(css, None)
    }

    #[test]
    fn test_parse_simple_rule() {
        let items = rules("p { color: red; }");
        assert_eq!(items.len(), 1);
        let SheetItem::Rule {
            selectors,
            declaration,
        } = &items[0]
        else {
            panic!("expected rule");
        };
        assert_eq!(selectors, &vec![vec!["p".to_string()]]);
        assert_eq!(
            declaration.get(Property::Color).unwrap().to_css_string(),
            "#ff0000"
        );
    }

    #[test]
    fn test_parse_descendant_selector() {
        let items = rules("ol li p { color: red }");
        let SheetItem::Rule { selectors, .. } = &items[0] else {
            panic!("expected rule");
        };
        assert_eq!(selectors[0], vec!["ol", "li", "p"]);
    }

    #[test]
    fn test_selector_group_splits_on_comma() {
        let items = rules("h1, h2.title { color: red }");
        let SheetItem::Rule { selectors, .. } = &items[0] else {
            panic!("expected rule");
        };
        assert_eq!(selectors.len(), 2);
        assert_eq!(selectors[0], vec!["h1"]);
        assert_eq!(selectors[1], vec!["h2.title"]);
    }

    #[test]
    fn test_tag_lowercased_qualifier_kept() {
        let items = rules("DIV .Warn { color: red }");
        let SheetItem::Rule { selectors, .. } = &items[0] else {
            panic!("expected rule");
        };
        assert_eq!(selectors[0], vec!["div", ".Warn"]);
    }

    #[test]
    fn test_multiple_declarations_and_rules() {
        let items = rules("p { color: blue; margin-top: 2pt } div { width: 50% }");
        assert_eq!(items.len(), 2);
        let SheetItem::Rule { declaration, .. } = &items[0] else {
            panic!("expected rule");
        };
        assert!(declaration.is_defined(Property::Color));
        assert!(declaration.is_defined(Property::MarginTop));
    }

    #[test]
    fn test_function_value_reserialized() {
        let items = rules("p { color: rgb(255, 0, 0) }");
        let SheetItem::Rule { declaration, .. } = &items[0] else {
            panic!("expected rule");
        };
        assert_eq!(
            declaration.get(Property::Color).unwrap().to_css_string(),
            "#ff0000"
        );
    }

    #[test]
    fn test_shorthand_in_rule_text() {
        let items = rules("p { font: italic bold 12pt/14pt Arial }");
        let SheetItem::Rule { declaration, .. } = &items[0] else {
            panic!("expected rule");
        };
        assert!(declaration.is_defined(Property::FontStyle));
        assert!(declaration.is_defined(Property::LineHeight));
        assert!(declaration.is_defined(Property::FontFamily));
    }

    #[test]
    fn test_unknown_property_dropped() {
        let items = rules("p { zoom: 2; color: red }");
        let SheetItem::Rule { declaration, .. } = &items[0] else {
            panic!("expected rule");
        };
        assert_eq!(declaration.len(), 1);
        assert!(declaration.is_defined(Property::Color));
    }

    #[test]
    fn test_malformed_declaration_skipped() {
        let items = rules("p { color red; margin-top: 3pt }");
        let SheetItem::Rule { declaration, .. } = &items[0] else {
            panic!("expected rule");
        };
        assert!(!declaration.is_defined(Property::Color));
        assert!(declaration.is_defined(Property::MarginTop));
    }

    #[test]
    fn test_comments_ignored() {
        let items = rules("/* lead */ p { /* in */ color: red; /* out */ }");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_import_directive() {
        let items = rules("@import url(extra.css); p { color: red }");
        assert_eq!(items.len(), 2);
        let SheetItem::Import(url) = &items[0] else {
            panic!("expected import");
        };
        assert_eq!(url, "extra.css");
    }

    #[test]
    fn test_import_resolved_against_base() {
        let base = Url::parse("http://example.com/styles/main.css").unwrap();
        let items = parse_sheet("@import url(extra.css);", Some(&base));
        let SheetItem::Import(url) = &items[0] else {
            panic!("expected import");
        };
        assert_eq!(url, "http://example.com/styles/extra.css");
    }

    #[test]
    fn test_unknown_at_rule_skipped_whole() {
        let items = rules("@media screen { p { color: blue } } div { color: red }");
        assert_eq!(items.len(), 1);
        let SheetItem::Rule { selectors, .. } = &items[0] else {
            panic!("expected rule");
        };
        assert_eq!(selectors[0], vec!["div"]);
    }

    #[test]
    fn test_list_style_image_absolutized() {
        let base = Url::parse("http://example.com/a/sheet.css").unwrap();
        let items = parse_sheet("ul { list-style-image: url(dot.gif) }", Some(&base));
        let SheetItem::Rule { declaration, .. } = &items[0] else {
            panic!("expected rule");
        };
        assert_eq!(
            declaration
                .get(Property::ListStyleImage)
                .unwrap()
                .to_css_string(),
            "url(http://example.com/a/dot.gif)"
        );
    }

    #[test]
    fn test_declaration_block_parsing() {
        let attrs = parse_declaration_block("color: red; font-size: 12pt", None);
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(rules("").is_empty());
        assert!(parse_declaration_block("", None).is_empty());
    }
}
