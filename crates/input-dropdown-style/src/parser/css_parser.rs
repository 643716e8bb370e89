//! CSS syntax parser using the `cssparser` crate.
//!
//! This module contains the parsing logic for selector lists and stylesheets.
//! Selectors are tokenized with whitespace preserved, since whitespace is the
//! descendant combinator; declaration values are kept as source text.

use crate::rules::{Declaration, StyleRule};
use crate::selector::{
    AttributeOperator, AttributeSelector, Combinator, NthExpr, PseudoClass, Selector, SelectorList, SelectorPart,
    TypeSelector,
};
use crate::{Error, Result};
use cssparser::{Delimiter, ParseError as CssParseError, ParseErrorKind, Parser, ParserInput, Token};

type ParseResult<'i, T> = std::result::Result<T, CssParseError<'i, String>>;

/// Parse a comma-separated selector list such as `"#search, form > input"`.
///
/// # Example
///
/// ```
/// use input_dropdown_style::parser::parse_selector_list;
///
/// let list = parse_selector_list(".inpd-dropdown-container-ab12c *").unwrap();
/// assert_eq!(list.to_string(), ".inpd-dropdown-container-ab12c *");
/// ```
pub fn parse_selector_list(selectors: &str) -> Result<SelectorList> {
    let mut input = ParserInput::new(selectors);
    let mut parser = Parser::new(&mut input);
    parser
        .parse_entirely(|p| parse_selector_tokens(p))
        .map_err(|e| Error::invalid_selector(selectors, describe(&e)))
}

/// Parse a CSS stylesheet string into a list of style rules.
///
/// A rule with a selector list produces one [`StyleRule`] per selector, all
/// sharing the same declarations. Rules are ordered by their appearance in
/// the source, with each one assigned an incrementing order value.
///
/// # Error Recovery
///
/// Parse errors in individual rules do not cause the entire parse to fail.
/// The rule is logged via `tracing::warn!` and skipped, and parsing resumes
/// after its block. At-rules are skipped the same way. Invalid declarations
/// are dropped from their rule.
pub fn parse_css(css: &str) -> Result<Vec<StyleRule>> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = vec![];
    let mut order = 0u32;

    loop {
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        let state = parser.state();
        if let Ok(Token::AtKeyword(name)) = parser.next() {
            tracing::warn!(target: "input_dropdown_style::parser", "skipping unsupported at-rule @{}", &**name);
            skip_to_next_rule(&mut parser);
            continue;
        }
        parser.reset(&state);

        match parse_rule(&mut parser, &mut order) {
            Ok(mut parsed) => rules.append(&mut parsed),
            Err(e) => {
                tracing::warn!(target: "input_dropdown_style::parser", "CSS parse error: {}", e);
                skip_to_next_rule(&mut parser);
            }
        }
    }

    Ok(rules)
}

/// Parse a single CSS rule: selectors { declarations }
fn parse_rule<'i>(parser: &mut Parser<'i, '_>, order: &mut u32) -> Result<Vec<StyleRule>> {
    let selectors = parser
        .parse_until_before(Delimiter::CurlyBracketBlock, |p| parse_selector_tokens(p))
        .map_err(|e| to_error(&e))?;

    let location = parser.current_source_location();
    match parser.next() {
        Ok(Token::CurlyBracketBlock) => {}
        _ => {
            return Err(Error::parse(
                "Expected '{' after selector",
                location.line + 1,
                location.column,
            ));
        }
    }

    let declarations = parser
        .parse_nested_block(|p| Ok::<_, CssParseError<'_, String>>(parse_declarations(p)))
        .map_err(|e| to_error(&e))?;

    Ok(selectors
        .0
        .into_iter()
        .map(|selector| {
            let rule = StyleRule::new(selector, declarations.clone(), *order);
            *order += 1;
            rule
        })
        .collect())
}

/// Incremental builder for one complex selector.
#[derive(Default)]
struct SelectorBuilder {
    parts: Vec<SelectorPart>,
    combinators: Vec<Combinator>,
    current: SelectorPart,
    /// Combinator seen after the last finished part.
    pending: Option<Combinator>,
}

impl SelectorBuilder {
    /// Close the current compound selector with a combinator (whitespace is
    /// the descendant combinator).
    fn end_compound(&mut self, combinator: Combinator) -> std::result::Result<(), String> {
        if !self.current.is_empty() {
            self.parts.push(std::mem::take(&mut self.current));
            self.pending = Some(combinator);
            return Ok(());
        }
        if combinator == Combinator::Descendant {
            return Ok(());
        }
        match self.pending {
            None => Err("selector cannot start with a combinator".to_string()),
            Some(Combinator::Descendant) => {
                self.pending = Some(combinator);
                Ok(())
            }
            Some(_) => Err("two combinators in a row".to_string()),
        }
    }

    /// Called before each simple selector is added to the current compound.
    fn begin_simple(&mut self) {
        if self.current.is_empty()
            && !self.parts.is_empty()
            && let Some(combinator) = self.pending.take()
        {
            self.combinators.push(combinator);
        }
    }

    fn finish(mut self) -> std::result::Result<Selector, String> {
        if !self.current.is_empty() {
            self.parts.push(self.current);
        } else if matches!(self.pending, Some(c) if c != Combinator::Descendant) {
            return Err("selector cannot end with a combinator".to_string());
        }
        if self.parts.is_empty() {
            return Err("empty selector".to_string());
        }
        Ok(Selector {
            parts: self.parts,
            combinators: self.combinators,
        })
    }
}

/// Parse a selector list from the parser's remaining input.
fn parse_selector_tokens<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, SelectorList> {
    let mut selectors = vec![];
    let mut builder = SelectorBuilder::default();

    loop {
        let token = match parser.next_including_whitespace() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };

        let step = match token {
            Token::WhiteSpace(_) => builder.end_compound(Combinator::Descendant),
            Token::Delim('>') => builder.end_compound(Combinator::Child),
            Token::Delim('+') => builder.end_compound(Combinator::AdjacentSibling),
            Token::Delim('~') => builder.end_compound(Combinator::GeneralSibling),
            Token::Comma => std::mem::take(&mut builder)
                .finish()
                .map(|selector| selectors.push(selector)),
            other => {
                builder.begin_simple();
                parse_simple(parser, other, &mut builder.current)?;
                Ok(())
            }
        };
        step.map_err(|message| custom_error(parser, message))?;
    }

    let last = builder.finish().map_err(|message| custom_error(parser, message))?;
    selectors.push(last);
    Ok(SelectorList(selectors))
}

/// Add one simple selector (starting at `token`) to a compound selector.
fn parse_simple<'i>(parser: &mut Parser<'i, '_>, token: Token<'i>, part: &mut SelectorPart) -> ParseResult<'i, ()> {
    match token {
        Token::Ident(name) => {
            if !part.is_empty() {
                return fail(parser, format!("type selector '{}' must come first", &*name));
            }
            part.type_selector = Some(TypeSelector::Type(name.to_ascii_lowercase()));
        }

        Token::Delim('*') => {
            if !part.is_empty() {
                return fail(parser, "universal selector must come first");
            }
            part.type_selector = Some(TypeSelector::Universal);
        }

        Token::Delim('.') => match parser.next_including_whitespace()?.clone() {
            Token::Ident(class) => part.classes.push(class.to_string()),
            _ => return fail(parser, "Expected class name after '.'"),
        },

        Token::IDHash(id) => {
            if part.id.is_some() {
                return fail(parser, "compound selector has two ids");
            }
            part.id = Some(id.to_string());
        }

        Token::SquareBracketBlock => {
            let attribute = parser.parse_nested_block(|p| parse_attribute(p))?;
            part.attributes.push(attribute);
        }

        Token::Colon => {
            let pseudo = match parser.next_including_whitespace()?.clone() {
                Token::Ident(name) => match PseudoClass::from_css(&name) {
                    Some(pseudo) => pseudo,
                    None => return fail(parser, format!("Unknown pseudo-class ':{}'", &*name)),
                },
                Token::Function(name) => match name.to_ascii_lowercase().as_str() {
                    "nth-child" => PseudoClass::NthChild(parser.parse_nested_block(|p| parse_nth_expr(p))?),
                    "not" => PseudoClass::Not(Box::new(parser.parse_nested_block(|p| parse_compound(p))?)),
                    _ => return fail(parser, format!("Unknown pseudo-class ':{}()'", &*name)),
                },
                _ => return fail(parser, "Expected pseudo-class name after ':'"),
            };
            part.pseudo_classes.push(pseudo);
        }

        other => return fail(parser, format!("Unexpected token {:?}", other)),
    }
    Ok(())
}

/// Parse the inside of `[...]`: a name, optionally followed by an operator
/// and an identifier or quoted value.
fn parse_attribute<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, AttributeSelector> {
    let name = parser.expect_ident()?.to_string();

    let token = match parser.next() {
        Ok(token) => token.clone(),
        Err(_) => return Ok(AttributeSelector::present(name)),
    };
    let operator = match token {
        Token::Delim('=') => AttributeOperator::Equals,
        Token::IncludeMatch => AttributeOperator::Includes,
        Token::DashMatch => AttributeOperator::DashMatch,
        Token::PrefixMatch => AttributeOperator::Prefix,
        Token::SuffixMatch => AttributeOperator::Suffix,
        Token::SubstringMatch => AttributeOperator::Substring,
        other => return fail(parser, format!("Unexpected token {:?} in attribute selector", other)),
    };

    let value = match parser.next()?.clone() {
        Token::Ident(value) | Token::QuotedString(value) => value.to_string(),
        _ => return fail(parser, format!("Expected a value after '[{}{}'", name, operator)),
    };
    Ok(AttributeSelector::with_value(name, operator, value))
}

/// Parse a compound selector (the argument of `:not()`).
fn parse_compound<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, SelectorPart> {
    let mut part = SelectorPart::default();

    parser.skip_whitespace();

    while let Ok(token) = parser.next_including_whitespace() {
        let token = token.clone();
        if let Token::WhiteSpace(_) = token {
            break;
        }
        parse_simple(parser, token, &mut part)?;
    }

    if part.is_empty() {
        return fail(parser, "Empty :not() argument");
    }
    Ok(part)
}

/// Parse nth-child expression (e.g., "odd", "even", "3", "2n+1", "-n+3").
fn parse_nth_expr<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, NthExpr> {
    let token = parser.next()?.clone();

    let (a, inline_b) = match token {
        Token::Ident(name) => {
            let name = name.to_ascii_lowercase();
            match name.as_str() {
                "odd" => return Ok(NthExpr::odd()),
                "even" => return Ok(NthExpr::even()),
                _ => {}
            }
            let (coefficient, unit) = match name.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, name.as_str()),
            };
            match split_n_unit(unit) {
                Some(b) => (coefficient, b),
                None => return fail(parser, "Invalid nth-child expression"),
            }
        }
        Token::Number {
            int_value: Some(n), ..
        } => return Ok(NthExpr::new(0, n)),
        Token::Dimension {
            int_value: Some(a),
            unit,
            ..
        } => match split_n_unit(&unit.to_ascii_lowercase()) {
            Some(b) => (a, b),
            None => return fail(parser, "Invalid nth-child expression"),
        },
        _ => return fail(parser, "Invalid nth-child expression"),
    };

    let b = match inline_b {
        Some(b) => b,
        None => parser.try_parse(|p| parse_nth_offset(p)).unwrap_or(0),
    };
    Ok(NthExpr::new(a, b))
}

/// Parse the `+B` / `- B` tail of an An+B expression.
fn parse_nth_offset<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, i32> {
    match parser.next()?.clone() {
        Token::Number {
            has_sign: true,
            int_value: Some(b),
            ..
        } => Ok(b),
        Token::Delim(sign @ ('+' | '-')) => match parser.next()?.clone() {
            Token::Number {
                has_sign: false,
                int_value: Some(b),
                ..
            } => Ok(if sign == '-' { -b } else { b }),
            _ => fail(parser, "Expected number after sign"),
        },
        _ => fail(parser, "Expected An+B offset"),
    }
}

/// Split an `n` unit like `"n"` or `"n-3"` into its inline offset.
fn split_n_unit(unit: &str) -> Option<Option<i32>> {
    let rest = unit.strip_prefix('n')?;
    if rest.is_empty() {
        return Some(None);
    }
    let digits = rest.strip_prefix('-')?;
    digits.parse::<i32>().ok().map(|d| Some(-d))
}

/// Parse CSS declarations, dropping invalid ones.
fn parse_declarations(parser: &mut Parser<'_, '_>) -> Vec<Declaration> {
    let mut declarations = vec![];

    loop {
        parser.skip_whitespace();

        if parser.is_exhausted() {
            break;
        }

        match parser.parse_until_after(Delimiter::Semicolon, |p| parse_declaration(p)) {
            Ok(declaration) => declarations.push(declaration),
            Err(e) => {
                tracing::warn!(target: "input_dropdown_style::parser", "Skipping invalid declaration: {}", describe(&e));
            }
        }
    }

    declarations
}

/// Parse `property: value [!important]`, keeping the value as source text.
fn parse_declaration<'i>(parser: &mut Parser<'i, '_>) -> ParseResult<'i, Declaration> {
    let property = parser.expect_ident()?.to_ascii_lowercase();
    parser.expect_colon()?;
    parser.skip_whitespace();

    let start = parser.position();
    while parser.next().is_ok() {}
    let raw = parser.slice_from(start).trim();

    let (value, important) = match raw.strip_suffix("!important") {
        Some(value) => (value.trim_end(), true),
        None => (raw, false),
    };
    if value.is_empty() {
        return fail(parser, format!("Empty value for '{}'", property));
    }

    let declaration = Declaration::new(property, value);
    Ok(if important { declaration.important() } else { declaration })
}

fn custom_error<'i>(parser: &Parser<'i, '_>, message: String) -> CssParseError<'i, String> {
    parser.new_custom_error(message)
}

fn fail<'i, T>(parser: &Parser<'i, '_>, message: impl Into<String>) -> ParseResult<'i, T> {
    Err(custom_error(parser, message.into()))
}

fn describe(error: &CssParseError<'_, String>) -> String {
    match &error.kind {
        ParseErrorKind::Custom(message) => message.clone(),
        ParseErrorKind::Basic(kind) => format!("{:?}", kind),
    }
}

fn to_error(error: &CssParseError<'_, String>) -> Error {
    Error::parse(describe(error), error.location.line + 1, error.location.column)
}

/// Skip to the end of the next block or statement (error recovery).
///
/// Block contents are skipped by the tokenizer once the block token has been
/// returned.
fn skip_to_next_rule(parser: &mut Parser<'_, '_>) {
    loop {
        match parser.next() {
            Ok(Token::CurlyBracketBlock) | Ok(Token::Semicolon) | Err(_) => return,
            _ => {}
        }
    }
}
