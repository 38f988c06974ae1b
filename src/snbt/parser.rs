//! Recursive-descent parser for SNBT literals.

use crate::error::{Error, Result};
use crate::snbt::tokenizer::{tokenize, Token, TokenKind};
use crate::{Compound, List, NbtString, Value};

/// Parse a complete SNBT literal, rejecting trailing input.
///
/// Numbers that do not fit their type fall back to strings rather than
/// failing the parse:
///
/// ```
/// use nbtkit::{snbt, Value};
///
/// assert_eq!(snbt::from_str("2147483647").unwrap(), Value::Int(2147483647));
/// assert_eq!(
///     snbt::from_str("2147483648").unwrap(),
///     Value::String("2147483648".into()),
/// );
/// ```
pub fn from_str(input: &str) -> Result<Value> {
    let mut parser = Parser::new(input)?;
    let value = parser.parse()?;

    let cursor = parser.span.1;
    let leftover = &input[cursor..];
    if !leftover.trim().is_empty() {
        return Err(Error::InvalidLiteral {
            span: (cursor, cursor + leftover.len()),
            message: format!("Expected end of string but got {:?}", leftover),
        });
    }
    Ok(value)
}

/// SNBT literal parser with one token of lookahead.
///
/// [`Parser::parse`] consumes the tokens of one value and leaves the
/// parser positioned on the value's last token; calling [`Parser::next`]
/// then moves to the following token. The path engine drives the parser
/// this way to read a sequence of adjacent values out of one string.
pub struct Parser<'a> {
    tokens: Box<dyn Iterator<Item = Token<'a>> + 'a>,
    pub(crate) current: Token<'a>,
    pub(crate) span: (usize, usize),
}

impl<'a> Parser<'a> {
    /// Create a parser positioned on the first token. Fails on input
    /// with no tokens at all.
    pub fn new(input: &'a str) -> Result<Parser<'a>> {
        let mut tokens: Box<dyn Iterator<Item = Token<'a>> + 'a> = Box::new(tokenize(input));
        let current = tokens.next().ok_or(Error::InvalidLiteral {
            span: (0, 0),
            message: "Unexpected end of input".to_owned(),
        })?;
        let span = current.span;
        Ok(Parser {
            tokens,
            current,
            span,
        })
    }

    /// Create an [`Error::InvalidLiteral`] at the current token.
    pub(crate) fn error(&self, message: impl Into<String>) -> Error {
        Error::InvalidLiteral {
            span: self.span,
            message: message.into(),
        }
    }

    /// Move to the next token in the token stream.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        match self.tokens.next() {
            Some(token) => {
                self.current = token;
                self.span = token.span;
                Ok(())
            }
            None => {
                self.span = (self.span.1, self.span.1);
                Err(self.error("Unexpected end of input"))
            }
        }
    }

    /// Parse and return one nbt literal from the token stream.
    pub fn parse(&mut self) -> Result<Value> {
        match self.current.kind {
            TokenKind::QuotedString => {
                let text = self.unquote_string(self.current.value)?;
                Ok(Value::String(NbtString::Text(text)))
            }
            TokenKind::Number => Ok(self.parse_number()),
            TokenKind::String => Ok(self.parse_string()),
            TokenKind::Compound => self.parse_compound(),
            TokenKind::ByteArray => self.parse_byte_array(),
            TokenKind::IntArray => self.parse_int_array(),
            TokenKind::LongArray => self.parse_long_array(),
            TokenKind::List => self.parse_list(),
            TokenKind::Invalid => Err(self.error(format!(
                "Invalid token {:?}",
                self.current.value
            ))),
            _ => Err(self.error(format!("Invalid literal {:?}", self.current.value))),
        }
    }

    /// Numbers dispatch on their suffix; an unsuffixed literal is a
    /// Double when it has a decimal point and an Int otherwise. Anything
    /// that overflows or fails to parse falls back to a String of the
    /// raw text.
    fn parse_number(&self) -> Value {
        let text = self.current.value;
        let suffix = text
            .chars()
            .next_back()
            .map(|c| c.to_ascii_lowercase())
            .unwrap_or_default();
        let body = &text[..text.len().saturating_sub(1)];

        let number = match suffix {
            'b' => body.parse::<i8>().ok().map(Value::Byte),
            's' => body.parse::<i16>().ok().map(Value::Short),
            'l' => body.parse::<i64>().ok().map(Value::Long),
            'f' => body.parse::<f32>().ok().map(Value::Float),
            'd' => body.parse::<f64>().ok().map(Value::Double),
            _ if text.contains('.') => text.parse::<f64>().ok().map(Value::Double),
            _ => text.parse::<i32>().ok().map(Value::Int),
        };
        number.unwrap_or_else(|| Value::String(NbtString::Text(text.to_owned())))
    }

    fn parse_string(&self) -> Value {
        match self.current.value.to_ascii_lowercase().as_str() {
            "true" => Value::Byte(1),
            "false" => Value::Byte(0),
            _ => Value::String(NbtString::Text(self.current.value.to_owned())),
        }
    }

    /// Drive `parse_item` over the comma-separated items of a collection
    /// until the closing token.
    fn collect_until(
        &mut self,
        close: TokenKind,
        mut parse_item: impl FnMut(&mut Self) -> Result<()>,
    ) -> Result<()> {
        self.next()?;
        if self.current.kind == close {
            return Ok(());
        }

        loop {
            parse_item(self)?;

            self.next()?;
            if self.current.kind == close {
                return Ok(());
            }
            if self.current.kind != TokenKind::Comma {
                return Err(self.error(format!(
                    "Expected comma but got {:?}",
                    self.current.value
                )));
            }
            self.next()?;
        }
    }

    fn parse_compound(&mut self) -> Result<Value> {
        let mut compound = Compound::new();

        self.collect_until(TokenKind::CloseCompound, |parser| {
            let token = parser.current;
            let key = match token.kind {
                TokenKind::QuotedString => parser.unquote_string(token.value)?,
                // A bare numeric key keeps its literal text, suffix
                // included.
                TokenKind::Number | TokenKind::String => token.value.to_owned(),
                _ => {
                    return Err(
                        parser.error(format!("Expected compound key but got {:?}", token.value))
                    )
                }
            };

            parser.next()?;
            if parser.current.kind != TokenKind::Colon {
                return Err(parser.error(format!(
                    "Expected colon but got {:?}",
                    parser.current.value
                )));
            }

            parser.next()?;
            let value = parser.parse()?;
            compound.insert(key, value);
            Ok(())
        })?;

        Ok(Value::Compound(compound))
    }

    fn parse_byte_array(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        self.collect_until(TokenKind::CloseBracket, |parser| {
            items.push(parser.array_item("byte", "b")? as i8);
            Ok(())
        })?;
        Ok(Value::ByteArray(items))
    }

    fn parse_int_array(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        self.collect_until(TokenKind::CloseBracket, |parser| {
            items.push(parser.array_item("int", "")? as i32);
            Ok(())
        })?;
        Ok(Value::IntArray(items))
    }

    fn parse_long_array(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        self.collect_until(TokenKind::CloseBracket, |parser| {
            items.push(parser.array_item("long", "l")?);
            Ok(())
        })?;
        Ok(Value::LongArray(items))
    }

    /// One array element: a numeric token whose suffix matches the
    /// array's element width, yielded as a machine integer.
    fn array_item(&self, type_name: &str, suffix: &str) -> Result<i64> {
        let token = self.current;
        let invalid =
            || self.error(format!("Invalid {} array element {:?}", type_name, token.value));

        let value = token.value.to_ascii_lowercase();
        if token.kind != TokenKind::Number || !value.ends_with(suffix) {
            return Err(invalid());
        }

        let digits = value.strip_suffix(suffix).unwrap_or(&value);
        let number: i64 = digits.parse().map_err(|_| invalid())?;

        let in_range = match type_name {
            "byte" => i8::try_from(number).is_ok(),
            "int" => i32::try_from(number).is_ok(),
            _ => true,
        };
        if !in_range {
            return Err(invalid());
        }
        Ok(number)
    }

    fn parse_list(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        self.collect_until(TokenKind::CloseBracket, |parser| {
            items.push(parser.parse()?);
            Ok(())
        })?;

        match List::from_items(items) {
            Ok(list) => Ok(Value::List(list)),
            Err(Error::IncompatibleItemType { item, subtype }) => Err(self.error(format!(
                "Item {:?} is not a {} tag",
                item.to_string(),
                subtype
            ))),
            Err(other) => Err(other),
        }
    }

    /// Return the unquoted value of a quoted string. Only a backslash
    /// and the string's own quote character may be escaped; the other
    /// quote's escape is illegal inside this string.
    pub(crate) fn unquote_string(&self, quoted: &str) -> Result<String> {
        let quote = quoted.chars().next().unwrap_or('"');
        let body = &quoted[quote.len_utf8()..quoted.len() - quote.len_utf8()];

        let mut result = String::with_capacity(body.len());
        let mut chars = body.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                result.push(c);
                continue;
            }
            match chars.next() {
                Some(escaped) if escaped == '\\' || escaped == quote => result.push(escaped),
                Some(escaped) => {
                    return Err(self.error(format!("Invalid escape sequence \"\\{}\"", escaped)))
                }
                None => return Err(self.error("Invalid escape sequence \"\\\"")),
            }
        }
        Ok(result)
    }
}
