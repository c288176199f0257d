//! Recursive-descent parser turning USDA tokens into a layer tree.
//!
//! Only the structure needed to read geometry is kept: layer metadata,
//! prims with their specifier, type, metadata, properties and children.
//! Variant sets are skipped.

use tracing::debug;

use meshglb_core::error::AppError;
use meshglb_core::result::AppResult;

use super::lexer::Token;

/// A parsed attribute, metadata or dictionary value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
    Ident(String),
    AssetPath(String),
    PathRef(String),
    Tuple(Vec<Value>),
    Array(Vec<Value>),
    Dict(Vec<(String, Value)>),
}

impl Value {
    /// Numeric value, also accepting `inf`/`nan` identifiers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Ident(s) => match s.as_str() {
                "inf" => Some(f64::INFINITY),
                "-inf" => Some(f64::NEG_INFINITY),
                "nan" => Some(f64::NAN),
                _ => None,
            },
            _ => None,
        }
    }

    /// String or token value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Ident(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of an array value.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Components of a tuple value as floats.
    pub fn as_tuple_f64(&self) -> Option<Vec<f64>> {
        match self {
            Self::Tuple(items) => items.iter().map(Value::as_f64).collect(),
            _ => None,
        }
    }
}

/// `def`, `over` or `class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specifier {
    Def,
    Over,
    Class,
}

/// One attribute or relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Full property name, e.g. `primvars:st` or `points.timeSamples`.
    pub name: String,
    /// Value type name (`point3f[]`); `None` for relationships.
    pub type_name: Option<String>,
    /// Authored default value, if any.
    pub value: Option<Value>,
    /// Property metadata such as `interpolation`.
    pub metadata: Vec<(String, Value)>,
}

impl Property {
    /// Look up a metadata entry.
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// A prim and its namespace children.
#[derive(Debug, Clone, PartialEq)]
pub struct Prim {
    pub specifier: Specifier,
    pub type_name: Option<String>,
    pub name: String,
    pub metadata: Vec<(String, Value)>,
    pub properties: Vec<Property>,
    pub children: Vec<Prim>,
}

impl Prim {
    /// Look up a property by full name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Resolved value of an attribute: its default, or the earliest time
    /// sample when only `.timeSamples` were authored.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.property(name).and_then(|p| p.value.as_ref()) {
            return Some(value);
        }
        let samples = self.property(&format!("{name}.timeSamples"))?.value.as_ref()?;
        match samples {
            Value::Dict(entries) => entries
                .iter()
                .filter_map(|(t, v)| t.parse::<f64>().ok().map(|t| (t, v)))
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map(|(_, v)| v),
            _ => None,
        }
    }
}

/// A parsed layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    pub metadata: Vec<(String, Value)>,
    pub prims: Vec<Prim>,
}

impl Layer {
    /// Look up a layer metadata entry.
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

const LIST_OPS: [&str; 5] = ["prepend", "append", "add", "delete", "reorder"];
const VARIABILITY: [&str; 4] = ["custom", "uniform", "varying", "config"];

/// Parser over a token vector.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse a complete layer.
    pub fn parse_layer(mut self) -> AppResult<Layer> {
        let mut layer = Layer::default();
        if self.peek() == Some(&Token::LParen) {
            layer.metadata = self.parse_metadata()?;
        }
        while self.peek().is_some() {
            layer.prims.push(self.parse_prim()?);
        }
        Ok(layer)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn next(&mut self) -> AppResult<Token> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| AppError::parse("unexpected end of USD layer"))?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: Token) -> AppResult<()> {
        let token = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(AppError::parse(format!("expected {expected:?}, found {token:?}")))
        }
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> AppResult<String> {
        match self.next()? {
            Token::Ident(s) => Ok(s),
            other => Err(AppError::parse(format!("expected identifier, found {other:?}"))),
        }
    }

    fn is_ident(&self, word: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(s)) if s == word)
    }

    fn parse_prim(&mut self) -> AppResult<Prim> {
        let specifier = match self.ident()?.as_str() {
            "def" => Specifier::Def,
            "over" => Specifier::Over,
            "class" => Specifier::Class,
            other => return Err(AppError::parse(format!("expected prim specifier, found '{other}'"))),
        };

        let type_name = match self.peek() {
            Some(Token::Ident(_)) => Some(self.ident()?),
            _ => None,
        };
        let name = match self.next()? {
            Token::Str(s) => s,
            other => return Err(AppError::parse(format!("expected prim name, found {other:?}"))),
        };

        let metadata = if self.peek() == Some(&Token::LParen) {
            self.parse_metadata()?
        } else {
            Vec::new()
        };

        let mut prim = Prim {
            specifier,
            type_name,
            name,
            metadata,
            properties: Vec::new(),
            children: Vec::new(),
        };

        self.expect(Token::LBrace)?;
        while !self.eat(&Token::RBrace) {
            if self.is_ident("def") || self.is_ident("over") || self.is_ident("class") {
                prim.children.push(self.parse_prim()?);
            } else if self.is_ident("variantSet") {
                self.skip_variant_set()?;
            } else {
                prim.properties.push(self.parse_property()?);
            }
            self.eat(&Token::Semicolon);
        }
        Ok(prim)
    }

    fn skip_variant_set(&mut self) -> AppResult<()> {
        self.next()?;
        let name = self.next()?;
        debug!(variant_set = ?name, "Skipping USD variant set");
        self.expect(Token::Equals)?;
        self.skip_balanced(Token::LBrace, Token::RBrace)
    }

    fn skip_balanced(&mut self, open: Token, close: Token) -> AppResult<()> {
        self.expect(open.clone())?;
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.next()?;
            if token == open {
                depth += 1;
            } else if token == close {
                depth -= 1;
            }
        }
        Ok(())
    }

    fn parse_property(&mut self) -> AppResult<Property> {
        while matches!(self.peek(), Some(Token::Ident(s)) if LIST_OPS.contains(&s.as_str()) || VARIABILITY.contains(&s.as_str()))
        {
            self.pos += 1;
        }

        let type_name = if self.is_ident("rel") {
            self.pos += 1;
            None
        } else {
            let mut ty = self.ident()?;
            if self.peek() == Some(&Token::LBracket) && self.peek_at(1) == Some(&Token::RBracket) {
                self.pos += 2;
                ty.push_str("[]");
            }
            Some(ty)
        };

        let name = self.ident()?;
        let value = if self.eat(&Token::Equals) {
            Some(self.parse_value()?)
        } else {
            None
        };
        let metadata = if self.peek() == Some(&Token::LParen) {
            self.parse_metadata()?
        } else {
            Vec::new()
        };

        Ok(Property {
            name,
            type_name,
            value,
            metadata,
        })
    }

    /// `( key = value ... )`. Bare strings are documentation and dropped.
    fn parse_metadata(&mut self) -> AppResult<Vec<(String, Value)>> {
        self.expect(Token::LParen)?;
        let mut entries = Vec::new();
        while !self.eat(&Token::RParen) {
            match self.peek() {
                Some(Token::Str(_)) => {
                    self.pos += 1;
                }
                Some(Token::Semicolon) => {
                    self.pos += 1;
                }
                _ => {
                    let mut key = self.ident()?;
                    if LIST_OPS.contains(&key.as_str()) {
                        key = self.ident()?;
                    }
                    // `dictionary customData = {...}` carries a type first.
                    if matches!(self.peek(), Some(Token::Ident(_))) {
                        key = self.ident()?;
                    }
                    self.expect(Token::Equals)?;
                    let value = self.parse_value()?;
                    entries.push((key, value));
                }
            }
        }
        Ok(entries)
    }

    fn parse_value(&mut self) -> AppResult<Value> {
        let value = match self.next()? {
            Token::Number(n) => Value::Number(n),
            Token::Str(s) => Value::Str(s),
            Token::Ident(s) => Value::Ident(s),
            Token::PathRef(p) => Value::PathRef(p),
            Token::AssetPath(a) => {
                // `@file.usda@</Prim>` references carry a target prim.
                if let Some(Token::PathRef(_)) = self.peek() {
                    self.pos += 1;
                }
                Value::AssetPath(a)
            }
            Token::LParen => Value::Tuple(self.parse_sequence(Token::RParen)?),
            Token::LBracket => Value::Array(self.parse_sequence(Token::RBracket)?),
            Token::LBrace => Value::Dict(self.parse_dict()?),
            other => return Err(AppError::parse(format!("unexpected token {other:?} in value"))),
        };
        Ok(value)
    }

    fn parse_sequence(&mut self, close: Token) -> AppResult<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            if self.eat(&close) {
                return Ok(items);
            }
            items.push(self.parse_value()?);
            if !self.eat(&Token::Comma) {
                self.expect(close)?;
                return Ok(items);
            }
        }
    }

    /// Time-sample maps (`{ 0: (..), 24: (..) }`) and typed dictionaries
    /// (`{ string key = "v" }`).
    fn parse_dict(&mut self) -> AppResult<Vec<(String, Value)>> {
        let mut entries = Vec::new();
        loop {
            if self.eat(&Token::RBrace) {
                return Ok(entries);
            }
            let mut key = None;
            loop {
                match self.next()? {
                    Token::Colon | Token::Equals => break,
                    Token::Number(n) => key = Some(n.to_string()),
                    Token::Str(s) | Token::Ident(s) => key = Some(s),
                    other => {
                        return Err(AppError::parse(format!(
                            "unexpected token {other:?} in dictionary key"
                        )));
                    }
                }
            }
            let key = key.ok_or_else(|| AppError::parse("dictionary entry without key"))?;
            let value = self.parse_value()?;
            entries.push((key, value));
            if !self.eat(&Token::Comma) {
                self.eat(&Token::Semicolon);
            }
        }
    }
}
