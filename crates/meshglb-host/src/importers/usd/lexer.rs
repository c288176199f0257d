//! Tokenizer for USDA text layers.

use meshglb_core::error::AppError;
use meshglb_core::result::AppResult;

/// One lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier or keyword; may contain `:` and `.` (`xformOp:translate`).
    Ident(String),
    /// Quoted string, escapes resolved.
    Str(String),
    /// Numeric literal.
    Number(f64),
    /// `@asset/path@`.
    AssetPath(String),
    /// `</Prim/Path>`.
    PathRef(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Equals,
    Comma,
    Colon,
    Semicolon,
}

/// Tokenize a layer body. The `#usda` header line must already be verified;
/// `#` comments are dropped.
pub fn tokenize(src: &str) -> AppResult<Vec<Token>> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '(' => push(&mut tokens, &mut i, Token::LParen),
            ')' => push(&mut tokens, &mut i, Token::RParen),
            '[' => push(&mut tokens, &mut i, Token::LBracket),
            ']' => push(&mut tokens, &mut i, Token::RBracket),
            '{' => push(&mut tokens, &mut i, Token::LBrace),
            '}' => push(&mut tokens, &mut i, Token::RBrace),
            '=' => push(&mut tokens, &mut i, Token::Equals),
            ',' => push(&mut tokens, &mut i, Token::Comma),
            ':' => push(&mut tokens, &mut i, Token::Colon),
            ';' => push(&mut tokens, &mut i, Token::Semicolon),
            '"' | '\'' => {
                let (s, next) = lex_string(&chars, i)?;
                tokens.push(Token::Str(s));
                i = next;
            }
            '@' => {
                let (s, next) = lex_asset_path(&chars, i)?;
                tokens.push(Token::AssetPath(s));
                i = next;
            }
            '<' => {
                let end = find(&chars, i + 1, '>')
                    .ok_or_else(|| AppError::parse("unterminated prim path reference"))?;
                tokens.push(Token::PathRef(chars[i + 1..end].iter().collect()));
                i = end + 1;
            }
            c if c.is_ascii_digit()
                || ((c == '-' || c == '+' || c == '.')
                    && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit() || *n == '.')) =>
            {
                let start = i;
                i += 1;
                while i < chars.len() {
                    let d = chars[i];
                    let exponent_sign =
                        (d == '-' || d == '+') && matches!(chars[i - 1], 'e' | 'E');
                    if d.is_ascii_digit() || d == '.' || d == 'e' || d == 'E' || exponent_sign {
                        i += 1;
                    } else {
                        break;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse()
                    .map_err(|_| AppError::parse(format!("bad number '{text}'")))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' || c == '-' || c == '!' => {
                // `-inf` and `!invert!xformOp:...` are word-like.
                let start = i;
                i += 1;
                while i < chars.len() {
                    let d = chars[i];
                    if d.is_alphanumeric() || matches!(d, '_' | ':' | '.' | '!') {
                        i += 1;
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            other => {
                return Err(AppError::parse(format!("unexpected character '{other}'")));
            }
        }
    }
    Ok(tokens)
}

fn push(tokens: &mut Vec<Token>, i: &mut usize, token: Token) {
    tokens.push(token);
    *i += 1;
}

fn find(chars: &[char], from: usize, target: char) -> Option<usize> {
    (from..chars.len()).find(|&j| chars[j] == target)
}

fn lex_string(chars: &[char], start: usize) -> AppResult<(String, usize)> {
    let quote = chars[start];
    let triple = chars.get(start + 1) == Some(&quote) && chars.get(start + 2) == Some(&quote);
    let mut i = if triple { start + 3 } else { start + 1 };
    let mut out = String::new();

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            let escaped = chars
                .get(i + 1)
                .ok_or_else(|| AppError::parse("dangling escape in string"))?;
            out.push(match escaped {
                'n' => '\n',
                't' => '\t',
                other => *other,
            });
            i += 2;
            continue;
        }
        if c == quote {
            if !triple {
                return Ok((out, i + 1));
            }
            if chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote) {
                return Ok((out, i + 3));
            }
        }
        if c == '\n' && !triple {
            return Err(AppError::parse("newline in single-line string"));
        }
        out.push(c);
        i += 1;
    }
    Err(AppError::parse("unterminated string"))
}

fn lex_asset_path(chars: &[char], start: usize) -> AppResult<(String, usize)> {
    let triple = chars.get(start + 1) == Some(&'@') && chars.get(start + 2) == Some(&'@');
    if triple {
        let mut i = start + 3;
        while i + 2 < chars.len() {
            if chars[i] == '@' && chars[i + 1] == '@' && chars[i + 2] == '@' {
                return Ok((chars[start + 3..i].iter().collect(), i + 3));
            }
            i += 1;
        }
        return Err(AppError::parse("unterminated asset path"));
    }
    let end = find(chars, start + 1, '@').ok_or_else(|| AppError::parse("unterminated asset path"))?;
    Ok((chars[start + 1..end].iter().collect(), end + 1))
}
