use thiserror::Error;

use super::{ENUM_MARKER, EnumDesc, ScalarKind, TypeDesc};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid type descriptor '{input}' at offset {position}: {message}")]
pub struct TypeParseError {
    pub input: String,
    pub position: usize,
    pub message: String,
}

pub(super) fn parse(input: &str) -> Result<TypeDesc, TypeParseError> {
    let mut parser = Parser { input, position: 0 };
    let desc = parser.desc()?;
    parser.skip_whitespace();
    if parser.position != input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(desc)
}

struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    fn desc(&mut self) -> Result<TypeDesc, TypeParseError> {
        self.skip_whitespace();
        let ident = self.ident()?;

        match ident {
            "void" => Ok(TypeDesc::Void),
            "any" => Ok(TypeDesc::Any),
            "list" => {
                self.expect('<')?;
                let elem = self.desc()?;
                self.expect('>')?;
                Ok(TypeDesc::list(elem))
            }
            "map" => {
                self.expect('<')?;
                let key = self.desc()?;
                self.expect(',')?;
                let value = self.desc()?;
                self.expect('>')?;
                Ok(TypeDesc::map(key, value))
            }
            ENUM_MARKER if self.peek_ident_after_whitespace() => {
                self.skip_whitespace();
                let name = self.ident()?.to_string();
                self.expect('{')?;
                let mut variants = Vec::new();
                if !self.eat('}') {
                    loop {
                        self.skip_whitespace();
                        variants.push(self.ident()?.to_string());
                        if self.eat('}') {
                            break;
                        }
                        self.expect('|')?;
                    }
                }
                Ok(TypeDesc::Enum(EnumDesc::new(name, variants)))
            }
            other => {
                if let Some(kind) = ScalarKind::from_name(other) {
                    return Ok(TypeDesc::Scalar(kind));
                }
                let name = other.to_string();
                let mut params = Vec::new();
                if self.eat('<') {
                    loop {
                        params.push(self.desc()?);
                        if self.eat('>') {
                            break;
                        }
                        self.expect(',')?;
                    }
                }
                Ok(TypeDesc::named_with(name, params))
            }
        }
    }

    fn ident(&mut self) -> Result<&'a str, TypeParseError> {
        let input = self.input;
        let start = self.position;
        let rest = &input[start..];
        let len = rest
            .char_indices()
            .find(|(_, c)| !is_ident_char(*c))
            .map(|(index, _)| index)
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected an identifier"));
        }
        self.position += len;
        Ok(&input[start..start + len])
    }

    fn peek_ident_after_whitespace(&self) -> bool {
        let rest = &self.input[self.position..];
        let trimmed = rest.trim_start();
        trimmed.len() < rest.len() && trimmed.chars().next().is_some_and(is_ident_char)
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.input[self.position..].starts_with(expected) {
            self.position += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), TypeParseError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", expected)))
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.position..];
        self.position += rest.len() - rest.trim_start().len();
    }

    fn error(&self, message: &str) -> TypeParseError {
        TypeParseError {
            input: self.input.to_string(),
            position: self.position,
            message: message.to_string(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}
