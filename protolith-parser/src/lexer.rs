//! Hand-written tokenizer. Strips `//` and `/* */` comments, scans
//! identifiers/keywords, decimal integer literals, and double- or
//! single-quoted string literals, and tracks line/column as it goes.

use crate::error::ParserError;
use crate::model::Loc;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    IntLiteral(i64),
    StrLiteral(String),
    Semi,
    LBrace,
    RBrace,
    Eq,
    Comma,
    Dot,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocatedToken {
    pub token: Token,
    pub loc: Loc,
}

pub fn tokenize(source: &str) -> Result<Vec<LocatedToken>, (ParserError, Loc)> {
    let chars: Vec<char> = source.chars().collect();
    let mut i = 0usize;
    let mut line = 1u32;
    let mut col = 1u32;
    let mut out = Vec::new();

    macro_rules! advance {
        () => {{
            if chars[i] == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
            i += 1;
        }};
    }

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            advance!();
            continue;
        }

        if c == '/' && i + 1 < chars.len() && chars[i + 1] == '/' {
            while i < chars.len() && chars[i] != '\n' {
                advance!();
            }
            continue;
        }

        if c == '/' && i + 1 < chars.len() && chars[i + 1] == '*' {
            let start_loc = Loc { line, col };
            advance!();
            advance!();
            let mut closed = false;
            while i + 1 < chars.len() {
                if chars[i] == '*' && chars[i + 1] == '/' {
                    advance!();
                    advance!();
                    closed = true;
                    break;
                }
                advance!();
            }
            if !closed {
                return Err((ParserError::UnterminatedBlockComment, start_loc));
            }
            continue;
        }

        let start = Loc { line, col };

        if c == ';' {
            advance!();
            out.push(LocatedToken { token: Token::Semi, loc: start });
            continue;
        }
        if c == '{' {
            advance!();
            out.push(LocatedToken { token: Token::LBrace, loc: start });
            continue;
        }
        if c == '}' {
            advance!();
            out.push(LocatedToken { token: Token::RBrace, loc: start });
            continue;
        }
        if c == '=' {
            advance!();
            out.push(LocatedToken { token: Token::Eq, loc: start });
            continue;
        }
        if c == ',' {
            advance!();
            out.push(LocatedToken { token: Token::Comma, loc: start });
            continue;
        }
        if c == '.' {
            advance!();
            out.push(LocatedToken { token: Token::Dot, loc: start });
            continue;
        }

        if c == '"' || c == '\'' {
            let quote = c;
            advance!();
            let mut s = String::new();
            loop {
                if i >= chars.len() {
                    return Err((ParserError::UnterminatedStringLiteral, start));
                }
                if chars[i] == quote {
                    advance!();
                    break;
                }
                if chars[i] == '\\' && i + 1 < chars.len() {
                    advance!();
                    let escaped = chars[i];
                    s.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                    advance!();
                    continue;
                }
                s.push(chars[i]);
                advance!();
            }
            out.push(LocatedToken { token: Token::StrLiteral(s), loc: start });
            continue;
        }

        if c.is_ascii_digit() {
            let mut s = String::new();
            while i < chars.len() && (chars[i].is_ascii_digit()) {
                s.push(chars[i]);
                advance!();
            }
            let value: i64 = s
                .parse()
                .map_err(|_| (ParserError::InvalidIntegerLiteral(s.clone()), start))?;
            out.push(LocatedToken { token: Token::IntLiteral(value), loc: start });
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let mut s = String::new();
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                s.push(chars[i]);
                advance!();
            }
            out.push(LocatedToken { token: Token::Ident(s), loc: start });
            continue;
        }

        return Err((ParserError::UnexpectedCharacter(c), start));
    }

    out.push(LocatedToken {
        token: Token::Eof,
        loc: Loc { line, col },
    });
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn strips_line_and_block_comments() {
        let toks = tokens("// comment\nmessage /* inline */ M {}");
        assert_eq!(
            toks,
            vec![
                Token::Ident("message".into()),
                Token::Ident("M".into()),
                Token::LBrace,
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn scans_field_line() {
        let toks = tokens("repeated int32 xs = 1;");
        assert_eq!(
            toks,
            vec![
                Token::Ident("repeated".into()),
                Token::Ident("int32".into()),
                Token::Ident("xs".into()),
                Token::Eq,
                Token::IntLiteral(1),
                Token::Semi,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn scans_string_literal_with_escape() {
        let toks = tokens(r#""old\n""#);
        assert_eq!(toks, vec![Token::StrLiteral("old\n".into()), Token::Eof]);
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        assert!(tokenize("/* never closed").is_err());
    }
}
