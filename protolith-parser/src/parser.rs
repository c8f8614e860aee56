//! Recursive-descent parser: `Vec<LocatedToken>` in, [`ProtoDef`] out.

use crate::error::{ParserError, ParserErrorWithLocation};
use crate::lexer::{tokenize, LocatedToken, Token};
use crate::model::*;

const MAX_FIELD_NUMBER: i64 = (1 << 29) - 1;
const RESERVED_RANGE_START: i64 = 19000;
const RESERVED_RANGE_END: i64 = 19999;

/// Constructs the unsupported by name, in case a user wrote a proto2 or
/// service construct that this compiler deliberately does not implement.
const UNSUPPORTED_TOP_LEVEL: &[&str] = &["service", "extend", "extensions", "option", "import"];
const UNSUPPORTED_FIELD_PREFIX: &[&str] = &["optional", "required", "map"];

pub struct Parser {
    tokens: Vec<LocatedToken>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<LocatedToken>) -> Parser {
        Parser { tokens, pos: 0 }
    }

    fn current(&self) -> &LocatedToken {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn loc(&self) -> Loc {
        self.current().loc
    }

    fn advance(&mut self) -> LocatedToken {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, error: ParserError) -> ParserErrorWithLocation {
        ParserErrorWithLocation::new(error, self.loc())
    }

    fn peek_ident(&self) -> Option<&str> {
        match &self.current().token {
            Token::Ident(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<(), ParserErrorWithLocation> {
        match &self.current().token {
            Token::Ident(s) if s == expected => {
                self.advance();
                Ok(())
            }
            other => Err(self.err(ParserError::UnexpectedToken {
                expected: format!("`{}`", expected),
                found: describe(other),
            })),
        }
    }

    fn expect_any_ident(&mut self) -> Result<String, ParserErrorWithLocation> {
        match self.current().token.clone() {
            Token::Ident(s) => {
                self.advance();
                Ok(s)
            }
            other => Err(self.err(ParserError::UnexpectedToken {
                expected: "identifier".to_owned(),
                found: describe(&other),
            })),
        }
    }

    fn expect_token(&mut self, expected: Token) -> Result<(), ParserErrorWithLocation> {
        if self.current().token == expected {
            self.advance();
            Ok(())
        } else {
            let found = describe(&self.current().token);
            Err(self.err(ParserError::UnexpectedToken {
                expected: describe(&expected),
                found,
            }))
        }
    }

    fn expect_int(&mut self) -> Result<i64, ParserErrorWithLocation> {
        match self.current().token.clone() {
            Token::IntLiteral(n) => {
                self.advance();
                Ok(n)
            }
            other => Err(self.err(ParserError::UnexpectedToken {
                expected: "integer literal".to_owned(),
                found: describe(&other),
            })),
        }
    }

    fn expect_str(&mut self) -> Result<String, ParserErrorWithLocation> {
        match self.current().token.clone() {
            Token::StrLiteral(s) => {
                self.advance();
                Ok(s)
            }
            other => Err(self.err(ParserError::UnexpectedToken {
                expected: "string literal".to_owned(),
                found: describe(&other),
            })),
        }
    }

    /// `syntax = "proto3";`
    fn parse_syntax(&mut self) -> Result<(), ParserErrorWithLocation> {
        if self.peek_ident() != Some("syntax") {
            return Err(self.err(ParserError::MissingSyntaxDeclaration));
        }
        self.advance();
        self.expect_token(Token::Eq)?;
        let value = self.expect_str()?;
        self.expect_token(Token::Semi)?;
        if value != "proto3" {
            return Err(self.err(ParserError::UnknownSyntax(value)));
        }
        Ok(())
    }

    /// `a.b.c`
    fn parse_dotted_name(&mut self) -> Result<String, ParserErrorWithLocation> {
        let mut name = self.expect_any_ident()?;
        while self.current().token == Token::Dot {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_any_ident()?);
        }
        Ok(name)
    }

    fn parse_package(&mut self) -> Result<Option<String>, ParserErrorWithLocation> {
        if self.peek_ident() != Some("package") {
            return Ok(None);
        }
        self.advance();
        let name = self.parse_dotted_name()?;
        self.expect_token(Token::Semi)?;
        Ok(Some(name))
    }

    fn check_unsupported_keyword(&self, ident: &str) -> Option<ParserErrorWithLocation> {
        if UNSUPPORTED_TOP_LEVEL.contains(&ident) || UNSUPPORTED_FIELD_PREFIX.contains(&ident) {
            Some(self.err(ParserError::UnsupportedConstruct(ident.to_owned())))
        } else {
            None
        }
    }

    fn parse_type_name(&mut self) -> Result<ProtoType, ParserErrorWithLocation> {
        if self.current().token == Token::Dot {
            self.advance();
            let name = self.parse_dotted_name()?;
            return Ok(ProtoType::Named(format!(".{}", name)));
        }
        let ident = self.expect_any_ident()?;
        if let Some(scalar) = ScalarType::from_keyword(&ident) {
            return Ok(ProtoType::Scalar(scalar));
        }
        if ident == "map" {
            return Err(self.err(ParserError::UnsupportedConstruct("map".to_owned())));
        }
        let mut name = ident;
        while self.current().token == Token::Dot {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_any_ident()?);
        }
        Ok(ProtoType::Named(name))
    }

    fn validate_field_number(&self, n: i64) -> Result<i32, ParserErrorWithLocation> {
        if n < 1 || n > MAX_FIELD_NUMBER || (n >= RESERVED_RANGE_START && n <= RESERVED_RANGE_END) {
            return Err(self.err(ParserError::InvalidFieldNumber(n)));
        }
        Ok(n as i32)
    }

    /// `[repeated] <type> <name> = <number>;` The `repeated` keyword must
    /// already have been consumed by the caller when `allow_repeated` is
    /// false (used for oneof members, which proto3 forbids from repeating).
    fn parse_field(&mut self, allow_repeated: bool) -> Result<(Field, Loc), ParserErrorWithLocation> {
        let start_loc = self.loc();
        let mut repeated = false;
        if self.peek_ident() == Some("repeated") {
            if !allow_repeated {
                return Err(self.err(ParserError::UnsupportedConstruct(
                    "repeated field inside oneof".to_owned(),
                )));
            }
            self.advance();
            repeated = true;
        }
        if let Some(ident) = self.peek_ident() {
            if let Some(e) = self.check_unsupported_keyword(ident) {
                return Err(e);
            }
        }
        let proto_type = self.parse_type_name()?;
        let name = self.expect_any_ident()?;
        self.expect_token(Token::Eq)?;
        let number_raw = self.expect_int()?;
        let number = self.validate_field_number(number_raw)?;
        self.expect_token(Token::Semi)?;
        Ok((
            Field {
                name,
                proto_type,
                number,
                repeated,
            },
            start_loc,
        ))
    }

    fn parse_oneof(&mut self) -> Result<Oneof, ParserErrorWithLocation> {
        self.advance(); // 'oneof'
        let name = self.expect_any_ident()?;
        self.expect_token(Token::LBrace)?;
        let mut fields = Vec::new();
        while self.current().token != Token::RBrace {
            let (field, loc) = self.parse_field(false)?;
            fields.push(WithLoc::new(field, loc));
        }
        self.expect_token(Token::RBrace)?;
        Ok(Oneof { name, fields })
    }

    fn parse_reserved_item(&mut self) -> Result<Reserved, ParserErrorWithLocation> {
        if let Token::StrLiteral(_) = self.current().token {
            return Ok(Reserved::Name(self.expect_str()?));
        }
        let from = self.expect_int()?;
        if self.peek_ident() == Some("to") {
            self.advance();
            let to = self.expect_int()?;
            if to < from {
                return Err(self.err(ParserError::InvalidReservedRange(from, to)));
            }
            return Ok(Reserved::Range(from as i32, to as i32));
        }
        Ok(Reserved::Number(from as i32))
    }

    fn parse_reserved(&mut self) -> Result<Vec<Reserved>, ParserErrorWithLocation> {
        self.advance(); // 'reserved'
        let mut items = vec![self.parse_reserved_item()?];
        while self.current().token == Token::Comma {
            self.advance();
            items.push(self.parse_reserved_item()?);
        }
        self.expect_token(Token::Semi)?;
        Ok(items)
    }

    fn parse_enum(&mut self) -> Result<Enum, ParserErrorWithLocation> {
        self.advance(); // 'enum'
        let name = self.expect_any_ident()?;
        self.expect_token(Token::LBrace)?;
        let mut values = Vec::new();
        while self.current().token != Token::RBrace {
            let value_name = self.expect_any_ident()?;
            self.expect_token(Token::Eq)?;
            let number = self.expect_int()?;
            self.expect_token(Token::Semi)?;
            values.push(EnumVal {
                name: value_name,
                number: number as i32,
            });
        }
        self.expect_token(Token::RBrace)?;
        let en = Enum { name, values };
        if en.value_for_zero().is_none() {
            return Err(self.err(ParserError::MissingEnumZeroValue(en.name.clone())));
        }
        Ok(en)
    }

    fn parse_message(&mut self) -> Result<Message, ParserErrorWithLocation> {
        self.advance(); // 'message'
        let name = self.expect_any_ident()?;
        self.expect_token(Token::LBrace)?;
        let mut message = Message {
            name,
            ..Message::default()
        };
        while self.current().token != Token::RBrace {
            match self.peek_ident() {
                Some("message") => {
                    let loc = self.loc();
                    let nested = self.parse_message()?;
                    message.messages.push(WithLoc::new(nested, loc));
                }
                Some("enum") => {
                    let loc = self.loc();
                    let nested = self.parse_enum()?;
                    message.enums.push(WithLoc::new(nested, loc));
                }
                Some("oneof") => {
                    let loc = self.loc();
                    let oneof = self.parse_oneof()?;
                    message
                        .fields
                        .push(WithLoc::new(FieldOrOneof::Oneof(oneof), loc));
                }
                Some("reserved") => {
                    let mut items = self.parse_reserved()?;
                    message.reserved.append(&mut items);
                }
                Some(ident) if self.check_unsupported_keyword(ident).is_some() => {
                    return Err(self.check_unsupported_keyword(ident).unwrap());
                }
                _ => {
                    let (field, loc) = self.parse_field(true)?;
                    message
                        .fields
                        .push(WithLoc::new(FieldOrOneof::Field(field), loc));
                }
            }
        }
        self.expect_token(Token::RBrace)?;
        Ok(message)
    }

    pub fn parse_proto_def(&mut self) -> Result<ProtoDef, ParserErrorWithLocation> {
        self.parse_syntax()?;
        let package_name = self.parse_package()?.unwrap_or_default();
        let mut package = Package {
            name: package_name,
            ..Package::default()
        };
        loop {
            match self.peek_ident() {
                Some("message") => {
                    let loc = self.loc();
                    let msg = self.parse_message()?;
                    package.messages.push(WithLoc::new(msg, loc));
                }
                Some("enum") => {
                    let loc = self.loc();
                    let en = self.parse_enum()?;
                    package.enums.push(WithLoc::new(en, loc));
                }
                Some("package") => return Err(self.err(ParserError::DuplicatePackage)),
                Some(ident) if self.check_unsupported_keyword(ident).is_some() => {
                    return Err(self.check_unsupported_keyword(ident).unwrap());
                }
                None if self.current().token == Token::Eof => break,
                _ => {
                    let found = describe(&self.current().token);
                    return Err(self.err(ParserError::UnexpectedToken {
                        expected: "`message` or `enum`".to_owned(),
                        found,
                    }));
                }
            }
        }
        Ok(ProtoDef {
            packages: vec![package],
        })
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(s) => format!("identifier `{}`", s),
        Token::IntLiteral(n) => format!("integer `{}`", n),
        Token::StrLiteral(s) => format!("string \"{}\"", s),
        Token::Semi => "`;`".to_owned(),
        Token::LBrace => "`{`".to_owned(),
        Token::RBrace => "`}`".to_owned(),
        Token::Eq => "`=`".to_owned(),
        Token::Comma => "`,`".to_owned(),
        Token::Dot => "`.`".to_owned(),
        Token::Eof => "end of file".to_owned(),
    }
}

/// Parse a complete `.proto` source string into a [`ProtoDef`].
pub fn parse(source: &str) -> Result<ProtoDef, ParserErrorWithLocation> {
    let tokens = tokenize(source).map_err(|(error, loc)| ParserErrorWithLocation::new(error, loc))?;
    Parser::new(tokens).parse_proto_def()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_simple_message() {
        let def = parse(
            r#"
            syntax = "proto3";
            package foo;
            message M {
                int32 n = 1;
                string t = 2;
            }
            "#,
        )
        .unwrap();
        assert_eq!(def.packages.len(), 1);
        assert_eq!(def.packages[0].name, "foo");
        let m = &def.packages[0].messages[0].t;
        assert_eq!(m.name, "M");
        assert_eq!(m.flattened_fields().len(), 2);
    }

    #[test]
    fn parses_oneof_and_reserved() {
        let def = parse(
            r#"
            syntax = "proto3";
            message M {
                int32 n = 1;
                reserved 2, 4 to 6;
                reserved "old";
                oneof c {
                    int32 a = 10;
                    string b = 11;
                }
            }
            "#,
        )
        .unwrap();
        let m = &def.packages[0].messages[0].t;
        assert_eq!(m.reserved.len(), 2);
        assert_eq!(m.flattened_fields().len(), 3);
    }

    #[test]
    fn rejects_proto2_required() {
        let err = parse(
            r#"
            syntax = "proto3";
            message M {
                required int32 n = 1;
            }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err.error, ParserError::UnsupportedConstruct(_)));
    }

    #[test]
    fn rejects_extensions_by_name() {
        let err = parse(
            r#"
            syntax = "proto3";
            message M {
                extensions 100 to 200;
            }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err.error, ParserError::UnsupportedConstruct(ref c) if c == "extensions"));
    }

    #[test]
    fn rejects_non_proto3_syntax() {
        let err = parse("syntax = \"proto2\";").unwrap_err();
        assert!(matches!(err.error, ParserError::UnknownSyntax(_)));
    }

    #[test]
    fn enum_without_zero_value_is_rejected() {
        let err = parse(
            r#"
            syntax = "proto3";
            enum E {
                ONE = 1;
            }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err.error, ParserError::MissingEnumZeroValue(_)));
    }

    #[test]
    fn absolute_type_reference_keeps_leading_dot() {
        let def = parse(
            r#"
            syntax = "proto3";
            message M {
                .foo.Bar b = 1;
            }
            "#,
        )
        .unwrap();
        let m = &def.packages[0].messages[0].t;
        match &m.field_by_name("b").unwrap().proto_type {
            ProtoType::Named(name) => assert_eq!(name, ".foo.Bar"),
            other => panic!("expected Named, got {:?}", other),
        }
    }
}
