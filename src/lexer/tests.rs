use super::*;
use crate::error::{LexicalErrorKind, SqlError};

fn kinds(sql: &str) -> Vec<TokenKind> {
    Lexer::tokenize(sql.as_bytes())
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn single(sql: &str) -> Token {
    let tokens = Lexer::tokenize(sql.as_bytes()).unwrap();
    assert_eq!(tokens.len(), 2, "expected one token in {:?}: {:?}", sql, tokens);
    tokens.into_iter().next().unwrap()
}

fn lex_error(sql: &str) -> (LexicalErrorKind, usize) {
    match Lexer::tokenize(sql.as_bytes()) {
        Err(SqlError::Lexical(e)) => (e.kind, e.offset),
        other => panic!("Expected lexical error, got {:?}", other),
    }
}

#[test]
fn test_simple_select() {
    assert_eq!(
        kinds("SELECT a, b FROM t WHERE x = 1"),
        vec![
            TokenKind::Select,
            TokenKind::Identifier,
            TokenKind::Comma,
            TokenKind::Identifier,
            TokenKind::From,
            TokenKind::Identifier,
            TokenKind::Where,
            TokenKind::Identifier,
            TokenKind::Equal,
            TokenKind::LiteralInteger,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keyword_keeps_source_text() {
    let token = single("sElEcT");
    assert_eq!(token.kind, TokenKind::Select);
    assert_eq!(token.identifier_text(), Some("sElEcT"));
    assert_eq!(token.identifier_upper(), Some("SELECT"));
}

#[test]
fn test_literal_words() {
    assert_eq!(
        kinds("null True FALSE"),
        vec![
            TokenKind::LiteralNull,
            TokenKind::LiteralTrue,
            TokenKind::LiteralFalse,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_token_offsets() {
    let tokens = Lexer::tokenize(b"SELECT  abc,1").unwrap();
    assert_eq!((tokens[0].offset, tokens[0].len), (0, 6));
    assert_eq!((tokens[1].offset, tokens[1].len), (8, 3));
    assert_eq!((tokens[2].offset, tokens[2].len), (11, 1));
    assert_eq!((tokens[3].offset, tokens[3].len), (12, 1));
    assert_eq!(tokens[4].kind, TokenKind::Eof);
}

#[test]
fn test_operators() {
    assert_eq!(
        kinds("<=> <= <> != >= << >> := && || ! ~ ^ % & |"),
        vec![
            TokenKind::NullSafeEqual,
            TokenKind::LessEqual,
            TokenKind::NotEqual,
            TokenKind::NotEqual,
            TokenKind::GreaterEqual,
            TokenKind::ShiftLeft,
            TokenKind::ShiftRight,
            TokenKind::Assign,
            TokenKind::DoubleAmpersand,
            TokenKind::DoublePipe,
            TokenKind::Exclamation,
            TokenKind::Tilde,
            TokenKind::Caret,
            TokenKind::Percent,
            TokenKind::Ampersand,
            TokenKind::Pipe,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_unexpected_character() {
    assert_eq!(lex_error("SELECT \\"), (LexicalErrorKind::UnexpectedCharacter(b'\\'), 7));
}

//=============================================================================
// Comments
//=============================================================================

#[test]
fn test_comments_are_separators() {
    assert_eq!(
        kinds("SELECT # trailing\n 1 -- dash\n, /* block */ 2"),
        vec![
            TokenKind::Select,
            TokenKind::LiteralInteger,
            TokenKind::Comma,
            TokenKind::LiteralInteger,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_double_dash_needs_whitespace() {
    assert_eq!(
        kinds("1--1"),
        vec![
            TokenKind::LiteralInteger,
            TokenKind::Minus,
            TokenKind::Minus,
            TokenKind::LiteralInteger,
            TokenKind::Eof
        ]
    );
    assert_eq!(kinds("1 --"), vec![TokenKind::LiteralInteger, TokenKind::Eof]);
}

#[test]
fn test_unterminated_comment() {
    assert_eq!(lex_error("SELECT /* never closed"), (LexicalErrorKind::UnterminatedComment, 7));
}

#[test]
fn test_vendor_comment_within_cutoff() {
    let mut lexer = Lexer::with_version_cutoff(b"SELECT /*!40101 1 */ FROM t", 50599);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Select);
    let token = lexer.next_token().unwrap();
    assert_eq!(token.integer_value(), Some(1));
    assert_eq!(lexer.declared_version(), Some(40101));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::From);
    assert_eq!(lexer.declared_version(), None);
}

#[test]
fn test_vendor_comment_above_cutoff() {
    let mut lexer = Lexer::with_version_cutoff(b"SELECT /*!99999 1, */ 2", 50599);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Select);
    assert_eq!(lexer.next_token().unwrap().integer_value(), Some(2));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

fn gated(sql: &[u8]) -> Result<Vec<Token>> {
    let mut lexer = Lexer::with_version_cutoff(sql, 50599);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

#[test]
fn test_gated_vendor_comment_is_still_scanned() {
    // a `*/` inside a string does not close the comment
    let tokens = gated(b"SELECT /*!99999 '*/' */ 1").unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Select, TokenKind::LiteralInteger, TokenKind::Eof]);
    assert_eq!(tokens[1].offset, 24);

    let tokens = gated(b"SELECT /*!99999 `a*/b` */ 2").unwrap();
    assert_eq!(tokens[1].integer_value(), Some(2));
}

#[test]
fn test_gated_vendor_comment_reports_lexical_errors() {
    match gated(b"SELECT 1 /*!99999 'abc */") {
        Err(SqlError::Lexical(e)) => {
            assert_eq!(e.kind, LexicalErrorKind::UnterminatedString);
            assert_eq!(e.offset, 18);
        }
        other => panic!("Expected lexical error, got {:?}", other),
    }
    match gated(b"SELECT 1 /*!99999 + 1") {
        Err(SqlError::Lexical(e)) => {
            assert_eq!(e.kind, LexicalErrorKind::UnterminatedComment);
            assert_eq!(e.offset, 9);
        }
        other => panic!("Expected lexical error, got {:?}", other),
    }
}

#[test]
fn test_gated_param_markers_take_no_ordinal() {
    let tokens = gated(b"SELECT /*!99999 ?, ? */ ?").unwrap();
    let markers: Vec<u32> = tokens.iter().filter_map(|t| t.param_index()).collect();
    assert_eq!(markers, vec![1]);

    let mut lexer = Lexer::with_version_cutoff(b"? /*!99999 ? */", 50599);
    lexer.next_token().unwrap();
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.param_index(), 1);
}

#[test]
fn test_vendor_comment_equal_to_cutoff() {
    let mut lexer = Lexer::with_version_cutoff(b"/*!50599 1 */", 50599);
    assert_eq!(lexer.next_token().unwrap().integer_value(), Some(1));
}

#[test]
fn test_vendor_comment_without_version() {
    let mut lexer = Lexer::with_version_cutoff(b"/*! 7 */", 0);
    assert_eq!(lexer.next_token().unwrap().integer_value(), Some(7));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);

    // fewer than five digits are content, not a version
    let mut lexer = Lexer::with_version_cutoff(b"/*!4010 x */", 0);
    assert_eq!(lexer.next_token().unwrap().integer_value(), Some(4010));
    assert_eq!(lexer.next_token().unwrap().identifier_text(), Some("x"));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

//=============================================================================
// Numbers
//=============================================================================

#[test]
fn test_numbers() {
    assert_eq!(single("42").integer_value(), Some(42));
    assert_eq!(single("3.25").decimal_value(), Some("3.25"));
    assert_eq!(single("1e10").decimal_value(), Some("1e10"));
    assert_eq!(single("2.5E-3").decimal_value(), Some("2.5E-3"));
    assert_eq!(single(".5").decimal_value(), Some(".5"));
    assert_eq!(single("7.").decimal_value(), Some("7."));
}

#[test]
fn test_integer_overflow_becomes_decimal() {
    let digits = "340282366920938463463374607431768211456";
    let token = single(digits);
    assert_eq!(token.kind, TokenKind::LiteralDecimal);
    assert_eq!(token.decimal_value(), Some(digits));
}

#[test]
fn test_digit_runs_that_are_names() {
    for sql in ["1abc", "1e5f", "1e5x", "0x1y", "0b101z", "0x", "123_"] {
        let token = single(sql);
        assert_eq!(token.kind, TokenKind::Identifier, "{}", sql);
        assert_eq!(token.identifier_text(), Some(sql));
    }
}

#[test]
fn test_exponent_sign_without_digits() {
    let tokens = Lexer::tokenize(b"1e+x").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].identifier_text(), Some("1e"));
    assert_eq!(tokens[1].kind, TokenKind::Plus);
    assert_eq!(tokens[2].identifier_text(), Some("x"));

    let tokens = Lexer::tokenize(b"1.5e+x").unwrap();
    assert_eq!(tokens[0].decimal_value(), Some("1.5"));
    assert_eq!(tokens[1].identifier_text(), Some("e"));
    assert_eq!(tokens[2].kind, TokenKind::Plus);
}

#[test]
fn test_dot_after_name_is_qualifier() {
    assert_eq!(
        kinds("t.5"),
        vec![
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::LiteralInteger,
            TokenKind::Eof
        ]
    );
    assert_eq!(
        kinds("SELECT .5"),
        vec![TokenKind::Select, TokenKind::LiteralDecimal, TokenKind::Eof]
    );
    assert_eq!(
        kinds("(a).5"),
        vec![
            TokenKind::LeftParen,
            TokenKind::Identifier,
            TokenKind::RightParen,
            TokenKind::Dot,
            TokenKind::LiteralInteger,
            TokenKind::Eof
        ]
    );
    assert_eq!(
        kinds("(.5)"),
        vec![TokenKind::LeftParen, TokenKind::LiteralDecimal, TokenKind::RightParen, TokenKind::Eof]
    );
}

#[test]
fn test_hex_and_bit_literals() {
    let token = single("0x1F");
    assert_eq!(token.kind, TokenKind::LiteralHex);
    assert_eq!(token.digits(), Some((&b"1F"[..], false)));

    let token = single("X'4f4B'");
    assert_eq!(token.kind, TokenKind::LiteralHex);
    assert_eq!(token.digits(), Some((&b"4f4B"[..], true)));

    let token = single("b'0101'");
    assert_eq!(token.kind, TokenKind::LiteralBit);
    assert_eq!(token.digits(), Some((&b"0101"[..], true)));

    assert_eq!(single("b''").digits(), Some((&b""[..], true)));
    assert_eq!(single("0b11").kind, TokenKind::LiteralBit);
}

#[test]
fn test_invalid_hex_and_bit_literals() {
    assert_eq!(lex_error("SELECT x'4'"), (LexicalErrorKind::InvalidHexLiteral, 7));
    assert_eq!(lex_error("SELECT x'4G'"), (LexicalErrorKind::InvalidHexLiteral, 7));
    assert_eq!(lex_error("b'012'"), (LexicalErrorKind::InvalidBitLiteral, 0));
}

//=============================================================================
// Strings and names
//=============================================================================

#[test]
fn test_string_escapes() {
    let mut lexer = Lexer::new(br"'don''t' 'a\nb\tc' 'x\%y' '\q' 'it\'s'");
    let mut values = Vec::new();
    loop {
        let token = lexer.next_token().unwrap();
        if token.kind == TokenKind::Eof {
            break;
        }
        assert_eq!(token.kind, TokenKind::LiteralString);
        values.push(lexer.string_value().unwrap());
    }
    assert_eq!(values, vec!["don't", "a\nb\tc", "x\\%y", "q", "it's"]);
}

#[test]
fn test_double_quoted_string() {
    let token = single("\"say \"\"hi\"\"\"");
    assert_eq!(token.kind, TokenKind::LiteralString);
    assert_eq!(token.string_bytes(), Some(&b"say \"hi\""[..]));
}

#[test]
fn test_national_string() {
    let token = single("N'abc'");
    assert_eq!(token.kind, TokenKind::LiteralNationalString);
    assert_eq!(token.string_bytes(), Some(&b"abc"[..]));
    assert_eq!((token.offset, token.len), (0, 6));
}

#[test]
fn test_unterminated_string_reports_opening_quote() {
    assert_eq!(lex_error("SELECT 'abc"), (LexicalErrorKind::UnterminatedString, 7));
    assert_eq!(lex_error("SELECT 'abc\\'"), (LexicalErrorKind::UnterminatedString, 7));
}

#[test]
fn test_unterminated_string_window() {
    match Lexer::tokenize(b"SELECT 'abc") {
        Err(e) => {
            assert_eq!(e.offset(), Some(7));
            assert!(e.to_string().contains("SELECT 'abc"));
        }
        Ok(_) => panic!("Expected error"),
    }
}

#[test]
fn test_quoted_identifier() {
    let token = single("`my``col`");
    assert_eq!(token.kind, TokenKind::QuotedIdentifier);
    assert_eq!(token.identifier_text(), Some("my`col"));
    assert_eq!(lex_error("SELECT `abc"), (LexicalErrorKind::UnterminatedIdentifier, 7));
}

#[test]
fn test_high_bytes_are_name_bytes() {
    let token = single("café");
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(token.identifier_text(), Some("café"));
}

#[test]
fn test_placeholder() {
    let token = single("${table_name}");
    assert_eq!(token.kind, TokenKind::Placeholder);
    assert_eq!(token.identifier_text(), Some("table_name"));
    assert_eq!(lex_error("SELECT ${oops"), (LexicalErrorKind::UnterminatedPlaceholder, 7));
}

#[test]
fn test_variables() {
    let token = single("@total.count");
    assert_eq!(token.kind, TokenKind::UserVariable);
    assert_eq!(token.identifier_text(), Some("total.count"));

    let token = single("@'odd name'");
    assert_eq!(token.kind, TokenKind::UserVariable);
    assert_eq!(token.identifier_text(), Some("odd name"));

    let tokens = Lexer::tokenize(b"@@global.max_connections").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::SysVariable);
    assert_eq!(tokens[0].identifier_text(), Some("global"));
    assert_eq!(tokens[1].kind, TokenKind::Dot);
    assert_eq!(tokens[2].identifier_text(), Some("max_connections"));

    assert_eq!(lex_error("SELECT @ "), (LexicalErrorKind::InvalidVariable, 7));
}

//=============================================================================
// Parameters and push-back
//=============================================================================

#[test]
fn test_param_markers_are_numbered() {
    let tokens = Lexer::tokenize(b"? + ?, ?").unwrap();
    let ordinals: Vec<u32> = tokens.iter().filter_map(|t| t.param_index()).collect();
    assert_eq!(ordinals, vec![1, 2, 3]);
}

#[test]
fn test_push_back_keeps_ordinals() {
    let mut lexer = Lexer::new(b"? ?");
    let first = lexer.next_token().unwrap();
    let second = lexer.next_token().unwrap();
    assert_eq!(lexer.param_index(), 2);

    lexer.push_back(second.clone());
    lexer.push_back(first.clone());
    assert_eq!(lexer.next_token().unwrap(), first);
    assert_eq!(lexer.current().param_index(), Some(1));
    assert_eq!(lexer.next_token().unwrap(), second);
    assert_eq!(lexer.param_index(), 2);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
#[should_panic]
fn test_third_push_back_panics() {
    let mut lexer = Lexer::new(b"a b c");
    let a = lexer.next_token().unwrap();
    let b = lexer.next_token().unwrap();
    let c = lexer.next_token().unwrap();
    lexer.push_back(c);
    lexer.push_back(b);
    lexer.push_back(a);
}

#[test]
fn test_accessors_follow_current_token() {
    let mut lexer = Lexer::new(b"select 'x''y' 12");
    lexer.next_token().unwrap();
    assert_eq!(lexer.current_token(), TokenKind::Select);
    assert_eq!(lexer.identifier_upper(), Some("SELECT"));
    lexer.next_token().unwrap();
    assert_eq!(lexer.string_value().as_deref(), Some("x'y"));
    assert_eq!(&lexer.raw_bytes()[..], b"'x''y'");
    lexer.next_token().unwrap();
    assert_eq!(lexer.integer_value(), Some(12));
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);

    let mut lexer = Lexer::new(b"SELECT 'it''s'");
    lexer.next_token().unwrap();
    assert_eq!(&lexer.raw_bytes()[..], b"SELECT");
    lexer.next_token().unwrap();
    assert_eq!(&lexer.raw_bytes()[..], b"'it''s'");
    assert_eq!(lexer.string_value().as_deref(), Some("it's"));
}

#[test]
fn test_latin1_names_decode() {
    let mut lexer = Lexer::with_charset(&[b'c', b'a', b'f', 0xE9], Charset::Latin1);
    let token = lexer.next_token().unwrap();
    assert_eq!(token.identifier_text(), Some("café"));
}
