//! Lexer implementation using logos

mod token;

pub use token::{Token, TokenKind};

use logos::Logos;

/// Streaming tokenizer over a source string
///
/// The lexer never fails: bytes outside the language come back as `Illegal`
/// tokens and exhausted input yields `Eof` forever, so the parser can drive
/// it without an error path.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            inner: TokenKind::lexer(source),
        }
    }

    /// Produce the next token, advancing the cursor
    pub fn next_token(&mut self) -> Token {
        match self.inner.next() {
            Some(Ok(TokenKind::Str)) => {
                // The literal of a string token is its interior text.
                let slice = self.inner.slice();
                Token::new(TokenKind::Str, &slice[1..slice.len() - 1])
            }
            Some(Ok(TokenKind::Eof)) => Token::eof(),
            Some(Ok(kind)) => Token::new(kind, self.inner.slice()),
            Some(Err(())) => Token::new(TokenKind::Illegal, self.inner.slice()),
            None => Token::eof(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tokens(input: &str, expected: &[(TokenKind, &str)]) {
        let mut lexer = Lexer::new(input);
        for (i, (kind, literal)) in expected.iter().enumerate() {
            let tok = lexer.next_token();
            assert_eq!(tok.kind, *kind, "token {i}: wrong kind for {:?}", tok.literal);
            assert_eq!(tok.literal, *literal, "token {i}: wrong literal");
        }
    }

    #[test]
    fn test_next_token_symbols() {
        assert_tokens(
            "=+(){},;",
            &[
                (TokenKind::Assign, "="),
                (TokenKind::Plus, "+"),
                (TokenKind::LParen, "("),
                (TokenKind::RParen, ")"),
                (TokenKind::LBrace, "{"),
                (TokenKind::RBrace, "}"),
                (TokenKind::Comma, ","),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Eof, ""),
            ],
        );
    }

    #[test]
    fn test_next_token_program() {
        let input = "let five = 5;
let ten = 10;

let add = fn(x, y) {
  x + y;
};

let result = add(five, ten);
!-/*5;
5 < 10 > 5;

if (5 < 10) {
	return true;
} else {
	return false;
}

10 == 10;
10 != 9;
";
        assert_tokens(
            input,
            &[
                (TokenKind::Let, "let"),
                (TokenKind::Ident, "five"),
                (TokenKind::Assign, "="),
                (TokenKind::Int, "5"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Let, "let"),
                (TokenKind::Ident, "ten"),
                (TokenKind::Assign, "="),
                (TokenKind::Int, "10"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Let, "let"),
                (TokenKind::Ident, "add"),
                (TokenKind::Assign, "="),
                (TokenKind::Function, "fn"),
                (TokenKind::LParen, "("),
                (TokenKind::Ident, "x"),
                (TokenKind::Comma, ","),
                (TokenKind::Ident, "y"),
                (TokenKind::RParen, ")"),
                (TokenKind::LBrace, "{"),
                (TokenKind::Ident, "x"),
                (TokenKind::Plus, "+"),
                (TokenKind::Ident, "y"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::RBrace, "}"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Let, "let"),
                (TokenKind::Ident, "result"),
                (TokenKind::Assign, "="),
                (TokenKind::Ident, "add"),
                (TokenKind::LParen, "("),
                (TokenKind::Ident, "five"),
                (TokenKind::Comma, ","),
                (TokenKind::Ident, "ten"),
                (TokenKind::RParen, ")"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Bang, "!"),
                (TokenKind::Minus, "-"),
                (TokenKind::Slash, "/"),
                (TokenKind::Asterisk, "*"),
                (TokenKind::Int, "5"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Int, "5"),
                (TokenKind::Lt, "<"),
                (TokenKind::Int, "10"),
                (TokenKind::Gt, ">"),
                (TokenKind::Int, "5"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::If, "if"),
                (TokenKind::LParen, "("),
                (TokenKind::Int, "5"),
                (TokenKind::Lt, "<"),
                (TokenKind::Int, "10"),
                (TokenKind::RParen, ")"),
                (TokenKind::LBrace, "{"),
                (TokenKind::Return, "return"),
                (TokenKind::True, "true"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::RBrace, "}"),
                (TokenKind::Else, "else"),
                (TokenKind::LBrace, "{"),
                (TokenKind::Return, "return"),
                (TokenKind::False, "false"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::RBrace, "}"),
                (TokenKind::Int, "10"),
                (TokenKind::Eq, "=="),
                (TokenKind::Int, "10"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Int, "10"),
                (TokenKind::NotEq, "!="),
                (TokenKind::Int, "9"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Eof, ""),
            ],
        );
    }

    #[test]
    fn test_next_token_strings_and_arrays() {
        assert_tokens(
            r#""foobar" "foo bar" [1, 2];"#,
            &[
                (TokenKind::Str, "foobar"),
                (TokenKind::Str, "foo bar"),
                (TokenKind::LBracket, "["),
                (TokenKind::Int, "1"),
                (TokenKind::Comma, ","),
                (TokenKind::Int, "2"),
                (TokenKind::RBracket, "]"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Eof, ""),
            ],
        );
    }

    #[test]
    fn test_next_token_empty_string_literal() {
        assert_tokens(r#""""#, &[(TokenKind::Str, ""), (TokenKind::Eof, "")]);
    }

    #[test]
    fn test_illegal_tokens() {
        assert_tokens(
            "@#5",
            &[
                (TokenKind::Illegal, "@"),
                (TokenKind::Illegal, "#"),
                (TokenKind::Int, "5"),
                (TokenKind::Eof, ""),
            ],
        );
    }

    #[test]
    fn test_identifiers_with_underscores() {
        assert_tokens(
            "foo_bar _baz",
            &[
                (TokenKind::Ident, "foo_bar"),
                (TokenKind::Ident, "_baz"),
                (TokenKind::Eof, ""),
            ],
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        // `fnord` starts with `fn` but is one identifier, not a keyword.
        assert_tokens(
            "fnord letter truthy",
            &[
                (TokenKind::Ident, "fnord"),
                (TokenKind::Ident, "letter"),
                (TokenKind::Ident, "truthy"),
                (TokenKind::Eof, ""),
            ],
        );
    }

    #[test]
    fn test_eof_is_repeated() {
        let mut lexer = Lexer::new("5");
        assert_eq!(lexer.next_token().kind, TokenKind::Int);
        for _ in 0..3 {
            let tok = lexer.next_token();
            assert_eq!(tok.kind, TokenKind::Eof);
            assert!(tok.literal.is_empty());
        }
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        assert_tokens(
            "  1 \t + \r\n 2  ",
            &[
                (TokenKind::Int, "1"),
                (TokenKind::Plus, "+"),
                (TokenKind::Int, "2"),
                (TokenKind::Eof, ""),
            ],
        );
    }
}
