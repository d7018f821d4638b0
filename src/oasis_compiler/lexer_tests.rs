// Lexer tests

#[cfg(test)]
mod tests {
    use crate::oasis_compiler::error::CompilerError;
    use crate::oasis_compiler::lexer::{Lexer, TokenKind};

    fn tokenize_input(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize();
        assert!(lexer.errors().is_empty(), "{:?}", lexer.errors());
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize_input("");
        assert_eq!(tokens, vec![TokenKind::EOF]);
    }

    #[test]
    fn test_single_tokens() {
        let tokens = tokenize_input("{ } ( ) ; : , @ + - * / ! < > =");
        assert_eq!(
            tokens,
            vec![
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Semicolon,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::At,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Not,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Equal,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_multi_character_operators() {
        let tokens = tokenize_input("== != <= >= && || =>");
        assert_eq!(
            tokens,
            vec![
                TokenKind::EqualEqual,
                TokenKind::NotEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Arrow,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_keywords() {
        let tokens = tokenize_input(
            "script objectcode stringpack dialog bool byte if else while do for goto export true false option active inactive",
        );
        assert_eq!(
            tokens,
            vec![
                TokenKind::Script,
                TokenKind::ObjectCode,
                TokenKind::StringPack,
                TokenKind::Dialog,
                TokenKind::Bool,
                TokenKind::Byte,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::Do,
                TokenKind::For,
                TokenKind::Goto,
                TokenKind::Export,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Option,
                TokenKind::Active,
                TokenKind::Inactive,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_identifiers_and_numbers() {
        let tokens = tokenize_input("scActorTalk counter_2 255 0");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Identifier("scActorTalk".to_string()),
                TokenKind::Identifier("counter_2".to_string()),
                TokenKind::NumberLiteral(255),
                TokenKind::NumberLiteral(0),
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokenize_input(r#""Say \"hi\"\n""#);
        assert_eq!(
            tokens,
            vec![
                TokenKind::StringLiteral("Say \"hi\"\n".to_string()),
                TokenKind::EOF
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize_input("a // line comment\n/* block\ncomment */ b");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::Identifier("b".to_string()),
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn test_line_numbers() {
        let mut lexer = Lexer::new("script 1\n{\n  x = 3;\n}");
        let tokens = lexer.tokenize();
        let x = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Identifier("x".to_string()))
            .unwrap();
        assert_eq!(x.line, 3);
        assert_eq!(x.column, 3);
    }

    #[test]
    fn test_unexpected_character_is_recorded_and_skipped() {
        let mut lexer = Lexer::new("a # b & c");
        let kinds: Vec<TokenKind> = lexer.tokenize().into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::Identifier("b".to_string()),
                TokenKind::Identifier("c".to_string()),
                TokenKind::EOF,
            ]
        );
        assert_eq!(
            lexer.errors(),
            &[
                CompilerError::UnexpectedCharacter('#', 1),
                CompilerError::UnexpectedCharacter('&', 1)
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("\"open\nx");
        let kinds: Vec<TokenKind> = lexer.tokenize().into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Identifier("x".to_string()), TokenKind::EOF]
        );
        assert_eq!(lexer.errors(), &[CompilerError::UnterminatedString(1)]);
    }

    #[test]
    fn test_number_overflow_is_lexical_error() {
        let mut lexer = Lexer::new("99999999999");
        lexer.tokenize();
        assert_eq!(lexer.errors().len(), 1);
        assert!(lexer.errors()[0].is_syntax_error());
    }
}
