// Configuration loading and the process-wide version cutoff

#[cfg(test)]
mod config_tests {
    use std::fs;

    use minisql_parser::config::{self, ParserConfig, DEFAULT_VERSION_CUTOFF};
    use minisql_parser::lexer::{Lexer, TokenKind};
    use minisql_parser::{parse, regenerate, Charset, SqlError};
    use tempfile::tempdir;

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("parser.json");
        fs::write(&path, r#"{"version_cutoff": 50700, "charset": "latin1"}"#).unwrap();

        let config = ParserConfig::load(&path).unwrap();
        assert_eq!(config.version_cutoff, 50700);
        assert_eq!(config.charset, Charset::Latin1);
    }

    #[test]
    fn test_load_empty_object_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("parser.json");
        fs::write(&path, "{}").unwrap();

        let config = ParserConfig::load(&path).unwrap();
        assert_eq!(config, ParserConfig::default());
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let dir = tempdir().unwrap();

        let path = dir.path().join("range.json");
        fs::write(&path, r#"{"version_cutoff": 123456}"#).unwrap();
        assert!(matches!(ParserConfig::load(&path), Err(SqlError::Config(_))));

        let path = dir.path().join("charset.json");
        fs::write(&path, r#"{"charset": "ebcdic"}"#).unwrap();
        assert!(ParserConfig::load(&path).is_err());

        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(ParserConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = ParserConfig::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(SqlError::Io(_))));
    }

    // The only test in this binary that touches the global cutoff
    #[test]
    fn test_install_changes_global_cutoff() {
        assert_eq!(config::version_cutoff(), DEFAULT_VERSION_CUTOFF);
        let sql = "SELECT 1 /*!50700 + 1 */";
        assert_eq!(regenerate(&parse(sql).unwrap()), "SELECT 1");

        // a lexer keeps the cutoff it was created with
        let mut early = Lexer::new(sql.as_bytes());

        let config = ParserConfig { version_cutoff: 50700, ..ParserConfig::default() };
        config.install();
        assert_eq!(config::version_cutoff(), 50700);
        assert_eq!(regenerate(&parse(sql).unwrap()), "SELECT 1 + 1");

        let mut kinds = Vec::new();
        loop {
            let kind = early.next_token().unwrap().kind;
            kinds.push(kind);
            if kind == TokenKind::Eof {
                break;
            }
        }
        assert_eq!(kinds, vec![TokenKind::Select, TokenKind::LiteralInteger, TokenKind::Eof]);

        config::set_version_cutoff(DEFAULT_VERSION_CUTOFF);
    }
}
