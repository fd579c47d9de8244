// Keyword lookup parity
// The generated trie must agree with the keyword table on every input

#[cfg(test)]
mod keyword_parity_tests {
    use minisql_parser::lexer::keywords::{lookup, lookup_str, KeywordTable, KEYWORDS};
    use minisql_parser::lexer::{Lexer, TokenKind};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ_0123456789";

    fn assert_parity(word: &[u8]) {
        let oracle = KeywordTable::get().get_bytes(word);
        assert_eq!(lookup(word), oracle, "lookup of {:?}", String::from_utf8_lossy(word));
    }

    #[test]
    fn test_every_keyword_is_found() {
        for (word, kind) in KeywordTable::get().iter() {
            assert_eq!(lookup(word.as_bytes()), Some(kind), "{}", word);
            assert_eq!(lookup_str(word), Some(kind), "{}", word);
        }
    }

    #[test]
    fn test_near_misses_agree_with_table() {
        for (word, _) in KEYWORDS {
            let bytes = word.as_bytes();
            assert_parity(&bytes[..bytes.len() - 1]);

            let mut longer = bytes.to_vec();
            longer.push(b'X');
            assert_parity(&longer);
            longer.pop();
            longer.push(b'_');
            assert_parity(&longer);

            let mut changed = bytes.to_vec();
            let last = changed.len() - 1;
            changed[last] = if changed[last] == b'Z' { b'A' } else { changed[last] + 1 };
            assert_parity(&changed);
        }
    }

    #[test]
    fn test_random_words_agree_with_table() {
        let mut rng = StdRng::seed_from_u64(0x6b65_7977);
        for _ in 0..20_000 {
            let len = rng.gen_range(1..14);
            let word: Vec<u8> = (0..len).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())]).collect();
            assert_parity(&word);
        }
    }

    #[test]
    fn test_random_keyword_prefixes_agree_with_table() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..5_000 {
            let (word, _) = KEYWORDS[rng.gen_range(0..KEYWORDS.len())];
            let cut = rng.gen_range(0..=word.len());
            assert_parity(&word.as_bytes()[..cut]);
        }
    }

    #[test]
    fn test_lexer_keywords_are_case_insensitive() {
        for (word, kind) in KEYWORDS.iter().take(200) {
            let lower = word.to_ascii_lowercase();
            let tokens = Lexer::tokenize(lower.as_bytes()).unwrap();
            assert_eq!(tokens[0].kind, *kind, "{}", lower);
            assert_eq!(tokens[0].identifier_text(), Some(lower.as_str()));
            assert_eq!(tokens[1].kind, TokenKind::Eof);
        }
    }
}
