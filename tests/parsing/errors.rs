#[cfg(test)]
mod errors {
    use std::path::Path;

    use apitest::language::Span;
    use apitest::parsing;
    use apitest::parsing::error::ParsingError;

    /// Check the broken document fails with the expected kind of error
    fn expect_error(filename: &str, expected: ParsingError) {
        let path = Path::new("tests/broken").join(filename);
        let content = parsing::load(&path)
            .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", path, e));

        match parsing::parse(&content) {
            Ok(_) => panic!("Expected {:?} to fail, but it parsed", path),
            Err(error) => {
                if std::mem::discriminant(&error) != std::mem::discriminant(&expected) {
                    panic!(
                        "Expected error like {:?} but got {:?} for {:?}",
                        expected, error, path
                    );
                }
            }
        }
    }

    fn anywhere() -> Span {
        Span::line(0)
    }

    #[test]
    fn no_title() {
        expect_error("no-title.md", ParsingError::ExpectedHeader(anywhere()));
    }

    #[test]
    fn no_setup() {
        expect_error("no-setup.md", ParsingError::MissingSetup(anywhere()));
    }

    #[test]
    fn no_cases() {
        expect_error("no-cases.md", ParsingError::MissingCases(anywhere()));
    }

    #[test]
    fn cleared_twice() {
        expect_error(
            "cleared-twice.md",
            ParsingError::ClearedTwice(anywhere(), anywhere()),
        );
    }

    #[test]
    fn cleared_after_insertion() {
        expect_error(
            "cleared-after-insertion.md",
            ParsingError::ClearedAfterInsertion(anywhere(), anywhere()),
        );
    }

    #[test]
    fn find_in_unknown_collection() {
        expect_error(
            "find-unknown.md",
            ParsingError::UnknownCollection(anywhere(), String::new()),
        );
    }

    #[test]
    fn duplicate_key() {
        expect_error(
            "duplicate-key.md",
            ParsingError::DuplicateKey(anywhere(), anywhere(), String::new()),
        );
    }

    #[test]
    fn trailing_text_after_mixin() {
        expect_error(
            "trailing-mixin.md",
            ParsingError::TrailingText(anywhere(), String::new()),
        );
    }

    #[test]
    fn array_item_without_tab() {
        expect_error("missing-tab.md", ParsingError::ExpectedTab(anywhere()));
    }

    #[test]
    fn clear_takes_no_block() {
        expect_error(
            "clear-with-block.md",
            ParsingError::UnexpectedBlock(anywhere()),
        );
    }

    #[test]
    fn both_clears_are_reported() {
        let content = parsing::load(Path::new("tests/broken/cleared-twice.md")).unwrap();
        let error = parsing::parse(&content).unwrap_err();
        assert_eq!(
            error,
            ParsingError::ClearedTwice(Span::line(4), Span::line(6))
        );
        assert_eq!(error.span(), Span::line(6));
    }

    #[test]
    fn unknown_collection_is_named() {
        let content = parsing::load(Path::new("tests/broken/find-unknown.md")).unwrap();
        match parsing::parse(&content) {
            Err(ParsingError::UnknownCollection(_, collection)) => {
                assert_eq!(collection, "users")
            }
            other => panic!("Unexpected result {:?}", other),
        }
    }
}
