#[cfg(test)]
mod samples {
    use std::fs;
    use std::path::Path;

    use apitest::formatting::*;
    use apitest::parsing;

    /// Formatting may rearrange a document but never change what it means,
    /// and formatting twice changes nothing further.
    #[test]
    fn formatting_preserves_meaning() {
        let entries = fs::read_dir(Path::new("tests/samples")).expect("Failed to read samples");

        let mut count = 0;
        for entry in entries {
            let path = entry
                .expect("Failed to read directory entry")
                .path();
            if path
                .extension()
                .and_then(|s| s.to_str())
                != Some("md")
            {
                continue;
            }

            let content = parsing::load(&path).unwrap();
            let test = parsing::parse(&content).unwrap();

            let formatted = render(&Identity, &test);
            let again = parsing::parse(&formatted)
                .unwrap_or_else(|e| panic!("Formatted {:?} doesn't parse: {:?}", path, e));

            assert_eq!(test, again, "{:?} changed meaning when formatted", path);
            assert_eq!(render(&Identity, &again), formatted);
            count += 1;
        }

        assert!(count > 0);
    }

    #[test]
    fn terminal_output_carries_the_same_text() {
        let content = parsing::load(Path::new("tests/samples/orders.md")).unwrap();
        let test = parsing::parse(&content).unwrap();

        let plain = render(&Identity, &test);
        let colored = render(&Terminal, &test);
        assert_ne!(plain, colored);

        let re = regex::Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        assert_eq!(re.replace_all(&colored, ""), plain);
    }
}
