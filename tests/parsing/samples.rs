#[cfg(test)]
mod samples {
    use std::fs;
    use std::path::{Path, PathBuf};

    use apitest::parsing;

    fn documents_in(dir: &Path) -> Vec<PathBuf> {
        assert!(dir.exists(), "{:?} directory missing", dir);

        let entries = fs::read_dir(dir).expect("Failed to read directory");

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();

            if path
                .extension()
                .and_then(|s| s.to_str())
                == Some("md")
            {
                files.push(path);
            }
        }

        assert!(!files.is_empty(), "No .md files found in {:?}", dir);
        files
    }

    #[test]
    fn ensure_samples_parse() {
        let files = documents_in(Path::new("tests/samples/"));

        let mut failures = Vec::new();

        for file in &files {
            let content = parsing::load(&file)
                .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

            match parsing::parse(&content) {
                Ok(_) => {}
                Err(e) => {
                    println!("File {:?} failed to parse: {:?}", file, e);
                    failures.push(file.clone());
                }
            }
        }

        if !failures.is_empty() {
            panic!(
                "Sample files should parse successfully, but {} files failed",
                failures.len()
            );
        }
    }

    #[test]
    fn ensure_broken_fail() {
        let files = documents_in(Path::new("tests/broken/"));

        let mut unexpected_successes = Vec::new();

        for file in &files {
            let content = parsing::load(&file)
                .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", file, e));

            if parsing::parse(&content).is_ok() {
                println!("File {:?} unexpectedly parsed successfully", file);
                unexpected_successes.push(file.clone());
            }
        }

        if !unexpected_successes.is_empty() {
            panic!(
                "Broken files should not parse successfully, but {} files passed",
                unexpected_successes.len()
            );
        }
    }

    #[test]
    fn sample_contents() {
        let content = parsing::load(Path::new("tests/samples/user-login.md")).unwrap();
        let test = parsing::parse(&content).unwrap();

        assert_eq!(test.name, "user/login");
        assert!(!test.skip);
        assert_eq!(test.setups.len(), 3);
        assert_eq!(test.cases.len(), 4);
        assert_eq!(
            test.collections
                .len(),
            1
        );
        assert!(test
            .collections
            .contains("users"));
        assert!(test.cases[3].skip);
    }

    #[test]
    fn missing_file() {
        let error = parsing::load(Path::new("tests/samples/nonexistent.md")).unwrap_err();
        assert_eq!(error.filename, Path::new("tests/samples/nonexistent.md"));
        assert!(!error
            .problem
            .is_empty());
    }
}
