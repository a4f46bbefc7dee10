#[cfg(test)]
mod runner {
    use std::collections::BTreeMap;

    use apitest::language::Value;
    use apitest::parsing;
    use apitest::running::{Options, Outcome, Response, RunError, Runner};
    use serde_json::json;

    use crate::fakes::{Memory, Offline, Service};

    fn outcomes(report: &apitest::running::TestReport) -> Vec<&str> {
        report
            .cases
            .iter()
            .map(|case| match case.outcome {
                Outcome::Passed => "passed",
                Outcome::Skipped => "skipped",
                Outcome::Blocked => "blocked",
                Outcome::Failed(_) => "failed",
            })
            .collect()
    }

    #[tokio::test]
    async fn setup_runs_in_order() {
        let content = r#"# user/create

## Setup

### Clear orders

### alice in users
	name: "Alice"

### bob in users
	name: "Bob"
	friend: alice._id

### greeting is
	text: "Hello " + bob.name

## Echo
### Post
	id: alice._id
	text: greeting.text
### Out
	id: alice._id
	text: "Hello Bob"
"#;
        let test = parsing::parse(content).unwrap();
        let mut runner = Runner::new(Memory::default(), Service::echo(), Options::default());
        let report = runner
            .execute(&test)
            .await;

        assert!(report.passed(), "{:?}", report);
        assert_eq!(
            runner
                .storage()
                .log,
            vec!["clear orders", "clear users", "insert users", "insert users"]
        );

        let users = runner
            .storage()
            .documents("users");
        assert_eq!(users[1]["friend"], users[0]["_id"]);

        let requests = &runner
            .transport()
            .requests;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "http://localhost:8000/user/create");
        assert_eq!(requests[0].1["id"], users[0]["_id"]);
    }

    #[tokio::test]
    async fn default_documents_are_merged() {
        let content = "# t\n## Setup\n### alice in users\n\tname: \"Alice\"\n\tprefs:\n\t\tlang: \"pt\"\n## Case\n";
        let test = parsing::parse(content).unwrap();

        let mut defaults = BTreeMap::new();
        defaults.insert(
            "users".to_string(),
            json!({"active": true, "prefs": {"lang": "en", "theme": "dark"}}),
        );
        let options = Options {
            default_documents: defaults,
            ..Options::default()
        };

        let mut runner = Runner::new(Memory::default(), Service::echo(), options);
        let report = runner
            .execute(&test)
            .await;
        assert!(report.passed());

        let stored = &runner
            .storage()
            .documents("users")[0];
        assert_eq!(stored["active"], json!(true));
        assert_eq!(stored["name"], json!("Alice"));
        assert_eq!(stored["prefs"], json!({"lang": "pt", "theme": "dark"}));
    }

    #[tokio::test]
    async fn previous_exchange_is_visible() {
        let content = r#"# counter
## Setup
## First
### Post
	n: 1
	before: prev.out
### Out
	n: 1
	before: null
## Second
### Post /counter/next
	n: prev.post.n + 1
	last: prev.out.n
### Out
	n: 2
	last: 1
"#;
        let test = parsing::parse(content).unwrap();
        let mut runner = Runner::new(Memory::default(), Service::echo(), Options::default());
        let report = runner
            .execute(&test)
            .await;

        assert_eq!(outcomes(&report), vec!["passed", "passed"]);
        assert_eq!(
            runner
                .transport()
                .requests[1]
                .0,
            "http://localhost:8000/counter/next"
        );
    }

    fn login(_: &str, body: &serde_json::Value) -> Response {
        if body["user"]["password"] == json!("123") {
            Response {
                status: 200,
                body: json!({"token": "abc", "expires": "2026-10-18T10:00:00Z"}),
            }
        } else {
            Response {
                status: 401,
                body: json!({"error": "Wrong password"}),
            }
        }
    }

    #[tokio::test]
    async fn status_and_output_failures() {
        let content = r#"# user/login
## Setup
### credentials is
	name: "alice"
	password: "123"
## Success
### Post
	user: credentials
### Out
	token: String
	expires: Date
## Wrong password
### Post
	user: credentials with password: "1234"
### Out 401
	error: "Wrong password"
## Expecting success with a bad password
### Post
	user: credentials with password: "nope"
### Out
	token: String
## Expecting the wrong body
### Post
	user: credentials
### Out
	token: Number
	expires: Date
## No body check
### Post
	user: credentials
"#;
        let test = parsing::parse(content).unwrap();
        let mut runner = Runner::new(Memory::default(), Service::new(login), Options::default());
        let report = runner
            .execute(&test)
            .await;

        assert_eq!(
            outcomes(&report),
            vec!["passed", "passed", "failed", "failed", "passed"]
        );
        assert!(!report.passed());

        match &report.cases[2].outcome {
            Outcome::Failed(RunError::Status {
                expected, actual, ..
            }) => {
                assert_eq!(*expected, 200);
                assert_eq!(*actual, 401);
            }
            other => panic!("Unexpected {:?}", other),
        }

        match &report.cases[3].outcome {
            Outcome::Failed(RunError::Output { mismatch, post, .. }) => {
                assert_eq!(mismatch.path, "token");
                assert_eq!(
                    *post,
                    Value::from(json!({"user": {"name": "alice", "password": "123"}}))
                );
            }
            other => panic!("Unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn finding_documents() {
        let content = r#"# users
## Setup
### alice in users
	name: "Alice"
	age: 30
## By id
### Find in users
	_id: alice._id
	name: "Alice"
	age: 30
## By contents
### Find in users
	name: "Alice"
	age: Number
## Wrong contents
### Find in users
	_id: alice._id
	name: "Alicia"
	age: 30
## Absent
### Find in users
	name: "Bob"
	age: 30
## Missing id
### Find in users
	_id: randomId()
	name: "Alice"
"#;
        let test = parsing::parse(content).unwrap();
        let mut runner = Runner::new(Memory::default(), Service::echo(), Options::default());
        let report = runner
            .execute(&test)
            .await;

        assert_eq!(
            outcomes(&report),
            vec!["passed", "passed", "failed", "failed", "failed"]
        );

        match &report.cases[2].outcome {
            Outcome::Failed(RunError::FindById {
                collection,
                mismatch,
                ..
            }) => {
                assert_eq!(collection, "users");
                assert_eq!(mismatch.path, "name");
            }
            other => panic!("Unexpected {:?}", other),
        }

        match &report.cases[3].outcome {
            Outcome::Failed(RunError::NotFound { candidates, .. }) => {
                assert_eq!(candidates.len(), 1);
                assert_eq!(candidates[0].1.path, "name");
            }
            other => panic!("Unexpected {:?}", other),
        }

        assert!(matches!(
            report.cases[4].outcome,
            Outcome::Failed(RunError::Missing { .. })
        ));

        let scans = runner
            .storage()
            .log
            .iter()
            .filter(|entry| entry.starts_with("scan"))
            .count();
        assert_eq!(scans, 2);
    }

    #[tokio::test]
    async fn skipping() {
        let content = "# t (skip)\n## Setup\n### alice in users\n\tname: \"Alice\"\n## One\n## Two\n";
        let test = parsing::parse(content).unwrap();
        let mut runner = Runner::new(Memory::default(), Service::echo(), Options::default());
        let report = runner
            .execute(&test)
            .await;

        assert!(report.skipped);
        assert!(report.passed());
        assert_eq!(outcomes(&report), vec!["skipped", "skipped"]);
        assert!(runner
            .storage()
            .log
            .is_empty());

        let content = "# t\n## Setup\n## One (skip)\n## Two\n";
        let test = parsing::parse(content).unwrap();
        let mut runner = Runner::new(Memory::default(), Service::echo(), Options::default());
        let report = runner
            .execute(&test)
            .await;

        assert_eq!(outcomes(&report), vec!["skipped", "passed"]);
        assert_eq!(
            runner
                .transport()
                .requests
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn failed_setup_blocks_cases() {
        let content = "# t\n## Setup\n### alice in users\n\tname: nobody.name\n## One\n## Two\n";
        let test = parsing::parse(content).unwrap();
        let mut runner = Runner::new(Memory::default(), Service::echo(), Options::default());
        let report = runner
            .execute(&test)
            .await;

        match &report.setup {
            Some(RunError::Evaluation(error)) => {
                assert_eq!(error.label(), "<alice in users>.name")
            }
            other => panic!("Unexpected {:?}", other),
        }
        assert_eq!(outcomes(&report), vec!["blocked", "blocked"]);
        assert!(!report.passed());
        assert!(runner
            .transport()
            .requests
            .is_empty());
    }

    #[tokio::test]
    async fn transport_failures_are_reported() {
        let content = "# t\n## Setup\n## One\n## Two\n";
        let test = parsing::parse(content).unwrap();
        let mut runner = Runner::new(Memory::default(), Offline, Options::default());
        let report = runner
            .execute(&test)
            .await;

        assert_eq!(outcomes(&report), vec!["failed", "failed"]);
        let (name, error) = report
            .failures()
            .next()
            .unwrap();
        assert_eq!(name, "One");
        assert_eq!(error.to_string(), "Request failed: connection refused");
    }
}
