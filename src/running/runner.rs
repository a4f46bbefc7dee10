use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::comparison::compare;
use crate::evaluation::{evaluate, Base, Context, Evaluate, Interpreter};
use crate::language::{Case, Map, Setup, Test, Value};
use crate::running::error::RunError;
use crate::running::find;
use crate::running::report::{CaseReport, Outcome, TestReport};
use crate::running::{Options, Storage, Transport};

/// Drives Tests one operation at a time: setup steps in declaration order,
/// then each case in turn.
pub struct Runner<S, T, E = Interpreter> {
    storage: S,
    transport: T,
    evaluator: E,
    options: Options,
    base: Arc<Base>,
}

impl<S: Storage, T: Transport> Runner<S, T, Interpreter> {
    pub fn new(storage: S, transport: T, options: Options) -> Runner<S, T, Interpreter> {
        Runner {
            storage,
            transport,
            evaluator: Interpreter,
            options,
            base: Arc::new(Base::standard()),
        }
    }
}

impl<S: Storage, T: Transport, E: Evaluate> Runner<S, T, E> {
    pub fn with_evaluator<F: Evaluate>(self, evaluator: F) -> Runner<S, T, F> {
        Runner {
            storage: self.storage,
            transport: self.transport,
            evaluator,
            options: self.options,
            base: self.base,
        }
    }

    /// Replace the built in values and helpers expressions can see.
    pub fn with_base(mut self, base: Base) -> Self {
        self.base = Arc::new(base);
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn execute(&mut self, test: &Test<'_>) -> TestReport {
        let mut report = TestReport {
            name: test.name.to_string(),
            skipped: test.skip,
            setup: None,
            cases: Vec::new(),
        };

        if test.skip {
            info!(test = test.name, "skipped");
            report.cases = test
                .cases
                .iter()
                .map(|case| CaseReport {
                    name: case.name.to_string(),
                    outcome: Outcome::Skipped,
                })
                .collect();
            return report;
        }

        let mut context = Context::new(self.base.clone());

        if let Err(error) = self.run_setups(&mut context, test).await {
            warn!(test = test.name, %error, "setup failed");
            report.setup = Some(error);
            report.cases = test
                .cases
                .iter()
                .map(|case| CaseReport {
                    name: case.name.to_string(),
                    outcome: Outcome::Blocked,
                })
                .collect();
            return report;
        }

        for case in &test.cases {
            let outcome = if case.skip {
                info!(case = case.name, "skipped");
                Outcome::Skipped
            } else {
                match self.run_case(&mut context, test, case).await {
                    Ok(()) => {
                        info!(case = case.name, "passed");
                        Outcome::Passed
                    }
                    Err(error) => {
                        warn!(case = case.name, %error, "failed");
                        Outcome::Failed(error)
                    }
                }
            };
            report.cases.push(CaseReport {
                name: case.name.to_string(),
                outcome,
            });
        }

        report
    }

    async fn run_setups(&mut self, context: &mut Context, test: &Test<'_>) -> Result<(), RunError> {
        for setup in &test.setups {
            match setup {
                Setup::Clear { collection } => {
                    debug!(collection, "clear");
                    self.storage
                        .clear_collection(collection)
                        .await
                        .map_err(RunError::Storage)?;
                }
                Setup::Insertion {
                    name,
                    collection,
                    template,
                } => {
                    let label = format!("<{} in {}>", name, collection);
                    let mut document = evaluate(template, context, &self.evaluator, &label)?;
                    if let Some(defaults) = self
                        .options
                        .default_documents
                        .get(*collection)
                    {
                        merge_defaults(&mut document, &Value::from(defaults.clone()));
                    }

                    debug!(name, collection, "insert");
                    let id = self
                        .storage
                        .insert_one(collection, &document.to_json())
                        .await
                        .map_err(RunError::Storage)?;

                    if let Value::Object(map) = &mut document {
                        map.entry("_id".to_string())
                            .or_insert_with(|| Value::from_id(id));
                    }
                    context.set(name, document);
                }
                Setup::Declaration { name, template } => {
                    let label = format!("<{} is>", name);
                    let value = evaluate(template, context, &self.evaluator, &label)?;
                    debug!(name, "declare");
                    context.set(name, value);
                }
            }
        }
        Ok(())
    }

    async fn run_case(
        &mut self,
        context: &mut Context,
        test: &Test<'_>,
        case: &Case<'_>,
    ) -> Result<(), RunError> {
        let mut prev = Map::new();
        prev.insert(
            "post".to_string(),
            context
                .remove("post")
                .unwrap_or(Value::Null),
        );
        prev.insert(
            "out".to_string(),
            context
                .remove("out")
                .unwrap_or(Value::Null),
        );
        context.set("prev", Value::Object(prev));

        let post = evaluate(&case.post, context, &self.evaluator, "<post>")?;
        context.set("post", post.clone());

        let url = self
            .options
            .url(case.endpoint(test));
        debug!(case = case.name, %url, "post");
        let response = self
            .transport
            .post_json(&url, &post.to_json())
            .await
            .map_err(RunError::Transport)?;

        let actual = Value::from(response.body);
        context.set("out", actual.clone());
        debug!(case = case.name, status = response.status, "out");

        if response.status != case.status {
            return Err(RunError::Status {
                expected: case.status,
                actual: response.status,
                body: actual,
            });
        }

        if let Some(template) = &case.out {
            let expected = evaluate(template, context, &self.evaluator, "<out>")?;
            if let Err(mismatch) = compare(&actual, &expected, self.options.strict, &[]) {
                return Err(RunError::Output {
                    mismatch,
                    post,
                    actual,
                    expected,
                });
            }
        }

        for item in &case.finds {
            debug!(case = case.name, collection = item.collection, "find");
            find::resolve(
                &mut self.storage,
                item,
                context,
                &self.evaluator,
                &self.options,
            )
            .await?;
        }

        Ok(())
    }
}

/// Fill in keys the document doesn't have from the defaults, recursively.
fn merge_defaults(document: &mut Value, defaults: &Value) {
    if let (Value::Object(target), Value::Object(source)) = (document, defaults) {
        for (key, value) in source {
            match target.get_mut(key) {
                Some(existing) => merge_defaults(existing, value),
                None => {
                    target.insert(key.clone(), value.clone());
                }
            }
        }
    }
}
