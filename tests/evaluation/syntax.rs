#[cfg(test)]
mod syntax {
    use std::sync::Arc;

    use apitest::evaluation::{evaluate, Base, Context, EvaluationError, Interpreter, MixinError};
    use apitest::language::{Setup, Value};
    use apitest::parsing;
    use serde_json::json;

    const FIXED_ID: &str = "5c3f1a2b9d8e7f6a5b4c3d2e";

    fn fixed_id(_: &[Value]) -> Result<Value, String> {
        Ok(Value::Id(FIXED_ID.to_string()))
    }

    fn fixed_str(_: &[Value]) -> Result<Value, String> {
        Ok(Value::from("hi"))
    }

    fn fixed_random(_: &[Value]) -> Result<Value, String> {
        Value::from_f64(0.17).ok_or_else(|| "not finite".to_string())
    }

    /// Built ins with the random generators pinned down.
    fn base() -> Arc<Base> {
        Arc::new(
            Base::standard()
                .with_helper("randomId", fixed_id)
                .with_helper("randomStr", fixed_str)
                .with_helper("Math.random", fixed_random)
                .with_value("today", Value::from("2026-10-18")),
        )
    }

    fn context() -> Context {
        let mut context = Context::new(base());
        context.set(
            "user",
            Value::from(json!({
                "name": "John",
                "password": "123",
                "address": {"city": "Porto", "zip": "4000"}
            })),
        );
        context.set(
            "order",
            Value::from(json!({
                "items": [
                    {"name": "cake", "quantity": 2},
                    {"name": "tea", "quantity": 1}
                ],
                "notes": "ring twice"
            })),
        );
        context
    }

    /// Evaluate the single declaration in a document made of the given
    /// block.
    fn declare(block: &str) -> Result<Value, EvaluationError> {
        let content = format!("# t\n## Setup\n### it is\n{}\n## Case\n", block);
        let test = parsing::parse(&content)
            .unwrap_or_else(|e| panic!("Failed to parse {:?}: {:?}", content, e));

        match &test.setups[..] {
            [Setup::Declaration { template, .. }] => {
                evaluate(template, &context(), &Interpreter, "<it is>")
            }
            other => panic!("Expected one declaration, found {:?}", other),
        }
    }

    #[test]
    fn literals_and_expressions() {
        let value = declare(
            "\tname: \"Chocolate\" + \" \" + \"Cake\"\n\tprice: (314/100).toFixed(2) // in euro\n\tcount: 2 * 3 - 1\n\tready: true\n\tnothing: null",
        )
        .unwrap();
        assert_eq!(
            value,
            Value::from(json!({
                "name": "Chocolate Cake",
                "price": "3.14",
                "count": 5,
                "ready": true,
                "nothing": null
            }))
        );
    }

    #[test]
    fn helpers_and_namespaces() {
        let value = declare("\tid: randomId()\n\tname: randomStr()\n\tluck: Math.random()").unwrap();

        let mut expected = match Value::from(json!({"name": "hi", "luck": 0.17})) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        expected.insert("id".to_string(), Value::Id(FIXED_ID.to_string()));
        assert_eq!(value, Value::Object(expected));
    }

    #[test]
    fn lookups_into_context() {
        let value = declare("\tcity: user.address.city\n\tfirst: order.items[0].name\n\tcount: order.items.length").unwrap();
        assert_eq!(
            value,
            Value::from(json!({"city": "Porto", "first": "cake", "count": 2}))
        );
    }

    #[test]
    fn base_values_yield_to_locals() {
        let value = declare("\tdate: today\n\tname: user.name").unwrap();
        assert_eq!(value, Value::from(json!({"date": "2026-10-18", "name": "John"})));

        let mut context = context();
        context.set("today", Value::from("tomorrow"));
        assert_eq!(context.get("today"), Some(&Value::from("tomorrow")));
    }

    #[test]
    fn arrays_nest() {
        let value = declare("\t*\t1\n\t*\t*\t\"a\"\n\t\t*\t\"b\"\n\t*\tname: user.name").unwrap();
        assert_eq!(value, Value::from(json!([1, ["a", "b"], {"name": "John"}])));
    }

    #[test]
    fn optional_keys_dropped_when_null() {
        let value = declare("\tname: user.name\n\tnickname?: user.nickname\n\tcity?: user.address.city").unwrap();
        assert_eq!(value, Value::from(json!({"name": "John", "city": "Porto"})));
    }

    #[test]
    fn type_tags() {
        let value = declare("\ttoken: String\n\tid: ObjectId\n\tlegacy: ObjectID").unwrap();
        match value {
            Value::Object(map) => {
                assert_eq!(map["token"].to_text(), "String");
                assert_eq!(map["id"], map["legacy"]);
            }
            other => panic!("Expected an object, got {:?}", other),
        }
    }

    #[test]
    fn mixin_without_and_with() {
        let value = declare("\tuser without password; with\n\t\taddress.city: \"Lisbon\"\n\t\tage: 36").unwrap();
        assert_eq!(
            value,
            Value::from(json!({
                "name": "John",
                "age": 36,
                "address": {"city": "Lisbon", "zip": "4000"}
            }))
        );
    }

    #[test]
    fn mixin_leaves_context_untouched() {
        let context = context();
        let before = context
            .get("user")
            .cloned();

        let content = "# t\n## Setup\n### it is\n\tuser without password\n## Case\n";
        let test = parsing::parse(content).unwrap();
        if let Setup::Declaration { template, .. } = &test.setups[0] {
            evaluate(template, &context, &Interpreter, "<it is>").unwrap();
        }

        assert_eq!(context.get("user").cloned(), before);
    }

    #[test]
    fn mixin_applies_across_arrays() {
        let value = declare("\torder without items.quantity, notes").unwrap();
        assert_eq!(
            value,
            Value::from(json!({"items": [{"name": "cake"}, {"name": "tea"}]}))
        );

        let value = declare("\torder with items.0.quantity: 5").unwrap();
        assert_eq!(
            value,
            Value::from(json!({
                "items": [
                    {"name": "cake", "quantity": 5},
                    {"name": "tea", "quantity": 1}
                ],
                "notes": "ring twice"
            }))
        );

        let value = declare("\torder.items with\n\t\t2: \"biscuits\"").unwrap();
        assert_eq!(
            value,
            Value::from(json!([
                {"name": "cake", "quantity": 2},
                {"name": "tea", "quantity": 1},
                "biscuits"
            ]))
        );
    }

    #[test]
    fn mixin_inline_at_key() {
        let value = declare("\tuser: user with password: \"1234\"").unwrap();
        assert_eq!(
            value,
            Value::from(json!({
                "user": {
                    "name": "John",
                    "password": "1234",
                    "address": {"city": "Porto", "zip": "4000"}
                }
            }))
        );
    }

    #[test]
    fn failures_say_where() {
        let error = declare("\tuser:\n\t\tname: missing.thing").unwrap_err();
        assert_eq!(error.label(), "<it is>.user.name");
        match error {
            EvaluationError::Expression {
                expression,
                message,
                ..
            } => {
                assert_eq!(expression, "missing.thing");
                assert_eq!(message, "missing is not defined");
            }
            other => panic!("Unexpected {:?}", other),
        }

        let error = declare("\torder without items.5").unwrap_err();
        assert_eq!(
            error,
            EvaluationError::Mixin {
                label: "<it is>".to_string(),
                error: MixinError::IndexOutOfBounds("order.items".to_string(), 5, 2),
            }
        );

        let error = declare("\tuser without nickname").unwrap_err();
        assert_eq!(
            error,
            EvaluationError::Mixin {
                label: "<it is>".to_string(),
                error: MixinError::MissingKey("user.nickname".to_string()),
            }
        );
    }
}
