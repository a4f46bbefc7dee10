//! The environment expressions are evaluated in. Lookups go to the local
//! variables of the running Test first, then fall through to a shared base
//! layer of built in values and helper functions.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::language::{Kind, Map, Value};

/// A function callable from expressions.
pub type Helper = fn(&[Value]) -> Result<Value, String>;

/// What a name resolves to.
#[derive(Debug, Clone, Copy)]
pub enum Binding<'c> {
    Value(&'c Value),
    Helper(Helper),
}

/// Built in values and helpers, shared read-only between Contexts.
#[derive(Debug, Clone, Default)]
pub struct Base {
    values: Map,
    helpers: BTreeMap<String, Helper>,
}

impl Base {
    /// The standard set: type tags and random data generators.
    pub fn standard() -> Base {
        let mut base = Base::default();

        for kind in Kind::ALL {
            base.values
                .insert(kind.name().to_string(), Value::Type(kind));
        }
        base.values
            .insert("ObjectID".to_string(), Value::Type(Kind::ObjectId));

        base.with_helper("randomId", random_id)
            .with_helper("randomStr", random_str)
            .with_helper("randomEmail", random_email)
            .with_helper("ordered", ordered)
    }

    pub fn with_value(mut self, name: &str, value: Value) -> Base {
        self.values
            .insert(name.to_string(), value);
        self
    }

    /// Register a helper. Dotted names like `Math.random` are allowed, and
    /// make the prefix usable as a namespace in expressions.
    pub fn with_helper(mut self, name: &str, helper: Helper) -> Base {
        self.helpers
            .insert(name.to_string(), helper);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Context {
    locals: Map,
    base: Arc<Base>,
}

impl Default for Context {
    fn default() -> Self {
        Context::new(Arc::new(Base::standard()))
    }
}

impl Context {
    pub fn new(base: Arc<Base>) -> Context {
        Context {
            locals: Map::new(),
            base,
        }
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.locals
            .insert(name.to_string(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.locals
            .remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.locals
            .get(name)
            .or_else(|| {
                self.base
                    .values
                    .get(name)
            })
    }

    pub fn resolve(&self, name: &str) -> Option<Binding<'_>> {
        if let Some(value) = self.get(name) {
            return Some(Binding::Value(value));
        }
        self.base
            .helpers
            .get(name)
            .map(|helper| Binding::Helper(*helper))
    }

    /// Whether some helper lives under `prefix.`.
    pub fn is_namespace(&self, prefix: &str) -> bool {
        self.base
            .helpers
            .keys()
            .any(|name| {
                name.strip_prefix(prefix)
                    .map_or(false, |rest| rest.starts_with('.'))
            })
    }
}

// helpers

fn random_hex(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let digit = rng.gen_range(0..16u32);
            std::char::from_digit(digit, 16).unwrap_or('0')
        })
        .collect()
}

fn random_id(_: &[Value]) -> Result<Value, String> {
    Ok(Value::Id(random_hex(24)))
}

/// Longest string the random helpers will generate.
const MAX_LENGTH: usize = 4096;

fn requested_length(args: &[Value], default: usize) -> Result<usize, String> {
    let value = match args.first() {
        None | Some(Value::Null) => return Ok(default),
        Some(value) => value,
    };
    let length = value
        .as_f64()
        .filter(|f| *f >= 0.0 && f.fract() == 0.0)
        .ok_or_else(|| format!("Expected a length, not {}", value.to_text()))?;

    if length > MAX_LENGTH as f64 {
        return Err(format!(
            "Length {} is more than the maximum of {}",
            length, MAX_LENGTH
        ));
    }
    Ok(length as usize)
}

fn random_str(args: &[Value]) -> Result<Value, String> {
    let length = requested_length(args, 8)?;
    let text = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect::<String>();
    Ok(Value::String(text))
}

fn random_email(_: &[Value]) -> Result<Value, String> {
    let mut rng = rand::thread_rng();
    let mut word = |length: usize| {
        (0..length)
            .map(|_| rng.gen_range(b'a'..=b'z') as char)
            .collect::<String>()
    };
    let user = word(8);
    let domain = word(8);
    Ok(Value::String(format!("{}@{}.com", user, domain)))
}

/// Mark an array as one the comparator must match index by index.
fn ordered(args: &[Value]) -> Result<Value, String> {
    match args.first() {
        Some(Value::Array(items)) | Some(Value::Ordered(items)) => Ok(Value::Ordered(items.clone())),
        Some(other) => Err(format!("ordered() expects an array, not {}", other.type_name())),
        None => Err("ordered() expects an array".to_string()),
    }
}
