//! A small interpreter for the expressions found in templates: JSON-like
//! literals, names looked up in the context, member and index access, calls
//! to helpers, and arithmetic. Evaluation happens directly while parsing.

use crate::evaluation::context::{Binding, Context};
use crate::evaluation::Evaluate;
use crate::language::{Map, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct Interpreter;

impl Evaluate for Interpreter {
    fn evaluate(&self, source: &str, context: &Context) -> Result<Value, String> {
        let tokens = lex(source)?;
        let mut input = Expression {
            tokens,
            position: 0,
            context,
        };
        let value = input.read_expression()?;
        match input.peek() {
            None => Ok(value),
            Some(token) => Err(format!("Unexpected {}", token)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Text(String),
    Name(String),
    Symbol(char),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(number) => write!(f, "number {}", number),
            Token::Text(text) => write!(f, "string {:?}", text),
            Token::Name(name) => write!(f, "name \"{}\"", name),
            Token::Symbol(c) => write!(f, "'{}'", c),
        }
    }
}

fn lex(source: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = source
        .chars()
        .peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '/' && source_continues_with_comment(&chars) {
            // the rest of the line is a comment
            break;
        } else if c.is_ascii_digit()
            || (c == '.'
                && chars
                    .clone()
                    .nth(1)
                    .map_or(false, |d| d.is_ascii_digit()))
        {
            let mut text = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() || d == '.' || d == 'e' || d == 'E' {
                    text.push(d);
                    chars.next();
                } else if (d == '-' || d == '+') && text.ends_with(['e', 'E']) {
                    text.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            let number = text
                .parse::<f64>()
                .map_err(|_| format!("Invalid number {}", text))?;
            tokens.push(Token::Number(number));
        } else if c == '"' || c == '\'' {
            chars.next();
            let mut text = String::new();
            loop {
                match chars.next() {
                    None => return Err("Unterminated string".to_string()),
                    Some(d) if d == c => break,
                    Some('\\') => match chars.next() {
                        Some('n') => text.push('\n'),
                        Some('t') => text.push('\t'),
                        Some('r') => text.push('\r'),
                        Some(other) => text.push(other),
                        None => return Err("Unterminated string".to_string()),
                    },
                    Some(d) => text.push(d),
                }
            }
            tokens.push(Token::Text(text));
        } else if c.is_alphabetic() || c == '_' || c == '$' {
            let mut name = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_alphanumeric() || d == '_' || d == '$' {
                    name.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Name(name));
        } else if "+-*/%!()[]{},.:".contains(c) {
            tokens.push(Token::Symbol(c));
            chars.next();
        } else {
            return Err(format!("Unexpected character '{}'", c));
        }
    }

    Ok(tokens)
}

fn source_continues_with_comment(chars: &std::iter::Peekable<std::str::Chars>) -> bool {
    let mut lookahead = chars.clone();
    lookahead.next();
    lookahead.next() == Some('/')
}

struct Expression<'c> {
    tokens: Vec<Token>,
    position: usize,
    context: &'c Context,
}

impl<'c> Expression<'c> {
    fn peek(&self) -> Option<&Token> {
        self.tokens
            .get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self
            .tokens
            .get(self.position)
            .cloned();
        self.position += 1;
        token
    }

    fn is_symbol(&self, c: char) -> bool {
        self.peek() == Some(&Token::Symbol(c))
    }

    fn expect_symbol(&mut self, c: char) -> Result<(), String> {
        match self.next() {
            Some(Token::Symbol(d)) if d == c => Ok(()),
            Some(token) => Err(format!("Expected '{}' but found {}", c, token)),
            None => Err(format!("Expected '{}' but the expression ended", c)),
        }
    }

    fn read_expression(&mut self) -> Result<Value, String> {
        self.read_additive()
    }

    fn read_additive(&mut self) -> Result<Value, String> {
        let mut left = self.read_multiplicative()?;
        loop {
            if self.is_symbol('+') {
                self.next();
                let right = self.read_multiplicative()?;
                left = add(&left, &right)?;
            } else if self.is_symbol('-') {
                self.next();
                let right = self.read_multiplicative()?;
                left = arithmetic('-', &left, &right)?;
            } else {
                return Ok(left);
            }
        }
    }

    fn read_multiplicative(&mut self) -> Result<Value, String> {
        let mut left = self.read_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Symbol(c)) if "*/%".contains(*c) => *c,
                _ => return Ok(left),
            };
            self.next();
            let right = self.read_unary()?;
            left = arithmetic(op, &left, &right)?;
        }
    }

    fn read_unary(&mut self) -> Result<Value, String> {
        if self.is_symbol('-') {
            self.next();
            let value = self.read_unary()?;
            let number = value
                .as_f64()
                .ok_or_else(|| format!("Cannot negate {}", value.type_name()))?;
            return finite(-number);
        }
        if self.is_symbol('!') {
            self.next();
            let value = self.read_unary()?;
            return Ok(Value::Bool(!value.is_truthy()));
        }
        self.read_postfix()
    }

    fn read_postfix(&mut self) -> Result<Value, String> {
        let mut value = self.read_primary()?;
        loop {
            if self.is_symbol('.') {
                self.next();
                let name = match self.next() {
                    Some(Token::Name(name)) => name,
                    Some(token) => return Err(format!("Expected a property name but found {}", token)),
                    None => return Err("Expected a property name".to_string()),
                };
                if self.is_symbol('(') {
                    let args = self.read_arguments()?;
                    value = call_method(&value, &name, &args)?;
                } else {
                    value = member(&value, &name)?;
                }
            } else if self.is_symbol('[') {
                self.next();
                let index = self.read_expression()?;
                self.expect_symbol(']')?;
                value = element(&value, &index)?;
            } else {
                return Ok(value);
            }
        }
    }

    fn read_arguments(&mut self) -> Result<Vec<Value>, String> {
        self.expect_symbol('(')?;
        let mut args = Vec::new();
        if self.is_symbol(')') {
            self.next();
            return Ok(args);
        }
        loop {
            args.push(self.read_expression()?);
            if self.is_symbol(',') {
                self.next();
            } else {
                self.expect_symbol(')')?;
                return Ok(args);
            }
        }
    }

    fn read_primary(&mut self) -> Result<Value, String> {
        match self.next() {
            Some(Token::Number(number)) => finite(number),
            Some(Token::Text(text)) => Ok(Value::String(text)),
            Some(Token::Name(name)) => self.read_name(name),
            Some(Token::Symbol('(')) => {
                let value = self.read_expression()?;
                self.expect_symbol(')')?;
                Ok(value)
            }
            Some(Token::Symbol('[')) => self.read_array(),
            Some(Token::Symbol('{')) => self.read_object(),
            Some(token) => Err(format!("Unexpected {}", token)),
            None => Err("Unexpected end of expression".to_string()),
        }
    }

    fn read_name(&mut self, name: String) -> Result<Value, String> {
        match name.as_str() {
            "true" => return Ok(Value::Bool(true)),
            "false" => return Ok(Value::Bool(false)),
            "null" | "undefined" => return Ok(Value::Null),
            _ => {}
        }

        // extend into a dotted helper name such as Math.random
        let mut name = name;
        while self
            .context
            .get(&name)
            .is_none()
            && self
                .context
                .is_namespace(&name)
            && self.is_symbol('.')
        {
            match self
                .tokens
                .get(self.position + 1)
            {
                Some(Token::Name(member)) => {
                    name = format!("{}.{}", name, member);
                    self.position += 2;
                }
                _ => break,
            }
        }

        match self
            .context
            .resolve(&name)
        {
            Some(Binding::Value(value)) => Ok(value.clone()),
            Some(Binding::Helper(helper)) => {
                if !self.is_symbol('(') {
                    return Err(format!("{} is a function and must be called", name));
                }
                let args = self.read_arguments()?;
                helper(&args).map_err(|message| format!("{}(): {}", name, message))
            }
            None => Err(format!("{} is not defined", name)),
        }
    }

    fn read_array(&mut self) -> Result<Value, String> {
        let mut items = Vec::new();
        loop {
            if self.is_symbol(']') {
                self.next();
                return Ok(Value::Array(items));
            }
            items.push(self.read_expression()?);
            if self.is_symbol(',') {
                self.next();
            } else {
                self.expect_symbol(']')?;
                return Ok(Value::Array(items));
            }
        }
    }

    fn read_object(&mut self) -> Result<Value, String> {
        let mut map = Map::new();
        loop {
            let key = match self.next() {
                Some(Token::Symbol('}')) => return Ok(Value::Object(map)),
                Some(Token::Name(key)) | Some(Token::Text(key)) => key,
                Some(token) => return Err(format!("Expected a key but found {}", token)),
                None => return Err("Expected a key".to_string()),
            };
            self.expect_symbol(':')?;
            let value = self.read_expression()?;
            map.insert(key, value);
            if self.is_symbol(',') {
                self.next();
            } else {
                self.expect_symbol('}')?;
                return Ok(Value::Object(map));
            }
        }
    }
}

fn finite(number: f64) -> Result<Value, String> {
    Value::from_f64(number).ok_or_else(|| "Result is not a finite number".to_string())
}

fn add(left: &Value, right: &Value) -> Result<Value, String> {
    match (left, right) {
        (Value::String(_) | Value::Id(_), _) | (_, Value::String(_) | Value::Id(_)) => {
            Ok(Value::String(left.to_text() + &right.to_text()))
        }
        _ => arithmetic('+', left, right),
    }
}

fn arithmetic(op: char, left: &Value, right: &Value) -> Result<Value, String> {
    let (a, b) = match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(format!(
                "Cannot apply '{}' to {} and {}",
                op,
                left.type_name(),
                right.type_name()
            ))
        }
    };
    let result = match op {
        '+' => a + b,
        '-' => a - b,
        '*' => a * b,
        '/' if b == 0.0 => return Err("Division by zero".to_string()),
        '/' => a / b,
        '%' if b == 0.0 => return Err("Division by zero".to_string()),
        '%' => a % b,
        _ => return Err(format!("Unknown operator '{}'", op)),
    };
    finite(result)
}

fn member(value: &Value, name: &str) -> Result<Value, String> {
    match value {
        Value::Object(map) => Ok(map
            .get(name)
            .cloned()
            .unwrap_or(Value::Null)),
        Value::Array(items) | Value::Ordered(items) if name == "length" => {
            Ok(Value::from(items.len() as i64))
        }
        Value::String(text) | Value::Id(text) if name == "length" => Ok(Value::from(
            text.chars()
                .count() as i64,
        )),
        Value::Null => Err(format!("Cannot read property \"{}\" of null", name)),
        _ => Ok(Value::Null),
    }
}

fn element(value: &Value, index: &Value) -> Result<Value, String> {
    match (value, index) {
        (Value::Array(items) | Value::Ordered(items), Value::Number(_)) => {
            let i = index
                .as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .ok_or_else(|| format!("Invalid index {}", index.to_text()))?;
            Ok(items
                .get(i as usize)
                .cloned()
                .unwrap_or(Value::Null))
        }
        (Value::Null, _) => Err(format!("Cannot read property \"{}\" of null", index.to_text())),
        (_, key) => member(value, &key.to_text()),
    }
}

fn call_method(value: &Value, name: &str, args: &[Value]) -> Result<Value, String> {
    match (value, name) {
        (Value::Number(_), "toFixed") => {
            let number = value
                .as_f64()
                .unwrap_or_default();
            let digits = match args.first() {
                None => 0,
                Some(arg) => arg
                    .as_f64()
                    .filter(|f| (0.0..=100.0).contains(f))
                    .ok_or("toFixed() expects a number of digits")? as usize,
            };
            Ok(Value::String(format!("{:.*}", digits, number)))
        }
        (_, "toString") => Ok(Value::String(value.to_text())),
        (Value::String(text), "toUpperCase") => Ok(Value::String(text.to_uppercase())),
        (Value::String(text), "toLowerCase") => Ok(Value::String(text.to_lowercase())),
        (Value::String(text), "trim") => Ok(Value::String(
            text.trim()
                .to_string(),
        )),
        _ => Err(format!("{} has no method {}()", value.type_name(), name)),
    }
}
