use std::fmt;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Name of the value's kind as written in source declarations.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "bilang",
            Value::Text(_) => "teksto",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Value;

    #[test]
    fn whole_numbers_print_without_fraction() {
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn text_prints_verbatim() {
        assert_eq!(Value::Text("Hi there".to_string()).to_string(), "Hi there");
        assert_eq!(Value::Text(String::new()).to_string(), "");
    }
}
