//! Parameterized test configuration and name generation

use crate::value::render;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Options of `Container::parameterized_test`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterizedTest {
    /// When non-empty, the generated tests are grouped in a nested section
    /// with this name
    #[serde(rename = "displayName")]
    pub display_name: String,

    /// Name template with `${key}` placeholders
    #[serde(rename = "parameterizedTestNameTemplate")]
    pub name_template: String,

    /// One argument set per generated test
    #[serde(rename = "valuesSource")]
    pub values: Vec<Value>,

    /// Argument sets carrying their own test name
    #[serde(rename = "valuesSourceCustomName")]
    pub custom_named: Vec<NamedArgs>,
}

/// An argument set with an explicit test name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedArgs {
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub args: Value,
}

impl NamedArgs {
    pub fn new(display_name: impl Into<String>, args: Value) -> Self {
        Self {
            display_name: display_name.into(),
            args,
        }
    }
}

/// Name and handler arguments of one generated test
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTest {
    pub name: String,
    pub args: Vec<Value>,
}

impl ParameterizedTest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn name_template(mut self, template: impl Into<String>) -> Self {
        self.name_template = template.into();
        self
    }

    pub fn values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.values = values.into_iter().collect();
        self
    }

    pub fn custom_named(mut self, named: impl IntoIterator<Item = NamedArgs>) -> Self {
        self.custom_named = named.into_iter().collect();
        self
    }

    /// Generate one test per value, then one per custom-named entry.
    ///
    /// Indexes are 1-based and run across both sources.
    pub fn expand(&self) -> Vec<GeneratedTest> {
        let values = self.values.iter().map(|value| (None, value));
        let named = self
            .custom_named
            .iter()
            .map(|entry| (Some(entry.display_name.as_str()), &entry.args));

        values
            .chain(named)
            .enumerate()
            .map(|(i, (custom_name, value))| {
                let index = i + 1;
                let name = match custom_name {
                    Some(name) => name.to_string(),
                    None if self.name_template.is_empty() => {
                        format!("{} {}", index, render(value))
                    }
                    None => substitute(&self.name_template, value, index),
                };
                GeneratedTest {
                    name,
                    args: handler_args(value),
                }
            })
            .collect()
    }
}

/// Arguments a handler receives for one argument set: arrays are spread,
/// anything else is passed as a single argument
pub fn handler_args(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

fn placeholders(value: &Value, index: usize) -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert("index".to_string(), index.to_string());
    map.insert("arguments".to_string(), render(value));
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                map.insert(i.to_string(), render(item));
            }
        }
        Value::Object(fields) => {
            for (key, field) in fields {
                map.insert(key.clone(), render(field));
            }
        }
        scalar => {
            map.insert("0".to_string(), render(scalar));
        }
    }
    map
}

/// Replace every `${key}` token of `template`; unknown keys stay verbatim
pub fn substitute(template: &str, value: &Value, index: usize) -> String {
    let map = placeholders(value, index);
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) if !after[..end].contains('\n') => {
                let key = &after[..end];
                match map.get(key) {
                    Some(replacement) => out.push_str(replacement),
                    None => {
                        out.push_str("${");
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push_str("${");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn names(config: &ParameterizedTest) -> Vec<String> {
        config.expand().into_iter().map(|g| g.name).collect()
    }

    #[test]
    fn test_template_with_index_and_first_value() {
        let config = ParameterizedTest::new()
            .name_template("Index:${index} - First:${0}")
            .values([json!("a"), json!("b")]);
        assert_eq!(names(&config), vec!["Index:1 - First:a", "Index:2 - First:b"]);
    }

    #[test]
    fn test_default_names() {
        let config = ParameterizedTest::new().values([json!(12), json!([1, 2]), json!("x")]);
        assert_eq!(names(&config), vec!["1 12", "2 1,2", "3 x"]);
    }

    #[test]
    fn test_custom_names_follow_values() {
        let config = ParameterizedTest::new()
            .name_template("T${index}")
            .values([json!(1)])
            .custom_named([NamedArgs::new("named one", json!([4, 5]))]);
        let generated = config.expand();
        assert_eq!(generated[0].name, "T1");
        assert_eq!(generated[1].name, "named one");
        assert_eq!(generated[1].args, vec![json!(4), json!(5)]);
    }

    #[rstest]
    #[case("${a}-${b}", json!({"a": 1, "b": "two"}), "1-two")]
    #[case("${0}+${1}=${arguments}", json!([1, 2]), "1+2=1,2")]
    #[case("${missing} ${index}", json!(7), "${missing} 3")]
    #[case("${unclosed", json!(1), "${unclosed")]
    #[case("no tokens", json!(1), "no tokens")]
    #[case("${index}", json!({"index": "own"}), "own")]
    fn test_substitute(#[case] template: &str, #[case] value: Value, #[case] expected: &str) {
        assert_eq!(substitute(template, &value, 3), expected);
    }

    #[rstest]
    #[case(json!(3), vec![json!(3)])]
    #[case(json!([1, "b"]), vec![json!(1), json!("b")])]
    #[case(json!({"k": 1}), vec![json!({"k": 1})])]
    fn test_handler_args(#[case] value: Value, #[case] expected: Vec<Value>) {
        assert_eq!(handler_args(&value), expected);
    }

    #[test]
    fn test_deserialize_camel_case_options() {
        let config: ParameterizedTest = serde_json::from_value(json!({
            "displayName": "group",
            "valuesSource": [1, 2],
            "valuesSourceCustomName": [{"displayName": "n", "args": [3]}]
        }))
        .unwrap();
        assert_eq!(config.display_name, "group");
        assert_eq!(config.values.len(), 2);
        assert_eq!(config.custom_named[0].display_name, "n");
        assert!(config.name_template.is_empty());
    }
}
