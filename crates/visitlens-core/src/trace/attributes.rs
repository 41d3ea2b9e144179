//! Ordered key/value annotations.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// Attribute value, rendered to text at construction time.
///
/// Integers use plain decimal, floats use six fractional digits, so the
/// rendering never depends on locale or on when the span is exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue(String);

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        Self(v.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl From<&String> for AttributeValue {
    fn from(v: &String) -> Self {
        Self(v.clone())
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        Self(v.to_string())
    }
}

macro_rules! integer_attribute {
    ($($t:ty),*) => {
        $(impl From<$t> for AttributeValue {
            fn from(v: $t) -> Self {
                Self(v.to_string())
            }
        })*
    };
}

integer_attribute!(i16, i32, i64, u16, u32, u64, usize);

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        Self(format!("{v:.6}"))
    }
}

impl From<f32> for AttributeValue {
    fn from(v: f32) -> Self {
        Self::from(f64::from(v))
    }
}

/// Insertion-ordered attribute list. Duplicate and empty keys are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeSet {
    items: Vec<Attribute>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.items.push(Attribute {
            key: key.into(),
            value: value.into().0,
        });
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// `key=value` pairs separated by single spaces.
impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, a) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", a.key, a.value)?;
        }
        Ok(())
    }
}
