//! Canonical label keys.

use std::collections::BTreeMap;
use std::fmt;

/// Canonical form of a label-name -> label-value mapping.
///
/// Label names are sorted lexicographically and joined as `name:value;`, so two
/// mappings with identical contents produce the same key no matter what order
/// they were supplied in. `\`, `:` and `;` inside names or values are
/// backslash-escaped so distinct mappings can never collide.
///
/// When a name is supplied twice the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelKey {
    canonical: String,
    pairs: Vec<(String, String)>,
}

impl LabelKey {
    /// Key for the label-free series.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Canonicalize a borrowed label slice.
    pub fn new(labels: &[(&str, &str)]) -> Self {
        labels.iter().copied().collect()
    }

    /// Canonical `name:value;` string.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Label pairs sorted by name.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for LabelKey
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let sorted: BTreeMap<String, String> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let mut canonical = String::new();
        for (name, value) in &sorted {
            push_escaped(&mut canonical, name);
            canonical.push(':');
            push_escaped(&mut canonical, value);
            canonical.push(';');
        }

        Self {
            canonical,
            pairs: sorted.into_iter().collect(),
        }
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

fn push_escaped(out: &mut String, s: &str) {
    for c in s.chars() {
        if matches!(c, '\\' | ':' | ';') {
            out.push('\\');
        }
        out.push(c);
    }
}
