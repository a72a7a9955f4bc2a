use serde_json::Value;

/// Get-or-default lookups over a loosely typed JSON tree.
///
/// Every accessor walks `path` one object key at a time. An absent key, a
/// non-object intermediate or a leaf of the wrong type yields `default`.
pub trait ValueExt {
    fn at(&self, path: &[&str]) -> Option<&Value>;

    fn f64_at(&self, path: &[&str], default: f64) -> f64 {
        self.at(path).and_then(Value::as_f64).unwrap_or(default)
    }

    /// Floats are truncated toward zero.
    fn i64_at(&self, path: &[&str], default: i64) -> i64 {
        match self.at(path) {
            Some(v) => v
                .as_i64()
                .or_else(|| v.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
                .unwrap_or(default),
            None => default,
        }
    }

    fn str_at<'a>(&'a self, path: &[&str], default: &'a str) -> &'a str {
        self.at(path).and_then(Value::as_str).unwrap_or(default)
    }
}

impl ValueExt for Value {
    fn at(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |node, key| node.as_object()?.get(*key))
    }
}
