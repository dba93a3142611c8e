use crate::value::Value;

/// A single-predicate equality query: match records whose field named
/// `column` equals `value`. Scans run in record insertion order, so the
/// first match is always the first-inserted match.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub column: String,
    pub value: Value,
    /// When set, a miss is a `RecordNotFound` error instead of an empty
    /// result.
    pub throw_on_miss: bool,
}

impl Query {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            throw_on_miss: false,
        }
    }

    /// Make a miss an error rather than an empty result.
    pub fn or_fail(mut self) -> Self {
        self.throw_on_miss = true;
        self
    }
}
