use generd_core::{Error, Result};

/// A positional query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Text(String),
    /// Bound as one array value; only engines with array binding use it.
    TextArray(Vec<String>),
}

/// SQL text plus parameters in binding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

impl CatalogQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, value: impl Into<String>) -> Self {
        self.params.push(QueryParam::Text(value.into()));
        self
    }

    pub fn bind_all(mut self, values: &[String]) -> Self {
        self.params
            .extend(values.iter().cloned().map(QueryParam::Text));
        self
    }

    pub fn bind_array(mut self, values: &[String]) -> Self {
        self.params.push(QueryParam::TextArray(values.to_vec()));
        self
    }
}

/// One result row with every value decoded as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRow {
    fields: Vec<(String, Option<String>)>,
}

impl CatalogRow {
    pub fn new(fields: Vec<(String, Option<String>)>) -> Self {
        Self { fields }
    }

    pub fn from_pairs<const N: usize>(pairs: [(&str, &str); N]) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, value)| (name.to_string(), Some(value.to_string())))
                .collect(),
        )
    }

    /// Look up a field by label, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| value.as_deref())
    }

    /// Like [`CatalogRow::get`] but a missing or NULL field is an error.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| Error::Db(format!("catalog row is missing field `{name}`")))
    }

    pub fn require_owned(&self, name: &str) -> Result<String> {
        self.require(name).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lookup_ignores_case() {
        let row = CatalogRow::from_pairs([("TABLE_NAME", "USERS")]);
        assert_eq!(row.get("table_name"), Some("USERS"));
    }

    #[test]
    fn null_field_is_reported_as_missing() {
        let row = CatalogRow::new(vec![("target_column".into(), None)]);
        let err = row.require("target_column").unwrap_err();
        assert!(err.to_string().contains("target_column"));
    }
}
