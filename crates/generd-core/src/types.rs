/// Engine-native type names and the canonical name each one collapses to.
///
/// Keys are matched exactly as the catalog reports them. Several engine
/// types are listed with themselves as the target so the vocabulary is
/// explicit about what is already canonical.
pub const TYPE_ALIASES: &[(&str, &str)] = &[
    // postgres
    ("integer", "int"),
    ("timestamp without time zone", "timestamp"),
    ("timestamp with time zone", "timestamptz"),
    ("character varying", "varchar"),
    ("character", "char"),
    ("boolean", "bool"),
    ("double precision", "double"),
    ("real", "float"),
    ("numeric", "decimal"),
    // mysql
    ("tinyint", "tinyint"),
    ("smallint", "smallint"),
    ("mediumint", "mediumint"),
    ("bigint", "bigint"),
    ("datetime", "datetime"),
    // sql server
    ("nvarchar", "nvarchar"),
    ("nchar", "nchar"),
    ("bit", "bit"),
    ("money", "money"),
    // oracle
    ("number", "number"),
    ("varchar2", "varchar2"),
    ("clob", "clob"),
    ("blob", "blob"),
];

/// Map an engine-native column type to its canonical name.
///
/// Unknown types pass through verbatim.
pub fn normalize_type(raw: &str) -> String {
    TYPE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == raw)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| raw.to_string())
}
