//! Product tag content
//!
//! Product tags store fields in their first text record separated by
//! `|:|`, e.g. `"FI0047|:|102"` for type `FI0047`, version `102`. The
//! second record carries the type description.

/// Field separator inside a text record
pub const FIELD_SEPARATOR: &str = "|:|";

/// Fields of one product text record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    fields: Vec<String>,
}

impl ProductFields {
    /// Split a text record into fields. Never fails.
    pub fn parse(text: &str) -> Self {
        Self {
            fields: text.split(FIELD_SEPARATOR).map(str::to_string).collect(),
        }
    }

    /// All fields in order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Catalog location `"<a>/<a>_<b>"` built from the first two fields
    ///
    /// None if the text has fewer than two fields.
    pub fn catalog_path(&self) -> Option<String> {
        match self.fields.as_slice() {
            [a, b, ..] => Some(format!("{a}/{a}_{b}")),
            _ => None,
        }
    }
}

/// What a product tag's text records say about the product
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductTag {
    /// Catalog location derived from the first record
    pub catalog_path: Option<String>,
    /// Type description from the second record
    pub type_content: Option<String>,
}

impl ProductTag {
    /// Interpret the text records read from a tag
    pub fn from_texts(texts: &[String]) -> Self {
        Self {
            catalog_path: texts
                .first()
                .and_then(|t| ProductFields::parse(t).catalog_path()),
            type_content: texts.get(1).cloned(),
        }
    }
}
