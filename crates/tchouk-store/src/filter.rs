use crate::backend::Document;

/// A document matches when its top-level field/value pairs are a superset
/// of the filter's pairs, compared structurally. The empty filter matches
/// every document.
pub fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, want)| doc.get(key) == Some(want))
}
