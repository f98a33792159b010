//! Per-field serialization tags.
//!
//! A tag body has the form `name[,option...]`. The literal body `-` marks a
//! field that is never serialized. The only option the schema engine acts on
//! is `extension`; other options (`omitempty`, `flatten`, ...) belong to the
//! emitter and are ignored here. An empty name part keeps the default, which
//! is the field's own name.

/// Tag body that drops a field from the wire format.
pub const SKIP_MARKER: &str = "-";

/// Tag option that reclassifies a primitive field as an extension payload.
pub const EXTENSION_OPTION: &str = "extension";

/// A parsed field tag.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct FieldTag {
    /// Explicit wire name, if the body gave a non-empty one.
    pub name: Option<String>,
    /// The `extension` option was present.
    pub extension: bool,
    /// The body was the skip marker.
    pub skip: bool,
}

impl FieldTag {
    /// Parse a tag body such as `user_id`, `,extension` or `-`.
    pub fn parse(body: &str) -> Self {
        let mut parts = body.split(',');
        let name = parts.next().unwrap_or_default().trim();
        if name == SKIP_MARKER {
            return FieldTag {
                skip: true,
                ..FieldTag::default()
            };
        }
        let extension = parts.any(|option| option.trim() == EXTENSION_OPTION);
        FieldTag {
            name: (!name.is_empty()).then(|| name.to_owned()),
            extension,
            skip: false,
        }
    }

    /// Extract the `key:"..."` entry from a conventional struct-tag string
    /// (optionally still wrapped in backquotes) and parse its body.
    ///
    /// Returns `None` when the key is absent or the tag string is malformed.
    pub fn from_struct_tag(raw: &str, key: &str) -> Option<Self> {
        lookup(raw.trim().trim_matches('`'), key).map(|body| Self::parse(&body))
    }
}

/// Find `key` in a space-separated list of `name:"quoted value"` pairs.
fn lookup(mut rest: &str, key: &str) -> Option<String> {
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        let name_end = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\x7f')
            .unwrap_or(rest.len());
        if name_end == 0 || !rest[name_end..].starts_with(":\"") {
            return None;
        }
        let name = &rest[..name_end];
        rest = &rest[name_end + 1..];

        // `rest` starts at the opening quote.
        let bytes = rest.as_bytes();
        let mut end = 1;
        while end < bytes.len() && bytes[end] != b'"' {
            if bytes[end] == b'\\' {
                end += 1;
            }
            end += 1;
        }
        if end >= bytes.len() {
            return None;
        }
        let quoted = &rest[1..end];
        rest = &rest[end + 1..];

        if name == key {
            return Some(unescape(quoted));
        }
    }
}

fn unescape(quoted: &str) -> String {
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
