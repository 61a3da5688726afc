//! Field naming conventions

/// How Rust field names are rendered on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingConvention {
    /// `page_size` → `pageSize`, `PageSize` → `pageSize`
    #[default]
    CamelCase,
    /// Names are sent unchanged
    AsIs,
}

impl NamingConvention {
    /// Render `name` according to the convention.
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::AsIs => name.to_string(),
            Self::CamelCase => to_camel_case(name),
        }
    }
}

fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;

    for ch in name.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
            continue;
        }
        if out.is_empty() {
            out.extend(ch.to_lowercase());
        } else if upper_next {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        upper_next = false;
    }

    out
}
