use std::fmt;

use serde::{Deserialize, Serialize};

/// Operation family a status belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    Import,
    Export,
    Extension,
}

impl ServiceKind {
    /// Single-letter code used in the `s` segment of a key.
    pub fn code(self) -> char {
        match self {
            ServiceKind::Import => 'i',
            ServiceKind::Export => 'e',
            ServiceKind::Extension => 'x',
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceKind::Import => "Import",
            ServiceKind::Export => "Export",
            ServiceKind::Extension => "Extension",
        };
        f.write_str(name)
    }
}

/// Build the store key for a status slot.
///
/// Layout: `{request_id}:s{code}:t{type_prefix}[:e{qualifier}]` where the
/// type prefix is the first two characters of `value_type`, lower-cased, and
/// the qualifier is lower-cased but otherwise kept whole. Never fails; short
/// or empty inputs produce short segments.
pub fn encode_key(
    service: ServiceKind,
    value_type: &str,
    request_id: &str,
    qualifier: Option<&str>,
) -> String {
    let type_prefix: String = value_type.chars().take(2).collect::<String>().to_lowercase();
    let mut key = format!("{request_id}:s{}:t{type_prefix}", service.code());
    if let Some(q) = qualifier {
        key.push_str(":e");
        key.push_str(&q.to_lowercase());
    }
    key
}
