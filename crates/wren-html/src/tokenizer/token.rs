use core::fmt;

/// An attribute on a start tag token.
///
/// Names are case-folded; values have one layer of matching quotes removed.
/// A bare attribute (`<input disabled>`) carries an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Case-folded attribute name.
    pub name: String,
    /// Unquoted attribute value, empty for boolean attributes.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// The tokenizer emits tokens of these types to the tree construction stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of characters between tags, entity references already decoded.
    Text {
        /// The character data.
        data: String,
    },

    /// `<name attr=value ...>`
    StartTag {
        /// Case-folded tag name.
        name: String,
        /// Attributes in source order. Later duplicates win when the
        /// element is created.
        attributes: Vec<Attribute>,
    },

    /// `</name>`
    EndTag {
        /// Case-folded tag name, without the slash.
        name: String,
    },

    /// Anything starting with `!`: doctypes and comments. The tree builder
    /// ignores these.
    Declaration {
        /// Raw interior after the `!`.
        data: String,
    },
}

impl Token {
    /// Build a token from the interior of a `<...>` pair.
    ///
    /// Returns `None` for an empty or all-whitespace interior.
    #[must_use]
    pub fn from_tag_interior(interior: &str) -> Option<Self> {
        let mut parts = interior.split_whitespace();
        let first = parts.next()?;

        if let Some(rest) = interior.trim_start().strip_prefix('!') {
            return Some(Self::Declaration {
                data: rest.to_string(),
            });
        }

        let name = first.to_lowercase();
        if let Some(end_name) = name.strip_prefix('/') {
            return Some(Self::EndTag {
                name: end_name.to_string(),
            });
        }

        let attributes = parts.map(parse_attribute).collect();
        Some(Self::StartTag { name, attributes })
    }
}

/// Parse one whitespace-delimited attribute token.
///
/// `key=value` splits on the first `=`; a value wrapped in matching single
/// or double quotes is unquoted. Anything else is a boolean attribute.
fn parse_attribute(part: &str) -> Attribute {
    match part.split_once('=') {
        Some((key, value)) => Attribute::new(key.to_lowercase(), unquote(value).to_string()),
        None => Attribute::new(part.to_lowercase(), String::new()),
    }
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&open), Some(&close))
            if bytes.len() >= 2 && open == close && (open == b'"' || open == b'\'') =>
        {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { data } => write!(f, "Text({data:?})"),
            Self::StartTag { name, attributes } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    if attr.value.is_empty() {
                        write!(f, " {}", attr.name)?;
                    } else {
                        write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                    }
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Declaration { data } => write!(f, "<!{data}>"),
        }
    }
}
