//! Decoding of the handful of character references common in hand-written
//! pages. Unknown references pass through untouched.

/// Named references understood in text, without the `&` and `;`.
const NAMED_REFERENCES: &[(&str, char)] = &[
    ("lt", '<'),
    ("gt", '>'),
    ("amp", '&'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{00A0}'),
    ("shy", '\u{00AD}'),
    ("copy", '\u{00A9}'),
    ("ndash", '\u{2013}'),
    ("mdash", '\u{2014}'),
];

/// Replace `&name;`, `&#NN;` and `&#xHH;` references in `text`.
#[must_use]
pub fn decode(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        match tail.find(';').and_then(|semi| Some((resolve(&tail[..semi])?, semi))) {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn resolve(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        return char::from_u32(code);
    }
    NAMED_REFERENCES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, ch)| ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_and_numeric() {
        assert_eq!(decode("a &lt;b&gt; &amp; &#65;&#x42;"), "a <b> & AB");
    }

    #[test]
    fn test_unknown_reference_passes_through() {
        assert_eq!(decode("fish &chips; & co"), "fish &chips; & co");
    }
}
