//! HTML escaping for strings handed back by `safe_get_string`.

/// Escapes `&`, `<`, `>`, `"` and `'` as HTML entities.
///
/// Quotes come out as the named and hex forms `&quot;` and `&#x27;`, not
/// the decimal `&#34;` and `&#39;` some other escapers emit. Browsers decode
/// both the same way.
///
/// Already-escaped input is escaped again (`&lt;` becomes `&amp;lt;`).
pub fn escape_html(input: &str) -> String {
    html_escape::encode_quoted_attribute(input).into_owned()
}
