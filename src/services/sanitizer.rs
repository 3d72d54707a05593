//! Rich-text sanitizer for record content.
//!
//! Record `content` (and sometimes `title`) is HTML straight from the backend.
//! Everything passes through [`sanitize_html`] before it is rendered as
//! markup, or through [`strip_tags`] before it is rendered as text. Plain
//! fields printed to a terminal go through [`strip_control`].

/// Elements removed together with everything inside them.
const DROP_WITH_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "frame", "frameset",
];

/// Elements kept as markup. Any other tag is removed but its text is kept.
const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "div", "em", "figcaption", "figure", "h1", "h2", "h3",
    "h4", "h5", "h6", "hr", "i", "img", "li", "ol", "p", "pre", "span", "strong", "table",
    "tbody", "td", "th", "thead", "tr", "u", "ul",
];

/// Attributes kept on allowed elements.
const ALLOWED_ATTRS: &[&str] = &["href", "src", "alt", "title"];

/// Returns `html` reduced to an allowlisted subset safe to render.
pub fn sanitize_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        rest = &rest[lt..];

        if let Some(after) = rest.strip_prefix("<!--") {
            rest = match after.find("-->") {
                Some(end) => &after[end + 3..],
                None => "",
            };
            continue;
        }

        let Some(end) = find_tag_end(rest) else {
            // unterminated tag: treat the rest as text
            out.push_str(&rest.replace('<', "&lt;"));
            return out;
        };
        let Some(tag) = parse_tag(&rest[1..end]) else {
            // not a tag: the '<' is text, keep scanning after it
            out.push_str("&lt;");
            rest = &rest[1..];
            continue;
        };
        rest = &rest[end + 1..];

        if DROP_WITH_CONTENT.contains(&tag.name.as_str()) {
            if !tag.closing && !tag.self_closing {
                rest = skip_past_closing(rest, &tag.name);
            }
            continue;
        }

        if !ALLOWED_TAGS.contains(&tag.name.as_str()) {
            continue;
        }

        if tag.closing {
            out.push_str("</");
            out.push_str(&tag.name);
            out.push('>');
            continue;
        }

        out.push('<');
        out.push_str(&tag.name);
        for (name, value) in &tag.attrs {
            if !ALLOWED_ATTRS.contains(&name.as_str()) || !is_safe_url(name, value) {
                continue;
            }
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        if tag.self_closing {
            out.push_str(" /");
        }
        out.push('>');
    }

    out.push_str(rest);
    out
}

/// Returns the visible text of `html`, with scripts and styles removed,
/// common entities decoded and whitespace collapsed.
pub fn strip_tags(html: &str) -> String {
    let safe = sanitize_html(html);
    let mut text = String::with_capacity(safe.len());
    let mut in_tag = false;
    for ch in safe.chars() {
        match ch {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    let decoded = strip_control(&decode_entities(&text));
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes control characters other than newline and tab, so backend text
/// cannot carry terminal escape sequences.
pub fn strip_control(text: &str) -> String {
    text.chars()
        .filter(|&c| c == '\n' || c == '\t' || !c.is_control())
        .collect()
}

struct Tag {
    name: String,
    closing: bool,
    self_closing: bool,
    attrs: Vec<(String, String)>,
}

/// Finds the `>` closing a tag that starts at `s[0] == '<'`, skipping quoted
/// attribute values.
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, ch) in s.char_indices().skip(1) {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '>') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Parses the text between `<` and `>`. Whitespace right after `<` means the
/// `<` is literal text, as in `a < b`.
fn parse_tag(inner: &str) -> Option<Tag> {
    if inner.starts_with(char::is_whitespace) {
        return None;
    }
    let trimmed = inner.trim_end();
    let (closing, body) = match trimmed.strip_prefix('/') {
        Some(b) => (true, b.trim_start()),
        None => (false, trimmed),
    };
    let (self_closing, body) = match body.strip_suffix('/') {
        Some(b) => (true, b),
        None => (false, body),
    };

    let name_len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    if name_len == 0 || !body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let name = body[..name_len].to_ascii_lowercase();
    let attrs = if closing {
        Vec::new()
    } else {
        parse_attrs(&body[name_len..])
    };

    Some(Tag {
        name,
        closing,
        self_closing,
        attrs,
    })
}

fn parse_attrs(mut s: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    loop {
        s = s.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if s.is_empty() {
            return attrs;
        }
        let name_end = s
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(s.len());
        let name = s[..name_end].to_ascii_lowercase();
        s = s[name_end..].trim_start();

        let value = if let Some(after_eq) = s.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    let end = body.find(q).unwrap_or(body.len());
                    s = body.get(end + 1..).unwrap_or("");
                    body[..end].to_string()
                }
                _ => {
                    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                    s = &after_eq[end..];
                    after_eq[..end].to_string()
                }
            }
        } else {
            String::new()
        };

        if !name.is_empty() {
            attrs.push((name, value));
        }
    }
}

/// Skips past `</name ...>`, case-insensitively. Without a closing tag the
/// rest of the input is dropped.
fn skip_past_closing<'a>(s: &'a str, name: &str) -> &'a str {
    let needle = format!("</{}", name);
    let lower = s.to_ascii_lowercase();
    match lower.find(&needle) {
        Some(start) => match s[start..].find('>') {
            Some(end) => &s[start + end + 1..],
            None => "",
        },
        None => "",
    }
}

fn is_safe_url(attr: &str, value: &str) -> bool {
    if attr != "href" && attr != "src" {
        return true;
    }
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if normalized.starts_with("javascript:") || normalized.starts_with("vbscript:") {
        return false;
    }
    if normalized.starts_with("data:") {
        return attr == "src" && normalized.starts_with("data:image/");
    }
    true
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
