//! Plain-text rendering of HTML message bodies.

/// Entities decoded after tags are removed.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    // Last, so `&amp;lt;` stays `&lt;`.
    ("&amp;", "&"),
];

/// Converts an HTML body to readable text.
///
/// Line breaks and paragraph ends become newlines, remaining tags are
/// dropped, common entities are decoded, and blank lines are removed.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let with_breaks = html
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("</p>", "\n\n")
        .replace("</div>", "\n");

    let mut text = String::with_capacity(with_breaks.len());
    let mut in_tag = false;
    for c in with_breaks.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = ENTITIES
        .iter()
        .fold(text, |acc, (entity, plain)| acc.replace(entity, plain));

    decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
