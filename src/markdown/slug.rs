/// Turn heading text into an anchor identifier.
///
/// ASCII letters are lowercased, spaces become hyphens, and everything else
/// outside `[a-z0-9-]` is dropped. Runs of hyphens left behind by the
/// stripping collapse into one, so `API & Usage` becomes `api-usage`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        let c = if c == ' ' { '-' } else { c.to_ascii_lowercase() };
        let keep = c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-';
        if !keep || (c == '-' && slug.ends_with('-')) {
            continue;
        }
        slug.push(c);
    }
    slug
}
