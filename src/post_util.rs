use crate::errors::BlogError;

const SLUG_FORBIDDEN: &[char] = &['/', '?', '#', '%', '\\'];

/// Returns the trimmed value if it is present and not blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Slugs end up in URL paths, so they must be a single path segment.
pub fn validate_slug(slug: &str) -> Result<(), BlogError> {
    if slug.is_empty() {
        return Err(BlogError::Validation("Slug must not be empty".into()));
    }
    if slug.chars().any(|c| c.is_whitespace() || SLUG_FORBIDDEN.contains(&c)) {
        return Err(BlogError::Validation(format!(
            "Slug '{}' may not contain whitespace or any of / ? # % \\",
            slug
        )));
    }
    Ok(())
}

/// Escapes LIKE wildcards so the term matches literally with `ESCAPE '\'`.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub fn render_markdown(content: &str) -> String {
    markdown::to_html(content)
}

/// Plain-text teaser for posts without an excerpt: headings and code
/// fences are skipped, whitespace collapsed, and the result cut at `n` chars.
pub fn summarize(content: &str, n: usize) -> String {
    let mut in_fence = false;
    let mut words: Vec<&str> = vec![];
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || trimmed.starts_with('#') {
            continue;
        }
        words.extend(trimmed.split_whitespace());
    }

    let text = words.join(" ");
    if text.chars().count() <= n {
        text
    } else {
        let cut: String = text.chars().take(n).collect();
        format!("{}…", cut.trim_end())
    }
}
