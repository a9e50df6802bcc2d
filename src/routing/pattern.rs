//! Path template matching.
//!
//! # Responsibilities
//! - Match glob templates (`?`, `*`, `**`, `{name}`) against concrete paths
//! - Extract `{name}` bindings from a matching path
//! - Join group and member templates
//! - Order templates that match the same path by specificity
//!
//! # Design Decisions
//! - Segment based: only `**` crosses a separator
//! - Trailing separators are ignored on both template and path
//! - Case-sensitive, no percent-decoding, no query handling
//! - No regex; a small backtracking walker keeps matching allocation-light
//! - Templates are compiled once at registration into [`PathPattern`]

use std::cmp::Ordering;
use std::collections::HashMap;

/// Path segment separator.
pub const SEPARATOR: char = '/';

/// A token inside a single path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    /// `?`
    AnyChar,
    /// `*`
    AnyRun,
    /// `{name}`
    Variable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `**` standing alone as a segment.
    AnySegments,
    Tokens(Vec<Token>),
}

/// A compiled path template.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    absolute: bool,
    segments: Vec<Segment>,
    wildcards: usize,
    literal_prefix: usize,
    catch_all_suffix: bool,
}

impl PathPattern {
    /// Compile a template. Trailing separators are dropped.
    pub fn parse(template: &str) -> Self {
        let source = strip_trailing_separator(template).to_string();
        let segments: Vec<Segment> = split_segments(&source).map(parse_segment).collect();

        let wildcards = segments
            .iter()
            .map(|segment| match segment {
                Segment::AnySegments => 1,
                Segment::Tokens(tokens) => tokens
                    .iter()
                    .filter(|t| !matches!(t, Token::Literal(_)))
                    .count(),
            })
            .sum();

        let literal_prefix = source
            .find(['*', '?', '{'])
            .map(|idx| source[..idx].chars().count())
            .unwrap_or_else(|| source.chars().count());

        Self {
            absolute: source.starts_with(SEPARATOR),
            catch_all_suffix: matches!(segments.last(), Some(Segment::AnySegments)),
            source,
            segments,
            wildcards,
            literal_prefix,
        }
    }

    /// The normalized template text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of wildcard tokens (`*`, `**`, `?`, `{..}`).
    pub fn wildcard_count(&self) -> usize {
        self.wildcards
    }

    /// Characters before the first wildcard.
    pub fn literal_prefix_len(&self) -> usize {
        self.literal_prefix
    }

    /// True when the template contains no wildcard at all.
    pub fn is_literal(&self) -> bool {
        self.wildcards == 0
    }

    pub fn matches(&self, path: &str) -> bool {
        let mut vars = Vec::new();
        self.walk(path, &mut vars)
    }

    /// Captured `{name}` bindings, or `None` when the path does not match.
    pub fn extract_variables(&self, path: &str) -> Option<HashMap<String, String>> {
        let mut vars = Vec::new();
        if self.walk(path, &mut vars) {
            Some(vars.into_iter().collect())
        } else {
            None
        }
    }

    /// Specificity order among templates matching `path`; `Less` means more specific.
    ///
    /// An exact template comes first and a template ending in `**` ranks
    /// below every other. Ties fall through to wildcard count, then literal
    /// prefix length, then template text.
    pub fn compare_specificity(&self, other: &PathPattern, path: &str) -> Ordering {
        let path = strip_trailing_separator(path);
        let self_exact = self.source == path;
        let other_exact = other.source == path;

        other_exact
            .cmp(&self_exact)
            .then(self.catch_all_suffix.cmp(&other.catch_all_suffix))
            .then(self.wildcards.cmp(&other.wildcards))
            .then(other.literal_prefix.cmp(&self.literal_prefix))
            .then_with(|| self.source.cmp(&other.source))
    }

    fn walk(&self, path: &str, vars: &mut Vec<(String, String)>) -> bool {
        let path = strip_trailing_separator(path);
        if path.starts_with(SEPARATOR) != self.absolute {
            return false;
        }
        let parts: Vec<&str> = split_segments(path).collect();
        match_segments(&self.segments, &parts, vars)
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PathPattern {}

/// Whether `template` matches `path`.
pub fn matches(template: &str, path: &str) -> bool {
    PathPattern::parse(template).matches(path)
}

/// `{name}` bindings of `template` in `path`; empty when it does not match.
pub fn extract_variables(template: &str, path: &str) -> HashMap<String, String> {
    PathPattern::parse(template)
        .extract_variables(path)
        .unwrap_or_default()
}

/// Join two templates with exactly one separator.
pub fn combine(base: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        return base.to_string();
    }
    if base.is_empty() {
        return suffix.to_string();
    }
    format!(
        "{}{}{}",
        base.trim_end_matches(SEPARATOR),
        SEPARATOR,
        suffix.trim_start_matches(SEPARATOR)
    )
}

/// Total order over templates matching `path`, most specific first.
pub fn specificity_compare(a: &str, b: &str, path: &str) -> Ordering {
    PathPattern::parse(a).compare_specificity(&PathPattern::parse(b), path)
}

/// Drop trailing separators, keeping a lone root separator.
pub fn strip_trailing_separator(path: &str) -> &str {
    match path.trim_end_matches(SEPARATOR) {
        "" if !path.is_empty() => &path[..1],
        trimmed => trimmed,
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty())
}

fn parse_segment(raw: &str) -> Segment {
    if raw == "**" {
        return Segment::AnySegments;
    }

    let mut tokens = Vec::new();
    let mut rest = raw;
    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];
        match c {
            '?' => tokens.push(Token::AnyChar),
            // consecutive stars inside a segment collapse into one
            '*' if tokens.last() == Some(&Token::AnyRun) => {}
            '*' => tokens.push(Token::AnyRun),
            '{' => match rest.find('}') {
                Some(end) if end > 0 => {
                    tokens.push(Token::Variable(rest[..end].to_string()));
                    rest = &rest[end + 1..];
                }
                _ => tokens.push(Token::Literal(c)),
            },
            other => tokens.push(Token::Literal(other)),
        }
    }
    Segment::Tokens(tokens)
}

// A `false` return always leaves `vars` as it was on entry.
fn match_segments(pattern: &[Segment], path: &[&str], vars: &mut Vec<(String, String)>) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnySegments, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..], vars))
        }
        Some((Segment::Tokens(tokens), rest)) => {
            let Some((head, tail)) = path.split_first() else {
                return false;
            };
            let mark = vars.len();
            let text: Vec<char> = head.chars().collect();
            if match_tokens(tokens, &text, vars) && match_segments(rest, tail, vars) {
                true
            } else {
                vars.truncate(mark);
                false
            }
        }
    }
}

fn match_tokens(tokens: &[Token], text: &[char], vars: &mut Vec<(String, String)>) -> bool {
    match tokens.split_first() {
        None => text.is_empty(),
        Some((Token::Literal(c), rest)) => {
            text.first() == Some(c) && match_tokens(rest, &text[1..], vars)
        }
        Some((Token::AnyChar, rest)) => !text.is_empty() && match_tokens(rest, &text[1..], vars),
        Some((Token::AnyRun, rest)) => {
            (0..=text.len()).any(|skip| match_tokens(rest, &text[skip..], vars))
        }
        Some((Token::Variable(name), rest)) => {
            // greedy, at least one character
            for take in (1..=text.len()).rev() {
                let mark = vars.len();
                vars.push((name.clone(), text[..take].iter().collect()));
                if match_tokens(rest, &text[take..], vars) {
                    return true;
                }
                vars.truncate(mark);
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        assert!(matches("/orders", "/orders"));
        assert!(!matches("/orders", "/Orders"));
        assert!(!matches("/orders", "/orders/1"));
        assert!(!matches("/orders", "orders"));
    }

    #[test]
    fn test_single_char_wildcard() {
        assert!(matches("/v?/items", "/v1/items"));
        assert!(!matches("/v?/items", "/v10/items"));
        assert!(!matches("/v?/items", "/v/items"));
    }

    #[test]
    fn test_star_stays_in_segment() {
        assert!(matches("/files/*", "/files/report.pdf"));
        assert!(matches("/files/*.pdf", "/files/report.pdf"));
        assert!(!matches("/files/*.pdf", "/files/report.txt"));
        assert!(!matches("/files/*", "/files/a/b"));
    }

    #[test]
    fn test_double_star_crosses_segments() {
        assert!(matches("/static/**", "/static"));
        assert!(matches("/static/**", "/static/css/site.css"));
        assert!(matches("/api/**/detail", "/api/v1/users/detail"));
        assert!(matches("/api/**/detail", "/api/detail"));
        assert!(!matches("/api/**/detail", "/api/v1/users"));
    }

    #[test]
    fn test_variable_requires_non_empty_segment() {
        assert!(matches("/users/{id}", "/users/42"));
        assert!(!matches("/users/{id}", "/users"));
        assert!(!matches("/users/{id}", "/users//"));
    }

    #[test]
    fn test_trailing_separator_is_ignored() {
        assert!(matches("/foo/", "/foo"));
        assert!(matches("/foo", "/foo/"));
        assert!(matches("/", "/"));
    }

    #[test]
    fn test_extract_variables() {
        let vars = extract_variables("/users/{id}/posts/{postId}", "/users/42/posts/7");
        assert_eq!(vars.len(), 2);
        assert_eq!(vars.get("id").map(String::as_str), Some("42"));
        assert_eq!(vars.get("postId").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_extract_variables_inside_segment() {
        let vars = extract_variables("/files/{name}.{ext}", "/files/report.final.pdf");
        assert_eq!(vars.get("name").map(String::as_str), Some("report.final"));
        assert_eq!(vars.get("ext").map(String::as_str), Some("pdf"));
    }

    #[test]
    fn test_extract_variables_no_match_is_empty() {
        assert!(extract_variables("/users/{id}", "/orders/1").is_empty());
    }

    #[test]
    fn test_unclosed_brace_is_literal() {
        assert!(matches("/a/{b", "/a/{b"));
        assert!(PathPattern::parse("/a/{b").is_literal());
    }

    #[test]
    fn test_combine() {
        assert_eq!(combine("/orders", "{id}"), "/orders/{id}");
        assert_eq!(combine("/orders/", "/{id}"), "/orders/{id}");
        assert_eq!(combine("/orders", ""), "/orders");
        assert_eq!(combine("", "/status"), "/status");
        assert_eq!(combine("", ""), "");
    }

    #[test]
    fn test_pattern_metrics() {
        let p = PathPattern::parse("/a/{id}/*.json/**/");
        assert_eq!(p.as_str(), "/a/{id}/*.json/**");
        assert_eq!(p.wildcard_count(), 3);
        assert_eq!(p.literal_prefix_len(), 3);
        assert!(!p.is_literal());
    }

    #[test]
    fn test_exact_template_wins() {
        let path = "/a/b/c";
        assert_eq!(specificity_compare("/a/b/c", "/a/b/*", path), Ordering::Less);
        assert_eq!(specificity_compare("/a/*/c", "/a/b/c", path), Ordering::Greater);
    }

    #[test]
    fn test_longer_literal_prefix_wins() {
        let path = "/a/b/c";
        assert_eq!(specificity_compare("/a/b/*", "/a/*/c", path), Ordering::Less);
    }

    #[test]
    fn test_fewer_wildcards_win() {
        let path = "/a/b/c";
        assert_eq!(specificity_compare("/*/b/c", "/a/*/*", path), Ordering::Less);
    }

    #[test]
    fn test_catch_all_suffix_loses_tie() {
        let path = "/a/b";
        assert_eq!(specificity_compare("/a/*", "/a/**", path), Ordering::Less);
    }

    #[test]
    fn test_catch_all_suffix_ranks_below_other_wildcards() {
        let path = "/a/b/c";
        assert_eq!(specificity_compare("/a/**", "/*/b/c", path), Ordering::Greater);
        assert_eq!(specificity_compare("/*/*/*", "/a/**", path), Ordering::Less);
        assert_eq!(specificity_compare("/a/**", "/**", path), Ordering::Less);
    }

    #[test]
    fn test_comparator_is_total_and_consistent() {
        let path = "/a/b/c";
        let mut templates = vec!["/a/**", "/a/*/c", "/**", "/a/b/c", "/a/b/*", "/*/b/c", "/a/{x}/c"];
        templates.retain(|t| matches(t, path));
        templates.sort_by(|a, b| specificity_compare(a, b, path));
        assert_eq!(
            templates,
            vec!["/a/b/c", "/a/b/*", "/a/*/c", "/a/{x}/c", "/*/b/c", "/a/**", "/**"]
        );

        for a in &templates {
            assert_eq!(specificity_compare(a, a, path), Ordering::Equal);
            for b in &templates {
                let ab = specificity_compare(a, b, path);
                assert_eq!(ab, specificity_compare(b, a, path).reverse());
                for c in &templates {
                    if ab == Ordering::Less && specificity_compare(b, c, path) == Ordering::Less {
                        assert_eq!(specificity_compare(a, c, path), Ordering::Less);
                    }
                }
            }
        }
    }
}
