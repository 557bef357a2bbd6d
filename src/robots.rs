//! Minimal robots.txt parsing.
//!
//! The fetcher downloads each host's robots.txt at most once and caches the
//! parsed rules. Only the directives that matter for courtesy gating are
//! understood: `User-agent` group selection, `Disallow`/`Allow` path patterns
//! (with `*` wildcards and `$` end anchors), and `Crawl-delay`.

use std::time::Duration;

/// Parsed rules for a single host, scoped to one user agent.
#[derive(Debug, Clone, Default)]
pub struct RobotsRules {
    disallow: Vec<String>,
    allow: Vec<String>,
    pub crawl_delay: Option<Duration>,
}

impl RobotsRules {
    /// Parse robots.txt content, keeping the group addressed to `user_agent`
    /// when one exists and falling back to the `*` group otherwise.
    pub fn parse(content: &str, user_agent: &str) -> Self {
        let mut specific = RobotsRules::default();
        let mut wildcard = RobotsRules::default();
        let mut saw_specific = false;

        // A group can be introduced by several consecutive User-agent lines;
        // any other directive ends the run.
        let mut in_specific = false;
        let mut in_wildcard = false;
        let mut prev_was_agent = false;
        let ua_lower = user_agent.to_ascii_lowercase();

        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let Some((directive, value)) = line.split_once(':') else {
                continue;
            };
            let directive = directive.trim().to_ascii_lowercase();
            let value = value.trim();

            if directive == "user-agent" {
                if !prev_was_agent {
                    in_specific = false;
                    in_wildcard = false;
                }
                if value == "*" {
                    in_wildcard = true;
                } else if ua_lower.contains(&value.to_ascii_lowercase()) {
                    in_specific = true;
                    saw_specific = true;
                }
                prev_was_agent = true;
                continue;
            }
            prev_was_agent = false;

            for (rules, active) in [(&mut specific, in_specific), (&mut wildcard, in_wildcard)] {
                if !active {
                    continue;
                }
                match directive.as_str() {
                    "disallow" if !value.is_empty() => rules.disallow.push(value.to_string()),
                    "allow" if !value.is_empty() => rules.allow.push(value.to_string()),
                    "crawl-delay" => {
                        if let Ok(secs) = value.parse::<u64>() {
                            rules.crawl_delay = Some(Duration::from_secs(secs));
                        }
                    }
                    _ => {}
                }
            }
        }

        if saw_specific { specific } else { wildcard }
    }

    /// Whether the rules permit fetching `path`. Allow patterns take
    /// precedence over Disallow, and an unmatched path is permitted.
    pub fn is_allowed(&self, path: &str) -> bool {
        if self.allow.iter().any(|p| pattern_matches(path, p)) {
            return true;
        }
        !self.disallow.iter().any(|p| pattern_matches(path, p))
    }
}

/// robots.txt pattern match: prefix semantics, `*` matches any run of
/// characters, a trailing `$` anchors the pattern to the end of the path.
fn pattern_matches(path: &str, pattern: &str) -> bool {
    match pattern.strip_suffix('$') {
        Some(stripped) => matches_anchored(path, stripped),
        None => matches_prefix(path, pattern),
    }
}

fn matches_prefix(path: &str, pattern: &str) -> bool {
    if !pattern.contains('*') {
        return path.starts_with(pattern);
    }
    let parts: Vec<&str> = pattern.split('*').collect();
    let mut pos = 0usize;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            if !path.starts_with(part) {
                return false;
            }
            pos = part.len();
        } else {
            match path[pos..].find(part) {
                Some(found) => pos += found + part.len(),
                None => return false,
            }
        }
    }
    true
}

fn matches_anchored(path: &str, pattern: &str) -> bool {
    if !pattern.contains('*') {
        return path == pattern;
    }
    let parts: Vec<&str> = pattern.split('*').collect();
    let first = parts[0];
    let last = parts[parts.len() - 1];
    if first.len() + last.len() > path.len() {
        return false;
    }
    if !path.starts_with(first) || !path.ends_with(last) {
        return false;
    }
    // Middle segments must occur in order between the anchored ends.
    let inner = &path[first.len()..path.len() - last.len()];
    let mut pos = 0usize;
    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match inner[pos..].find(part) {
            Some(found) => pos += found + part.len(),
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROBOTS: &str = "\
# comments are ignored
User-agent: *
Disallow: /admin/
Disallow: /private/
Allow: /private/public/

User-agent: special-bot
Disallow: /only-special/
Crawl-delay: 2
";

    #[test]
    fn test_wildcard_group_selected() {
        let rules = RobotsRules::parse(ROBOTS, "ai_safety_scraper/0.3");
        assert!(!rules.is_allowed("/admin/users"));
        assert!(!rules.is_allowed("/private/data"));
        assert!(rules.is_allowed("/private/public/info"));
        assert!(rules.is_allowed("/blog/post"));
        assert!(rules.crawl_delay.is_none());
    }

    #[test]
    fn test_specific_group_preferred() {
        let rules = RobotsRules::parse(ROBOTS, "special-bot/1.0");
        assert!(!rules.is_allowed("/only-special/thing"));
        assert!(rules.is_allowed("/admin/users"));
        assert_eq!(rules.crawl_delay, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_empty_robots_allows_everything() {
        let rules = RobotsRules::parse("", "anybot");
        assert!(rules.is_allowed("/anything"));
    }

    #[test]
    fn test_wildcard_pattern() {
        assert!(pattern_matches("/a/secret/b", "/a/*/b"));
        assert!(!pattern_matches("/a/secret", "/a/*/b"));
        assert!(pattern_matches("/downloads/file.pdf", "/*.pdf"));
    }

    #[test]
    fn test_end_anchor() {
        assert!(pattern_matches("/exact", "/exact$"));
        assert!(!pattern_matches("/exact/more", "/exact$"));
        assert!(pattern_matches("/page.php", "/*.php$"));
        assert!(!pattern_matches("/page.php?x=1", "/*.php$"));
    }
}
