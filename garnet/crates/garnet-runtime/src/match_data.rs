//! Result of a successful regexp match, the value stored in `$~`.

use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::Arc;

use garnet_util::escape::quote;

/// Owned snapshot of a match: the subject text plus group byte ranges.
#[derive(Debug, Clone)]
pub struct MatchData {
    regex: Arc<Regex>,
    text: Arc<str>,
    groups: Vec<Option<Range<usize>>>,
}

impl MatchData {
    pub fn from_captures(regex: Arc<Regex>, text: Arc<str>, captures: &Captures<'_>) -> Self {
        let groups = captures.iter().map(|m| m.map(|m| m.range())).collect();
        Self { regex, text, groups }
    }

    /// Run `regex` against `text` starting at byte `start`.
    pub fn search(regex: &Arc<Regex>, text: &Arc<str>, start: usize) -> Option<Self> {
        let captures = regex.captures_at(text, start)?;
        Some(Self::from_captures(Arc::clone(regex), Arc::clone(text), &captures))
    }

    pub fn regex(&self) -> &Arc<Regex> {
        &self.regex
    }

    /// Number of groups, including group 0
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Text of group `index`, `None` when the group did not participate
    pub fn get(&self, index: usize) -> Option<&str> {
        let range = self.groups.get(index)?.clone()?;
        self.text.get(range)
    }

    pub fn named(&self, name: &str) -> Option<&str> {
        let index = self.regex.capture_names().position(|n| n == Some(name))?;
        self.get(index)
    }

    /// The whole match
    pub fn matched(&self) -> &str {
        self.get(0).unwrap_or("")
    }

    /// Character offset where group `index` starts
    pub fn begin(&self, index: usize) -> Option<usize> {
        let range = self.groups.get(index)?.as_ref()?;
        Some(self.text[..range.start].chars().count())
    }

    pub fn pre_match(&self) -> &str {
        match self.groups.first() {
            Some(Some(range)) => &self.text[..range.start],
            _ => "",
        }
    }

    pub fn post_match(&self) -> &str {
        match self.groups.first() {
            Some(Some(range)) => &self.text[range.end..],
            _ => "",
        }
    }

    /// Groups 1.. as optional strings
    pub fn captures(&self) -> Vec<Option<&str>> {
        (1..self.groups.len()).map(|i| self.get(i)).collect()
    }

    pub fn inspect(&self) -> String {
        let mut out = format!("#<MatchData {}", quote(self.matched()));
        let names: Vec<Option<&str>> = self.regex.capture_names().collect();
        for i in 1..self.groups.len() {
            let label = match names.get(i).copied().flatten() {
                Some(name) => name.to_string(),
                None => i.to_string(),
            };
            let text = self.get(i).map_or_else(|| "nil".to_string(), quote);
            out.push_str(&format!(" {}:{}", label, text));
        }
        out.push('>');
        out
    }
}

impl PartialEq for MatchData {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str()
            && self.text == other.text
            && self.groups == other.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(pattern: &str, text: &str) -> Option<MatchData> {
        let regex = Arc::new(Regex::new(pattern).unwrap());
        MatchData::search(&regex, &Arc::from(text), 0)
    }

    #[test]
    fn test_groups() {
        let m = search(r"(\d+)-(x)?", "ab12-cd").unwrap();
        assert_eq!(m.matched(), "12-");
        assert_eq!(m.get(1), Some("12"));
        assert_eq!(m.get(2), None);
        assert_eq!(m.len(), 3);
        assert_eq!(m.pre_match(), "ab");
        assert_eq!(m.post_match(), "cd");
        assert_eq!(m.captures(), vec![Some("12"), None]);
    }

    #[test]
    fn test_named_and_begin() {
        let m = search(r"(?P<word>[a-z]+)", "éé abc").unwrap();
        assert_eq!(m.named("word"), Some("abc"));
        assert_eq!(m.named("nope"), None);
        assert_eq!(m.begin(0), Some(3));
    }

    #[test]
    fn test_no_match() {
        assert!(search("z", "abc").is_none());
    }

    #[test]
    fn test_inspect() {
        let m = search(r"(?P<a>b)(c)?", "abd").unwrap();
        assert_eq!(m.inspect(), "#<MatchData \"b\" a:\"b\" 2:nil>");
    }
}
