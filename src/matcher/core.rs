use smallvec::SmallVec;

/// Segments of a single pattern or path; most paths are shallow.
type SegmentVec<'a> = SmallVec<[&'a str; 8]>;

const MULTI_WILDCARD: &str = "**";
const SINGLE_WILDCARD: &str = "*";

/// Glob matcher over separator-delimited paths.
///
/// The matcher holds no state apart from the separator and can be shared
/// freely between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMatcher {
    separator: char,
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new('/')
    }
}

impl PathMatcher {
    /// Create a matcher splitting on `separator`.
    #[must_use]
    pub fn new(separator: char) -> Self {
        Self { separator }
    }

    /// The separator this matcher splits on.
    #[must_use]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Returns `true` when `candidate` matches `pattern` completely.
    #[must_use]
    pub fn matches(&self, pattern: &str, candidate: &str) -> bool {
        let pattern = self.split(pattern);
        let candidate = self.split(candidate);
        match_segments(&pattern, &candidate, true)
    }

    /// Returns `true` when `candidate` is a prefix that could still be
    /// completed into a full match of `pattern`.
    #[must_use]
    pub fn match_start(&self, pattern: &str, candidate: &str) -> bool {
        let pattern = self.split(pattern);
        let candidate = self.split(candidate);
        match_segments(&pattern, &candidate, false)
    }

    /// Split on the separator after dropping one leading separator.
    ///
    /// A trailing empty segment is kept, and a lone separator yields a single
    /// empty segment.
    fn split<'a>(&self, s: &'a str) -> SegmentVec<'a> {
        let s = s.strip_prefix(self.separator).unwrap_or(s);
        s.split(self.separator).collect()
    }
}

fn match_segments(pattern: &[&str], candidate: &[&str], full: bool) -> bool {
    let Some((&head, rest)) = pattern.split_first() else {
        return candidate.is_empty();
    };

    if head == MULTI_WILDCARD {
        if rest.is_empty() {
            return true;
        }
        // Backtrack over every split point, including "consume nothing".
        return (0..=candidate.len()).any(|skip| match_segments(rest, &candidate[skip..], full));
    }

    match candidate.split_first() {
        // Candidate exhausted with pattern left over: only a prefix match.
        None => !full,
        Some((&segment, candidate_rest)) => {
            match_segment(head, segment) && match_segments(rest, candidate_rest, full)
        }
    }
}

/// Match one pattern segment against one path segment, char by char.
fn match_segment(pattern: &str, segment: &str) -> bool {
    if pattern == SINGLE_WILDCARD {
        return !segment.is_empty();
    }
    if !pattern.contains(['*', '?']) {
        return pattern == segment;
    }

    let pat: SmallVec<[char; 32]> = pattern.chars().collect();
    let txt: SmallVec<[char; 32]> = segment.chars().collect();

    let (mut p, mut t) = (0usize, 0usize);
    // Position of the last `*` seen and the text index it was tried at.
    let mut star: Option<(usize, usize)> = None;

    while t < txt.len() {
        if p < pat.len() && (pat[p] == '?' || pat[p] == txt[t]) {
            p += 1;
            t += 1;
        } else if p < pat.len() && pat[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = star {
            // Let the last star swallow one more character and retry.
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, t));
        } else {
            return false;
        }
    }

    pat[p..].iter().all(|&c| c == '*')
}
