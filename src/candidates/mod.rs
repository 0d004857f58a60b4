//! Candidate domain generation
//!
//! Base names come from a dictionary file or a manual list. Each base name is
//! expanded with brandable prefixes (`trysoil`, `getsoil`, ...) and then with
//! every requested TLD. Entries that already look like full domains
//! (`mcphub.com`) are taken as they are.

mod validator;

pub use validator::DomainValidator;

use std::collections::HashSet;
use std::path::Path;

use rand::seq::SliceRandom;

use crate::error::{Result, SweepError};
use crate::types::Candidate;

/// Prefixes tried in front of every base name (the bare name is always included)
pub const DEFAULT_PREFIXES: &[&str] = &["try", "get", "use", "my", "the"];

/// TLDs tried when none are given
pub const DEFAULT_TLDS: &[&str] = &["com", "ai", "dev"];

/// Word length filter applied to dictionary entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthFilter {
    #[default]
    Any,
    Exact(usize),
    /// Inclusive bounds
    Range { min: usize, max: usize },
}

impl LengthFilter {
    /// Build a filter from optional CLI bounds. `exact` wins over a range.
    pub fn from_bounds(exact: Option<usize>, min: Option<usize>, max: Option<usize>) -> Result<Self> {
        if let Some(len) = exact {
            if len == 0 {
                return Err(SweepError::config("word length must be at least 1"));
            }
            return Ok(Self::Exact(len));
        }
        match (min, max) {
            (None, None) => Ok(Self::Any),
            (min, max) => {
                let min = min.unwrap_or(1);
                let max = max.unwrap_or(usize::MAX);
                if min > max {
                    return Err(SweepError::config(format!(
                        "minimum word length {} exceeds maximum {}",
                        min, max
                    )));
                }
                Ok(Self::Range { min, max })
            }
        }
    }

    pub fn matches(&self, word: &str) -> bool {
        let len = word.chars().count();
        match *self {
            Self::Any => true,
            Self::Exact(n) => len == n,
            Self::Range { min, max } => len >= min && len <= max,
        }
    }
}

/// Parse newline-delimited words: trimmed, lower-cased, alphabetic only,
/// length-filtered, deduplicated and sorted.
pub fn parse_words(content: &str, filter: LengthFilter) -> Vec<String> {
    let mut words: Vec<String> = content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic()))
        .filter(|word| filter.matches(word))
        .collect();
    words.sort_unstable();
    words.dedup();
    words
}

/// Load base names from a dictionary file such as `/usr/share/dict/words`
pub fn load_dictionary(path: &Path, filter: LengthFilter) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SweepError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
    })?;

    let words = parse_words(&content, filter);
    tracing::info!(
        path = %path.display(),
        words = words.len(),
        filter = ?filter,
        "Loaded dictionary"
    );
    Ok(words)
}

/// Split a manual list on commas and whitespace, dropping empty entries
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Expands base names into the full candidate list
#[derive(Debug, Clone)]
pub struct CandidateBuilder {
    names: Vec<String>,
    prefixes: Vec<String>,
    tlds: Vec<String>,
    shuffle: bool,
}

impl Default for CandidateBuilder {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            prefixes: DEFAULT_PREFIXES.iter().map(|s| s.to_string()).collect(),
            tlds: DEFAULT_TLDS.iter().map(|s| s.to_string()).collect(),
            shuffle: false,
        }
    }
}

impl CandidateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Replace the prefix set. An empty set checks bare names only.
    pub fn prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes
            .into_iter()
            .map(|p| p.into().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    pub fn tlds<I, S>(mut self, tlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tlds = tlds
            .into_iter()
            .map(|t| t.into().trim().trim_start_matches('.').to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Produce the candidate list, deduplicated in first-seen order.
    ///
    /// Invalid names are skipped with a warning rather than failing the run.
    pub fn build(&self) -> Result<Vec<Candidate>> {
        if self.tlds.is_empty() {
            return Err(SweepError::config("at least one TLD is required"));
        }

        let validator = DomainValidator::new()?;
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut skipped = 0usize;

        for raw in &self.names {
            let name = raw.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }

            let domains: Vec<String> = if name.contains('.') {
                vec![name]
            } else {
                std::iter::once(name.clone())
                    .chain(self.prefixes.iter().map(|p| format!("{}{}", p, name)))
                    .flat_map(|base| self.tlds.iter().map(move |tld| format!("{}.{}", base, tld)))
                    .collect()
            };

            for domain in domains {
                if let Err(e) = validator.validate(&domain) {
                    tracing::warn!(domain = %domain, error = %e, "Skipping invalid candidate");
                    skipped += 1;
                    continue;
                }
                if seen.insert(domain.clone()) {
                    out.push(Candidate::new(domain));
                }
            }
        }

        if self.shuffle {
            out.shuffle(&mut rand::thread_rng());
        }

        tracing::debug!(
            names = self.names.len(),
            candidates = out.len(),
            skipped,
            "Built candidate list"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn as_strings(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(Candidate::as_str).collect()
    }

    #[test]
    fn test_prefix_and_tld_expansion() {
        let candidates = CandidateBuilder::new().names(["Soil"]).build().unwrap();
        assert_eq!(candidates.len(), 18);
        assert_eq!(
            as_strings(&candidates[..6]),
            vec!["soil.com", "soil.ai", "soil.dev", "trysoil.com", "trysoil.ai", "trysoil.dev"]
        );
        assert!(as_strings(&candidates).contains(&"thesoil.dev"));
    }

    #[test]
    fn test_full_domains_are_not_expanded() {
        let candidates = CandidateBuilder::new()
            .names(["MCPHub.com", "mcphub.com", "soil"])
            .prefixes(Vec::<String>::new())
            .tlds(["ai"])
            .build()
            .unwrap();
        assert_eq!(as_strings(&candidates), vec!["mcphub.com", "soil.ai"]);
    }

    #[test]
    fn test_invalid_names_are_skipped() {
        let candidates = CandidateBuilder::new()
            .names(["ok", "no_way", "  ", "-dash"])
            .prefixes(Vec::<String>::new())
            .tlds([".com"])
            .build()
            .unwrap();
        assert_eq!(as_strings(&candidates), vec!["ok.com"]);
    }

    #[test]
    fn test_no_tlds_is_config_error() {
        let result = CandidateBuilder::new().names(["x"]).tlds(Vec::<String>::new()).build();
        assert!(matches!(result, Err(SweepError::Config { .. })));
    }

    #[test]
    fn test_shuffle_keeps_the_same_set() {
        let builder = CandidateBuilder::new().names(["alpha", "beta", "gamma"]);
        let mut plain = builder.build().unwrap();
        let mut shuffled = builder.clone().shuffle(true).build().unwrap();
        plain.sort();
        shuffled.sort();
        assert_eq!(plain, shuffled);
    }

    #[test]
    fn test_parse_words_filters() {
        let content = "Apple\nbanana\napple\ndon't\n  kiwi  \n\nfig1\nplum\n";
        assert_eq!(
            parse_words(content, LengthFilter::Any),
            vec!["apple", "banana", "kiwi", "plum"]
        );
        assert_eq!(parse_words(content, LengthFilter::Exact(4)), vec!["kiwi", "plum"]);
        assert_eq!(
            parse_words(content, LengthFilter::Range { min: 5, max: 6 }),
            vec!["apple", "banana"]
        );
    }

    #[test]
    fn test_length_filter_bounds() {
        assert_eq!(LengthFilter::from_bounds(None, None, None).unwrap(), LengthFilter::Any);
        assert_eq!(
            LengthFilter::from_bounds(Some(4), Some(1), Some(9)).unwrap(),
            LengthFilter::Exact(4)
        );
        assert_eq!(
            LengthFilter::from_bounds(None, Some(5), None).unwrap(),
            LengthFilter::Range { min: 5, max: usize::MAX }
        );
        assert!(LengthFilter::from_bounds(None, Some(7), Some(5)).is_err());
        assert!(LengthFilter::from_bounds(Some(0), None, None).is_err());
    }

    #[test]
    fn test_load_dictionary() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "soil\nSoil\nroots\nseed").unwrap();

        let words = load_dictionary(file.path(), LengthFilter::Exact(4)).unwrap();
        assert_eq!(words, vec!["seed", "soil"]);
    }

    #[test]
    fn test_missing_dictionary_is_io_error() {
        let err = load_dictionary(Path::new("/definitely/not/here.txt"), LengthFilter::Any).unwrap_err();
        assert!(matches!(err, SweepError::Io { path: Some(_), .. }));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("soil, seed\nroots ,,  "), vec!["soil", "seed", "roots"]);
    }
}
