//! Stop-word sets used by the tokenizer

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Built-in English list (the common function words of the NLTK/sklearn lists)
const ENGLISH: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing",
    "done", "down", "due", "during", "each", "either", "else", "elsewhere", "enough", "etc",
    "even", "ever", "every", "everyone", "everything", "everywhere", "except", "few", "for",
    "former", "formerly", "from", "further", "had", "has", "hasnt", "have", "having", "he",
    "hence", "her", "here", "hereafter", "hereby", "herein", "hers", "herself", "him",
    "himself", "his", "how", "however", "i", "ie", "if", "in", "indeed", "into", "is", "it",
    "its", "itself", "just", "last", "latter", "least", "less", "made", "many", "may", "me",
    "meanwhile", "might", "mine", "more", "moreover", "most", "mostly", "much", "must", "my",
    "myself", "namely", "neither", "never", "nevertheless", "next", "no", "nobody", "none",
    "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once",
    "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours", "ourselves",
    "out", "over", "own", "per", "perhaps", "please", "rather", "re", "same", "seem", "seemed",
    "seeming", "seems", "several", "she", "should", "since", "so", "some", "somehow",
    "someone", "something", "sometime", "sometimes", "somewhere", "still", "such", "than",
    "that", "the", "their", "theirs", "them", "themselves", "then", "thence", "there",
    "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they", "this",
    "those", "though", "through", "throughout", "thru", "thus", "to", "together", "too",
    "toward", "towards", "under", "until", "up", "upon", "us", "very", "via", "was", "we",
    "well", "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter",
    "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
    "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

lazy_static! {
    static ref ENGLISH_SET: HashSet<&'static str> = ENGLISH.iter().copied().collect();
}

/// Which tokens the vectorizer discards before counting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopWords {
    /// Keep every token
    None,
    /// Built-in English list
    #[default]
    English,
    /// Caller-supplied list, matched case-insensitively
    Custom(Vec<String>),
}

impl StopWords {
    /// Build the lookup used while tokenizing
    pub fn compile(&self) -> StopWordSet {
        match self {
            StopWords::None => StopWordSet::None,
            StopWords::English => StopWordSet::English,
            StopWords::Custom(words) => {
                StopWordSet::Custom(words.iter().map(|w| w.to_lowercase()).collect())
            }
        }
    }

    /// Number of entries in the active list
    pub fn len(&self) -> usize {
        match self {
            StopWords::None => 0,
            StopWords::English => ENGLISH_SET.len(),
            StopWords::Custom(words) => words.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compiled form of [`StopWords`]; custom entries are lowercased once
#[derive(Debug, Clone)]
pub enum StopWordSet {
    None,
    English,
    Custom(HashSet<String>),
}

impl StopWordSet {
    /// Check whether a token is a stop word (case-insensitive, Unicode aware)
    pub fn contains(&self, token: &str) -> bool {
        let set_contains = |lowered: &str| match self {
            StopWordSet::None => false,
            StopWordSet::English => ENGLISH_SET.contains(lowered),
            StopWordSet::Custom(words) => words.contains(lowered),
        };

        if token.chars().any(char::is_uppercase) {
            set_contains(&token.to_lowercase())
        } else {
            set_contains(token)
        }
    }
}
