use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

pub mod corpus;
pub mod error;
pub mod markov;

pub use corpus::{
    corpus_column, load_corpus, load_prompts, load_vibe_prompts, read_prompts, read_vibe_prompts,
    PromptRecord, VibePromptRecord,
};
pub use error::{CorpusError, Result};
pub use markov::{GeneratorConfig, MarkovModel};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Clarity,
    Specificity,
    Structure,
    StepwiseInstructions,
    Conciseness,
    Redundancy,
    FormatOutput,
    Audience,
    Completeness,
    Neutrality,
    Examples,
    InstructionType,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Clarity => "Clarity",
            Category::Specificity => "Specificity",
            Category::Structure => "Structure",
            Category::StepwiseInstructions => "Stepwise Instructions",
            Category::Conciseness => "Conciseness",
            Category::Redundancy => "Redundancy",
            Category::FormatOutput => "Format/Output",
            Category::Audience => "Audience",
            Category::Completeness => "Completeness",
            Category::Neutrality => "Neutrality",
            Category::Examples => "Examples",
            Category::InstructionType => "Instruction Type",
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One finding about a prompt, in the order its rule appears in [`rules`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub category: Category,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub char_count: usize,
    pub word_count: usize,
    pub issues: Vec<Issue>,
}

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

struct Hyperparameters {
    word_list_min_hits: usize,
    short_prompt_max_chars: usize,
    long_prompt_min_chars: usize,
    very_long_prompt_min_chars: usize,
    max_words: usize,
}

static HP: Hyperparameters = Hyperparameters {
    word_list_min_hits: 2,
    short_prompt_max_chars: 30,
    long_prompt_min_chars: 120,
    very_long_prompt_min_chars: 200,
    max_words: 200,
};

// ---------------------------------------------------------------------------
// Word lists
// ---------------------------------------------------------------------------

// All entries are lowercase; they are matched against the lowercased prompt.

static VAGUE_WORDS: &[&str] = &[
    "thing",
    "things",
    "stuff",
    "it",
    "something",
    "anything",
    "everything",
    "this",
    "that",
];

static FILLER_WORDS: &[&str] = &[
    "just",
    "basically",
    "kind of",
    "sort of",
    "actually",
    "really",
    "very",
];

static LEADING_WORDS: &[&str] = &["obviously", "clearly", "everyone knows", "of course"];

static FORMAT_KEYWORDS: &[&str] = &[
    "in json",
    "as a list",
    "in table form",
    "as a table",
    "as a poem",
    "as a story",
];

static AUDIENCE_KEYWORDS: &[&str] = &[
    "for beginners",
    "for experts",
    "for children",
    "for a 5-year-old",
    "for business professionals",
];

static EXAMPLE_KEYWORDS: &[&str] = &["e.g.", "for example", "such as", "like this:"];

static STEP_KEYWORDS: &[&str] = &["step 1", "first", "then", "next", "finally", "after that"];

static CONTEXT_WORDS: &[&str] = &["who", "what", "how", "when", "where"];

static STRUCTURE_MARKERS: &[&str] = &["- ", "1.", "step", "list", "json"];

static INSTRUCTION_OPENERS: &[&str] = &["please ", "write ", "generate ", "create "];

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static GENERIC_VERB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(do|make|fix|get|improve|help)\b").unwrap());

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The prompt as every rule sees it: raw text for lengths and punctuation,
/// lowercased text for keyword matching.
struct Subject<'a> {
    raw: &'a str,
    lower: String,
    char_count: usize,
    word_count: usize,
}

impl<'a> Subject<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_lowercase(),
            char_count: raw.chars().count(),
            word_count: word_count(raw),
        }
    }

    fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }

    fn is_short(&self) -> bool {
        self.char_count < HP.short_prompt_max_chars
    }

    fn is_long(&self) -> bool {
        self.char_count > HP.long_prompt_min_chars
    }

    fn is_very_long(&self) -> bool {
        self.char_count > HP.very_long_prompt_min_chars
    }

    fn mentions(&self, needle: &str) -> bool {
        self.lower.contains(needle)
    }

    fn mentions_any(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.lower.contains(w))
    }

    /// Number of distinct list entries that occur somewhere in the prompt.
    fn hits(&self, words: &[&str]) -> usize {
        words.iter().filter(|w| self.lower.contains(*w)).count()
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

// Line breaks are part of a sentence; only inline spacing is trimmed.
fn is_inline_space(c: char) -> bool {
    c.is_whitespace()
        && !matches!(
            c,
            '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
        )
}

fn has_repeated_sentence(text: &str) -> bool {
    let mut seen = HashSet::new();
    text.split('.')
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_matches(is_inline_space))
        .any(|s| !seen.insert(s))
}

// ---------------------------------------------------------------------------
// Rule predicates
// ---------------------------------------------------------------------------

fn vague_wording(s: &Subject) -> bool {
    s.hits(VAGUE_WORDS) >= HP.word_list_min_hits
}

fn generic_short_request(s: &Subject) -> bool {
    s.is_short() && GENERIC_VERB_RE.is_match(&s.lower)
}

fn missing_context(s: &Subject) -> bool {
    s.is_long() && !s.mentions_any(CONTEXT_WORDS)
}

fn unstructured(s: &Subject) -> bool {
    s.is_very_long() && !s.mentions_any(STRUCTURE_MARKERS)
}

fn no_steps(s: &Subject) -> bool {
    s.is_very_long() && !s.mentions_any(STEP_KEYWORDS)
}

fn too_many_words(s: &Subject) -> bool {
    s.word_count > HP.max_words
}

fn filler_wording(s: &Subject) -> bool {
    s.hits(FILLER_WORDS) >= HP.word_list_min_hits
}

fn repeated_sentences(s: &Subject) -> bool {
    s.is_long() && has_repeated_sentence(s.raw)
}

fn no_output_format(s: &Subject) -> bool {
    s.is_long() && !s.mentions_any(FORMAT_KEYWORDS)
}

fn no_audience(s: &Subject) -> bool {
    s.is_long() && !s.mentions_any(AUDIENCE_KEYWORDS)
}

fn process_without_steps(s: &Subject) -> bool {
    s.is_long() && s.mentions("process") && !s.mentions("step")
}

fn leading_language(s: &Subject) -> bool {
    s.hits(LEADING_WORDS) >= HP.word_list_min_hits
}

fn no_examples(s: &Subject) -> bool {
    s.is_long() && !s.mentions_any(EXAMPLE_KEYWORDS)
}

fn unclear_instruction(s: &Subject) -> bool {
    s.is_short()
        && !s.raw.ends_with('?')
        && !INSTRUCTION_OPENERS.iter().any(|o| s.lower.starts_with(o))
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// A single heuristic: when `check` holds for a prompt, an [`Issue`] with this
/// rule's category and text is reported.
pub struct Rule {
    category: Category,
    description: &'static str,
    suggestion: Option<&'static str>,
    check: fn(&Subject) -> bool,
}

impl Rule {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn suggestion(&self) -> Option<&'static str> {
        self.suggestion
    }

    /// Evaluate this rule alone. Blank prompts never match.
    pub fn applies_to(&self, text: &str) -> bool {
        let subject = Subject::new(text);
        !subject.is_blank() && (self.check)(&subject)
    }

    fn issue(&self) -> Issue {
        Issue {
            category: self.category,
            description: self.description.to_string(),
            suggestion: self.suggestion.map(str::to_string),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("category", &self.category)
            .field("description", &self.description)
            .field("suggestion", &self.suggestion)
            .finish_non_exhaustive()
    }
}

static RULES: [Rule; 14] = [
    Rule {
        category: Category::Clarity,
        description: "Prompt contains several vague words (e.g., 'things', 'something').",
        suggestion: Some("Try to be more specific about what you want."),
        check: vague_wording,
    },
    Rule {
        category: Category::Clarity,
        description: "Prompt is very short and may be too generic.",
        suggestion: Some("Add a bit more detail to clarify your request."),
        check: generic_short_request,
    },
    Rule {
        category: Category::Specificity,
        description: "For longer prompts, consider adding more details (who, what, how, when, where).",
        suggestion: Some("Add more context if needed."),
        check: missing_context,
    },
    Rule {
        category: Category::Structure,
        description: "Long prompt could benefit from more structure (steps, lists, etc.).",
        suggestion: Some("Break your instructions into steps or a list if possible."),
        check: unstructured,
    },
    Rule {
        category: Category::StepwiseInstructions,
        description: "Long prompt could be easier to follow if broken into steps.",
        suggestion: Some("Consider breaking complex tasks into steps."),
        check: no_steps,
    },
    Rule {
        category: Category::Conciseness,
        description: "Prompt is very long. Consider shortening it.",
        suggestion: Some("Remove unnecessary words for clarity."),
        check: too_many_words,
    },
    Rule {
        category: Category::Conciseness,
        description: "Prompt contains several filler words (e.g., 'just', 'basically').",
        suggestion: Some("Remove filler words for clarity."),
        check: filler_wording,
    },
    Rule {
        category: Category::Redundancy,
        description: "Prompt contains repeated sentences or phrases.",
        suggestion: Some("Remove repeated instructions to keep your prompt focused."),
        check: repeated_sentences,
    },
    Rule {
        category: Category::FormatOutput,
        description: "For longer prompts, consider specifying the desired output format.",
        suggestion: Some("Specify the output format, e.g. 'Respond in JSON'."),
        check: no_output_format,
    },
    Rule {
        category: Category::Audience,
        description: "For longer prompts, consider specifying the intended audience.",
        suggestion: Some("Name the intended audience, e.g. 'Explain for a beginner'."),
        check: no_audience,
    },
    Rule {
        category: Category::Completeness,
        description: "Prompt asks for a process but does not specify steps.",
        suggestion: Some("List the steps or details needed for the process."),
        check: process_without_steps,
    },
    Rule {
        category: Category::Neutrality,
        description: "Prompt contains several leading or biased phrases.",
        suggestion: Some("Use neutral language to avoid biasing the response."),
        check: leading_language,
    },
    Rule {
        category: Category::Examples,
        description: "For longer prompts, consider providing an example.",
        suggestion: Some("Add an example to clarify your request."),
        check: no_examples,
    },
    Rule {
        category: Category::InstructionType,
        description: "Prompt is very short and may not be a clear instruction or question.",
        suggestion: Some("Phrase your prompt as a clear instruction or question."),
        check: unclear_instruction,
    },
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The fixed battery of heuristics, in evaluation order.
pub fn rules() -> &'static [Rule] {
    &RULES
}

/// Run every rule against `text` and collect the issues that fire.
///
/// Rules are independent: each one that matches contributes its own issue,
/// and the result follows rule order. Blank input yields no issues.
pub fn analyze(text: &str) -> Vec<Issue> {
    let subject = Subject::new(text);
    if subject.is_blank() {
        return vec![];
    }

    RULES
        .iter()
        .filter(|rule| (rule.check)(&subject))
        .map(Rule::issue)
        .collect()
}

pub fn report(text: &str) -> Report {
    Report {
        char_count: text.chars().count(),
        word_count: word_count(text),
        issues: analyze(text),
    }
}
