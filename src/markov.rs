//! Word-level Markov chain for drafting new prompts from a corpus.
//!
//! A model is built once from a list of strings and is read-only afterwards,
//! so a single instance can be shared across threads and sampled repeatedly.

use std::collections::HashMap;

use rand::Rng;
use tracing::debug;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub order: usize,
    pub max_words: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            order: 2,
            max_words: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MarkovModel {
    order: usize,
    transitions: HashMap<String, Vec<String>>,
    start_keys: Vec<String>,
}

impl MarkovModel {
    /// Build a model with the default order.
    pub fn new<I, S>(corpus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(corpus, GeneratorConfig::default().order)
    }

    /// Build a model whose context keys are `order` consecutive words.
    ///
    /// Lines with `order` words or fewer contribute nothing. Every line long
    /// enough to have a follower contributes its opening key as a seed.
    /// Followers are stored with repetition, so frequent continuations are
    /// picked proportionally more often.
    pub fn build<I, S>(corpus: I, order: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut model = Self {
            order,
            ..Self::default()
        };
        if order == 0 {
            return model;
        }

        let mut lines = 0usize;
        for text in corpus {
            lines += 1;
            let words: Vec<&str> = text.as_ref().split_whitespace().collect();
            if words.len() <= order {
                continue;
            }
            for (i, window) in words.windows(order + 1).enumerate() {
                let key = window[..order].join(" ");
                if i == 0 {
                    model.start_keys.push(key.clone());
                }
                model
                    .transitions
                    .entry(key)
                    .or_default()
                    .push(window[order].to_string());
            }
        }

        debug!(
            lines,
            order,
            keys = model.transitions.len(),
            seeds = model.start_keys.len(),
            "built markov model"
        );
        model
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn start_keys(&self) -> &[String] {
        &self.start_keys
    }

    /// Observed continuations of `key`, duplicates included.
    pub fn followers(&self, key: &str) -> Option<&[String]> {
        self.transitions.get(key).map(Vec::as_slice)
    }

    pub fn key_count(&self) -> usize {
        self.transitions.len()
    }

    /// True when there is no seed to start generating from.
    pub fn is_empty(&self) -> bool {
        self.start_keys.is_empty()
    }

    /// Sample up to `max_words` words using the thread-local RNG.
    pub fn generate(&self, max_words: usize) -> String {
        self.generate_with_rng(max_words, &mut rand::rng())
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(&self, max_words: usize, rng: &mut R) -> String {
        self.generate_with(max_words, |n| rng.random_range(0..n))
    }

    /// Sample text, delegating every random choice to `pick`.
    ///
    /// `pick` receives the number of candidates (always at least one) and
    /// returns an index, reduced modulo that number. The walk starts from a
    /// seed and appends followers until `max_words` is reached or the current
    /// key has no recorded continuation. A seed is never truncated, so the
    /// output has at least `order` words whenever the model is non-empty.
    pub fn generate_with<F>(&self, max_words: usize, mut pick: F) -> String
    where
        F: FnMut(usize) -> usize,
    {
        let Some(seed) = choose(&self.start_keys, &mut pick) else {
            return String::new();
        };

        let mut result: Vec<&str> = seed.split(' ').collect();
        while result.len() < max_words {
            let key = result[result.len() - self.order..].join(" ");
            let Some(next) = self
                .transitions
                .get(&key)
                .and_then(|followers| choose(followers, &mut pick))
            else {
                break;
            };
            result.push(next);
        }
        result.join(" ")
    }
}

fn choose<'a, F>(items: &'a [String], pick: &mut F) -> Option<&'a str>
where
    F: FnMut(usize) -> usize,
{
    if items.is_empty() {
        return None;
    }
    let idx = pick(items.len()) % items.len();
    Some(items[idx].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn single_line_builds_expected_chain() {
        let model = MarkovModel::build(["the quick brown fox jumps"], 2);

        assert_eq!(model.order(), 2);
        assert_eq!(model.start_keys(), ["the quick"]);
        assert_eq!(model.followers("the quick").unwrap(), ["brown"]);
        assert_eq!(model.followers("quick brown").unwrap(), ["fox"]);
        assert_eq!(model.followers("brown fox").unwrap(), ["jumps"]);
        assert_eq!(model.key_count(), 3);
        assert!(model.followers("fox jumps").is_none());
    }

    #[test]
    fn short_lines_contribute_nothing() {
        let model = MarkovModel::build(["too short", "", "   ", "a b"], 2);
        assert!(model.is_empty());
        assert_eq!(model.key_count(), 0);
        assert_eq!(model.generate(30), "");
    }

    #[test]
    fn every_long_line_adds_a_seed() {
        let model = MarkovModel::build(["build a web app", "build a cli tool", "hi"], 2);
        assert_eq!(model.start_keys(), ["build a", "build a"]);
        assert_eq!(model.followers("build a").unwrap(), ["web", "cli"]);
    }

    #[test]
    fn whitespace_runs_are_collapsed() {
        let model = MarkovModel::build(["  the\tquick\n\nbrown  fox "], 2);
        assert_eq!(model.start_keys(), ["the quick"]);
        assert_eq!(model.followers("brown fox"), None);
        assert_eq!(model.followers("quick brown").unwrap(), ["fox"]);
    }

    #[test]
    fn zero_order_builds_empty_model() {
        let model = MarkovModel::build(["the quick brown fox"], 0);
        assert!(model.is_empty());
        assert_eq!(model.generate(10), "");
    }

    #[test]
    fn single_path_is_deterministic() {
        let model = MarkovModel::build(["the quick brown fox jumps"], 2);
        assert_eq!(model.generate(3), "the quick brown");
        assert_eq!(model.generate(30), "the quick brown fox jumps");
    }

    #[test]
    fn picker_drives_branching_walk() {
        let model = MarkovModel::build(["a b c d", "a b x y"], 2);
        assert_eq!(model.followers("a b").unwrap(), ["c", "x"]);

        let mut picks = vec![0, 1].into_iter();
        let text = model.generate_with(10, |_| picks.next().unwrap_or(0));
        assert_eq!(text, "a b x y");

        let text = model.generate_with(10, |_| 0);
        assert_eq!(text, "a b c d");
    }

    #[test]
    fn picker_index_wraps_around() {
        let model = MarkovModel::build(["a b c", "a b z"], 2);
        assert_eq!(model.generate_with(3, |n| n + 1), "a b z");
    }

    #[test]
    fn seed_is_kept_whole_when_limit_is_smaller() {
        let model = MarkovModel::build(["one two three four"], 3);
        assert_eq!(model.generate(1), "one two three");
    }

    #[test]
    fn cyclic_chain_stops_at_limit() {
        let model = MarkovModel::build(["la la la la"], 2);
        let text = model.generate(7);
        assert_eq!(text.split(' ').count(), 7);
        assert!(text.split(' ').all(|w| w == "la"));
    }

    #[test]
    fn seeded_rng_output_respects_bounds() {
        let corpus = [
            "create a todo app with react and firebase",
            "create a chat app with vue and supabase",
            "build a todo list with svelte and a rust backend",
            "build a weather dashboard with react and a public api",
        ];
        let model = MarkovModel::new(corpus);
        let mut rng = StdRng::seed_from_u64(7);
        for max in 2..20 {
            let text = model.generate_with_rng(max, &mut rng);
            let words = text.split(' ').count();
            assert!(words >= model.order(), "{text:?} shorter than order");
            assert!(words <= max, "{text:?} longer than {max}");
        }
    }

    #[test]
    fn model_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MarkovModel>();
    }
}
