//! Local pattern-matching responder.

use crate::error::ReplyError;
use crate::source::ReplySource;
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use regex::Regex;
use tracing::warn;

const GREETINGS: &[&str] = &[
    "Hello! How are you doing today?",
    "Hi there! What's on your mind?",
    "Hey! How can I help you?",
    "Howdy! What would you like to talk about?",
];

const HOW_ARE_YOU: &[&str] = &[
    "I'm just a program, but I'm functioning well! How are you?",
    "I'm doing great! Thanks for asking. How about you?",
    "I'm here and ready to chat! How are you feeling?",
];

const NAME: &[&str] = &[
    "I'm a simple chat assistant, built to demonstrate component-based thinking!",
    "I'm a chatbot created for educational purposes. Nice to meet you!",
    "You can call me ChatBot. I'm here to demonstrate different web component approaches.",
];

const SORRY: &[&str] = &[
    "No need to apologize! Everything's fine.",
    "It's okay! No worries at all.",
    "Don't worry about it. We're all good!",
];

const YES: &[&str] = &[
    "Great! What would you like to talk about?",
    "Awesome! Tell me more.",
    "Cool! What's next?",
];

const NO: &[&str] = &[
    "Okay, no problem! What else is on your mind?",
    "Fair enough. Is there something else you'd like to discuss?",
    "I understand. What would you like to talk about instead?",
];

/// `{}` is replaced by the reflected remainder of an "I am ..." statement.
const I_AM: &[&str] = &[
    "How long have you been {}?",
    "How does being {} make you feel?",
    "How do you think you are {} today?",
];

const QUESTION: &[&str] = &[
    "That's an interesting question. What do you think?",
    "I'm not sure. What's your take on it?",
    "That's a thought-provoking question!",
    "Good question! Why do you ask?",
];

const FALLBACK: &[&str] = &[
    "Tell me more.",
    "I see. Go on.",
    "That's interesting. Why do you say that?",
    "How does that make you feel?",
    "What do you mean by that?",
    "Can you explain a bit more?",
];

#[derive(Clone, Copy)]
enum Reply {
    Canned(&'static [&'static str]),
    Reflect(&'static [&'static str]),
}

struct Rule {
    pattern: Regex,
    reply: Reply,
}

/// Rule table, tried top to bottom against lowercased input.
const RULES: &[(&str, Reply)] = &[
    (r"\bhow are (you|u)\b", Reply::Canned(HOW_ARE_YOU)),
    (r"\b(who are you|your name|what are you)\b", Reply::Canned(NAME)),
    (r"\b(hello|hi|hey|howdy|greetings)\b", Reply::Canned(GREETINGS)),
    (r"\b(sorry|apologi[sz]e)\b", Reply::Canned(SORRY)),
    (r"^(yes|yeah|yep|sure)\W*$", Reply::Canned(YES)),
    (r"^(no|nope|nah)\W*$", Reply::Canned(NO)),
    (r"^(?:i am|i'm|im)\s+(.+)$", Reply::Reflect(I_AM)),
    (r"\?\s*$", Reply::Canned(QUESTION)),
];

/// Canned-response chatbot in the style of ELIZA.
///
/// Always succeeds; the only randomness is which canned line is picked.
pub struct ElizaResponder {
    rules: Vec<Rule>,
    rng: Mutex<StdRng>,
}

impl ElizaResponder {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic responder for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let rules = RULES
            .iter()
            .filter_map(|&(pattern, reply)| match Regex::new(pattern) {
                Ok(pattern) => Some(Rule { pattern, reply }),
                Err(e) => {
                    warn!(error = %e, "Skipping invalid responder rule");
                    None
                }
            })
            .collect();
        Self {
            rules,
            rng: Mutex::new(rng),
        }
    }

    /// Picks a reply for `text`.
    pub fn respond(&self, text: &str) -> String {
        let input = text.trim().to_lowercase();

        for rule in &self.rules {
            let Some(caps) = rule.pattern.captures(&input) else {
                continue;
            };
            return match rule.reply {
                Reply::Canned(pool) => self.pick(pool).to_string(),
                Reply::Reflect(pool) => {
                    let rest = caps.get(1).map_or("", |m| m.as_str());
                    self.pick(pool).replace("{}", &reflect(rest))
                }
            };
        }

        self.pick(FALLBACK).to_string()
    }

    fn pick(&self, pool: &'static [&'static str]) -> &'static str {
        pool.choose(&mut *self.rng.lock()).copied().unwrap_or_default()
    }
}

impl Default for ElizaResponder {
    fn default() -> Self {
        Self::new()
    }
}

/// Swaps first and second person so "I am sad about my job" reads back as
/// "sad about your job".
fn reflect(fragment: &str) -> String {
    fragment
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .split_whitespace()
        .map(|word| match word {
            "i" => "you",
            "me" => "you",
            "my" => "your",
            "mine" => "yours",
            "am" => "are",
            "myself" => "yourself",
            "you" => "I",
            "your" => "my",
            "yours" => "mine",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl ReplySource for ElizaResponder {
    fn name(&self) -> &str {
        "eliza"
    }

    async fn reply(&self, text: &str) -> Result<String, ReplyError> {
        Ok(self.respond(text))
    }
}
