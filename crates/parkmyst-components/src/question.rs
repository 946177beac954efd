//! Free-text questions answered with tolerance for typos.

use parkmyst_core::error::GameError;
use parkmyst_core::event::Event;
use parkmyst_core::feed::FeedId;
use parkmyst_core::instance::InstanceId;
use parkmyst_runtime::{
    Component, Context, Descriptor, DescriptorRegistry, FeedTemplate, HookResult, factory,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// Topic carrying an answer; payload `{ "answer": string }`.
pub const SIMPLE_ANSWER: &str = "simpleAnswer";

const SIMPLE_FEEDS: &[FeedTemplate] = &[FeedTemplate::public("simpleQuestion")];
const COMMENT_FEEDS: &[FeedTemplate] = &[FeedTemplate::public("commentQuestion")];
const FIELDS: &[&str] = &["question", "answer", "matchPercentage", "onFail"];

/// Edit distance between `a` and `b`, counted in characters.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut row: Vec<usize> = (0..=short.len()).collect();
    for (i, lc) in long.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if lc == sc {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[short.len()]
}

/// Share of `expected` that `given` gets right, `1.0` for an exact match.
///
/// Can be negative when `given` is much longer than `expected`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn match_ratio(expected: &str, given: &str) -> f64 {
    let len = expected.chars().count();
    if len == 0 {
        return if given.is_empty() { 1.0 } else { 0.0 };
    }
    (len as f64 - levenshtein(expected, given) as f64) / len as f64
}

/// Configuration shared by both question kinds.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuestionConfig {
    question: String,
    answer: String,
    /// Minimum [`match_ratio`] accepted as correct, between 0 and 1.
    match_percentage: f64,
    /// Started after every wrong answer.
    on_fail: InstanceId,
}

impl QuestionConfig {
    fn is_correct(&self, given: &str) -> bool {
        match_ratio(&self.answer, given) >= self.match_percentage
    }
}

fn answer_of(event: &Event) -> Option<&str> {
    if event.topic.as_str() == SIMPLE_ANSWER {
        event.str_field("answer")
    } else {
        None
    }
}

/// Completes on the right answer; a wrong one starts `onFail`.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct SimpleQuestion(QuestionConfig);

impl Component for SimpleQuestion {
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.subscribe(SIMPLE_ANSWER);
        ctx.create_feed("simpleQuestion", json!({ "question": self.0.question }));
        Ok(())
    }

    fn accepts(&self, event: &Event) -> bool {
        answer_of(event).is_some()
    }

    fn on_event(&self, ctx: &mut Context<'_>, event: &Event) -> HookResult {
        let answer = answer_of(event).unwrap_or_default();
        if self.0.is_correct(answer) {
            ctx.complete();
        } else {
            debug!(instance = %ctx.id(), "wrong answer");
            ctx.start(self.0.on_fail);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Comment {
    username: String,
    #[serde(default)]
    profile_picture_url: Option<String>,
    answer: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CommentState {
    feed: Option<FeedId>,
    comments: Vec<Comment>,
}

/// Like [`SimpleQuestion`], but wrong answers from players are shown to
/// everyone as comments.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct CommentQuestion(QuestionConfig);

impl CommentQuestion {
    fn payload(&self, comments: &[Comment]) -> serde_json::Value {
        json!({ "question": self.0.question, "comments": comments })
    }
}

impl Component for CommentQuestion {
    fn on_start(&self, ctx: &mut Context<'_>) -> HookResult {
        ctx.subscribe(SIMPLE_ANSWER);
        let feed = ctx.create_feed("commentQuestion", self.payload(&[]));
        ctx.set_state(&CommentState {
            feed: Some(feed),
            comments: Vec::new(),
        })
    }

    fn accepts(&self, event: &Event) -> bool {
        answer_of(event).is_some()
    }

    fn on_event(&self, ctx: &mut Context<'_>, event: &Event) -> HookResult {
        let answer = answer_of(event).unwrap_or_default();
        if self.0.is_correct(answer) {
            ctx.complete();
            return Ok(());
        }

        if let Some(player) = event.sender.player() {
            let comment = Comment {
                username: player.username.clone(),
                profile_picture_url: player.profile_picture_url.clone(),
                answer: answer.to_owned(),
            };
            let (feed, comments) = ctx.update_state(|state: &mut CommentState| {
                state.comments.push(comment);
                (state.feed, state.comments.clone())
            })?;
            if let Some(feed) = feed {
                ctx.update_feed(feed, self.payload(&comments));
            }
        }
        ctx.start(self.0.on_fail);
        Ok(())
    }
}

pub(crate) fn register(registry: &mut DescriptorRegistry) -> Result<(), GameError> {
    registry.register(
        Descriptor::new(
            "SimpleQuestion",
            "Asks a question; answers within 'matchPercentage' of the expected one pass.",
        )
        .with_fields(FIELDS)
        .with_feeds(SIMPLE_FEEDS),
        factory::<SimpleQuestion>,
    )?;
    registry.register(
        Descriptor::new(
            "CommentQuestion",
            "Asks a question and lists the wrong answers of the participants.",
        )
        .with_fields(FIELDS)
        .with_feeds(COMMENT_FEEDS),
        factory::<CommentQuestion>,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_known_distances() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("árvíztűrő", "árvíztűrő"), 0);
    }

    #[test]
    fn test_match_ratio_tolerates_one_typo() {
        let ratio = match_ratio("budapest", "budapset");

        assert!((ratio - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_question_rejects_misspelled_key() {
        let config = serde_json::json!({
            "question": "Capital of Hungary?",
            "answer": "Budapest",
            "matchPercent": 0.8,
            "matchPercentage": 0.8,
            "onFail": -1
        });

        assert!(serde_json::from_value::<SimpleQuestion>(config).is_err());
    }

    #[test]
    fn test_match_ratio_of_empty_expected() {
        assert!((match_ratio("", "") - 1.0).abs() < f64::EPSILON);
        assert!(match_ratio("", "x").abs() < f64::EPSILON);
    }
}
