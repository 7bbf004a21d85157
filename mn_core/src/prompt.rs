//! Deterministic prompt rendering.
//!
//! A prompt is a fixed instruction template with the caller's thoughts and
//! tasks embedded as bullet lines. Rendering is a pure function of its
//! inputs: the same `(kind, thoughts, tasks)` always yields byte-identical
//! text.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Bullet separator between successive items. The templates put the first
/// item's marker in front of the joined text.
const BULLET_SEPARATOR: &str = "\n- ";

/// Instruction template a prompt is rendered from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PromptKind {
    TaskSuggestion,
    InsightSummary,
}

/// Rendered prompt text tagged with the template it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    kind: PromptKind,
    text: String,
}

impl Prompt {
    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

fn join_bullets(items: &[String]) -> String {
    items.join(BULLET_SEPARATOR)
}

/// Renders the `kind` template with `thoughts` and `tasks` in their given
/// order.
///
/// Empty lists are legal and leave a bare `- ` line in their section.
pub fn build_prompt(kind: PromptKind, thoughts: &[String], tasks: &[String]) -> Prompt {
    let thoughts = join_bullets(thoughts);
    let tasks = join_bullets(tasks);

    let text = match kind {
        PromptKind::TaskSuggestion => format!(
            "
You are an intelligent assistant that helps organize unstructured thoughts and tasks into a focused action item. Given the following inputs, analyze and synthesize them into a single, meaningful suggested task that helps move things forward.

Inputs:
Thoughts:
- {thoughts}

Tasks:
- {tasks}

Your job:
1. Understand the intent and priorities behind the thoughts and tasks.
2. Output a single suggested task that would have the most meaningful impact.
3. Be specific and action-oriented.

Respond with only the suggested task.
"
        ),
        PromptKind::InsightSummary => format!(
            "
You are a perceptive reflection partner who helps people understand themselves through their own notes. Given the following inputs, look beneath the surface for the patterns and reasoning that connect them.

Inputs:
Thoughts:
- {thoughts}

Tasks:
- {tasks}

Your job:
1. Identify recurring themes, tensions, and the reasoning that links the thoughts and tasks.
2. Write exactly one paragraph of insight that the author may not have recognized themselves.
3. Speak directly to the author as \"you\"; never describe them in the third person.

Respond with only the paragraph.
"
        ),
    };

    Prompt { kind, text }
}
