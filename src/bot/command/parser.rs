//! Defines matchers for chatops commands.

use std::sync::LazyLock;

use regex::Regex;

use crate::bot::command::BotCommand;

/// Built-in label categories whose labels may be modified without trust.
const CATEGORIES: &str = "area|committee|kind|language|priority|sig|triage|wg";

static CATEGORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^/({CATEGORIES})(?:\s+(.*))?$")).unwrap());
static REMOVE_CATEGORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^/remove-({CATEGORIES})(?:\s+(.*))?$")).unwrap());
static CUSTOM_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/label(?:\s+(.*))?$").unwrap());
static REMOVE_CUSTOM_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/remove-label(?:\s+(.*))?$").unwrap());
static RETITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^/retitle(?:\s+(.*))?$").unwrap());
static LGTM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^/lgtm(?: no-issue)?\s*$").unwrap());
static LGTM_CANCEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^/lgtm cancel\s*$").unwrap());

/// Parses chatops commands from comment text.
///
/// Each command spans exactly one line. A line that matches no grammar
/// produces no commands and is not an error.
#[derive(Default)]
pub struct CommandParser;

impl CommandParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses all commands from the given comment body, line by line,
    /// in line order.
    pub fn parse_commands(&self, text: &str) -> Vec<BotCommand> {
        text.lines().flat_map(|line| self.parse_line(line)).collect()
    }

    /// Parses the ordered list of commands encoded in one line.
    ///
    /// The grammars are mutually exclusive by prefix, but every matcher is
    /// still evaluated independently; nothing here relies on exclusivity.
    pub fn parse_line(&self, line: &str) -> Vec<BotCommand> {
        let line = line.trim();
        let mut commands = Vec::new();
        commands.extend(match_category_labels(line));
        commands.extend(match_category_label_removals(line));
        commands.extend(match_custom_label(line));
        commands.extend(match_custom_label_removal(line));
        commands.extend(match_retitle(line));
        commands.extend(match_lgtm(line));
        commands
    }
}

fn match_category_labels(line: &str) -> Vec<BotCommand> {
    let Some(captures) = CATEGORY_RE.captures(line) else {
        return Vec::new();
    };
    let category = captures[1].to_string();
    values(captures.get(2))
        .map(|value| BotCommand::LabelAdd {
            category: category.clone(),
            value,
        })
        .collect()
}

fn match_category_label_removals(line: &str) -> Vec<BotCommand> {
    let Some(captures) = REMOVE_CATEGORY_RE.captures(line) else {
        return Vec::new();
    };
    let category = captures[1].to_string();
    values(captures.get(2))
        .map(|value| BotCommand::LabelRemove {
            category: category.clone(),
            value,
        })
        .collect()
}

fn match_custom_label(line: &str) -> Option<BotCommand> {
    let captures = CUSTOM_LABEL_RE.captures(line)?;
    let name = single_token(captures.get(1))?;
    Some(BotCommand::CustomLabelAdd { name })
}

fn match_custom_label_removal(line: &str) -> Option<BotCommand> {
    let captures = REMOVE_CUSTOM_LABEL_RE.captures(line)?;
    let name = single_token(captures.get(1))?;
    Some(BotCommand::CustomLabelRemove { name })
}

fn match_retitle(line: &str) -> Option<BotCommand> {
    let captures = RETITLE_RE.captures(line)?;
    // An empty title is rejected by the title handler, not here.
    let title = captures
        .get(1)
        .map(|rest| rest.as_str().trim().to_string())
        .unwrap_or_default();
    Some(BotCommand::Retitle { title })
}

fn match_lgtm(line: &str) -> Vec<BotCommand> {
    let mut commands = Vec::new();
    if LGTM_CANCEL_RE.is_match(line) {
        commands.push(BotCommand::LgtmCancel);
    }
    if LGTM_RE.is_match(line) {
        commands.push(BotCommand::LgtmAdd);
    }
    commands
}

fn values(rest: Option<regex::Match<'_>>) -> impl Iterator<Item = String> + '_ {
    rest.map(|values| values.as_str())
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
}

/// Custom label commands take exactly one argument; anything else is
/// silently ignored.
fn single_token(rest: Option<regex::Match<'_>>) -> Option<String> {
    let mut tokens = rest?.as_str().split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(token), None) => Some(token.to_string()),
        _ => None,
    }
}
