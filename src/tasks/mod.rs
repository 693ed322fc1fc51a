//! Built-in tasks
//!
//! - [`shell`] - Run shell scripts
//! - [`command`] - Run an arbitrary external tool over the relevant files
//! - [`file_size`] - Reject files above a size limit
//! - [`commit_message`] - Enforce commit message conventions
//! - [`branch_name`] - Enforce branch naming rules

pub mod branch_name;
pub mod command;
pub mod commit_message;
pub mod file_size;
pub mod shell;

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::core::models::{Options, PatternError, split_delimited};
use crate::core::services::TaskRegistry;

pub use branch_name::BranchName;
pub use command::ExternalCommand;
pub use commit_message::CommitMessage;
pub use file_size::FileSize;
pub use shell::Shell;

/// Register every built-in task
pub fn register_builtin(registry: &mut TaskRegistry) {
    registry.register(shell::ID, 0, |services| Shell::new(services.process.clone(), services.root.clone()));
    registry.register(command::ID, 0, |services| {
        ExternalCommand::new(services.process.clone(), services.root.clone())
    });
    registry.register(file_size::ID, 0, |services| FileSize::new(services.root.clone()));
    registry.register(commit_message::ID, 0, |_| CommitMessage::new());
    registry.register(branch_name::ID, 0, |services| BranchName::new(services.vcs.clone()));
}

/// String items of a list option
pub(crate) fn string_list(options: &Options, key: &str) -> Vec<String> {
    match options.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).map(String::from).collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

pub(crate) fn bool_option(options: &Options, key: &str, default: bool) -> bool {
    options.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// Compile a user rule into a regex
///
/// Delimited rules (`/…/flags`, `#…#flags`) are used as regexes. Anything else
/// is a glob anchored on both ends, so a plain word must match exactly.
/// `extra_flags` are applied on top.
pub(crate) fn rule_regex(rule: &str, extra_flags: &str) -> Result<Regex, PatternError> {
    let error = |message: String| PatternError {
        pattern: rule.to_string(),
        message,
    };

    let (body, flags) = match split_delimited(rule) {
        Some((body, flags)) => (body.to_string(), flags),
        None => (glob_to_regex(rule), ""),
    };

    let mut builder = RegexBuilder::new(&body);
    for flag in flags.chars().chain(extra_flags.chars()) {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'u' => builder.unicode(true),
            other => return Err(error(format!("unsupported regex modifier '{other}'"))),
        };
    }
    builder.build().map_err(|e| error(e.to_string()))
}

/// Translate a glob into an anchored regex
fn glob_to_regex(glob: &str) -> String {
    let mut regex = String::from("^");
    let mut chars = glob.chars().peekable();
    let mut in_braces = false;
    while let Some(c) = chars.next() {
        match c {
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            '[' => {
                regex.push('[');
                if chars.next_if_eq(&'!').is_some() {
                    regex.push('^');
                }
                for class_char in chars.by_ref() {
                    regex.push(class_char);
                    if class_char == ']' {
                        break;
                    }
                }
            },
            '{' => {
                in_braces = true;
                regex.push_str("(?:");
            },
            '}' if in_braces => {
                in_braces = false;
                regex.push(')');
            },
            ',' if in_braces => regex.push('|'),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex.push('$');
    regex
}
