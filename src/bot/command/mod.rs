mod parser;

pub use parser::CommandParser;

/// Chatops command specified by a user on a single line of a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Add a built-in category label (`/<category> <value...>`).
    /// One command is produced per listed value.
    LabelAdd { category: String, value: String },
    /// Remove a built-in category label (`/remove-<category> <value...>`).
    LabelRemove { category: String, value: String },
    /// Add a free-form label (`/label <name>`).
    CustomLabelAdd { name: String },
    /// Remove a free-form label (`/remove-label <name>`).
    CustomLabelRemove { name: String },
    /// Change the issue/PR title (`/retitle <new title>`).
    Retitle { title: String },
    /// Approve a pull request (`/lgtm` or `/lgtm no-issue`).
    LgtmAdd,
    /// Revoke an approval (`/lgtm cancel`).
    LgtmCancel,
}
