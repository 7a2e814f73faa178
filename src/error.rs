use crate::session::{Difficulty, Phase};

/// Why a store action was absorbed without effect.
///
/// These never reach the caller of a public action; the store logs them at
/// debug level and carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionRejected {
    #[error("{action} requires a session in play, phase is {phase}")]
    InvalidPhase { action: &'static str, phase: Phase },

    #[error("cannot start a session with empty text")]
    EmptyText,

    #[error("no player with id '{0}'")]
    UnknownPlayer(String),
}

/// Failures loading the embedded text corpus
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("text tier file '{0}' not found")]
    MissingTier(String),

    #[error("text tier file '{0}' is not valid UTF-8")]
    NotUtf8(String),

    #[error("unable to parse text tier: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("text tier {0} has no passages")]
    EmptyTier(Difficulty),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = ActionRejected::InvalidPhase {
            action: "submit_char",
            phase: Phase::Idle,
        };
        assert_eq!(
            e.to_string(),
            "submit_char requires a session in play, phase is Idle"
        );
        assert_eq!(
            ActionRejected::UnknownPlayer("p1".into()).to_string(),
            "no player with id 'p1'"
        );
        assert_eq!(
            CorpusError::EmptyTier(Difficulty::Code).to_string(),
            "text tier Code has no passages"
        );
    }
}
