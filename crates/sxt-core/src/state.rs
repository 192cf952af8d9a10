use std::fmt;

/// Steps of a run, in the order they are entered.
///
/// `PreValidated` (import), `PostValidated` and `StylesheetMaterialized`
/// (export) are only entered when the parameters ask for them. A run that
/// aborts jumps straight to `LogWritten`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RunState {
    Created,
    LogInitialized,
    FoldersEnsured,
    ParamsValidated,
    PreValidated,
    Transformed,
    PostValidated,
    StylesheetMaterialized,
    LogWritten,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Created => "created",
            RunState::LogInitialized => "log initialized",
            RunState::FoldersEnsured => "folders ensured",
            RunState::ParamsValidated => "parameters validated",
            RunState::PreValidated => "input validated",
            RunState::Transformed => "transformed",
            RunState::PostValidated => "output validated",
            RunState::StylesheetMaterialized => "stylesheet materialized",
            RunState::LogWritten => "log written",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
