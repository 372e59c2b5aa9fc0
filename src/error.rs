use thiserror::Error;

pub type Result<T> = std::result::Result<T, TallyError>;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Commit '{}' does not exist", .revs.join("', '"))]
    CommitNotFound { revs: Vec<String> },
    #[error("Command failed: {command}: {diagnostic}")]
    CommandFailed { command: String, diagnostic: String },
}

impl TallyError {
    pub fn command_failed(command: impl Into<String>, diagnostic: impl ToString) -> Self {
        TallyError::CommandFailed {
            command: command.into(),
            diagnostic: diagnostic.to_string().trim().to_string(),
        }
    }
}

// gitoxide failures surface as CommandFailed so callers only ever see the two kinds
impl From<gix::discover::Error> for TallyError {
    fn from(err: gix::discover::Error) -> Self {
        TallyError::command_failed("gix discover", err)
    }
}

impl From<gix::object::find::existing::Error> for TallyError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        TallyError::command_failed("gix find object", err)
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for TallyError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        TallyError::command_failed("gix find commit", err)
    }
}

impl From<gix::object::commit::Error> for TallyError {
    fn from(err: gix::object::commit::Error) -> Self {
        TallyError::command_failed("gix read commit", err)
    }
}

impl From<gix::objs::decode::Error> for TallyError {
    fn from(err: gix::objs::decode::Error) -> Self {
        TallyError::command_failed("gix decode commit", err)
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for TallyError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        TallyError::command_failed("gix diff tree", err)
    }
}

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        TallyError::command_failed("io", err)
    }
}
