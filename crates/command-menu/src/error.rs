use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The owning [`crate::CommandMenu`] has been dropped
    #[error("command menu operation called outside a mounted command menu")]
    OutsideProvider,

    #[error("command menu is busy running a batch")]
    Busy,
}
