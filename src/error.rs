use thiserror::Error;

/// Errors detected while assembling the bind table.
///
/// The configuration front-end resolves action names and modifier masks
/// before this crate sees anything, so the only failures left here are
/// structural: duplicate or empty entries that would make runtime
/// matching ambiguous.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("keybind has neither keysyms nor keycodes")]
    EmptyKeybind,

    #[error("keybind has no actions")]
    KeybindWithoutActions,

    #[error("duplicate keybind for modifier mask {modifiers:#x}")]
    DuplicateKeybind { modifiers: u32 },

    #[error("duplicate mousebind for button {button} in the same context")]
    DuplicateMousebind { button: u32 },
}
