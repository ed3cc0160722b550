use crate::{Error, Result};

/// Lifecycle of the renderer.
///
/// ```text
/// Uninitialized --initialize--> Ready --begin_frame--> Rendering
///       ^                         ^                        |
///       |                         +-------end_frame--------+
///       +------------------ teardown (from any state)
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Uninitialized,
    Ready,
    Rendering,
}

impl State {
    pub fn initialize(&mut self) -> Result<()> {
        match self {
            State::Uninitialized => {
                *self = State::Ready;
                Ok(())
            }
            State::Ready | State::Rendering => Err(Error::AlreadyInitialized),
        }
    }

    pub fn begin_frame(&mut self) -> Result<()> {
        match self {
            State::Ready => {
                *self = State::Rendering;
                Ok(())
            }
            State::Uninitialized => Err(Error::NotInitialized),

            // Frames are rendered synchronously, so this can only happen if
            // a previous frame has been abandoned halfway through
            State::Rendering => Err(Error::NotInitialized),
        }
    }

    pub fn end_frame(&mut self) {
        if *self == State::Rendering {
            *self = State::Ready;
        }
    }

    pub fn teardown(&mut self) {
        *self = State::Uninitialized;
    }

    pub fn is_initialized(&self) -> bool {
        *self != State::Uninitialized
    }
}
