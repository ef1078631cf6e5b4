/*! Pipeline states.

```text
Idle -> LoadingResources -> Running(column) -> Checkpointing -> Running | Done
```

Any state but `Done` can become `Failed`. `Done` and `Failed` are terminal.
!*/
use log::debug;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Idle,
    LoadingResources,
    /// annotating the column at this position in the resolved column list
    Running(usize),
    Checkpointing,
    Done,
    Failed,
}

impl State {
    /// Checks if `self -> next` is a valid transition.
    pub fn can_become(self, next: State) -> bool {
        use State::*;
        match (self, next) {
            (Done, _) | (Failed, _) => false,
            (_, Failed) => true,
            (Idle, LoadingResources) => true,
            (LoadingResources, Running(_)) | (LoadingResources, Done) => true,
            (Running(_), Running(_)) | (Running(_), Checkpointing) | (Running(_), Done) => true,
            (Checkpointing, Running(_)) | (Checkpointing, Done) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, State::Done | State::Failed)
    }
}

/// Current state of a run, logging every change.
#[derive(Debug, Default)]
pub struct StateMachine {
    state: State,
}

impl StateMachine {
    pub fn state(&self) -> State {
        self.state
    }

    /// Move to `next`, failing on an invalid transition.
    pub fn advance(&mut self, next: State) -> Result<(), Error> {
        if self.state == next {
            return Ok(());
        }
        if !self.state.can_become(next) {
            return Err(Error::Custom(format!(
                "invalid pipeline transition {:?} -> {:?}",
                self.state, next
            )));
        }
        debug!("state: {:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Move to [State::Failed] and give `error` back, so that it can be used in `map_err`.
    pub fn fail(&mut self, error: Error) -> Error {
        if !self.state.is_terminal() {
            debug!("state: {:?} -> Failed ({})", self.state, error);
            self.state = State::Failed;
        }
        error
    }
}
