use serde::{Deserialize, Serialize};

/// What the platform offers for motion sensing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionCapability {
    /// No motion API at all.
    Unsupported,
    /// Motion API available without asking.
    Ungated,
    /// Motion API behind an explicit permission prompt.
    Gated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptAnswer {
    Granted,
    Denied,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionOutcome {
    Granted,
    Denied,
    Unavailable,
}

impl PermissionOutcome {
    /// Resolve the gate. The prompt only runs for gated platforms; a prompt
    /// that errors counts as a denial.
    pub fn resolve<E>(
        capability: MotionCapability,
        prompt: impl FnOnce() -> Result<PromptAnswer, E>,
    ) -> Self {
        match capability {
            MotionCapability::Unsupported => PermissionOutcome::Unavailable,
            MotionCapability::Ungated => PermissionOutcome::Granted,
            MotionCapability::Gated => match prompt() {
                Ok(PromptAnswer::Granted) => PermissionOutcome::Granted,
                Ok(PromptAnswer::Denied) | Err(_) => PermissionOutcome::Denied,
            },
        }
    }

    pub fn input_mode(self) -> InputMode {
        match self {
            PermissionOutcome::Granted => InputMode::Sensor,
            PermissionOutcome::Denied | PermissionOutcome::Unavailable => InputMode::Fallback,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Permission not resolved yet; no input is accepted.
    Pending,
    Sensor,
    Fallback,
}

impl InputMode {
    /// Call to action shown above the progress bar.
    pub fn prompt(self) -> &'static str {
        match self {
            InputMode::Pending | InputMode::Sensor => "Потряси телефон!",
            InputMode::Fallback => "Жми на котика!",
        }
    }
}
