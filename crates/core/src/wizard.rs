//! Wizard step definitions and navigation rules.
//!
//! The wizard has exactly three ordinal steps. Forward navigation is gated by
//! the caller-supplied `can_proceed` flag; backward navigation is always one
//! step; jumping is only allowed to a step already behind the current one.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Product,
    Model,
    Environment,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: usize = 3;

impl WizardStep {
    /// Convert a 0-based index to a step.
    pub fn from_index(index: usize) -> Result<Self, CoreError> {
        match index {
            0 => Ok(Self::Product),
            1 => Ok(Self::Model),
            2 => Ok(Self::Environment),
            _ => Err(CoreError::Validation(format!(
                "Invalid step index {index}. Must be below {TOTAL_STEPS}"
            ))),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Product => 0,
            Self::Model => 1,
            Self::Environment => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Model => "Model",
            Self::Environment => "Environment",
        }
    }

    /// The last step, from which generation is triggered.
    pub fn is_terminal(self) -> bool {
        self == Self::Environment
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Validate a `Next` transition and return the target step.
pub fn next_step(current: WizardStep, can_proceed: bool) -> Result<WizardStep, CoreError> {
    if current.is_terminal() {
        return Err(CoreError::Validation(format!(
            "Cannot advance past the final step ({})",
            current.label()
        )));
    }
    if !can_proceed {
        return Err(CoreError::Validation(format!(
            "Step {} is incomplete",
            current.label()
        )));
    }
    WizardStep::from_index(current.index() + 1)
}

/// Validate a `Back` transition and return the target step.
pub fn previous_step(current: WizardStep) -> Result<WizardStep, CoreError> {
    match current.index() {
        0 => Err(CoreError::Validation(
            "Already on the first step".to_string(),
        )),
        i => WizardStep::from_index(i - 1),
    }
}

/// Validate a direct jump. Only already-completed (lower) steps are reachable.
pub fn validate_jump(current: WizardStep, target: WizardStep) -> Result<(), CoreError> {
    if target < current {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot jump from {} to {}: only completed steps can be revisited",
            current.label(),
            target.label()
        )))
    }
}

/// Whether generation may start from `current`.
pub fn can_generate_from(current: WizardStep) -> bool {
    current.is_terminal()
}

// ---------------------------------------------------------------------------
// Keyboard accelerator
// ---------------------------------------------------------------------------

/// A key press with its modifiers, as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCombo {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
}

impl KeyCombo {
    /// Ctrl+Enter, or Cmd+Enter on macOS hosts.
    pub fn is_confirm(&self) -> bool {
        self.key.eq_ignore_ascii_case("enter") && (self.ctrl || self.meta) && !self.alt
    }
}

/// Whether `combo` should start a generation right now.
pub fn accelerator_fires(combo: &KeyCombo, current: WizardStep, generating: bool) -> bool {
    combo.is_confirm() && can_generate_from(current) && !generating
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
