//! The Hidden/Visible state machine.

use std::fmt;

/// Whether the dropdown is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Created but not shown (initial state).
    #[default]
    Hidden,
    /// Shown below the input.
    Visible,
}

impl Visibility {
    /// The inline `display` value for this state.
    pub fn display_value(self) -> &'static str {
        match self {
            Self::Hidden => "none",
            Self::Visible => "block",
        }
    }

    /// Whether this is [`Visibility::Visible`].
    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => f.write_str("hidden"),
            Self::Visible => f.write_str("visible"),
        }
    }
}

/// An event that can move the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The input's value changed.
    Input {
        /// Whether the input is now empty.
        value_empty: bool,
    },
    /// A click landed somewhere in the document.
    Click {
        /// Whether the click hit the input, the dropdown, or a descendant of
        /// either.
        inside: bool,
        /// Whether the input is empty.
        value_empty: bool,
    },
}

impl Trigger {
    /// The state after this trigger, or `None` to leave it unchanged.
    pub fn target(self) -> Option<Visibility> {
        match self {
            Self::Input { value_empty: false } => Some(Visibility::Visible),
            Self::Input { value_empty: true } => Some(Visibility::Hidden),
            Self::Click { inside: false, .. } => Some(Visibility::Hidden),
            Self::Click {
                inside: true,
                value_empty: false,
            } => Some(Visibility::Visible),
            Self::Click {
                inside: true,
                value_empty: true,
            } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_drives_visibility() {
        assert_eq!(Trigger::Input { value_empty: false }.target(), Some(Visibility::Visible));
        assert_eq!(Trigger::Input { value_empty: true }.target(), Some(Visibility::Hidden));
    }

    #[test]
    fn outside_click_always_hides() {
        for value_empty in [true, false] {
            let trigger = Trigger::Click {
                inside: false,
                value_empty,
            };
            assert_eq!(trigger.target(), Some(Visibility::Hidden));
        }
    }

    #[test]
    fn inside_click_reshows_only_with_a_value() {
        let with_value = Trigger::Click {
            inside: true,
            value_empty: false,
        };
        let without_value = Trigger::Click {
            inside: true,
            value_empty: true,
        };
        assert_eq!(with_value.target(), Some(Visibility::Visible));
        assert_eq!(without_value.target(), None);
    }

    #[test]
    fn initial_state_is_hidden() {
        assert_eq!(Visibility::default(), Visibility::Hidden);
        assert_eq!(Visibility::Hidden.display_value(), "none");
        assert_eq!(Visibility::Visible.to_string(), "visible");
    }
}
