//! Transition graph shared by the status enums.

use super::ValidationError;

/// A status enum with a fixed transition graph.
///
/// `valid_transitions` is the graph; everything else is derived from it.
/// Self-transitions are never part of the graph: callers that treat "same
/// status" as a no-op check for it before consulting the machine.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Targets reachable in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Returns `target` if the edge exists.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "status",
                format!("no transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// No outgoing edges.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Listing {
        Draft,
        Live,
        Withdrawn,
    }

    impl StateMachine for Listing {
        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Listing::Draft => vec![Listing::Live, Listing::Withdrawn],
                Listing::Live => vec![Listing::Withdrawn],
                Listing::Withdrawn => vec![],
            }
        }
    }

    #[test]
    fn edge_in_graph_is_allowed() {
        assert_eq!(Listing::Draft.transition_to(Listing::Live), Ok(Listing::Live));
    }

    #[test]
    fn edge_outside_graph_names_both_states() {
        let err = Listing::Live.transition_to(Listing::Draft).unwrap_err();
        assert_eq!(err.field(), "status");
        assert!(err.to_string().contains("Live"));
        assert!(err.to_string().contains("Draft"));
    }

    #[test]
    fn self_transition_is_not_an_edge() {
        assert!(!Listing::Live.can_transition_to(&Listing::Live));
    }

    #[test]
    fn terminal_only_without_exits() {
        assert!(Listing::Withdrawn.is_terminal());
        assert!(!Listing::Draft.is_terminal());
    }
}
