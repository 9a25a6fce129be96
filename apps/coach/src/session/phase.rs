/// Where the current question cycle is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    QuestionLoading,
    /// Question shown, countdown running.
    QuestionActive,
    /// Feedback request in flight. Further submissions are dropped.
    Submitting,
}

/// Inputs that move a session between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Start,
    QuestionLoaded,
    QuestionFailed,
    Submit,
    FeedbackDone,
    End,
}

impl Phase {
    /// The transition table. `None` means the signal is not accepted in this phase.
    ///
    /// `Submit` is only accepted from `QuestionActive`, which is what makes a
    /// manual submit and a timeout mutually exclusive.
    pub fn on(self, signal: Signal) -> Option<Phase> {
        use Phase::*;
        use Signal::*;

        match (self, signal) {
            (Idle, Start) => Some(QuestionLoading),
            (QuestionLoading, QuestionLoaded) => Some(QuestionActive),
            (QuestionLoading, QuestionFailed) => Some(Idle),
            (QuestionActive, Submit) => Some(Submitting),
            (Submitting, FeedbackDone) => Some(QuestionLoading),
            (QuestionLoading | QuestionActive | Submitting, End) => Some(Idle),
            _ => None,
        }
    }

    pub fn is_active(self) -> bool {
        self != Phase::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PHASES: [Phase; 4] = [
        Phase::Idle,
        Phase::QuestionLoading,
        Phase::QuestionActive,
        Phase::Submitting,
    ];

    #[test]
    fn test_full_cycle() {
        let phase = Phase::Idle.on(Signal::Start).unwrap();
        let phase = phase.on(Signal::QuestionLoaded).unwrap();
        let phase = phase.on(Signal::Submit).unwrap();
        assert_eq!(phase, Phase::Submitting);
        let phase = phase.on(Signal::FeedbackDone).unwrap();
        assert_eq!(phase, Phase::QuestionLoading);
    }

    #[test]
    fn test_submit_only_from_question_active() {
        for phase in ALL_PHASES {
            let accepted = phase.on(Signal::Submit).is_some();
            assert_eq!(accepted, phase == Phase::QuestionActive, "{phase:?}");
        }
    }

    #[test]
    fn test_end_always_lands_idle_except_from_idle() {
        for phase in ALL_PHASES {
            match phase {
                Phase::Idle => assert_eq!(phase.on(Signal::End), None),
                _ => assert_eq!(phase.on(Signal::End), Some(Phase::Idle)),
            }
        }
    }

    #[test]
    fn test_question_failure_returns_to_idle() {
        assert_eq!(
            Phase::QuestionLoading.on(Signal::QuestionFailed),
            Some(Phase::Idle)
        );
        assert_eq!(Phase::QuestionActive.on(Signal::QuestionLoaded), None);
    }
}
