//! Quiz progress: the sole producer of the scene's `closeness` and hugging signals.

use crate::{
    foundation::error::{EmbraceError, EmbraceResult},
    scene::layout::MAX_CLOSENESS,
};

/// Questions in one run.
pub const QUESTION_COUNT: usize = 5;

/// Which part of the greeting the session is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    /// Answering questions.
    #[default]
    Questions,
    /// Full closeness reached; the hug plays.
    Hug,
    /// The hug has played out.
    Heart,
    /// Terminal scene for a run that did not reach full closeness.
    DoneNonperfect,
}

/// Persisted quiz state.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Progress {
    /// Index of the next question; `QUESTION_COUNT` once every question is answered.
    pub step: u8,
    /// Recorded answers, `None` while unanswered.
    pub answers: [Option<bool>; QUESTION_COUNT],
    /// Current scene.
    pub scene: SceneKind,
    /// How close the actors stand, `0..=5`.
    pub closeness: u8,
}

/// What one answer changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// The answer moved the actors.
    pub closeness_changed: bool,
    /// Scene after the answer.
    pub scene: SceneKind,
}

impl Progress {
    /// Reject out-of-range step or closeness.
    pub fn validate(&self) -> EmbraceResult<()> {
        if usize::from(self.step) > QUESTION_COUNT {
            return Err(EmbraceError::validation(format!(
                "progress step {} out of range 0..={QUESTION_COUNT}",
                self.step
            )));
        }
        if self.closeness > MAX_CLOSENESS {
            return Err(EmbraceError::validation(format!(
                "progress closeness {} out of range 0..={MAX_CLOSENESS}",
                self.closeness
            )));
        }
        Ok(())
    }

    /// The scene only hugs while the session sits in the hug scene.
    pub fn is_hugging(&self) -> bool {
        self.scene == SceneKind::Hug
    }

    /// The question awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&'static Question> {
        if self.scene != SceneKind::Questions {
            return None;
        }
        QUESTIONS.get(usize::from(self.step))
    }

    /// Record an answer to the current question.
    ///
    /// The last question always counts toward closeness, whatever was answered.
    pub fn answer(&mut self, positive: bool) -> EmbraceResult<AnswerOutcome> {
        let step = usize::from(self.step);
        if self.scene != SceneKind::Questions || step >= QUESTION_COUNT {
            return Err(EmbraceError::validation(format!(
                "no open question (scene {:?}, step {})",
                self.scene, self.step
            )));
        }

        self.answers[step] = Some(positive);
        let closeness_changed = positive || step == QUESTION_COUNT - 1;
        if closeness_changed {
            self.closeness = (self.closeness + 1).min(MAX_CLOSENESS);
        }
        self.step += 1;

        if usize::from(self.step) >= QUESTION_COUNT {
            self.scene = if self.closeness == MAX_CLOSENESS {
                SceneKind::Hug
            } else {
                SceneKind::DoneNonperfect
            };
        }

        Ok(AnswerOutcome {
            closeness_changed,
            scene: self.scene,
        })
    }

    /// Hug → heart once the hug sequence has played out. Returns whether anything changed.
    pub fn finish_hug(&mut self) -> bool {
        if self.scene != SceneKind::Hug {
            return false;
        }
        self.scene = SceneKind::Heart;
        true
    }
}

/// One quiz question with its two answer labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Question {
    /// Prompt.
    pub text: &'static str,
    /// Label of the answer that brings the actors closer.
    pub positive_label: &'static str,
    /// Label of the other answer.
    pub negative_label: &'static str,
}

/// The questions, in order.
pub const QUESTIONS: [Question; QUESTION_COUNT] = [
    Question {
        text: "Where did we share our very first olives?",
        positive_label: "The little place by the harbour",
        negative_label: "Some random street stall",
    },
    Question {
        text: "Where were we when we lay on the road watching the sky?",
        positive_label: "Out in the countryside after the storm",
        negative_label: "In the middle of rush hour",
    },
    Question {
        text: "How many times have you moved house?",
        positive_label: "Too many to count",
        negative_label: "Never once",
    },
    Question {
        text: "Who was with us the night we ran from the rain?",
        positive_label: "Your best friend",
        negative_label: "A famous pop singer",
    },
    Question {
        text: "Can I tell you how much I love you?",
        positive_label: "There aren't enough words",
        negative_label: "You never could",
    },
];

#[cfg(test)]
#[path = "../../tests/unit/session/progress.rs"]
mod tests;
