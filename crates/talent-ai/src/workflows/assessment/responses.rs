use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{Answer, Question, QuestionId, QuestionKind};

/// Answers collected during a run, keyed by question identity. Last write wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResponseStore {
    answers: BTreeMap<QuestionId, Answer>,
}

impl ResponseStore {
    /// Check an answer against the question it targets without storing it.
    pub fn validate(question: &Question, answer: &Answer) -> Result<(), AnswerRejection> {
        match (&question.kind, answer) {
            (QuestionKind::Choice { choices }, Answer::Choice(index)) => {
                if *index < choices.len() {
                    Ok(())
                } else {
                    Err(AnswerRejection::ChoiceOutOfRange {
                        question: question.id.clone(),
                        index: *index,
                        available: choices.len(),
                    })
                }
            }
            (QuestionKind::Scale { min, max, .. }, Answer::Scale(value)) => {
                if value.is_finite() && *value >= *min && *value <= *max {
                    Ok(())
                } else {
                    Err(AnswerRejection::ScaleOutOfBounds {
                        question: question.id.clone(),
                        value: *value,
                        min: *min,
                        max: *max,
                    })
                }
            }
            (kind, _) => Err(AnswerRejection::KindMismatch {
                question: question.id.clone(),
                expected: kind.label(),
            }),
        }
    }

    /// Store a validated answer, returning the answer it replaced. The store is untouched on rejection.
    pub fn record(
        &mut self,
        question: &Question,
        answer: Answer,
    ) -> Result<Option<Answer>, AnswerRejection> {
        Self::validate(question, &answer)?;
        Ok(self.answers.insert(question.id.clone(), answer))
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Answer> {
        self.answers.get(id)
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.answers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Number of the given questions that have an answer.
    pub fn answered_among<'a>(&self, questions: impl IntoIterator<Item = &'a Question>) -> usize {
        questions
            .into_iter()
            .filter(|question| self.contains(&question.id))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &Answer)> {
        self.answers.iter()
    }

    pub fn to_map(&self) -> BTreeMap<QuestionId, Answer> {
        self.answers.clone()
    }
}

/// Local, recoverable rejection of a single answer. The caller should re-prompt.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnswerRejection {
    #[error("question {0} is not part of this run")]
    UnknownQuestion(QuestionId),
    #[error("question {0} has not been presented yet")]
    NotYetPresented(QuestionId),
    #[error("choice {index} is out of range for question {question} ({available} choices)")]
    ChoiceOutOfRange {
        question: QuestionId,
        index: usize,
        available: usize,
    },
    #[error("value {value} is outside [{min}, {max}] for question {question}")]
    ScaleOutOfBounds {
        question: QuestionId,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("question {question} expects a {expected} answer")]
    KindMismatch {
        question: QuestionId,
        expected: &'static str,
    },
}
