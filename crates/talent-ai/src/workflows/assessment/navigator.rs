//! Cursor arithmetic over the flattened question stream of a run.
//!
//! Modules are visited strictly in selection order and each module's questions in catalog order.
//! These functions never reorder, skip, or interleave.

use serde::Serialize;

use super::domain::{ModuleId, Question};
use super::session::{SessionState, Stage};

/// The question at the session cursor, or `None` once every module is exhausted.
pub fn current_question(session: &SessionState) -> Option<&Question> {
    let module = current_module(session)?;
    session.questions_for(module).get(session.question_cursor)
}

pub fn current_module(session: &SessionState) -> Option<ModuleId> {
    session
        .selected_modules
        .get(session.module_cursor)
        .copied()
}

/// Move past the current question. A no-op unless the current question has a recorded answer.
/// Exhausting the last module moves the run to processing.
pub fn advance(session: &SessionState) -> SessionState {
    if session.stage != Stage::Questions {
        return session.clone();
    }
    let Some(question) = current_question(session) else {
        return session.clone();
    };
    if !session.responses.contains(&question.id) {
        return session.clone();
    }

    let module_len = current_module(session)
        .map(|module| session.questions_for(module).len())
        .unwrap_or(0);

    let mut next = session.clone();
    next.question_cursor += 1;
    if next.question_cursor >= module_len {
        next.question_cursor = 0;
        next.module_cursor += 1;
    }
    if next.module_cursor >= next.selected_modules.len() {
        next.stage = Stage::Processing;
    }
    next
}

/// Answered questions against the denominator fixed at questions-stage entry.
pub fn progress(session: &SessionState) -> Progress {
    Progress {
        completed: session.responses.len(),
        total: session.total_questions,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}
