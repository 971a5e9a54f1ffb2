use simulado_core::model::ExamSession;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamProgress {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub position: usize,
    pub remaining_secs: u32,
    pub is_complete: bool,
}

impl ExamProgress {
    #[must_use]
    pub fn of(session: &ExamSession) -> Self {
        let total = session.total_questions();
        let answered = session.answered_count();
        Self {
            total,
            answered,
            unanswered: total.saturating_sub(answered),
            position: session.position(),
            remaining_secs: session.remaining_secs(),
            is_complete: session.is_complete(),
        }
    }
}

/// Render a countdown as `m:ss`, or `h:mm:ss` once it crosses an hour.
#[must_use]
pub fn format_clock(total_secs: u32) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
