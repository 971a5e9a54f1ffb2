/// Read-only reference to the user taking an exam.
///
/// Passed explicitly into session construction instead of being looked up from
/// ambient application state, so the session core stays testable on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    id: String,
    name: String,
}

impl CurrentUser {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
