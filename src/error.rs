use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    NoLocation,
    TaskNotFound,
    InstanceNotFound,
    PatternNotFound,
    StateNotFound,
    DepartmentNotFound,
    AreaNotFound,
    NoteNotFound,
    TemplateNotFound,
    AmbiguousRef,
    MissingConfiguration,
    InvalidStatusTransition,
    ValidationError,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::NoLocation => "NO_LOCATION",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::InstanceNotFound => "INSTANCE_NOT_FOUND",
            Self::PatternNotFound => "PATTERN_NOT_FOUND",
            Self::StateNotFound => "STATE_NOT_FOUND",
            Self::DepartmentNotFound => "DEPARTMENT_NOT_FOUND",
            Self::AreaNotFound => "AREA_NOT_FOUND",
            Self::NoteNotFound => "NOTE_NOT_FOUND",
            Self::TemplateNotFound => "TEMPLATE_NOT_FOUND",
            Self::AmbiguousRef => "AMBIGUOUS_REF",
            Self::MissingConfiguration => "MISSING_CONFIGURATION",
            Self::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct HubtasksError {
    pub code: ErrorCode,
    pub message: String,
}

impl HubtasksError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "hubtasks is not initialized. Run `hubtasks init` first.",
        )
    }

    pub fn no_location() -> Self {
        Self::new(
            ErrorCode::NoLocation,
            "No location selected. Use `hubtasks location use <id>` or `--location <id>`.",
        )
    }

    pub fn task_not_found(reference: &str) -> Self {
        Self::new(ErrorCode::TaskNotFound, format!("Task not found: {reference}"))
    }

    pub fn instance_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::InstanceNotFound,
            format!("Task instance not found: {reference}"),
        )
    }

    pub fn pattern_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::PatternNotFound,
            format!("Recurring pattern not found: {reference}"),
        )
    }

    pub fn state_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::StateNotFound,
            format!("Task state not found: {reference}"),
        )
    }

    pub fn department_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::DepartmentNotFound,
            format!("Department not found: {reference}"),
        )
    }

    pub fn area_not_found(reference: &str) -> Self {
        Self::new(ErrorCode::AreaNotFound, format!("Area not found: {reference}"))
    }

    pub fn note_not_found(reference: &str) -> Self {
        Self::new(ErrorCode::NoteNotFound, format!("Note not found: {reference}"))
    }

    pub fn template_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::TemplateNotFound,
            format!("Checklist template not found: {reference}"),
        )
    }

    pub fn ambiguous_ref(reference: &str, candidates: &[String]) -> Self {
        Self::new(
            ErrorCode::AmbiguousRef,
            format!(
                "Ambiguous reference '{}'. Candidates: {}",
                reference,
                candidates.join(", ")
            ),
        )
    }

    pub fn missing_configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingConfiguration, message)
    }

    pub fn invalid_transition(from: &str, to: &str) -> Self {
        Self::new(
            ErrorCode::InvalidStatusTransition,
            format!("Invalid status transition: {from} → {to}"),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

impl From<rusqlite::Error> for HubtasksError {
    fn from(e: rusqlite::Error) -> Self {
        Self::database(e.to_string())
    }
}

impl From<serde_json::Error> for HubtasksError {
    fn from(e: serde_json::Error) -> Self {
        Self::validation(format!("Invalid JSON: {e}"))
    }
}
