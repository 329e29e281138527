//! Status-message classification.
//!
//! The controller reports job progress as human-readable text, so terminal
//! states have to be recognized by string matching — a fragile contract
//! inherited from the upstream API. All matching rules live in the two rule
//! tables below, evaluated top to bottom; nothing else in the crate
//! compares status text.

/// How a rule matches the text it is applied to.
#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// The whole message equals this string.
    Exact(&'static str),
    /// The message contains this string.
    Substring(&'static str),
    /// The message contains this string, compared case-insensitively.
    /// The pattern itself must be lowercase.
    CiSubstring(&'static str),
}

impl Pattern {
    fn matches(&self, text: &str) -> bool {
        match self {
            Pattern::Exact(wanted) => text == *wanted,
            Pattern::Substring(wanted) => text.contains(wanted),
            Pattern::CiSubstring(wanted) => text.to_lowercase().contains(wanted),
        }
    }
}

/// Outcome of one schedule-confirmation poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSignal {
    /// The controller accepted the job; safe to act on it.
    Confirmed,
    /// A conflicting maintenance operation holds the Lifecycle Controller.
    Blocked,
    /// Not scheduled yet; keep polling.
    Pending,
}

const SCHEDULE_RULES: &[(Pattern, ScheduleSignal)] = &[
    (
        Pattern::Exact("Task successfully scheduled."),
        ScheduleSignal::Confirmed,
    ),
    (
        Pattern::Substring("Lifecycle Controller in use"),
        ScheduleSignal::Blocked,
    ),
];

pub fn classify_schedule(message: &str) -> ScheduleSignal {
    for (pattern, signal) in SCHEDULE_RULES {
        if pattern.matches(message) {
            return *signal;
        }
    }
    ScheduleSignal::Pending
}

/// Outcome of one completion poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionSignal {
    /// The controller marked the job failed.
    Failed,
    /// The job completed successfully.
    Completed,
    /// Still executing; keep polling.
    Pending,
}

/// Which job field a completion rule is applied to.
#[derive(Debug, Clone, Copy)]
enum Field {
    Message,
    JobState,
}

/// Ordered: failure rules come first, so a message that happens to carry
/// both a failure marker and the success phrase classifies as failed.
const COMPLETION_RULES: &[(Field, Pattern, CompletionSignal)] = &[
    (
        Field::Message,
        Pattern::CiSubstring("fail"),
        CompletionSignal::Failed,
    ),
    (
        Field::JobState,
        Pattern::CiSubstring("fail"),
        CompletionSignal::Failed,
    ),
    (
        Field::Message,
        Pattern::Substring("completed successfully"),
        CompletionSignal::Completed,
    ),
];

pub fn classify_completion(message: &str, job_state: &str) -> CompletionSignal {
    for (field, pattern, signal) in COMPLETION_RULES {
        let text = match field {
            Field::Message => message,
            Field::JobState => job_state,
        };
        if pattern.matches(text) {
            return *signal;
        }
    }
    CompletionSignal::Pending
}
