/// A single backlog item as exported from the issue tracker.
///
/// `points == 0` means the ticket has not been estimated yet. An empty
/// `sprint_label` means the ticket still sits in the backlog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ticket {
    pub name: String,
    pub points: u32,
    pub sprint_label: String,
}

impl Ticket {
    pub fn new(name: impl Into<String>, points: u32, sprint_label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points,
            sprint_label: sprint_label.into(),
        }
    }

    /// Case-sensitive substring match on "Sprint". Labels following another
    /// naming scheme are treated as backlog.
    pub fn is_sprint_ticket(&self) -> bool {
        self.sprint_label.contains("Sprint")
    }

    pub fn is_estimated(&self) -> bool {
        self.points != 0
    }
}
