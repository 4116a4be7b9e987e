/// Whether a stage changed the record.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Transformed {
    Yes,
    No,
}

impl Transformed {
    pub fn is_yes(&self) -> bool {
        matches!(self, Transformed::Yes)
    }

    pub fn or(self, other: Transformed) -> Transformed {
        if self.is_yes() || other.is_yes() {
            Transformed::Yes
        } else {
            Transformed::No
        }
    }
}

impl From<bool> for Transformed {
    fn from(changed: bool) -> Self {
        if changed {
            Transformed::Yes
        } else {
            Transformed::No
        }
    }
}
