use crate::{PageSnapshot, StopReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageMsg {
    /// Listing has been opened; begin with page 1.
    Start,
    /// Neither the primary nor the generic table selector appeared in time.
    TableMissing,
    /// A table was rendered but none could be found in the page source.
    TableUnparsable,
    /// Rows of the current page were extracted.
    PageExtracted { snapshot: PageSnapshot },
    /// State of the "next" control on the current page.
    NextControl(NextControl),
    /// Result of clicking "next".
    AdvanceFinished(Advance),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextControl {
    Missing,
    Disabled,
    Enabled,
}

impl NextControl {
    const DISABLED_CLASS: &'static str = "is-disabled";

    /// Classifies the control from its parent element's class attribute.
    /// `None` means the control itself was not found.
    pub fn from_parent_class(class: Option<&str>) -> Self {
        match class {
            None => NextControl::Missing,
            Some(class) if class.split_whitespace().any(|c| c == Self::DISABLED_CLASS) => {
                NextControl::Disabled
            }
            Some(_) => NextControl::Enabled,
        }
    }
}

/// Outcome of one "next" click under the retry policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Advanced,
    Stopped(StopReason),
}
