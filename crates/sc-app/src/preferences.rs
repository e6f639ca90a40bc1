//! Axis ranges remembered between rounds of one session.

use sc_core::AxisRange;
use tracing::debug;

/// How the caller wants this round's axis limits chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisChoice {
    /// Reuse whatever was saved earlier in the session.
    UseSaved,
    /// Use these limits, and remember them when `save` is set.
    Explicit {
        x: Option<AxisRange>,
        y: Option<AxisRange>,
        save: bool,
    },
}

impl AxisChoice {
    /// Autoscale both axes and save nothing.
    pub const AUTO: AxisChoice = AxisChoice::Explicit {
        x: None,
        y: None,
        save: false,
    };
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPreferences {
    saved_x: Option<AxisRange>,
    saved_y: Option<AxisRange>,
}

impl SessionPreferences {
    pub fn get(&self) -> (Option<AxisRange>, Option<AxisRange>) {
        (self.saved_x, self.saved_y)
    }

    pub fn has_saved(&self) -> bool {
        self.saved_x.is_some() || self.saved_y.is_some()
    }

    /// Store both ranges together, but only when `confirmed`.
    ///
    /// Returns whether anything was saved.
    pub fn offer_to_save(
        &mut self,
        x: Option<AxisRange>,
        y: Option<AxisRange>,
        confirmed: bool,
    ) -> bool {
        if !confirmed {
            return false;
        }
        debug!(?x, ?y, "Saving axis ranges");
        self.saved_x = x;
        self.saved_y = y;
        true
    }

    /// Limits to apply for `choice`, saving them first when requested.
    pub fn resolve(&mut self, choice: AxisChoice) -> (Option<AxisRange>, Option<AxisRange>) {
        match choice {
            AxisChoice::UseSaved => self.get(),
            AxisChoice::Explicit { x, y, save } => {
                self.offer_to_save(x, y, save);
                (x, y)
            }
        }
    }
}
