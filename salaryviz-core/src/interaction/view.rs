use salaryviz_common::error::{Result, SalaryVizError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    #[default]
    Histogram,
    Scatter,
    /// Chord or sankey, depending on the relationship style
    Relationship,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [
        ViewKind::Histogram,
        ViewKind::Scatter,
        ViewKind::Relationship,
    ];

    pub fn control_id(&self) -> &'static str {
        match self {
            ViewKind::Histogram => "show-hist",
            ViewKind::Scatter => "show-scatter",
            ViewKind::Relationship => "show-chord",
        }
    }

    pub fn from_control_id(id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|view| view.control_id() == id)
            .ok_or_else(|| SalaryVizError::specification(format!("Unknown view control: {id}")))
    }
}

impl Display for ViewKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ViewKind::Histogram => "histogram",
            ViewKind::Scatter => "scatter",
            ViewKind::Relationship => "relationship",
        };
        write!(f, "{name}")
    }
}

/// Three mutually exclusive views. Exactly one is visible at any time and every view is
/// reachable from every other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSwitcher {
    active: ViewKind,
}

impl Default for ViewSwitcher {
    fn default() -> Self {
        Self::new(ViewKind::Histogram)
    }
}

impl ViewSwitcher {
    pub fn new(initial: ViewKind) -> Self {
        Self { active: initial }
    }

    pub fn active(&self) -> ViewKind {
        self.active
    }

    pub fn is_visible(&self, view: ViewKind) -> bool {
        self.active == view
    }

    /// Returns whether the visible view changed
    pub fn select(&mut self, view: ViewKind) -> bool {
        let changed = self.active != view;
        if changed {
            log::debug!("Switching view from {} to {}", self.active, view);
            self.active = view;
        }
        changed
    }

    pub fn select_control(&mut self, id: &str) -> Result<bool> {
        Ok(self.select(ViewKind::from_control_id(id)?))
    }

    /// Visibility flag for each view, in `ViewKind::ALL` order
    pub fn visibility(&self) -> [(ViewKind, bool); 3] {
        ViewKind::ALL.map(|view| (view, self.is_visible(view)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let switcher = ViewSwitcher::default();
        assert_eq!(switcher.active(), ViewKind::Histogram);
        assert!(switcher.is_visible(ViewKind::Histogram));
    }

    #[test]
    fn test_exactly_one_visible_after_any_sequence() {
        let mut switcher = ViewSwitcher::new(ViewKind::Scatter);
        let sequence = [
            ViewKind::Relationship,
            ViewKind::Relationship,
            ViewKind::Histogram,
            ViewKind::Scatter,
            ViewKind::Histogram,
        ];
        for view in sequence {
            switcher.select(view);
            let visible: Vec<_> = switcher
                .visibility()
                .into_iter()
                .filter(|(_, v)| *v)
                .map(|(k, _)| k)
                .collect();
            assert_eq!(visible, vec![view]);
        }
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut switcher = ViewSwitcher::default();
        assert!(switcher.select(ViewKind::Scatter));
        assert!(!switcher.select(ViewKind::Scatter));
        assert_eq!(switcher.active(), ViewKind::Scatter);
    }

    #[test]
    fn test_control_ids() {
        let mut switcher = ViewSwitcher::default();
        assert!(switcher.select_control("show-chord").unwrap());
        assert_eq!(switcher.active(), ViewKind::Relationship);
        assert_eq!(
            ViewKind::from_control_id("show-hist").unwrap(),
            ViewKind::Histogram
        );
        assert!(switcher.select_control("show-pie").is_err());
        assert_eq!(switcher.active(), ViewKind::Relationship);
    }
}
