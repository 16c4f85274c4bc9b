//! Page navigation and the linear upload → explore → select → results wizard.
//!
//! Navigation here is pure: moving between steps never talks to the
//! backend. Cleaning the dataset is the separate prepare-for-modeling
//! action on [`crate::session::Session`].

use std::fmt;
use std::str::FromStr;

/// Top-level page picked from the side navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Dashboard,
    Workflow,
    Table,
    Plots,
    History,
    Settings,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Dashboard,
        Page::Workflow,
        Page::Table,
        Page::Plots,
        Page::History,
        Page::Settings,
    ];

    /// `data-page` value; the section id is `{id}-section`.
    pub fn id(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Workflow => "workflow",
            Page::Table => "table",
            Page::Plots => "plots",
            Page::History => "history",
            Page::Settings => "settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Workflow => "Workflow",
            Page::Table => "Custom Table",
            Page::Plots => "Plots",
            Page::History => "History",
            Page::Settings => "Settings",
        }
    }

    pub fn section_id(&self) -> String {
        format!("{}-section", self.id())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| format!("unknown page: {s}"))
    }
}

/// One step of the workflow wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WorkflowStep {
    #[default]
    Upload,
    Exploration,
    Selection,
    Results,
}

impl WorkflowStep {
    pub const ALL: [WorkflowStep; 4] = [
        WorkflowStep::Upload,
        WorkflowStep::Exploration,
        WorkflowStep::Selection,
        WorkflowStep::Results,
    ];

    /// DOM id of the step's section.
    pub fn section_id(&self) -> &'static str {
        match self {
            WorkflowStep::Upload => "upload-section",
            WorkflowStep::Exploration => "exploration-section",
            WorkflowStep::Selection => "selection-section",
            WorkflowStep::Results => "results-section",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WorkflowStep::Upload => "Upload Data",
            WorkflowStep::Exploration => "Explore Data",
            WorkflowStep::Selection => "Select Model",
            WorkflowStep::Results => "Results",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Option<WorkflowStep> {
        WorkflowStep::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<WorkflowStep> {
        self.index().checked_sub(1).map(|i| WorkflowStep::ALL[i])
    }

    /// Model selection needs a cleaned dataset.
    pub fn requires_prepared_data(&self) -> bool {
        matches!(self, WorkflowStep::Selection)
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_id())
    }
}

/// Which page and wizard step are showing. Exactly one of each is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigator {
    page: Page,
    step: WorkflowStep,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    pub fn is_active(&self, page: Page) -> bool {
        self.page == page
    }

    /// Switch page. Opening the workflow starts over at the upload step.
    pub fn open(&mut self, page: Page) {
        self.page = page;
        if page == Page::Workflow {
            self.step = WorkflowStep::Upload;
        }
    }

    /// Move to a known step.
    pub fn show(&mut self, step: WorkflowStep) {
        self.step = step;
        self.page = Page::Workflow;
    }

    /// One step forward; returns the new step, or `None` at the end.
    pub fn advance(&mut self) -> Option<WorkflowStep> {
        let next = self.step.next()?;
        self.show(next);
        Some(next)
    }

    /// One step back; returns the new step, or `None` at the start.
    pub fn back(&mut self) -> Option<WorkflowStep> {
        let prev = self.step.previous()?;
        self.show(prev);
        Some(prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_order() {
        let mut nav = Navigator::new();
        assert_eq!(nav.step(), WorkflowStep::Upload);
        assert_eq!(nav.advance(), Some(WorkflowStep::Exploration));
        assert_eq!(nav.advance(), Some(WorkflowStep::Selection));
        assert_eq!(nav.advance(), Some(WorkflowStep::Results));
        assert_eq!(nav.advance(), None);
        assert_eq!(nav.step(), WorkflowStep::Results);
        assert_eq!(nav.back(), Some(WorkflowStep::Selection));
    }

    #[test]
    fn test_back_at_start_stays() {
        let mut nav = Navigator::new();
        assert_eq!(nav.back(), None);
        assert_eq!(nav.step(), WorkflowStep::Upload);
    }

    #[test]
    fn test_opening_workflow_resets_step() {
        let mut nav = Navigator::new();
        nav.show(WorkflowStep::Results);
        nav.open(Page::History);
        assert_eq!(nav.step(), WorkflowStep::Results);
        assert!(nav.is_active(Page::History));
        nav.open(Page::Workflow);
        assert_eq!(nav.step(), WorkflowStep::Upload);
    }

    #[test]
    fn test_exactly_one_page_active() {
        let mut nav = Navigator::new();
        for page in Page::ALL {
            nav.open(page);
            let active = Page::ALL.iter().filter(|p| nav.is_active(**p)).count();
            assert_eq!(active, 1);
        }
    }

    #[test]
    fn test_page_ids_round_trip_through_section_ids() {
        assert_eq!("history".parse::<Page>(), Ok(Page::History));
        assert_eq!(Page::History.section_id(), "history-section");
        assert!(WorkflowStep::Selection.requires_prepared_data());
        assert!(!WorkflowStep::Exploration.requires_prepared_data());
        assert!(!WorkflowStep::Results.requires_prepared_data());
    }
}
