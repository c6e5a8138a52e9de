//! Dashboard page structure
//!
//! The page is a static tree of sections, tab groups and graph slots built
//! once at start-up. Graph slots refer to figures by id; the renderer pulls
//! the figures from a [`FigureSource`] and embeds them as JSON.
//!
//! ```text
//! Page
//!  └── Section (H2 title)
//!        ├── Table
//!        ├── Graph(id)
//!        ├── Dropdown ──fetch──> /api/callbacks/... ──> Graph
//!        └── Tabs
//!              └── Tab (label) ── nodes...
//! ```

mod render;

pub use render::{escape_html, render_html};

use crate::charts::{ids, DataTable};
use crate::figure::Figure;
use crate::Result;

/// Page title
pub const PAGE_TITLE: &str = "Presocial Data Dashboard";

/// A dropdown-driven figure lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callback {
    /// Per-cohort preference over time
    PatchPrefTime,
    /// Per-cohort preference over distance
    PatchPrefDist,
}

impl Callback {
    /// HTTP path serving this callback.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::PatchPrefTime => "/api/callbacks/patch-pref-time",
            Self::PatchPrefDist => "/api/callbacks/patch-pref-dist",
        }
    }

    const fn dropdown_id(self) -> &'static str {
        match self {
            Self::PatchPrefTime => "patch_pref_time_dropdown",
            Self::PatchPrefDist => "patch_pref_dist_dropdown",
        }
    }

    const fn graph_id(self) -> &'static str {
        match self {
            Self::PatchPrefTime => "patch_pref_time_graph",
            Self::PatchPrefDist => "patch_pref_dist_graph",
        }
    }
}

/// Where the renderer gets figures from.
pub trait FigureSource {
    /// Static figure by id.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFigure` if nothing is registered under `id`.
    fn figure(&self, id: &str) -> Result<&Figure>;

    /// Figure a callback returns for a dropdown value.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCohort` if `value` is not a known key.
    fn callback(&self, callback: Callback, value: &str) -> Result<&Figure>;
}

/// Whole dashboard page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Title shown in the browser and the top heading
    pub title: String,
    /// Sections in display order
    pub sections: Vec<Section>,
}

/// Titled block of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Element id
    pub id: &'static str,
    /// Heading text
    pub title: &'static str,
    /// Contents
    pub body: Vec<Node>,
}

/// One element of a section or tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Static figure slot
    Graph(&'static str),
    /// Selector whose value swaps the figure of a graph slot
    Dropdown(Dropdown),
    /// The session data table
    Table(DataTable),
    /// Tab group
    Tabs(Tabs),
}

/// Selector bound to a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropdown {
    /// Callback fetched on change
    pub callback: Callback,
    /// Selectable values
    pub options: Vec<String>,
    /// Initially selected value
    pub value: String,
}

impl Dropdown {
    /// Element id of the selector.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.callback.dropdown_id()
    }

    /// Element id of the graph the selector drives.
    #[must_use]
    pub const fn graph_id(&self) -> &'static str {
        self.callback.graph_id()
    }
}

/// Group of tabs, first one selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tabs {
    /// Element id
    pub id: &'static str,
    /// Tabs in order
    pub tabs: Vec<Tab>,
}

/// One tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    /// Element id
    pub id: &'static str,
    /// Button label
    pub label: &'static str,
    /// Contents
    pub children: Vec<Node>,
}

fn tabs(id: &'static str, tabs: impl Into<Vec<Tab>>) -> Node {
    Node::Tabs(Tabs {
        id,
        tabs: tabs.into(),
    })
}

fn tab(id: &'static str, label: &'static str, children: impl Into<Vec<Node>>) -> Tab {
    Tab {
        id,
        label,
        children: children.into(),
    }
}

fn graphs(ids: &[&'static str]) -> Vec<Node> {
    ids.iter().copied().map(Node::Graph).collect()
}

/// Absolute/Normalized tab pair.
fn abs_norm(
    id: &'static str,
    abs: (&'static str, &'static str),
    norm: (&'static str, &'static str),
) -> Node {
    tabs(
        id,
        [
            tab(abs.0, "Absolute", graphs(&[abs.1])),
            tab(norm.0, "Normalized", graphs(&[norm.1])),
        ],
    )
}

impl Page {
    /// The presocial dashboard layout.
    ///
    /// `cohorts` fills both cohort dropdowns; `selected` is their initial
    /// value.
    #[must_use]
    pub fn presocial(table: DataTable, cohorts: &[String], selected: &str) -> Self {
        let dropdown = |callback: Callback| {
            vec![
                Node::Dropdown(Dropdown {
                    callback,
                    options: cohorts.to_vec(),
                    value: selected.to_string(),
                }),
                Node::Graph(Callback::graph_id(callback)),
            ]
        };

        let sections = vec![
            Section {
                id: "data_table_div",
                title: "Data Table",
                body: vec![Node::Table(table)],
            },
            Section {
                id: "weight_viz_div",
                title: "Weight Viz",
                body: vec![tabs(
                    "weight_viz_tabs",
                    [
                        tab(
                            "weight_viz_session_tab",
                            "Weight Viz by Session",
                            graphs(&[ids::WEIGHT_ENTER_SESSION, ids::WEIGHT_DIFF_SESSION]),
                        ),
                        tab(
                            "weight_viz_subject_tab",
                            "Weight Viz by Subject",
                            graphs(&[ids::WEIGHT_ENTER_SUBJECT, ids::WEIGHT_DIFF_SUBJECT]),
                        ),
                    ],
                )],
            },
            Section {
                id: "time_viz_div",
                title: "Time Viz",
                body: vec![tabs(
                    "time_viz_tabs",
                    [
                        tab(
                            "time_viz_session_tab",
                            "Time Viz by Session",
                            graphs(&[
                                ids::DURATION_SESSION,
                                ids::POST_THRESH_DUR_SESSION,
                                ids::PRE_SAMPLING_BOTH_P_DUR_SESSION,
                            ]),
                        ),
                        tab(
                            "time_viz_subject_tab",
                            "Time Viz by Subject",
                            graphs(&[
                                ids::DURATION_SUBJECT,
                                ids::POST_THRESH_DUR_SUBJECT,
                                ids::PRE_SAMPLING_BOTH_P_DUR_SUBJECT,
                            ]),
                        ),
                    ],
                )],
            },
            Section {
                id: "hard_patch_info_div",
                title: "Hard Patch Info",
                body: vec![tabs(
                    "hard_patch_info_tabs",
                    [
                        tab(
                            "hard_patch_session_tab",
                            "Hard Patch by Session",
                            graphs(&[ids::HARD_PATCH_SESSION]),
                        ),
                        tab(
                            "hard_patch_subject_tab",
                            "Hard Patch by Subject",
                            graphs(&[ids::HARD_PATCH_SUBJECT]),
                        ),
                    ],
                )],
            },
            Section {
                id: "patch_pref_sesh_div",
                title: "Patch Preference within Sessions",
                body: vec![tabs(
                    "cont_patch_pref_tabs",
                    [
                        tab(
                            "cont_patch_pref_time_tab",
                            "Continuous Patch Preference Over Time within a Session",
                            dropdown(Callback::PatchPrefTime),
                        ),
                        tab(
                            "cont_patch_pref_dist_tab",
                            "Continuous Patch Preference Over Distance within a Session",
                            dropdown(Callback::PatchPrefDist),
                        ),
                    ],
                )],
            },
            Section {
                id: "patch_pref_subj_div",
                title: "Patch Preference within Subjects",
                body: vec![tabs(
                    "cont_patch_pref_subj_tabs",
                    [
                        tab(
                            "cont_patch_pref_subj_time_tab",
                            "Continuous Patch Preference Over Time by Subject",
                            graphs(&[ids::PATCH_PREF_TIME_SUBJ]),
                        ),
                        tab(
                            "cont_patch_pref_subj_dist_tab",
                            "Continuous Patch Preference Over Distance by Subject",
                            graphs(&[ids::PATCH_PREF_DIST_SUBJ]),
                        ),
                    ],
                )],
            },
            Section {
                id: "wheel_viz_div",
                title: "Wheel Viz",
                body: vec![
                    tabs(
                        "patch_pref_over_time_tabs",
                        [
                            tab(
                                "pref_over_time_tab",
                                "Patch Preference Over Time within a Session",
                                graphs(&[ids::PATCH_PREF_EPOCH_SESSION]),
                            ),
                            tab(
                                "pref_over_time_cum_tab",
                                "Cumulative Patch Preference Over Time within a Session",
                                graphs(&[ids::CUM_PATCH_PREF_EPOCH_SESSION]),
                            ),
                        ],
                    ),
                    tabs(
                        "wheel_viz_tabs",
                        [
                            tab(
                                "wheel_viz_session_tab",
                                "Wheel Viz by Session",
                                [abs_norm(
                                    "wheel_viz_session_tabs",
                                    ("wheel_viz_session_abs_tab", ids::WHEEL_SESSION_ABS),
                                    ("wheel_viz_session_norm_tab", ids::WHEEL_SESSION_NORM),
                                )],
                            ),
                            tab(
                                "wheel_viz_subject_tab",
                                "Wheel Viz by Subject",
                                [abs_norm(
                                    "wheel_viz_subject_tabs",
                                    ("wheel_viz_subject_abs_tab", ids::WHEEL_SUBJECT_ABS),
                                    ("wheel_viz_subject_norm_tab", ids::WHEEL_SUBJECT_NORM),
                                )],
                            ),
                        ],
                    ),
                ],
            },
            Section {
                id: "pellet_viz_div",
                title: "Pellet Viz",
                body: vec![tabs(
                    "pellet_viz_tabs",
                    [
                        tab(
                            "pellet_viz_session_tab",
                            "Pellet Viz by Session",
                            [abs_norm(
                                "pellet_viz_session_tabs",
                                ("pellet_session_abs_tab", ids::PELLET_SESSION_ABS),
                                ("pellet_session_norm_tab", ids::PELLET_SESSION_NORM),
                            )],
                        ),
                        tab(
                            "pellet_viz_subject_tab",
                            "Pellet Viz by Subject",
                            [abs_norm(
                                "pellet_viz_subject_tabs",
                                ("pellet_subject_abs_tab", ids::PELLET_SUBJECT_ABS),
                                ("pellet_subject_norm_tab", ids::PELLET_SUBJECT_NORM),
                            )],
                        ),
                    ],
                )],
            },
            Section {
                id: "prob_pellet_viz_div",
                title: "Probabilistic Pellet Viz",
                body: vec![tabs(
                    "prob_pel_tabs",
                    [
                        tab(
                            "prob_pels_session_tab",
                            "Probabilistic Pellets by Session",
                            graphs(&[ids::PROB_PELS_SESSION]),
                        ),
                        tab(
                            "prob_pels_subject_tab",
                            "Probabilistic Pellets by Subject",
                            graphs(&[ids::PROB_PELS_SUBJECT]),
                        ),
                    ],
                )],
            },
        ];

        Self {
            title: PAGE_TITLE.to_string(),
            sections,
        }
    }

    /// Ids of every static graph slot, in page order.
    #[must_use]
    pub fn graph_ids(&self) -> Vec<&'static str> {
        fn walk(nodes: &[Node], out: &mut Vec<&'static str>) {
            for node in nodes {
                match node {
                    Node::Graph(id) => out.push(*id),
                    Node::Tabs(group) => {
                        for tab in &group.tabs {
                            walk(&tab.children, out);
                        }
                    }
                    Node::Dropdown(_) | Node::Table(_) => {}
                }
            }
        }

        let mut out = Vec::new();
        for section in &self.sections {
            walk(&section.body, &mut out);
        }
        out
    }

    /// The cohort dropdowns of the page.
    #[must_use]
    pub fn dropdowns(&self) -> Vec<&Dropdown> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a Dropdown>) {
            for node in nodes {
                match node {
                    Node::Dropdown(d) => out.push(d),
                    Node::Tabs(group) => {
                        for tab in &group.tabs {
                            walk(&tab.children, out);
                        }
                    }
                    Node::Graph(_) | Node::Table(_) => {}
                }
            }
        }

        let mut out = Vec::new();
        for section in &self.sections {
            walk(&section.body, &mut out);
        }
        out
    }
}
