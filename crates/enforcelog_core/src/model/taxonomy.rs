//! Fixed category/activity taxonomy and enforcer roster.

use std::collections::BTreeSet;

/// One of the four top-level activity groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    CitationTickets,
    Surveillance,
    IecCampaign,
    OtherTasks,
}

pub const CATEGORY_CITATION_TICKETS: &str = "I. Issuance of Citation Tickets";
pub const CATEGORY_SURVEILLANCE: &str =
    "II. Surveillance, Investigation, Monitoring, Documentation, and Inspection";
pub const CATEGORY_IEC_CAMPAIGN: &str =
    "III. Information, Education, and Communication (IEC) Campaign";
pub const CATEGORY_OTHER_TASKS: &str = "IV. Other Tasks";

const CITATION_TICKET_ACTIVITIES: &[&str] = &[
    "No Tree-Cutting Permit",
    "Unregistered Chainsaw",
    "Violation of Plastics Ordinance",
    "Violation of Solid Waste Management Ordinance",
    "Open Dumping of Waste",
    "Violation of Tapat Ko, Linis Ko Program",
    "Violation of Anti-Littering Ordinance",
    "Violation of Open Burning Ordinance",
    "Other Environmental Ordinance Violations",
];

const SURVEILLANCE_ACTIVITIES: &[&str] = &[
    "Binangonan Kalinisan Patrol (BKP)",
    "Handling of Environmental Complaints",
    "Response to Environmental Incidents",
    "Delivery of Letters and Notices",
    "Inspection of MRFs, Composting Facilities, and Eco-Gardens",
];

const IEC_CAMPAIGN_ACTIVITIES: &[&str] = &[
    "Dissemination of IEC Materials",
    "Assistance in Conducting IEC Campaign Activities",
];

const OTHER_TASK_ACTIVITIES: &[&str] = &["Other duties assigned by the MENRO or LGU"];

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Self::CitationTickets,
        Self::Surveillance,
        Self::IecCampaign,
        Self::OtherTasks,
    ];

    /// Canonical label as written to the record store.
    pub fn label(self) -> &'static str {
        match self {
            Self::CitationTickets => CATEGORY_CITATION_TICKETS,
            Self::Surveillance => CATEGORY_SURVEILLANCE,
            Self::IecCampaign => CATEGORY_IEC_CAMPAIGN,
            Self::OtherTasks => CATEGORY_OTHER_TASKS,
        }
    }

    /// Compact label for chart axes and legends.
    pub fn short_label(self) -> &'static str {
        match self {
            Self::CitationTickets => "I. Citation Tickets",
            Self::Surveillance => "II. Surveillance & Inspection",
            Self::IecCampaign => "III. IEC Campaign",
            Self::OtherTasks => "IV. Other Tasks",
        }
    }

    pub fn activities(self) -> &'static [&'static str] {
        match self {
            Self::CitationTickets => CITATION_TICKET_ACTIVITIES,
            Self::Surveillance => SURVEILLANCE_ACTIVITIES,
            Self::IecCampaign => IEC_CAMPAIGN_ACTIVITIES,
            Self::OtherTasks => OTHER_TASK_ACTIVITIES,
        }
    }

    /// Exact lookup by canonical label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == label)
    }
}

/// One input slot of the entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxonomyEntry {
    pub category: Category,
    pub activity: &'static str,
}

/// Flattens the taxonomy into `(category, activity)` pairs in display order.
pub fn taxonomy_entries() -> Vec<TaxonomyEntry> {
    Category::ALL
        .into_iter()
        .flat_map(|category| {
            category
                .activities()
                .iter()
                .map(move |activity| TaxonomyEntry {
                    category,
                    activity: *activity,
                })
        })
        .collect()
}

/// Roster used when no configuration overrides it.
pub const DEFAULT_ROSTER: &[&str] = &[
    "Enforcer 1",
    "Enforcer 2",
    "Enforcer 3",
    "Enforcer 4",
    "Enforcer 5",
];

/// Fixed, ordered list of enforcer identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

/// Roster construction error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    Empty,
    BlankName,
    DuplicateName(String),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "roster must name at least one enforcer"),
            Self::BlankName => write!(f, "roster contains a blank enforcer name"),
            Self::DuplicateName(name) => write!(f, "roster lists `{name}` more than once"),
        }
    }
}

impl std::error::Error for RosterError {}

impl Roster {
    /// Builds a roster, trimming names and rejecting blanks or duplicates.
    pub fn new<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        for name in names {
            let trimmed = name.as_ref().trim();
            if trimmed.is_empty() {
                return Err(RosterError::BlankName);
            }
            if !seen.insert(trimmed.to_string()) {
                return Err(RosterError::DuplicateName(trimmed.to_string()));
            }
            ordered.push(trimmed.to_string());
        }
        if ordered.is_empty() {
            return Err(RosterError::Empty);
        }
        Ok(Self { names: ordered })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|known| known == name)
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            names: DEFAULT_ROSTER.iter().map(|name| (*name).to_string()).collect(),
        }
    }
}
