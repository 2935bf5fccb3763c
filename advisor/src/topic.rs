//! Topics the advisor can be asked about.
//!
//! A topic is either one of the catalogued debate challenges or a freeform
//! context handed over by another view (for instance the summary of a single
//! incident on a citizen record).

use serde::{Deserialize, Serialize};

/// Debate category of a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ethics,
    Legal,
    Technical,
    Adoption,
    Economic,
    Philosophy,
}

impl Category {
    /// Every category, in catalogue order.
    pub const ALL: [Category; 6] = [
        Self::Ethics,
        Self::Legal,
        Self::Technical,
        Self::Adoption,
        Self::Economic,
        Self::Philosophy,
    ];

    /// Ethics and legal challenges form the critical zone.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Ethics | Self::Legal)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ethics => "Ethics & Society",
            Self::Legal => "Legal & Regulatory",
            Self::Technical => "Technical & Security",
            Self::Adoption => "Adoption & Utility",
            Self::Economic => "Economic Model",
            Self::Philosophy => "Philosophy & Culture",
        }
    }
}

/// A catalogued point of tension in the register project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: u32,
    pub category: Category,
    pub title: String,
    pub problem: String,
    pub question: String,
    /// The currently proposed answer, which the advisor is asked to dismantle
    pub solution: String,
}

/// Free text context with a short heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeformContext {
    pub heading: String,
    pub text: String,
}

/// What the dialogue is currently about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topic {
    NamedChallenge(Challenge),
    Freeform(FreeformContext),
}

impl Topic {
    /// Freeform topic about a single profile, as raised from a citizen record.
    pub fn profile_analysis(text: impl Into<String>) -> Self {
        Self::Freeform(FreeformContext {
            heading: "INDIVIDUAL PROFILE ANALYSIS".to_string(),
            text: text.into(),
        })
    }

    /// Context used when nothing is selected.
    pub fn general() -> Self {
        Self::Freeform(FreeformContext {
            heading: "GLOBAL".to_string(),
            text: "General discussion of the register".to_string(),
        })
    }

    /// Short title shown in greetings and headers.
    pub fn title(&self) -> &str {
        match self {
            Self::NamedChallenge(challenge) => &challenge.title,
            Self::Freeform(context) => &context.heading,
        }
    }
}

impl From<Challenge> for Topic {
    fn from(challenge: Challenge) -> Self {
        Self::NamedChallenge(challenge)
    }
}

const CATALOGUE: &[(u32, Category, &str, &str, &str, &str)] = &[
    (
        1,
        Category::Ethics,
        "The Transparency Paradox",
        "Total publicity of debts creates a mechanism of public shaming.",
        "Does the system produce trust or stigma?",
        "Restrict access to the data. Refuse total transparency as dogma.",
    ),
    (
        2,
        Category::Ethics,
        "Exclusion of the Vulnerable",
        "A double penalty for the precarious: financial debt plus erosion of social capital.",
        "Does the tool automate social segregation?",
        "'Non-reporting' mechanisms for life accidents (unemployment, illness).",
    ),
    (
        3,
        Category::Legal,
        "GDPR / Publicity Friction",
        "Financial data is intimate. Publishing it is a potential act of violence.",
        "Does a right to be forgotten exist in an immutable register?",
        "Anonymisation by default. Consent revocable at any time.",
    ),
    (
        4,
        Category::Legal,
        "Wild Social Scoring",
        "Emergence of an extra-legal financial reputation.",
        "Are we building a disguised social credit system?",
        "Legal ban on using this score for access to housing or employment.",
    ),
    (
        5,
        Category::Technical,
        "Validation Asymmetry",
        "The power of validation is unilateral (held by the creditor).",
        "How do we prevent validation blackmail?",
        "Decentralised proof of payment or a citizen witness.",
    ),
    (
        6,
        Category::Technical,
        "Forgery Factory",
        "Fictitious debts created to launder a reputation.",
        "Is the data evidence or a performance?",
        "Graph analysis to detect collusive loops.",
    ),
    (
        7,
        Category::Adoption,
        "The Data Desert",
        "A denunciation system without users is useless.",
        "Who has an interest in reporting themselves?",
        "No gamified incentive. Use must come from a need for proof, not a game.",
    ),
    (
        8,
        Category::Adoption,
        "Systemic Redundancy",
        "Banks already do this work, within a legal framework.",
        "Is this the uberisation of debt collection?",
        "Focus only on informal debts (family, friends) invisible to the state.",
    ),
    (
        9,
        Category::Economic,
        "Rent Model",
        "If it is free, citizen data is the product.",
        "Who pays for the surveillance infrastructure?",
        "Funding exclusively through donations or public funds. No freemium model.",
    ),
    (
        10,
        Category::Economic,
        "Conflict of Interest",
        "The platform judges and arbitrates without a mandate.",
        "What legitimacy for private justice?",
        "Open governance. Citizen jury drawn by lot for disputes.",
    ),
    (
        11,
        Category::Philosophy,
        "Quantifying the Bond",
        "Reducing friendship to a binary transaction (repaid / not repaid).",
        "Is trust a computable datum?",
        "Mandatory qualitative fields ('context of the loan').",
    ),
    (
        12,
        Category::Philosophy,
        "Normativity",
        "Imposing an accounting morality on complex human relationships.",
        "Is late payment always a moral fault?",
        "Accept the informal. Do not penalise tacit delays.",
    ),
];

/// The full challenge catalogue, ordered by id.
pub fn catalogue() -> Vec<Challenge> {
    CATALOGUE
        .iter()
        .map(|&(id, category, title, problem, question, solution)| Challenge {
            id,
            category,
            title: title.to_string(),
            problem: problem.to_string(),
            question: question.to_string(),
            solution: solution.to_string(),
        })
        .collect()
}

/// Look up a challenge by id.
pub fn challenge(id: u32) -> Option<Challenge> {
    catalogue().into_iter().find(|c| c.id == id)
}

/// Challenges in one category.
pub fn by_category(category: Category) -> Vec<Challenge> {
    catalogue()
        .into_iter()
        .filter(|c| c.category == category)
        .collect()
}

/// Counts over the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogueSummary {
    pub total: usize,
    /// Challenges in a critical category
    pub critical: usize,
    /// Count per category, in [`Category::ALL`] order
    pub per_category: Vec<(Category, usize)>,
}

/// Summarise the catalogue.
pub fn catalogue_summary() -> CatalogueSummary {
    let all = catalogue();
    CatalogueSummary {
        total: all.len(),
        critical: all.iter().filter(|c| c.category.is_critical()).count(),
        per_category: Category::ALL
            .iter()
            .map(|&category| (category, all.iter().filter(|c| c.category == category).count()))
            .collect(),
    }
}
