//! Page state for the three views.
//!
//! The state is a plain value: handlers start from [`ViewState::default`],
//! apply the navigation actions carried by the request, and read back which
//! feed to show.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::fetcher::FeedSource;

/// Aggregator topic sections, in the order they are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    World,
    Nation,
    Business,
    Technology,
    Entertainment,
    Sports,
    Science,
    Health,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::World,
        Category::Nation,
        Category::Business,
        Category::Technology,
        Category::Entertainment,
        Category::Sports,
        Category::Science,
        Category::Health,
    ];

    /// Topic name as used in feed URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::World => "WORLD",
            Category::Nation => "NATION",
            Category::Business => "BUSINESS",
            Category::Technology => "TECHNOLOGY",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Sports => "SPORTS",
            Category::Science => "SCIENCE",
            Category::Health => "HEALTH",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(wanted.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Categories,
    Search,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Categories => "categories",
            View::Search => "search",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    Home,
    Categories,
    Search,
    SelectCategory(Category),
    SubmitSearch(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Home,
    Categories {
        category: Option<Category>,
    },
    Search {
        term: Option<String>,
    },
}

impl ViewState {
    pub fn view(&self) -> View {
        match self {
            ViewState::Home => View::Home,
            ViewState::Categories { .. } => View::Categories,
            ViewState::Search { .. } => View::Search,
        }
    }

    /// Apply one navigation action and return the resulting state.
    ///
    /// Switching views starts the new view with an empty selection; choosing
    /// the view that is already active keeps it. Selection actions only take
    /// effect in their own view.
    pub fn apply(self, action: NavAction) -> ViewState {
        match (self, action) {
            (state @ ViewState::Home, NavAction::Home) => state,
            (state @ ViewState::Categories { .. }, NavAction::Categories) => state,
            (state @ ViewState::Search { .. }, NavAction::Search) => state,
            (_, NavAction::Home) => ViewState::Home,
            (_, NavAction::Categories) => ViewState::Categories { category: None },
            (_, NavAction::Search) => ViewState::Search { term: None },
            (ViewState::Categories { .. }, NavAction::SelectCategory(category)) => {
                ViewState::Categories {
                    category: Some(category),
                }
            }
            (ViewState::Search { .. }, NavAction::SubmitSearch(input)) => {
                let term = input.trim();
                ViewState::Search {
                    term: (!term.is_empty()).then(|| term.to_string()),
                }
            }
            (state, action) => {
                debug!("Ignoring {:?} in {:?} view", action, state.view());
                state
            }
        }
    }

    /// Category shown in the Categories view; the first option until one is
    /// chosen.
    pub fn category(&self) -> Option<Category> {
        match self {
            ViewState::Categories { category } => Some(category.unwrap_or_default()),
            _ => None,
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        match self {
            ViewState::Search { term } => term.as_deref(),
            _ => None,
        }
    }

    /// Feed to load for this state, or `None` when there is nothing to fetch
    /// yet (the search form before a query is submitted).
    pub fn feed_source(&self) -> Option<FeedSource> {
        match self {
            ViewState::Home => Some(FeedSource::Top),
            ViewState::Categories { category } => {
                Some(FeedSource::Category(category.unwrap_or_default()))
            }
            ViewState::Search { term } => term.clone().map(FeedSource::Search),
        }
    }
}
