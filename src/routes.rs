use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::grid::Grid;
use crate::navigation::{Category, NavAction, View, ViewState};

pub struct AppState {
    pub config: Config,
    pub fetcher: Fetcher,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/categories", get(categories))
        .route("/search", get(search))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Template structs
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    /// Active navigation entry
    pub active: &'static str,
    pub heading: &'static str,
    pub subheading: Option<String>,
    pub notices: Vec<Notice>,
    pub categories: Vec<CategoryOption>,
    pub search_term: String,
    pub grid: Grid,
}

pub struct Notice {
    pub level: &'static str,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: "info",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: "error",
            message: message.into(),
        }
    }
}

pub struct CategoryOption {
    pub name: &'static str,
    pub selected: bool,
}

impl PageTemplate {
    /// Page chrome for a view, before any feed has been loaded.
    pub fn for_view(view: &ViewState) -> Self {
        let (heading, subheading) = match view.view() {
            View::Home => ("Trending🔥 News", None),
            View::Categories => (
                "Choose a Category 📂",
                view.category().map(|c| format!("Showing news for {}", c)),
            ),
            View::Search => ("Search for News 🔍", None),
        };

        let categories = match view.category() {
            Some(selected) => Category::ALL
                .into_iter()
                .map(|c| CategoryOption {
                    name: c.as_str(),
                    selected: c == selected,
                })
                .collect(),
            None => Vec::new(),
        };

        Self {
            active: view.view().as_str(),
            heading,
            subheading,
            notices: Vec::new(),
            categories,
            search_term: view.search_term().unwrap_or_default().to_string(),
            grid: Grid::default(),
        }
    }
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

/// Message shown when a view ends up with nothing to display.
fn empty_notice(view: &ViewState) -> Notice {
    match view {
        ViewState::Home => Notice::info("No news available at the moment."),
        ViewState::Categories { .. } => Notice::info(format!(
            "No news found for category '{}'.",
            view.category().unwrap_or_default()
        )),
        ViewState::Search { term } => Notice::error(format!(
            "No news found for '{}'.",
            term.as_deref().unwrap_or_default()
        )),
    }
}

/// Run one fetch, parse and layout cycle for `view`. Feed failures never
/// escape: they become an error notice and an empty grid.
async fn render_view(state: &AppState, view: ViewState) -> PageTemplate {
    let mut page = PageTemplate::for_view(&view);

    let Some(source) = view.feed_source() else {
        return page;
    };

    let mut items = match state.fetcher.load(&source).await {
        Ok(items) => items,
        Err(e) => {
            page.notices
                .push(Notice::error(format!("Failed to fetch RSS feed: {}", e)));
            Vec::new()
        }
    };
    items.truncate(state.config.max_items);

    if items.is_empty() {
        page.notices.push(empty_notice(&view));
    } else if let Some(term) = view.search_term() {
        page.subheading = Some(format!("Results for '{}'", term));
    }

    page.grid = Grid::layout(items, state.config.columns);
    page
}

// Route handlers
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = ViewState::default().apply(NavAction::Home);
    HtmlTemplate(render_view(&state, view).await)
}

#[derive(Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

pub async fn categories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Response {
    let mut view = ViewState::default().apply(NavAction::Categories);

    if let Some(name) = query.category.filter(|c| !c.trim().is_empty()) {
        match name.parse::<Category>() {
            Ok(category) => view = view.apply(NavAction::SelectCategory(category)),
            Err(e) => {
                warn!("Rejected category selection: {}", e);
                let mut page = PageTemplate::for_view(&view);
                page.subheading = None;
                page.notices.push(Notice::error(e.to_string()));
                return (StatusCode::BAD_REQUEST, HtmlTemplate(page)).into_response();
            }
        }
    }

    info!("Showing category {:?}", view.category());
    HtmlTemplate(render_view(&state, view).await).into_response()
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let view = ViewState::default()
        .apply(NavAction::Search)
        .apply(NavAction::SubmitSearch(query.q));
    HtmlTemplate(render_view(&state, view).await)
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
