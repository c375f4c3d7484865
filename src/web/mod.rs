use std::net::SocketAddr;

use anyhow::Result;
use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use time::OffsetDateTime;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::app::AppState;
use crate::domain::task::TaskId;
use crate::repo::StoreError;

pub mod render;

use render::Banner;

pub async fn serve(state: AppState, addr: SocketAddr, open_browser: bool) -> Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    info!("task list on http://{addr}/");

    if open_browser && let Err(err) = open::that(format!("http://{addr}/")) {
        warn!("could not open browser: {err}");
    }

    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_list))
        .route("/tasks", post(add_task))
        .route("/tasks/{id}/toggle", post(toggle_task))
        .route("/tasks/{id}/delete", post(delete_task))
        .route("/tasks/clear-done", post(clear_done))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Flash codes carried through the post-redirect-get cycle. The list page
/// owns the wording; unknown codes render nothing.
#[derive(Debug, Default, Deserialize)]
struct FlashParams {
    msg: Option<String>,
    error: Option<String>,
    // Kept as text; a mangled count must not reject the whole page.
    n: Option<String>,
}

fn banner_for(params: &FlashParams) -> Option<Banner> {
    if let Some(error) = params.error.as_deref() {
        let text = match error {
            "empty-title" => "Title cannot be empty.",
            "not-found" => "That task no longer exists.",
            _ => return None,
        };
        return Some(Banner::error(text));
    }
    let text = match params.msg.as_deref()? {
        "added" => "Task added.".to_string(),
        "toggled" => "Task updated.".to_string(),
        "deleted" => "Task deleted.".to_string(),
        "cleared" => match params.n.as_deref().and_then(|n| n.parse::<usize>().ok()) {
            None | Some(0) => "No completed items.".to_string(),
            Some(n) => format!("Cleared {n} completed."),
        },
        _ => return None,
    };
    Some(Banner::notice(text))
}

#[derive(Debug, Default, Deserialize)]
struct AddForm {
    // All fields default so a bare submit lands on the validation banner
    // instead of a rejected request.
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
}

async fn show_list(
    State(state): State<AppState>,
    Query(params): Query<FlashParams>,
) -> Html<String> {
    let tasks = state.repo().all();
    let banner = banner_for(&params);
    let today = OffsetDateTime::now_utc().date();
    Html(render::list_page(&tasks, banner.as_ref(), today))
}

async fn add_task(State(state): State<AppState>, Form(form): Form<AddForm>) -> Redirect {
    match state.repo().add(form.title, form.category, form.due_date) {
        Ok(task) => {
            info!("added task {}", task.id);
            Redirect::to("/?msg=added")
        }
        Err(err) => redirect_error(&err),
    }
}

async fn toggle_task(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let Some(id) = parse_id(&id) else {
        return Redirect::to("/?error=not-found");
    };
    match state.repo().toggle(id) {
        Ok(task) => {
            info!("task {} done={}", task.id, task.done);
            Redirect::to("/?msg=toggled")
        }
        Err(err) => redirect_error(&err),
    }
}

async fn delete_task(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let Some(id) = parse_id(&id) else {
        return Redirect::to("/?error=not-found");
    };
    match state.repo().delete(id) {
        Ok(task) => {
            info!("deleted task {}", task.id);
            Redirect::to("/?msg=deleted")
        }
        Err(err) => redirect_error(&err),
    }
}

async fn clear_done(State(state): State<AppState>) -> Redirect {
    let removed = state.repo().clear_done();
    info!("cleared {removed} completed tasks");
    Redirect::to(&format!("/?msg=cleared&n={removed}"))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let tasks = state.repo().all().len();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "tasks": tasks,
    }))
}

// Stale or hand-typed ids reach us as arbitrary strings; anything that is
// not a known numeric id gets the same benign notice.
fn parse_id(raw: &str) -> Option<TaskId> {
    raw.trim().parse().ok()
}

fn redirect_error(err: &StoreError) -> Redirect {
    match err {
        StoreError::EmptyTitle => Redirect::to("/?error=empty-title"),
        StoreError::NotFound(_) => Redirect::to("/?error=not-found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_codes_map_to_banners() {
        let params = FlashParams {
            msg: Some("added".to_string()),
            ..Default::default()
        };
        let banner = banner_for(&params).unwrap();
        assert_eq!(banner.kind, render::BannerKind::Notice);
        assert_eq!(banner.text, "Task added.");

        let params = FlashParams {
            error: Some("empty-title".to_string()),
            ..Default::default()
        };
        let banner = banner_for(&params).unwrap();
        assert_eq!(banner.kind, render::BannerKind::Error);
    }

    #[test]
    fn cleared_banner_reports_the_count() {
        let params = FlashParams {
            msg: Some("cleared".to_string()),
            n: Some("2".to_string()),
            ..Default::default()
        };
        assert_eq!(banner_for(&params).unwrap().text, "Cleared 2 completed.");

        let params = FlashParams {
            msg: Some("cleared".to_string()),
            n: Some("0".to_string()),
            ..Default::default()
        };
        assert_eq!(banner_for(&params).unwrap().text, "No completed items.");
    }

    #[test]
    fn garbage_cleared_counts_read_as_zero() {
        for n in [None, Some(""), Some("-1"), Some("abc"), Some("1.5")] {
            let params = FlashParams {
                msg: Some("cleared".to_string()),
                n: n.map(str::to_string),
                ..Default::default()
            };
            assert_eq!(
                banner_for(&params).unwrap().text,
                "No completed items.",
                "count {n:?} should read as zero"
            );
        }
    }

    #[test]
    fn unknown_flash_codes_render_nothing() {
        let params = FlashParams {
            msg: Some("bogus".to_string()),
            ..Default::default()
        };
        assert!(banner_for(&params).is_none());
        assert!(banner_for(&FlashParams::default()).is_none());
    }

    #[test]
    fn ids_parse_leniently_or_not_at_all() {
        assert_eq!(parse_id(" 12 "), Some(12));
        assert_eq!(parse_id("twelve"), None);
        assert_eq!(parse_id("-3"), None);
        assert_eq!(parse_id(""), None);
    }
}
