use axum::extract::State;
use axum::response::Html;
use serde::Deserialize;

use super::{ApiPath, ApiQuery};
use crate::errors::BlogError;
use crate::pagination::{Page, PageParams, PageRequest};
use crate::routes::AppState;
use crate::view_models::{Article, Pager, PostCard, PostView};
use crate::{categories, comments, posts, tags};

#[derive(Debug, Default, Deserialize)]
pub struct SearchPageParams {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn cards(page: Page<PostView>) -> (Vec<PostCard>, Page<()>) {
    let Page { items, total, page, limit, total_pages } = page;
    let cards = items.into_iter().map(PostCard::from).collect();
    (cards, Page { items: vec![], total, page, limit, total_pages })
}

pub async fn index_page(State(state): State<AppState>) -> Result<Html<String>, BlogError> {
    let request = PageRequest::new(None, Some(state.config.site.home_posts), state.config.site.home_posts);
    let (latest, listed_categories) = state
        .db
        .run(move |conn| {
            let latest = posts::list(conn, Some(true), request)?;
            let listed = categories::list(conn, true)?;
            Ok((latest, listed))
        })
        .await?;
    let (posts, _) = cards(latest);

    let page = state
        .templates
        .add_context("posts", &posts)
        .add_context("categories", &listed_categories)
        .render("index.html")?;
    Ok(Html(page))
}

pub async fn posts_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Html<String>, BlogError> {
    let request = params.request(state.config.site.posts_per_page);
    let listed = state
        .db
        .run(move |conn| posts::list(conn, Some(true), request))
        .await?;
    let (posts, page) = cards(listed);

    let rendered = state
        .templates
        .add_context("posts", &posts)
        .add_context("pager", &Pager::new(&page, "/posts"))
        .render("posts.html")?;
    Ok(Html(rendered))
}

pub async fn post_page(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Html<String>, BlogError> {
    let article = state
        .db
        .run(move |conn| {
            let view = posts::get_published_by_slug(conn, &slug)?;
            let listed = comments::list_for_post(conn, view.post.id)?;
            Ok(Article::new_from(view, listed))
        })
        .await?;

    let page = state
        .templates
        .add_context("article", &article)
        .render("post.html")?;
    Ok(Html(page))
}

pub async fn categories_page(State(state): State<AppState>) -> Result<Html<String>, BlogError> {
    let listed = state.db.run(|conn| categories::list(conn, true)).await?;
    let page = state
        .templates
        .add_context("categories", &listed)
        .render("categories.html")?;
    Ok(Html(page))
}

pub async fn category_page(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Html<String>, BlogError> {
    let request = params.request(state.config.site.posts_per_page);
    let (category, listed) = state
        .db
        .run(move |conn| {
            let category = categories::get_by_slug(conn, &slug)?;
            let listed = posts::list_by_category(conn, category.id, request)?;
            Ok((category, listed))
        })
        .await?;
    let (posts, page) = cards(listed);
    let base = format!("/categories/{}", urlencoding::encode(&category.slug));

    let rendered = state
        .templates
        .add_context("category", &category)
        .add_context("posts", &posts)
        .add_context("pager", &Pager::new(&page, &base))
        .render("category.html")?;
    Ok(Html(rendered))
}

pub async fn tags_page(State(state): State<AppState>) -> Result<Html<String>, BlogError> {
    let listed = state.db.run(|conn| tags::list(conn, true)).await?;
    let page = state
        .templates
        .add_context("tags", &listed)
        .render("tags.html")?;
    Ok(Html(page))
}

pub async fn tag_page(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Html<String>, BlogError> {
    let request = params.request(state.config.site.posts_per_page);
    let (tag, listed) = state
        .db
        .run(move |conn| {
            let tag = tags::get_by_slug(conn, &slug)?;
            let listed = posts::list_by_tag(conn, tag.id, request)?;
            Ok((tag, listed))
        })
        .await?;
    let (posts, page) = cards(listed);
    let base = format!("/tags/{}", urlencoding::encode(&tag.slug));

    let rendered = state
        .templates
        .add_context("tag", &tag)
        .add_context("posts", &posts)
        .add_context("pager", &Pager::new(&page, &base))
        .render("tag.html")?;
    Ok(Html(rendered))
}

pub async fn search_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchPageParams>,
) -> Result<Html<String>, BlogError> {
    let request = PageRequest::new(params.page, params.limit, state.config.site.posts_per_page);
    let query = params.q.unwrap_or_default().trim().to_string();
    let term = query.clone();
    let found = state
        .db
        .run(move |conn| posts::search(conn, &term, request))
        .await?;
    let (posts, page) = cards(found);
    let base = format!("/search?q={}", urlencoding::encode(&query));

    let rendered = state
        .templates
        .add_context("query", &query)
        .add_context("total", &page.total)
        .add_context("posts", &posts)
        .add_context("pager", &Pager::new(&page, &base))
        .render("search.html")?;
    Ok(Html(rendered))
}
