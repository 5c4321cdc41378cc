//! # Pages
//!
//! Askama views for the public blog. Everything a template shows is
//! pre-formatted here so the templates stay free of logic.

use askama::Template;
use domains::{Article, User};
use services::validation::reading_minutes;

const DATE_FORMAT: &str = "%B %-d, %Y";

pub struct Link {
    pub label: &'static str,
    pub url: String,
}

/// Header block shared by the blog index and article pages.
pub struct AuthorView {
    pub name: String,
    pub username: String,
    pub image: Option<String>,
    pub initial: String,
    pub bio: Option<String>,
    pub links: Vec<Link>,
}

impl From<&User> for AuthorView {
    fn from(user: &User) -> Self {
        let links = [
            ("Twitter", &user.social_links.twitter),
            ("GitHub", &user.social_links.github),
            ("Website", &user.social_links.website),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.clone().map(|url| Link { label, url }))
        .collect();

        AuthorView {
            name: user.name.clone(),
            username: user.username.clone(),
            image: user.image.clone(),
            initial: user
                .name
                .chars()
                .next()
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_default(),
            bio: user.bio.clone(),
            links,
        }
    }
}

pub struct ArticleCard {
    pub href: String,
    pub title: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub published_on: String,
}

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingPage;

#[derive(Template)]
#[template(path = "blog.html")]
pub struct BlogPage {
    pub author: AuthorView,
    pub articles: Vec<ArticleCard>,
}

impl BlogPage {
    pub fn new(user: &User, articles: &[Article]) -> Self {
        BlogPage {
            author: user.into(),
            articles: articles
                .iter()
                .map(|a| ArticleCard {
                    href: format!("/{}/{}", user.username, a.slug),
                    title: a.title.clone(),
                    summary: a.summary.clone(),
                    image_url: a.image_url.clone(),
                    published_on: a.created_at.format(DATE_FORMAT).to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "article.html")]
pub struct ArticlePage {
    pub author: AuthorView,
    pub title: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    /// Owner-authored HTML, rendered unescaped
    pub content: String,
    pub published_on: String,
    pub reading_minutes: usize,
    /// Set when the owner is looking at an unpublished draft
    pub preview: bool,
}

impl ArticlePage {
    pub fn new(user: &User, article: &Article) -> Self {
        ArticlePage {
            author: user.into(),
            title: article.title.clone(),
            summary: article.summary.clone(),
            image_url: article.image_url.clone(),
            content: article.content.clone(),
            published_on: article.created_at.format(DATE_FORMAT).to_string(),
            reading_minutes: reading_minutes(&article.content),
            preview: !article.published,
        }
    }
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage {
    pub message: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage;
