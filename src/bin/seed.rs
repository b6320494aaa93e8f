use std::path::PathBuf;

use clap::Parser;
use diesel::prelude::*;
use log::info;
use tracing_subscriber::EnvFilter;

use inkpost::categories::{self, NewCategoryInput};
use inkpost::config::BlogConfig;
use inkpost::errors::BlogError;
use inkpost::models::Post;
use inkpost::posts::{self, NewPostInput};
use inkpost::tags::{self, NewTagInput};

/// Fills an empty blog with a few categories, tags and posts. Entries whose
/// slug already exists are left alone, so running it twice is harmless.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    #[arg(short, long, default_value = inkpost::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

const CATEGORIES: &[(&str, &str, &str)] = &[
    ("Technology", "technology", "Articles about software and programming"),
    ("Lifestyle", "lifestyle", "Everyday life and passing thoughts"),
];

const TAGS: &[(&str, &str)] = &[
    ("Rust", "rust"),
    ("Web", "web"),
    ("SQLite", "sqlite"),
    ("Writing", "writing"),
];

struct SeedPost {
    title: &'static str,
    slug: &'static str,
    excerpt: &'static str,
    content: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
}

const POSTS: &[SeedPost] = &[
    SeedPost {
        title: "Getting started with inkpost",
        slug: "getting-started",
        excerpt: "A short tour of writing, tagging and publishing posts.",
        content: "# Getting started\n\nPosts are written in Markdown and rendered when they are read.\n\n## Publishing\n\nDrafts stay hidden from readers until they are published.\n",
        category: "technology",
        tags: &["rust", "web"],
    },
    SeedPost {
        title: "Why a single SQLite file is enough",
        slug: "sqlite-is-enough",
        excerpt: "A personal blog rarely needs more than one file on disk.",
        content: "# One file\n\nBacking up the blog means copying one database file and the uploads directory.\n\n```sh\ncp blog.db backups/\n```\n",
        category: "technology",
        tags: &["sqlite", "rust"],
    },
    SeedPost {
        title: "Writing every day",
        slug: "writing-every-day",
        excerpt: "Small notes on keeping a writing habit.",
        content: "# Writing every day\n\nShort posts published often beat long drafts that never leave the editor.\n",
        category: "lifestyle",
        tags: &["writing"],
    },
];

fn seed_category(conn: &mut SqliteConnection, name: &str, slug: &str, description: &str) -> Result<i32, BlogError> {
    match categories::get_by_slug(conn, slug) {
        Ok(existing) => Ok(existing.id),
        Err(BlogError::NotFound(_)) => {
            let created = categories::create(
                conn,
                NewCategoryInput {
                    name: Some(name.into()),
                    slug: Some(slug.into()),
                    description: Some(description.into()),
                },
            )?;
            info!("created category {}", slug);
            Ok(created.id)
        }
        Err(e) => Err(e),
    }
}

fn seed_tag(conn: &mut SqliteConnection, name: &str, slug: &str) -> Result<i32, BlogError> {
    match tags::get_by_slug(conn, slug) {
        Ok(existing) => Ok(existing.id),
        Err(BlogError::NotFound(_)) => {
            let created = tags::create(
                conn,
                NewTagInput {
                    name: Some(name.into()),
                    slug: Some(slug.into()),
                },
            )?;
            info!("created tag {}", slug);
            Ok(created.id)
        }
        Err(e) => Err(e),
    }
}

fn lookup(ids: &[(&str, i32)], slug: &str) -> Option<i32> {
    ids.iter().find(|(s, _)| *s == slug).map(|(_, id)| *id)
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = BlogConfig::from_file(&args.config)?;
    let pool = inkpost::new_dbconn_pool(&config.database_url)?;
    let mut conn = pool.get()?;
    inkpost::run_migrations(&mut conn)?;

    let mut category_ids = Vec::new();
    for (name, slug, description) in CATEGORIES {
        category_ids.push((*slug, seed_category(&mut conn, name, slug, description)?));
    }
    let mut tag_ids = Vec::new();
    for (name, slug) in TAGS {
        tag_ids.push((*slug, seed_tag(&mut conn, name, slug)?));
    }

    for seed in POSTS {
        let exists = Post::by_slug(seed.slug)
            .first::<Post>(&mut conn)
            .optional()?
            .is_some();
        if exists {
            info!("post {} already exists, skipping", seed.slug);
            continue;
        }
        let created = posts::create(
            &mut conn,
            NewPostInput {
                title: Some(seed.title.into()),
                slug: Some(seed.slug.into()),
                content: Some(seed.content.into()),
                excerpt: Some(seed.excerpt.into()),
                cover_image: None,
                published: Some(true),
                category_id: lookup(&category_ids, seed.category),
                tag_ids: seed.tags.iter().filter_map(|t| lookup(&tag_ids, t)).collect(),
            },
        )?;
        info!("created post {}", created.post.slug);
    }

    Ok(())
}
