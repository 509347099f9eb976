use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result, anyhow};
use blog_client::{BlogClient, BlogClientError, ListOptions, ListPostsResponse, NewPost, Post};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};

const TOKEN_FILE: &str = ".blog_token";
const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "blog-cli", version, about = "Command line client for the trip blog")]
struct Cli {
    /// Server address, with or without the scheme.
    #[arg(long, global = true)]
    server: Option<String>,

    /// Bearer token for writes; falls back to the .blog_token file.
    #[arg(long, global = true, env = "BLOG_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Print raw JSON instead of a summary.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the blog API is up.
    Status,
    /// List posts of a user, or of one trip with --trip-id.
    List {
        #[arg(long)]
        username: String,
        #[arg(long)]
        trip_id: Option<i64>,
        /// Only posts created before this ISO-8601 time.
        #[arg(long, value_parser = parse_time)]
        before: Option<DateTime<Utc>>,
        #[arg(long)]
        size: Option<u32>,
    },
    /// Create a post (requires a token for --username).
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        trip_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long)]
        location: Option<String>,
        /// ISO-8601; the server uses the current time when omitted.
        #[arg(long, value_parser = parse_time)]
        created_at: Option<DateTime<Utc>>,
    },
    /// Delete a post (requires a token for --username).
    Delete {
        #[arg(long)]
        username: String,
        #[arg(long)]
        trip_id: i64,
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = normalize_server(cli.server.unwrap_or_else(|| DEFAULT_SERVER.to_string()));
    let mut client = BlogClient::new(&server).map_err(map_client_error)?;

    let token = match cli.token.as_deref().and_then(parse_token_content) {
        Some(token) => Some(token),
        None => load_token().context("failed to read .blog_token")?,
    };
    if let Some(token) = token {
        client.set_token(token);
    }

    match cli.command {
        Command::Status => {
            let status = client.status().await.map_err(map_client_error)?;
            println!("status: {}, version: {}", status.status, status.version);
        }
        Command::List {
            username,
            trip_id,
            before,
            size,
        } => {
            let options = ListOptions { before, size };
            let list = match trip_id {
                Some(trip_id) => client.list_trip_posts(&username, trip_id, options).await,
                None => client.list_user_posts(&username, options).await,
            }
            .map_err(map_client_error)?;

            if cli.json {
                println!("{}", list_json(&list)?);
            } else {
                print_list(&list);
            }
        }
        Command::Create {
            username,
            trip_id,
            title,
            content,
            lon,
            lat,
            location,
            created_at,
        } => {
            let new_post = NewPost {
                title,
                content,
                lon,
                lat,
                location,
                created_at,
            };
            let post = client
                .create_post(&username, trip_id, &new_post)
                .await
                .map_err(map_client_error)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&post)?);
            } else {
                print_post("Post created", &post);
            }
        }
        Command::Delete {
            username,
            trip_id,
            id,
        } => {
            client
                .delete_post(&username, trip_id, id)
                .await
                .map_err(map_client_error)?;
            println!("Post deleted: id={id}");
        }
    }

    Ok(())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

/// RFC 3339, a naive date-time taken as UTC, or a bare date.
fn parse_time(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Ok(time.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(time) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(time.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|time| time.and_utc())
        .ok_or_else(|| format!("`{raw}` is not an ISO-8601 time"))
}

fn list_json(list: &ListPostsResponse) -> serde_json::Result<String> {
    serde_json::to_string_pretty(list)
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn map_client_error(err: BlogClientError) -> anyhow::Error {
    match err {
        BlogClientError::MissingToken => {
            anyhow!("a token is required: pass --token, set BLOG_TOKEN, or write {TOKEN_FILE}")
        }
        BlogClientError::Forbidden => anyhow!("not allowed: the token does not own this path"),
        BlogClientError::NotFound(message) => anyhow!("not found: {message}"),
        BlogClientError::InvalidRequest { message, missing } if !missing.is_empty() => {
            anyhow!("invalid request: {message}: {}", missing.join(", "))
        }
        other => anyhow!(other),
    }
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("username: {}", post.username);
    println!("trip_id: {}", post.trip_id);
    println!("created_at: {}", post.created_at);
    if let Some(location) = &post.location {
        println!("location: {location}");
    }
    if let (Some(lon), Some(lat)) = (post.lon, post.lat) {
        println!("coordinates: {lat}, {lon}");
    }
    println!("title: {}", post.title);
    println!("content: {}", post.content);
}

fn print_list(list: &ListPostsResponse) {
    println!("Posts: {} of {}", list.posts.len(), list.total);

    for post in &list.posts {
        println!(
            "- [{}] {} {} (trip {})",
            post.id, post.created_at, post.title, post.trip_id
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://example.com:8080".to_string());
        assert_eq!(s, "https://example.com:8080");
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        let s = normalize_server("127.0.0.1:8080".to_string());
        assert_eq!(s, "http://127.0.0.1:8080");
    }

    #[test]
    fn parse_token_content_trims_whitespace() {
        let token = parse_token_content("  abc.def.ghi  ");
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn parse_token_content_rejects_blank() {
        let token = parse_token_content("   ");
        assert!(token.is_none());
    }

    #[test]
    fn parse_time_accepts_iso_forms() {
        let expected = Utc.with_ymd_and_hms(2017, 1, 1, 6, 0, 0).unwrap();
        assert_eq!(parse_time("2017-01-01T06:00:00Z"), Ok(expected));
        assert_eq!(parse_time("2017-01-01T08:00:00+02:00"), Ok(expected));
        assert_eq!(parse_time("2017-01-01T06:00:00"), Ok(expected));
        assert_eq!(parse_time("2017-01-01 06:00:00"), Ok(expected));
        assert_eq!(
            parse_time("2017-01-01 06:00:00.250"),
            Ok(expected + chrono::Duration::milliseconds(250))
        );
        assert_eq!(
            parse_time("2017-01-01"),
            Ok(Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(parse_time("yesterday").is_err());
    }

    #[test]
    fn list_json_keeps_total() {
        let list = ListPostsResponse {
            posts: vec![Post {
                id: 7,
                username: "Dan".to_string(),
                trip_id: 1,
                created_at: Utc.with_ymd_and_hms(2017, 1, 1, 6, 0, 0).unwrap(),
                location: None,
                lon: None,
                lat: None,
                title: "Hello".to_string(),
                content: "Lorem".to_string(),
            }],
            total: 12,
        };

        let json: serde_json::Value =
            serde_json::from_str(&list_json(&list).expect("must serialize")).expect("valid json");
        assert_eq!(json["total"], 12);
        assert_eq!(json["posts"][0]["id"], 7);
    }

    #[test]
    fn cli_parses_create_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "blog-cli",
            "--token",
            "abc",
            "create",
            "--username",
            "Dan",
            "--trip-id",
            "1",
            "--title",
            "Hello",
            "--content",
            "World",
            "--lon",
            "-71.06",
        ])
        .expect("arguments must parse");

        assert_eq!(cli.token.as_deref(), Some("abc"));
        match cli.command {
            Command::Create { lon, trip_id, .. } => {
                assert_eq!(lon, Some(-71.06));
                assert_eq!(trip_id, 1);
            }
            other => panic!("expected create, got {other:?}"),
        }
    }
}
