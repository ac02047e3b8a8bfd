//! Instagram Graph API comment acquisition
//!
//! Walks the Graph API with a caller-supplied OAuth access token:
//! resolve the post shortcode from its URL, find the caller's Instagram
//! Business account via `me/accounts`, page through the account's media
//! until the post turns up, then page through its comments and each
//! comment's replies. Everything is flattened into canonical
//! [`Comment`] records, with the nested `from.username` identity
//! resolved here so the engine never sees the ambiguity.

use serde::Deserialize;
use url::Url;

use crate::config::InstagramConfig;
use crate::error::AppError;
use crate::giveaway::Comment;

const MEDIA_FIELDS: &str = "id,media_type,media_url,permalink,timestamp,caption";
const COMMENT_FIELDS: &str = "id,text,username,timestamp,from{id,username}";
const PAGE_LIMIT: u32 = 100;

/// The flattened result of walking one post
#[derive(Debug, Clone)]
pub struct FetchedComments {
    pub media_id: String,
    pub permalink: Option<String>,
    pub comments: Vec<Comment>,
}

/// Graph API client for one configured endpoint
pub struct InstagramClient {
    http: reqwest::Client,
    base_url: String,
    max_media_pages: u32,
    max_comment_pages: u32,
}

impl InstagramClient {
    pub fn new(http: reqwest::Client, config: &InstagramConfig) -> Self {
        Self {
            http,
            base_url: config.graph_base_url.trim_end_matches('/').to_string(),
            max_media_pages: config.max_media_pages,
            max_comment_pages: config.max_comment_pages,
        }
    }

    /// Fetch every comment (top-level and replies) on the post at `post_url`.
    pub async fn fetch_post_comments(
        &self,
        access_token: &str,
        post_url: &str,
    ) -> Result<FetchedComments, AppError> {
        let shortcode = extract_shortcode(post_url)?;
        tracing::debug!(%shortcode, "Resolving Instagram post");

        let account_id = self.business_account_id(access_token).await?;
        let media = self.find_media(access_token, &account_id, &shortcode).await?;

        let mut comments = Vec::new();
        let top_level = self.fetch_comment_pages(access_token, &media.id).await?;
        tracing::info!(
            media_id = %media.id,
            top_level = top_level.len(),
            "Fetched top-level comments"
        );

        for raw in &top_level {
            let replies = self.fetch_reply_pages(access_token, &raw.id).await;
            comments.push(resolve_comment(raw.clone(), None));
            comments.extend(
                replies
                    .into_iter()
                    .map(|reply| resolve_comment(reply, Some(&raw.id))),
            );
        }

        Ok(FetchedComments {
            media_id: media.id,
            permalink: media.permalink,
            comments,
        })
    }

    /// Locate the caller's Instagram Business account through their
    /// connected Facebook pages.
    async fn business_account_id(&self, token: &str) -> Result<String, AppError> {
        let url = format!(
            "{}/me/accounts?fields=instagram_business_account",
            self.base_url
        );
        let page: Paged<PageAccount> = self.get_json(&url, Some(token)).await?;

        if page.data.is_empty() {
            return Err(AppError::NotFound(
                "No Facebook pages found. Connect your Instagram Business account to a Facebook Page.".to_string(),
            ));
        }
        page.data
            .into_iter()
            .find_map(|account| account.instagram_business_account)
            .map(|account| account.id)
            .ok_or_else(|| {
                AppError::NotFound(
                    "No Instagram Business Account found. Connect your Instagram to one of your Facebook Pages.".to_string(),
                )
            })
    }

    /// Page through the account's media until a permalink matching the
    /// shortcode turns up, stopping early when found.
    async fn find_media(
        &self,
        token: &str,
        account_id: &str,
        shortcode: &str,
    ) -> Result<MediaItem, AppError> {
        let mut next = Some(format!(
            "{}/{}/media?fields={}&limit={}",
            self.base_url, account_id, MEDIA_FIELDS, PAGE_LIMIT
        ));
        let mut checked = 0usize;
        let mut with_token = true;

        for _ in 0..self.max_media_pages {
            let Some(url) = next else { break };
            let page: Paged<MediaItem> =
                self.get_json(&url, with_token.then_some(token)).await?;
            checked += page.data.len();

            if let Some(media) = page.data.into_iter().find(|item| {
                item.permalink
                    .as_deref()
                    .is_some_and(|link| link.contains(shortcode))
            }) {
                return Ok(media);
            }

            next = page.paging.and_then(|p| p.next);
            // Paging URLs already carry the token
            with_token = false;
        }

        Err(AppError::NotFound(format!(
            "Post not found among {checked} recent posts. Make sure it belongs to your Instagram Business account and the URL is correct."
        )))
    }

    async fn fetch_comment_pages(
        &self,
        token: &str,
        media_id: &str,
    ) -> Result<Vec<GraphComment>, AppError> {
        let mut comments = Vec::new();
        let mut next = Some(format!(
            "{}/{}/comments?fields={}&limit={}",
            self.base_url, media_id, COMMENT_FIELDS, PAGE_LIMIT
        ));
        let mut with_token = true;

        for page_num in 0..self.max_comment_pages {
            let Some(url) = next else { break };
            let page: Paged<GraphComment> =
                self.get_json(&url, with_token.then_some(token)).await?;
            tracing::debug!(page = page_num + 1, received = page.data.len(), "Comment page");
            comments.extend(page.data);
            next = page.paging.and_then(|p| p.next);
            with_token = false;
        }

        Ok(comments)
    }

    /// Replies for one top-level comment. A failing reply fetch skips the
    /// rest of that comment's replies rather than aborting the whole walk.
    async fn fetch_reply_pages(&self, token: &str, comment_id: &str) -> Vec<GraphComment> {
        let mut replies = Vec::new();
        let mut next = Some(format!(
            "{}/{}/replies?fields={}&limit={}",
            self.base_url, comment_id, COMMENT_FIELDS, PAGE_LIMIT
        ));
        let mut with_token = true;

        for _ in 0..self.max_comment_pages {
            let Some(url) = next else { break };
            let page: Paged<GraphComment> =
                match self.get_json(&url, with_token.then_some(token)).await {
                    Ok(page) => page,
                    Err(error) => {
                        tracing::warn!(%comment_id, %error, "Failed to fetch replies; skipping");
                        break;
                    }
                };
            replies.extend(page.data);
            next = page.paging.and_then(|p| p.next);
            with_token = false;
        }

        replies
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> Result<T, AppError> {
        let mut request = self.http.get(url);
        if let Some(token) = token {
            request = request.query(&[("access_token", token)]);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, %url, "Graph API error: {}", truncate(&body, 512));
            return Err(AppError::Upstream(format!("Graph API returned {status}")));
        }
        Ok(response.json().await?)
    }
}

/// Extract the shortcode from an Instagram post URL
/// (https://www.instagram.com/p/SHORTCODE/).
pub fn extract_shortcode(post_url: &str) -> Result<String, AppError> {
    let invalid = || {
        AppError::Validation(
            "Invalid Instagram URL format. Use: https://www.instagram.com/p/SHORTCODE/"
                .to_string(),
        )
    };

    let url = Url::parse(post_url).map_err(|_| invalid())?;
    let mut segments = url.path_segments().ok_or_else(invalid)?;
    segments
        .find(|segment| *segment == "p")
        .and_then(|_| segments.next())
        .filter(|shortcode| !shortcode.is_empty())
        .map(str::to_string)
        .ok_or_else(invalid)
}

/// Apply the nested-identity fallback once, producing the canonical shape.
fn resolve_comment(raw: GraphComment, reply_to: Option<&str>) -> Comment {
    let GraphComment {
        id,
        text,
        username,
        timestamp,
        from,
    } = raw;
    Comment {
        id,
        text: text.unwrap_or_default(),
        username: username.or(from.and_then(|f| f.username)),
        timestamp,
        reply_to_id: reply_to.map(str::to_string),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Paged<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    paging: Option<Paging>,
}

#[derive(Debug, Clone, Deserialize)]
struct Paging {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct PageAccount {
    #[serde(default)]
    instagram_business_account: Option<BusinessAccount>,
}

#[derive(Debug, Clone, Deserialize)]
struct BusinessAccount {
    id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct MediaItem {
    id: String,
    #[serde(default)]
    permalink: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GraphComment {
    id: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    from: Option<GraphFrom>,
}

#[derive(Debug, Clone, Deserialize)]
struct GraphFrom {
    #[serde(default)]
    username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_shortcode_from_post_url() {
        let shortcode =
            extract_shortcode("https://www.instagram.com/p/Cxyz123_aB/").unwrap();
        assert_eq!(shortcode, "Cxyz123_aB");
    }

    #[test]
    fn test_extracts_shortcode_with_query_string() {
        let shortcode =
            extract_shortcode("https://www.instagram.com/p/Cxyz123/?igsh=abc").unwrap();
        assert_eq!(shortcode, "Cxyz123");
    }

    #[test]
    fn test_rejects_non_post_urls() {
        assert!(extract_shortcode("https://www.instagram.com/someuser/").is_err());
        assert!(extract_shortcode("not a url").is_err());
        assert!(extract_shortcode("https://www.instagram.com/p/").is_err());
    }

    #[test]
    fn test_username_falls_back_to_nested_identity() {
        let raw: GraphComment = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "text": "hello",
            "from": {"id": "u1", "username": "alice"}
        }))
        .unwrap();
        let comment = resolve_comment(raw, None);
        assert_eq!(comment.username.as_deref(), Some("alice"));
        assert_eq!(comment.reply_to_id, None);
    }

    #[test]
    fn test_primary_username_wins_over_nested() {
        let raw: GraphComment = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "text": "hello",
            "username": "bob",
            "from": {"id": "u1", "username": "alice"}
        }))
        .unwrap();
        let comment = resolve_comment(raw, Some("parent"));
        assert_eq!(comment.username.as_deref(), Some("bob"));
        assert_eq!(comment.reply_to_id.as_deref(), Some("parent"));
    }
}
