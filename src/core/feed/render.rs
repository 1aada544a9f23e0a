use atom_syndication::{ContentBuilder, EntryBuilder, FeedBuilder, LinkBuilder, PersonBuilder, Text};
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};
use serde::Serialize;

use super::types::{Feed, FeedFormat, FeedItem};

const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1.1";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("rss serialization error: {0}")]
    Rss(#[from] rss::Error),
    #[error("atom serialization error: {0}")]
    Atom(#[from] atom_syndication::Error),
    #[error("json feed serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feed output is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Serialize)]
struct JsonFeed<'a> {
    version: &'static str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    home_page_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    feed_url: Option<&'a str>,
    description: &'a str,
    authors: Vec<JsonFeedAuthor<'a>>,
    items: Vec<JsonFeedItem<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonFeedAuthor<'a> {
    name: &'a str,
    url: String,
}

#[derive(Debug, Serialize)]
struct JsonFeedItem<'a> {
    id: &'a str,
    url: &'a str,
    title: &'a str,
    content_text: &'a str,
    date_published: String,
}

pub fn render_feed(feed: &Feed, format: FeedFormat) -> Result<String, RenderError> {
    match format {
        FeedFormat::Rss => render_rss(feed),
        FeedFormat::Atom => render_atom(feed),
        FeedFormat::Json => render_json(feed),
    }
}

fn render_rss(feed: &Feed) -> Result<String, RenderError> {
    let items = feed.items.iter().map(rss_item).collect::<Vec<_>>();
    let channel = ChannelBuilder::default()
        .title(feed.title.clone())
        .link(feed.link.clone().unwrap_or_default())
        .description(feed.subtitle.clone())
        .managing_editor(Some(format!("{} ({})", feed.author.email, feed.author.name)))
        .pub_date(Some(feed.created.to_rfc2822()))
        .items(items)
        .build();

    let bytes = channel.write_to(Vec::new())?;
    Ok(String::from_utf8(bytes)?)
}

fn rss_item(item: &FeedItem) -> rss::Item {
    let guid = GuidBuilder::default()
        .value(item.id.clone())
        .permalink(false)
        .build();
    ItemBuilder::default()
        .title(Some(item.title.clone()))
        .link(Some(item.link.clone()))
        .guid(Some(guid))
        .description(Some(item.content.clone()))
        .pub_date(Some(item.created.to_rfc2822()))
        .build()
}

fn render_atom(feed: &Feed) -> Result<String, RenderError> {
    let author = PersonBuilder::default()
        .name(feed.author.name.clone())
        .email(Some(feed.author.email.clone()))
        .build();
    let mut links = Vec::new();
    if let Some(href) = &feed.link {
        links.push(LinkBuilder::default().href(href.clone()).rel("self".to_string()).build());
        links.push(LinkBuilder::default().href(href.clone()).rel("alternate".to_string()).build());
    }
    let entries = feed.items.iter().map(atom_entry).collect::<Vec<_>>();

    let atom_feed = FeedBuilder::default()
        .id(feed.link.clone().unwrap_or_else(|| feed.title.clone()))
        .title(Text::plain(feed.title.clone()))
        .subtitle(Some(Text::plain(feed.subtitle.clone())))
        .updated(feed.created.fixed_offset())
        .authors(vec![author])
        .links(links)
        .entries(entries)
        .build();

    let bytes = atom_feed.write_to(Vec::new())?;
    Ok(String::from_utf8(bytes)?)
}

fn atom_entry(item: &FeedItem) -> atom_syndication::Entry {
    let link = LinkBuilder::default()
        .href(item.link.clone())
        .rel("alternate".to_string())
        .build();
    let content = ContentBuilder::default()
        .value(Some(item.content.clone()))
        .content_type(Some("text".to_string()))
        .build();
    EntryBuilder::default()
        .id(item.id.clone())
        .title(Text::plain(item.title.clone()))
        .updated(item.created.fixed_offset())
        .links(vec![link])
        .content(Some(content))
        .build()
}

fn render_json(feed: &Feed) -> Result<String, RenderError> {
    let json_feed = JsonFeed {
        version: JSON_FEED_VERSION,
        title: &feed.title,
        home_page_url: feed.link.as_deref(),
        feed_url: feed.link.as_deref(),
        description: &feed.subtitle,
        authors: vec![JsonFeedAuthor {
            name: &feed.author.name,
            url: format!("mailto:{}", feed.author.email),
        }],
        items: feed
            .items
            .iter()
            .map(|item| JsonFeedItem {
                id: &item.id,
                url: &item.link,
                title: &item.title,
                content_text: &item.content,
                date_published: item.created.to_rfc3339(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&json_feed)?)
}
