//! schema.org JSON-LD graph.
//!
//! ```text
//! WebSite  {base}/#website
//!    ▲ isPartOf
//! WebPage  {canonical}#webpage ──breadcrumb──► BreadcrumbList {canonical}#breadcrumb
//!    ▲ mainEntityOfPage
//! Article  {canonical}#article   (articles only)
//! ```

use crate::site::BreadcrumbEntry;
use serde::Serialize;

const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Top-level JSON-LD document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredGraph {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@graph")]
    pub nodes: Vec<GraphNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@type")]
pub enum GraphNode {
    WebSite(WebSite),
    WebPage(WebPage),
    Article(Article),
    BreadcrumbList(BreadcrumbList),
}

/// Reference to another node by `@id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdRef {
    #[serde(rename = "@id")]
    pub id: String,
}

impl IdRef {
    fn new(id: &str) -> Self {
        Self { id: id.to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSite {
    #[serde(rename = "@id")]
    pub id: String,
    pub url: String,
    pub name: String,
    pub description: String,
    pub in_language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPage {
    #[serde(rename = "@id")]
    pub id: String,
    pub url: String,
    pub name: String,
    pub description: String,
    pub in_language: String,
    pub is_part_of: IdRef,
    pub primary_image_of_page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breadcrumb: Option<IdRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "@id")]
    pub id: String,
    pub headline: String,
    pub description: String,
    pub image: String,
    pub author: Person,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    pub main_entity_of_page: IdRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_section: Option<String>,
    pub in_language: String,
    /// ISO 8601 duration, `PT5M`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_required: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
    #[serde(rename = "@id")]
    pub id: String,
    pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub position: usize,
    pub name: String,
    pub item: String,
}

impl From<BreadcrumbEntry> for ListItem {
    fn from(entry: BreadcrumbEntry) -> Self {
        Self {
            kind: "ListItem",
            position: entry.position,
            name: entry.name,
            item: entry.item_url,
        }
    }
}

/// Inputs for [`StructuredGraph::build`], already resolved by the assembler.
#[derive(Debug, Clone, Copy)]
pub struct GraphInput<'a> {
    pub origin: &'a str,
    pub canonical_url: &'a str,
    pub site_name: &'a str,
    pub site_description: &'a str,
    pub language: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub image: &'a str,
    pub author: &'a str,
    pub section: Option<&'a str>,
    pub published_time: Option<&'a str>,
    pub modified_time: Option<&'a str>,
    pub reading_time_minutes: u32,
    pub is_article: bool,
}

impl StructuredGraph {
    pub fn build(input: &GraphInput<'_>, breadcrumbs: Option<Vec<BreadcrumbEntry>>) -> Self {
        let website_id = format!("{}/#website", input.origin);
        let webpage_id = format!("{}#webpage", input.canonical_url);
        let breadcrumb_id = format!("{}#breadcrumb", input.canonical_url);

        let mut nodes = Vec::with_capacity(4);
        nodes.push(GraphNode::WebSite(WebSite {
            id: website_id.clone(),
            url: format!("{}/", input.origin),
            name: input.site_name.to_owned(),
            description: input.site_description.to_owned(),
            in_language: input.language.to_owned(),
        }));
        nodes.push(GraphNode::WebPage(WebPage {
            id: webpage_id.clone(),
            url: input.canonical_url.to_owned(),
            name: input.title.to_owned(),
            description: input.description.to_owned(),
            in_language: input.language.to_owned(),
            is_part_of: IdRef::new(&website_id),
            primary_image_of_page: input.image.to_owned(),
            breadcrumb: breadcrumbs.as_ref().map(|_| IdRef::new(&breadcrumb_id)),
        }));

        if input.is_article {
            nodes.push(GraphNode::Article(Article {
                id: format!("{}#article", input.canonical_url),
                headline: input.title.to_owned(),
                description: input.description.to_owned(),
                image: input.image.to_owned(),
                author: Person {
                    kind: "Person",
                    name: input.author.to_owned(),
                },
                date_published: input.published_time.map(str::to_owned),
                date_modified: input.modified_time.map(str::to_owned),
                main_entity_of_page: IdRef::new(&webpage_id),
                article_section: input.section.map(str::to_owned),
                in_language: input.language.to_owned(),
                time_required: (input.reading_time_minutes > 0)
                    .then(|| format!("PT{}M", input.reading_time_minutes)),
            }));
        }

        if let Some(entries) = breadcrumbs {
            nodes.push(GraphNode::BreadcrumbList(BreadcrumbList {
                id: breadcrumb_id,
                item_list_element: entries.into_iter().map(ListItem::from).collect(),
            }));
        }

        Self {
            context: SCHEMA_CONTEXT,
            nodes,
        }
    }

    /// JSON safe to embed in a `<script>` element.
    pub fn to_json_ld(&self) -> serde_json::Result<String> {
        Ok(serde_json::to_string(self)?.replace("</", "<\\/"))
    }

    pub fn website(&self) -> Option<&WebSite> {
        self.nodes.iter().find_map(|node| match node {
            GraphNode::WebSite(site) => Some(site),
            _ => None,
        })
    }

    pub fn webpage(&self) -> Option<&WebPage> {
        self.nodes.iter().find_map(|node| match node {
            GraphNode::WebPage(page) => Some(page),
            _ => None,
        })
    }

    pub fn article(&self) -> Option<&Article> {
        self.nodes.iter().find_map(|node| match node {
            GraphNode::Article(article) => Some(article),
            _ => None,
        })
    }

    pub fn breadcrumb_list(&self) -> Option<&BreadcrumbList> {
        self.nodes.iter().find_map(|node| match node {
            GraphNode::BreadcrumbList(list) => Some(list),
            _ => None,
        })
    }
}
