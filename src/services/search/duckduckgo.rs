use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use scraper::{Html, Selector};

use super::SearchProvider;
use crate::models::WebSearchResult;

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Scrapes DuckDuckGo's HTML endpoint. No API key required.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build DuckDuckGo HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> anyhow::Result<Vec<WebSearchResult>> {
        let resp = self
            .client
            .post(SEARCH_URL)
            .form(&[("q", query)])
            .header("Accept", "text/html")
            .send()
            .await
            .context("failed to call DuckDuckGo")?
            .error_for_status()
            .context("DuckDuckGo returned error")?;

        let body = resp
            .text()
            .await
            .context("failed to read DuckDuckGo response")?;

        // `Html` is !Send, so parsing stays in a sync fn after the last await.
        parse_results(&body, max_results)
    }
}

fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("invalid selector {css:?}: {e:?}"))
}

fn parse_results(html: &str, max_results: usize) -> anyhow::Result<Vec<WebSearchResult>> {
    let doc = Html::parse_document(html);
    let result_sel = selector(".result:not(.result--ad)")?;
    let link_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut results = Vec::new();
    for result in doc.select(&result_sel) {
        if results.len() >= max_results {
            break;
        }

        let Some(link) = result.select(&link_sel).next() else {
            continue;
        };

        let title = link.text().collect::<String>().trim().to_string();
        let url = link
            .value()
            .attr("href")
            .map(extract_ddg_url)
            .unwrap_or_default();
        let snippet = result
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(WebSearchResult { title, url, snippet });
    }

    Ok(results)
}

/// Result links go through a redirect like
/// `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&rut=...`.
fn extract_ddg_url(href: &str) -> String {
    if let Some(pos) = href.find("uddg=") {
        let start = pos + "uddg=".len();
        let end = href[start..]
            .find('&')
            .map(|i| start + i)
            .unwrap_or(href.len());
        let encoded = &href[start..end];
        if !encoded.is_empty() {
            return percent_decode_str(encoded).decode_utf8_lossy().into_owned();
        }
    }
    href.to_string()
}
