//! Billboard chart scraping.
//!
//! A chart page lists its entries as nested list items; the title of every
//! entry sits in an `h3` inside `li ul li`. Pages whose markup does not
//! match (layout change, date outside the published range) yield no titles
//! rather than an error. Titles that are blank once trimmed are dropped, so
//! a page whose `h3`s are all empty counts as an empty chart.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::{error::FetchError, types::ChartDate, warning};

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:131.0) Gecko/20100101 Firefox/131.0";

const TITLE_SELECTOR: &str = "li ul li h3";
const ENTRY_SELECTOR: &str = "li ul li";

/// Something that knows the chart titles for a date, in chart order.
#[async_trait]
pub trait ChartSource: Send + Sync {
    async fn fetch_titles(&self, date: ChartDate) -> Result<Vec<String>, FetchError>;
}

pub struct BillboardChart {
    base_url: String,
    client: Client,
}

impl BillboardChart {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn chart_url(&self, date: ChartDate) -> String {
        format!("{}/{}", self.base_url, date)
    }
}

#[async_trait]
impl ChartSource for BillboardChart {
    async fn fetch_titles(&self, date: ChartDate) -> Result<Vec<String>, FetchError> {
        let response = self
            .client
            .get(self.chart_url(date))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let titles = parse_titles(&body);
        if titles.is_empty() && !has_chart_entries(&body) {
            warning!("Chart page for {} has no recognisable chart entries", date);
        }

        Ok(titles)
    }
}

/// Extracts the trimmed, non-empty entry titles from a chart page.
pub fn parse_titles(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(TITLE_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|heading| heading.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .collect()
}

fn has_chart_entries(html: &str) -> bool {
    let document = Html::parse_document(html);
    match Selector::parse(ENTRY_SELECTOR) {
        Ok(selector) => document.select(&selector).next().is_some(),
        Err(_) => false,
    }
}
