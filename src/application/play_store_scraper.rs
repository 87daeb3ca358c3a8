//! Store scraper orchestrator
//!
//! Validates caller input, builds the store path and query for each
//! operation, sends it through the shared `RequestGate` and hands the page
//! to the matching parser. Every network-issuing method takes `&mut self`,
//! so one scraper never has more than one request in flight.

use crate::domain::constants::COLLECTIONS;
use crate::domain::{AppDetail, AppDetails, AppSummary, PaginationCursor, PriceFilter, RatingFilter, RequestContext};
use crate::error::{ScraperError, ScraperResult};
use crate::infrastructure::config::ScraperConfig;
use crate::infrastructure::http_client::{ReqwestTransport, Transport};
use crate::infrastructure::parsing::{
    CategoryParser, ContextualParser, DetailPageParser, DetailParseContext, ListPageParser, ParseContext,
    SearchPageParser,
};
use crate::infrastructure::request_gate::RequestGate;
use tracing::{debug, info};

type Query<'a> = Vec<(&'a str, Option<String>)>;

pub struct PlayStoreScraper<T: Transport = ReqwestTransport> {
    gate: RequestGate<T>,
    defaults: RequestContext,
    list_parser: ListPageParser,
    search_parser: SearchPageParser,
    detail_parser: DetailPageParser,
    category_parser: CategoryParser,
}

impl PlayStoreScraper<ReqwestTransport> {
    /// Scraper over the real network with default settings
    pub fn new() -> ScraperResult<Self> {
        Self::from_config(&ScraperConfig::default())
    }

    pub fn from_config(config: &ScraperConfig) -> ScraperResult<Self> {
        let transport = ReqwestTransport::new(&config.http)?;
        Self::with_transport(transport, config)
    }
}

impl<T: Transport> PlayStoreScraper<T> {
    pub fn with_transport(transport: T, config: &ScraperConfig) -> ScraperResult<Self> {
        config.validate()?;

        let mut gate = RequestGate::new(transport)?;
        gate.set_delay(config.delay_ms);

        let selectors = &config.selectors;
        Ok(Self {
            gate,
            defaults: RequestContext::new(&config.default_lang, &config.default_country),
            list_parser: ListPageParser::new(&selectors.list)?,
            search_parser: SearchPageParser::new(&selectors.search)?,
            detail_parser: DetailPageParser::new(&selectors.detail)?,
            category_parser: CategoryParser::new(&selectors.category)?,
        })
    }

    pub fn set_delay(&mut self, delay_ms: u64) {
        self.gate.set_delay(delay_ms);
    }

    pub fn delay(&self) -> u64 {
        self.gate.delay()
    }

    pub fn set_default_lang(&mut self, lang: impl Into<String>) {
        self.defaults.lang = lang.into();
    }

    pub fn default_lang(&self) -> &str {
        &self.defaults.lang
    }

    pub fn set_default_country(&mut self, country: impl Into<String>) {
        self.defaults.country = country.into();
    }

    pub fn default_country(&self) -> &str {
        &self.defaults.country
    }

    /// Known ranking collections
    pub fn collections(&self) -> &'static [&'static str] {
        COLLECTIONS
    }

    pub fn transport(&self) -> &T {
        self.gate.transport()
    }

    fn parse_context(&self) -> ParseContext {
        ParseContext::new(self.gate.origin().clone())
    }

    /// Category codes linked from the store root, in first-seen order
    pub async fn get_categories(&mut self) -> ScraperResult<Vec<String>> {
        let query = locale_query(&self.defaults);
        let html = self.gate.request(&["apps"], &query).await?;
        let categories = self.category_parser.parse_with_context(&html, &())?;
        info!("Found {} categories", categories.len());
        Ok(categories)
    }

    pub async fn get_app(&mut self, id: &str, lang: Option<&str>, country: Option<&str>) -> ScraperResult<AppDetail> {
        let locale = self.defaults.with_overrides(lang, country);
        let mut query: Query<'_> = vec![("id", Some(id.to_string()))];
        query.extend(locale_query(&locale));

        let html = self.gate.request(&["apps", "details"], &query).await?;
        let context = DetailParseContext::new(id, self.parse_context());
        Ok(self.detail_parser.parse_with_context(&html, &context)?)
    }

    /// Fetch details one id at a time; the first failure aborts the batch.
    pub async fn get_apps<S: AsRef<str>>(
        &mut self,
        ids: &[S],
        lang: Option<&str>,
        country: Option<&str>,
    ) -> ScraperResult<AppDetails> {
        let mut apps = AppDetails::new();
        for id in ids {
            let id = id.as_ref();
            let detail = self.get_app(id, lang, country).await?;
            apps.insert(id.to_string(), detail);
        }
        Ok(apps)
    }

    /// One page of a collection listing.
    ///
    /// `start` must lie in `0..=180` and `num` in `0..=120`.
    pub async fn get_list_chunk(
        &mut self,
        collection: &str,
        category: Option<&str>,
        start: i64,
        num: i64,
        lang: Option<&str>,
        country: Option<&str>,
    ) -> ScraperResult<Vec<AppSummary>> {
        let cursor = PaginationCursor::new(start, num)?;
        self.fetch_list_chunk(collection, category, cursor, lang, country).await
    }

    async fn fetch_list_chunk(
        &mut self,
        collection: &str,
        category: Option<&str>,
        cursor: PaginationCursor,
        lang: Option<&str>,
        country: Option<&str>,
    ) -> ScraperResult<Vec<AppSummary>> {
        let locale = self.defaults.with_overrides(lang, country);

        let mut path = vec!["apps"];
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            path.extend(["category", category]);
        }
        path.extend(["collection", collection]);

        let mut query = locale_query(&locale);
        query.push(("start", Some(cursor.start().to_string())));
        query.push(("num", Some(cursor.num().to_string())));

        let html = self.gate.request(&path, &query).await?;
        Ok(self.list_parser.parse_with_context(&html, &self.parse_context())?)
    }

    /// Walk a collection in chunks of 60 until a short chunk or the end of the window.
    pub async fn get_list(
        &mut self,
        collection: &str,
        category: Option<&str>,
        lang: Option<&str>,
        country: Option<&str>,
    ) -> ScraperResult<Vec<AppSummary>> {
        let mut apps = Vec::new();
        let mut cursor = Some(PaginationCursor::default());

        while let Some(current) = cursor {
            let chunk = self.fetch_list_chunk(collection, category, current, lang, country).await?;
            let full = current.is_full(chunk.len());
            debug!("Chunk at {} returned {} apps", current.start(), chunk.len());
            apps.extend(chunk);
            cursor = if full { current.next() } else { None };
        }

        Ok(apps)
    }

    pub async fn get_detail_list_chunk(
        &mut self,
        collection: &str,
        category: Option<&str>,
        start: i64,
        num: i64,
        lang: Option<&str>,
        country: Option<&str>,
    ) -> ScraperResult<AppDetails> {
        let apps = self.get_list_chunk(collection, category, start, num, lang, country).await?;
        self.get_apps(&ids_of(&apps), lang, country).await
    }

    pub async fn get_detail_list(
        &mut self,
        collection: &str,
        category: Option<&str>,
        lang: Option<&str>,
        country: Option<&str>,
    ) -> ScraperResult<AppDetails> {
        let apps = self.get_list(collection, category, lang, country).await?;
        self.get_apps(&ids_of(&apps), lang, country).await
    }

    pub async fn get_search(
        &mut self,
        query: &str,
        price: PriceFilter,
        rating: RatingFilter,
        lang: Option<&str>,
        country: Option<&str>,
    ) -> ScraperResult<Vec<AppSummary>> {
        if query.is_empty() {
            return Err(ScraperError::InvalidArgument(
                "\"query\" must be a non empty string".to_string(),
            ));
        }
        let locale = self.defaults.with_overrides(lang, country);

        let mut params: Query<'_> = vec![("q", Some(query.to_string())), ("c", Some("apps".to_string()))];
        params.extend(locale_query(&locale));
        params.push(("price", price.query_value().map(str::to_string)));
        params.push(("rating", rating.query_value().map(str::to_string)));

        let html = self.gate.request(&["search"], &params).await?;
        let apps = self.search_parser.parse_with_context(&html, &self.parse_context())?;
        info!("Search {:?} returned {} apps", query, apps.len());
        Ok(apps)
    }

    pub async fn get_detail_search(
        &mut self,
        query: &str,
        price: PriceFilter,
        rating: RatingFilter,
        lang: Option<&str>,
        country: Option<&str>,
    ) -> ScraperResult<AppDetails> {
        let apps = self.get_search(query, price, rating, lang, country).await?;
        self.get_apps(&ids_of(&apps), lang, country).await
    }
}

fn locale_query(locale: &RequestContext) -> Query<'static> {
    vec![
        ("hl", Some(locale.lang.clone())),
        ("gl", Some(locale.country.clone())),
    ]
}

fn ids_of(apps: &[AppSummary]) -> Vec<String> {
    apps.iter().map(|app| app.id.clone()).collect()
}
