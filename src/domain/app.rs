use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Application summary from listing and search pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSummary {
    pub id: String,
    pub url: String,
    pub title: String,
    pub image: String,
    pub author: String,
    /// 0.0 ..= 5.0, zero when the page shows no rating
    pub rating: f64,
    /// Display price; `None` means free
    pub price: Option<String>,
}

/// Full application record from the detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppDetail {
    pub id: String,
    pub url: String,
    pub image: String,
    pub title: String,
    pub author: Option<String>,
    pub author_link: Option<String>,
    pub categories: Vec<String>,
    pub price: Option<String>,
    pub screenshots: Vec<String>,
    pub description: Option<String>,
    pub description_html: Option<String>,
    pub rating: f64,
    pub votes: u64,
    pub last_updated: Option<String>,
    pub size: Option<String>,
    pub downloads: Option<String>,
    pub version: Option<String>,
    pub supported_os: Option<String>,
    pub content_rating: Option<String>,
    pub whatsnew: Option<String>,
    pub video_link: Option<String>,
    pub video_image: Option<String>,
}

/// Detail records keyed by id, in the order the ids were requested
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppDetails {
    entries: IndexMap<String, AppDetail>,
}

impl AppDetails {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. A repeated id keeps its original position and takes the new record.
    pub fn insert(&mut self, id: String, detail: AppDetail) {
        self.entries.insert(id, detail);
    }

    pub fn get(&self, id: &str) -> Option<&AppDetail> {
        self.entries.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AppDetail)> {
        self.entries.iter().map(|(id, detail)| (id.as_str(), detail))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for AppDetails {
    type Item = (String, AppDetail);
    type IntoIter = indexmap::map::IntoIter<String, AppDetail>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
pub(crate) fn sample_detail(id: &str) -> AppDetail {
    AppDetail {
        id: id.to_string(),
        url: format!("https://play.google.com/store/apps/details?id={id}"),
        image: "https://play.google.com/icon.png".to_string(),
        title: id.to_string(),
        author: None,
        author_link: None,
        categories: Vec::new(),
        price: None,
        screenshots: Vec::new(),
        description: None,
        description_html: None,
        rating: 0.0,
        votes: 0,
        last_updated: None,
        size: None,
        downloads: None,
        version: None,
        supported_os: None,
        content_rating: None,
        whatsnew: None,
        video_link: None,
        video_image: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_preserve_request_order() {
        let mut details = AppDetails::new();
        details.insert("b.app".to_string(), sample_detail("b.app"));
        details.insert("a.app".to_string(), sample_detail("a.app"));

        let ids: Vec<_> = details.ids().collect();
        assert_eq!(ids, vec!["b.app", "a.app"]);
        assert_eq!(details.get("a.app").map(|d| d.title.as_str()), Some("a.app"));
    }

    #[test]
    fn test_repeated_id_keeps_first_position() {
        let mut details = AppDetails::new();
        details.insert("a.app".to_string(), sample_detail("a.app"));
        details.insert("b.app".to_string(), sample_detail("b.app"));

        let mut updated = sample_detail("a.app");
        updated.votes = 42;
        details.insert("a.app".to_string(), updated);

        assert_eq!(details.len(), 2);
        assert_eq!(details.ids().next(), Some("a.app"));
        assert_eq!(details.get("a.app").map(|d| d.votes), Some(42));
    }

    #[test]
    fn test_details_serialize_as_an_ordered_object() {
        let mut details = AppDetails::new();
        details.insert("b.app".to_string(), sample_detail("b.app"));
        details.insert("a.app".to_string(), sample_detail("a.app"));

        let value = serde_json::to_value(&details).unwrap();
        assert!(value.is_object());
        assert_eq!(value["a.app"]["id"], "a.app");

        let json = serde_json::to_string(&details).unwrap();
        assert!(json.starts_with(r#"{"b.app":{"#));
        assert!(json.find(r#""a.app":{"#) > json.find(r#""b.app":{"#));

        let restored: AppDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.ids().collect::<Vec<_>>(), vec!["b.app", "a.app"]);
    }
}
