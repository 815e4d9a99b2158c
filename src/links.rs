//! Ordered collection of user-defined quick links.

use crate::config;
use serde::{Deserialize, Serialize};
use url::Url;

/// A single quick link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
    /// Explicit icon URL overriding the favicon lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Link {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    /// Resolve the icon shown for this link.
    ///
    /// An explicit icon wins. Otherwise the host of `url` is fed into the
    /// favicon service template; URLs without a host get the fallback icon.
    pub fn icon_url(&self, favicon_service: &str) -> String {
        if let Some(icon) = self.icon.as_deref().filter(|icon| !icon.is_empty()) {
            return icon.to_string();
        }

        match Url::parse(&self.url) {
            Ok(url) => match url.host_str() {
                Some(host) if !host.is_empty() => favicon_service.replace("{}", host),
                _ => config::FALLBACK_ICON_URL.to_string(),
            },
            Err(_) => config::FALLBACK_ICON_URL.to_string(),
        }
    }
}

/// Prepend the default scheme unless the URL already carries a recognized one
pub fn normalize_url(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if config::RECOGNIZED_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        url.to_string()
    } else {
        format!("{}{}", config::DEFAULT_SCHEME, url)
    }
}

/// Ordered list of links. Identity is positional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkCollection {
    links: Vec<Link>,
}

impl LinkCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Links shown before the user saved any
    pub fn defaults() -> Self {
        config::DEFAULT_LINKS
            .iter()
            .map(|(name, url)| Link::new(name, url))
            .collect()
    }

    /// Append a link built from raw form input.
    ///
    /// Name and url are trimmed and must be non-empty; otherwise nothing is
    /// added and `false` is returned. A blank icon means "no override".
    pub fn append(&mut self, name: &str, url: &str, icon: Option<&str>) -> bool {
        let name = name.trim();
        let url = url.trim();
        if name.is_empty() || url.is_empty() {
            return false;
        }

        let icon = icon
            .map(str::trim)
            .filter(|icon| !icon.is_empty())
            .map(str::to_string);

        self.links.push(Link {
            name: name.to_string(),
            url: normalize_url(url),
            icon,
        });
        true
    }

    /// Remove and return the link at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn delete_at(&mut self, index: usize) -> Link {
        self.links.remove(index)
    }

    /// Relocate the link at `from` so it ends up at `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn move_to(&mut self, from: usize, to: usize) {
        assert!(
            to < self.links.len(),
            "move target {} out of bounds (len {})",
            to,
            self.links.len()
        );
        let link = self.links.remove(from);
        self.links.insert(to, link);
    }

    /// Drop empty icon overrides left behind by older records
    pub(crate) fn normalize_icons(&mut self) {
        for link in &mut self.links {
            if link.icon.as_deref().is_some_and(str::is_empty) {
                link.icon = None;
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&Link> {
        self.links.get(index)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }
}

impl FromIterator<Link> for LinkCollection {
    fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> Self {
        Self {
            links: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(links: &LinkCollection) -> Vec<&str> {
        links.iter().map(|l| l.name.as_str()).collect()
    }

    fn abc() -> LinkCollection {
        ["A", "B", "C"]
            .iter()
            .map(|n| Link::new(n, &format!("https://{}.example", n.to_lowercase())))
            .collect()
    }

    #[test]
    fn test_append_adds_scheme() {
        let mut links = LinkCollection::new();
        assert!(links.append("Example", "example.com", None));
        assert_eq!(links.len(), 1);
        assert_eq!(links.get(0).unwrap().url, "https://example.com");
        assert_eq!(links.get(0).unwrap().icon, None);
    }

    #[test]
    fn test_append_keeps_existing_scheme() {
        let mut links = LinkCollection::new();
        links.append("Plain", "http://example.com", None);
        links.append("Shouty", "HTTPS://example.org", None);
        links.append("Local", "file:///home/me/index.html", None);
        assert_eq!(links.get(0).unwrap().url, "http://example.com");
        assert_eq!(links.get(1).unwrap().url, "HTTPS://example.org");
        assert_eq!(links.get(2).unwrap().url, "file:///home/me/index.html");
    }

    #[test]
    fn test_append_host_starting_with_http() {
        let mut links = LinkCollection::new();
        links.append("Bin", "httpbin.org", None);
        assert_eq!(links.get(0).unwrap().url, "https://httpbin.org");
    }

    #[test]
    fn test_append_trims_and_rejects_empty() {
        let mut links = LinkCollection::new();
        assert!(!links.append("   ", "example.com", None));
        assert!(!links.append("Example", "  ", None));
        assert!(links.is_empty());

        assert!(links.append("  Example ", " example.com ", Some("  ")));
        let link = links.get(0).unwrap();
        assert_eq!(link.name, "Example");
        assert_eq!(link.url, "https://example.com");
        assert_eq!(link.icon, None);
    }

    #[test]
    fn test_append_goes_to_end_and_allows_duplicates() {
        let mut links = abc();
        links.append("A", "a.example", None);
        assert_eq!(names(&links), ["A", "B", "C", "A"]);
    }

    #[test]
    fn test_delete_at() {
        let mut links = abc();
        let removed = links.delete_at(1);
        assert_eq!(removed.name, "B");
        assert_eq!(names(&links), ["A", "C"]);
    }

    #[test]
    #[should_panic]
    fn test_delete_out_of_range_panics() {
        let mut links = abc();
        links.delete_at(3);
    }

    #[test]
    fn test_move_forward_and_back() {
        let mut links = abc();
        links.move_to(0, 2);
        assert_eq!(names(&links), ["B", "C", "A"]);
        links.move_to(2, 0);
        assert_eq!(names(&links), ["A", "B", "C"]);
    }

    #[test]
    fn test_move_round_trip_all_pairs() {
        let original: LinkCollection = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|n| Link::new(n, "https://example.com"))
            .collect();

        for i in 0..original.len() {
            for j in 0..original.len() {
                let mut links = original.clone();
                links.move_to(i, j);
                links.move_to(j, i);
                assert_eq!(links, original, "move {} -> {} -> {}", i, j, i);
            }
        }
    }

    #[test]
    fn test_move_preserves_untouched_order() {
        let mut links: LinkCollection = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|n| Link::new(n, "https://example.com"))
            .collect();
        links.move_to(1, 3);
        assert_eq!(names(&links), ["A", "C", "D", "B", "E"]);
    }

    #[test]
    fn test_length_after_mixed_operations() {
        let mut links = abc();
        links.append("D", "d.example", None);
        links.append("E", "e.example", None);
        links.delete_at(0);
        links.move_to(3, 0);
        links.append("", "ignored.example", None);
        assert_eq!(links.len(), 3 + 2 - 1);
        assert_eq!(names(&links), ["E", "B", "C", "D"]);
    }

    #[test]
    fn test_icon_override_wins() {
        let link = Link::new("GitHub", "https://github.com").with_icon("https://cdn.example/gh.png");
        assert_eq!(
            link.icon_url(config::FAVICON_SERVICE_URL),
            "https://cdn.example/gh.png"
        );
    }

    #[test]
    fn test_icon_from_favicon_service() {
        let link = Link::new("GitHub", "https://github.com/rust-lang");
        assert_eq!(
            link.icon_url(config::FAVICON_SERVICE_URL),
            "https://www.google.com/s2/favicons?domain=github.com&sz=64"
        );
        let link = link.with_icon("");
        assert_eq!(
            link.icon_url(config::FAVICON_SERVICE_URL),
            "https://www.google.com/s2/favicons?domain=github.com&sz=64"
        );
    }

    #[test]
    fn test_icon_fallback_for_malformed_url() {
        let link = Link::new("Broken", "not a url");
        assert_eq!(
            link.icon_url(config::FAVICON_SERVICE_URL),
            config::FALLBACK_ICON_URL
        );
        // Same input, same output
        assert_eq!(
            link.icon_url(config::FAVICON_SERVICE_URL),
            link.icon_url(config::FAVICON_SERVICE_URL)
        );
    }

    #[test]
    fn test_icon_fallback_without_host() {
        let link = Link::new("Mail", "mailto:me@example.com");
        assert_eq!(
            link.icon_url(config::FAVICON_SERVICE_URL),
            config::FALLBACK_ICON_URL
        );
    }

    #[test]
    fn test_serialized_shape() {
        let links: LinkCollection = vec![
            Link::new("A", "https://a.example"),
            Link::new("B", "https://b.example").with_icon("https://b.example/i.png"),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&links).unwrap();
        assert_eq!(
            json,
            r#"[{"name":"A","url":"https://a.example"},{"name":"B","url":"https://b.example","icon":"https://b.example/i.png"}]"#
        );
    }

    #[test]
    fn test_legacy_empty_icon_normalized() {
        let mut links: LinkCollection =
            serde_json::from_str(r#"[{"name":"A","url":"https://a.example","icon":""}]"#).unwrap();
        links.normalize_icons();
        assert_eq!(links.get(0).unwrap().icon, None);
    }
}
