//! Outbound directions links and site detail content

use crate::catalog::{SiteKind, SiteLocation};
use crate::config::DEFAULT_DIRECTIONS_BASE;

/// Browsing context for outbound links
pub const NEW_CONTEXT: &str = "_blank";

/// External map-directions URL for a destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionsLink {
    pub url: String,
}

impl DirectionsLink {
    pub fn new(base: &str, lat: f64, lng: f64) -> Self {
        Self {
            url: format!("{base}{lat},{lng}"),
        }
    }

    pub fn google(lat: f64, lng: f64) -> Self {
        Self::new(DEFAULT_DIRECTIONS_BASE, lat, lng)
    }

    pub fn target(&self) -> &'static str {
        NEW_CONTEXT
    }
}

/// Opens a directions link. Fire-and-forget: implementations must not
/// report back into the marker controller.
pub trait DirectionsHandler {
    fn open(&self, link: &DirectionsLink);
}

impl<F> DirectionsHandler for F
where
    F: Fn(&DirectionsLink),
{
    fn open(&self, link: &DirectionsLink) {
        self(link)
    }
}

/// Content of a site's detail popup
#[derive(Debug, Clone, PartialEq)]
pub struct SiteDetail {
    pub name: String,
    pub kind: SiteKind,
    pub category: String,
    pub status: String,
    pub description: String,
    pub challenges: String,
    pub image: Option<String>,
    pub directions: DirectionsLink,
}

impl SiteDetail {
    pub fn new(site: &SiteLocation, directions_base: &str) -> Self {
        Self {
            name: site.name.clone(),
            kind: site.kind,
            category: site.category.clone(),
            status: site.status.clone(),
            description: site.description.clone(),
            challenges: site.challenges.clone(),
            image: site.image.clone(),
            directions: DirectionsLink::new(directions_base, site.latitude, site.longitude),
        }
    }

    /// The "Get directions" action of the detail view
    pub fn request_directions(&self, handler: &dyn DirectionsHandler) {
        handler.open(&self.directions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SiteCatalog;
    use std::cell::RefCell;

    #[test]
    fn test_google_link() {
        let link = DirectionsLink::google(0.25509, 34.72066);
        assert_eq!(
            link.url,
            "https://www.google.com/maps/dir/?api=1&destination=0.25509,34.72066"
        );
        assert_eq!(link.target(), "_blank");
    }

    #[test]
    fn test_detail_invokes_handler() {
        let catalog = SiteCatalog::builtin().unwrap();
        let detail = SiteDetail::new(catalog.first(), DEFAULT_DIRECTIONS_BASE);
        let opened = RefCell::new(Vec::new());

        detail.request_directions(&|link: &DirectionsLink| opened.borrow_mut().push(link.clone()));

        assert_eq!(opened.borrow().len(), 1);
        assert!(opened.borrow()[0].url.ends_with("0.25509,34.72066"));
    }
}
