use log::{debug, info};

use crate::dom::{NodeId, PageDocument};
use crate::fetch::{FetchError, PageFetcher};

pub const NAV_LINK_CLASS: &str = "page-nav-link";
pub const CONTENT_FRAME_ID: &str = "page-content-frame";
pub const ACTIVE_CLASS: &str = "active";

pub(crate) const LOADING_SPINNER: &str = r#"<div class="loading-spinner"><div class="spinner-border text-primary" role="status"><span class="visually-hidden">加载中...</span></div><p class="mt-2">加载中...</p></div>"#;

/// Client-driven loading of newspaper page fragments into the content
/// frame.
///
/// Clicks are not de-duplicated and fetches are not cancelled; when two
/// are in flight, whichever completion arrives last owns the frame.
pub struct PageNavigation {
    links: Vec<NodeId>,
    frame: NodeId,
}

impl PageNavigation {
    /// Binds the link set to the frame and activates the first link so a
    /// page is visible without user interaction. `None` when either the
    /// links or the frame are missing.
    pub fn setup(doc: &mut PageDocument, fetcher: &dyn PageFetcher) -> Option<Self> {
        let links = doc.by_class(NAV_LINK_CLASS);
        let frame = doc.by_id(CONTENT_FRAME_ID)?;
        if links.is_empty() {
            return None;
        }
        let mut nav = Self { links, frame };
        nav.handle_click(doc, 0, fetcher);
        Some(nav)
    }

    /// Move the active marker to the clicked link, show the loading
    /// placeholder and issue the fetch for the link's target.
    pub fn handle_click(&mut self, doc: &mut PageDocument, index: usize, fetcher: &dyn PageFetcher) {
        let Some(&link) = self.links.get(index) else {
            return;
        };

        if let Some(&previous) = self
            .links
            .iter()
            .find(|&&l| doc.element(l).has_class(ACTIVE_CLASS))
        {
            doc.element_mut(previous).remove_class(ACTIVE_CLASS);
        }
        doc.element_mut(link).add_class(ACTIVE_CLASS);

        doc.element_mut(self.frame).set_markup(LOADING_SPINNER);

        let url = doc
            .element(link)
            .attr("href")
            .unwrap_or_default()
            .to_string();
        info!("Loading page {} from {}", index + 1, url);
        fetcher.fetch(&url);
    }

    /// Apply a finished fetch: the response text verbatim on success, the
    /// inline error block on failure. Applies unconditionally, whatever
    /// request it belongs to.
    pub fn handle_fetch_completed(
        &self,
        doc: &mut PageDocument,
        url: &str,
        result: Result<String, FetchError>,
    ) {
        let markup = match result {
            Ok(html) => html,
            Err(e) => {
                debug!("Fetch of {} surfaced to frame: {}", url, e);
                format!(r#"<div class="alert alert-danger">加载失败: {}</div>"#, e)
            }
        };
        doc.element_mut(self.frame).set_markup(markup);
    }

    /// Index of the link currently holding the active marker.
    pub fn active_index(&self, doc: &PageDocument) -> Option<usize> {
        self.links
            .iter()
            .position(|&l| doc.element(l).has_class(ACTIVE_CLASS))
    }

    pub fn frame(&self) -> NodeId {
        self.frame
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}
