use log::debug;

use crate::dom::{NodeId, PageDocument};
use crate::files::SelectedFile;

pub const UPLOAD_AREA_CLASS: &str = "upload-area";
pub const FILE_INPUT_ID: &str = "file";
pub const DROP_HIGHLIGHT_CLASS: &str = "border-primary";

/// The region accepting dragged file payloads. Highlights while a drag
/// hovers over it and hands dropped files over to the file input.
pub struct DropZone {
    node: NodeId,
    input: Option<NodeId>,
}

impl DropZone {
    /// Returns `None` when the page has no upload area, in which case
    /// drag events are ignored entirely.
    pub fn setup(doc: &PageDocument) -> Option<Self> {
        let node = doc.by_class(UPLOAD_AREA_CLASS).first().copied()?;
        Some(Self {
            node,
            input: doc.by_id(FILE_INPUT_ID),
        })
    }

    pub fn handle_drag_enter(&self, doc: &mut PageDocument) {
        doc.element_mut(self.node).add_class(DROP_HIGHLIGHT_CLASS);
    }

    pub fn handle_drag_over(&self, doc: &mut PageDocument) {
        doc.element_mut(self.node).add_class(DROP_HIGHLIGHT_CLASS);
    }

    pub fn handle_drag_leave(&self, doc: &mut PageDocument) {
        doc.element_mut(self.node).remove_class(DROP_HIGHLIGHT_CLASS);
    }

    /// Clears the highlight and reports whether the dropped list should be
    /// assigned to the file input: the list is non-empty and an input
    /// exists to receive it.
    pub fn handle_drop(&self, doc: &mut PageDocument, files: &[SelectedFile]) -> bool {
        doc.element_mut(self.node).remove_class(DROP_HIGHLIGHT_CLASS);
        if files.is_empty() || self.input.is_none() {
            return false;
        }
        debug!("{} file(s) dropped on upload area", files.len());
        true
    }

    pub fn is_highlighted(&self, doc: &PageDocument) -> bool {
        doc.element(self.node).has_class(DROP_HIGHLIGHT_CLASS)
    }
}

/// The upload form's file input: holds the current selection the way the
/// browser-owned file list would.
pub struct FileInput {
    node: NodeId,
    files: Vec<SelectedFile>,
}

impl FileInput {
    pub fn setup(doc: &PageDocument) -> Option<Self> {
        let node = doc.by_id(FILE_INPUT_ID)?;
        Some(Self {
            node,
            files: Vec::new(),
        })
    }

    /// Replace the selection wholesale, picker and drop alike.
    pub fn assign(&mut self, files: Vec<SelectedFile>) {
        self.files = files;
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn doc_with_upload_area(with_input: bool) -> PageDocument {
        let mut doc = PageDocument::new();
        doc.insert(Element::new("div").with_class(UPLOAD_AREA_CLASS));
        if with_input {
            doc.insert(Element::new("input").with_id(FILE_INPUT_ID));
        }
        doc
    }

    fn image_file() -> SelectedFile {
        SelectedFile::in_memory("front.png", "image/png", vec![0xff])
    }

    #[test]
    fn setup_without_upload_area_is_none() {
        let mut doc = PageDocument::new();
        doc.insert(Element::new("div"));
        assert!(DropZone::setup(&doc).is_none());
    }

    #[test]
    fn drag_toggles_highlight() {
        let mut doc = doc_with_upload_area(true);
        let zone = DropZone::setup(&doc).unwrap();

        zone.handle_drag_enter(&mut doc);
        assert!(zone.is_highlighted(&doc));

        // Repeated over events keep a single marker class.
        zone.handle_drag_over(&mut doc);
        assert!(zone.is_highlighted(&doc));

        zone.handle_drag_leave(&mut doc);
        assert!(!zone.is_highlighted(&doc));
    }

    #[test]
    fn drop_clears_highlight_and_assigns() {
        let mut doc = doc_with_upload_area(true);
        let zone = DropZone::setup(&doc).unwrap();

        zone.handle_drag_enter(&mut doc);
        assert!(zone.handle_drop(&mut doc, &[image_file()]));
        assert!(!zone.is_highlighted(&doc));
    }

    #[test]
    fn empty_drop_only_clears_highlight() {
        let mut doc = doc_with_upload_area(true);
        let zone = DropZone::setup(&doc).unwrap();

        zone.handle_drag_over(&mut doc);
        assert!(!zone.handle_drop(&mut doc, &[]));
        assert!(!zone.is_highlighted(&doc));
    }

    #[test]
    fn drop_without_input_is_not_assigned() {
        let mut doc = doc_with_upload_area(false);
        let zone = DropZone::setup(&doc).unwrap();

        assert!(!zone.handle_drop(&mut doc, &[image_file()]));
    }

    #[test]
    fn multi_file_drop_keeps_whole_list() {
        let doc = doc_with_upload_area(true);
        let mut input = FileInput::setup(&doc).unwrap();

        let files = vec![
            image_file(),
            SelectedFile::in_memory("back.png", "image/png", vec![0x00]),
        ];
        input.assign(files.clone());
        assert_eq!(input.files(), &files[..]);
    }
}
