use log::{debug, warn};

use crate::dom::{NodeId, PageDocument};
use crate::files::{FileReadError, FileReader, SelectedFile};
use crate::upload::FILE_INPUT_ID;

pub const PREVIEW_CONTAINER_ID: &str = "preview-container";

/// Inline preview of the first selected file.
///
/// Image reads are asynchronous and never cancelled: a read that finishes
/// after a newer change event has already cleared the container still
/// writes its image into it.
pub struct PreviewPane {
    container: NodeId,
}

impl PreviewPane {
    /// Needs both the file input and the preview container; either one
    /// missing disables previews altogether.
    pub fn setup(doc: &PageDocument) -> Option<Self> {
        doc.by_id(FILE_INPUT_ID)?;
        let container = doc.by_id(PREVIEW_CONTAINER_ID)?;
        Some(Self { container })
    }

    /// React to a change of the input's selection: clear the old preview,
    /// then render one for the first file only.
    pub fn handle_change(
        &self,
        doc: &mut PageDocument,
        files: &[SelectedFile],
        reader: &dyn FileReader,
    ) {
        doc.element_mut(self.container).set_markup("");

        let Some(file) = files.first() else {
            return;
        };

        if file.is_image() {
            debug!("Starting preview read of '{}'", file.name);
            reader.read_as_data_url(file);
        } else if file.is_pdf() {
            doc.element_mut(self.container)
                .append_markup(&pdf_placeholder(&file.name));
        } else {
            // Accepted by the upload, shown without a preview.
            debug!("No preview for '{}' ({})", file.name, file.mime);
        }
    }

    /// Apply a finished data-URL read. Failed reads leave the container
    /// alone.
    pub fn handle_read_completed(
        &self,
        doc: &mut PageDocument,
        file_name: &str,
        result: Result<String, FileReadError>,
    ) {
        match result {
            Ok(data_url) => {
                doc.element_mut(self.container).append_markup(&format!(
                    r#"<img src="{}" class="img-fluid" alt="{}">"#,
                    data_url, file_name
                ));
            }
            Err(e) => warn!("Preview read of '{}' failed: {}", file_name, e),
        }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }
}

fn pdf_placeholder(file_name: &str) -> String {
    format!(
        r#"<div class="text-center p-4"><svg width="64" height="64" fill="currentColor" class="bi bi-file-earmark-pdf text-danger" viewBox="0 0 16 16"></svg><p class="mt-2">{}</p></div>"#,
        file_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingReader {
        reads: Arc<Mutex<Vec<String>>>,
    }

    impl FileReader for RecordingReader {
        fn read_as_data_url(&self, file: &SelectedFile) {
            self.reads.lock().unwrap().push(file.name.clone());
        }
    }

    fn preview_doc() -> (PageDocument, PreviewPane) {
        let mut doc = PageDocument::new();
        doc.insert(Element::new("input").with_id(FILE_INPUT_ID));
        doc.insert(
            Element::new("div")
                .with_id(PREVIEW_CONTAINER_ID)
                .with_markup("<p>stale preview</p>"),
        );
        let pane = PreviewPane::setup(&doc).unwrap();
        (doc, pane)
    }

    #[test]
    fn setup_requires_both_elements() {
        let mut doc = PageDocument::new();
        doc.insert(Element::new("div").with_id(PREVIEW_CONTAINER_ID));
        assert!(PreviewPane::setup(&doc).is_none());

        let mut doc = PageDocument::new();
        doc.insert(Element::new("input").with_id(FILE_INPUT_ID));
        assert!(PreviewPane::setup(&doc).is_none());
    }

    #[test]
    fn change_clears_previous_preview() {
        let (mut doc, pane) = preview_doc();
        let reader = RecordingReader::default();

        pane.handle_change(&mut doc, &[], &reader);

        assert_eq!(doc.element(pane.container()).markup(), "");
        assert!(reader.reads.lock().unwrap().is_empty());
    }

    #[test]
    fn image_selection_starts_a_read() {
        let (mut doc, pane) = preview_doc();
        let reader = RecordingReader::default();
        let file = SelectedFile::in_memory("front.png", "image/png", vec![1]);

        pane.handle_change(&mut doc, &[file], &reader);

        assert_eq!(doc.element(pane.container()).markup(), "");
        assert_eq!(*reader.reads.lock().unwrap(), vec!["front.png"]);
    }

    #[test]
    fn only_first_file_is_previewed() {
        let (mut doc, pane) = preview_doc();
        let reader = RecordingReader::default();
        let files = vec![
            SelectedFile::in_memory("front.png", "image/png", vec![1]),
            SelectedFile::in_memory("back.png", "image/png", vec![2]),
        ];

        pane.handle_change(&mut doc, &files, &reader);

        assert_eq!(*reader.reads.lock().unwrap(), vec!["front.png"]);
    }

    #[test]
    fn completed_read_appends_img() {
        let (mut doc, pane) = preview_doc();
        let reader = RecordingReader::default();
        let file = SelectedFile::in_memory("front.png", "image/png", vec![1]);

        pane.handle_change(&mut doc, &[file], &reader);
        pane.handle_read_completed(
            &mut doc,
            "front.png",
            Ok("data:image/png;base64,AQ==".to_string()),
        );

        let markup = doc.element(pane.container()).markup();
        assert_eq!(
            markup,
            r#"<img src="data:image/png;base64,AQ==" class="img-fluid" alt="front.png">"#
        );
    }

    #[test]
    fn pdf_selection_renders_placeholder_synchronously() {
        let (mut doc, pane) = preview_doc();
        let reader = RecordingReader::default();
        let file = SelectedFile::in_memory("issue-12.pdf", "application/pdf", vec![1]);

        pane.handle_change(&mut doc, &[file], &reader);

        let element = doc.element(pane.container());
        assert!(element.text().contains("issue-12.pdf"));
        assert!(!element.markup().contains("<img"));
        assert!(reader.reads.lock().unwrap().is_empty());
    }

    #[test]
    fn unsupported_type_leaves_container_empty() {
        let (mut doc, pane) = preview_doc();
        let reader = RecordingReader::default();
        let file = SelectedFile::in_memory("notes.txt", "text/plain", vec![1]);

        pane.handle_change(&mut doc, &[file], &reader);

        assert_eq!(doc.element(pane.container()).markup(), "");
        assert!(reader.reads.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_read_leaves_container_untouched() {
        let (mut doc, pane) = preview_doc();

        pane.handle_read_completed(
            &mut doc,
            "front.png",
            Err(FileReadError("disk gone".to_string())),
        );

        assert_eq!(doc.element(pane.container()).markup(), "<p>stale preview</p>");
    }

    #[test]
    fn stale_read_still_lands_after_newer_clear() {
        // The read of selection A is not cancelled when selection B
        // arrives; its completion writes into the freshly cleared
        // container. Pinned, not fixed.
        let (mut doc, pane) = preview_doc();
        let reader = RecordingReader::default();

        let first = SelectedFile::in_memory("slow.png", "image/png", vec![1]);
        let second = SelectedFile::in_memory("notes.txt", "text/plain", vec![2]);

        pane.handle_change(&mut doc, &[first], &reader);
        pane.handle_change(&mut doc, &[second], &reader);
        pane.handle_read_completed(
            &mut doc,
            "slow.png",
            Ok("data:image/png;base64,AQ==".to_string()),
        );

        assert!(doc.element(pane.container()).markup().contains("slow.png"));
    }
}
