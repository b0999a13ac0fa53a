pub mod test_helpers {
    use std::sync::{Arc, Mutex};

    use crate::dom::{Element, NodeId, PageDocument};
    use crate::event_source::{SimulatedEventSource, UiEvent};
    use crate::fetch::{FetchError, PageFetcher};
    use crate::files::{FileReadError, FileReader, SelectedFile};
    use crate::navigation::{CONTENT_FRAME_ID, NAV_LINK_CLASS};
    use crate::preview::PREVIEW_CONTAINER_ID;
    use crate::tooltip::{TOOLTIP_TOGGLE_ATTR, TOOLTIP_TOGGLE_VALUE, TooltipEngine};
    use crate::upload::{FILE_INPUT_ID, UPLOAD_AREA_CLASS};

    /// Fetcher that only records the requested URLs; completions are
    /// injected by the scenario as [`UiEvent::PageFetched`] events.
    #[derive(Clone, Default)]
    pub struct StubFetcher {
        pub requests: Arc<Mutex<Vec<String>>>,
    }

    impl StubFetcher {
        pub fn requested(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl PageFetcher for StubFetcher {
        fn fetch(&self, url: &str) {
            self.requests.lock().unwrap().push(url.to_string());
        }
    }

    /// Reader counterpart of [`StubFetcher`], recording file names.
    #[derive(Clone, Default)]
    pub struct StubFileReader {
        pub reads: Arc<Mutex<Vec<String>>>,
    }

    impl StubFileReader {
        pub fn read_names(&self) -> Vec<String> {
            self.reads.lock().unwrap().clone()
        }
    }

    impl FileReader for StubFileReader {
        fn read_as_data_url(&self, file: &SelectedFile) {
            self.reads.lock().unwrap().push(file.name.clone());
        }
    }

    #[derive(Clone, Default)]
    pub struct RecordingTooltipEngine {
        pub attached: Arc<Mutex<Vec<(NodeId, String)>>>,
    }

    impl TooltipEngine for RecordingTooltipEngine {
        fn attach(&self, node: NodeId, title: &str) {
            self.attached.lock().unwrap().push((node, title.to_string()));
        }
    }

    /// Builder for the server-rendered page the controller is wired onto.
    /// Defaults to the full upload page; pieces can be left out to test
    /// the graceful-absence paths.
    pub struct PageBuilder {
        upload_area: bool,
        file_input: bool,
        preview_container: bool,
        nav_pages: usize,
        content_frame: bool,
        tooltip_titles: Vec<String>,
    }

    impl PageBuilder {
        pub fn new() -> Self {
            Self {
                upload_area: true,
                file_input: true,
                preview_container: true,
                nav_pages: 3,
                content_frame: true,
                tooltip_titles: Vec::new(),
            }
        }

        pub fn without_upload_area(mut self) -> Self {
            self.upload_area = false;
            self
        }

        pub fn without_file_input(mut self) -> Self {
            self.file_input = false;
            self
        }

        pub fn without_preview_container(mut self) -> Self {
            self.preview_container = false;
            self
        }

        pub fn without_content_frame(mut self) -> Self {
            self.content_frame = false;
            self
        }

        pub fn nav_pages(mut self, pages: usize) -> Self {
            self.nav_pages = pages;
            self
        }

        pub fn tooltip(mut self, title: &str) -> Self {
            self.tooltip_titles.push(title.to_string());
            self
        }

        pub fn build(self) -> PageDocument {
            let mut doc = PageDocument::new();
            if self.upload_area {
                doc.insert(Element::new("div").with_class(UPLOAD_AREA_CLASS));
            }
            if self.file_input {
                doc.insert(Element::new("input").with_id(FILE_INPUT_ID));
            }
            if self.preview_container {
                doc.insert(Element::new("div").with_id(PREVIEW_CONTAINER_ID));
            }
            for n in 1..=self.nav_pages {
                doc.insert(
                    Element::new("a")
                        .with_class(NAV_LINK_CLASS)
                        .with_attr("href", format!("/page/{}", n)),
                );
            }
            if self.content_frame {
                doc.insert(Element::new("div").with_id(CONTENT_FRAME_ID));
            }
            for title in &self.tooltip_titles {
                doc.insert(
                    Element::new("button")
                        .with_attr(TOOLTIP_TOGGLE_ATTR, TOOLTIP_TOGGLE_VALUE)
                        .with_attr("title", title),
                );
            }
            doc
        }
    }

    impl Default for PageBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Builder for scripted event sequences.
    pub struct ScenarioBuilder {
        events: Vec<UiEvent>,
    }

    impl ScenarioBuilder {
        pub fn new() -> Self {
            Self { events: Vec::new() }
        }

        pub fn drag_enter(mut self) -> Self {
            self.events.push(UiEvent::DragEnter);
            self
        }

        pub fn drag_over(mut self) -> Self {
            self.events.push(UiEvent::DragOver);
            self
        }

        pub fn drag_leave(mut self) -> Self {
            self.events.push(UiEvent::DragLeave);
            self
        }

        pub fn drop_files(mut self, files: Vec<SelectedFile>) -> Self {
            self.events.push(UiEvent::Drop { files });
            self
        }

        pub fn change(mut self) -> Self {
            self.events.push(UiEvent::FileInputChange);
            self
        }

        pub fn click(mut self, index: usize) -> Self {
            self.events.push(UiEvent::NavClick { index });
            self
        }

        pub fn fetch_ok(mut self, url: &str, body: &str) -> Self {
            self.events.push(UiEvent::PageFetched {
                url: url.to_string(),
                result: Ok(body.to_string()),
            });
            self
        }

        pub fn fetch_err(mut self, url: &str, message: &str) -> Self {
            self.events.push(UiEvent::PageFetched {
                url: url.to_string(),
                result: Err(FetchError(message.to_string())),
            });
            self
        }

        pub fn read_ok(mut self, file_name: &str, data_url: &str) -> Self {
            self.events.push(UiEvent::FileRead {
                file_name: file_name.to_string(),
                result: Ok(data_url.to_string()),
            });
            self
        }

        pub fn read_err(mut self, file_name: &str, message: &str) -> Self {
            self.events.push(UiEvent::FileRead {
                file_name: file_name.to_string(),
                result: Err(FileReadError(message.to_string())),
            });
            self
        }

        pub fn build(self) -> SimulatedEventSource {
            SimulatedEventSource::new(self.events)
        }
    }

    impl Default for ScenarioBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
