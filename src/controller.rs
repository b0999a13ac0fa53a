use anyhow::Result;
use log::{debug, info};
use std::time::Duration;

use crate::dom::PageDocument;
use crate::event_source::{EventSource, UiEvent};
use crate::fetch::PageFetcher;
use crate::files::{FileReader, SelectedFile};
use crate::navigation::PageNavigation;
use crate::preview::PreviewPane;
use crate::tooltip::{TooltipActivator, TooltipEngine};
use crate::upload::{DropZone, FileInput};

/// Wires the page's interactive behavior onto the document once, the way
/// the document-ready handler does: tooltips, drag-and-drop upload, file
/// preview and page navigation. Each setup routine is a no-op when its
/// elements are absent, and later events for that component are dropped.
pub struct PageController {
    doc: PageDocument,
    fetcher: Box<dyn PageFetcher>,
    reader: Box<dyn FileReader>,
    tooltips: TooltipActivator,
    drop_zone: Option<DropZone>,
    file_input: Option<FileInput>,
    preview: Option<PreviewPane>,
    navigation: Option<PageNavigation>,
}

impl PageController {
    pub fn new(
        mut doc: PageDocument,
        fetcher: Box<dyn PageFetcher>,
        reader: Box<dyn FileReader>,
        tooltip_engine: &dyn TooltipEngine,
    ) -> Self {
        let tooltips = TooltipActivator::setup(&doc, tooltip_engine);
        let drop_zone = DropZone::setup(&doc);
        let file_input = FileInput::setup(&doc);
        let preview = PreviewPane::setup(&doc);
        // Activates the first link, so a fetch may already be in flight
        // by the time the controller is handed back.
        let navigation = PageNavigation::setup(&mut doc, fetcher.as_ref());

        info!(
            "Page controller ready: tooltips={} drop_zone={} preview={} nav_links={}",
            tooltips.activated().len(),
            drop_zone.is_some(),
            preview.is_some(),
            navigation.as_ref().map_or(0, PageNavigation::link_count),
        );

        Self {
            doc,
            fetcher,
            reader,
            tooltips,
            drop_zone,
            file_input,
            preview,
            navigation,
        }
    }

    /// Dispatch one event to the component that owns it.
    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::DragEnter => {
                if let Some(zone) = &self.drop_zone {
                    zone.handle_drag_enter(&mut self.doc);
                }
            }
            UiEvent::DragOver => {
                if let Some(zone) = &self.drop_zone {
                    zone.handle_drag_over(&mut self.doc);
                }
            }
            UiEvent::DragLeave => {
                if let Some(zone) = &self.drop_zone {
                    zone.handle_drag_leave(&mut self.doc);
                }
            }
            UiEvent::Drop { files } => {
                let assign = match &self.drop_zone {
                    Some(zone) => zone.handle_drop(&mut self.doc, &files),
                    None => false,
                };
                if assign {
                    // Synthesized change event, so downstream listeners
                    // react identically to a picker selection.
                    self.select_files(files);
                }
            }
            UiEvent::FileInputChange => {
                if let (Some(input), Some(preview)) = (&self.file_input, &self.preview) {
                    preview.handle_change(&mut self.doc, input.files(), self.reader.as_ref());
                }
            }
            UiEvent::NavClick { index } => {
                if let Some(nav) = &mut self.navigation {
                    nav.handle_click(&mut self.doc, index, self.fetcher.as_ref());
                }
            }
            UiEvent::PageFetched { url, result } => {
                if let Some(nav) = &self.navigation {
                    nav.handle_fetch_completed(&mut self.doc, &url, result);
                }
            }
            UiEvent::FileRead { file_name, result } => {
                if let Some(preview) = &self.preview {
                    preview.handle_read_completed(&mut self.doc, &file_name, result);
                }
            }
        }
    }

    /// Picker-style selection: assign the list to the file input and fire
    /// the change event.
    pub fn select_files(&mut self, files: Vec<SelectedFile>) {
        let Some(input) = &mut self.file_input else {
            debug!("File selection ignored, page has no file input");
            return;
        };
        input.assign(files);
        self.handle_event(UiEvent::FileInputChange);
    }

    pub fn document(&self) -> &PageDocument {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut PageDocument {
        &mut self.doc
    }

    pub fn navigation(&self) -> Option<&PageNavigation> {
        self.navigation.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewPane> {
        self.preview.as_ref()
    }

    pub fn tooltips(&self) -> &TooltipActivator {
        &self.tooltips
    }

    pub fn selected_files(&self) -> &[SelectedFile] {
        self.file_input.as_ref().map_or(&[], FileInput::files)
    }
}

/// Drain an event source into the controller until it runs dry. Test
/// scenarios and scripted runs use this; the interactive binary drives
/// its own loop.
pub fn run_controller(controller: &mut PageController, events: &mut dyn EventSource) -> Result<()> {
    while events.poll(Duration::from_millis(0))? {
        controller.handle_event(events.read()?);
    }
    Ok(())
}
