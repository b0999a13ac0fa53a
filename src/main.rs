use std::fs::File;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};
use url::Url;

use gazeta::controller::PageController;
use gazeta::dialog::{TerminalPrompt, confirm_action};
use gazeta::dom::{Element, PageDocument};
use gazeta::event_source::{ChannelEventSource, EventSource, UiEvent};
use gazeta::fetch::HttpFetcher;
use gazeta::files::{SelectedFile, ThreadFileReader};
use gazeta::highlight::highlight_search_text;
use gazeta::navigation::{CONTENT_FRAME_ID, NAV_LINK_CLASS};
use gazeta::panic_handler;
use gazeta::preview::PREVIEW_CONTAINER_ID;
use gazeta::settings;
use gazeta::tooltip::{LogTooltipEngine, TOOLTIP_TOGGLE_ATTR, TOOLTIP_TOGGLE_VALUE};
use gazeta::upload::{FILE_INPUT_ID, UPLOAD_AREA_CLASS};

#[derive(Parser)]
#[command(
    name = "gazeta",
    version,
    about = "Interactive page client for the Gazeta newspaper reader"
)]
struct Args {
    /// Base URL of the newspaper server
    #[arg(long)]
    server: Option<String>,

    /// Number of newspaper pages exposed as navigation links
    #[arg(long)]
    pages: Option<u32>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

enum Command {
    Open(usize),
    Attach(PathBuf),
    Drop(Vec<PathBuf>),
    Find(String),
    Show,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    Some(match word {
        "open" => match rest.parse() {
            Ok(n) => Command::Open(n),
            Err(_) => Command::Unknown(line.to_string()),
        },
        "attach" if !rest.is_empty() => Command::Attach(PathBuf::from(rest)),
        "drop" if !rest.is_empty() => {
            Command::Drop(rest.split_whitespace().map(PathBuf::from).collect())
        }
        "find" if !rest.is_empty() => Command::Find(rest.to_string()),
        "show" => Command::Show,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(word.to_string()),
    })
}

/// The page skeleton the server would render around the controller:
/// upload area, file input, preview container, one navigation link per
/// newspaper page and the content frame.
fn build_page_document(base: &Url, pages: u32) -> Result<PageDocument> {
    let mut doc = PageDocument::new();
    doc.insert(
        Element::new("div")
            .with_class(UPLOAD_AREA_CLASS)
            .with_attr(TOOLTIP_TOGGLE_ATTR, TOOLTIP_TOGGLE_VALUE)
            .with_attr("title", "Drop a newspaper scan here"),
    );
    doc.insert(Element::new("input").with_id(FILE_INPUT_ID));
    doc.insert(Element::new("div").with_id(PREVIEW_CONTAINER_ID));
    for n in 1..=pages {
        let href = base
            .join(&format!("page/{n}"))
            .context("could not build page URL")?;
        doc.insert(
            Element::new("a")
                .with_class(NAV_LINK_CLASS)
                .with_attr("href", href.to_string())
                .with_markup(format!("第{n}版")),
        );
    }
    doc.insert(Element::new("div").with_id(CONTENT_FRAME_ID));
    Ok(doc)
}

fn announce(event: &UiEvent) {
    match event {
        UiEvent::PageFetched { url, result } => match result {
            Ok(body) => println!("Loaded {url} ({} bytes)", body.len()),
            Err(e) => println!("Load of {url} failed: {e}"),
        },
        UiEvent::FileRead { file_name, result } => match result {
            Ok(_) => println!("Preview ready for {file_name}"),
            Err(e) => println!("Preview of {file_name} failed: {e}"),
        },
        _ => {}
    }
}

fn print_help() {
    println!("Commands:");
    println!("  open N          load newspaper page N");
    println!("  attach PATH     select a file as if picked in the upload form");
    println!("  drop PATH...    drop files onto the upload area");
    println!("  find TEXT       highlight TEXT in the current page");
    println!("  show            print the content frame and preview");
    println!("  quit            exit");
}

/// Returns false when the session should end.
fn apply_command(controller: &mut PageController, command: Command) -> bool {
    match command {
        Command::Open(n) => {
            if n == 0 {
                println!("Pages are numbered from 1");
                return true;
            }
            controller.handle_event(UiEvent::NavClick { index: n - 1 });
        }
        Command::Attach(path) => {
            let file = SelectedFile::from_path(&path);
            println!("Selected {} ({})", file.name, file.mime);
            controller.select_files(vec![file]);
        }
        Command::Drop(paths) => {
            let files = paths
                .iter()
                .map(|p| SelectedFile::from_path(p))
                .collect::<Vec<_>>();
            controller.handle_event(UiEvent::DragEnter);
            controller.handle_event(UiEvent::Drop { files });
        }
        Command::Find(text) => {
            let Some(frame) = controller.document().by_id(CONTENT_FRAME_ID) else {
                println!("This page has no content frame");
                return true;
            };
            match highlight_search_text(controller.document_mut(), frame, &text) {
                Ok(()) => println!("Highlighted '{text}'"),
                Err(e) => println!("{e}"),
            }
        }
        Command::Show => {
            if let Some(frame) = controller.document().by_id(CONTENT_FRAME_ID) {
                println!("{}", controller.document().element(frame).text());
            }
            if let Some(preview) = controller.document().by_id(PREVIEW_CONTAINER_ID) {
                let markup = controller.document().element(preview).markup();
                if !markup.is_empty() {
                    println!("[preview] {markup}");
                }
            }
        }
        Command::Help => print_help(),
        Command::Quit => {
            let mut quit = false;
            confirm_action(&TerminalPrompt, "Quit the Gazeta client?", || quit = true);
            return !quit;
        }
        Command::Unknown(word) => println!("Unknown command '{word}', type 'help'"),
    }
    true
}

fn main() -> Result<()> {
    let args = Args::parse();
    panic_handler::initialize_panic_handler();

    settings::load_settings();
    let cfg = settings::current();

    let log_path = args
        .log_file
        .unwrap_or_else(|| PathBuf::from(&cfg.log_file));
    WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create(&log_path)
            .with_context(|| format!("could not create log file {}", log_path.display()))?,
    )?;

    let server = args.server.unwrap_or(cfg.server_url);
    let pages = args.pages.unwrap_or(cfg.page_count);
    let base = Url::parse(&server).context("invalid server URL")?;

    let (events_tx, events_rx) = flume::unbounded();
    let fetcher = HttpFetcher::new(
        events_tx.clone(),
        Duration::from_secs(cfg.fetch_timeout_secs),
    );
    let reader = ThreadFileReader::new(events_tx);

    let doc = build_page_document(&base, pages)?;
    let mut controller =
        PageController::new(doc, Box::new(fetcher), Box::new(reader), &LogTooltipEngine);

    let (commands_tx, commands_rx) = flume::unbounded();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if let Some(command) = parse_command(&line) {
                if commands_tx.send(command).is_err() {
                    break;
                }
            }
        }
    });

    println!("Gazeta client connected to {server} ({pages} pages). Type 'help' for commands.");

    let mut events = ChannelEventSource::new(events_rx);
    loop {
        while events.poll(Duration::from_millis(50))? {
            let event = events.read()?;
            announce(&event);
            controller.handle_event(event);
        }
        match commands_rx.try_recv() {
            Ok(command) => {
                if !apply_command(&mut controller, command) {
                    break;
                }
            }
            Err(flume::TryRecvError::Empty) => {}
            Err(flume::TryRecvError::Disconnected) => break,
        }
    }

    info!("Client exiting");
    Ok(())
}
