// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Interactive inspector panel (ratatui + crossterm).
//!
//! The panel composes the core into one event loop: the local-manifest probe gates
//! initialization, manifest and variant fetches run as spawned tasks delivering results
//! over a channel, and every tick drains those results, repairs the selections against
//! fresh option lists, and polls the debounced write-back.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc, OnceLock};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use regex::Regex;
use serde_json::{json, Value};

use crate::host::{ConnectionState, HostStore};
use crate::manifest::{
    FetchTicket, Manifest, ManifestClient, ManifestError, ManifestResolver, ScreenOption,
    CDN_BASE_DEFAULT, LOCAL_BASE_DEFAULT,
};
use crate::prefs::PrefsStore;
use crate::search::{apply_filtered_edit, filter_lines, rank_matches};
use crate::selection::{
    connected_screen_label, BufferProvenance, PanelLifecycle, SelectionConfig,
    SelectionController, DATA_SOURCE_LOCAL,
};
use crate::snapshot::{snapshot_entries, DEFAULT_MAX_DEPTH};
use crate::sync::{ContextSync, SyncOptions, DEFAULT_DEBOUNCE};

pub const DEFAULT_CONTEXT_KEY: &str = "screen_context";
pub const DEFAULT_BROADCAST_EVENT: &str = "screen-context:updated";

const TITLE_CONNECTED: &str = "Live context data";
const TITLE_PREVIEW: &str = "Mock context data";

const FOCUS_COLOR: Color = Color::LightGreen;
const INVALID_COLOR: Color = Color::Red;
const DISABLED_COLOR: Color = Color::DarkGray;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;

const TICK: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct PanelOptions {
    pub context_key: String,
    pub broadcast_event: String,
    pub prefs_dir: Option<PathBuf>,
    pub local_base: String,
    pub cdn_base: String,
    pub debounce: Duration,
    pub default_screen: Option<String>,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            context_key: DEFAULT_CONTEXT_KEY.to_owned(),
            broadcast_event: DEFAULT_BROADCAST_EVENT.to_owned(),
            prefs_dir: None,
            local_base: LOCAL_BASE_DEFAULT.to_owned(),
            cdn_base: CDN_BASE_DEFAULT.to_owned(),
            debounce: DEFAULT_DEBOUNCE,
            default_screen: None,
        }
    }
}

/// Built-in sample context for `--demo` runs.
pub fn demo_context() -> Value {
    json!({
        "prompt": {"name": "login"},
        "screen": {
            "name": "login",
            "links": {"signup": "/signup", "reset_password": "/reset-password"},
            "texts": {"title": "Welcome", "description": "Log in to continue."}
        },
        "client": {"id": "demo-client", "name": "Demo App"},
        "organization": null,
        "untrusted_data": {"submitted_form_data": null}
    })
}

#[derive(Debug)]
enum FetchOutcome {
    Probe(Option<Manifest>),
    Manifest(FetchTicket, Result<Manifest, ManifestError>),
    Variant { request: u64, result: Result<Value, ManifestError> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Screen,
    Variant,
    DataSource,
    Version,
    Editor,
}

impl Focus {
    fn ring(connected: bool) -> &'static [Focus] {
        if connected {
            // Connected sessions have no preview selectors.
            &[Focus::Screen, Focus::Editor]
        } else {
            &[Focus::Screen, Focus::Variant, Focus::DataSource, Focus::Version, Focus::Editor]
        }
    }

    fn cycle(self, connected: bool, forward: bool) -> Focus {
        let ring = Self::ring(connected);
        let position = ring.iter().position(|focus| *focus == self).unwrap_or(0);
        let next = if forward {
            (position + 1) % ring.len()
        } else {
            (position + ring.len() - 1) % ring.len()
        };
        ring[next]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputMode {
    Normal,
    Search,
    EditLine { buffer: String },
    ScreenPicker { query: String, selected: usize },
}

struct App {
    connection: ConnectionState,
    sync: ContextSync,
    resolver: ManifestResolver,
    controller: SelectionController,
    client: ManifestClient,
    runtime: tokio::runtime::Handle,
    outcome_tx: mpsc::Sender<FetchOutcome>,
    outcome_rx: mpsc::Receiver<FetchOutcome>,
    updates: tokio::sync::broadcast::Receiver<crate::host::ContextUpdate>,
    probe_started: bool,
    last_manifest_fetch: Option<(String, String, u64)>,
    last_variant_fetch: Option<(String, String, u64)>,
    variant_request_seq: u64,
    search: String,
    input_mode: InputMode,
    focus: Focus,
    editor_cursor: usize,
    show_snapshot: bool,
    toast: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(
        options: PanelOptions,
        store: Arc<dyn HostStore>,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        let connection = ConnectionState::capture(store.as_ref(), &options.context_key);
        let prefs = match &options.prefs_dir {
            Some(dir) => PrefsStore::open(dir),
            None => PrefsStore::in_memory(),
        };
        let mut controller = SelectionController::new(
            SelectionConfig {
                default_screen: options.default_screen.clone(),
                ..SelectionConfig::default()
            },
            prefs,
        );
        if connection.is_connected() {
            controller.mark_from_root();
        }

        let sync = ContextSync::new(
            store.clone(),
            options.context_key.clone(),
            SyncOptions {
                active: true,
                debounce: options.debounce,
                auto_sync_on_active: true,
                apply_enabled: true,
                broadcast_event: Some(options.broadcast_event.clone()),
            },
        );

        let client = ManifestClient::with_bases(&options.local_base, &options.cdn_base);
        let (outcome_tx, outcome_rx) = mpsc::channel();
        let updates = store.updates();

        Self {
            connection,
            sync,
            resolver: ManifestResolver::new(),
            controller,
            client,
            runtime,
            outcome_tx,
            outcome_rx,
            updates,
            probe_started: false,
            last_manifest_fetch: None,
            last_variant_fetch: None,
            variant_request_seq: 0,
            search: String::new(),
            input_mode: InputMode::Normal,
            focus: Focus::Editor,
            editor_cursor: 0,
            show_snapshot: false,
            toast: None,
            should_quit: false,
        }
    }

    fn tick(&mut self, now: Instant) {
        self.drain_host_updates();
        self.drain_fetch_outcomes(now);
        self.drive_fetches();
        self.sync.poll(now);
        self.clamp_editor_cursor();
    }

    fn drain_host_updates(&mut self) {
        use tokio::sync::broadcast::error::TryRecvError;
        loop {
            match self.updates.try_recv() {
                Ok(update) => {
                    if update.key == self.sync.key() {
                        // The echo guard inside the sync makes our own announcements no-ops.
                        self.sync.handle_source_changed();
                    }
                }
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    fn drain_fetch_outcomes(&mut self, now: Instant) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            match outcome {
                FetchOutcome::Probe(probe) => {
                    self.controller.apply_local_probe(self.connection.is_connected(), probe);
                }
                FetchOutcome::Manifest(ticket, result) => {
                    if self.resolver.complete(ticket, result) {
                        self.reconcile_options();
                    }
                }
                FetchOutcome::Variant { request, result } => {
                    if request != self.variant_request_seq {
                        continue;
                    }
                    if self.controller.provenance() == BufferProvenance::UserEdited {
                        continue;
                    }
                    // Failures mean "no preview for this selection"; the buffer is kept.
                    if let Ok(value) = result {
                        if let Ok(text) = serde_json::to_string_pretty(&value) {
                            self.sync.set_raw(text, now);
                            self.editor_cursor = 0;
                        }
                    }
                }
            }
        }
    }

    fn drive_fetches(&mut self) {
        if !self.probe_started {
            self.probe_started = true;
            let client = self.client.clone();
            self.spawn(async move {
                FetchOutcome::Probe(client.fetch_manifest(DATA_SOURCE_LOCAL).await.ok())
            });
        }

        let preview_open = self.controller.lifecycle() == PanelLifecycle::Open
            && !self.connection.is_connected();
        if !preview_open {
            return;
        }

        let manifest_key = (
            self.controller.data_source().to_owned(),
            self.controller.version().to_owned(),
            self.controller.refetch_generation(),
        );
        if self.last_manifest_fetch.as_ref() != Some(&manifest_key) {
            self.last_manifest_fetch = Some(manifest_key);
            let ticket = self.resolver.begin();
            let client = self.client.clone();
            let data_source = self.controller.data_source().to_owned();
            self.spawn(async move {
                FetchOutcome::Manifest(ticket, client.fetch_manifest(&data_source).await)
            });
        }

        if !self.resolver.has_loaded()
            || self.controller.provenance() == BufferProvenance::UserEdited
        {
            return;
        }
        let Some(screen) = self.controller.screen().map(str::to_owned) else {
            return;
        };
        let Some(info) = self.resolver.variant_info(&screen) else {
            return;
        };
        let variant_key = (
            screen.clone(),
            self.controller.variant().to_owned(),
            self.controller.refetch_generation(),
        );
        if self.last_variant_fetch.as_ref() != Some(&variant_key) {
            self.last_variant_fetch = Some(variant_key);
            self.variant_request_seq += 1;
            let request = self.variant_request_seq;
            let client = self.client.clone();
            let data_source = self.controller.data_source().to_owned();
            let variant = self.controller.variant().to_owned();
            self.spawn(async move {
                let result = client.fetch_variant(&data_source, &info, &variant).await;
                FetchOutcome::Variant { request, result }
            });
        }
    }

    fn spawn(&self, future: impl std::future::Future<Output = FetchOutcome> + Send + 'static) {
        let tx = self.outcome_tx.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(future.await);
        });
    }

    fn reconcile_options(&mut self) {
        let screen_options = self.resolver.screen_options();
        self.controller.repair_screen(&screen_options);
        self.controller.repair_variant(self.resolver.manifest());
        self.controller.repair_data_source();
        self.controller.repair_version(self.resolver.manifest());
    }

    fn displayed_lines(&self) -> Vec<String> {
        let view = filter_lines(self.sync.raw(), &self.search);
        view.display.split('\n').map(str::to_owned).collect()
    }

    fn clamp_editor_cursor(&mut self) {
        let count = self.displayed_lines().len();
        if count == 0 {
            self.editor_cursor = 0;
        } else if self.editor_cursor >= count {
            self.editor_cursor = count - 1;
        }
    }

    fn panel_title(&self) -> &'static str {
        if self.connection.is_connected() { TITLE_CONNECTED } else { TITLE_PREVIEW }
    }

    /// Display value of the screen selector. Connected sessions derive it from the live
    /// context when possible; that derivation is never persisted.
    fn screen_display(&self) -> String {
        if self.connection.is_connected() {
            if let Some(label) = self.sync.current_value().as_ref().and_then(connected_screen_label)
            {
                return label;
            }
        }
        self.controller.screen().unwrap_or("—").to_owned()
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(message.into());
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        self.toast = None;
        match std::mem::replace(&mut self.input_mode, InputMode::Normal) {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Search => self.handle_search_key(key),
            InputMode::EditLine { buffer } => self.handle_edit_key(key, buffer, now),
            InputMode::ScreenPicker { query, selected } => {
                self.handle_picker_key(key, query, selected)
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        if self.controller.lifecycle() == PanelLifecycle::Closed {
            match key.code {
                KeyCode::Char('o') => {
                    self.controller.set_open(true);
                    self.sync.set_active(true);
                }
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                self.controller.set_open(false);
                self.sync.set_active(false);
            }
            KeyCode::Tab => {
                self.focus = self.focus.cycle(self.connection.is_connected(), true);
            }
            KeyCode::BackTab => {
                self.focus = self.focus.cycle(self.connection.is_connected(), false);
            }
            KeyCode::Char('/') => self.input_mode = InputMode::Search,
            KeyCode::Char('p') if !self.connection.is_connected() => {
                self.input_mode = InputMode::ScreenPicker { query: String::new(), selected: 0 };
            }
            KeyCode::Char('s') => self.show_snapshot = !self.show_snapshot,
            KeyCode::Char('c') => self.copy_buffer(),
            KeyCode::Char('w') => self.save_buffer(),
            KeyCode::Up => self.move_selection(false),
            KeyCode::Down => self.move_selection(true),
            KeyCode::Enter if self.focus == Focus::Editor => {
                let lines = self.displayed_lines();
                let buffer = lines.get(self.editor_cursor).cloned().unwrap_or_default();
                self.input_mode = InputMode::EditLine { buffer };
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.search.clear();
                self.editor_cursor = 0;
            }
            KeyCode::Enter => {}
            KeyCode::Backspace => {
                self.search.pop();
                self.editor_cursor = 0;
                self.input_mode = InputMode::Search;
            }
            KeyCode::Char(ch) => {
                self.search.push(ch);
                self.editor_cursor = 0;
                self.input_mode = InputMode::Search;
            }
            _ => self.input_mode = InputMode::Search,
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent, mut buffer: String, now: Instant) {
        match key.code {
            KeyCode::Esc => {}
            KeyCode::Enter => self.commit_line_edit(buffer, now),
            KeyCode::Backspace => {
                buffer.pop();
                self.input_mode = InputMode::EditLine { buffer };
            }
            KeyCode::Char(ch) => {
                buffer.push(ch);
                self.input_mode = InputMode::EditLine { buffer };
            }
            _ => self.input_mode = InputMode::EditLine { buffer },
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent, mut query: String, mut selected: usize) {
        let options = self.resolver.screen_options();
        let ranked = rank_matches(&query, &options, |option: &ScreenOption| option.label.as_str());
        match key.code {
            KeyCode::Esc => {}
            KeyCode::Enter => {
                if let Some(&index) = ranked.get(selected) {
                    let value = options[index].value.clone();
                    self.controller.set_screen(value);
                }
            }
            KeyCode::Up => {
                selected = selected.saturating_sub(1);
                self.input_mode = InputMode::ScreenPicker { query, selected };
            }
            KeyCode::Down => {
                if selected + 1 < ranked.len() {
                    selected += 1;
                }
                self.input_mode = InputMode::ScreenPicker { query, selected };
            }
            KeyCode::Backspace => {
                query.pop();
                self.input_mode = InputMode::ScreenPicker { query, selected: 0 };
            }
            KeyCode::Char(ch) => {
                query.push(ch);
                self.input_mode = InputMode::ScreenPicker { query, selected: 0 };
            }
            _ => self.input_mode = InputMode::ScreenPicker { query, selected },
        }
    }

    fn move_selection(&mut self, forward: bool) {
        match self.focus {
            Focus::Editor => {
                if forward {
                    self.editor_cursor = self.editor_cursor.saturating_add(1);
                } else {
                    self.editor_cursor = self.editor_cursor.saturating_sub(1);
                }
                self.clamp_editor_cursor();
            }
            Focus::Screen if !self.connection.is_connected() => {
                let options: Vec<String> = self
                    .resolver
                    .screen_options()
                    .into_iter()
                    .map(|option| option.value)
                    .collect();
                if let Some(next) = next_option(&options, self.controller.screen(), forward) {
                    self.controller.set_screen(next);
                }
            }
            Focus::Variant => {
                let options = self.controller.variant_options(self.resolver.manifest());
                if let Some(next) = next_option(&options, Some(self.controller.variant()), forward)
                {
                    self.controller.set_variant(next);
                }
            }
            Focus::DataSource => {
                let mut options = self.controller.data_source_options();
                if self.controller.local_probe_failed() {
                    options.retain(|source| !source.to_lowercase().contains("local"));
                }
                if let Some(next) =
                    next_option(&options, Some(self.controller.data_source()), forward)
                {
                    self.controller.set_data_source(next);
                }
            }
            Focus::Version => {
                let options: Vec<String> = self
                    .controller
                    .version_options(self.resolver.manifest())
                    .into_iter()
                    .map(|option| option.value)
                    .collect();
                if let Some(next) = next_option(&options, Some(self.controller.version()), forward)
                {
                    self.controller.set_version(next);
                }
            }
            Focus::Screen => {}
        }
    }

    fn commit_line_edit(&mut self, buffer: String, now: Instant) {
        let view = filter_lines(self.sync.raw(), &self.search);
        let mut lines: Vec<String> = view.display.split('\n').map(str::to_owned).collect();
        if self.editor_cursor >= lines.len() {
            return;
        }
        lines[self.editor_cursor] = buffer;
        let edited = lines.join("\n");
        let merged = apply_filtered_edit(&edited, self.sync.raw(), view.line_indices.as_deref());
        self.controller.mark_user_edited();
        self.sync.set_raw(merged, now);
    }

    fn copy_buffer(&mut self) {
        if copy_to_clipboard(self.sync.raw()).is_ok() {
            self.set_toast("Copied context to clipboard");
        }
    }

    fn save_buffer(&mut self) {
        let file_name = download_file_name(self.controller.screen());
        if fs::write(&file_name, self.sync.raw()).is_ok() {
            self.set_toast(format!("Wrote {file_name}"));
        }
    }
}

fn next_option(options: &[String], current: Option<&str>, forward: bool) -> Option<String> {
    if options.len() <= 1 {
        // Pickers with a single option render disabled.
        return None;
    }
    let position = current
        .and_then(|current| options.iter().position(|option| option == current))
        .unwrap_or(0);
    let next = if forward {
        (position + 1) % options.len()
    } else {
        (position + options.len() - 1) % options.len()
    };
    Some(options[next].clone())
}

fn sanitize_screen_slug(screen: &str) -> String {
    static NON_SLUG: OnceLock<Regex> = OnceLock::new();
    let non_slug =
        NON_SLUG.get_or_init(|| Regex::new("[^a-z0-9-]+").expect("slug pattern compiles"));

    let lowered = screen.replace(':', "-").to_lowercase();
    let replaced = non_slug.replace_all(&lowered, "-");
    let trimmed = replaced.trim_matches('-');
    if trimmed.is_empty() { "context".to_owned() } else { trimmed.to_owned() }
}

fn download_file_name(screen: Option<&str>) -> String {
    format!("{}-context.json", sanitize_screen_slug(screen.unwrap_or("screen")))
}

fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())
}

fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

/// Runs the panel event loop against the given host store until the user quits.
///
/// Fetch tasks are spawned onto `runtime`; call this from `spawn_blocking` so the runtime
/// stays free to drive them.
pub fn run(
    options: PanelOptions,
    store: Arc<dyn HostStore>,
    runtime: tokio::runtime::Handle,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(options, store, runtime);

    while !app.should_quit {
        app.tick(Instant::now());
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                _ => {}
            }
        }
    }

    Ok(())
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    match app.controller.lifecycle() {
        PanelLifecycle::Closed => {
            let hint = Paragraph::new("context inspector closed — press o to open, q to quit")
                .style(Style::default().fg(DISABLED_COLOR));
            frame.render_widget(hint, frame.size());
            return;
        }
        PanelLifecycle::Initializing => {
            // Nothing data-source-dependent renders before the probe settles.
            let hint = Paragraph::new("initializing…").style(Style::default().fg(DISABLED_COLOR));
            frame.render_widget(hint, frame.size());
            return;
        }
        PanelLifecycle::Open => {}
    }

    let selector_rows = if app.connection.is_connected() { 1 } else { 4 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(selector_rows),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.size());

    draw_header(frame, app, chunks[0]);
    draw_selectors(frame, app, chunks[1]);
    draw_manifest_status(frame, app, chunks[2]);
    draw_editor(frame, app, chunks[3]);
    draw_footer(frame, app, chunks[4]);

    if app.show_snapshot {
        draw_snapshot_overlay(frame, app);
    }
    if let InputMode::ScreenPicker { query, selected } = app.input_mode.clone() {
        draw_picker_overlay(frame, app, &query, selected);
    }
}

fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let (marker, status, color) = if app.connection.is_connected() {
        ("●", "Connected to host", Color::LightGreen)
    } else {
        ("○", "Not connected to host", Color::Yellow)
    };
    let lines = vec![
        Line::from(Span::styled(app.panel_title(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled(marker, Style::default().fg(color)),
            Span::raw(" "),
            Span::styled(status, Style::default().fg(color)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn selector_line<'a>(
    label: &'a str,
    value: String,
    focused: bool,
    disabled: bool,
) -> Line<'a> {
    let value_style = if disabled {
        Style::default().fg(DISABLED_COLOR)
    } else if focused {
        Style::default().fg(FOCUS_COLOR)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{label:<12}"), Style::default().fg(FOOTER_LABEL_COLOR)),
        Span::styled(value, value_style),
    ])
}

fn draw_selectors(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let mut lines = Vec::new();

    let screen_options = app.resolver.screen_options();
    lines.push(selector_line(
        "Screen",
        app.screen_display(),
        app.focus == Focus::Screen,
        app.connection.is_connected() || screen_options.len() <= 1,
    ));

    if !app.connection.is_connected() {
        let variant_options = app.controller.variant_options(app.resolver.manifest());
        lines.push(selector_line(
            "Variant",
            app.controller.variant().to_owned(),
            app.focus == Focus::Variant,
            variant_options.len() <= 1,
        ));

        let data_source_options = app.controller.data_source_options();
        let data_source_value = if app.controller.local_probe_failed() {
            format!("{} (local unavailable)", app.controller.data_source())
        } else {
            app.controller.data_source().to_owned()
        };
        lines.push(selector_line(
            "Data source",
            data_source_value,
            app.focus == Focus::DataSource,
            data_source_options.len() <= 1 || app.controller.local_probe_failed(),
        ));

        let version_options = app.controller.version_options(app.resolver.manifest());
        let version_label = version_options
            .iter()
            .find(|option| option.value == app.controller.version())
            .map(|option| option.label.clone())
            .unwrap_or_else(|| app.controller.version().to_owned());
        lines.push(selector_line(
            "Version",
            version_label,
            app.focus == Focus::Version,
            version_options.len() <= 1,
        ));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_manifest_status(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let line = if app.resolver.loading() {
        Line::from(Span::styled("Loading manifest…", Style::default().fg(DISABLED_COLOR)))
    } else if let Some(error) = app.resolver.error() {
        Line::from(Span::styled(error.to_owned(), Style::default().fg(INVALID_COLOR)))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_editor(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let border_color = if !app.sync.is_valid() {
        INVALID_COLOR
    } else if app.focus == Focus::Editor {
        FOCUS_COLOR
    } else {
        DISABLED_COLOR
    };

    let lines = app.displayed_lines();
    let total_lines = app.sync.raw().split('\n').count();
    let title = if app.search.is_empty() {
        "context json".to_owned()
    } else {
        format!("filter \"{}\" ({}/{} lines)", app.search, lines.len(), total_lines)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let height = inner.height as usize;
    let start = app.editor_cursor.saturating_sub(height.saturating_sub(1));
    let text: Vec<Line<'_>> = lines
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(index, line)| {
            let mut content = line.clone();
            if index == app.editor_cursor {
                if let InputMode::EditLine { buffer } = &app.input_mode {
                    content = format!("{buffer}▏");
                }
            }
            let style = if index == app.editor_cursor && app.focus == Focus::Editor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(content, style))
        })
        .collect();
    frame.render_widget(Paragraph::new(text), inner);
}

fn draw_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    if let Some(toast) = &app.toast {
        let line = Line::from(Span::styled(toast.clone(), Style::default().fg(Color::White)));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let hint_pairs: &[(&str, &str)] = if matches!(app.input_mode, InputMode::Search) {
        &[("esc", "clear filter"), ("enter", "keep filter")]
    } else if matches!(app.input_mode, InputMode::EditLine { .. }) {
        &[("enter", "apply line"), ("esc", "cancel")]
    } else {
        &[
            ("tab", "focus"),
            ("↑↓", "select"),
            ("enter", "edit line"),
            ("/", "filter"),
            ("p", "screens"),
            ("s", "summary"),
            ("c", "copy"),
            ("w", "write file"),
            ("esc", "close"),
            ("q", "quit"),
        ]
    };

    let mut spans = Vec::new();
    for (key, label) in hint_pairs {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(FOOTER_KEY_COLOR)));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(*label, Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn overlay_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let width = area.width * width_percent / 100;
    let height = area.height * height_percent / 100;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn draw_snapshot_overlay(frame: &mut Frame<'_>, app: &App) {
    let area = overlay_rect(frame.size(), 80, 70);
    frame.render_widget(Clear, area);

    let entries = app
        .sync
        .current_value()
        .map(|value| snapshot_entries(&value, DEFAULT_MAX_DEPTH))
        .unwrap_or_default();
    let items: Vec<ListItem<'_>> = if entries.is_empty() {
        vec![ListItem::new("no context value")]
    } else {
        entries
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(entry.path.clone(), Style::default().fg(FOCUS_COLOR)),
                    Span::raw(" "),
                    Span::styled(
                        format!("({})", entry.kind),
                        Style::default().fg(FOOTER_LABEL_COLOR),
                    ),
                    Span::raw(" "),
                    Span::raw(entry.preview.clone()),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("context summary (s to close)"));
    frame.render_widget(list, area);
}

fn draw_picker_overlay(frame: &mut Frame<'_>, app: &App, query: &str, selected: usize) {
    let area = overlay_rect(frame.size(), 60, 60);
    frame.render_widget(Clear, area);

    let options = app.resolver.screen_options();
    let ranked = rank_matches(query, &options, |option: &ScreenOption| option.label.as_str());

    let mut items: Vec<ListItem<'_>> = vec![ListItem::new(Line::from(vec![
        Span::styled("search: ", Style::default().fg(FOOTER_LABEL_COLOR)),
        Span::raw(format!("{query}▏")),
    ]))];
    for &index in &ranked {
        items.push(ListItem::new(options[index].label.clone()));
    }

    let mut state = ListState::default();
    // Offset by one for the search row.
    state.select(Some(selected.saturating_add(1)));

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("screens"))
        .highlight_style(Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, area, &mut state);
}
