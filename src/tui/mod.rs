// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard and mouse input, timer ticks)
// - Rendering the UI
// - Applying loader results to the viewer session

pub mod app;
pub mod components;
pub mod input;
pub mod layout;
pub mod scroll;
pub mod traits;
pub mod ui;

use crate::config::Config;
use crate::events::ViewerEvent;
use crate::logging::LogBuffer;
use crate::viewer::split::NUDGE_STEP;
use crate::viewer::DataLoader;
use anyhow::{Context, Result};
use app::{App, Focus};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;
use traits::Handled;

/// Run the TUI
///
/// Sets up the terminal, requests the part list, runs the event loop and
/// restores the terminal when done.
pub async fn run_tui(
    mut event_rx: mpsc::Receiver<ViewerEvent>,
    log_buffer: LogBuffer,
    config: Config,
    loader: DataLoader,
    backend: &'static str,
) -> Result<()> {
    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend).context("Failed to create terminal")?;

    loader.spawn_list_parts();
    let mut app = App::new(loader, log_buffer, &config, backend);

    // Run the event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut event_rx).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on terminal input, the redraw ticker and loader results with
/// tokio::select!, responding to whichever completes first.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::Receiver<ViewerEvent>,
) -> Result<()> {
    // Spinner and toast expiry
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard or mouse input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => handle_key_event(app, key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            _ = tick_interval.tick() => {
                app.tick();
            }

            Some(viewer_event) = event_rx.recv() => {
                app.apply_event(viewer_event);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Help overlay → Global → Focused panel
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    match key_event.kind {
        KeyEventKind::Release => {
            app.handle_key_release(key_event.code);
            return;
        }
        KeyEventKind::Press => {}
        _ => return,
    }

    // Layer 1: help overlay swallows the next key
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Layer 2: global keys
    if handle_global_keys(app, &key_event) {
        return;
    }

    // Layer 3: focused panel
    if app.focus == Focus::Search {
        handle_search_keys(app, &key_event);
        return;
    }

    let key = key_event.code;
    if !app.handle_key_press(key) {
        return;
    }
    if app.dispatch_to_focused(key_event) == Handled::Yes {
        return;
    }
    match key {
        KeyCode::Enter | KeyCode::Char(' ') => app.activate_focused(),
        KeyCode::Esc => app.set_focus(Focus::Search),
        _ => {}
    }
}

/// Handle global keys - returns true if handled
///
/// Letter shortcuts only apply outside the search box, where letters are text.
fn handle_global_keys(app: &mut App, key_event: &KeyEvent) -> bool {
    let key = key_event.code;

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
        app.should_quit = true;
        return true;
    }

    match key {
        KeyCode::Tab => {
            if app.handle_key_press(key) {
                app.focus_next();
            }
            return true;
        }
        KeyCode::BackTab => {
            if app.handle_key_press(key) {
                app.focus_prev();
            }
            return true;
        }
        KeyCode::F(1) => {
            if app.handle_key_press(key) {
                app.show_help = true;
            }
            return true;
        }
        _ => {}
    }

    if app.focus == Focus::Search {
        return false;
    }

    let KeyCode::Char(c) = key else {
        return false;
    };
    if !matches!(c, 'q' | 'Q' | '?' | 'L' | '[' | ']' | '=' | 'o' | 'y' | '/' | 'c') {
        return false;
    }
    if !app.handle_key_press(key) {
        return true;
    }

    match c {
        'q' | 'Q' => app.should_quit = true,
        '?' => app.show_help = true,
        'L' => app.toggle_logs(),
        '[' => app.session.nudge_split(-NUDGE_STEP),
        ']' => app.session.nudge_split(NUDGE_STEP),
        '=' => app.session.reset_split(),
        'o' => app.open_datasheet(),
        'y' if app.focus == Focus::Logs => app.copy_log_entry(),
        'y' => app.copy_datasheet_url(),
        '/' => app.set_focus(Focus::Search),
        'c' => app.session.toggle_rules_panel(),
        _ => {}
    }
    true
}

/// Keys while the search box has focus
fn handle_search_keys(app: &mut App, key_event: &KeyEvent) {
    let key = key_event.code;

    // Typed text bypasses the debounce so "LM338" keeps both 3s
    if let KeyCode::Char(c) = key {
        if !key_event.modifiers.contains(KeyModifiers::CONTROL) {
            app.edit_search(|input| input.insert_char(c));
        }
        return;
    }

    if !app.handle_key_press(key) {
        return;
    }
    match key {
        KeyCode::Backspace => app.edit_search(|input| input.delete_char_before()),
        KeyCode::Delete => app.edit_search(|input| input.delete_char_at()),
        KeyCode::Left => app.edit_search(|input| input.move_left()),
        KeyCode::Right => app.edit_search(|input| input.move_right()),
        KeyCode::Home => app.edit_search(|input| input.move_start()),
        KeyCode::End => app.edit_search(|input| input.move_end()),
        KeyCode::Down => app.session.highlight_next(),
        KeyCode::Up => app.session.highlight_prev(),
        KeyCode::Enter => app.select_suggestion(),
        KeyCode::Esc => {
            if app.session.suggestions_visible() {
                app.session.dismiss_search();
            } else {
                app.set_focus(Focus::Parts);
            }
        }
        _ => {}
    }
}

/// Handle mouse input
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.mouse_down(mouse_event.column, mouse_event.row);
        }
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            app.mouse_drag(mouse_event.column);
        }
        MouseEventKind::Up(MouseButton::Left) => app.mouse_up(),
        MouseEventKind::ScrollUp => {
            // Synthesize Up key event for trait dispatch
            let key_event = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
            app.dispatch_to_focused(key_event);
        }
        MouseEventKind::ScrollDown => {
            let key_event = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
            app.dispatch_to_focused(key_event);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::memory::MemoryCatalog;
    use crate::catalog::{Part, PartRepository, PartSummary};
    use crate::presign::SignedUrlProvider;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct EchoUrls;

    #[async_trait]
    impl SignedUrlProvider for EchoUrls {
        async fn signed_url(&self, file_path: &str) -> anyhow::Result<String> {
            Ok(format!("https://signed/{file_path}"))
        }
    }

    fn app() -> App {
        let repo: Arc<dyn PartRepository> = Arc::new(
            MemoryCatalog::new()
                .with_part(Part::new("LM317"), "c1", vec![])
                .with_part(Part::new("LM338"), "c2", vec![]),
        );
        let (tx, _rx) = mpsc::channel(16);
        let loader = DataLoader::new(repo, Arc::new(EchoUrls), tx);
        let mut app = App::new(loader, LogBuffer::new(), &Config::default(), "memory");
        app.apply_event(ViewerEvent::PartsListed {
            parts: vec![PartSummary::new("LM317"), PartSummary::new("LM338")],
        });
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn release(app: &mut App, code: KeyCode) {
        let mut event = KeyEvent::new(code, KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        handle_key_event(app, event);
    }

    #[tokio::test]
    async fn repeated_letters_reach_the_search_box() {
        let mut app = app();
        for c in "LM338".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.search_input.text, "LM338");
        assert_eq!(app.session.search().text(), "LM338");
    }

    #[tokio::test]
    async fn letters_in_search_are_not_shortcuts() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.search_input.text, "q");
    }

    #[tokio::test]
    async fn q_quits_outside_search() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Parts);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn ctrl_c_quits_from_search() {
        let mut app = app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
        assert_eq!(app.search_input.text, "");
    }

    #[tokio::test]
    async fn escape_closes_suggestions_then_leaves_search() {
        let mut app = app();
        app.edit_search(|input| input.set("LM"));
        assert!(app.session.suggestions_visible());

        press(&mut app, KeyCode::Esc);
        assert!(!app.session.suggestions_visible());
        assert_eq!(app.focus, Focus::Search);

        release(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::Parts);
    }

    #[tokio::test]
    async fn bracket_keys_move_divider() {
        let mut app = app();
        app.set_focus(Focus::Parts);
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.session.split_ratio(), 45.0);
        release(&mut app, KeyCode::Char('['));
        press(&mut app, KeyCode::Char('='));
        assert_eq!(app.session.split_ratio(), 50.0);
    }

    #[tokio::test]
    async fn help_overlay_swallows_next_key() {
        let mut app = app();
        app.set_focus(Focus::Parts);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn arrow_keys_highlight_suggestions() {
        let mut app = app();
        app.edit_search(|input| input.set("LM3"));
        press(&mut app, KeyCode::Down);
        release(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.session.search().highlighted(), Some(1));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.selected_part_id(), Some("LM338"));
        assert_eq!(app.search_input.text, "");
    }
}
