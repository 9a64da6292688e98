//! Datasheet pane component
//!
//! Shows where the datasheet link stands for the selected part, the link
//! itself once signed, and the part's descriptive fields.

use super::panel_block;
use crate::theme::Theme;
use crate::tui::app::App;
use crate::viewer::{PdfPane, SessionState};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Notice shown when part, checklist or rules could not be fetched
pub const LOAD_ERROR_TEXT: &str = "could not load part data";

/// Lines for the pane body, top to bottom
pub fn pane_lines(session: &SessionState, spinner: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let muted = Style::default().fg(theme.muted);

    if let Some(error) = session.load_error() {
        lines.push(Line::styled(
            format!("⚠ {LOAD_ERROR_TEXT}"),
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::styled(error.to_string(), muted));
        return lines;
    }

    let pane = session.pdf_pane();
    match &pane {
        PdfPane::Loading => {
            lines.push(Line::styled(
                format!("{spinner} {}", pane.message()),
                Style::default().fg(theme.highlight),
            ));
        }
        PdfPane::Ready(url) => {
            lines.push(Line::styled(
                format!("✓ {}", pane.message()),
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::default());
            lines.push(Line::styled(
                url.to_string(),
                Style::default()
                    .fg(theme.link)
                    .add_modifier(Modifier::UNDERLINED),
            ));
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled("o", Style::default().fg(theme.highlight)),
                Span::styled(" open in viewer   ", muted),
                Span::styled("y", Style::default().fg(theme.highlight)),
                Span::styled(" copy link", muted),
            ]));
        }
        PdfPane::FailedToLoad => {
            lines.push(Line::styled(
                format!("✗ {}", pane.message()),
                Style::default().fg(theme.error),
            ));
            if let Some(error) = session.pdf_error() {
                lines.push(Line::styled(error.to_string(), muted));
            }
        }
        PdfPane::FileNotFound => {
            lines.push(Line::styled(
                pane.message(),
                Style::default().fg(theme.warning),
            ));
        }
        PdfPane::NoSelection if session.is_loading() => {
            lines.push(Line::styled(
                format!("{spinner} Loading part data..."),
                Style::default().fg(theme.highlight),
            ));
        }
        PdfPane::NoSelection => {
            lines.push(Line::styled(pane.message(), muted));
        }
    }

    if let Some(part) = session.part() {
        lines.push(Line::default());
        lines.push(Line::styled(
            "Part details",
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        ));
        if let Some(path) = part.storage_path() {
            lines.push(field_line("file", path, theme));
        }
        for (name, value) in part.descriptive_fields() {
            lines.push(field_line(&name, &value, theme));
        }
    }

    lines
}

fn field_line(name: &str, value: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name}: "), Style::default().fg(theme.muted)),
        Span::styled(value.to_string(), Style::default().fg(theme.foreground)),
    ])
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" 📄 {} ", app.session.title());
    let block = panel_block(title, false, app.theme.panel_datasheet, &app.theme);
    let lines = pane_lines(&app.session, app.spinner(), &app.theme);

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Part;
    use crate::events::ViewerEvent;
    use std::time::Duration;

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn loaded(session: &mut SessionState, part: Part) {
        let token = session.current_token();
        session.apply(ViewerEvent::PartDataLoaded {
            token,
            part,
            rules: vec![],
            elapsed: Duration::ZERO,
        });
    }

    #[test]
    fn nothing_selected_prompts_for_a_part() {
        let session = SessionState::new();
        let lines = text(&pane_lines(&session, "*", &Theme::dark()));
        assert_eq!(lines, vec!["Select a part to view datasheet"]);
    }

    #[test]
    fn ready_shows_link_and_details() {
        let mut session = SessionState::new();
        session.choose_part("LM317");
        let mut part = Part::new("LM317");
        part.file_path = Some("ds/lm317.pdf".into());
        part.extra
            .insert("manufacturer".into(), serde_json::json!("TI"));
        loaded(&mut session, part);

        let lines = text(&pane_lines(&session, "*", &Theme::dark()));
        assert_eq!(lines[0], "* Loading datasheet...");

        session.apply(ViewerEvent::PdfUrlReady {
            token: session.current_token(),
            url: "https://bucket/ds/lm317.pdf?X-Amz-Signature=abc".into(),
            elapsed: Duration::ZERO,
        });
        let lines = text(&pane_lines(&session, "*", &Theme::dark()));
        assert_eq!(lines[0], "✓ Datasheet ready");
        assert!(lines.contains(&"https://bucket/ds/lm317.pdf?X-Amz-Signature=abc".to_string()));
        assert!(lines.contains(&"file: ds/lm317.pdf".to_string()));
        assert!(lines.contains(&"manufacturer: TI".to_string()));
    }

    #[test]
    fn missing_file_path_is_reported() {
        let mut session = SessionState::new();
        session.choose_part("X1");
        loaded(&mut session, Part::new("X1"));
        let lines = text(&pane_lines(&session, "*", &Theme::dark()));
        assert_eq!(lines[0], "Datasheet file not found!");
    }

    #[test]
    fn load_failure_shows_notice() {
        let mut session = SessionState::new();
        session.choose_part("X1");
        assert_eq!(
            text(&pane_lines(&session, "*", &Theme::dark()))[0],
            "* Loading part data..."
        );

        session.apply(ViewerEvent::PartDataFailed {
            token: session.current_token(),
            message: "no row in schematic_checklist for X1".into(),
        });
        let lines = text(&pane_lines(&session, "*", &Theme::dark()));
        assert_eq!(
            lines,
            vec![
                "⚠ could not load part data",
                "no row in schematic_checklist for X1"
            ]
        );
    }
}
