use crate::tui::app::App;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if app.show_help {
        // any key closes the help overlay
        app.show_help = false;
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.prev_tab(),
        KeyCode::Right => app.hover_right(),
        KeyCode::Left => app.hover_left(),
        KeyCode::Home => app.hover = 0,
        KeyCode::Char('l') => app.toggle_log(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.change_bins(1),
        KeyCode::Char('-') => app.change_bins(-1),
        _ => {}
    }
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Down(_) => app.hover_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.hover_right(),
        MouseEventKind::ScrollUp => app.hover_left(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Tab;
    use crossterm::event::KeyModifiers;
    use triplens_common::Config;
    use triplens_core::{build_histogram, hist_hover, HistogramStyle, Plot};

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn keys_drive_app() {
        let table = build_histogram(&[1.0, 2.0, 3.0], 3, false).unwrap();
        let tabs = vec![Tab { plot: Plot::Histogram(hist_hover(table, "d", &HistogramStyle::default())), source: None }];
        let mut app = App::new(tabs, &Config::default());
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.hover, 2);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.hover, 0);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
