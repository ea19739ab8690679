use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use tokengate_core::finance::{ListState as LoadState, TransactionField};
use tokengate_core::utils::{format_amount, format_date, mask, truncate};
use tokengate_core::Route;

use crate::app::{App, AppState, GateStatus, LoginFocus};

use super::styles;

/// Width of the text inside login fields
const FIELD_WIDTH: usize = 16;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    match app.current_route() {
        Route::Login => render_login(frame, app, chunks[1]),
        Route::Protected => render_protected(frame, app, chunks[1]),
        Route::Transactions => render_transactions(frame, app, chunks[1]),
    }
    render_status_bar(frame, app, chunks[2]);

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let route = app.current_route();
    let title = format!("  tokengate  {}", route.title());
    let path = route.path();
    let help_hint = "[F1] Help";

    let padding = (area.width as usize)
        .saturating_sub(title.len() + path.len() + help_hint.len() + 6);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw("  "),
        Span::styled(path, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.current_route() {
        Route::Login => "Tab: next field  Enter: submit  F2: transactions  Esc: quit",
        Route::Protected => "t: transactions  l: log out  Esc: back  q: quit",
        Route::Transactions => "Tab: next field  Enter: add  ↑↓: select  F5: reload  Esc: back",
    };

    let mut spans = vec![Span::styled(format!(" {}", hints), styles::muted_style())];
    if let Some(ref message) = app.status_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(message.clone(), styles::title_style()));
    }

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(styles::muted_style());
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

// ============================================================================
// Login
// ============================================================================

fn input_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("      "),
        Span::styled(label, styles::muted_style()),
        Span::styled(" [", styles::muted_style()),
        Span::styled(
            format!("{:<width$}{}", value, cursor, width = FIELD_WIDTH),
            styles::field_style(focused),
        ),
        Span::styled("]", styles::muted_style()),
    ])
}

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.login;
    let height = if form.error().is_some() { 11 } else { 9 };
    let dialog = centered_rect_fixed(46, height, area);
    frame.render_widget(Clear, dialog);

    let mut lines = vec![Line::from("")];

    lines.push(input_line(
        "Username:",
        truncate(&form.username, FIELD_WIDTH),
        app.login_focus == LoginFocus::Username,
    ));
    lines.push(input_line(
        "Password:",
        mask(&form.password, FIELD_WIDTH),
        app.login_focus == LoginFocus::Password,
    ));
    lines.push(Line::from(""));

    let button_focused = app.login_focus == LoginFocus::Button;
    let label = form.button_label();
    let button_text = if button_focused {
        format!(" ▶ {:^12} ◀ ", label)
    } else {
        format!("   {:^12}   ", label)
    };
    let button_style = if form.is_loading() {
        styles::muted_style()
    } else {
        styles::field_style(button_focused)
    };
    lines.push(Line::from(vec![
        Span::raw("         ["),
        Span::styled(button_text, button_style),
        Span::raw("]"),
    ]));

    if let Some(error) = form.error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::title_style())
        .title(Span::styled(" Login ", styles::title_style()));

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}

// ============================================================================
// Protected
// ============================================================================

fn render_protected(frame: &mut Frame, app: &App, area: Rect) {
    let dialog = centered_rect_fixed(46, 7, area);

    let body = match app.gate_status {
        GateStatus::Checking => Line::from(Span::styled(
            " Verifying session...",
            styles::muted_style(),
        )),
        GateStatus::Passed => Line::from(Span::styled(
            " Token verified. You are signed in.",
            styles::success_style(),
        )),
    };

    let lines = vec![Line::from(""), body, Line::from("")];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::title_style())
        .title(Span::styled(" Protected Page ", styles::title_style()));

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}

// ============================================================================
// Transactions
// ============================================================================

fn render_transactions(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(3)])
        .split(area);

    render_transaction_form(frame, app, chunks[0]);
    render_transaction_list(frame, app, chunks[1]);
}

fn render_transaction_form(frame: &mut Frame, app: &App, area: Rect) {
    let view = &app.transactions;
    let form = &view.form;

    let text_field = |field: TransactionField, value: &str| {
        let focused = app.transaction_field_focused(field);
        let cursor = if focused { "▌" } else { "" };
        Line::from(vec![
            Span::styled(format!(" {:<12}", field.label()), styles::muted_style()),
            Span::styled(format!("{}{}", value, cursor), styles::field_style(focused)),
        ])
    };

    let checkbox = if form.is_income { "[x]" } else { "[ ]" };
    let mut lines = vec![
        text_field(TransactionField::Amount, &form.amount),
        text_field(TransactionField::Description, &form.description),
        text_field(TransactionField::IsIncome, checkbox),
        text_field(TransactionField::Date, &form.date),
    ];

    if view.is_submitting() {
        lines.push(Line::from(Span::styled(" Saving...", styles::muted_style())));
    } else if let Some(error) = view.form_error() {
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::muted_style())
        .title(Span::styled(" New transaction ", styles::title_style()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_transaction_list(frame: &mut Frame, app: &App, area: Rect) {
    let view = &app.transactions;

    let title = match &view.state {
        LoadState::Loaded(list) => format!(
            " Transactions ({})  balance {} ",
            list.len(),
            format_amount(view.balance(), view.balance() >= 0.0)
        ),
        _ => " Transactions ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::muted_style())
        .title(Span::styled(title, styles::title_style()));

    match &view.state {
        LoadState::Loading => {
            let p = Paragraph::new(Span::styled(" Loading...", styles::muted_style())).block(block);
            frame.render_widget(p, area);
        }
        LoadState::Failed(message) => {
            let p = Paragraph::new(Span::styled(format!(" Error: {}", message), styles::error_style()))
                .block(block);
            frame.render_widget(p, area);
        }
        LoadState::Loaded(list) if list.is_empty() => {
            let p = Paragraph::new(Span::styled(" No transactions yet", styles::muted_style()))
                .block(block);
            frame.render_widget(p, area);
        }
        LoadState::Loaded(list) => {
            let description_width = (area.width as usize).saturating_sub(34).max(8);
            let items: Vec<ListItem> = list
                .iter()
                .map(|tx| {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!(" {:<14}", format_date(&tx.date)), styles::muted_style()),
                        Span::styled(
                            format!("{:<width$}", truncate(&tx.description, description_width), width = description_width),
                            styles::list_item_style(),
                        ),
                        Span::styled(
                            format!("{:>14}", format_amount(tx.amount, tx.is_income)),
                            styles::amount_style(tx.is_income),
                        ),
                    ]))
                })
                .collect();

            let list_widget = List::new(items)
                .block(block)
                .highlight_style(styles::selected_style());
            let mut state = ListState::default().with_selected(Some(view.selection));
            frame.render_stateful_widget(list_widget, area, &mut state);
        }
    }
}

// ============================================================================
// Overlays
// ============================================================================

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 14, frame.area());
    frame.render_widget(Clear, area);

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", k), styles::title_style()),
            Span::styled(desc, styles::list_item_style()),
        ])
    };

    let lines = vec![
        Line::from(""),
        key("Tab / ↓", "Next field"),
        key("Shift+Tab / ↑", "Previous field"),
        key("Enter", "Submit form"),
        key("Space", "Toggle income (transactions)"),
        key("F2", "Open transactions"),
        key("F5", "Reload transactions"),
        key("t / l", "Transactions / log out (protected)"),
        key("Esc", "Back, or quit on the login page"),
        key("Ctrl+C", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  Press any key to close", styles::muted_style())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::title_style())
        .title(Span::styled(" Help ", styles::title_style()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
