use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Screen};
use crate::models::{Mood, RoutineStatus};
use crate::services::quotes::QUOTE_MILESTONE;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Screen body
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.screen {
        Screen::Quote => render_quote(frame, app, chunks[1]),
        Screen::Routine => render_checklist(frame, app, chunks[1]),
        Screen::Mood => render_mood(frame, app, chunks[1]),
        Screen::Complete => render_complete(frame, app, chunks[1]),
        Screen::Favorites => render_favorites(frame, app, chunks[1]),
        Screen::History => render_history(frame, app, chunks[1]),
        Screen::Manage => render_manage(frame, app, chunks[1]),
    }

    render_status(frame, app, chunks[2]);

    if app.routine_input_active {
        render_routine_input(frame, app);
    }

    if app.celebrating {
        render_celebration(frame);
    }

    // Render help popup if active
    if app.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" Hugmi · {} ", app.screen.title());
    let (done, total) = app.checklist_progress();
    let stats = format!(
        " {} | {} | {}/{} done | {} day streak",
        app.user.name,
        app.today.format("%a %Y-%m-%d"),
        done,
        total,
        app.streak
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(stats).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn quote_lines(app: &App) -> Vec<Line<'static>> {
    let quote = &app.quote;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("“{}”", quote.text(app.language)),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let attribution = match &quote.era {
        Some(era) => format!("— {} ({})", quote.author, era),
        None => format!("— {}", quote.author),
    };
    lines.push(Line::from(Span::styled(
        attribution,
        Style::default().fg(Color::Yellow),
    )));
    lines
}

fn render_quote(frame: &mut Frame, app: &App, area: Rect) {
    let favorite = if app.is_favorite { " ♥ " } else { " " };
    let block = Block::default()
        .title(format!(" Today's Quote{}", favorite))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(quote_lines(app))
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_checklist(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .checklist
        .iter()
        .map(|item| {
            let (mark, style) = match item.status {
                Some(RoutineStatus::Checked) => ("[✓] ", Style::default().fg(Color::Green)),
                Some(RoutineStatus::Skipped) => ("[–] ", Style::default().fg(Color::DarkGray)),
                None => ("[ ] ", Style::default().fg(Color::White)),
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::styled(item.routine.title.clone(), style),
            ]))
        })
        .collect();

    if items.is_empty() {
        let paragraph = Paragraph::new("No active routines. Press 'e' to add some.")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    render_selectable(frame, items, app.selected_index, " Checklist ", area);
}

fn render_mood(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = Mood::ALL
        .iter()
        .enumerate()
        .map(|(idx, mood)| {
            let current = if app.mood == Some(*mood) { " (today)" } else { "" };
            ListItem::new(format!("{}. {}{}", idx + 1, mood.label(), current))
        })
        .collect();

    render_selectable(frame, items, app.selected_index, " Mood ", area);
}

fn render_complete(frame: &mut Frame, app: &App, area: Rect) {
    let (done, total) = app.checklist_progress();
    let mood = app.mood.map(|m| m.label()).unwrap_or("not recorded");

    let mut lines = vec![
        Line::from(Span::styled(
            "Your morning is complete.",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Routines: {}/{}", done, total)),
        Line::from(format!("Mood: {}", mood)),
        Line::from(format!("Streak: {} day(s)", app.streak)),
        Line::from(format!(
            "Quotes collected: {}/{}",
            app.viewed_count.min(QUOTE_MILESTONE),
            QUOTE_MILESTONE
        )),
    ];
    lines.extend(quote_lines(app));

    let block = Block::default()
        .title(" Well done ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_favorites(frame: &mut Frame, app: &App, area: Rect) {
    if app.favorites.is_empty() {
        let paragraph = Paragraph::new("No favorites yet. Press 'f' on a quote to save it.")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .favorites
        .iter()
        .map(|quote| {
            ListItem::new(Line::from(vec![
                Span::styled("♥ ", Style::default().fg(Color::Red)),
                Span::raw(quote.text(app.language).to_string()),
                Span::styled(
                    format!("  — {}", quote.author),
                    Style::default().fg(Color::Yellow),
                ),
            ]))
        })
        .collect();

    render_selectable(frame, items, app.selected_index, " Favorites ", area);
}

fn render_history(frame: &mut Frame, app: &App, area: Rect) {
    if app.history.is_empty() {
        let paragraph = Paragraph::new("No routines logged in the last two weeks.")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .history
        .iter()
        .map(|day| {
            let mood = app
                .mood_on(day.date)
                .map(|m| m.label())
                .unwrap_or("-");
            ListItem::new(Line::from(vec![
                Span::styled(
                    day.date.format("%a %m-%d  ").to_string(),
                    Style::default().fg(Color::Blue),
                ),
                Span::styled(
                    format!("✓ {:<3}", day.checked),
                    Style::default().fg(Color::Green),
                ),
                Span::styled(
                    format!("– {:<3}", day.skipped),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!(" mood: {}", mood)),
            ]))
        })
        .collect();

    render_selectable(frame, items, app.selected_index, " Last 14 days ", area);
}

fn render_manage(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .routines
        .iter()
        .map(|routine| {
            let style = if routine.is_active {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let state = if routine.is_active { "" } else { " (paused)" };
            ListItem::new(Span::styled(format!("{}{}", routine.title, state), style))
        })
        .collect();

    render_selectable(frame, items, app.selected_index, " Routines ", area);
}

fn render_selectable(frame: &mut Frame, items: Vec<ListItem>, selected: usize, title: &str, area: Rect) {
    let list = List::new(items)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(message) = &app.status_message {
        let paragraph = Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, area);
        return;
    }

    let hints = match app.screen {
        Screen::Quote => "Enter:start  f:favorite  F:favorites  h:history  e:edit  ?:help  q:quit",
        Screen::Routine => "j/k:nav  space:check  s:skip  Enter:next  Esc:back",
        Screen::Mood => "1-5:pick  j/k:nav  Enter:select  Esc:back",
        Screen::Complete => "f:favorite  F:favorites  h:history  Esc:back  q:quit",
        Screen::Favorites => "j/k:nav  f:unfavorite  Esc:back",
        Screen::History => "j/k:scroll  Esc:back",
        Screen::Manage => "a:add  d:delete  space:pause  K/J:move  Esc:back",
    };

    let paragraph = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_routine_input(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 20, frame.area());

    let block = Block::default()
        .title(" New routine ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    // Clear the area first
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let input_text = format!("> {}_", app.routine_input);
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_celebration(frame: &mut Frame) {
    let area = centered_rect(50, 30, frame.area());

    let text = format!(
        "\nYou have collected {} quotes!\n\nThank you for showing up every morning.\n\nPress any key",
        QUOTE_MILESTONE
    );

    let block = Block::default()
        .title(" 🎉 Milestone ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 70, frame.area());

    let help_text = vec![
        "",
        " Morning flow:",
        "   Enter / →  Next step",
        "   Esc / ←    Previous step",
        "   space      Check routine",
        "   s          Skip routine",
        "   1-5        Pick mood",
        "",
        " Quotes:",
        "   f          Toggle favorite",
        "   F          Favorite quotes",
        "",
        " Routines (press e):",
        "   a          Add routine",
        "   d          Delete routine",
        "   space      Pause / resume",
        "   K / J      Move up / down",
        "",
        " General:",
        "   h          History",
        "   ?          Toggle this help",
        "   q          Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
