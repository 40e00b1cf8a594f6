use binday_core::{date::DISPLAY_DATE_FORMAT, model::BinType};
use chrono::{Local, NaiveDate};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let header = Paragraph::new("binday – when do the bins go out?")
        .block(Block::default().borders(Borders::ALL).title("binday"));
    frame.render_widget(header, *header_area);

    match app.screen {
        Screen::CouncilSelect => draw_council_select(frame, app, *content_area),
        Screen::AddressSearch => draw_address_search(frame, app, *content_area),
        Screen::ScheduleView => draw_schedule_view(frame, app, *content_area),
    }

    let nav_hint = match app.screen {
        Screen::CouncilSelect => "↑/↓ move · Enter/Space select council · q/Ctrl-C quit",
        Screen::AddressSearch => {
            "Type postcode · Enter search · Tab/→ open schedule · Left/Esc back · Ctrl-C quit"
        }
        Screen::ScheduleView => "Esc/←/b back to addresses · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_council_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = app
        .councils
        .iter()
        .enumerate()
        .map(|(idx, (_id, name))| {
            let prefix = if idx == app.council_list_index {
                "> "
            } else {
                "  "
            };
            ListItem::new(format!("{prefix}{name}"))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select council (↑/↓, Enter)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.councils.is_empty() {
        state.select(Some(app.council_list_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_address_search(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // input
            Constraint::Min(0),    // results
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [input_area, results_area] = chunks else {
        return;
    };

    let council_name = app
        .councils
        .get(app.council_list_index)
        .map_or("<no council>", |(_, name)| name.as_str());

    let input = Paragraph::new(app.postcode_input.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Postcode in {council_name} (Enter)")),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(input, *input_area);

    let items = if app.address_results.is_empty() {
        vec![ListItem::new(
            "No addresses yet. Type a postcode such as WF1 2HQ and press Enter.",
        )]
    } else {
        app.address_results
            .iter()
            .map(|result| ListItem::new(result.address.clone()))
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Addresses (↑/↓, Tab/→ to open schedule)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.address_results.is_empty() {
        state.select(Some(app.address_list_index));
    }
    frame.render_stateful_widget(list, *results_area, &mut state);
}

fn draw_schedule_view(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let address = app
        .selected_address
        .as_ref()
        .map_or("<address>", |result| result.address.as_str());

    let title = format!("Collections for {address} (Esc/←/b to go back)");

    if app.is_loading {
        let paragraph = Paragraph::new("Loading collection schedule…")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let pickups = app.pickups();
    if pickups.is_empty() {
        let paragraph = Paragraph::new("The council publishes no upcoming collections here.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let today = Local::now().date_naive();

    let rows = pickups.into_iter().map(|pickup| {
        let date = pickup.date.format(DISPLAY_DATE_FORMAT).to_string();
        let weekday = pickup.date.format("%a").to_string();
        let relative = relative_day_label(pickup.date, today);

        let mut style = Style::default().fg(bin_color(pickup.bin_type));
        if pickup.date <= today {
            style = style.add_modifier(Modifier::BOLD);
        }

        Row::new(vec![
            Cell::from(date),
            Cell::from(weekday),
            Cell::from(relative),
            Cell::from(pickup.bin_type.label()),
        ])
        .style(style)
    });

    let column_widths = [
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Date", "Day", "In", "Bin"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    frame.render_widget(table, area);
}

fn bin_color(bin_type: BinType) -> Color {
    match bin_type {
        BinType::HouseholdWaste => Color::Gray,
        BinType::Recycling => Color::Blue,
        BinType::GardenWaste => Color::Green,
    }
}

fn relative_day_label(date: NaiveDate, today: NaiveDate) -> String {
    let delta = (date - today).num_days();
    match delta {
        0 => "today".to_owned(),
        1 => "tomorrow".to_owned(),
        days if days > 1 => format!("in {days} days"),
        -1 => "yesterday".to_owned(),
        days => format!("{} days ago", days.abs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_labels_count_whole_days() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 4).expect("valid date");
        let label = |days: i64| relative_day_label(today + chrono::Duration::days(days), today);

        assert_eq!(label(0), "today", "same day");
        assert_eq!(label(1), "tomorrow", "next day");
        assert_eq!(label(6), "in 6 days", "later this week");
        assert_eq!(label(-1), "yesterday", "previous day");
        assert_eq!(label(-3), "3 days ago", "earlier");
    }
}
