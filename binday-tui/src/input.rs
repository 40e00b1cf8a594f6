use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.lookup_addresses`(...)
    SearchAddresses,
    /// Run `service.extract_collections`(...) for the currently selected address
    LoadCollectionsForCurrentAddress,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    // Postcodes may contain a Q, so a bare `q` only quits outside the text field
    let typing = matches!(app.screen, Screen::AddressSearch);
    if !typing && key.code == Char('q') && key.modifiers.is_empty() {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::CouncilSelect => match key.code {
            Up | Char('k') => {
                app.council_list_index = app.council_list_index.saturating_sub(1);
            }
            Down | Char('j') if app.council_list_index + 1 < app.councils.len() => {
                app.council_list_index += 1;
            }
            Enter | Char(' ') => {
                app.select_current_council();
            }
            _ => {}
        },

        Screen::AddressSearch => match key.code {
            Up => {
                app.address_list_index = app.address_list_index.saturating_sub(1);
            }
            Down if app.address_list_index + 1 < app.address_results.len() => {
                app.address_list_index += 1;
            }
            Char(character)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                app.postcode_input.push(character);
            }
            Backspace => {
                app.postcode_input.pop();
            }
            Enter => {
                action = Action::SearchAddresses;
            }
            Right | Tab => {
                action = Action::LoadCollectionsForCurrentAddress;
            }
            Left | Esc => {
                app.screen = Screen::CouncilSelect;
                app.address_results.clear();
                app.address_list_index = 0;
            }
            _ => {}
        },

        Screen::ScheduleView => match key.code {
            Left | Esc | Char('b') => {
                app.screen = Screen::AddressSearch;
            }
            _ => {}
        },
    }
    action
}
