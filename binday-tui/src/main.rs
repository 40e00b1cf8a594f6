//! Terminal UI and one-shot commands for looking up bin collection days.

mod app;
mod cli;
mod input;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use binday_core::{
    CouncilId, DocumentProvider, PostcodeQuery, plugin::PluginRegistry, service::BindayService,
};
use binday_html::HttpDocumentProvider;
use binday_provider_wakefield::{self as wakefield, WakefieldConfig};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tracing::warn;

use crate::app::App;
use crate::cli::Cli;
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_tracing(&cli)?;

    // HTTP + service setup
    let client = Client::builder().user_agent(&cli.user_agent).build()?;
    let provider: Arc<dyn DocumentProvider> = Arc::new(HttpDocumentProvider::new(client));

    let plugins = vec![wakefield::plugin(
        provider,
        WakefieldConfig::new(cli.base_url.clone()),
    )];
    let registry = Arc::new(PluginRegistry::new(plugins));
    let service = Arc::new(BindayService::new(registry));

    if let Some(command) = cli.command {
        return cli::run_command(&service, &CouncilId(cli.council), command).await;
    }

    // App state
    let app = App::new(service);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Short poll keeps the loop responsive without spinning
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::SearchAddresses => {
                    let Some(council) = app.selected_council.clone() else {
                        app.error_message = Some("Select a council first".into());
                        continue;
                    };

                    let postcode = PostcodeQuery::new(app.postcode_input.as_str());
                    if postcode.is_empty() {
                        app.error_message = Some("Type a postcode, then press Enter".into());
                        continue;
                    }

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = app.service.lookup_addresses(&council, &postcode).await;

                    app.is_loading = false;
                    match res {
                        Ok(addresses) => {
                            if addresses.is_empty() {
                                app.error_message =
                                    Some(format!("No properties found for {postcode}"));
                            }
                            app.address_results = addresses;
                            app.address_list_index = 0;
                            app.selected_address = None;
                        }
                        Err(err) => {
                            warn!(error = %err, "address lookup failed");
                            app.error_message = Some(format!("Lookup failed: {err}"));
                        }
                    }
                }
                Action::LoadCollectionsForCurrentAddress => {
                    let Some(council) = app.selected_council.clone() else {
                        app.error_message = Some("Select a council first".into());
                        continue;
                    };

                    let Some(addr) = app.select_current_address() else {
                        app.error_message =
                            Some("No address selected (search a postcode first)".into());
                        continue;
                    };

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = app
                        .service
                        .extract_collections(&council, addr.url.as_str())
                        .await;

                    app.is_loading = false;
                    match res {
                        Ok(records) => {
                            app.collections = records;
                        }
                        Err(err) => {
                            warn!(error = %err, url = %addr.url, "collection extraction failed");
                            app.collections.clear();
                            app.error_message = Some(format!("Failed to load schedule: {err}"));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
