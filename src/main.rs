use swipeclean::app::{App, AppFlow, AppOptions, YearFilter};
use swipeclean::async_thumbnail::SyncThumbnailManager;
use swipeclean::cli::{AppConfig, Args};
use swipeclean::config::UserConfig;
use swipeclean::library::{load_catalog, AssetDeleter, DryRunDeleter, FsPhotoLibrary, TrashDeleter};
use swipeclean::{logging, open_photo, tui};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Convert to config
    let config: AppConfig = args.into();

    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init(&log_path) {
        eprintln!("Warning: Logging disabled: {}", e);
    }

    // Run the app
    run_app_with_config(&config)
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(config: &AppConfig) -> io::Result<()> {
    tracing::info!(directory = %config.directory.display(), dry_run = config.dry_run, "starting");

    // Load user configuration
    let mut user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    let library = FsPhotoLibrary::new(config.directory.clone(), config.discovery_options());
    let catalog = match load_catalog(&library) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!(error = %e, "could not load photo library");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if catalog.is_empty() {
        println!(
            "No photos found in directory: {}",
            config.directory.display()
        );
        if !config.recursive {
            println!("(Use --recursive to include subdirectories)");
        }
        return Ok(());
    }

    if let Some(year) = config.year {
        if catalog.count_for_year(year) == 0 {
            println!("No photos from {} in {}", year, config.directory.display());
            return Ok(());
        }
    }

    // Print dry-run notice
    if config.dry_run {
        println!("[DRY RUN] No photos will be moved to trash");
        println!("   Found {} photos to review", catalog.len());
        println!("   Press Enter to continue...");
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
    }

    let deleter: Box<dyn AssetDeleter> = if config.dry_run {
        Box::new(DryRunDeleter::new())
    } else {
        Box::new(TrashDeleter)
    };

    let options = AppOptions {
        queue_policy: config.queue_policy.unwrap_or(user_config.queue_policy),
        skip_confirm: config.skip_confirm,
        dry_run: config.dry_run,
        show_welcome: config.show_welcome || !user_config.welcome_shown,
    };

    let mut app = App::new(catalog, deleter, options);
    if let Some(year) = config.year {
        app.set_filter(YearFilter::Year(year));
    }
    let mut thumbnails = SyncThumbnailManager::new()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(&mut terminal, &mut app, &mut thumbnails, &mut user_config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Print summary after exit
    let pending = app.session().pending_deletion_count();
    if config.dry_run {
        println!("\n[DRY RUN] Complete");
        println!("   Would have deleted: {} photos", app.deleted_total());
    } else if app.deleted_total() > 0 {
        println!("Moved {} photos to the trash", app.deleted_total());
    }
    if pending > 0 {
        println!("{} queued photos were left untouched", pending);
    }

    tracing::info!(
        deleted = app.deleted_total(),
        left_queued = pending,
        "exiting"
    );

    result
}

/// Suspends the TUI terminal to allow external programs to run
fn suspend_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Resumes the TUI terminal after external program exits
fn resume_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(())
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    thumbnails: &mut SyncThumbnailManager,
    user_config: &mut UserConfig,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| tui::render(frame, app, thumbnails))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            AppFlow::Continue => {}
            AppFlow::Quit => break,
            AppFlow::WelcomeDismissed => {
                // Mark welcome as shown and persist
                user_config.welcome_shown = true;
                if let Err(e) = user_config.save() {
                    tracing::warn!(error = %e, "failed to save user config");
                }
            }
            AppFlow::OpenPhoto(path) => {
                // Suspend terminal before opening external program
                suspend_terminal(terminal)?;

                let open_result = open_photo(&path);

                resume_terminal(terminal)?;
                thumbnails.reset();

                if let Err(e) = open_result {
                    app.report_open_error(&e);
                }
            }
        }
    }

    Ok(())
}
