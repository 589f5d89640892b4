//! Line-oriented shell around [`catalog_client::App`].
//!
//! Reads commands from stdin, applies task results as they arrive and
//! prints the mounted view after every change. Type `help` for commands.

use tokio::io::{AsyncBufReadExt, BufReader};

use catalog_client::app::{
    ActivePanel, App, CatalogDisplay, LoginField, NotificationLevel, RegisterField, Submission, View,
};
use catalog_client::{debug, ClientConfig};

const HELP: &str = "\
commands:
  login <email> <password>
  register <name> <email> <password> <confirm>
  toggle                 switch login/register panel
  refresh                regenerate the catalog
  retry                  re-run a failed catalog fetch
  logout
  open <path>            navigate (/ or /products)
  show                   print the current view
  quit";

#[tokio::main]
async fn main() {
    let config = match ClientConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };
    let _log_guard = debug::init(&config);

    let mut app = match App::from_config(&config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Failed to assemble client");
            eprintln!("Startup error: {e}");
            std::process::exit(2);
        }
    };
    app.navigate_path("/");
    render(&app);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !run_command(&mut app, line.trim()) {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read stdin");
                    break;
                }
            },
            alive = app.next_event() => {
                if !alive {
                    break;
                }
                render(&app);
            }
        }
    }

    tracing::info!("Shutting down");
}

/// Apply one command. Returns `false` to exit.
fn run_command(app: &mut App, line: &str) -> bool {
    let args: Vec<&str> = line.split_whitespace().collect();
    match args.as_slice() {
        [] => return true,
        ["quit"] | ["exit"] => return false,
        ["help"] => {
            println!("{HELP}");
            return true;
        }
        ["show"] => {}
        ["toggle"] => app.toggle_panel(),
        ["login", email, password] => {
            app.edit_login(LoginField::Email, *email);
            app.edit_login(LoginField::Password, *password);
            report(app.submit_login());
        }
        ["register", name, email, password, confirm] => {
            app.edit_register(RegisterField::Name, *name);
            app.edit_register(RegisterField::Email, *email);
            app.edit_register(RegisterField::Password, *password);
            app.edit_register(RegisterField::ConfirmPassword, *confirm);
            report(app.submit_register());
        }
        ["refresh"] => app.refresh(),
        ["retry"] => app.retry(),
        ["logout"] => app.logout(),
        ["open", path] => app.navigate_path(path),
        _ => {
            println!("unknown command: {line} (try `help`)");
            return true;
        }
    }
    render(app);
    true
}

fn report(outcome: Option<Submission>) {
    match outcome {
        Some(Submission::Sent) => println!("... sending"),
        Some(Submission::Busy) => println!("... still waiting for the previous request"),
        Some(Submission::Invalid(_)) => {}
        None => println!("not on the sign-in page"),
    }
}

fn render(app: &App) {
    println!("\n== {} ==", app.route().path());

    match app.view() {
        Some(View::Auth) => {
            if let Some(auth) = app.auth() {
                let state = auth.state();
                let (title, error) = match state.active_panel {
                    ActivePanel::Login => ("Sign in", &state.login_error),
                    ActivePanel::Register => ("Create account", &state.register_error),
                };
                println!("[{title}]{}", if state.is_submitting { " (submitting)" } else { "" });
                if let Some(error) = error {
                    println!("  ! {error}");
                }
            }
        }
        Some(View::Catalog) => {
            if let Some(catalog) = app.catalog() {
                let state = catalog.state();
                if state.is_refreshing {
                    println!("(updating products...)");
                }
                match state.display() {
                    CatalogDisplay::Loading => println!("Loading products..."),
                    CatalogDisplay::Error(message) => println!("! {message} (type `retry`)"),
                    CatalogDisplay::Empty => println!("No products found."),
                    CatalogDisplay::Products(products) => {
                        for product in products {
                            let link = product.link().unwrap_or("-");
                            println!("  {:<40} {:>18}  {}", product.display_title(), product.display_price(), link);
                        }
                    }
                }
            }
        }
        None => println!("(nothing mounted)"),
    }

    for note in app.notifications().active() {
        let marker = match note.level {
            NotificationLevel::Success => "ok",
            NotificationLevel::Error => "error",
        };
        println!("<{marker}> {}", note.message);
    }
}
