//! Interactive terminal kiosk for the NoPickles ordering service.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a service on the default address
//! nopickles-kiosk
//!
//! # Point at another service
//! nopickles-kiosk --base-url http://kiosk-backend.local:8000/
//!
//! # Disable colors (useful for piping output)
//! nopickles-kiosk --no-color
//! ```
//!
//! Anything typed is sent to the assistant.  Suggestions are numbered and can
//! be sent with `/pick <n>`; `/checkout` completes the order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use nopickles::kiosk::{KioskArgs, KioskCommand, help_text, parse_command};
use nopickles::{Kiosk, KioskConfig, OrderClient, PromptWriter, TerminalView};

const PROMPT: &str = "> ";

type TerminalKiosk = Kiosk<OrderClient, TerminalView<PromptWriter>>;

/// Main entry point for the nopickles-kiosk application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = KioskArgs::from_command_line_relaxed("nopickles-kiosk [OPTIONS]");
    let config = KioskConfig::from(args);

    let client = config.client()?;
    // Set while rustyline shows the prompt, so output from the restart task
    // redraws it instead of landing after a dangling prompt.
    let at_prompt = Arc::new(AtomicBool::new(false));
    let writer = PromptWriter::stdout(PROMPT, Arc::clone(&at_prompt));
    let view = TerminalView::with_writer(writer, config.use_color);
    let kiosk = Kiosk::with_restart_delay(client.clone(), view, config.restart_delay);
    let mut rl = DefaultEditor::new()?;

    // A first Ctrl+C while a request is in flight is swallowed; a second one exits.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        if interrupted_clone.swap(true, Ordering::Relaxed) {
            std::process::exit(130);
        }
    })?;

    println!("NoPickles kiosk ({})", client.base_url());
    println!("Type /help for commands, /quit to exit\n");

    kiosk.start_new_session().await;

    loop {
        interrupted.store(false, Ordering::Relaxed);

        at_prompt.store(true, Ordering::Release);
        let readline = rl.readline(PROMPT);
        at_prompt.store(false, Ordering::Release);

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        KioskCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        KioskCommand::Help => {
                            let help = help_text();
                            kiosk
                                .with_view(|view| {
                                    for line in help.lines() {
                                        view.print_info(&format!("    {line}"));
                                    }
                                })
                                .await;
                        }
                        KioskCommand::Checkout => {
                            if kiosk.checkout_enabled().await {
                                kiosk.complete_order().await;
                            } else {
                                print_info(&kiosk, "Your order is empty.").await;
                            }
                        }
                        KioskCommand::NewOrder => {
                            if confirm(
                                &mut rl,
                                "Start a new order? This will clear your current order. [y/N] ",
                            ) {
                                kiosk.abandon_order().await;
                            }
                        }
                        KioskCommand::Pick(number) => {
                            let available = kiosk.suggestions().await.len();
                            if number > available {
                                print_info(&kiosk, &format!("There is no suggestion {number}."))
                                    .await;
                            } else {
                                kiosk.click_suggestion(number - 1).await;
                            }
                        }
                        KioskCommand::Menu => match client.menu().await {
                            Ok(menu) => kiosk.with_view(|view| view.show_menu(&menu)).await,
                            Err(err) => {
                                print_error(&kiosk, &format!("Could not load the menu: {err}"))
                                    .await
                            }
                        },
                        KioskCommand::Order => {
                            kiosk.with_view(|view| view.show_order()).await;
                        }
                        KioskCommand::Health => match client.health().await {
                            Ok(health) => {
                                print_info(
                                    &kiosk,
                                    &format!(
                                        "Service is {} ({} active sessions)",
                                        health.status, health.active_sessions
                                    ),
                                )
                                .await
                            }
                            Err(err) => {
                                print_error(&kiosk, &format!("Service unreachable: {err}")).await
                            }
                        },
                        KioskCommand::Invalid(message) => {
                            print_error(&kiosk, &message).await;
                        }
                    }
                    continue;
                }

                kiosk.set_input(line).await;
                if kiosk.send_message().await.is_skipped() {
                    print_info(&kiosk, "No active order. Type /new to start one.").await;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                print_error(&kiosk, &format!("Input error: {err}")).await;
                break;
            }
        }
    }

    Ok(())
}

async fn print_info(kiosk: &TerminalKiosk, info: &str) {
    kiosk.with_view(|view| view.print_info(info)).await;
}

async fn print_error(kiosk: &TerminalKiosk, error: &str) {
    kiosk.with_view(|view| view.print_error(error)).await;
}

fn confirm(rl: &mut DefaultEditor, question: &str) -> bool {
    match rl.readline(question) {
        Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
