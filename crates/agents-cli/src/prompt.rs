//! Interactive menus and the checks that decide whether to show them.
//!
//! Every prompt returns `Ok(None)` when the user backs out (Esc, `q` or
//! Ctrl-C); callers treat that as a graceful cancellation.

use crate::cmd::CANCELLED;
use agents_core::loader::AgentSummary;
use agents_core::target::Target;
use dialoguer::{console::Term, theme::ColorfulTheme, MultiSelect, Select};
use std::io::{self, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Environment detection
// ---------------------------------------------------------------------------

/// Whether prompts may be shown: not disabled by flag, not under CI, and
/// attached to a terminal.
pub fn interactive(no_input: bool) -> bool {
    let ci = std::env::var("CI").ok();
    allows_prompts(
        no_input,
        ci.as_deref(),
        std::io::stdin().is_terminal() && std::io::stdout().is_terminal(),
    )
}

fn allows_prompts(no_input: bool, ci: Option<&str>, terminal: bool) -> bool {
    !no_input && !is_ci(ci) && terminal
}

fn is_ci(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        Some(v) => v == "1" || v.eq_ignore_ascii_case("true"),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

static PROMPT_OPEN: AtomicBool = AtomicBool::new(false);
static INTERRUPT_LISTENER: OnceLock<()> = OnceLock::new();

/// Show one menu. Esc, `q` and Ctrl-C all come back as `Ok(None)`.
fn ask<T>(show: impl FnOnce() -> dialoguer::Result<Option<T>>) -> anyhow::Result<Option<T>> {
    listen_for_interrupt();
    PROMPT_OPEN.store(true, Ordering::SeqCst);
    let answer = show();
    PROMPT_OPEN.store(false, Ordering::SeqCst);
    cancel_on_interrupt(answer)
}

/// The terminal reports Ctrl-C in raw mode as an `Interrupted` read.
fn cancel_on_interrupt<T>(answer: dialoguer::Result<Option<T>>) -> anyhow::Result<Option<T>> {
    match answer {
        Ok(answer) => Ok(answer),
        Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => {
            restore_cursor();
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// SIGINT that arrives between key reads. While a menu is open it cancels
/// with exit 0; at any other time it keeps the conventional 130.
fn listen_for_interrupt() {
    INTERRUPT_LISTENER.get_or_init(|| {
        let spawned = std::thread::Builder::new()
            .name("ctrl-c".to_string())
            .spawn(|| {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        tracing::debug!(error = %e, "Ctrl-C listener unavailable");
                        return;
                    }
                };
                runtime.block_on(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::debug!(error = %e, "failed to install Ctrl-C handler");
                        return;
                    }
                    if PROMPT_OPEN.load(Ordering::SeqCst) {
                        restore_cursor();
                        eprintln!("\n{CANCELLED}");
                        std::process::exit(0);
                    }
                    std::process::exit(130);
                });
            });
        if let Err(e) = spawned {
            tracing::debug!(error = %e, "Ctrl-C listener unavailable");
        }
    });
}

fn restore_cursor() {
    let _ = Term::stderr().show_cursor();
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// Multi-select over every known target. Re-asks until at least one is picked.
pub fn select_targets() -> anyhow::Result<Option<Vec<Target>>> {
    let theme = ColorfulTheme::default();
    let items: Vec<String> = Target::all().iter().map(|t| target_item(*t)).collect();
    let defaults: Vec<bool> = Target::all().iter().map(|t| t.checked_by_default()).collect();

    loop {
        let picked = ask(|| {
            MultiSelect::with_theme(&theme)
                .with_prompt("Select target formats to build (space to toggle, enter to confirm)")
                .items(&items)
                .defaults(&defaults)
                .interact_opt()
        })?;

        match picked {
            None => return Ok(None),
            Some(indices) if indices.is_empty() => {
                eprintln!("You must choose at least one target.");
            }
            Some(indices) => {
                return Ok(Some(indices.into_iter().map(|i| Target::all()[i]).collect()));
            }
        }
    }
}

/// What the user chose in the agent menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentChoice {
    All,
    Only(Vec<String>),
}

/// "Install all" or a custom multi-select (everything pre-checked).
pub fn select_agents(available: &[AgentSummary]) -> anyhow::Result<Option<AgentChoice>> {
    let theme = ColorfulTheme::default();
    let mode = ask(|| {
        Select::with_theme(&theme)
            .with_prompt("How do you want to install agents?")
            .items(&["Install all agents (recommended)", "Custom selection"])
            .default(0)
            .interact_opt()
    })?;

    match mode {
        None => return Ok(None),
        Some(0) => return Ok(Some(AgentChoice::All)),
        Some(_) => {}
    }

    let items: Vec<String> = available.iter().map(agent_item).collect();
    let defaults = vec![true; items.len()];
    loop {
        let picked = ask(|| {
            MultiSelect::with_theme(&theme)
                .with_prompt("Select agents to install")
                .items(&items)
                .defaults(&defaults)
                .interact_opt()
        })?;

        match picked {
            None => return Ok(None),
            Some(indices) if indices.is_empty() => {
                eprintln!("You must choose at least one agent.");
            }
            Some(indices) => {
                let slugs = indices
                    .into_iter()
                    .map(|i| available[i].slug.clone())
                    .collect();
                return Ok(Some(AgentChoice::Only(slugs)));
            }
        }
    }
}

fn target_item(target: Target) -> String {
    format!("{} ({})", target.label(), target.subdir())
}

fn agent_item(agent: &AgentSummary) -> String {
    match &agent.description {
        Some(d) if !d.trim().is_empty() => format!("{} - {}", agent.name, d),
        _ => agent.name.clone(),
    }
}
