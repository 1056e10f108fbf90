//! The long-running widget: mount with the default city, then search on each line.

use std::{io::Write, sync::Arc};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::watch,
    task::JoinSet,
};
use tracing::{debug, warn};
use weather_core::{Orchestrator, UiState};

use crate::render::{PROMPT_PLACEHOLDER, render};

const QUIT: &str = ":q";

pub async fn run(orchestrator: Orchestrator) -> anyhow::Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    run_with(Arc::new(orchestrator), input, &mut std::io::stdout()).await
}

/// Drive the widget from `input`, drawing every state change to `out`.
///
/// Lookups still running when input ends or `:q` is read are awaited, and
/// their results drawn, before returning.
pub async fn run_with<R, W>(
    orchestrator: Arc<Orchestrator>,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut updates = orchestrator.subscribe();
    let mut lookups = JoinSet::new();

    writeln!(out, "Type a city and press Enter ({QUIT} to quit).")?;
    draw(&mut updates, out)?;

    let mounting = orchestrator.clone();
    lookups.spawn(async move {
        mounting.mount().await;
    });

    let mut lines = input.lines();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                draw(&mut updates, out)?;
            }
            Some(joined) = lookups.join_next(), if !lookups.is_empty() => {
                if let Err(err) = joined {
                    warn!(error = %err, "weather lookup task failed");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let city = line.trim();
                if city == QUIT {
                    break;
                }
                if city.is_empty() {
                    continue;
                }

                // Searches overlap freely; the orchestrator keeps only the newest.
                let searching = orchestrator.clone();
                let city = city.to_string();
                lookups.spawn(async move {
                    searching.fetch_weather(&city).await;
                });
            }
        }
    }

    debug!(pending = lookups.len(), "input closed, finishing running lookups");
    while let Some(joined) = lookups.join_next().await {
        if let Err(err) = joined {
            warn!(error = %err, "weather lookup task failed");
        }
    }
    if updates.has_changed().unwrap_or(false) {
        draw(&mut updates, out)?;
    }

    Ok(())
}

fn draw<W: Write>(updates: &mut watch::Receiver<UiState>, out: &mut W) -> std::io::Result<()> {
    let view = render(&updates.borrow_and_update());
    writeln!(out, "\n{view}\n")?;
    write!(out, "{PROMPT_PLACEHOLDER} > ")?;
    out.flush()
}
