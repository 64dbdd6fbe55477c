//! Terminal rendering of release events.

use colored::Colorize;
use rk_protocol::ipc::Event;
use tokio::sync::mpsc;

/// Print events until every sender is dropped.
pub async fn print_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        if let Some(line) = render(&event) {
            println!("{line}");
        }
    }
}

/// One line of output for `event`, or `None` for events not shown.
pub fn render(event: &Event) -> Option<String> {
    let line = match event {
        Event::ReleaseStarted { branch, .. } => {
            format!("{} on branch {}", "Release".bold(), branch.cyan())
        }
        Event::RunStatusUpdate { .. } => return None,
        Event::StepStarted {
            step_index, plugin, ..
        } => format!("[{}] {}", step_index + 1, plugin.cyan()),
        Event::StepCompleted { plugin, .. } => format!("    {} {}", "done".green(), plugin),
        Event::RunLogChunk { content, .. } => format!("    {}", content.dimmed()),
        Event::ReleaseSkipped { reason, .. } => {
            format!("{} {}", "Skipped:".yellow().bold(), reason)
        }
        Event::PublishStarted { target, .. } => {
            format!("{} {}", "Publishing".bold(), target.cyan())
        }
        Event::PublishCompleted { release, .. } => {
            let detail = match &release.url {
                Some(url) => url.clone(),
                None => release.references.join(", "),
            };
            format!("    {} {}: {}", "published".green(), release.name, detail)
        }
        Event::PublishFailed { target, error, .. } => {
            format!("    {} {}: {}", "failed".red().bold(), target, error)
        }
        Event::PublishSkipped { target, .. } => {
            format!("    {} {}", "skipped".yellow(), target)
        }
        Event::ReleaseCompleted { version, .. } => match version {
            Some(version) => format!("{} {}", "Released".green().bold(), version),
            None => "Release finished".green().bold().to_string(),
        },
        Event::ReleaseFailed { error, .. } => format!("{} {}", "Release failed:".red().bold(), error),
    };
    Some(line)
}
