//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::generator::{GenerateStats, Generator};
use crate::Portfolio;

/// Generate the static site
pub fn run(portfolio: &Portfolio) -> Result<GenerateStats> {
    let start = Instant::now();

    let stats = Generator::new(portfolio).generate()?;
    if stats.skipped > 0 {
        tracing::warn!("{} items could not be generated", stats.skipped);
    }

    tracing::info!(
        "Generated {} posts and {} projects in {:.2}s",
        stats.posts,
        stats.projects,
        start.elapsed().as_secs_f64()
    );

    Ok(stats)
}

/// Watch content, static assets and the config file, regenerating on change.
///
/// The site configuration is re-read before every pass.
pub async fn watch(portfolio: &Portfolio) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for dir in [&portfolio.content_dir, &portfolio.static_dir] {
        if dir.exists() {
            watcher.watch(dir, notify::RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = portfolio.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(Path::new(&config_path), notify::RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    let result = Portfolio::new(&portfolio.base_dir).and_then(|p| run(&p));
                    if let Err(e) = result {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_reports_stats() {
        let tmp = TempDir::new().unwrap();
        crate::commands::init::init_site(tmp.path()).unwrap();

        let portfolio = Portfolio::new(tmp.path()).unwrap();
        let stats = run(&portfolio).unwrap();
        assert_eq!(stats.posts, 1);
        assert_eq!(stats.projects, 1);

        let post = fs::read_to_string(tmp.path().join("public/blog/hello-world/index.html"))
            .unwrap();
        assert!(post.contains("callout-tip"));
    }
}
