//! Development server with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::Portfolio;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Server state
struct ServerState {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Start the development server
pub async fn start(portfolio: &Portfolio, ip: &str, port: u16, watch: bool) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        public_dir: portfolio.public_dir.clone(),
        reload_tx: reload_tx.clone(),
        live_reload: watch,
    });

    let app = Router::new()
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .with_state(state);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if watch {
        let portfolio = portfolio.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(portfolio, reload_tx).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Regenerate on content, asset or config changes, then tell browsers to reload
async fn watch_and_reload(portfolio: Portfolio, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&portfolio.content_dir, &portfolio.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = portfolio.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant_change(&e.path))
                    .collect();
                if changed.is_empty() {
                    continue;
                }

                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // config edits take effect without a restart
                let result =
                    Portfolio::new(&portfolio.base_dir).and_then(|current| current.generate());
                match result {
                    Ok(_) => {
                        tracing::info!("Regenerated successfully");
                        let _ = reload_tx.send(());
                    }
                    Err(e) => {
                        tracing::error!("Generation failed: {}", e);
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Editor swap files and VCS internals do not trigger a rebuild
fn is_relevant_change(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Resolve a request path to a file under the public directory
fn resolve_file(public_dir: &Path, path: &str) -> PathBuf {
    let clean_path = path.trim_start_matches('/');
    if clean_path.is_empty() {
        return public_dir.join("index.html");
    }

    let candidate = public_dir.join(clean_path);
    if candidate.is_dir() {
        candidate.join("index.html")
    } else if candidate.exists() {
        candidate
    } else {
        let with_html = public_dir.join(format!("{}.html", clean_path));
        if with_html.exists() {
            with_html
        } else {
            candidate
        }
    }
}

/// Serve files, injecting the live reload script into HTML pages
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path();
    if path.split('/').any(|segment| segment == "..") {
        return (StatusCode::BAD_REQUEST, "Bad request").into_response();
    }

    let file_path = resolve_file(&state.public_dir, path);
    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && !file_path.exists() {
        return not_found(&state).await;
    }

    if is_html && state.live_reload {
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => not_found(&state).await,
        }
    } else {
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) if response.status() == StatusCode::NOT_FOUND => not_found(&state).await,
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// The generated 404 page, or a plain message when there is none
async fn not_found(state: &ServerState) -> Response {
    match tokio::fs::read_to_string(state.public_dir.join("404.html")).await {
        Ok(content) => {
            let content = if state.live_reload {
                inject_live_reload(&content)
            } else {
                content
            };
            (StatusCode::NOT_FOUND, Html(content)).into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replacen("</body>", LIVE_RELOAD_SCRIPT, 1)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_inject_live_reload() {
        let html = inject_live_reload("<html><body><p>x</p></body></html>");
        assert!(html.contains("/__livereload"));
        assert!(html.ends_with("</body>\n</html>"));

        let fragment = inject_live_reload("<p>x</p>");
        assert!(fragment.starts_with("<p>x</p>"));
        assert!(fragment.contains("<script>"));
    }

    #[test]
    fn test_resolve_file() {
        let tmp = TempDir::new().unwrap();
        let public = tmp.path();
        fs::create_dir_all(public.join("blog/hello")).unwrap();
        fs::write(public.join("blog/hello/index.html"), "").unwrap();
        fs::write(public.join("about.html"), "").unwrap();

        assert_eq!(resolve_file(public, "/"), public.join("index.html"));
        assert_eq!(
            resolve_file(public, "/blog/hello/"),
            public.join("blog/hello/index.html")
        );
        assert_eq!(resolve_file(public, "/about"), public.join("about.html"));
        assert_eq!(resolve_file(public, "/missing.css"), public.join("missing.css"));
    }

    #[test]
    fn test_relevant_changes() {
        assert!(is_relevant_change(Path::new("content/blog/a.mdx")));
        assert!(!is_relevant_change(Path::new("content/blog/.a.mdx.swp")));
        assert!(!is_relevant_change(Path::new("content/blog/a.mdx~")));
        assert!(!is_relevant_change(Path::new(".git/index")));
    }
}
