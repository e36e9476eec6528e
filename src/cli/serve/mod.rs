//! Development server for the built HTML tree.
//!
//! | URL              | served from                    |
//! |------------------|--------------------------------|
//! | `/`              | `302` to `/index.html`         |
//! | `/mathjax/<rest>`| `serve.mathjax` directory      |
//! | anything else    | `serve.root` (`build/html`)    |
//!
//! Requests are handled one at a time on the calling thread.

mod lifecycle;
mod path;
mod response;

use crate::{config::ServeConfig, debug, log};
use anyhow::Result;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tiny_http::{Method, Request, Server};

/// URL prefix mapped onto the MathJax directory.
const MATHJAX_PREFIX: &str = "/mathjax/";

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
}

/// Bind the HTTP server without starting the request loop
pub fn bind_server(config: &ServeConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.interface, config.port)?;
    let server = Arc::new(server);
    lifecycle::register_server_for_shutdown(&server);

    log!("serve"; "Started server at localhost:{} (pid={})", addr.port(), std::process::id());
    debug!("serve"; "http://{} -> {}", addr, config.root.display());

    Ok(BoundServer { server, addr })
}

impl BoundServer {
    /// Start the request loop (blocking until Ctrl+C).
    pub fn run(self, config: &ServeConfig) -> Result<()> {
        run_request_loop(&self.server, config);
        log!("serve"; "Stopped server at localhost:{} (pid={})", self.addr.port(), std::process::id());
        Ok(())
    }
}

/// `doctools serve`
pub fn serve(config: &ServeConfig) -> Result<()> {
    if !config.root.is_dir() {
        log!("warning"; "{} does not exist yet; build the docs first", config.root.display());
    }
    bind_server(config)?.run(config)
}

fn run_request_loop(server: &Server, config: &ServeConfig) {
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config) {
            log!("serve"; "request error: {e:#}");
        }
    }
}

/// Where a URL leads.
#[derive(Debug, PartialEq, Eq)]
enum Route {
    Redirect(&'static str),
    File(PathBuf),
    NotFound,
}

fn route(url: &str, config: &ServeConfig) -> Route {
    let path_only = url.split(['?', '#']).next().unwrap_or(url);
    if path_only == "/" {
        return Route::Redirect("/index.html");
    }

    let (rest, root) = match url.strip_prefix(MATHJAX_PREFIX) {
        Some(rest) => (rest, &config.mathjax),
        None => (url, &config.root),
    };

    path::resolve_path(rest, root).map_or(Route::NotFound, Route::File)
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &ServeConfig) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    debug!("serve"; "{} {}", request.method(), request.url());

    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request);
    }

    match route(request.url(), config) {
        Route::Redirect(location) => response::respond_redirect(request, location),
        Route::File(path) => response::respond_file(request, &path),
        Route::NotFound => response::respond_not_found(request),
    }
}
