// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cycle Demo
//!
//! Runs one of the bundled applications against a terminal surface: every
//! render is printed as HTML on stdout, and host events are read from stdin,
//! one per line:
//!
//! ```text
//! <event> <selector> [value]
//! click .increment
//! input .field Ada
//! ```
//!
//! Run with: cargo run --bin cycle-demo --features http
//!
//! Environment:
//! - `CYCLE_APP`: timer | hover | hello | counter | bmi | first-user (default timer)
//! - `CYCLE_MOUNT`: mount point (default `#app`)
//! - `CYCLE_TICK_MS`: timer period in milliseconds (default 1000)
//! - `CYCLE_USERS_URL`: endpoint of the first-user app
//! - `CYCLE_HTTP_TIMEOUT_SECS`: HTTP timeout (default 30)
//! - `RUST_LOG`: tracing filter

use anyhow::{bail, Context, Result};
use cycle_runtime::apps::first_user::{self, FirstUserConfig};
use cycle_runtime::apps::timer::{self, TimerConfig, TimerReset};
use cycle_runtime::apps::{bmi, counter, hello};
use cycle_runtime::driver::dom::{DomEvent, DOM};
use cycle_runtime::driver::http::HTTP;
use cycle_runtime::driver::log::LOG;
use cycle_runtime::driver::{DomDriver, HttpConfig, HttpDriver, LogDriver, Transport};
use cycle_runtime::render::{Element, MemorySurface, MountId, Surface};
use cycle_runtime::{run_loop, RuntimeConfig, SurfaceError};
use futures::stream::BoxStream;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Which application to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DemoApp {
    Timer,
    Hover,
    Hello,
    Counter,
    Bmi,
    FirstUser,
}

impl FromStr for DemoApp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "timer" => DemoApp::Timer,
            "hover" => DemoApp::Hover,
            "hello" => DemoApp::Hello,
            "counter" => DemoApp::Counter,
            "bmi" => DemoApp::Bmi,
            "first-user" => DemoApp::FirstUser,
            other => bail!(
                "unknown CYCLE_APP {:?}: expected timer, hover, hello, counter, bmi or first-user",
                other
            ),
        })
    }
}

/// Configuration for the demo
#[derive(Debug, Clone)]
struct DemoConfig {
    /// Application to run
    app: DemoApp,
    /// Mount point, `#id`
    mount: String,
    /// Timer settings
    timer: TimerConfig,
    /// First-user settings
    first_user: FirstUserConfig,
    /// HTTP client settings
    http: HttpConfig,
}

impl DemoConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let app = std::env::var("CYCLE_APP")
            .unwrap_or_else(|_| "timer".to_string())
            .parse()?;

        let mount = std::env::var("CYCLE_MOUNT").unwrap_or_else(|_| "#app".to_string());

        let mut timer = TimerConfig::default();
        if let Ok(tick) = std::env::var("CYCLE_TICK_MS") {
            timer.tick_ms = tick.parse().context("CYCLE_TICK_MS must be milliseconds")?;
        }
        if app == DemoApp::Hover {
            timer.reset = TimerReset::Hover;
        }
        timer.validate()?;

        let mut first_user = FirstUserConfig::default();
        if let Ok(url) = std::env::var("CYCLE_USERS_URL") {
            first_user.url = url;
        }

        let mut http = HttpConfig::default();
        if let Ok(timeout) = std::env::var("CYCLE_HTTP_TIMEOUT_SECS") {
            http.timeout_secs = timeout
                .parse()
                .context("CYCLE_HTTP_TIMEOUT_SECS must be seconds")?;
        }

        Ok(Self {
            app,
            mount,
            timer,
            first_user,
            http,
        })
    }
}

/// Surface printing each mount point after every render
struct TerminalSurface {
    inner: MemorySurface,
}

impl TerminalSurface {
    fn new(mount: &str) -> Result<Self, SurfaceError> {
        Ok(Self {
            inner: MemorySurface::with_mount(mount)?,
        })
    }

    fn print(&self, mount: &MountId) {
        if let Some(html) = self.inner.html(mount) {
            println!("{} {}", mount, html);
        }
    }
}

impl Surface for TerminalSurface {
    fn clear(&self, mount: &MountId) -> Result<(), SurfaceError> {
        self.inner.clear(mount)
    }

    fn append(&self, mount: &MountId, element: Element) -> Result<(), SurfaceError> {
        self.inner.append(mount, element)?;
        self.print(mount);
        Ok(())
    }

    fn set_text(&self, mount: &MountId, text: &str) -> Result<(), SurfaceError> {
        self.inner.set_text(mount, text)?;
        self.print(mount);
        Ok(())
    }

    fn events(&self) -> BoxStream<'static, DomEvent> {
        self.inner.events()
    }
}

/// Turn stdin lines into DOM events on the current tree
async fn read_events(surface: Arc<TerminalSurface>, mount: MountId) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let mut parts = line.split_whitespace();
        let (Some(event_type), Some(selector)) = (parts.next(), parts.next()) else {
            if !line.trim().is_empty() {
                warn!(line = %line, "Expected \"<event> <selector> [value]\"");
            }
            continue;
        };
        let value = parts.collect::<Vec<_>>().join(" ");
        let value = (!value.is_empty()).then_some(value.as_str());

        match surface.inner.fire(&mount, selector, event_type, value) {
            Ok(event) => info!(event = %event, "Event raised"),
            Err(e) => warn!(error = %e, "Event not raised"),
        }
    }
    Ok(())
}

#[cfg(feature = "http")]
fn transport(config: &DemoConfig) -> Result<Arc<dyn Transport>> {
    let transport = cycle_runtime::driver::ReqwestTransport::new(&config.http)
        .context("Failed to create HTTP transport")?;
    Ok(Arc::new(transport))
}

#[cfg(not(feature = "http"))]
fn transport(config: &DemoConfig) -> Result<Arc<dyn Transport>> {
    use cycle_runtime::driver::StaticTransport;

    warn!(
        timeout_secs = config.http.timeout_secs,
        "Built without the http feature, answering with a canned user"
    );
    let user = serde_json::json!({
        "name": "Leanne Graham",
        "email": "Sincere@april.biz",
        "website": "hildegard.org"
    });
    Ok(Arc::new(
        StaticTransport::new()
            .route(config.first_user.url.clone(), 200, user)
            .with_latency(std::time::Duration::from_millis(200)),
    ))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries renders
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = DemoConfig::from_env()?;
    info!(app = ?config.app, mount = %config.mount, "Starting cycle demo");

    let surface = Arc::new(TerminalSurface::new(&config.mount)?);
    let mount = MountId::parse(&config.mount)?;
    let dom = DomDriver::new(surface.clone(), mount.clone());

    let runtime = match config.app {
        DemoApp::Timer | DemoApp::Hover => RuntimeConfig::new(timer::app(config.timer.clone()))
            .driver(DOM, dom)
            .driver(LOG, LogDriver::console()),
        DemoApp::Hello => RuntimeConfig::new(hello::app()).driver(DOM, dom),
        DemoApp::Counter => RuntimeConfig::new(counter::app()).driver(DOM, dom),
        DemoApp::Bmi => RuntimeConfig::new(bmi::app()).driver(DOM, dom),
        DemoApp::FirstUser => RuntimeConfig::new(first_user::app(config.first_user.clone()))
            .driver(DOM, dom)
            .driver(HTTP, HttpDriver::new(transport(&config)?)),
    };

    let circuit = run_loop(runtime).context("Failed to start the reactive loop")?;
    for (channel, status) in circuit.statuses() {
        info!(channel = %channel, status = ?status, "Channel");
    }

    let reader = tokio::spawn(read_events(surface, mount));

    tokio::select! {
        _ = circuit.join() => info!("Circuit completed"),
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for ctrl-c")?;
            info!("Interrupted, shutting down");
        }
    }

    reader.abort();
    Ok(())
}
