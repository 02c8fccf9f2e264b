//! Demo dispatch server.
//!
//! Boots the router over a sample application: a few flat actions, a
//! negotiating greeter, and a `people` resource (with nested `pets`) backed
//! by an in-memory repository. Useful for poking the dispatch core with
//! curl; the library is the real product.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tokio::net::TcpListener;

use crossbar::config::{load_config, ServerConfig};
use crossbar::error::{DispatchError, UpstreamError};
use crossbar::negotiation::{Format, Negotiator};
use crossbar::routing::{App, Dispatcher, Method, ParamSpec, Record, Repository, Resource};
use crossbar::{observability, HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "crossbar", about = "Pattern-matching request dispatch server")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    observability::logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(err) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %err,
                "failed to parse metrics address"
            ),
        }
    }

    let dispatcher = Dispatcher::new(sample_app());
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();

    HttpServer::new(config, dispatcher)
        .run(listener, shutdown.subscribe())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// The sample routing table served by the demo binary.
fn sample_app() -> App {
    let mut app = App::new();

    app.get("welcome", vec![], |_| Ok("hi".to_string()));

    app.get("greet", vec![ParamSpec::required("name")], |txn| {
        let name = txn.params().str("name").unwrap_or_default().to_string();
        let json_name = name.clone();
        let negotiator = Negotiator::new(Format::new("text/plain", {
            let name = name.clone();
            move || format!("Hello {name}")
        }))
        .offer(Format::new("application/json", move || {
            serde_json::json!({ "greeting": format!("Hello {json_name}") }).to_string()
        }));
        Ok(txn.negotiate(negotiator))
    });

    app.post(
        "create",
        vec![ParamSpec::required("title"), ParamSpec::required("description")],
        |txn| {
            let title = txn.params().str("title").unwrap_or_default().to_string();
            let description = txn
                .params()
                .str("description")
                .unwrap_or_default()
                .to_string();
            txn.set_status(201);
            Ok(format!("Creating {title} {description}"))
        },
    );

    app.patch("bulk", vec![ParamSpec::optional("ids")], |txn| {
        let ids = txn
            .params()
            .list("ids")
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        Ok(format!("Bulk update of {}", ids.join(", ")))
    });

    let people = MemoryRepository::seeded("Person", &[("7", "Ada"), ("11", "Grace")]);
    let pets = MemoryRepository::seeded("Pet", &[("3", "Rex")]);
    app.resource(
        Resource::new("people", people)
            .member_action(Method::Get, "history", history_action)
            .nest(Resource::new("pets", pets)),
    );

    app
}

fn history_action(
    scope: &dyn Repository,
    id: &str,
    _txn: &mut crossbar::Transaction,
) -> Result<String, DispatchError> {
    let record = scope.find(id)?;
    Ok(format!("History of {}", record.render()))
}

/// In-memory data scope for the demo resource.
struct MemoryRepository {
    kind: &'static str,
    records: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryRepository {
    fn seeded(kind: &'static str, entries: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            kind,
            records: Arc::new(Mutex::new(
                entries
                    .iter()
                    .map(|(id, name)| (id.to_string(), name.to_string()))
                    .collect(),
            )),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, UpstreamError> {
        self.records.lock().map_err(|_| UpstreamError::Failed {
            reason: "repository lock poisoned".to_string(),
        })
    }
}

impl Repository for MemoryRepository {
    fn find(&self, id: &str) -> Result<Box<dyn Record>, UpstreamError> {
        let records = self.lock()?;
        let name = records
            .get(id)
            .ok_or_else(|| UpstreamError::Missing { id: id.to_string() })?;
        Ok(Box::new(MemoryRecord {
            kind: self.kind,
            id: id.to_string(),
            name: name.clone(),
            store: Arc::clone(&self.records),
        }))
    }

    fn all(&self) -> Result<Vec<Box<dyn Record>>, UpstreamError> {
        let records = self.lock()?;
        Ok(records
            .iter()
            .map(|(id, name)| {
                Box::new(MemoryRecord {
                    kind: self.kind,
                    id: id.clone(),
                    name: name.clone(),
                    store: Arc::clone(&self.records),
                }) as Box<dyn Record>
            })
            .collect())
    }
}

struct MemoryRecord {
    kind: &'static str,
    id: String,
    name: String,
    store: Arc<Mutex<BTreeMap<String, String>>>,
}

impl Record for MemoryRecord {
    fn render(&self) -> String {
        format!("{} {}: {}", self.kind, self.id, self.name)
    }

    fn destroy(&self) -> Result<(), UpstreamError> {
        let mut records = self.store.lock().map_err(|_| UpstreamError::Failed {
            reason: "repository lock poisoned".to_string(),
        })?;
        records
            .remove(&self.id)
            .map(|_| ())
            .ok_or_else(|| UpstreamError::Missing { id: self.id.clone() })
    }
}
