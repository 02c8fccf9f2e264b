//! Shared fixtures for the integration suite: an in-memory repository, a
//! sample routing table, and a server spawner.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::net::TcpListener;

use crossbar::config::ServerConfig;
use crossbar::error::UpstreamError;
use crossbar::negotiation::{Format, Negotiator};
use crossbar::routing::{App, Dispatcher, Method, ParamSpec, Record, Repository, Resource};
use crossbar::{HttpServer, Shutdown};

/// In-memory data scope backing the test resources.
pub struct TestRepo {
    kind: &'static str,
    records: Arc<Mutex<BTreeMap<String, String>>>,
}

impl TestRepo {
    pub fn seeded(kind: &'static str, entries: &[(&str, &str)]) -> Arc<Self> {
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
}

impl Repository for TestRepo {
    fn find(&self, id: &str) -> Result<Box<dyn Record>, UpstreamError> {
        let records = self.records.lock().unwrap();
        let name = records
            .get(id)
            .ok_or_else(|| UpstreamError::Missing { id: id.to_string() })?;
        Ok(Box::new(TestRecord {
            kind: self.kind,
            id: id.to_string(),
            name: name.clone(),
            store: Arc::clone(&self.records),
        }))
    }

    fn all(&self) -> Result<Vec<Box<dyn Record>>, UpstreamError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .map(|(id, name)| {
                Box::new(TestRecord {
                    kind: self.kind,
                    id: id.clone(),
                    name: name.clone(),
                    store: Arc::clone(&self.records),
                }) as Box<dyn Record>
            })
            .collect())
    }
}

struct TestRecord {
    kind: &'static str,
    id: String,
    name: String,
    store: Arc<Mutex<BTreeMap<String, String>>>,
}

impl Record for TestRecord {
    fn render(&self) -> String {
        format!("{} {}: {}", self.kind, self.id, self.name)
    }

    fn destroy(&self) -> Result<(), UpstreamError> {
        self.store
            .lock()
            .unwrap()
            .remove(&self.id)
            .map(|_| ())
            .ok_or_else(|| UpstreamError::Missing { id: self.id.clone() })
    }
}

/// The routing table the integration tests drive.
pub fn test_app() -> App {
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
            format!("{{\"greeting\":\"Hello {json_name}\"}}")
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

    let people = TestRepo::seeded("Person", &[("7", "Ada"), ("11", "Grace")]);
    let pets = TestRepo::seeded("Pet", &[("3", "Rex")]);
    app.resource(
        Resource::new("people", people)
            .member_action(Method::Get, "history", |scope, id, _| {
                let record = scope.find(id)?;
                Ok(format!("History of {}", record.render()))
            })
            .nest(Resource::new("pets", pets)),
    );

    app
}

/// Boot the real server on an ephemeral port. The returned shutdown handle
/// drains it when the test finishes.
pub async fn spawn_server(app: App) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(ServerConfig::default(), Dispatcher::new(app));

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}
