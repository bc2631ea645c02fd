//! In-process bridge round trip against a saved page.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tracing::{info, warn};

use pagebridge_broker::{BackgroundCoordinator, LocalRuntime, user_message};
use pagebridge_content::ContentScript;
use pagebridge_protocols::MessageListener;

use crate::setup::{Components, read_page};

const TAB: u32 = 1;

pub(crate) struct BridgeArgs<'a> {
    pub file: &'a Path,
    pub url: &'a str,
    pub kind: &'a str,
    pub payload: Option<&'a str>,
    pub timeout_ms: Option<u64>,
    pub silent: bool,
}

/// Serve the page as tab 1, send one message and print the reply.
pub(crate) async fn run(components: &Components, args: BridgeArgs<'_>) -> Result<()> {
    let doc = read_page(args.file, args.url)?;
    let profile = components.profiles.for_url(args.url).clone();
    let script = Arc::new(ContentScript::new(
        Arc::new(Mutex::new(doc)),
        profile,
        components.extractor.clone(),
        components.injection.clone(),
    ));

    let runtime = Arc::new(LocalRuntime::new());
    let port = runtime.register_tab(TAB, args.url);
    let server = if args.silent {
        info!(tab = TAB, "tab registered without a listener");
        None
    } else {
        let listener: Arc<dyn MessageListener> = script.clone();
        Some(port.spawn(vec![listener]))
    };
    runtime.set_active(TAB)?;

    let timeout = args
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or(components.timeout);
    let coordinator = BackgroundCoordinator::new(runtime.clone()).with_timeout(timeout);

    let payload: Value = match args.payload {
        Some(raw) => serde_json::from_str(raw).context("payload is not valid JSON")?,
        None => json!({}),
    };
    let message = json!({ "type": args.kind, "payload": payload });

    let reply = coordinator
        .broker()
        .request_raw(TAB, message, coordinator.timeout())
        .await;
    match reply {
        Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
        Err(e) => {
            warn!(error = %e, "bridge request failed");
            println!("{}", user_message(&e));
        }
    }

    runtime.close_tab(TAB);
    if let Some(server) = server {
        let answered = server.await?;
        info!(answered, sidebar_open = script.sidebar_open(), "tab closed");
    }
    Ok(())
}
