use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use restock_core::{Factory, FactoryParams};
use tracing::{error, info};

use crate::handlers::RawHandler;

pub fn run(uri: &str, port: u16, preload: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let params = FactoryParams::default()
        .with_http_server()
        .with_control_port(port);
    let mut factory = Factory::new(params, uri)?;

    let extensions: BTreeSet<&str> = preload
        .iter()
        .filter_map(|name| name.rsplit_once('.').map(|(_, extension)| extension))
        .collect();
    for extension in extensions {
        factory.register_type(extension, Box::new(RawHandler))?;
    }

    // Hold one reference per preloaded resource for the factory's
    // lifetime so reloads have something to hit.
    let mut held = Vec::new();
    for name in preload {
        match factory.get(name) {
            Ok(object) => {
                info!("loaded {name}");
                held.push(object);
            }
            Err(err) => error!("unable to load {name}: {err}"),
        }
    }

    info!(
        "serving {} resources; control server on port {port}",
        factory.resident_count()
    );
    loop {
        factory.update();
        thread::sleep(Duration::from_millis(50));
    }
}
