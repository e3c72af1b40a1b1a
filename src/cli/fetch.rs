use std::collections::BTreeSet;

use restock_core::{Factory, FactoryParams};
use serde::Serialize;

use crate::handlers::{RawBlob, RawHandler};

#[derive(Serialize)]
struct FetchSummary {
    name: String,
    name_hash: String,
    extension: String,
    size: usize,
    ref_count: u32,
}

pub fn run(uri: &str, names: &[String], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut factory = Factory::new(FactoryParams::default(), uri)?;

    let extensions: BTreeSet<&str> = names
        .iter()
        .filter_map(|name| name.rsplit_once('.').map(|(_, extension)| extension))
        .collect();
    for extension in extensions {
        factory.register_type(extension, Box::new(RawHandler))?;
    }

    let mut loaded = Vec::new();
    let mut summaries = Vec::new();
    for name in names {
        let object = factory.get(name)?;
        let descriptor = factory.get_descriptor(name)?;
        let extension = factory
            .get_extension_from_type(descriptor.resource_type)?
            .to_string();
        let size = object
            .downcast_ref::<RawBlob>()
            .map(|blob| blob.bytes.borrow().len())
            .unwrap_or(0);
        summaries.push(FetchSummary {
            name: name.clone(),
            name_hash: format!("{:016x}", descriptor.name_hash),
            extension,
            size,
            ref_count: descriptor.ref_count,
        });
        loaded.push(object);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for summary in &summaries {
            println!(
                "{}  hash {}  type {}  {} bytes  refs {}",
                summary.name, summary.name_hash, summary.extension, summary.size, summary.ref_count
            );
        }
    }

    for object in &loaded {
        factory.release(object);
    }
    Ok(())
}
