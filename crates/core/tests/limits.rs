//! Capacity bounds: staging buffer and type registry.

mod common;

use common::{file_factory, write_file, Counters, TextHandler};
use restock_api::FactoryError;
use restock_core::registry::MAX_RESOURCE_TYPES;
use restock_core::FactoryParams;

#[test]
fn test_stream_buffer_boundary() {
    const BUFFER: usize = 64;
    let (mut factory, dir) = file_factory(
        FactoryParams::default().with_stream_buffer_size(BUFFER),
    );
    let counters = Counters::default();
    factory
        .register_type("txt", Box::new(TextHandler::new(&counters)))
        .unwrap();

    // One byte below the buffer size loads; at the buffer size it fails.
    write_file(&dir, "fits.txt", &vec![b'a'; BUFFER - 1]);
    write_file(&dir, "exact.txt", &vec![b'b'; BUFFER]);
    write_file(&dir, "over.txt", &vec![b'c'; BUFFER + 1]);

    let object = factory.get("fits.txt").unwrap();
    factory.release(&object);

    assert!(matches!(
        factory.get("exact.txt"),
        Err(FactoryError::BufferTooSmall(_))
    ));
    assert!(matches!(
        factory.get("over.txt"),
        Err(FactoryError::BufferTooSmall(_))
    ));
    assert_eq!(factory.resident_count(), 0);
}

#[test]
fn test_buffer_reused_across_loads() {
    let (mut factory, dir) = file_factory(
        FactoryParams::default().with_stream_buffer_size(64),
    );
    let counters = Counters::default();
    factory
        .register_type("txt", Box::new(TextHandler::new(&counters)))
        .unwrap();

    write_file(&dir, "long.txt", &vec![b'a'; 60]);
    write_file(&dir, "short.txt", b"bb");

    let long = factory.get("long.txt").unwrap();
    let short = factory.get("short.txt").unwrap();

    // The second load must not see the first one's tail.
    assert_eq!(common::TextObject::text_of(&short), "bb");

    factory.release(&long);
    factory.release(&short);
}

#[test]
fn test_type_registry_capacity() {
    let (mut factory, _dir) = file_factory(FactoryParams::default());
    let counters = Counters::default();

    for i in 0..MAX_RESOURCE_TYPES {
        factory
            .register_type(&format!("e{i}"), Box::new(TextHandler::new(&counters)))
            .unwrap();
    }
    let result = factory.register_type("overflow", Box::new(TextHandler::new(&counters)));
    assert!(matches!(result, Err(FactoryError::OutOfResources(_))));
}

#[test]
fn test_duplicate_type_is_rejected() {
    let (mut factory, _dir) = file_factory(FactoryParams::default());
    let counters = Counters::default();
    factory
        .register_type("txt", Box::new(TextHandler::new(&counters)))
        .unwrap();
    assert!(matches!(
        factory.register_type("txt", Box::new(TextHandler::new(&counters))),
        Err(FactoryError::AlreadyRegistered(_))
    ));
}

#[test]
fn test_dotted_extension_is_rejected() {
    let (mut factory, _dir) = file_factory(FactoryParams::default());
    let counters = Counters::default();
    assert!(matches!(
        factory.register_type("tar.gz", Box::new(TextHandler::new(&counters))),
        Err(FactoryError::Invalid(_))
    ));
}
