//! Shared fixtures: counting handlers and scratch factories.

use std::cell::{Cell, RefCell};
use std::fs;
use std::rc::Rc;

use restock_api::{CreateError, Object, ResourceHandler};
use restock_core::{Factory, FactoryParams};
use tempfile::TempDir;

/// Live object produced by [`TextHandler`]: the current text plus the
/// number of times it has been built or rebuilt.
pub struct TextObject {
    pub text: RefCell<String>,
    pub version: Cell<u32>,
}

impl TextObject {
    pub fn text_of(object: &Object) -> String {
        object
            .downcast_ref::<TextObject>()
            .expect("not a TextObject")
            .text
            .borrow()
            .clone()
    }
}

/// Call counters shared between a handler and the test body.
#[derive(Clone, Default)]
pub struct Counters {
    pub created: Rc<Cell<u32>>,
    pub destroyed: Rc<Cell<u32>>,
    pub recreated: Rc<Cell<u32>>,
}

/// UTF-8 text handler that counts create/destroy/recreate calls.
pub struct TextHandler {
    pub counters: Counters,
    pub recreate_supported: bool,
    pub fail_create: Rc<Cell<bool>>,
    pub fail_recreate: Rc<Cell<bool>>,
}

impl TextHandler {
    pub fn new(counters: &Counters) -> Self {
        Self {
            counters: counters.clone(),
            recreate_supported: true,
            fail_create: Rc::new(Cell::new(false)),
            fail_recreate: Rc::new(Cell::new(false)),
        }
    }

    pub fn without_recreate(counters: &Counters) -> Self {
        Self {
            recreate_supported: false,
            ..Self::new(counters)
        }
    }
}

impl ResourceHandler for TextHandler {
    fn create(&self, bytes: &[u8], _name: &str) -> Result<Object, CreateError> {
        if self.fail_create.get() {
            return Err(CreateError::Format);
        }
        let text = String::from_utf8(bytes.to_vec()).map_err(|_| CreateError::Format)?;
        self.counters.created.set(self.counters.created.get() + 1);
        Ok(Rc::new(TextObject {
            text: RefCell::new(text),
            version: Cell::new(1),
        }))
    }

    fn destroy(&self, _object: &Object) {
        self.counters.destroyed.set(self.counters.destroyed.get() + 1);
    }

    fn supports_recreate(&self) -> bool {
        self.recreate_supported
    }

    fn recreate(&self, object: &Object, bytes: &[u8], _name: &str) -> Result<(), CreateError> {
        if self.fail_recreate.get() {
            return Err(CreateError::Format);
        }
        let obj = object.downcast_ref::<TextObject>().ok_or(CreateError::Unknown)?;
        let text = String::from_utf8(bytes.to_vec()).map_err(|_| CreateError::Format)?;
        *obj.text.borrow_mut() = text;
        obj.version.set(obj.version.get() + 1);
        self.counters.recreated.set(self.counters.recreated.get() + 1);
        Ok(())
    }
}

/// Factory rooted at a scratch directory, plus the directory itself.
pub fn file_factory(params: FactoryParams) -> (Factory, TempDir) {
    let dir = TempDir::new().expect("scratch dir");
    let uri = format!("file://{}", dir.path().display());
    let factory = Factory::new(params, &uri).expect("factory");
    (factory, dir)
}

/// Write a fixture file under the scratch directory, creating parents.
pub fn write_file(dir: &TempDir, name: &str, contents: &[u8]) {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("fixture dirs");
    }
    fs::write(path, contents).expect("fixture file");
}

/// Uncompressed in-memory tar archive from (name, contents) pairs.
pub fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, bytes) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *bytes).expect("append entry");
    }
    builder.into_inner().expect("finish archive")
}
