//! Stored State entry point
//!
//! Drives the greeting consumer against the configured store. On native each
//! stdin line is a name change followed by a committed update; `:key <name>`
//! moves the stored name to another slot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    use stored_state::platform::LocalStorage;
    use stored_state::{Greeting, Namespaced, Settings};

    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

    let settings = Settings::default();
    let store = match LocalStorage::open() {
        Ok(storage) => Namespaced::new(settings.namespace.clone(), storage),
        Err(e) => {
            log::error!("LocalStorage unavailable: {}", e);
            return;
        }
    };

    match Greeting::new(store, &settings.key, "") {
        Ok(mut greeting) => {
            if let Err(e) = greeting.commit() {
                log::warn!("Greeting not persisted: {}", e);
            }
            log::info!("{}", greeting.render());
        }
        Err(e) => log::error!("Cannot bind greeting: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let settings = stored_state::Settings::from_env();
    if let Err(e) = native::run(&settings) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io::{self, BufRead, Write};

    use stored_state::store::{MemoryStore, Namespaced, Store};
    use stored_state::{BindingError, Greeting, Settings};

    pub fn run(settings: &Settings) -> Result<(), BindingError> {
        let store: Namespaced<Box<dyn Store>> = match settings.open_store() {
            Ok(store) => store,
            Err(e) => {
                log::warn!("{}; falling back to memory storage", e);
                let fallback: Box<dyn Store> = Box::new(MemoryStore::new());
                Namespaced::new(settings.namespace.clone(), fallback)
            }
        };

        let mut greeting = Greeting::new(store, &settings.key, "")?;
        commit(&mut greeting);
        println!("{}", greeting.render());

        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::error!("stdin: {}", e);
                    break;
                }
            };

            if let Some(key) = line.strip_prefix(":key ") {
                if let Err(e) = greeting.rebind(key.trim()) {
                    log::warn!("{}", e);
                }
            } else {
                greeting.handle_change(&line);
            }

            commit(&mut greeting);
            println!("{}", greeting.render());
            if let Err(e) = io::stdout().flush() {
                log::warn!("stdout: {}", e);
            }
        }

        Ok(())
    }

    /// Persistence failures are logged; the greeting keeps working in memory
    fn commit<S: Store>(greeting: &mut Greeting<S>) {
        if let Err(e) = greeting.commit() {
            log::warn!("Not persisted: {}", e);
        }
    }
}
