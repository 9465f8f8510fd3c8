//! Lifecycle walkthrough — one payload shared through nested scopes.
//!
//! Demonstrates:
//!   1. Adopting a freshly constructed object
//!   2. Copying into nested scopes and watching the shared count
//!   3. Calling a method through the pointer
//!   4. Deallocation firing once, when the last copy goes out of scope
//!
//! Run with:
//!   RUST_LOG=compact_rc=trace cargo run --example lifecycle

use compact_rc::CompactRc;
use tracing_subscriber::EnvFilter;

struct Foo;

impl Foo {
    fn new() -> Self {
        println!("Foo constructed");
        Foo
    }

    fn hello(&self) {
        println!("Foo hello");
    }
}

impl Drop for Foo {
    fn drop(&mut self) {
        println!("Foo destructed");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    {
        let sp1 = CompactRc::new(Foo::new());
        println!("sp1.use_count() = {}", sp1.use_count());

        {
            let sp2 = sp1.clone();
            println!("sp1.use_count() = {}", sp1.use_count());
            println!("sp2.use_count() = {}", sp2.use_count());

            sp2.hello();

            {
                let sp3 = sp2.clone();
                println!("sp2.use_count() = {}", sp2.use_count());
                println!("sp3.use_count() = {}", sp3.use_count());
            }
            println!(
                "sp2.use_count() after sp3 is out of scope = {}",
                sp2.use_count()
            );
        }
        println!(
            "sp1.use_count() after sp2 is out of scope = {}",
            sp1.use_count()
        );
    }
}
