//! List the cache backends compiled into this build.

use tilecache::BackendRegistry;

/// Print each registered backend type name.
pub fn run(registry: &BackendRegistry) {
    println!("Available cache backends:");
    for name in registry.names() {
        println!("  {}", name);
    }
}
