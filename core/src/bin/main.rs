/// mrboot host runner
///
/// Boots a directory laid out like the device's storage volume: mounts it,
/// loads `mrblib/*.rb` then `main.rb`, and idles forever.

use mrboot_core::cli;

fn main() {
    if let Err(e) = cli::run_cli() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
