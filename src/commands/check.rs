//! Check command implementation.
//!
//! Validates system requirements and configuration.

use nix::unistd::geteuid;

use crate::commands::snapshot::own_pid;
use crate::config::{validate_effective_config, Config};
use procsnap::process::{collect_proc_entries, PlatformSource, RecordSource};

/// Validates system requirements and configuration.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 procsnap - System Check");
    println!("==========================");
    println!(
        "   Build: {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_BUILD_TIMESTAMP")
    );

    let mut all_ok = true;
    let root = config.proc_root();
    let units = config.units();

    // Check process table
    println!("\n📁 Checking {}...", root.display());
    match collect_proc_entries(&root, None) {
        Ok(entries) if entries.is_empty() => {
            println!("   ❌ No process entries found");
            all_ok = false;
        }
        Ok(entries) => {
            println!("   ✅ {} process entries listed", entries.len());
        }
        Err(e) => {
            println!("   ❌ Cannot open process table: {}", e);
            all_ok = false;
        }
    }

    // Check own record
    println!("\n🧾 Checking own process record...");
    let pid = own_pid();
    let own_path = root.join(pid.to_string());
    match PlatformSource::new(units).read_process(&own_path) {
        Ok(Some(p)) => {
            println!(
                "   ✅ pid {} ({}) parsed: {:.2}s CPU, {} bytes resident",
                p.id,
                p.command,
                p.cpu_time(),
                p.working_set_size as u64
            );
        }
        Ok(None) => {
            println!("   ❌ No record at {}", own_path.display());
            all_ok = false;
        }
        Err(e) => {
            println!("   ❌ Record unreadable: {}", e);
            all_ok = false;
        }
    }

    // Units
    println!("\n📏 Units:");
    println!("   ├─ Page size: {} bytes", units.page_size);
    println!("   └─ Clock ticks: {} per second", units.clock_ticks);

    // Permissions
    println!("\n🔐 Permissions:");
    if geteuid().is_root() {
        println!("   ✅ Running as root");
    } else {
        println!("   ⚠️  Not running as root - unreadable records of other users are skipped");
    }

    // Check configuration
    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}
