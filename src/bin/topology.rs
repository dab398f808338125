use clap::Parser;
use compose_lint::config::manifest::{ComposeManifest, ServiceDef};
use compose_lint::utils::logger;
use compose_lint::{source_for, ServiceGraph};
use std::str::FromStr;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "compose-topology")]
#[command(about = "Print the startup plan implied by a compose manifest")]
struct Args {
    /// Manifest location: a file path or an http(s) URL
    #[arg(default_value = "docker-compose.yml")]
    manifest: String,

    /// Timeout for remote manifest fetches
    #[arg(long, default_value = "10")]
    timeout_seconds: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose, false);

    let source = match source_for(&args.manifest, Duration::from_secs(args.timeout_seconds)) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    tracing::info!("📁 Loading manifest from: {}", source.origin());

    let manifest = match source.fetch().await.and_then(|content| {
        ComposeManifest::from_yaml_str(&content)
    }) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let graph = ServiceGraph::from_manifest(&manifest);
    let order = match graph.startup_order() {
        Ok(order) => order,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    println!("📋 Startup plan for {}:", source.origin());
    println!("  Services: {}", manifest.services.len());
    println!();

    for (index, name) in order.iter().enumerate() {
        let Some(service) = manifest.service(name) else {
            continue;
        };

        println!("  {}. {}", index + 1, name);
        display_service_detail(service);

        let deps = graph.dependencies_of(name);
        if !deps.is_empty() {
            println!("     🔗 After: {}", deps.join(", "));
        }
        println!();
    }

    for (service, target) in graph.unknown_targets() {
        println!("  ⚠️ '{}' links to undefined service '{}'", service, target);
    }

    Ok(())
}

fn display_service_detail(service: &ServiceDef) {
    if let Some(image) = &service.image {
        println!("     Image: {}", image);
    } else if service.build.is_some() {
        println!("     Image: (built from context)");
    }

    if let Some(restart) = &service.restart {
        println!("     Restart: {}", restart);
    }

    for raw in service.ports.iter().flatten() {
        match compose_lint::domain::model::PortMapping::from_str(raw) {
            Ok(port) if port.host_port.is_some() => {
                println!("     Publishes: {}", raw);
            }
            Ok(_) => println!("     Exposes: {}", raw),
            Err(_) => println!("     Invalid port spec: {}", raw),
        }
    }
}
