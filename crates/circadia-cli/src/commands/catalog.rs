//! Catalog browsing command.

use clap::Subcommand;

use circadia_core::{Protocol, ProtocolCatalog, ProtocolDomain};

use super::CommandResult;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List protocols, optionally for one domain
    List {
        /// longevity, fuel, recovery or mind
        #[arg(long)]
        domain: Option<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one protocol as JSON
    Show {
        /// Protocol id
        id: String,
    },
}

pub fn run(action: CatalogAction) -> CommandResult {
    let catalog = ProtocolCatalog::builtin();
    match action {
        CatalogAction::List { domain, json } => {
            let domain: Option<ProtocolDomain> = domain.as_deref().map(str::parse).transpose()?;
            let protocols: Vec<&Protocol> = match domain {
                Some(d) => catalog.by_domain(d).collect(),
                None => catalog.iter().collect(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&protocols)?);
                return Ok(());
            }
            println!("Catalog v{} ({} protocols)", catalog.version(), protocols.len());
            for p in protocols {
                println!(
                    "  {:<22} {:<10} {:<11} {:>+5} min  window {:>3}  [{}]",
                    p.id,
                    p.domain.as_str(),
                    p.anchor.as_str(),
                    p.offset_minutes,
                    p.window_minutes,
                    p.priority.as_str()
                );
            }
        }
        CatalogAction::Show { id } => {
            let protocol = catalog
                .get(&id)
                .ok_or_else(|| format!("unknown protocol: {id}"))?;
            println!("{}", serde_json::to_string_pretty(protocol)?);
        }
    }
    Ok(())
}
