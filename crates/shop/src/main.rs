use anyhow::Context;
use clap::Parser;

use bazaar_shop::{Session, ShopArgs};

fn main() -> anyhow::Result<()> {
    let args = ShopArgs::parse();
    bazaar_observability::init(args.log_format);

    let catalog = args.load_catalog().with_context(|| match &args.catalog {
        Some(path) => format!("failed to load catalog from {}", path.display()),
        None => "failed to build the sample catalog".to_string(),
    })?;

    let mut session = Session::new(catalog, args.renderer());
    tracing::info!(
        session = %session.id(),
        products = session.catalog().len(),
        "session started"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    session
        .run(stdin.lock(), stdout.lock())
        .context("console I/O failed")?;

    tracing::info!(
        session = %session.id(),
        events = session.journal().len(),
        "session ended"
    );
    Ok(())
}
