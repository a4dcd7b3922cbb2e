//! Utils

use clap::Parser;

/// Arguments for the checkout demos
#[derive(Debug, Parser)]
pub struct DemoCheckoutArgs {
    /// Fixture set to use for the catalog, promotions and orders
    #[clap(short, long, default_value = "demo")]
    pub fixture: String,

    /// Price only the named order from the fixture set
    #[clap(short, long)]
    pub order: Option<String>,
}
